use super::*;

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert_eq!(r.len_frames(), 3);
    assert_eq!((r.start, r.end), (FrameIndex(2), FrameIndex(5)));
    assert!(FrameRange::new(FrameIndex(3), FrameIndex(3)).unwrap().is_empty());
}

#[test]
fn fps_conversions() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(25, 0).is_err());

    let fps = Fps::new(25, 1).unwrap();
    assert_eq!(fps.frames_to_secs(50), 2.0);
    for secs in 1..=40u64 {
        assert_eq!(fps.frames_to_secs(secs * 25), secs as f64);
    }
    assert_eq!(Fps::new(30000, 1001).unwrap().frames_to_secs(30000), 1001.0);
    assert_eq!(fps.secs_to_frames_floor(1.99), 49);
    assert_eq!(fps.secs_to_frames_floor(-1.0), 0);
}

#[test]
fn viewport_aspect_scales_stretch_longer_axis() {
    let wide = Viewport::new(200, 100).unwrap();
    assert_eq!(wide.aspect_scales(), (2.0, 1.0));
    assert_eq!(wide.min_side(), 100);

    let tall = Viewport::new(100, 400).unwrap();
    assert_eq!(tall.aspect_scales(), (1.0, 4.0));

    let square = Viewport::new(64, 64).unwrap();
    assert_eq!(square.aspect_scales(), (1.0, 1.0));
}

#[test]
fn viewport_half_diagonal() {
    let v = Viewport::new(60, 80).unwrap();
    assert_eq!(v.half_diagonal(), 50.0);
    assert!(Viewport::new(0, 10).is_err());
}
