use super::*;

fn field(curves: u32, twist: f64) -> DistanceField {
    DistanceField::new(&SpiralParams {
        curves,
        alterations: 10,
        radius: 50,
        twist,
        line_width: 0.2,
    })
}

fn sample_angles() -> impl Iterator<Item = f64> {
    (0..97).map(|i| -3.1 + 0.0643 * f64::from(i))
}

#[test]
fn transparent_beyond_outer_ring() {
    let f = field(10, 5.0);
    for angle in sample_angles() {
        for h in [51.0, 51.5, 60.0, 1000.0] {
            assert_eq!(f.opacity_polar(h, angle), 0, "h={h} angle={angle}");
        }
    }
    assert_eq!(f.opacity_at(-64.0, -64.0), 0);
}

#[test]
fn opaque_inside_center_disc() {
    let f = field(10, 5.0);
    assert_eq!(f.params().center_radius(), 5);
    for angle in sample_angles() {
        for h in [0.0, 0.5, 2.25, 4.99] {
            assert_eq!(f.opacity_polar(h, angle), 255, "h={h} angle={angle}");
        }
    }
    assert_eq!(f.opacity_at(0.0, 0.0), 255);
}

#[test]
fn center_disc_boundary_starts_opaque() {
    let f = field(10, 5.0);
    for angle in sample_angles() {
        assert_eq!(f.opacity_polar(5.0, angle), 255);
    }
}

#[test]
fn outer_ring_starts_transparent() {
    let f = field(10, 5.0);
    for angle in sample_angles() {
        assert_eq!(f.opacity_polar(50.0, angle), 0);
    }
}

#[test]
fn outer_ring_never_exceeds_inner_value() {
    let f = field(10, 0.0);
    for angle in sample_angles() {
        assert!(f.opacity_polar(50.5, angle) <= 128);
    }
}

#[test]
fn band_center_is_opaque_and_gap_is_transparent() {
    let f = field(4, 0.0);
    let band = std::f64::consts::FRAC_PI_4;
    assert_eq!(f.distance_to_line(20.0, band), 0.0);
    assert_eq!(f.opacity_polar(20.0, band), 255);

    assert_eq!(f.distance_to_line(20.0, 0.0), 1.0);
    assert_eq!(f.opacity_polar(20.0, 0.0), 0);
}

#[test]
fn anti_alias_ramp_is_partial() {
    let f = field(1, 0.0);
    // With one curve and no twist, distance = |angle / pi - 1| for angle in [0, 2pi).
    let angle = std::f64::consts::PI * (1.0 - (0.2 + ANTI_ALIAS_BORDER / 2.0));
    let d = f.distance_to_line(20.0, angle);
    assert!((d - 0.24).abs() < 1e-9, "{d}");
    let a = f.opacity_polar(20.0, angle);
    assert!((120..=135).contains(&a), "{a}");
}

#[test]
fn distance_to_line_is_normalized() {
    let f = field(7, 3.3);
    for angle in sample_angles() {
        for h in [0.0, 3.7, 12.2, 49.9] {
            let d = f.distance_to_line(h, angle);
            assert!((0.0..=1.0).contains(&d), "h={h} angle={angle} d={d}");
        }
    }
}

#[test]
fn untwisted_field_has_curve_fold_symmetry() {
    for curves in [3u32, 4, 10] {
        let f = field(curves, 0.0);
        let step = std::f64::consts::TAU / f64::from(curves);
        for angle in sample_angles() {
            for h in [7.3, 18.6, 33.1, 45.8] {
                assert_eq!(
                    f.opacity_polar(h, angle),
                    f.opacity_polar(h, angle + step),
                    "curves={curves} h={h} angle={angle}"
                );
            }
        }
    }
}

#[test]
fn twist_alternates_between_segments() {
    let f = field(1, 1.0);
    // alterations * h / radius = 0.5 (segment 0) and 1.5 (segment 1): both give half the twist.
    let even = f.distance_to_line(2.5, 0.3);
    let odd = f.distance_to_line(7.5, 0.3);
    assert!((even - odd).abs() < 1e-12);
}

#[test]
fn field_is_deterministic() {
    let a = field(10, 5.0);
    let b = field(10, 5.0);
    for angle in sample_angles() {
        assert_eq!(a.opacity_polar(23.4, angle), b.opacity_polar(23.4, angle));
    }
}
