mod render_frames {
    use spiralsaver::{
        Dispatcher, FrameIndex, FrameRange, FrameSink, InMemorySink, RenderThreading,
        SpiralConfig, SpiralScene, Viewport, render_frames, render_to_sink,
    };

    fn scene(rotation_speed: f64) -> SpiralScene {
        let cfg = SpiralConfig {
            rotation_speed,
            ..SpiralConfig::default()
        };
        SpiralScene::with_dispatcher(
            &cfg,
            Viewport::new(48, 32).unwrap(),
            &Dispatcher::parallel(Some(2), 8),
        )
        .unwrap()
    }

    #[test]
    fn sequential_and_parallel_match_for_multiple_chunk_sizes() {
        let scene = scene(0.35);
        let range = FrameRange::new(FrameIndex(0), FrameIndex(12)).unwrap();
        let (seq_frames, seq_stats) =
            render_frames(&scene, range, &RenderThreading::default()).unwrap();
        assert_eq!(seq_stats.frames_total, 12);
        assert_eq!(seq_stats.frames_rendered, 12);

        for chunk_size in [1usize, 3, 8] {
            let opts = RenderThreading {
                parallel: true,
                chunk_size,
                threads: Some(4),
                static_frame_elision: false,
            };
            let (par_frames, stats) = render_frames(&scene, range, &opts).unwrap();
            assert_eq!(stats.frames_elided, 0);
            assert_eq!(seq_frames, par_frames);
        }
    }

    #[test]
    fn range_render_matches_single_frames() {
        let scene = scene(0.35);
        let range = FrameRange::new(FrameIndex(5), FrameIndex(9)).unwrap();
        let (frames, _) = render_frames(&scene, range, &RenderThreading::default()).unwrap();
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(*frame, scene.render_frame(FrameIndex(5 + i as u64)));
        }
    }

    #[test]
    fn static_frame_elision_reports_expected_counts() {
        let scene = scene(0.0);
        let range = FrameRange::new(FrameIndex(0), FrameIndex(8)).unwrap();
        let opts = RenderThreading {
            parallel: true,
            chunk_size: 8,
            threads: Some(4),
            static_frame_elision: true,
        };
        let (frames, stats) = render_frames(&scene, range, &opts).unwrap();

        assert_eq!(stats.frames_total, 8);
        assert_eq!(stats.frames_rendered, 1);
        assert_eq!(stats.frames_elided, 7);
        for frame in frames.iter().skip(1) {
            assert_eq!(frame.data, frames[0].data);
        }
    }

    #[test]
    fn whole_revolutions_reuse_the_first_frame() {
        // 1 rev/s at 25 fps: frames 0 and 25 are both unrotated.
        let forward = scene(1.0);
        let range = FrameRange::new(FrameIndex(0), FrameIndex(26)).unwrap();
        let opts = RenderThreading {
            parallel: false,
            chunk_size: 26,
            threads: None,
            static_frame_elision: true,
        };
        let (frames, stats) = render_frames(&forward, range, &opts).unwrap();

        assert_eq!(stats.frames_total, 26);
        assert_eq!(stats.frames_rendered, 25);
        assert_eq!(stats.frames_elided, 1);
        assert_eq!(frames[25], frames[0]);

        let reversed = scene(-1.0);
        let (rev_frames, rev_stats) = render_frames(&reversed, range, &opts).unwrap();
        assert_eq!(rev_stats.frames_elided, 1);
        assert_eq!(rev_frames[0], frames[0]);
    }

    #[test]
    fn sink_receives_frames_in_order() {
        let scene = scene(0.35);
        let range = FrameRange::new(FrameIndex(2), FrameIndex(7)).unwrap();
        let mut sink = InMemorySink::new();
        let opts = RenderThreading {
            parallel: true,
            chunk_size: 2,
            threads: Some(3),
            static_frame_elision: true,
        };
        let stats = render_to_sink(&scene, range, &opts, &mut sink as &mut dyn FrameSink).unwrap();

        assert_eq!(stats.frames_total, 5);
        let cfg = sink.config().unwrap();
        assert_eq!((cfg.width, cfg.height, cfg.fps.num), (48, 32, 25));
        let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
        assert_eq!(idx, vec![2, 3, 4, 5, 6]);
        assert_eq!(sink.frames()[0].1, scene.render_frame(FrameIndex(2)));
    }

    #[test]
    fn empty_range_is_rejected() {
        let scene = scene(0.35);
        let range = FrameRange::new(FrameIndex(3), FrameIndex(3)).unwrap();
        assert!(render_frames(&scene, range, &RenderThreading::default()).is_err());
    }
}
