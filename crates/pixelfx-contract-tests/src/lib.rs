#![forbid(unsafe_code)]

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use pixelfx::filters::{
        Blur, Brightness, BrightnessContrast, Contrast, Curves, Hue, HueSaturation, Multiply,
        Noise, Saturation, Sepia, UnsharpMask, Vibrance, Vignette,
    };
    use pixelfx::{Filter, Renderer, Source, Surface};
    use pixelfx_core::plan::{plan_passes, Pass, PassParity, StageKind};
    use pixelfx_filters::noise;
    use pixelfx_raster::{RasterFilter, RasterRenderer};

    /// A small gradient with color variation in every channel.
    fn test_source() -> Source {
        let mut pixels = Vec::new();
        for y in 0..8u32 {
            for x in 0..8u32 {
                pixels.extend_from_slice(&[
                    (x * 32) as u8,
                    (y * 32) as u8,
                    (255 - x * 20) as u8,
                    255,
                ]);
            }
        }
        Source::from_rgba8(8, 8, pixels).unwrap()
    }

    fn run(filters: &[&dyn RasterFilter]) -> Vec<u8> {
        let mut r = RasterRenderer::new();
        r.set_source(test_source()).unwrap();
        r.apply_filters(filters).unwrap();
        r.surface().unwrap().data().to_vec()
    }

    fn assert_within(a: &[u8], b: &[u8], tolerance: i32, what: &str) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            let diff = (i32::from(*x) - i32::from(*y)).abs();
            assert!(diff <= tolerance, "{what}: byte {i} differs by {diff}");
        }
    }

    // ---- Identity behavior at default parameters ----

    #[test]
    fn neutral_parameters_change_nothing() {
        fn assert_neutral(filter: &dyn RasterFilter, name: &str) {
            let original = test_source().pixels().to_vec();
            assert_within(&run(&[filter]), &original, 1, name);
        }

        assert_neutral(&Brightness::new(0.0), "brightness");
        assert_neutral(&Contrast::new(0.0), "contrast");
        assert_neutral(&BrightnessContrast::new(0.0, 0.0), "brightness_contrast");
        assert_neutral(&Hue::new(0.0), "hue");
        assert_neutral(&Saturation::new(0.0), "saturation");
        assert_neutral(&HueSaturation::new(0.0, 0.0), "hue_saturation");
        assert_neutral(&Sepia::new(0.0), "sepia");
        assert_neutral(&Vibrance::new(0.0), "vibrance");
        assert_neutral(&Multiply::new(1.0, 1.0, 1.0), "multiply");
        assert_neutral(&Vignette::new(1.0, 0.0), "vignette");
        assert_neutral(&Noise::new(0.0), "noise");
        assert_neutral(&Blur::new(0.0), "blur");
        assert_neutral(&UnsharpMask::new(0.0, 0.0), "unsharp_mask");
    }

    #[test]
    fn identity_curve_is_neutral_within_one_level() {
        let original = test_source().pixels().to_vec();
        let out = run(&[&Curves::new(&[(0.0, 0.0), (1.0, 1.0)])]);
        assert_within(&out, &original, 1, "identity curve");
    }

    // ---- Malformed parameters fall back to the documented default ----

    #[test]
    fn non_finite_parameters_behave_like_defaults() {
        let original = test_source().pixels().to_vec();
        let out = run(&[&Brightness::new(f32::NAN)]);
        assert_eq!(out, original);
        let out = run(&[&Vignette::new(f32::INFINITY, f32::NAN)]);
        // size defaults to 0 and amount to 0: smoothstep(0.8, 0, 0) = 1
        assert_eq!(out, original);
    }

    // ---- Fusion semantics ----

    #[test]
    fn fused_sweep_matches_sequential_passes_closely() {
        // every stage here maps [0, 1] into itself, so the sequential
        // path's per-pass clamp never bites and the only divergence left
        // is intermediate quantization
        let sepia = Sepia::new(0.4);
        let multiply = Multiply::new(0.9, 1.0, 0.8);
        let saturation = Saturation::new(-0.2);
        let vignette = Vignette::new(0.5, 0.3);
        let filters: Vec<&dyn RasterFilter> = vec![&sepia, &multiply, &saturation, &vignette];
        let fused = run(&filters);

        let mut r = RasterRenderer::new();
        r.set_source(test_source()).unwrap();
        for f in &filters {
            r.apply_filter(*f).unwrap();
        }
        let sequential = r.surface().unwrap().data().to_vec();

        assert_within(&fused, &sequential, 2, "fusion equivalence");
    }

    #[test]
    fn fused_brightness_contrast_stays_within_one_level_of_sequential() {
        // brightness pushes bright channels past 1.0 mid-sweep; the
        // positive-contrast gain sends every overshot value to 255 on
        // both paths, so the results agree to one quantization level
        let brightness = Brightness::new(0.17);
        let contrast = Contrast::new(0.33);
        let filters: Vec<&dyn RasterFilter> = vec![&brightness, &contrast];
        let fused = run(&filters);

        let mut r = RasterRenderer::new();
        r.set_source(test_source()).unwrap();
        for f in &filters {
            r.apply_filter(*f).unwrap();
        }
        assert_within(
            &fused,
            r.surface().unwrap().data(),
            1,
            "brightness+contrast",
        );
    }

    #[test]
    fn standalone_filters_split_passes_without_reordering() {
        // every fused run here has exactly one member, so fusion cannot
        // introduce rounding differences: results must match exactly
        let brightness = Brightness::new(0.1);
        let blur = Blur::new(2.0);
        let contrast = Contrast::new(0.2);
        let filters: Vec<&dyn RasterFilter> = vec![&brightness, &blur, &contrast];
        let planned = run(&filters);

        let mut r = RasterRenderer::new();
        r.set_source(test_source()).unwrap();
        for f in &filters {
            r.apply_filter(*f).unwrap();
        }
        assert_eq!(planned, r.surface().unwrap().data());
    }

    #[test]
    fn filter_order_is_significant() {
        let a = run(&[&Brightness::new(0.3), &Contrast::new(0.5)]);
        let b = run(&[&Contrast::new(0.5), &Brightness::new(0.3)]);
        assert_ne!(a, b);
    }

    // ---- Pass planning and parity (shared backend contracts) ----

    #[test]
    fn mixed_list_partitions_around_standalone_filters() {
        use StageKind::{Fusable as I, Standalone as S};
        assert_eq!(
            plan_passes(&[I, I, S, I]),
            vec![Pass::Fused(0..2), Pass::Standalone(2), Pass::Fused(3..4)]
        );
    }

    #[test]
    fn ping_pong_parity_is_pass_count_mod_two() {
        let mut parity = PassParity::new();
        for n in 1..=7u64 {
            parity.advance();
            assert_eq!(parity.current(), (n % 2) as usize);
        }
        // presentation does not advance parity; only advance() does
        let before = parity.current();
        let _ = parity.current();
        assert_eq!(parity.current(), before);
    }

    // ---- Golden values ----

    #[test]
    fn noise_hash_matches_reference_values() {
        for (x, y, expected) in [
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.9216903898159217),
            (0.0, 1.0, 0.1829163520505972),
            (1.0, 1.0, 0.740084824198675),
            (10.0, 10.0, 0.3426389887317782),
            (100.0, 7.0, 0.6386885665233422),
        ] {
            assert_relative_eq!(noise::hash(x, y), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn brightness_contrast_lifts_mid_gray_to_179() {
        let source = Source::from_rgba8(2, 2, vec![128u8; 16]).unwrap();
        let mut r = RasterRenderer::new();
        r.set_source(source).unwrap();
        r.apply_filter(&BrightnessContrast::new(0.2, 0.0)).unwrap();
        assert_eq!(r.surface().unwrap().data()[0], 179);
    }

    // ---- Front-door dispatcher ----

    #[test]
    fn dispatcher_runs_dual_capability_filters_on_the_raster_backend() {
        let brightness = Brightness::new(0.1);
        let blur = Blur::new(1.0);
        let sepia = Sepia::new(0.4);
        let list: Vec<&dyn Filter> = vec![&brightness, &blur, &sepia];
        let mut renderer = Renderer::raster();
        renderer
            .set_source(test_source())
            .unwrap()
            .apply_filters(&list)
            .unwrap()
            .render()
            .unwrap();
        match renderer.surface().unwrap() {
            Surface::Raster(buf) => assert_eq!(buf.data().len(), 8 * 8 * 4),
            Surface::Pixels { .. } => panic!("raster backend lends its buffer"),
        }
    }

    #[test]
    fn rebinding_a_source_discards_previous_filtering() {
        let mut renderer = Renderer::raster();
        renderer
            .set_source(test_source())
            .unwrap()
            .apply_filter(&Brightness::new(1.0))
            .unwrap();
        renderer.set_source(test_source()).unwrap();
        match renderer.surface().unwrap() {
            Surface::Raster(buf) => assert_eq!(buf.data(), test_source().pixels()),
            Surface::Pixels { .. } => unreachable!(),
        }
    }
}
