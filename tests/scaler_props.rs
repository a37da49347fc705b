// Property tests for the scaling policy.
use capture_provider::image_provider::{scale, target_size, BoundingBox, Image, Size};
use proptest::prelude::*;

fn blank(width: u32, height: u32) -> Image {
    Image::from_rgba(width, height, vec![90; (width * height * 4) as usize])
        .expect("valid test image")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn fit_stays_inside_box_and_keeps_aspect(
        sw in 1u32..4000,
        sh in 1u32..4000,
        bw in 1u32..2000,
        bh in 1u32..2000,
    ) {
        let target = target_size(Size::new(sw, sh), BoundingBox::fit(bw, bh))
            .expect("fit always yields a target");

        prop_assert!(target.width <= bw);
        prop_assert!(target.height <= bh);
        prop_assert!(target.width == bw || target.height == bh);

        // Aspect ratio within one pixel of rounding on the derived side.
        let expected_w = target.height as f64 * sw as f64 / sh as f64;
        let expected_h = target.width as f64 * sh as f64 / sw as f64;
        prop_assert!(
            (target.width as f64 - expected_w).abs() <= 1.0
                || (target.height as f64 - expected_h).abs() <= 1.0
        );
    }

    #[test]
    fn width_only_matches_rounded_formula(
        sw in 1u32..4000,
        sh in 1u32..4000,
        w in 1u32..2000,
    ) {
        let target = target_size(Size::new(sw, sh), BoundingBox::width_only(w))
            .expect("width constraint yields a target");

        let expected = ((sh as f64 * w as f64 / sw as f64).round() as u32).max(1);
        prop_assert_eq!(target, Size::new(w, expected));
    }

    #[test]
    fn height_only_is_symmetric_to_width_only(
        sw in 1u32..4000,
        sh in 1u32..4000,
        h in 1u32..2000,
    ) {
        let by_height = target_size(Size::new(sw, sh), BoundingBox::height_only(h))
            .expect("height constraint yields a target");
        let mirrored = target_size(Size::new(sh, sw), BoundingBox::width_only(h))
            .expect("width constraint yields a target");

        prop_assert_eq!(by_height, Size::new(mirrored.height, mirrored.width));
    }

    #[test]
    fn non_positive_request_is_a_copy(
        w in 1u32..64,
        h in 1u32..64,
        rw in -5i32..=0,
        rh in -5i32..=0,
    ) {
        let src = blank(w, h);
        let out = scale(&src, BoundingBox::from_requested(rw, rh));
        prop_assert_eq!(out, src);
    }

    #[test]
    fn scaled_output_has_target_dimensions(
        w in 1u32..96,
        h in 1u32..96,
        bw in 1u32..128,
        bh in 1u32..128,
    ) {
        let requested = BoundingBox::fit(bw, bh);
        let out = scale(&blank(w, h), requested);
        let target = target_size(Size::new(w, h), requested).expect("target");

        prop_assert_eq!(Size::from(out.dimensions()), target);
        prop_assert_eq!(out.as_bytes().len(), (target.width * target.height * 4) as usize);
    }
}

#[test]
fn documented_examples() {
    assert_eq!(
        target_size(Size::new(1920, 1080), BoundingBox::fit(400, 400)),
        Some(Size::new(400, 225))
    );
    assert_eq!(
        target_size(Size::new(800, 600), BoundingBox::from_requested(400, 0)),
        Some(Size::new(400, 300))
    );
    assert_eq!(target_size(Size::new(800, 600), BoundingBox::unbounded()), None);
    assert_eq!(target_size(Size::new(0, 600), BoundingBox::fit(10, 10)), None);
}
