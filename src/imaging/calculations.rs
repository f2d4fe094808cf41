//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Fit `source` inside the `max` bounding box, preserving aspect ratio.
///
/// Images already inside the box are returned unchanged (never upscaled).
/// Otherwise the constraining edge matches its maximum exactly and the other
/// edge is the floor or ceiling of its exact value, whichever keeps the aspect
/// ratio closer to the source (floor on a tie), never less than 1.
///
/// # Examples
/// ```
/// # use shotwell_gallery::imaging::calculate_bounded_dimensions;
/// // 4:3 landscape into a wide 178x100 box is height-bound
/// assert_eq!(calculate_bounded_dimensions((4000, 3000), (178, 100)), (133, 100));
///
/// // Already small enough: untouched
/// assert_eq!(calculate_bounded_dimensions((120, 80), (178, 100)), (120, 80));
/// ```
pub fn calculate_bounded_dimensions(source: (u32, u32), max: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = max;

    if src_w <= max_w && src_h <= max_h {
        return source;
    }

    let aspect = src_w as f64 / src_h as f64;
    let box_w = max_w as f64;
    let box_h = max_h as f64;

    if box_w / box_h >= aspect {
        // Box is wider than the image: height is the constraint
        let w = round_aspect(box_h * aspect, |n| (aspect - n / box_h).abs());
        (w, max_h)
    } else {
        // Box is taller than the image: width is the constraint
        let h = round_aspect(box_w / aspect, |n| {
            if n == 0.0 { 0.0 } else { (aspect - box_w / n).abs() }
        });
        (max_w, h)
    }
}

/// Pick floor or ceil of `value`, whichever minimizes `error`, at least 1.
fn round_aspect(value: f64, error: impl Fn(f64) -> f64) -> u32 {
    let floor = value.floor();
    let ceil = value.ceil();
    let best = if error(ceil) < error(floor) { ceil } else { floor };
    (best as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aspect_error(source: (u32, u32), result: (u32, u32)) -> f64 {
        let src = source.0 as f64 / source.1 as f64;
        let out = result.0 as f64 / result.1 as f64;
        (src - out).abs()
    }

    #[test]
    fn landscape_into_wide_box_is_height_bound() {
        assert_eq!(calculate_bounded_dimensions((4000, 3000), (178, 100)), (133, 100));
    }

    #[test]
    fn same_aspect_fills_box_exactly() {
        assert_eq!(calculate_bounded_dimensions((4000, 3000), (1280, 960)), (1280, 960));
    }

    #[test]
    fn portrait_into_landscape_box() {
        // 3000x4000 into 1280x960 → height-bound, width 720
        assert_eq!(calculate_bounded_dimensions((3000, 4000), (1280, 960)), (720, 960));
    }

    #[test]
    fn panorama_into_box_is_width_bound() {
        // 6000x1000 into 1280x960 → width-bound, height 213.33 → 213
        assert_eq!(calculate_bounded_dimensions((6000, 1000), (1280, 960)), (1280, 213));
    }

    #[test]
    fn small_image_is_not_upscaled() {
        assert_eq!(calculate_bounded_dimensions((100, 50), (178, 100)), (100, 50));
    }

    #[test]
    fn only_one_edge_too_large() {
        // Width fits, height does not
        assert_eq!(calculate_bounded_dimensions((150, 300), (178, 100)), (50, 100));
    }

    #[test]
    fn extreme_aspect_never_collapses_to_zero() {
        assert_eq!(calculate_bounded_dimensions((10000, 1), (100, 100)), (100, 1));
        assert_eq!(calculate_bounded_dimensions((1, 10000), (100, 100)), (1, 100));
    }

    #[test]
    fn rounds_toward_closest_aspect() {
        // 1000x600 into 500x500 → width-bound, exact height 300
        assert_eq!(calculate_bounded_dimensions((1000, 600), (500, 500)), (500, 300));
        // 1000x667 into 500x500 → exact 333.5; floor and ceil compared by aspect error
        let (w, h) = calculate_bounded_dimensions((1000, 667), (500, 500));
        assert_eq!(w, 500);
        assert!(h == 333 || h == 334);
    }

    #[test]
    fn results_stay_inside_box_with_bounded_aspect_error() {
        let sources = [(4000, 3000), (3000, 4000), (6016, 4016), (1920, 1080), (999, 1001)];
        let boxes = [(178, 100), (1280, 960), (640, 640), (100, 178), (33, 7)];
        for &source in &sources {
            for &max in &boxes {
                let (w, h) = calculate_bounded_dimensions(source, max);
                assert!(w <= max.0 && h <= max.1, "{source:?} in {max:?} → {w}x{h}");
                // One pixel of rounding on the free edge bounds the aspect error
                let tolerance = (source.0 as f64 / source.1 as f64) / (w.min(h) as f64) + 1e-9;
                assert!(
                    aspect_error(source, (w, h)) <= tolerance,
                    "{source:?} in {max:?} → {w}x{h}"
                );
            }
        }
    }
}
