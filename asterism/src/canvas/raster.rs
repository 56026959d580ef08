//! Anti-aliased raster primitives in pixel coordinates.
//!
//! Pixel `(x, y)` covers `[x, x + 1) x [y, y + 1)`; coverage is sampled at its
//! centre. Everything outside the target is silently dropped.

use glam::DVec2;

use super::surface::{Operator, Plot};

/// Pixel-index bounding box of `[min, max]`, clamped to the target.
fn pixel_bounds<P: Plot + ?Sized>(target: &P, min: DVec2, max: DVec2) -> Option<(usize, usize, usize, usize)> {
    let (w, h) = (target.plot_width() as f64, target.plot_height() as f64);
    if !min.is_finite() || !max.is_finite() || max.x < 0.0 || max.y < 0.0 || min.x >= w || min.y >= h {
        return None;
    }
    let x0 = min.x.floor().max(0.0) as usize;
    let y0 = min.y.floor().max(0.0) as usize;
    let x1 = (max.x.ceil().min(w - 1.0)).max(0.0) as usize;
    let y1 = (max.y.ceil().min(h - 1.0)).max(0.0) as usize;
    Some((x0, y0, x1, y1))
}

#[inline]
fn edge_coverage(half_width: f64, distance: f64) -> f32 {
    (half_width + 0.5 - distance).clamp(0.0, 1.0) as f32
}

/// Distance from `p` to the segment `a..b`.
fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Thick line with round caps.
pub fn stroke_line<P: Plot + ?Sized>(
    target: &mut P,
    a: DVec2,
    b: DVec2,
    width: f64,
    paint: P::Paint,
    op: Operator,
) {
    let half = (width / 2.0).max(0.0);
    let reach = DVec2::splat(half + 1.0);
    let Some((x0, y0, x1, y1)) = pixel_bounds(target, a.min(b) - reach, a.max(b) + reach) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
            let coverage = edge_coverage(half, distance_to_segment(center, a, b));
            if coverage > 0.0 {
                target.plot(x, y, paint, coverage, op);
            }
        }
    }
}

/// Connected run of line segments. Fewer than two points draws nothing.
pub fn stroke_polyline<P: Plot + ?Sized>(
    target: &mut P,
    points: &[DVec2],
    width: f64,
    paint: P::Paint,
    op: Operator,
) {
    for pair in points.windows(2) {
        stroke_line(target, pair[0], pair[1], width, paint, op);
    }
}

/// Hollow circle outline centred on `center`.
pub fn stroke_circle<P: Plot + ?Sized>(
    target: &mut P,
    center: DVec2,
    radius: f64,
    width: f64,
    paint: P::Paint,
    op: Operator,
) {
    if !(radius > 0.0) {
        return;
    }
    let half = (width / 2.0).max(0.0);
    let reach = DVec2::splat(radius + half + 1.0);
    let Some((x0, y0, x1, y1)) = pixel_bounds(target, center - reach, center + reach) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
            let coverage = edge_coverage(half, (p.distance(center) - radius).abs());
            if coverage > 0.0 {
                target.plot(x, y, paint, coverage, op);
            }
        }
    }
}

/// Filled axis-aligned rectangle `[min, max]`, with exact area coverage on edges.
pub fn fill_rect<P: Plot + ?Sized>(target: &mut P, min: DVec2, max: DVec2, paint: P::Paint, op: Operator) {
    if !(max.x > min.x && max.y > min.y) {
        return;
    }
    let Some((x0, y0, x1, y1)) = pixel_bounds(target, min, max) else {
        return;
    };
    let overlap = |lo: f64, hi: f64, p: usize| (hi.min(p as f64 + 1.0) - lo.max(p as f64)).clamp(0.0, 1.0);
    for y in y0..=y1 {
        let cy = overlap(min.y, max.y, y);
        if cy <= 0.0 {
            continue;
        }
        for x in x0..=x1 {
            let coverage = (overlap(min.x, max.x, x) * cy) as f32;
            if coverage > 0.0 {
                target.plot(x, y, paint, coverage, op);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::surface::{Mask, Surface};
    use crate::color::Color;

    fn surface(w: usize, h: usize) -> Surface {
        Surface::new_default(w, h)
    }

    #[test]
    fn test_stroke_line_covers_diagonal() {
        let mut s = surface(100, 100);
        stroke_line(
            &mut s,
            DVec2::new(10.0, 10.0),
            DVec2::new(90.0, 90.0),
            1.0,
            Color::WHITE,
            Operator::Over,
        );
        assert!(s[(50, 50)].a > 0.99);
        assert_eq!(s[(50, 10)], Color::TRANSPARENT);
        assert_eq!(s[(0, 99)], Color::TRANSPARENT);
    }

    #[test]
    fn test_stroke_line_outside_target_is_noop() {
        let mut s = surface(20, 20);
        stroke_line(
            &mut s,
            DVec2::new(-50.0, -50.0),
            DVec2::new(-10.0, -10.0),
            2.0,
            Color::RED,
            Operator::Over,
        );
        assert!(s.iter().all(|c| *c == Color::TRANSPARENT));
    }

    #[test]
    fn test_stroke_circle_ring() {
        let mut s = surface(100, 100);
        stroke_circle(&mut s, DVec2::new(50.0, 50.0), 20.0, 2.0, Color::RED, Operator::Over);
        // (70, 50) has its centre at distance 20.5 from the circle centre.
        assert!(s[(70, 50)].a > 0.9);
        assert_eq!(s[(50, 50)], Color::TRANSPARENT);
    }

    #[test]
    fn test_polyline_joins_points() {
        let mut s = surface(50, 50);
        let pts = [DVec2::new(5.5, 5.5), DVec2::new(40.5, 5.5), DVec2::new(40.5, 40.5)];
        stroke_polyline(&mut s, &pts, 1.0, Color::GREEN, Operator::Over);
        assert!(s[(20, 5)].a > 0.99);
        assert!(s[(40, 20)].a > 0.99);
        assert_eq!(s[(20, 20)], Color::TRANSPARENT);
    }

    #[test]
    fn test_fill_rect_replace_clears_mask() {
        let mut m = Mask::new_filled(30, 30, 1.0);
        fill_rect(&mut m, DVec2::new(10.0, 10.0), DVec2::new(20.0, 15.0), 0.0, Operator::Replace);
        assert_eq!(m[(10, 10)], 0.0);
        assert_eq!(m[(19, 14)], 0.0);
        assert_eq!(m[(20, 14)], 1.0);
        assert_eq!(m[(9, 10)], 1.0);
    }

    #[test]
    fn test_fill_rect_partial_pixel() {
        let mut m = Mask::new_filled(4, 4, 1.0);
        fill_rect(&mut m, DVec2::new(0.5, 0.0), DVec2::new(2.0, 1.0), 0.0, Operator::Replace);
        assert!((m[(0, 0)] - 0.5).abs() < 1e-6);
        assert_eq!(m[(1, 0)], 0.0);
    }

    #[test]
    fn test_over_on_mask_keeps_opaque() {
        let mut m = Mask::new_filled(10, 10, 1.0);
        stroke_line(&mut m, DVec2::new(0.0, 5.0), DVec2::new(10.0, 5.0), 2.0, 1.0, Operator::Over);
        assert!(m.iter().all(|v| (*v - 1.0).abs() < 1e-6));
    }
}
