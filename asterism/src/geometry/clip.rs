//! Cohen-Sutherland clipping against `[0, width] x [0, height]`.

use glam::DVec2;

use super::{LabelBox, Segment};

type Outcode = u8;

const INSIDE: Outcode = 0;
const LEFT: Outcode = 1;
const RIGHT: Outcode = 2;
const BOTTOM: Outcode = 4;
const TOP: Outcode = 8;

/// Each endpoint needs at most two boundary moves; anything beyond this is NaN churn.
const MAX_ITERATIONS: usize = 8;

#[inline]
fn outcode(p: DVec2, max: DVec2) -> Outcode {
    let mut code = INSIDE;
    if p.x < 0.0 {
        code |= LEFT;
    } else if p.x > max.x {
        code |= RIGHT;
    }
    if p.y < 0.0 {
        code |= BOTTOM;
    } else if p.y > max.y {
        code |= TOP;
    }
    code
}

/// Raw outcode loop. Returns the part of `segment` inside the rectangle, or
/// `None` when nothing of it is inside. No degeneracy filtering.
fn clip_to_rect(segment: &Segment, width: f64, height: f64) -> Option<Segment> {
    let max = DVec2::new(width, height);
    let (mut a, mut b) = (segment.a, segment.b);
    let mut code_a = outcode(a, max);
    let mut code_b = outcode(b, max);

    for _ in 0..MAX_ITERATIONS {
        if code_a | code_b == INSIDE {
            return Some(Segment::new(a, b));
        }
        if code_a & code_b != INSIDE {
            return None;
        }

        let code = if code_a != INSIDE { code_a } else { code_b };
        let d = b - a;
        let p = if code & TOP != 0 {
            DVec2::new(a.x + d.x * (max.y - a.y) / d.y, max.y)
        } else if code & BOTTOM != 0 {
            DVec2::new(a.x + d.x * (0.0 - a.y) / d.y, 0.0)
        } else if code & RIGHT != 0 {
            DVec2::new(max.x, a.y + d.y * (max.x - a.x) / d.x)
        } else {
            DVec2::new(0.0, a.y + d.y * (0.0 - a.x) / d.x)
        };

        if code == code_a {
            a = p;
            code_a = outcode(a, max);
        } else {
            b = p;
            code_b = outcode(b, max);
        }
    }
    None
}

/// Clips `segment` to the viewport `[0, width] x [0, height]`.
///
/// Returns `None` when the segment lies fully outside, or when what remains is
/// zero-length or non-finite.
pub fn clip_segment(segment: &Segment, width: f64, height: f64) -> Option<Segment> {
    let clipped = clip_to_rect(segment, width, height)?;
    let length = clipped.length();
    if !clipped.is_finite() || !length.is_finite() || length <= 0.0 {
        return None;
    }
    Some(clipped)
}

/// True when any part of `segment` lies inside `rect` (edges included).
pub fn segment_intersects_rect(segment: &Segment, rect: &LabelBox) -> bool {
    if rect.is_degenerate() {
        return false;
    }
    let local = segment.translated(-rect.min());
    clip_to_rect(&local, rect.width, rect.height).is_some()
}
