//! Pixel-space geometry: segments, label boxes and viewport clipping.

mod clip;

use glam::DVec2;
use serde::Serialize;

pub use clip::{clip_segment, segment_intersects_rect};

/// Line segment in pixel space. Direction matters only for trimming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: DVec2,
    pub b: DVec2,
}

impl Segment {
    pub const fn new(a: DVec2, b: DVec2) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }

    pub fn translated(&self, offset: DVec2) -> Self {
        Self::new(self.a + offset, self.b + offset)
    }

    /// Pulls both ends inward by `distance`, capped at `max_fraction` of the
    /// length per end so short segments keep a visible middle.
    ///
    /// Returns `None` for zero-length or non-finite input or output.
    pub fn trimmed(&self, distance: f64, max_fraction: f64) -> Option<Segment> {
        let length = self.length();
        if !length.is_finite() || length <= 0.0 {
            return None;
        }
        let trim = distance.min(length * max_fraction).max(0.0);
        let dir = (self.b - self.a) / length;
        let trimmed = Segment::new(self.a + dir * trim, self.b - dir * trim);
        trimmed.is_finite().then_some(trimmed)
    }
}

/// Axis-aligned rectangle in pixel space, `[x, x + width] x [y, y + height]`.
///
/// Used as the exclusion region of the most recently placed label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LabelBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(min: DVec2, max: DVec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    #[inline]
    pub fn min(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        DVec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn expanded(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    pub fn translated(&self, offset: DVec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Zero or negative area, or non-finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || !self.min().is_finite() || !self.max().is_finite()
    }

    pub fn intersects_segment(&self, segment: &Segment) -> bool {
        segment_intersects_rect(segment, self)
    }
}
