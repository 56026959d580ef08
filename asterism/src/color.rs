//! RGBA color type for overlay drawing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA with components in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0] as f32 / 255.0,
            g: rgba[1] as f32 / 255.0,
            b: rgba[2] as f32 / 255.0,
            a: rgba[3] as f32 / 255.0,
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Source-over: `self` painted on top of `dst` with extra `coverage` in [0, 1].
    #[inline]
    pub fn over(self, dst: Color, coverage: f32) -> Color {
        let sa = self.a * coverage;
        let out_a = sa + dst.a * (1.0 - sa);
        if out_a <= 0.0 {
            return Color::TRANSPARENT;
        }
        let mix = |s: f32, d: f32| (s * sa + d * dst.a * (1.0 - sa)) / out_a;
        Color {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: out_a,
        }
    }

    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    /// Label color for named stars and custom objects.
    pub const LIGHT_BLUE: Color = Color::rgb(0.6902, 0.8784, 0.9020);
    pub const GRID_GREY: Color = Color::rgb(0.2, 0.2, 0.2);
}

/// Deterministic pastel color for a discrete id (e.g. a constellation index).
///
/// A fresh generator is seeded from the id on every call, so the same id gives
/// the same color across frames and no shared generator state is touched.
pub fn color_for_id(id: u64) -> Color {
    let mut rng = StdRng::seed_from_u64(id);
    let mut channel = || (rng.random_range(0..128u32) + 127) as f32 / 255.0;
    let r = channel();
    let g = channel();
    let b = channel();
    Color::rgb(r, g, b)
}
