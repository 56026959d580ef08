//! Deterministic collaborators for unit tests.

use glam::DVec2;

use crate::canvas::{fill_rect, Operator, Surface};
use crate::color::Color;
use crate::projection::Projector;
use crate::sky::SkyPoint;
use crate::text::{TextExtents, TextRenderer};

/// Affine projector: `(10, 20)` maps to `(100, 100)`, half a degree of Dec
/// moves 10 px right and 10 px down, a degree of RA moves 20 px right and up.
#[derive(Debug, Clone, Default)]
pub struct LinearProjector {
    /// Points with Dec at or above this fail to project.
    pub fail_from_dec: Option<f64>,
}

impl LinearProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_from_dec(dec: f64) -> Self {
        Self {
            fail_from_dec: Some(dec),
        }
    }

    /// Sky point landing exactly on `pixel`.
    pub fn sky_at(x: f64, y: f64) -> SkyPoint {
        let (u, v) = (x - 100.0, y - 100.0);
        SkyPoint::new(10.0 + (u - v) / 40.0, 20.0 + (u + v) / 40.0)
    }
}

impl Projector for LinearProjector {
    fn sky_to_pixel(&self, sky: SkyPoint) -> Option<DVec2> {
        if self.fail_from_dec.is_some_and(|limit| sky.dec >= limit) {
            return None;
        }
        let (dra, ddec) = (sky.ra - 10.0, sky.dec - 20.0);
        Some(DVec2::new(
            100.0 + (dra + ddec) * 20.0,
            100.0 + (ddec - dra) * 20.0,
        ))
    }

    fn pixel_to_sky(&self, pixel: DVec2) -> Option<SkyPoint> {
        Some(Self::sky_at(pixel.x, pixel.y))
    }
}

/// Monospace stand-in: every glyph is `0.6 * size` wide, rises `0.8 * size`
/// above the baseline and drops `0.2 * size` below it.
#[derive(Debug, Clone, Default)]
pub struct FixedAdvanceText {
    pub drawn: Vec<(String, DVec2)>,
}

impl FixedAdvanceText {
    pub const ADVANCE: f64 = 0.6;
    pub const ASCENT: f64 = 0.8;
}

impl TextRenderer for FixedAdvanceText {
    fn extents(&mut self, text: &str, size: f64) -> TextExtents {
        let glyphs = text.chars().count() as f64;
        if glyphs == 0.0 {
            return TextExtents::default();
        }
        TextExtents {
            x_bearing: 0.0,
            y_bearing: -Self::ASCENT * size,
            width: glyphs * Self::ADVANCE * size,
            height: size,
        }
    }

    fn draw(&mut self, text: &str, origin: DVec2, size: f64, color: Color, surface: &mut Surface) {
        self.drawn.push((text.to_string(), origin));
        let advance = Self::ADVANCE * size;
        for i in 0..text.chars().count() {
            let min = DVec2::new(origin.x + i as f64 * advance, origin.y - Self::ASCENT * size);
            let max = min + DVec2::new(advance * 0.8, size);
            fill_rect(surface, min, max, color, Operator::Over);
        }
    }
}

#[test]
fn test_linear_projector_inverts() {
    let p = LinearProjector::new();
    let sky = LinearProjector::sky_at(37.0, 151.0);
    let px = p.sky_to_pixel(sky).unwrap();
    assert!((px.x - 37.0).abs() < 1e-9 && (px.y - 151.0).abs() < 1e-9);
    assert_eq!(
        p.sky_to_pixel(SkyPoint::new(10.0, 20.5)),
        Some(DVec2::new(110.0, 110.0))
    );
}
