//! Text measurement and glyph rasterization.

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, Weight};
use glam::DVec2;

use crate::canvas::{Operator, Plot, Surface};
use crate::color::Color;

/// Ink bounds of a rendered string, relative to its baseline origin. y grows down,
/// so `y_bearing` is negative for glyphs rising above the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    pub x_bearing: f64,
    pub y_bearing: f64,
    pub width: f64,
    pub height: f64,
}

impl TextExtents {
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x_bearing: self.x_bearing * factor,
            y_bearing: self.y_bearing * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Measures and draws single-line text. Sizes and positions are in pixels.
pub trait TextRenderer {
    fn extents(&mut self, text: &str, size: f64) -> TextExtents;

    /// Draws `text` with its baseline starting at `origin`.
    fn draw(&mut self, text: &str, origin: DVec2, size: f64, color: Color, surface: &mut Surface);
}

/// Bold sans-serif text through `cosmic-text`, using the system font database.
pub struct CosmicTextRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl Default for CosmicTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmicTextRenderer {
    pub fn new() -> Self {
        let font_system = FontSystem::new();
        tracing::debug!(faces = font_system.db().len(), "Loaded font database");
        Self {
            font_system,
            swash_cache: SwashCache::new(),
        }
    }

    /// `None` for sizes the shaper cannot lay out.
    fn shape(&mut self, text: &str, size: f64) -> Option<Buffer> {
        let size = size as f32;
        if !(size.is_finite() && size > 0.0) {
            tracing::warn!(size, text, "Skipping text with unusable font size");
            return None;
        }
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(size, size * 1.2));
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(
            &mut self.font_system,
            text,
            Attrs::new().family(Family::SansSerif).weight(Weight::BOLD),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);
        Some(buffer)
    }

    /// Rasterizes `buffer`, handing each covered pixel relative to the first
    /// baseline to `f` with coverage in (0, 1].
    fn rasterize(&mut self, buffer: &Buffer, mut f: impl FnMut(i32, i32, f32)) {
        let Some(baseline) = buffer.layout_runs().next().map(|run| run.line_y as i32) else {
            return;
        };
        let ink = cosmic_text::Color::rgba(255, 255, 255, 255);
        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            ink,
            |x, y, w, h, color| {
                let coverage = color.a() as f32 / 255.0;
                if coverage <= 0.0 {
                    return;
                }
                for dy in 0..h as i32 {
                    for dx in 0..w as i32 {
                        f(x + dx, y + dy - baseline, coverage);
                    }
                }
            },
        );
    }
}

impl TextRenderer for CosmicTextRenderer {
    fn extents(&mut self, text: &str, size: f64) -> TextExtents {
        let Some(buffer) = self.shape(text, size) else {
            return TextExtents::default();
        };
        let mut min = (i32::MAX, i32::MAX);
        let mut max = (i32::MIN, i32::MIN);
        self.rasterize(&buffer, |x, y, _| {
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x + 1), max.1.max(y + 1));
        });
        if min.0 > max.0 {
            return TextExtents::default();
        }
        TextExtents {
            x_bearing: min.0 as f64,
            y_bearing: min.1 as f64,
            width: (max.0 - min.0) as f64,
            height: (max.1 - min.1) as f64,
        }
    }

    fn draw(&mut self, text: &str, origin: DVec2, size: f64, color: Color, surface: &mut Surface) {
        let Some(buffer) = self.shape(text, size) else {
            return;
        };
        let (ox, oy) = (origin.x.round() as i64, origin.y.round() as i64);
        let (w, h) = (surface.width() as i64, surface.height() as i64);
        self.rasterize(&buffer, |x, y, coverage| {
            let (px, py) = (ox + x as i64, oy + y as i64);
            if px >= 0 && py >= 0 && px < w && py < h {
                surface.plot(px as usize, py as usize, color, coverage, Operator::Over);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unusable_size_measures_empty_and_draws_nothing() {
        let mut text = CosmicTextRenderer::new();
        for size in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert!(text.extents("Orion", size).is_empty());
        }

        let mut surface = Surface::new_filled(8, 8, Color::TRANSPARENT);
        text.draw("Orion", DVec2::new(1.0, 6.0), 0.0, Color::WHITE, &mut surface);
        assert!(surface.iter().all(|c| *c == Color::TRANSPARENT));
    }
}
