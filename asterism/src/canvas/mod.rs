//! Four-layer drawing canvas and its compositor.
//!
//! Drawing calls take logical coordinates. The canvas multiplies them by its
//! `scale` exactly once on the way to the pixel layers, so callers never
//! rescale lengths themselves.

mod composite;
mod raster;
mod sink;
mod surface;

use glam::DVec2;
use image::RgbaImage;

pub use raster::{fill_rect, stroke_circle, stroke_line, stroke_polyline};
pub use sink::{load_base_image, PngSink, PpmSink, RasterSink};
pub use surface::{Mask, Operator, Plot, Surface};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{LabelBox, Segment};
use crate::text::{TextExtents, TextRenderer};

/// RGBA layers of a [`LayeredCanvas`]. The shapes mask is addressed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Layer {
    Background,
    Shapes,
    Foreground,
}

#[derive(Debug, Clone)]
pub struct LayeredCanvas {
    scale: f64,
    background: Surface,
    shapes: Surface,
    mask: Mask,
    foreground: Surface,
}

impl LayeredCanvas {
    /// Creates an empty canvas of `width x height` output pixels.
    ///
    /// The shapes mask starts fully opaque so everything shows until a label
    /// carves it out.
    pub fn new(width: usize, height: usize, scale: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidCanvas { width, height });
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidScale(scale));
        }
        tracing::debug!(width, height, scale, "Created layered canvas");
        Ok(Self {
            scale,
            background: Surface::new_default(width, height),
            shapes: Surface::new_default(width, height),
            mask: Mask::new_filled(width, height, 1.0),
            foreground: Surface::new_default(width, height),
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pixel_width(&self) -> usize {
        self.mask.width()
    }

    pub fn pixel_height(&self) -> usize {
        self.mask.height()
    }

    /// Width in logical units, the space all drawing calls use.
    pub fn width(&self) -> f64 {
        self.pixel_width() as f64 / self.scale
    }

    pub fn height(&self) -> f64 {
        self.pixel_height() as f64 / self.scale
    }

    pub fn surface(&self, layer: Layer) -> &Surface {
        match layer {
            Layer::Background => &self.background,
            Layer::Shapes => &self.shapes,
            Layer::Foreground => &self.foreground,
        }
    }

    fn surface_mut(&mut self, layer: Layer) -> &mut Surface {
        match layer {
            Layer::Background => &mut self.background,
            Layer::Shapes => &mut self.shapes,
            Layer::Foreground => &mut self.foreground,
        }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    #[inline]
    fn px(&self, p: DVec2) -> DVec2 {
        p * self.scale
    }

    pub fn stroke_line(&mut self, layer: Layer, segment: &Segment, color: Color, width: f64) {
        let (a, b, w) = (self.px(segment.a), self.px(segment.b), width * self.scale);
        stroke_line(self.surface_mut(layer), a, b, w, color, Operator::Over);
    }

    pub fn stroke_polyline(&mut self, layer: Layer, points: &[DVec2], color: Color, width: f64) {
        let scaled: Vec<DVec2> = points.iter().map(|&p| self.px(p)).collect();
        let w = width * self.scale;
        stroke_polyline(self.surface_mut(layer), &scaled, w, color, Operator::Over);
    }

    pub fn stroke_circle(
        &mut self,
        layer: Layer,
        center: DVec2,
        radius: f64,
        color: Color,
        width: f64,
    ) {
        let (c, r, w) = (self.px(center), radius * self.scale, width * self.scale);
        stroke_circle(self.surface_mut(layer), c, r, w, color, Operator::Over);
    }

    /// Strokes a figure line onto the shapes layer and marks it fully opaque in
    /// the mask, whatever its colour.
    pub fn stroke_shape_line(&mut self, segment: &Segment, color: Color, width: f64) {
        self.stroke_line(Layer::Shapes, segment, color, width);
        let (a, b, w) = (self.px(segment.a), self.px(segment.b), width * self.scale);
        stroke_line(&mut self.mask, a, b, w, 1.0, Operator::Over);
    }

    pub fn stroke_shape_circle(&mut self, center: DVec2, radius: f64, color: Color, width: f64) {
        self.stroke_circle(Layer::Shapes, center, radius, color, width);
        let (c, r, w) = (self.px(center), radius * self.scale, width * self.scale);
        stroke_circle(&mut self.mask, c, r, w, 1.0, Operator::Over);
    }

    /// Replaces the mask under `rect` with full transparency, hiding the
    /// background and shapes there at composite time.
    pub fn cut_out(&mut self, rect: &LabelBox) {
        if rect.is_degenerate() {
            return;
        }
        let (min, max) = (self.px(rect.min()), self.px(rect.max()));
        fill_rect(&mut self.mask, min, max, 0.0, Operator::Replace);
    }

    /// Extents of `text` at logical font `size`, in logical units.
    pub fn text_extents(&self, renderer: &mut dyn TextRenderer, text: &str, size: f64) -> TextExtents {
        renderer
            .extents(text, size * self.scale)
            .scaled(1.0 / self.scale)
    }

    /// Draws `text` on the foreground with its baseline at logical `origin`.
    pub fn draw_text(
        &mut self,
        renderer: &mut dyn TextRenderer,
        text: &str,
        origin: DVec2,
        size: f64,
        color: Color,
    ) {
        let (o, s) = (self.px(origin), size * self.scale);
        renderer.draw(text, o, s, color, &mut self.foreground);
    }

    /// Composites all layers onto `base` (or opaque black) into one image.
    pub fn flatten(&self, base: Option<&RgbaImage>) -> Result<RgbaImage> {
        composite::flatten(
            &self.background,
            &self.shapes,
            &self.mask,
            &self.foreground,
            base,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates() {
        assert!(matches!(
            LayeredCanvas::new(0, 10, 1.0),
            Err(Error::InvalidCanvas { width: 0, height: 10 })
        ));
        assert!(matches!(LayeredCanvas::new(10, 10, 0.0), Err(Error::InvalidScale(_))));
        assert!(matches!(
            LayeredCanvas::new(10, 10, f64::NAN),
            Err(Error::InvalidScale(_))
        ));
    }

    #[test]
    fn test_mask_starts_opaque() {
        let c = LayeredCanvas::new(8, 8, 1.0).unwrap();
        assert!(c.mask().iter().all(|&m| m == 1.0));
    }

    #[test]
    fn test_scale_applies_once() {
        let mut c = LayeredCanvas::new(200, 100, 2.0).unwrap();
        assert_eq!(c.width(), 100.0);
        assert_eq!(c.height(), 50.0);

        // Logical (40, 20)..(60, 20) lands on pixel row 40, columns 80..120.
        let seg = Segment::new(DVec2::new(40.0, 20.25), DVec2::new(60.0, 20.25));
        c.stroke_line(Layer::Shapes, &seg, Color::WHITE, 0.5);
        assert!(c.surface(Layer::Shapes)[(100, 40)].a > 0.99);
        assert_eq!(c.surface(Layer::Shapes)[(50, 20)], Color::TRANSPARENT);
    }

    #[test]
    fn test_cut_out_replaces_mask() {
        let mut c = LayeredCanvas::new(50, 50, 1.0).unwrap();
        c.stroke_shape_line(
            &Segment::new(DVec2::new(0.0, 25.5), DVec2::new(50.0, 25.5)),
            Color::RED,
            2.0,
        );
        c.cut_out(&LabelBox::new(10.0, 20.0, 10.0, 10.0));
        assert_eq!(c.mask()[(15, 25)], 0.0);
        assert_eq!(c.mask()[(30, 25)], 1.0);

        let out = c.flatten(None).unwrap();
        assert_eq!(out.get_pixel(15, 25).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(30, 25).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_degenerate_cut_out_is_noop() {
        let mut c = LayeredCanvas::new(10, 10, 1.0).unwrap();
        c.cut_out(&LabelBox::new(2.0, 2.0, 0.0, 5.0));
        assert!(c.mask().iter().all(|&m| m == 1.0));
    }
}
