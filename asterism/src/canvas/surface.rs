use common::Buffer2;

use crate::color::Color;

/// RGBA drawing layer, straight alpha, pixel-sized.
pub type Surface = Buffer2<Color>;

/// Single-channel opacity layer in [0, 1].
pub type Mask = Buffer2<f32>;

/// How a primitive combines with what is already on the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    /// Blend on top, weighted by the source alpha.
    #[default]
    Over,
    /// Overwrite, weighted only by geometric coverage.
    Replace,
}

/// A pixel layer the raster primitives can write to.
pub trait Plot {
    type Paint: Copy;

    fn plot_width(&self) -> usize;
    fn plot_height(&self) -> usize;

    /// Applies `paint` to pixel `(x, y)` with anti-aliasing `coverage` in (0, 1].
    fn plot(&mut self, x: usize, y: usize, paint: Self::Paint, coverage: f32, op: Operator);
}

impl Plot for Surface {
    type Paint = Color;

    fn plot_width(&self) -> usize {
        self.width()
    }

    fn plot_height(&self) -> usize {
        self.height()
    }

    #[inline]
    fn plot(&mut self, x: usize, y: usize, paint: Color, coverage: f32, op: Operator) {
        let dst = &mut self[(x, y)];
        *dst = match op {
            Operator::Over => paint.over(*dst, coverage),
            Operator::Replace => {
                let lerp = |s: f32, d: f32| s * coverage + d * (1.0 - coverage);
                Color::new(
                    lerp(paint.r, dst.r),
                    lerp(paint.g, dst.g),
                    lerp(paint.b, dst.b),
                    lerp(paint.a, dst.a),
                )
            }
        };
    }
}

impl Plot for Mask {
    type Paint = f32;

    fn plot_width(&self) -> usize {
        self.width()
    }

    fn plot_height(&self) -> usize {
        self.height()
    }

    #[inline]
    fn plot(&mut self, x: usize, y: usize, paint: f32, coverage: f32, op: Operator) {
        let dst = &mut self[(x, y)];
        let value = match op {
            Operator::Over => {
                let sa = paint * coverage;
                sa + *dst * (1.0 - sa)
            }
            Operator::Replace => paint * coverage + *dst * (1.0 - coverage),
        };
        *dst = value.clamp(0.0, 1.0);
    }
}
