use glam::DVec2;

use super::Annotator;
use crate::canvas::Layer;
use crate::projection::{sky_bounds, Projector};
use crate::sky::SkyPoint;

/// Pixel spacing of the samples used to find the field's RA/Dec extent.
const BOUNDS_STEP: f64 = 100.0;
/// Straight pieces per grid line between the field bounds.
const SUBDIVISIONS: usize = 10;

impl<P: Projector + ?Sized> Annotator<'_, P> {
    /// RA/Dec grid on the foreground, one line every `spacing_arcmin`.
    pub fn draw_grid(&mut self, spacing_arcmin: f64) {
        if !(spacing_arcmin > 0.0) {
            tracing::warn!(spacing_arcmin, "Grid spacing must be positive");
            return;
        }
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let Some(bounds) = sky_bounds(self.projector, w, h, BOUNDS_STEP) else {
            tracing::warn!("Field does not de-project, skipping grid");
            return;
        };
        let step = spacing_arcmin / 60.0;
        let mut lines = 0usize;

        let mut dec = step * (bounds.dec_min / step).floor();
        while dec <= bounds.dec_max {
            let d = dec;
            lines += self.grid_line(|t| {
                SkyPoint::new(bounds.ra_min + t * (bounds.ra_max - bounds.ra_min), d)
            });
            dec += step;
        }

        let mut ra = step * (bounds.ra_min / step).floor();
        while ra <= bounds.ra_max {
            let r = ra;
            lines += self.grid_line(|t| {
                SkyPoint::new(r, bounds.dec_min + t * (bounds.dec_max - bounds.dec_min))
            });
            ra += step;
        }
        tracing::debug!(lines, spacing_arcmin, "Drew coordinate grid");
    }

    /// Samples `at(t)` for `t` in `[0, 1]` and strokes each run of projectable
    /// points. Returns the number of runs drawn.
    fn grid_line(&mut self, at: impl Fn(f64) -> SkyPoint) -> usize {
        let color = self.config.grid.color;
        let width = self.metrics.line_width;
        let mut runs = 0;
        let mut run: Vec<DVec2> = Vec::with_capacity(SUBDIVISIONS + 1);

        for i in 0..=SUBDIVISIONS {
            match self.projector.sky_to_pixel(at(i as f64 / SUBDIVISIONS as f64)) {
                Some(p) => run.push(p),
                None => {
                    if run.len() >= 2 {
                        self.canvas.stroke_polyline(Layer::Foreground, &run, color, width);
                        runs += 1;
                    }
                    run.clear();
                }
            }
        }
        if run.len() >= 2 {
            self.canvas.stroke_polyline(Layer::Foreground, &run, color, width);
            runs += 1;
        }
        runs
    }
}
