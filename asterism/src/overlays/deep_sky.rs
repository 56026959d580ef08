use glam::DVec2;

use super::Annotator;
use crate::catalog::SkyCatalog;
use crate::color::Color;
use crate::projection::Projector;
use crate::report::Annotation;

const MESSIER_PREFIX: &str = "M ";

impl<P: Projector + ?Sized> Annotator<'_, P> {
    /// NGC/IC objects large enough to matter at this field size, circled and
    /// labelled with all their designations.
    pub fn draw_deep_sky(&mut self, catalog: &dyn SkyCatalog) {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let Some(arcsec_per_unit) = self
            .projector
            .pixel_scale_arcsec(DVec2::new(w / 2.0, h / 2.0))
            .filter(|s| *s > 0.0)
        else {
            tracing::warn!("No pixel scale at field centre, skipping deep-sky objects");
            return;
        };
        let config = self.config;
        let options = &config.ngc;
        let min_size = arcsec_per_unit * w.min(h) / 60.0 * options.min_size_fraction;

        let size = self.metrics.font_size;
        let dy = self.half_ascent(size);
        let style = self.metrics.label_style(size, self.text_color(Color::WHITE));
        let mut drawn = 0usize;

        for object in catalog.deep_sky_objects() {
            if object.size_arcmin < min_size {
                continue;
            }
            let Some(at) = self.project_in_bounds(object.position()) else {
                continue;
            };
            let names: Vec<String> = object
                .names
                .iter()
                .filter(|name| !options.only_messier || name.starts_with(MESSIER_PREFIX))
                .cloned()
                .collect();
            if names.is_empty() {
                continue;
            }

            let text = names.join(" / ");
            let radius = object.size_arcmin * 60.0 / arcsec_per_unit / 2.0;
            self.output.annotations.push(Annotation::Ngc {
                names,
                pixelx: at.x,
                pixely: at.y,
                radius,
            });

            self.marker(at, radius, self.metrics.ngc_line_width);
            self.label(&text, at + DVec2::new(self.metrics.label_offset, dy), &style);
            self.output.list.push(text);
            drawn += 1;
        }
        tracing::debug!(drawn, min_size_arcmin = min_size, "Drew deep-sky objects");
    }
}
