use std::path::Path;

use glam::DVec2;

use super::Annotator;
use crate::catalog::{read_user_points, BrightStar, SkyCatalog, UserPoint};
use crate::color::Color;
use crate::projection::Projector;
use crate::report::Annotation;

/// Which user list a point came from; decides colour and font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum UserPointKind {
    Ephemeris,
    Custom,
}

impl<P: Projector + ?Sized> Annotator<'_, P> {
    /// Named bright stars on the canvas, brightest first when limited.
    pub fn draw_bright_stars(&mut self, catalog: &dyn SkyCatalog) {
        let config = self.config;
        let options = &config.bright_stars;
        let mut visible: Vec<(&BrightStar, DVec2)> = catalog
            .bright_stars()
            .iter()
            .filter(|star| !star.name.is_empty())
            .filter(|star| !options.common_only || star.has_common_name())
            .filter(|star| {
                !(star.has_common_name() && options.excluded_names.contains(&star.common_name))
            })
            .filter_map(|star| Some((star, self.project_in_bounds(star.position())?)))
            .collect();

        if options.limit > 0 && visible.len() > options.limit {
            visible.sort_by(|a, b| a.0.vmag.total_cmp(&b.0.vmag));
            visible.truncate(options.limit);
        }
        tracing::debug!(count = visible.len(), "Bright stars in view");

        let size = self.metrics.font_size;
        let dy = self.half_ascent(size);
        let style = self
            .metrics
            .label_style(size, self.text_color(Color::LIGHT_BLUE));
        let short_labels = options.common_only || options.print_common_only;

        for (star, at) in visible {
            let text = match (star.has_common_name(), short_labels) {
                (true, true) => star.common_name.clone(),
                (true, false) => format!("{} ({})", star.common_name, star.name),
                (false, _) => star.name.clone(),
            };

            let mut names = Vec::with_capacity(2);
            if star.has_common_name() {
                names.push(star.common_name.clone());
            }
            names.push(star.name.clone());
            self.output.annotations.push(Annotation::Star {
                pixelx: at.x,
                pixely: at.y,
                name: names[0].clone(),
                names,
            });
            self.output.list.push(if star.has_common_name() {
                format!("The star {} ({})", star.common_name, star.name)
            } else {
                format!("The star {}", star.name)
            });

            self.marker(at, self.metrics.marker_radius, self.metrics.line_width);
            self.label(&text, at + DVec2::new(self.metrics.label_offset, dy), &style);
        }
    }

    /// Henry Draper stars, labelled "HD n" centred above the star.
    pub fn draw_hd_stars(&mut self, catalog: &dyn SkyCatalog) {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let (Some(center), Some(corner)) = (
            self.projector.pixel_to_sky(DVec2::new(w / 2.0, h / 2.0)),
            self.projector.pixel_to_sky(DVec2::ZERO),
        ) else {
            tracing::warn!("Field centre does not de-project, skipping HD stars");
            return;
        };
        let radius = center.angular_distance_arcsec(corner) * 1.1;
        let stars = catalog.hd_stars_near(center, radius);
        tracing::debug!(count = stars.len(), radius_arcsec = radius, "HD stars near field");

        let size = self.metrics.font_size;
        let style = self.metrics.label_style(size, Color::WHITE);
        for star in stars {
            let Some(at) = self.project_in_bounds(star.position()) else {
                tracing::trace!(hd = star.hd, "HD star out of bounds");
                continue;
            };
            let text = format!("HD {}", star.hd);
            let width = self.canvas.text_extents(self.renderer, &text, size).width;
            let origin = at - DVec2::new(width * 0.5, self.metrics.marker_radius + 4.0);

            self.marker(at, self.metrics.marker_radius, self.metrics.line_width);
            self.label(&text, origin, &style);
            self.output.annotations.push(Annotation::Hd {
                pixelx: origin.x,
                pixely: origin.y,
                name: text.clone(),
            });
            self.output.list.push(text);
        }
    }

    /// Labels user-supplied points just right of their position.
    pub fn draw_user_points(&mut self, points: &[UserPoint], kind: UserPointKind) {
        let (size, color) = match kind {
            UserPointKind::Ephemeris => (self.metrics.ephemeris_font_size, Color::BLUE),
            UserPointKind::Custom => (self.metrics.font_size, Color::LIGHT_BLUE),
        };
        let style = self.metrics.label_style(size, self.text_color(color));
        let mut drawn = 0usize;
        for point in points {
            let Some(at) = self.project_in_bounds(point.position) else {
                continue;
            };
            self.label(&point.name, at + DVec2::new(self.metrics.label_offset, 0.0), &style);
            self.output.list.push(point.name.clone());
            drawn += 1;
        }
        tracing::debug!(%kind, total = points.len(), drawn, "Drew user points");
    }

    /// [`Annotator::draw_user_points`] from a `name ra dec` file. A missing file
    /// is logged and the pass continues.
    pub fn draw_user_point_file(&mut self, path: &Path, kind: UserPointKind) {
        match read_user_points(path) {
            Ok(points) => self.draw_user_points(&points, kind),
            Err(err) => tracing::warn!(%err, %kind, "Skipping user points"),
        }
    }
}
