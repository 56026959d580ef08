//! Catalog-driven overlays drawn in one annotation pass.
//!
//! [`Annotator`] owns nothing: it borrows the canvas, the text renderer and
//! the projector for the duration of the pass and collects what it labelled.

mod deep_sky;
mod grid;
mod stars;

#[cfg(test)]
mod tests;

use std::path::Path;

use glam::DVec2;

use crate::canvas::{Layer, LayeredCanvas};
use crate::catalog::SkyCatalog;
use crate::color::{color_for_id, Color};
use crate::config::{AnnotateConfig, RenderMetrics};
use crate::figure::{draw_figure_file, FigureDrawer, FigureStats, FigureStyle};
use crate::label::{place_label, HAlign, LabelPlacement, LabelStyle, VAlign};
use crate::projection::Projector;
use crate::report::{Annotation, AnnotationReport};
use crate::sky::SkyPoint;
use crate::text::TextRenderer;

pub use stars::UserPointKind;

/// What an annotation pass labelled.
#[derive(Debug, Clone, Default)]
pub struct AnnotationOutput {
    /// Human-readable lines, one per labelled object, in drawing order.
    pub list: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub figures: FigureStats,
}

impl AnnotationOutput {
    pub fn report(&self) -> AnnotationReport {
        AnnotationReport::solved(self.annotations.clone())
    }
}

pub struct Annotator<'a, P: Projector + ?Sized> {
    config: &'a AnnotateConfig,
    metrics: RenderMetrics,
    projector: &'a P,
    canvas: &'a mut LayeredCanvas,
    renderer: &'a mut dyn TextRenderer,
    output: AnnotationOutput,
}

impl<'a, P: Projector + ?Sized> Annotator<'a, P> {
    pub fn new(
        config: &'a AnnotateConfig,
        projector: &'a P,
        canvas: &'a mut LayeredCanvas,
        renderer: &'a mut dyn TextRenderer,
    ) -> Self {
        Self {
            config,
            metrics: config.metrics(),
            projector,
            canvas,
            renderer,
            output: AnnotationOutput::default(),
        }
    }

    /// Runs every overlay the config enables, in the fixed order grid,
    /// constellations, bright stars, deep sky, HD.
    pub fn draw_catalog_overlays(&mut self, catalog: &dyn SkyCatalog) {
        if let Some(spacing) = self.config.grid.spacing_arcmin {
            self.draw_grid(spacing);
        }
        if self.config.constellations.enabled {
            self.draw_constellations(catalog);
        }
        if self.config.bright_stars.enabled {
            self.draw_bright_stars(catalog);
        }
        if self.config.ngc.enabled {
            self.draw_deep_sky(catalog);
        }
        if self.config.hd.enabled {
            self.draw_hd_stars(catalog);
        }
    }

    pub fn finish(self) -> AnnotationOutput {
        self.output
    }

    fn figure_style(&self, line_color: Color) -> FigureStyle {
        FigureStyle {
            line_color,
            line_width: self.metrics.line_width,
            end_trim: self.metrics.end_trim,
            label: LabelStyle {
                size: self.metrics.title_font_size,
                color: Color::WHITE,
                halign: HAlign::Center,
                valign: VAlign::Center,
                margin: self.metrics.label_margin,
            },
        }
    }

    /// Constellation stick figures, each labelled at its spherical centre.
    pub fn draw_constellations(&mut self, catalog: &dyn SkyCatalog) {
        let constellations = catalog.constellations();
        let base = self.figure_style(self.config.line_color.unwrap_or(Color::WHITE));
        let mut drawer = FigureDrawer::new(self.canvas, self.renderer, self.projector, base);

        for (index, constellation) in constellations.iter().enumerate() {
            drawer.header(constellation.long_name.as_str());
            let color = self
                .config
                .line_color
                .unwrap_or_else(|| color_for_id(index as u64));
            drawer.set_line_color(color);
            for [a, b] in &constellation.lines {
                drawer.segment(*a, *b);
            }
        }
        let stats = drawer.finish();

        for label in &stats.labels {
            let short = constellations
                .iter()
                .find(|c| c.long_name == label.text)
                .map_or("", |c| c.short_name.as_str());
            let prefix = if label.complete {
                "The constellation"
            } else {
                "Part of the constellation"
            };
            self.output.list.push(format!("{prefix} {} ({short})", label.text));
        }
        tracing::info!(
            constellations = constellations.len(),
            labelled = stats.labels.len(),
            segments = stats.segments_drawn,
            "Drew constellations"
        );
        self.merge_figure_stats(stats);
    }

    /// User stick figures from a definition file. A missing file is logged and
    /// the pass continues.
    pub fn draw_custom_figures(&mut self, path: &Path) {
        let style = self.figure_style(self.config.line_color.unwrap_or(Color::WHITE));
        match draw_figure_file(
            path,
            self.canvas,
            self.renderer,
            self.projector,
            style,
            self.config.figure_marker,
        ) {
            Ok(stats) => self.merge_figure_stats(stats),
            Err(err) => tracing::warn!(%err, "Skipping custom figures"),
        }
    }

    fn merge_figure_stats(&mut self, stats: FigureStats) {
        let total = &mut self.output.figures;
        total.groups += stats.groups;
        total.segments_drawn += stats.segments_drawn;
        total.segments_suppressed += stats.segments_suppressed;
        total.labels.extend(stats.labels);
        for (reason, count) in stats.skipped {
            *total.skipped.entry(reason).or_default() += count;
        }
    }

    /// Projects `sky` and keeps it only when it lands on the canvas (edges included).
    fn project_in_bounds(&self, sky: SkyPoint) -> Option<DVec2> {
        let p = self.projector.sky_to_pixel(sky)?;
        let (w, h) = (self.canvas.width(), self.canvas.height());
        (p.x >= 0.0 && p.y >= 0.0 && p.x <= w && p.y <= h).then_some(p)
    }

    fn label(&mut self, text: &str, at: DVec2, style: &LabelStyle) -> LabelPlacement {
        place_label(self.canvas, self.renderer, text, at, style)
    }

    /// Half the ascent of the normal label font, used to centre a label
    /// vertically on its object.
    fn half_ascent(&mut self, size: f64) -> f64 {
        -0.5 * self.canvas.text_extents(self.renderer, "H", size).y_bearing
    }

    /// Optional circle marker with a dark halo behind it.
    fn marker(&mut self, at: DVec2, radius: f64, width: f64) {
        if !self.config.draw_markers || !(radius > 0.0) {
            return;
        }
        self.canvas
            .stroke_circle(Layer::Background, at, radius + 1.0, Color::BLACK, width);
        self.canvas.stroke_shape_circle(at, radius, Color::WHITE, width);
    }

    fn text_color(&self, color: Color) -> Color {
        if self.config.white_text {
            Color::WHITE
        } else {
            color
        }
    }
}
