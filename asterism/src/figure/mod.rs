//! Streaming stick-figure drawer.
//!
//! Records arrive one at a time. Segments are clipped, trimmed and stroked as
//! they come; a figure's label is placed when the next header or the end of
//! input closes it. The box of the most recent label stays live until the
//! next label replaces it, and segments crossing it are not drawn.

mod record;


use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::DVec2;

use crate::canvas::LayeredCanvas;
use crate::color::Color;
use crate::error::{Error, Result, SkipReason};
use crate::geometry::{clip_segment, LabelBox, Segment};
use crate::label::{place_label_at_sky, LabelStyle};
use crate::projection::Projector;
use crate::sky::{CentroidAccumulator, SkyPoint};
use crate::text::TextRenderer;

pub use record::{parse_record, FigureStar, Record};

/// Trim per segment end is capped at this fraction of the segment length.
pub const MAX_TRIM_FRACTION: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureStyle {
    pub line_color: Color,
    pub line_width: f64,
    /// Distance pulled in from each end so lines stop short of star markers.
    pub end_trim: f64,
    /// Title label style, normally centred on the anchor.
    pub label: LabelStyle,
}

/// A figure label that made it onto the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLabel {
    pub text: String,
    pub anchor: SkyPoint,
    pub position: DVec2,
    /// Every endpoint of the figure was on screen.
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FigureStats {
    pub groups: usize,
    pub segments_drawn: usize,
    pub segments_suppressed: usize,
    pub labels: Vec<FigureLabel>,
    pub skipped: HashMap<SkipReason, usize>,
}

impl FigureStats {
    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    fn skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_default() += 1;
    }
}

/// Draws labelled segment groups onto a [`LayeredCanvas`].
pub struct FigureDrawer<'a, P: Projector + ?Sized> {
    canvas: &'a mut LayeredCanvas,
    renderer: &'a mut dyn TextRenderer,
    projector: &'a P,
    style: FigureStyle,
    marker: char,

    label: String,
    open: bool,
    centroid: CentroidAccumulator,
    visible_endpoints: usize,
    endpoints: usize,
    exclusion: Option<LabelBox>,

    stats: FigureStats,
}

impl<'a, P: Projector + ?Sized> FigureDrawer<'a, P> {
    pub fn new(
        canvas: &'a mut LayeredCanvas,
        renderer: &'a mut dyn TextRenderer,
        projector: &'a P,
        style: FigureStyle,
    ) -> Self {
        Self {
            canvas,
            renderer,
            projector,
            style,
            marker: '#',
            label: String::new(),
            open: false,
            centroid: CentroidAccumulator::new(),
            visible_endpoints: 0,
            endpoints: 0,
            exclusion: None,
            stats: FigureStats::default(),
        }
    }

    /// Character that starts a header line.
    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    /// Stroke colour for segments from here on.
    pub fn set_line_color(&mut self, color: Color) {
        self.style.line_color = color;
    }

    /// Exclusion box of the most recently placed label, if any.
    pub fn exclusion(&self) -> Option<LabelBox> {
        self.exclusion
    }

    pub fn stats(&self) -> &FigureStats {
        &self.stats
    }

    /// Feeds one text line.
    pub fn line(&mut self, line: &str) {
        match parse_record(line, self.marker) {
            Record::Header(label) => self.header(label),
            Record::Segment(a, b) => self.segment(a.position, b.position),
            Record::Blank => {}
            Record::Malformed => {
                tracing::trace!(line, "Skipping malformed figure record");
                self.stats.skip(SkipReason::MalformedRecord);
            }
        }
    }

    /// Feeds every line, then closes the last figure.
    pub fn draw_lines<I, S>(mut self, lines: I) -> FigureStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line.as_ref());
        }
        self.finish()
    }

    /// Closes the open figure and starts a new one called `label`.
    pub fn header(&mut self, label: impl Into<String>) {
        self.flush();
        self.label = label.into();
        self.open = true;
    }

    pub fn segment(&mut self, a: SkyPoint, b: SkyPoint) {
        self.open = true;
        self.centroid.add(a);
        self.centroid.add(b);
        self.endpoints += 2;

        let (Some(pa), Some(pb)) = (
            self.projector.sky_to_pixel(a),
            self.projector.sky_to_pixel(b),
        ) else {
            tracing::trace!(?a, ?b, "Segment endpoint does not project");
            self.stats.skip(SkipReason::ProjectionFailure);
            return;
        };

        let (width, height) = (self.canvas.width(), self.canvas.height());
        let on_screen = |p: DVec2| p.x >= 0.0 && p.x < width && p.y >= 0.0 && p.y < height;
        self.visible_endpoints += on_screen(pa) as usize + on_screen(pb) as usize;

        let Some(clipped) = clip_segment(&Segment::new(pa, pb), width, height) else {
            // Entirely off screen is the common case, not worth a skip count.
            return;
        };
        let Some(trimmed) = clipped.trimmed(self.style.end_trim, MAX_TRIM_FRACTION) else {
            self.stats.skip(SkipReason::DegenerateGeometry);
            return;
        };

        if self.exclusion.is_some_and(|b| b.intersects_segment(&trimmed)) {
            self.stats.segments_suppressed += 1;
            return;
        }
        self.canvas
            .stroke_shape_line(&trimmed, self.style.line_color, self.style.line_width);
        self.stats.segments_drawn += 1;
    }

    /// Places the open figure's label if any of it was on screen, then resets
    /// the per-figure state.
    pub fn flush(&mut self) {
        if self.open {
            self.stats.groups += 1;
            self.place_title();
        }
        self.label.clear();
        self.open = false;
        self.centroid.reset();
        self.visible_endpoints = 0;
        self.endpoints = 0;
    }

    fn place_title(&mut self) {
        if self.label.is_empty() || self.visible_endpoints == 0 {
            return;
        }
        let Some(anchor) = self.centroid.finalize() else {
            tracing::debug!(label = %self.label, "Figure centroid is degenerate");
            self.stats.skip(SkipReason::DegenerateGeometry);
            return;
        };
        let Some(placed) = place_label_at_sky(
            self.canvas,
            self.renderer,
            self.projector,
            &self.label,
            anchor,
            &self.style.label,
        ) else {
            self.stats.skip(SkipReason::ProjectionFailure);
            return;
        };

        tracing::debug!(label = %self.label, x = placed.position.x, y = placed.position.y, "Placed figure label");
        self.exclusion = placed.label_box;
        self.stats.labels.push(FigureLabel {
            text: self.label.clone(),
            anchor,
            position: placed.position,
            complete: self.visible_endpoints == self.endpoints,
        });
    }

    /// Closes the last figure and returns the counters.
    pub fn finish(mut self) -> FigureStats {
        self.flush();
        self.stats
    }
}

/// Draws a figure definition file.
///
/// A file that cannot be opened is [`Error::ResourceUnavailable`]; the caller
/// reports it and carries on without the overlay. A read error part way
/// through keeps everything drawn so far.
pub fn draw_figure_file<P: Projector + ?Sized>(
    path: &Path,
    canvas: &mut LayeredCanvas,
    renderer: &mut dyn TextRenderer,
    projector: &P,
    style: FigureStyle,
    marker: char,
) -> Result<FigureStats> {
    let file = File::open(path).map_err(|source| Error::ResourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut drawer = FigureDrawer::new(canvas, renderer, projector, style).with_marker(marker);
    for line in BufReader::new(file).lines() {
        match line {
            Ok(line) => drawer.line(&line),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "Stopped reading figure file");
                break;
            }
        }
    }
    let stats = drawer.finish();
    tracing::info!(
        path = %path.display(),
        groups = stats.groups,
        segments = stats.segments_drawn,
        labels = stats.labels.len(),
        "Drew custom figures"
    );
    Ok(stats)
}
