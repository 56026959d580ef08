//! Asterism - sky image annotation.
//!
//! Draws astronomical overlays onto a plate-solved image:
//! - Constellation stick figures and user figure files, labelled at their
//!   spherical centre
//! - Bright star, NGC/IC and Henry Draper labels
//! - An RA/Dec coordinate grid
//!
//! Everything is drawn on a [`LayeredCanvas`] whose shapes mask lets labels
//! hide the lines beneath them regardless of drawing order.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use asterism::prelude::*;
//!
//! let wcs: Wcs = common::load_file(Path::new("field.wcs.yaml"))?;
//! let config = AnnotateConfig::load(Path::new("annotate.yaml"))?;
//! let catalog = Catalog::load(Path::new("catalog.yaml"))?;
//!
//! let mut canvas = LayeredCanvas::new(4096, 2730, config.scale)?;
//! let mut text = CosmicTextRenderer::new();
//! let mut annotator = Annotator::new(&config, &wcs, &mut canvas, &mut text);
//! annotator.draw_catalog_overlays(&catalog);
//! let output = annotator.finish();
//!
//! PngSink::new("annotated.png").write_image(&canvas.flatten(None)?)?;
//! ```

pub mod canvas;
pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod figure;
pub mod geometry;
pub mod label;
pub mod overlays;
pub mod projection;
pub mod report;
pub mod sky;
pub mod text;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude;

// ============================================================================
// Sky and projection
// ============================================================================

pub use projection::{sky_bounds, Projector, SkyBounds, Wcs};
pub use sky::{CentroidAccumulator, SkyPoint};

// ============================================================================
// Drawing
// ============================================================================

pub use canvas::{Layer, LayeredCanvas, PngSink, PpmSink, RasterSink};
pub use color::Color;
pub use geometry::{LabelBox, Segment};
pub use label::{place_label, place_label_at_sky, HAlign, LabelPlacement, LabelStyle, VAlign};
pub use text::{CosmicTextRenderer, TextExtents, TextRenderer};

// ============================================================================
// Figures and overlays
// ============================================================================

pub use catalog::{Catalog, SkyCatalog, UserPoint};
pub use config::{AnnotateConfig, RenderMetrics};
pub use figure::{draw_figure_file, FigureDrawer, FigureLabel, FigureStats, FigureStyle};
pub use overlays::{AnnotationOutput, Annotator, UserPointKind};
pub use report::{Annotation, AnnotationReport};

// ============================================================================
// Errors
// ============================================================================

pub use error::{Error, Result, SkipReason};
