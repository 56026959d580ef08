//! Commonly used types and traits.
//!
//! ```rust,ignore
//! use asterism::prelude::*;
//! ```

// Sky and projection
pub use crate::{Projector, SkyPoint, Wcs};

// Drawing
pub use crate::{Color, CosmicTextRenderer, HAlign, LayeredCanvas, TextRenderer, VAlign};
pub use crate::{PngSink, PpmSink, RasterSink};

// Annotation
pub use crate::{AnnotateConfig, AnnotationOutput, Annotator, Catalog, SkyCatalog, UserPointKind};

pub use crate::{Error, Result};
