use std::io;
use std::path::PathBuf;

use common::SerdeFormatError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Configuration error: {0}")]
    Config(#[from] SerdeFormatError),
    #[error("Resource unavailable: {path}")]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: usize, height: usize },
    #[error("Invalid scale {0}, must be finite and positive")]
    InvalidScale(f64),
    #[error("Invalid {field} {value}, must be {requirement}")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        requirement: &'static str,
    },
    #[error("Base image is {actual_width}x{actual_height}, canvas is {width}x{height}")]
    SizeMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a single record, point or segment was dropped. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum SkipReason {
    /// The projector has no pixel for the sky point.
    ProjectionFailure,
    /// The input line is neither a header nor a segment.
    MalformedRecord,
    /// Zero-length or non-finite geometry after clipping or trimming.
    DegenerateGeometry,
}
