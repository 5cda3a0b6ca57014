use std::io;

use crate::types::PixelFormat;

/// All error types for atlas construction and the baking pipeline.
#[derive(thiserror::Error, Debug)]
pub enum AtlasError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(PixelFormat),
    #[error("Texture {name} does not fit into a {width}x{height} atlas")]
    PackingFailure {
        name: String,
        width: u32,
        height: u32,
    },
    #[error(
        "Secondary texture {name} is {}x{} but its tile is {}x{}",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        name: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("Cannot add texture {name} to channel {channel} without a source texture")]
    NoSourceTexture { name: String, channel: String },
    #[error("Cannot find source texture {source_name} for {name}")]
    MissingSourceTile { name: String, source_name: String },
    #[error("Input error: {0}")]
    Input(String),
    #[error("Output error: {0}")]
    Output(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AtlasError {
    /// Whether retrying with a larger atlas could make this error go away.
    pub fn is_packing_failure(&self) -> bool {
        matches!(self, AtlasError::PackingFailure { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AtlasError>;
