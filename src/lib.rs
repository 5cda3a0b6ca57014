pub mod atlas;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod pipeline;
pub mod types;

pub use atlas::TextureAtlas;
pub use config::{AtlasConfig, OutputFormat, PipelineConfig};
pub use error::{AtlasError, Result};
pub use pipeline::Pipeline;
