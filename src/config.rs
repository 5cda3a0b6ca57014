use std::path::PathBuf;

use clap::Parser;

/// Output image format for the packed channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[value(name = "png")]
    Png,
    #[value(name = "webp")]
    WebP,
}

impl OutputFormat {
    /// File extension used for written channel images.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "png"),
            OutputFormat::WebP => write!(f, "webp"),
        }
    }
}

/// Atlas sizing parameters.
#[derive(Debug, Clone)]
pub struct AtlasConfig {
    pub width: u32,
    pub height: u32,
    /// Retry with a larger atlas when the textures do not fit.
    pub grow: bool,
    /// Upper bound for either side when growing.
    pub max_size: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            grow: false,
            max_size: 8192,
        }
    }
}

/// Output parameters.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
        }
    }
}

/// Fully resolved pipeline configuration (constructed from CLI args).
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub atlas: AtlasConfig,
    pub output_options: OutputConfig,
    pub dry_run: bool,
    pub verbose: bool,
    pub threads: Option<usize>,
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "atlas-baker",
    about = "Pack textures into per-channel atlases and remap UVs",
    version
)]
pub struct CliArgs {
    /// Atlas manifest (.json) or a directory of images
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Output directory
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Atlas width and height in pixels
    #[arg(short = 's', long, default_value_t = 1024)]
    pub size: u32,

    /// Atlas width (overrides --size)
    #[arg(long)]
    pub width: Option<u32>,

    /// Atlas height (overrides --size)
    #[arg(long)]
    pub height: Option<u32>,

    /// Grow the atlas when textures do not fit
    #[arg(long)]
    pub grow: bool,

    /// Largest atlas side allowed when growing
    #[arg(long, default_value_t = 8192)]
    pub max_size: u32,

    /// Output image format: png or webp
    #[arg(long, value_enum, default_value = "png")]
    pub format: OutputFormat,

    /// Load and pack the input, report, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Worker thread count for image decoding (default: all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

impl From<CliArgs> for PipelineConfig {
    fn from(args: CliArgs) -> Self {
        PipelineConfig {
            input: args.input,
            output: args.output,
            atlas: AtlasConfig {
                width: args.width.unwrap_or(args.size),
                height: args.height.unwrap_or(args.size),
                grow: args.grow,
                max_size: args.max_size,
            },
            output_options: OutputConfig {
                format: args.format,
            },
            dry_run: args.dry_run,
            verbose: args.verbose,
            threads: args.threads,
        }
    }
}
