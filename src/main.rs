use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use atlas_baker::config::{CliArgs, PipelineConfig};
use atlas_baker::pipeline::Pipeline;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Init tracing
    let filter = if args.verbose {
        EnvFilter::new("atlas_baker=debug")
    } else {
        EnvFilter::new("atlas_baker=info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config: PipelineConfig = args.into();

    // Configure rayon thread pool
    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure rayon thread pool")?;
    }

    match Pipeline::run(&config) {
        Ok(result) if config.dry_run => {
            println!(
                "Dry run: {} tiles fit a {}x{} atlas ({:.2}s)",
                result.tile_count,
                result.atlas_width,
                result.atlas_height,
                result.duration.as_secs_f64()
            );
            Ok(())
        }
        Ok(result) => {
            println!(
                "Done: {} tiles in {} channels, {}x{} atlas, {:.2}s",
                result.tile_count,
                result.channel_count,
                result.atlas_width,
                result.atlas_height,
                result.duration.as_secs_f64()
            );
            Ok(())
        }
        Err(e) => {
            error!(%e, "Pipeline failed");
            Err(anyhow::anyhow!(e)).context("atlas-baker pipeline failed")
        }
    }
}
