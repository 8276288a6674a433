mod commands;
mod image_processor;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gallery_core::config::{DEFAULT_COLUMNS, DEFAULT_IMAGES_PER_PAGE, DEFAULT_TITLE};
use gallery_core::{GalleryBuildConfig, ThumbnailSize};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Static photo gallery builder with thumbnails, lightbox and likes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a gallery from a folder of images
    Build {
        /// Directory containing the source images
        input: PathBuf,

        /// Directory to write the gallery into
        #[arg(default_value = "./gallery_output")]
        output: PathBuf,

        /// Thumbnail bounding box, WIDTHxHEIGHT or a single size
        #[arg(short, long, default_value_t = ThumbnailSize::default())]
        thumb_size: ThumbnailSize,

        /// Images shown per page
        #[arg(short, long, default_value_t = DEFAULT_IMAGES_PER_PAGE)]
        per_page: usize,

        /// Column hint; the grid is responsive and does not use it
        #[arg(long, default_value_t = DEFAULT_COLUMNS)]
        columns: u32,

        /// Page title
        #[arg(long, default_value = DEFAULT_TITLE)]
        title: String,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallery_cli=info,gallery_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            thumb_size,
            per_page,
            columns,
            title,
        } => {
            let config = GalleryBuildConfig {
                title,
                thumbnail_max_size: thumb_size,
                columns,
                images_per_page: per_page,
            };
            commands::build::execute(input, output, config)?;
        }
    }

    Ok(())
}
