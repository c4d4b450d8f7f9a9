//! orb-export - ORB model export tool
//!
//! Converts JSON scene descriptions to binary .orb model files

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use orb_export::{config, info, saver, scene, ExportConfig, ORB_EXT};

#[derive(Parser)]
#[command(name = "orb-export")]
#[command(about = "ORB model export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene description to an .orb file
    Export {
        /// Input scene (JSON)
        input: PathBuf,

        /// Output .orb file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export config (vertex formats, quantization)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the section table of an .orb file
    Info {
        /// Input .orb file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            config,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(ORB_EXT));
            let config = match config {
                Some(path) => config::load_config(&path)?,
                None => ExportConfig::default(),
            };
            tracing::info!("Exporting {:?} -> {:?}", input, output);
            let scene = scene::load_scene(&input)?;
            saver::save(&output, &scene, &config)
                .with_context(|| format!("Failed to export {:?}", input))?;
            tracing::info!("Done!");
        }

        Commands::Info { input } => {
            info::list_sections(&input)?;
        }
    }

    Ok(())
}
