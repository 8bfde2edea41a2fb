mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chromascope_cli::{parse_color_space, parse_histogram_mode, parse_rect};

#[derive(Parser)]
#[command(name = "chromascope")]
#[command(version, about = "Color statistics for captured frames", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Histogram and color-frequency analysis of a frame
    Analyze {
        /// Input PNG frame
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Capture rectangle (x,y,width,height); defaults to the full frame
        #[arg(long, value_name = "X,Y,W,H")]
        rect: Option<String>,

        /// Histogram mode: rgb, rgbl, luma, or hue
        #[arg(short, long, value_name = "MODE", default_value = "rgb")]
        mode: String,

        /// Run the analysis on the GPU when available
        #[arg(long)]
        gpu: bool,

        /// Emit machine-readable JSON instead of the report
        #[arg(long)]
        json: bool,

        /// Save the JSON result to a file
        #[arg(short, long, value_name = "FILE")]
        save: Option<PathBuf>,

        /// Number of most frequent colors to report
        #[arg(long, value_name = "N", default_value = "10")]
        top: usize,
    },

    /// Build the color point cloud for a frame
    Cloud {
        /// Input PNG frame
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Capture rectangle (x,y,width,height); defaults to the full frame
        #[arg(long, value_name = "X,Y,W,H")]
        rect: Option<String>,

        /// Color space: rgb (cube) or hsl (cylinder)
        #[arg(short = 'c', long, value_name = "SPACE", default_value = "rgb")]
        space: String,

        /// Count threshold below which points get the minimum size
        #[arg(long, value_name = "N")]
        min_count: Option<u32>,

        /// Count at which point size saturates (default: area / 9)
        #[arg(long, value_name = "N")]
        max_count: Option<u32>,

        /// Run the pipeline on the GPU when available
        #[arg(long)]
        gpu: bool,

        /// Emit machine-readable JSON instead of the report
        #[arg(long)]
        json: bool,

        /// Save the JSON result (including the point list) to a file
        #[arg(short, long, value_name = "FILE")]
        save: Option<PathBuf>,
    },

    /// Report GPU adapter availability
    Info,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input,
            rect,
            mode,
            gpu,
            json,
            save,
            top,
        } => {
            let rect = match rect.as_deref().map(parse_rect).transpose() {
                Ok(rect) => rect,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            commands::cmd_analyze(
                input,
                rect,
                parse_histogram_mode(&mode),
                gpu,
                json,
                save,
                top,
            )
        }

        Commands::Cloud {
            input,
            rect,
            space,
            min_count,
            max_count,
            gpu,
            json,
            save,
        } => {
            let rect = match rect.as_deref().map(parse_rect).transpose() {
                Ok(rect) => rect,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            commands::cmd_cloud(
                input,
                rect,
                parse_color_space(&space),
                min_count,
                max_count,
                gpu,
                json,
                save,
            )
        }

        Commands::Info => cmd_info(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_info() -> Result<(), String> {
    #[cfg(feature = "gpu")]
    {
        match chromascope_core::gpu_info() {
            Some(info) => println!("GPU: {}", info),
            None => println!("GPU: no suitable adapter found"),
        }
    }

    #[cfg(not(feature = "gpu"))]
    println!("GPU: support not compiled in (enable the \"gpu\" feature)");

    Ok(())
}
