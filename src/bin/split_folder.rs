use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use mangadex_fetch::logger;
use mangadex_fetch::splitter::{MB, split_folder};

/// Copy images into Folder_1, Folder_2, ... so that no folder exceeds a size cap
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the images
    source: PathBuf,

    /// Directory in which the numbered folders are created
    destination: PathBuf,

    /// Maximum size of one folder, in MB
    #[arg(short, long, default_value_t = 500)]
    max_mb: u64,

    /// File extension to copy
    #[arg(short, long, default_value = "png")]
    ext: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    let cap = args.max_mb.saturating_mul(MB);
    let report = split_folder(&args.source, &args.destination, cap, &args.ext)
        .with_context(|| format!("failed to split {}", args.source.display()))?;

    println!("Total folders created: {}", report.folders);
    println!("Total files copied: {}", report.files);
    println!("Total size: {:.2} MB", report.total_bytes as f64 / MB as f64);
    Ok(())
}
