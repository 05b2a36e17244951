use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;

use mangadex_fetch::config::DEFAULT_API_URL;
use mangadex_fetch::{Config, MangaCrawler, RunSummary, StdinInput, logger};

/// Search MangaDex by title and download chapters as CBZ archives
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Title to search for
    title: String,

    /// Chapters to download: `all`, `5`, `1-10` or a comma-separated mix
    #[arg(default_value = "all")]
    range: String,

    /// Translated language filter (repeatable)
    #[arg(short, long = "lang", default_value = "en")]
    languages: Vec<String>,

    /// Directory in which the per-title output folder is created
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Catalog API root
    #[arg(long, env = "MANGADEX_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Download compressed "data-saver" images
    #[arg(long)]
    data_saver: bool,

    /// Hide per-chapter progress bars
    #[arg(long)]
    no_progress: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            api_base_url: self.api_url,
            languages: self.languages,
            output_root: self.output,
            data_saver: self.data_saver,
            show_progress: !self.no_progress,
            ..Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            eprintln!("   chapter range example: 1-10  or 5  or all");
            std::process::exit(1);
        }
    };

    logger::init(args.verbose);

    let title = args.title.clone();
    let range = args.range.clone();
    let crawler = MangaCrawler::from_config(args.into_config())
        .context("failed to build HTTP client")?;

    let started = chrono::Local::now();
    let summary = crawler
        .crawl(&title, &range, &mut StdinInput)
        .await
        .with_context(|| format!("download of '{}' failed", title))?;

    if let RunSummary::Completed {
        out_dir,
        archives,
        failed_pages,
    } = summary
    {
        let elapsed = chrono::Local::now() - started;
        if failed_pages > 0 {
            println!("\n{} page(s) could not be downloaded.", failed_pages);
        }
        println!(
            "\nAll done! {} archive(s) in {}s. Files are in: {}",
            archives.len(),
            elapsed.num_seconds(),
            out_dir.display()
        );
    }

    Ok(())
}
