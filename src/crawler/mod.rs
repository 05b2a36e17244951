pub mod catalog;
pub mod downloader;
pub mod processor;
pub mod retry;

#[cfg(test)]
mod test_server;

pub use catalog::{Catalog, CatalogClient};
pub use downloader::{HttpPageSource, PageSource};
pub use processor::{ChapterOutcome, ChapterProcessor};
pub use retry::RetryPolicy;

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::archive::{ArchiveFile, ChapterArchiver};
use crate::config::Config;
use crate::error::Result;
use crate::selection::{self, InputSource, Selection};

/// 一次运行的结果
#[derive(Debug)]
pub enum RunSummary {
    NoResults,
    Quit,
    NoChapters,
    NoMatches,
    Completed {
        out_dir: PathBuf,
        archives: Vec<ArchiveFile>,
        failed_pages: usize,
    },
}

pub struct MangaCrawler<C, P> {
    catalog: C,
    pages: P,
    archiver: ChapterArchiver,
    config: Config,
}

impl MangaCrawler<CatalogClient, HttpPageSource> {
    /// 使用 HTTP 实现
    pub fn from_config(config: Config) -> Result<Self> {
        let client = config.build_http_client()?;
        let catalog = CatalogClient::new(client.clone(), &config);
        let pages = HttpPageSource::new(client, config.request_timeout);
        Ok(Self::new(catalog, pages, config))
    }
}

impl<C: Catalog, P: PageSource> MangaCrawler<C, P> {
    pub fn new(catalog: C, pages: P, config: Config) -> Self {
        Self {
            catalog,
            pages,
            archiver: ChapterArchiver::default(),
            config,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub async fn crawl(
        &self,
        title_query: &str,
        range: &str,
        input: &mut dyn InputSource,
    ) -> Result<RunSummary> {
        println!("Searching for: {}", title_query);
        let results = self.catalog.search_titles(title_query).await?;
        if results.is_empty() {
            println!("No results found.");
            return Ok(RunSummary::NoResults);
        }

        let manga_id = match selection::prompt_for_title(&results, input) {
            Selection::Picked(id) => id,
            Selection::Quit => return Ok(RunSummary::Quit),
        };

        println!("\nSelected manga ID: {}", manga_id);
        println!("\nFetching chapter list...");
        let chapters = self
            .catalog
            .list_chapters(&manga_id, &self.config.languages)
            .await?;
        if chapters.is_empty() {
            println!("No chapters found for selected language.");
            return Ok(RunSummary::NoChapters);
        }

        let selected = selection::resolve_range(range, &chapters);
        if selected.is_empty() {
            println!("No chapters match the range.");
            return Ok(RunSummary::NoMatches);
        }

        println!("\nWill download {} chapter(s).", selected.len());

        let out_dir = self.config.output_dir(&manga_id);
        fs::create_dir_all(&out_dir)?;

        let processor = ChapterProcessor::new(&self.catalog, &self.pages, &self.config);
        let mut archives = Vec::with_capacity(selected.len());
        let mut failed_pages = 0;

        for (i, chapter) in selected.iter().enumerate() {
            println!(
                "\n[{}/{}] Downloading chapter {}",
                i + 1,
                selected.len(),
                chapter.chapter_number.as_deref().unwrap_or("?")
            );

            let outcome = processor.fetch_chapter(chapter, &out_dir).await?;
            failed_pages += outcome.failed.len();

            let archive_path = out_dir.join(chapter.archive_name());
            let archive = self.archiver.package(&outcome.downloaded, &archive_path)?;
            if outcome.downloaded.is_empty() && outcome.folder.exists() {
                fs::remove_dir(&outcome.folder)?;
            }
            println!("Saved: {}", chapter.archive_name());
            archives.push(archive);

            if !self.config.chapter_delay.is_zero() {
                debug!(delay = ?self.config.chapter_delay, "pacing before next chapter");
                tokio::time::sleep(self.config.chapter_delay).await;
            }
        }

        info!(
            chapters = archives.len(),
            failed_pages,
            out_dir = %out_dir.display(),
            "all chapters processed"
        );
        Ok(RunSummary::Completed {
            out_dir,
            archives,
            failed_pages,
        })
    }
}
