use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use super::{Catalog, PageSource, RetryPolicy};
use crate::config::Config;
use crate::error::Result;
use crate::models::ChapterRecord;
use crate::utils::sanitize_file_name;

/// 单章下载结果
#[derive(Debug, Default)]
pub struct ChapterOutcome {
    pub folder: PathBuf,
    /// 本地已有或本次下载成功的图片（顺序不保证）
    pub downloaded: Vec<PathBuf>,
    /// 重试耗尽后放弃的文件名
    pub failed: Vec<String>,
}

pub struct ChapterProcessor<'a> {
    catalog: &'a dyn Catalog,
    pages: &'a dyn PageSource,
    retry: RetryPolicy,
    data_saver: bool,
    show_progress: bool,
}

impl<'a> ChapterProcessor<'a> {
    pub fn new(catalog: &'a dyn Catalog, pages: &'a dyn PageSource, config: &Config) -> Self {
        Self {
            catalog,
            pages,
            retry: config.retry,
            data_saver: config.data_saver,
            show_progress: config.show_progress,
        }
    }

    pub async fn fetch_chapter(
        &self,
        record: &ChapterRecord,
        destination_root: &Path,
    ) -> Result<ChapterOutcome> {
        // 1. 获取图片服务器地址
        let delivery = self.catalog.resolve_delivery(&record.id).await?;

        // 2. 准备章节目录
        let folder = destination_root.join(record.folder_name());
        fs::create_dir_all(&folder)?;

        let files = delivery.pages(self.data_saver);
        let bar = self.progress_bar(files.len(), record);
        let mut outcome = ChapterOutcome {
            folder,
            ..Default::default()
        };

        // 3. 逐页下载，已存在的文件直接跳过
        for file in files {
            let local_path = outcome.folder.join(sanitize_file_name(file));

            if local_path.exists() {
                debug!(path = %local_path.display(), "page already on disk, skipping");
                outcome.downloaded.push(local_path);
                bar.inc(1);
                continue;
            }

            let url = delivery.page_url(file, self.data_saver);
            let url = url.as_str();
            let pages = self.pages;

            match self.retry.run(file, move |_| pages.fetch(url)).await {
                Ok(image_bytes) => {
                    fs::write(&local_path, &image_bytes)?;
                    outcome.downloaded.push(local_path);
                }
                Err(e) => {
                    bar.suspend(|| warn!(file = %file, error = %e, "giving up on page"));
                    outcome.failed.push(file.clone());
                }
            }
            bar.inc(1);
        }

        bar.finish_and_clear();
        info!(
            chapter = record.number_or_default(),
            downloaded = outcome.downloaded.len(),
            failed = outcome.failed.len(),
            "chapter fetched"
        );
        Ok(outcome)
    }

    fn progress_bar(&self, len: usize, record: &ChapterRecord) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let style =
            ProgressStyle::with_template("{prefix} [{elapsed_precise}] {wide_bar} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-");
        let bar = ProgressBar::new(len as u64);
        bar.set_style(style);
        bar.set_prefix(format!("Ch {}", record.number_or_default()));
        bar
    }
}
