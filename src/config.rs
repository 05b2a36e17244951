use std::path::PathBuf;
use std::time::Duration;

use crate::crawler::RetryPolicy;

pub const DEFAULT_API_URL: &str = "https://api.mangadex.org";

/// 运行配置，构造各组件时显式传入
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub user_agent: String,
    pub search_limit: usize,
    pub page_size: usize,
    /// 章节列表翻页之间的间隔
    pub listing_delay: Duration,
    /// 每章下载完成后的间隔（服务端约 1 req/s）
    pub chapter_delay: Duration,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub languages: Vec<String>,
    pub output_prefix: String,
    pub output_root: PathBuf,
    pub data_saver: bool,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            user_agent: "MangaDex-Bulk-Downloader/1.0".to_string(),
            search_limit: 20,
            page_size: 100,
            listing_delay: Duration::from_millis(200),
            chapter_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            languages: vec!["en".to_string()],
            output_prefix: "MangaDex_".to_string(),
            output_root: PathBuf::from("."),
            data_saver: false,
            show_progress: true,
        }
    }
}

impl Config {
    /// 输出目录：前缀 + 漫画 ID 前 8 个字符
    pub fn output_dir(&self, catalog_id: &str) -> PathBuf {
        let short_id: String = catalog_id.chars().take(8).collect();
        self.output_root
            .join(format!("{}{}", self.output_prefix, short_id))
    }

    /// 测试用：去掉所有等待
    pub fn without_delays(mut self) -> Self {
        self.listing_delay = Duration::ZERO;
        self.chapter_delay = Duration::ZERO;
        self.retry = self.retry.backoff(Duration::ZERO);
        self.show_progress = false;
        self
    }

    pub fn build_http_client(&self) -> crate::Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .build()?;
        Ok(client)
    }
}
