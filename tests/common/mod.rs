#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use mangadex_fetch::crawler::{Catalog, PageSource};
use mangadex_fetch::{ChapterRecord, DeliveryInfo, Error, Result, SearchResult};

pub const CDN: &str = "https://cdn.test";

pub fn chapter(id: &str, number: Option<&str>, title: Option<&str>) -> ChapterRecord {
    ChapterRecord {
        id: id.to_string(),
        chapter_number: number.map(String::from),
        title: title.map(String::from),
        language: Some("en".to_string()),
    }
}

pub fn delivery(hash: &str, files: &[&str]) -> DeliveryInfo {
    DeliveryInfo {
        base_url: CDN.to_string(),
        content_hash: hash.to_string(),
        page_files: files.iter().map(|f| f.to_string()).collect(),
        data_saver_files: Vec::new(),
    }
}

pub fn page_url(hash: &str, file: &str) -> String {
    format!("{}/data/{}/{}", CDN, hash, file)
}

#[derive(Default)]
pub struct FakeCatalog {
    pub results: Vec<SearchResult>,
    pub chapters: Vec<ChapterRecord>,
    pub deliveries: HashMap<String, DeliveryInfo>,
    pub listed: Mutex<Vec<(String, Vec<String>)>>,
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn search_titles(&self, _query: &str) -> Result<Vec<SearchResult>> {
        Ok(self.results.clone())
    }

    async fn list_chapters(
        &self,
        catalog_id: &str,
        languages: &[String],
    ) -> Result<Vec<ChapterRecord>> {
        self.listed
            .lock()
            .unwrap()
            .push((catalog_id.to_string(), languages.to_vec()));
        Ok(self.chapters.clone())
    }

    async fn resolve_delivery(&self, chapter_id: &str) -> Result<DeliveryInfo> {
        self.deliveries
            .get(chapter_id)
            .cloned()
            .ok_or_else(|| Error::Status {
                url: format!("/at-home/server/{}", chapter_id),
                status: 404,
            })
    }
}

/// 记录每次请求的图片源
#[derive(Default)]
pub struct FakePages {
    pub pages: HashMap<String, Vec<u8>>,
    pub broken: HashSet<String>,
    pub requests: Mutex<Vec<String>>,
}

impl FakePages {
    pub fn serve(mut self, url: String, body: &[u8]) -> Self {
        self.pages.insert(url, body.to_vec());
        self
    }

    pub fn break_url(mut self, url: String) -> Self {
        self.broken.insert(url);
        self
    }

    pub fn requests_for(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }

    pub fn total_requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PageSource for FakePages {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        if self.broken.contains(url) {
            return Err(Error::Status {
                url: url.to_string(),
                status: 503,
            });
        }
        self.pages.get(url).cloned().ok_or_else(|| Error::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}
