use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{
    AtHomeResponse, ChapterListResponse, ChapterRecord, DeliveryInfo, MangaListResponse,
    SearchResult,
};

/// 搜索接口单次最多返回的条数
pub const MAX_SEARCH_RESULTS: usize = 20;

type Params = Vec<(&'static str, String)>;

/// 远程目录服务
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search_titles(&self, query: &str) -> Result<Vec<SearchResult>>;

    async fn list_chapters(
        &self,
        catalog_id: &str,
        languages: &[String],
    ) -> Result<Vec<ChapterRecord>>;

    async fn resolve_delivery(&self, chapter_id: &str) -> Result<DeliveryInfo>;
}

pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    search_limit: usize,
    page_size: usize,
    listing_delay: Duration,
}

impl CatalogClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            search_limit: config.search_limit.clamp(1, MAX_SEARCH_RESULTS),
            page_size: config.page_size.max(1),
            listing_delay: config.listing_delay,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &Params) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?params, "GET");

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn search_titles(&self, query: &str) -> Result<Vec<SearchResult>> {
        let params = search_params(query, self.search_limit);
        let resp: MangaListResponse = self.get_json("/manga", &params).await?;
        info!(query, count = resp.data.len(), "search finished");
        Ok(resp.data.into_iter().map(SearchResult::from).collect())
    }

    async fn list_chapters(
        &self,
        catalog_id: &str,
        languages: &[String],
    ) -> Result<Vec<ChapterRecord>> {
        let page_size = self.page_size;
        let chapters = paginate(page_size, self.listing_delay, move |offset| async move {
            let params = chapter_params(catalog_id, languages, page_size, offset);
            let resp: ChapterListResponse = self.get_json("/chapter", &params).await?;
            let page: Vec<ChapterRecord> =
                resp.data.into_iter().map(ChapterRecord::from).collect();
            Ok::<_, Error>(page)
        })
        .await?;

        info!(catalog_id, count = chapters.len(), "chapter list fetched");
        Ok(chapters)
    }

    async fn resolve_delivery(&self, chapter_id: &str) -> Result<DeliveryInfo> {
        let path = format!("/at-home/server/{}", chapter_id);
        let resp: AtHomeResponse = self.get_json(&path, &Vec::new()).await?;
        Ok(resp.into())
    }
}

fn search_params(query: &str, limit: usize) -> Params {
    vec![
        ("title", query.to_string()),
        ("limit", limit.to_string()),
        ("includes[]", "cover_art".to_string()),
        ("order[relevance]", "desc".to_string()),
    ]
}

fn chapter_params(catalog_id: &str, languages: &[String], limit: usize, offset: usize) -> Params {
    let mut params = vec![("manga", catalog_id.to_string())];
    for lang in languages {
        params.push(("translatedLanguage[]", lang.clone()));
    }
    params.extend([
        ("limit", limit.to_string()),
        ("offset", offset.to_string()),
        ("order[chapter]", "asc".to_string()),
        // 不包含尚未发布的章节
        ("includeFutureUpdates", "0".to_string()),
    ]);
    params
}

/// 按 offset/limit 翻页，直到某页条数不足 `page_size`
pub async fn paginate<T, F, Fut>(page_size: usize, delay: Duration, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let page_size = page_size.max(1);
    let mut offset = 0;
    let mut items = Vec::new();

    loop {
        let page = fetch(offset).await?;
        let count = page.len();
        items.extend(page);

        if count < page_size {
            break;
        }

        offset += page_size;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(items)
}
