use std::collections::BTreeMap;

use serde::Deserialize;

use crate::utils::{sanitize_file_name, zero_pad};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub id: String,
    pub display_title: String,
    pub alternate_titles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRecord {
    pub id: String,
    pub chapter_number: Option<String>, // 番外等章节可能没有编号
    pub title: Option<String>,
    pub language: Option<String>,
}

impl ChapterRecord {
    /// 比较范围时使用的章节号，缺失时视为 "0"
    pub fn number_or_default(&self) -> &str {
        self.chapter_number.as_deref().unwrap_or("0")
    }

    /// 例如 `Chapter 0012 - The Beginning`
    pub fn folder_name(&self) -> String {
        let mut name = format!("Chapter {}", zero_pad(self.number_or_default(), 4));
        let title = self.title.as_deref().map(sanitize_file_name);
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            name.push_str(" - ");
            name.push_str(&title);
        }
        name
    }

    pub fn archive_name(&self) -> String {
        format!("{}.cbz", self.folder_name())
    }
}

/// at-home 接口返回的图片服务器信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryInfo {
    pub base_url: String,
    pub content_hash: String,
    pub page_files: Vec<String>,
    pub data_saver_files: Vec<String>,
}

impl DeliveryInfo {
    pub fn pages(&self, data_saver: bool) -> &[String] {
        if data_saver {
            &self.data_saver_files
        } else {
            &self.page_files
        }
    }

    pub fn page_url(&self, file: &str, data_saver: bool) -> String {
        let quality = if data_saver { "data-saver" } else { "data" };
        format!(
            "{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            quality,
            self.content_hash,
            file
        )
    }
}

// ---- 接口原始 JSON 结构 ----

#[derive(Debug, Deserialize)]
pub struct MangaListResponse {
    #[serde(default)]
    pub data: Vec<MangaData>,
}

#[derive(Debug, Deserialize)]
pub struct MangaData {
    pub id: String,
    pub attributes: MangaAttributes,
}

#[derive(Debug, Deserialize)]
pub struct MangaAttributes {
    #[serde(default)]
    pub title: BTreeMap<String, String>,
    #[serde(default, rename = "altTitles")]
    pub alt_titles: Vec<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct ChapterListResponse {
    #[serde(default)]
    pub data: Vec<ChapterData>,
}

#[derive(Debug, Deserialize)]
pub struct ChapterData {
    pub id: String,
    pub attributes: ChapterAttributes,
}

#[derive(Debug, Deserialize)]
pub struct ChapterAttributes {
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "translatedLanguage")]
    pub translated_language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AtHomeResponse {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    pub chapter: AtHomeChapter,
}

#[derive(Debug, Deserialize)]
pub struct AtHomeChapter {
    pub hash: String,
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default, rename = "dataSaver")]
    pub data_saver: Vec<String>,
}

impl From<MangaData> for SearchResult {
    fn from(manga: MangaData) -> Self {
        let attrs = manga.attributes;
        let display_title = attrs
            .title
            .get("en")
            .filter(|t| !t.is_empty())
            .or_else(|| attrs.title.values().find(|t| !t.is_empty()))
            .cloned()
            .unwrap_or_else(|| "???".to_string());
        let alternate_titles = attrs
            .alt_titles
            .into_iter()
            .next()
            .map(|first| first.into_values().collect())
            .unwrap_or_default();

        Self {
            id: manga.id,
            display_title,
            alternate_titles,
        }
    }
}

impl From<ChapterData> for ChapterRecord {
    fn from(chapter: ChapterData) -> Self {
        Self {
            id: chapter.id,
            chapter_number: chapter.attributes.chapter,
            title: chapter.attributes.title,
            language: chapter.attributes.translated_language,
        }
    }
}

impl From<AtHomeResponse> for DeliveryInfo {
    fn from(resp: AtHomeResponse) -> Self {
        Self {
            base_url: resp.base_url,
            content_hash: resp.chapter.hash,
            page_files: resp.chapter.data,
            data_saver_files: resp.chapter.data_saver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(number: Option<&str>, title: Option<&str>) -> ChapterRecord {
        ChapterRecord {
            id: "c1".into(),
            chapter_number: number.map(String::from),
            title: title.map(String::from),
            language: Some("en".into()),
        }
    }

    #[test]
    fn folder_name_pads_number_and_appends_title() {
        assert_eq!(chapter(Some("5"), None).folder_name(), "Chapter 0005");
        assert_eq!(chapter(Some("10.5"), None).folder_name(), "Chapter 10.5");
        assert_eq!(chapter(Some("5.1"), None).folder_name(), "Chapter 05.1");
        assert_eq!(
            chapter(Some("12"), Some("The Beginning")).folder_name(),
            "Chapter 0012 - The Beginning"
        );
        assert_eq!(chapter(None, Some("")).folder_name(), "Chapter 0000");
    }

    #[test]
    fn blank_title_adds_no_separator() {
        assert_eq!(chapter(Some("1"), Some("   ")).folder_name(), "Chapter 0001");
        assert_eq!(chapter(Some("1"), Some(" \t")).archive_name(), "Chapter 0001.cbz");
    }

    #[test]
    fn archive_name_strips_path_separators_from_title() {
        let c = chapter(Some("3"), Some("Yes/No?"));
        assert_eq!(c.archive_name(), "Chapter 0003 - Yes_No_.cbz");
    }

    #[test]
    fn page_url_switches_quality_path() {
        let info = DeliveryInfo {
            base_url: "https://cdn.example.org/".into(),
            content_hash: "abc123".into(),
            page_files: vec!["1-x.png".into()],
            data_saver_files: vec!["1-x.jpg".into()],
        };
        assert_eq!(
            info.page_url("1-x.png", false),
            "https://cdn.example.org/data/abc123/1-x.png"
        );
        assert_eq!(
            info.page_url("1-x.jpg", true),
            "https://cdn.example.org/data-saver/abc123/1-x.jpg"
        );
        assert_eq!(info.pages(true), ["1-x.jpg".to_string()]);
    }

    #[test]
    fn search_result_prefers_english_title() {
        let raw = r#"{
            "id": "m1",
            "attributes": {
                "title": {"ja-ro": "Shingeki no Kyojin", "en": "Attack on Titan"},
                "altTitles": [{"ja": "進撃の巨人"}, {"ko": "진격의 거인"}]
            }
        }"#;
        let manga: MangaData = serde_json::from_str(raw).unwrap();
        let result = SearchResult::from(manga);

        assert_eq!(result.display_title, "Attack on Titan");
        assert_eq!(result.alternate_titles, vec!["進撃の巨人".to_string()]);
    }

    #[test]
    fn search_result_falls_back_when_title_missing() {
        let raw = r#"{"id": "m2", "attributes": {"title": {}, "altTitles": []}}"#;
        let manga: MangaData = serde_json::from_str(raw).unwrap();
        let result = SearchResult::from(manga);

        assert_eq!(result.display_title, "???");
        assert!(result.alternate_titles.is_empty());
    }

    #[test]
    fn chapter_with_null_number_parses() {
        let raw = r#"{"data": [{"id": "c9", "attributes":
            {"chapter": null, "title": null, "translatedLanguage": "en"}}]}"#;
        let resp: ChapterListResponse = serde_json::from_str(raw).unwrap();
        let record = ChapterRecord::from(resp.data.into_iter().next().unwrap());

        assert_eq!(record.chapter_number, None);
        assert_eq!(record.number_or_default(), "0");
    }

    #[test]
    fn at_home_response_maps_to_delivery_info() {
        let raw = r#"{
            "result": "ok",
            "baseUrl": "https://uploads.example.org",
            "chapter": {"hash": "h1", "data": ["a.png", "b.png"], "dataSaver": ["a.jpg"]}
        }"#;
        let info = DeliveryInfo::from(serde_json::from_str::<AtHomeResponse>(raw).unwrap());

        assert_eq!(info.content_hash, "h1");
        assert_eq!(info.page_files, vec!["a.png", "b.png"]);
        assert_eq!(info.data_saver_files, vec!["a.jpg"]);
    }
}
