pub mod archive;
pub mod config;
pub mod crawler;
pub mod error;
pub mod logger;
pub mod models;
pub mod selection;
pub mod splitter;
pub mod utils;

pub use archive::{ArchiveFile, ChapterArchiver};
pub use config::Config;
pub use crawler::{MangaCrawler, RetryPolicy, RunSummary};
pub use error::{Error, Result};
pub use models::{ChapterRecord, DeliveryInfo, SearchResult};
pub use selection::{InputSource, ScriptedInput, StdinInput, resolve_range};
