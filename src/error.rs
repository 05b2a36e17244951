use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request to {url} failed: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("filesystem error: {0}")]
    Filesystem(#[from] io::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// 网络层错误（传输失败或非 2xx 状态码）
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
