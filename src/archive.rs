use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::Result;

/// 已写入磁盘的 CBZ 文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub path: PathBuf,
    /// 按写入顺序排列的条目名
    pub entries: Vec<String>,
}

pub struct ChapterArchiver {
    compression: CompressionMethod,
}

pub struct ChapterArchiverBuilder {
    compression: CompressionMethod,
}

impl ChapterArchiverBuilder {
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }

    pub fn compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    pub fn build(self) -> ChapterArchiver {
        ChapterArchiver {
            compression: self.compression,
        }
    }
}

impl Default for ChapterArchiver {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ChapterArchiver {
    pub fn builder() -> ChapterArchiverBuilder {
        ChapterArchiverBuilder::new()
    }

    /// 打包图片到 `output_path`，写入成功后删除源文件及其所在目录
    pub fn package(&self, image_paths: &[PathBuf], output_path: &Path) -> Result<ArchiveFile> {
        let mut sorted: Vec<&PathBuf> = image_paths.iter().collect();
        sorted.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let file = File::create(output_path)?;
        let mut zip = zip::ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default().compression_method(self.compression);

        let mut entries = Vec::with_capacity(sorted.len());
        for path in &sorted {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            zip.start_file(name.as_str(), options)?;
            let mut source = File::open(path)?;
            io::copy(&mut source, &mut zip)?;
            entries.push(name);
        }
        zip.finish()?;

        // 清理临时图片
        for path in &sorted {
            fs::remove_file(path)?;
        }
        if let Some(folder) = sorted.first().and_then(|p| p.parent()) {
            fs::remove_dir(folder)?;
            debug!(folder = %folder.display(), "removed chapter folder");
        }

        Ok(ArchiveFile {
            path: output_path.to_path_buf(),
            entries,
        })
    }
}
