use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

pub const MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    pub folders: usize,
    pub files: usize,
    pub total_bytes: u64,
}

/// 为每个文件分配目标文件夹（1 起始）。
///
/// 当前文件夹非空且加入下一个文件会超过 `cap` 时新开一个文件夹；
/// 单个超过 `cap` 的文件独占一个文件夹。
pub fn plan_folders(sizes: &[u64], cap: u64) -> Vec<usize> {
    let mut folder = 1;
    let mut current = 0u64;
    let mut plan = Vec::with_capacity(sizes.len());

    for &size in sizes {
        if current > 0 && current.saturating_add(size) > cap {
            folder += 1;
            current = 0;
        }
        current = current.saturating_add(size);
        plan.push(folder);
    }
    plan
}

pub fn folder_path(destination: &Path, index: usize) -> PathBuf {
    destination.join(format!("Folder_{}", index))
}

/// 源目录下指定扩展名的文件，按文件名排序
fn list_files(source: &Path, extension: &str) -> Result<Vec<(PathBuf, u64)>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;
        let matches_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if metadata.is_file() && matches_ext {
            files.push((path, metadata.len()));
        }
    }
    files.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(files)
}

/// 将 `source` 中的图片复制到 `destination/Folder_N`，每个文件夹不超过 `cap` 字节
pub fn split_folder(
    source: &Path,
    destination: &Path,
    cap: u64,
    extension: &str,
) -> Result<SplitReport> {
    if cap == 0 {
        return Err(Error::InvalidInput("folder size cap must be positive".into()));
    }

    let files = list_files(source, extension)?;
    let sizes: Vec<u64> = files.iter().map(|(_, size)| *size).collect();
    let plan = plan_folders(&sizes, cap);

    fs::create_dir_all(folder_path(destination, 1))?;
    let mut folders = 1;

    for ((path, size), folder) in files.iter().zip(&plan) {
        let target_dir = folder_path(destination, *folder);
        if *folder > folders {
            fs::create_dir_all(&target_dir)?;
            folders = *folder;
        }
        if let Some(name) = path.file_name() {
            fs::copy(path, target_dir.join(name))?;
            debug!(file = %path.display(), size, folder, "copied");
        }
    }

    let report = SplitReport {
        folders,
        files: files.len(),
        total_bytes: sizes.iter().sum(),
    };
    info!(?report, "split finished");
    Ok(report)
}
