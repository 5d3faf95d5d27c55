use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::info;

use crate::util::ensure_directory;

pub fn archive_timestamp(ts: DateTime<Local>) -> String {
    ts.format("%Y%m%d_%H%M%S").to_string()
}

pub fn archived_file_name(path: &Path, timestamp: &str) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{stem}_{timestamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{timestamp}"),
    }
}

pub fn archive_file(path: &Path, archive_dir: &Path) -> Result<PathBuf> {
    ensure_directory(archive_dir)?;

    let target = archive_dir.join(archived_file_name(path, &archive_timestamp(Local::now())));
    if fs::rename(path, &target).is_err() {
        fs::copy(path, &target).with_context(|| {
            format!(
                "failed to copy {} to {}",
                path.display(),
                target.display()
            )
        })?;
        fs::remove_file(path)
            .with_context(|| format!("failed to remove archived source {}", path.display()))?;
    }

    info!(from = %path.display(), to = %target.display(), "archived input file");
    Ok(target)
}
