use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::RUN_MANIFEST_PREFIX;
use crate::cli::StatusArgs;
use crate::consolidate::key_columns;
use crate::ingest::load_consolidated;
use crate::model::ConsolidationRunManifest;
use crate::table::Table;

pub fn run(args: StatusArgs) -> Result<()> {
    let output_path = args.output_path();
    let archive_dir = args.resolved_archive_dir();

    info!(input_dir = %args.input_dir.display(), "status requested");

    if output_path.exists() {
        let table = load_consolidated(&output_path);
        let keys = key_columns(&table);
        let duplicates = count_duplicate_keys(&table, &keys.columns);

        info!(
            path = %output_path.display(),
            records = table.len(),
            columns = %table.columns().join(", "),
            key_columns = %keys.columns.join(", "),
            "consolidated dataset"
        );
        if duplicates > 0 {
            warn!(duplicates, "consolidated dataset has duplicate keys");
        }
    } else {
        warn!(path = %output_path.display(), "consolidated dataset missing");
    }

    match latest_run_manifest(&archive_dir)? {
        Some(path) => {
            let raw = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let manifest: ConsolidationRunManifest = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            info!(
                path = %path.display(),
                run_id = %manifest.run_id,
                completed_at = %manifest.completed_at,
                processed_files = manifest.processed_files.len(),
                skipped_files = manifest.skipped_files.len(),
                duplicates_removed = manifest.counts.duplicates_removed,
                final_records = manifest.counts.final_records,
                "latest run manifest"
            );
        }
        None => warn!(path = %archive_dir.display(), "no run manifest found"),
    }

    Ok(())
}

fn count_duplicate_keys(table: &Table, columns: &[String]) -> usize {
    let mut seen = HashSet::with_capacity(table.len());
    table
        .records()
        .iter()
        .filter(|record| !seen.insert(record.key_tuple(columns)))
        .count()
}

// Names embed a compact UTC timestamp; the greatest one is the newest run.
fn latest_run_manifest(archive_dir: &Path) -> Result<Option<PathBuf>> {
    if !archive_dir.is_dir() {
        return Ok(None);
    }

    let entries = fs::read_dir(archive_dir)
        .with_context(|| format!("failed to read {}", archive_dir.display()))?;

    let mut latest: Option<PathBuf> = None;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", archive_dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !(name.starts_with(RUN_MANIFEST_PREFIX) && name.ends_with(".json")) {
            continue;
        }

        let path = entry.path();
        if latest.as_ref().is_none_or(|current| path > *current) {
            latest = Some(path);
        }
    }

    Ok(latest)
}
