use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedFileEntry {
    pub filename: String,
    pub archived_path: String,
    pub sha256: String,
    pub encoding: String,
    pub delimiter: String,
    pub record_count: usize,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFileEntry {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPaths {
    pub input_dir: String,
    pub output_path: String,
    pub archive_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunCounts {
    pub base_records: usize,
    pub incoming_records: usize,
    pub base_duplicates: usize,
    pub rows_before_dedup: usize,
    pub duplicates_removed: usize,
    pub final_records: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub paths: RunPaths,
    pub key_columns: Vec<String>,
    pub key_fallback: bool,
    pub counts: RunCounts,
    pub processed_files: Vec<ProcessedFileEntry>,
    pub skipped_files: Vec<SkippedFileEntry>,
}
