use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info};

use super::RUN_MANIFEST_PREFIX;
use crate::archive::archive_file;
use crate::cli::ConsolidateArgs;
use crate::consolidate::{ConsolidationReport, consolidate};
use crate::ingest::{
    SourceTable, delimiter_name, load_consolidated, read_source_file, write_table,
};
use crate::model::{
    ConsolidationRunManifest, ProcessedFileEntry, RunCounts, RunPaths, SkippedFileEntry,
};
use crate::normalize::{ColumnNormalizer, FieldNormalizer};
use crate::table::Table;
use crate::util::{
    ensure_directory, file_name_string, now_utc_string, sha256_file, utc_compact_string,
    write_json_pretty,
};

pub fn run(args: ConsolidateArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let output_path = args.output_path();
    let archive_dir = args.resolved_archive_dir();
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        archive_dir.join(format!(
            "{RUN_MANIFEST_PREFIX}{}.json",
            utc_compact_string(started_ts)
        ))
    });

    info!(
        input_dir = %args.input_dir.display(),
        run_id = %run_id,
        dry_run = args.dry_run,
        "starting consolidation"
    );

    if !args.dry_run {
        ensure_directory(&archive_dir)?;
    }

    let base = load_consolidated(&output_path);

    let inputs = discover_inputs(&args.input_dir, &args.output_file)?;
    if inputs.is_empty() {
        info!(input_dir = %args.input_dir.display(), "no new CSV files to process");
        return Ok(());
    }

    let columns = ColumnNormalizer::new()?;
    let fields = FieldNormalizer::new()?;

    let mut tables = Vec::with_capacity(inputs.len());
    let mut processed_files = Vec::new();
    let mut skipped_files = Vec::new();

    for path in inputs {
        let filename = file_name_string(&path);
        info!(file = %filename, "processing file");

        let (source, sha256) = match load_input(&path, &columns, &fields) {
            Ok(loaded) => loaded,
            Err(err) => {
                error!(file = %filename, error = %err, "skipping file");
                skipped_files.push(SkippedFileEntry {
                    filename,
                    reason: format!("{err:#}"),
                });
                continue;
            }
        };

        info!(
            file = %filename,
            records = source.table.len(),
            columns = %source.table.columns().join(", "),
            "file processed"
        );

        let archived_path = if args.dry_run {
            path.clone()
        } else {
            match archive_file(&path, &archive_dir) {
                Ok(target) => target,
                Err(err) => {
                    error!(file = %filename, error = %err, "failed to archive file, skipping it");
                    skipped_files.push(SkippedFileEntry {
                        filename,
                        reason: format!("{err:#}"),
                    });
                    continue;
                }
            }
        };

        processed_files.push(ProcessedFileEntry {
            filename,
            archived_path: archived_path.display().to_string(),
            sha256,
            encoding: source.encoding.to_string(),
            delimiter: delimiter_name(source.delimiter).to_string(),
            record_count: source.table.len(),
            columns: source.table.columns().to_vec(),
        });
        tables.push(source.table);
    }

    if tables.is_empty() {
        info!(
            skipped = skipped_files.len(),
            "no input file could be processed, dataset left unchanged"
        );
        return Ok(());
    }

    log_column_profile(&tables);

    let consolidation = consolidate(base, tables, &fields);
    log_summary(&consolidation.report);

    if args.dry_run {
        info!(
            output = %output_path.display(),
            "dry-run complete, dataset and inputs left untouched"
        );
        return Ok(());
    }

    write_table(&output_path, &consolidation.table)?;
    info!(path = %output_path.display(), "wrote consolidated dataset");

    let report = consolidation.report;
    let manifest = ConsolidationRunManifest {
        manifest_version: 1,
        run_id,
        started_at,
        completed_at: now_utc_string(),
        paths: RunPaths {
            input_dir: args.input_dir.display().to_string(),
            output_path: output_path.display().to_string(),
            archive_dir: archive_dir.display().to_string(),
        },
        key_columns: report.key_columns.columns.clone(),
        key_fallback: report.key_columns.fallback,
        counts: RunCounts {
            base_records: report.base_records,
            incoming_records: report.incoming_records,
            base_duplicates: report.base_duplicates,
            rows_before_dedup: report.rows_before_dedup,
            duplicates_removed: report.duplicates_removed,
            final_records: report.final_records,
        },
        processed_files,
        skipped_files,
    };
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote run manifest");

    Ok(())
}

fn load_input(
    path: &Path,
    columns: &ColumnNormalizer,
    fields: &FieldNormalizer,
) -> Result<(SourceTable, String)> {
    let mut source = read_source_file(path)?;
    let sha256 = sha256_file(path)?;

    source.table = columns.apply(source.table);
    fields.apply(&mut source.table);

    Ok((source, sha256))
}

pub(crate) fn discover_inputs(input_dir: &Path, output_file: &str) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        let is_output = path
            .file_name()
            .map(|name| name == output_file)
            .unwrap_or(false);

        if is_csv && !is_output {
            inputs.push(path);
        }
    }

    inputs.sort();
    Ok(inputs)
}

fn log_column_profile(tables: &[Table]) {
    let new_data = Table::concat(tables.iter().cloned());
    for column in new_data.columns() {
        info!(
            column = %column,
            distinct_values = new_data.distinct_count(column),
            "incoming column"
        );
    }
}

fn log_summary(report: &ConsolidationReport) {
    info!(
        base_records = report.base_records,
        incoming_records = report.incoming_records,
        base_duplicates = report.base_duplicates,
        "merged incoming records"
    );
    info!(
        rows_before_dedup = report.rows_before_dedup,
        duplicates_removed = report.duplicates_removed,
        key_columns = %report.key_columns.columns.join(", "),
        final_records = report.final_records,
        "deduplication complete"
    );
}
