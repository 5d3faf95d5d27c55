use std::collections::HashSet;

use tracing::{info, warn};

use crate::normalize::{EMAIL_COLUMN, FieldNormalizer, NAME_COLUMN, PHONE_COLUMN};
use crate::table::Table;

const KEY_CANDIDATES: [&str; 3] = [EMAIL_COLUMN, PHONE_COLUMN, NAME_COLUMN];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumns {
    pub columns: Vec<String>,
    pub fallback: bool,
}

pub fn key_columns(table: &Table) -> KeyColumns {
    let columns: Vec<String> = KEY_CANDIDATES
        .iter()
        .filter(|candidate| table.has_column(candidate))
        .map(|candidate| candidate.to_string())
        .collect();

    if columns.is_empty() {
        warn!(
            columns = table.columns().len(),
            "no email/phone_number/name column, deduplicating on every column"
        );
        return KeyColumns {
            columns: table.columns().to_vec(),
            fallback: true,
        };
    }

    KeyColumns {
        columns,
        fallback: false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidationReport {
    pub base_records: usize,
    pub incoming_records: usize,
    // incoming rows whose key already existed in the base
    pub base_duplicates: usize,
    pub rows_before_dedup: usize,
    pub duplicates_removed: usize,
    pub final_records: usize,
    pub key_columns: KeyColumns,
}

#[derive(Debug)]
pub struct Consolidation {
    pub table: Table,
    pub report: ConsolidationReport,
}

// Base rows come first, so they win over incoming rows sharing their key.
pub fn consolidate(
    mut existing: Table,
    incoming: Vec<Table>,
    normalizer: &FieldNormalizer,
) -> Consolidation {
    normalizer.apply(&mut existing);
    let base_records = existing.len();

    let mut new_data = Table::concat(incoming);
    let incoming_records = new_data.len();

    let mut base_duplicates = 0;
    if !existing.is_empty() {
        let keys = key_columns(&new_data);
        let base_keys: HashSet<Vec<String>> = existing
            .records()
            .iter()
            .map(|record| record.key_tuple(&keys.columns))
            .collect();

        new_data.retain(|record| !base_keys.contains(&record.key_tuple(&keys.columns)));
        base_duplicates = incoming_records - new_data.len();
        if base_duplicates > 0 {
            info!(
                duplicates = base_duplicates,
                "dropped incoming records already present in the consolidated dataset"
            );
        }
    }

    existing.append(new_data);
    let mut merged = existing;
    let rows_before_dedup = merged.len();

    let keys = key_columns(&merged);
    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(rows_before_dedup);
    merged.retain(|record| seen.insert(record.key_tuple(&keys.columns)));
    let final_records = merged.len();

    Consolidation {
        table: merged,
        report: ConsolidationReport {
            base_records,
            incoming_records,
            base_duplicates,
            rows_before_dedup,
            duplicates_removed: rows_before_dedup - final_records,
            final_records,
            key_columns: keys,
        },
    }
}
