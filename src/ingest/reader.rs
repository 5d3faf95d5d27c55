use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use super::sniff::{decode_bytes, delimiter_name, detect_delimiter};
use crate::table::{Record, Table};

#[derive(Debug)]
pub struct SourceTable {
    pub table: Table,
    pub encoding: &'static str,
    pub delimiter: u8,
}

pub fn read_source_file(path: &Path) -> Result<SourceTable> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let decoded =
        decode_bytes(&raw).with_context(|| format!("failed to decode {}", path.display()))?;
    info!(path = %path.display(), encoding = decoded.encoding.name(), "detected encoding");

    let delimiter = detect_delimiter(&decoded.text);
    let table = parse_table(&decoded.text, delimiter)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    info!(
        path = %path.display(),
        delimiter = delimiter_name(delimiter),
        "read file with detected delimiter"
    );

    Ok(SourceTable {
        table,
        encoding: decoded.encoding.name(),
        delimiter,
    })
}

// Missing or unreadable datasets load as an empty table.
pub fn load_consolidated(path: &Path) -> Table {
    if !path.exists() {
        info!(path = %path.display(), "no consolidated dataset yet, starting empty");
        return Table::new();
    }

    let loaded = fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .and_then(|raw| {
            let decoded = decode_bytes(&raw)
                .with_context(|| format!("failed to decode {}", path.display()))?;
            parse_table(&decoded.text, b',')
                .with_context(|| format!("failed to parse {}", path.display()))
        });

    match loaded {
        Ok(table) => {
            info!(path = %path.display(), records = table.len(), "loaded consolidated dataset");
            table
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "failed to load consolidated dataset, starting empty"
            );
            Table::new()
        }
    }
}

pub(crate) fn parse_table(text: &str, delimiter: u8) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .context("failed to read CSV header")?
        .clone();
    if headers.is_empty() {
        bail!("CSV header is empty");
    }

    let columns = header_names(&headers);
    let mut table = Table::with_columns(columns.iter().cloned());

    for (index, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("failed to parse CSV row {}", index + 1))?;
        // Whitespace-only lines trim down to one empty field.
        if columns.len() > 1 && row.len() == 1 && row[0].is_empty() {
            continue;
        }
        if row.len() > columns.len() {
            let line = row.position().map(|pos| pos.line()).unwrap_or_default();
            bail!(
                "expected {} fields, saw {} on line {}",
                columns.len(),
                row.len(),
                line
            );
        }

        let record: Record = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.as_str(), row.get(idx).unwrap_or("")))
            .collect();
        table.push(record);
    }

    Ok(table)
}

fn header_names(headers: &StringRecord) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.is_empty() {
                format!("unnamed_{idx}")
            } else {
                header.to_string()
            };

            let mut name = base.clone();
            while used.contains(&name) {
                let suffix = suffixes.entry(base.clone()).or_insert(0);
                *suffix += 1;
                name = format!("{base}.{suffix}");
            }
            used.insert(name.clone());
            name
        })
        .collect()
}
