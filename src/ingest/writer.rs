use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;

use crate::table::Table;

pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_table_to(file, table).with_context(|| format!("failed to write {}", path.display()))
}

pub(crate) fn write_table_to<W: Write>(sink: W, table: &Table) -> Result<()> {
    if table.columns().is_empty() {
        return Ok(());
    }

    let mut writer = WriterBuilder::new().delimiter(b',').from_writer(sink);
    writer
        .write_record(table.columns())
        .context("failed to write CSV header")?;

    for record in table.records() {
        writer
            .write_record(table.columns().iter().map(|column| record.get(column)))
            .context("failed to write CSV row")?;
    }

    writer.flush().context("failed to flush CSV writer")?;
    Ok(())
}
