use std::collections::BTreeMap;

// Absent columns read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn take(&mut self, column: &str) -> Option<String> {
        self.fields.remove(column)
    }

    pub fn key_tuple(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .map(|column| self.get(column).to_string())
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.set(column, value);
        }
        record
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Table::new();
        for column in columns {
            table.add_column(column);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|existing| existing == column)
    }

    pub fn add_column(&mut self, column: impl Into<String>) {
        let column = column.into();
        if !self.has_column(&column) {
            self.columns.push(column);
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn append(&mut self, other: Table) {
        for column in other.columns {
            self.add_column(column);
        }
        self.records.extend(other.records);
    }

    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Table {
        let mut merged = Table::new();
        for table in tables {
            merged.append(table);
        }
        merged
    }

    pub fn map_column<F>(&mut self, column: &str, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        if !self.has_column(column) {
            return;
        }
        for record in &mut self.records {
            let value = f(record.get(column));
            record.set(column, value);
        }
    }

    // Columns landing on the same name merge at the first one's position;
    // the first non-empty value wins.
    pub fn rename_columns<F>(self, mut rename: F) -> Table
    where
        F: FnMut(&str) -> String,
    {
        let mapping: Vec<(String, String)> = self
            .columns
            .iter()
            .map(|column| (column.clone(), rename(column)))
            .collect();

        let mut renamed = Table::with_columns(mapping.iter().map(|(_, to)| to.clone()));
        for mut record in self.records {
            let mut out = Record::new();
            for (from, to) in &mapping {
                let value = record.take(from).unwrap_or_default();
                if out.get(to).is_empty() {
                    out.set(to.clone(), value);
                }
            }
            renamed.push(out);
        }
        renamed
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Record) -> bool,
    {
        self.records.retain(keep);
    }

    pub fn distinct_count(&self, column: &str) -> usize {
        let mut values: Vec<&str> = self
            .records
            .iter()
            .map(|record| record.get(column))
            .filter(|value| !value.is_empty())
            .collect();
        values.sort_unstable();
        values.dedup();
        values.len()
    }
}
