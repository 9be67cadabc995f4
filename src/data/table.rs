//! In-memory CSV table with string-typed cells.
//!
//! Cells are never parsed into numbers or dates, so every column other than
//! the one we write is copied to the output exactly as it was read.

use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, info};

/// Header plus data rows of a CSV file.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Table {
    /// Build a table from owned cells. Rows must match the header width.
    pub fn new<H, R>(headers: H, rows: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: IntoIterator,
        <R::Item as IntoIterator>::Item: AsRef<str>,
    {
        let headers: StringRecord = headers.into_iter().collect();
        let mut records = Vec::new();
        for (idx, row) in rows.into_iter().enumerate() {
            let record: StringRecord = row.into_iter().collect();
            if record.len() != headers.len() {
                bail!(
                    "row {idx} has {} fields, header has {}",
                    record.len(),
                    headers.len()
                );
            }
            records.push(record);
        }
        Ok(Self {
            headers,
            rows: records,
        })
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }

    /// Number of data rows, header excluded.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// All values of a column in row order, or `None` when the column is absent.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).unwrap_or_default())
                .collect(),
        )
    }

    /// Cell lookup by row position and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Assign one value per row to `name`.
    ///
    /// An existing column is overwritten in place; otherwise the column is
    /// appended after the last one.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            bail!(
                "column {name:?} has {} values for {} rows",
                values.len(),
                self.rows.len()
            );
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    *row = row
                        .iter()
                        .enumerate()
                        .map(|(i, field)| if i == idx { value.as_str() } else { field })
                        .collect();
                }
            }
            None => {
                self.headers.push_field(name);
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push_field(&value);
                }
            }
        }
        Ok(())
    }
}

/// Read a headed CSV file into memory.
///
/// A file without a header line is an error. Rows shorter than the header
/// are padded with empty cells; longer rows are rejected.
pub fn load_dataset(path: &Path) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .clone();
    if headers.is_empty() {
        bail!("no columns to parse from {}", path.display());
    }
    let mut rows = Vec::new();
    for result in reader.records() {
        let mut record = result.with_context(|| format!("reading {}", path.display()))?;
        if record.len() > headers.len() {
            let line = record.position().map_or(0, |pos| pos.line());
            bail!(
                "{}: line {line} has {} fields, header has {}",
                path.display(),
                record.len(),
                headers.len()
            );
        }
        while record.len() < headers.len() {
            record.push_field("");
        }
        rows.push(record);
    }
    debug!(path = %path.display(), rows = rows.len(), columns = headers.len(), "loaded csv");
    Ok(Table { headers, rows })
}

/// Write the table with its header and no index column.
pub fn save_augmented_dataset(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), rows = table.len(), "Saved augmented dataset");
    Ok(())
}
