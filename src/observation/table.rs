//! Loading a benchmark result CSV into an immutable, normalized,
//! column-oriented table.

use std::{collections::BTreeMap, fs::File, io::Read, path::Path, str::FromStr};

use anyhow::{Context, Result, anyhow, bail};
use kstring::KString;

use super::column::{Column, ColumnKind, TEST_NAME_PARTS};
use crate::debug;

#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("required column `engine` is missing, columns present: {present:?}")]
    MissingEngineColumn { present: Vec<String> },
    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug)]
pub enum ColumnData {
    Text(Vec<Option<KString>>),
    Number(Vec<Option<f64>>),
}

/// A single cell value, borrowed from the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'t> {
    Text(&'t str),
    Number(f64),
}

#[derive(Debug)]
pub struct ObservationTable {
    num_rows: usize,
    columns: BTreeMap<Column, ColumnData>,
    /// Header names that are not a known `Column`, trimmed.
    ignored_columns: Vec<String>,
}

fn normalize_text(column: Column, raw: &str) -> Option<KString> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    Some(match column {
        Column::Engine => KString::from_string(s.to_lowercase()),
        Column::Operation => KString::from_string(s.to_uppercase()),
        _ => KString::from_ref(s),
    })
}

pub(crate) fn parse_number(column: Column, raw: &str) -> Option<f64> {
    let s = raw.trim();
    if column == Column::SyncEnabled {
        match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => return Some(1.0),
            "false" | "no" | "off" => return Some(0.0),
            _ => (),
        }
    }
    let x = f64::from_str(s).ok()?;
    if x.is_finite() { Some(x) } else { None }
}

impl ObservationTable {
    /// Load the CSV file at `path`. Fails if the file does not exist,
    /// cannot be parsed, or misses the `engine` column.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("benchmark results file does not exist: {path:?}")
        }
        let file = File::open(path).with_context(|| anyhow!("opening file {path:?}"))?;
        let table = Self::from_reader(file).with_context(|| anyhow!("loading file {path:?}"))?;
        debug!(
            "loaded {} rows with columns {:?} from {path:?}",
            table.num_rows,
            table.columns().map(|c| c.name()).collect::<Vec<_>>()
        );
        Ok(table)
    }

    pub fn from_reader(input: impl Read) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // Which known column each field index feeds; the first
        // occurrence of a duplicated header wins.
        let mut field_columns: Vec<Option<Column>> = Vec::with_capacity(headers.len());
        let mut ignored_columns = Vec::new();
        for header in &headers {
            match Column::from_str(header) {
                Ok(column) if !field_columns.contains(&Some(column)) => {
                    field_columns.push(Some(column))
                }
                Ok(column) => {
                    debug!("ignoring duplicate column {column}");
                    field_columns.push(None);
                }
                Err(_) => {
                    debug!("ignoring unknown column {header:?}");
                    ignored_columns.push(header.clone());
                    field_columns.push(None);
                }
            }
        }

        if !field_columns.contains(&Some(Column::Engine)) {
            return Err(TableError::MissingEngineColumn { present: headers });
        }

        let mut columns: BTreeMap<Column, ColumnData> = field_columns
            .iter()
            .flatten()
            .map(|column| {
                let data = match column.kind() {
                    ColumnKind::Text => ColumnData::Text(Vec::new()),
                    ColumnKind::Number => ColumnData::Number(Vec::new()),
                };
                (*column, data)
            })
            .collect();

        let derive_test_name = !columns.contains_key(&Column::TestName);
        let mut derived_test_names = Vec::new();

        let mut num_rows = 0;
        for record in reader.records() {
            let record = record?;
            for (i, column) in field_columns.iter().enumerate() {
                let Some(column) = column else { continue };
                let raw = record.get(i).unwrap_or("");
                match columns.get_mut(column) {
                    Some(ColumnData::Text(vals)) => vals.push(normalize_text(*column, raw)),
                    Some(ColumnData::Number(vals)) => vals.push(parse_number(*column, raw)),
                    None => unreachable!("all columns in field_columns are in columns"),
                }
            }
            if derive_test_name {
                let parts: Vec<&str> = TEST_NAME_PARTS
                    .iter()
                    .filter_map(|part| {
                        let i = field_columns.iter().position(|c| *c == Some(*part))?;
                        let raw = record.get(i)?.trim();
                        (!raw.is_empty()).then_some(raw)
                    })
                    .collect();
                derived_test_names.push(Some(if parts.is_empty() {
                    KString::from_static("unknown")
                } else {
                    KString::from_string(parts.join("_"))
                }));
            }
            num_rows += 1;
        }

        if derive_test_name {
            columns.insert(Column::TestName, ColumnData::Text(derived_test_names));
        }

        Ok(Self {
            num_rows,
            columns,
            ignored_columns,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.keys().copied()
    }

    pub fn ignored_columns(&self) -> &[String] {
        &self.ignored_columns
    }

    /// None if the column is absent or the cell is missing.
    pub fn cell(&self, column: Column, row: usize) -> Option<Cell<'_>> {
        match self.columns.get(&column)? {
            ColumnData::Text(vals) => vals[row].as_ref().map(|s| Cell::Text(s.as_str())),
            ColumnData::Number(vals) => vals[row].map(Cell::Number),
        }
    }

    pub fn text(&self, column: Column, row: usize) -> Option<&str> {
        match self.cell(column, row)? {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }

    pub fn number(&self, column: Column, row: usize) -> Option<f64> {
        match self.cell(column, row)? {
            Cell::Number(x) => Some(x),
            Cell::Text(_) => None,
        }
    }

    /// The distinct values of a text column, sorted. Empty if the
    /// column is absent or numeric.
    pub fn distinct_text(&self, column: Column) -> Vec<KString> {
        match self.columns.get(&column) {
            Some(ColumnData::Text(vals)) => {
                let mut vals: Vec<KString> = vals.iter().flatten().cloned().collect();
                vals.sort();
                vals.dedup();
                vals
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = " engine , operation ,test_name, ops_per_sec ,batch_size,comment
 TidesDB ,put,seq_write,100.5,1000,x
rocksdb, Get ,seq_write,abc,,y
rocksdb,get,seq_write,inf,10,z
";

    #[test]
    fn t_normalization() -> Result<()> {
        let table = ObservationTable::from_reader(CSV.as_bytes())?;
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.text(Column::Engine, 0), Some("tidesdb"));
        assert_eq!(table.text(Column::Operation, 0), Some("PUT"));
        assert_eq!(table.text(Column::Operation, 1), Some("GET"));
        assert_eq!(table.number(Column::OpsPerSec, 0), Some(100.5));
        assert_eq!(table.number(Column::OpsPerSec, 1), None);
        assert_eq!(table.number(Column::OpsPerSec, 2), None);
        assert_eq!(table.number(Column::BatchSize, 1), None);
        assert_eq!(table.ignored_columns(), ["comment"]);
        assert!(!table.has(Column::P99Us));
        assert_eq!(
            table
                .distinct_text(Column::Engine)
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>(),
            ["rocksdb", "tidesdb"]
        );
        Ok(())
    }

    #[test]
    fn t_missing_engine() {
        let res = ObservationTable::from_reader("operation,ops_per_sec\nPUT,1\n".as_bytes());
        assert!(matches!(res, Err(TableError::MissingEngineColumn { .. })));
    }

    #[test]
    fn t_derived_test_name() -> Result<()> {
        let table = ObservationTable::from_reader(
            "engine,workload,operation,threads,sync_enabled\n\
             a,write,put,4,true\n\
             a,,,,\n"
                .as_bytes(),
        )?;
        assert_eq!(table.text(Column::TestName, 0), Some("write_put_4_true"));
        assert_eq!(table.text(Column::TestName, 1), Some("unknown"));
        assert_eq!(table.number(Column::SyncEnabled, 0), Some(1.0));
        Ok(())
    }

    #[test]
    fn t_missing_file() {
        let res = ObservationTable::from_path(Path::new("/nonexistent/results.csv"));
        assert!(res.is_err());
    }
}
