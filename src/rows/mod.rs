// src/rows/mod.rs

use crate::error::{FeedError, FeedResult};
use csv::{ReaderBuilder, StringRecord};
use std::{fs::File, io::Read, path::Path};
use tracing::debug;

/// Every data row of a telemetry CSV, held in file order.
///
/// Loaded once per run and never mutated afterwards; the playback driver
/// does random access by row index.
#[derive(Debug, Clone)]
pub struct Rows {
    header: StringRecord,
    records: Vec<StringRecord>,
}

/// Borrowed view of one row: field names from the header paired with the
/// raw string values of one record.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    header: &'a StringRecord,
    record: &'a StringRecord,
}

/// Read the whole file at `path` into memory.
///
/// The first line is the header. Fails if the file is missing, is not UTF-8,
/// or has a record whose width differs from the header.
pub fn load_rows(path: impl AsRef<Path>) -> FeedResult<Rows> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_rows(file, path)?;
    debug!(
        path = %path.display(),
        rows = rows.len(),
        fields = ?rows.field_names().collect::<Vec<_>>(),
        "loaded telemetry rows"
    );
    Ok(rows)
}

/// Read CSV from any reader. `origin` only labels errors.
pub fn read_rows<R: Read>(reader: R, origin: &Path) -> FeedResult<Rows> {
    let csv_err = |source| FeedError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let header = rdr.headers().map_err(csv_err)?.clone();
    let records = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    Ok(Rows { header, records })
}

impl Rows {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Field names, in header order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.header.iter()
    }

    /// The row at 0-based `index`, if present.
    pub fn get(&self, index: usize) -> Option<Row<'_>> {
        self.records.get(index).map(|record| Row {
            header: &self.header,
            record,
        })
    }
}

impl<'a> Row<'a> {
    /// `(field name, raw value)` pairs in header order.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.header.iter().zip(self.record.iter())
    }

    /// Raw value of the first field called `name`.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.fields().find(|(k, _)| *k == name).map(|(_, v)| v)
    }
}
