use std::collections::HashMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::DataError;

/// One cell of an output row. Inapplicable numeric measurements are
/// carried as NaN and rendered as the literal `nan`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Text(text) => f.write_str(text),
            Field::Int(value) => write!(f, "{value}"),
            Field::Float(value) if value.is_nan() => f.write_str("nan"),
            Field::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_string())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Text(value)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Field::Int(value)
    }
}

impl From<u32> for Field {
    fn from(value: u32) -> Self {
        Field::Int(value as i64)
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Field::Float(value)
    }
}

impl From<Option<f64>> for Field {
    fn from(value: Option<f64>) -> Self {
        Field::Float(value.unwrap_or(f64::NAN))
    }
}

/// Unordered column-to-value map for one row. Ordering is imposed by
/// the file header at write time.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: HashMap<String, Field>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Field>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Field> {
        self.values.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Append-only delimited output file with a fixed header.
///
/// The file and its header are written when the `DataFile` is created,
/// replacing any file already at the path. Rows are validated against
/// the header before anything is written, and the file is opened and
/// closed per row so completed trials survive an aborted session.
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
    header: Vec<String>,
    delimiter: u8,
}

impl DataFile {
    /// Creates the output file, writing any comment lines (prefixed
    /// with `# `) above the header.
    pub fn create(
        path: impl Into<PathBuf>,
        header: &[&str],
        comments: &[&str],
        delimiter: u8,
    ) -> Result<Self, DataError> {
        let data_file = Self {
            path: path.into(),
            header: header.iter().map(|column| column.to_string()).collect(),
            delimiter,
        };

        let mut out = File::create(&data_file.path)?;
        if !comments.is_empty() {
            for line in comments {
                writeln!(out, "# {line}")?;
            }
            writeln!(out)?;
        }
        let mut writer = csv::WriterBuilder::new()
            .delimiter(data_file.delimiter)
            .from_writer(out);
        writer.write_record(&data_file.header)?;
        writer.flush()?;

        debug!("created data file {}", data_file.path.display());
        Ok(data_file)
    }

    /// Appends one row in header order.
    pub fn write_row(&self, row: &Row) -> Result<(), DataError> {
        for column in row.columns() {
            if !self.header.iter().any(|header| header == column) {
                return Err(DataError::ExtraColumn(column.to_string()));
            }
        }
        let mut record = Vec::with_capacity(self.header.len());
        for column in &self.header {
            match row.get(column) {
                Some(field) => record.push(field.to_string()),
                None => return Err(DataError::MissingColumn(column.clone())),
            }
        }

        let out = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(out);
        writer.write_record(&record)?;
        writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }
}
