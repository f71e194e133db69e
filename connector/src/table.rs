use std::collections::HashSet;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// One result row: values in column order, addressable by column name.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_record(serializer, &self.columns, &self.values)
    }
}

/// A fully materialized tabular dataset: named columns and rows holding one value per column.
///
/// Serializes as a JSON array of objects, one per row, keys in column order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates a table without checking its shape. See [`Table::validate`].
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Builds a table from JSON records. Every record must be an object with the same keys;
    /// the first record fixes the column order.
    pub fn from_records(records: Vec<Value>) -> Result<Self, ShapeError> {
        let mut records = records.into_iter().enumerate();
        let (columns, first) = match records.next() {
            None => return Err(ShapeError::NoColumns),
            Some((_, Value::Object(first))) => (first.keys().cloned().collect::<Vec<_>>(), first),
            Some((_, _)) => return Err(ShapeError::NotAnObject(0)),
        };
        let mut rows = vec![take_values(&columns, first, 0)?];
        for (index, record) in records {
            match record {
                Value::Object(object) => rows.push(take_values(&columns, object, index)?),
                _ => return Err(ShapeError::NotAnObject(index)),
            }
        }
        let table = Self { columns, rows };
        table.validate()?;
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn push(&mut self, values: Vec<Value>) {
        self.rows.push(values);
    }

    /// Checks the tabular contract: at least one column, unique non-empty column names,
    /// exactly one value per column in every row.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.columns.is_empty() {
            return Err(ShapeError::NoColumns);
        }
        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if column.is_empty() {
                return Err(ShapeError::EmptyColumnName);
            }
            if !seen.insert(column.as_str()) {
                return Err(ShapeError::DuplicateColumn(column.clone()));
            }
        }
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(ShapeError::RaggedRow {
                    row: index,
                    expected: self.columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(())
    }

    /// Encodes the rows as newline-delimited JSON objects.
    pub fn to_ndjson(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        for row in &self.rows {
            serde_json::to_writer(&mut buf, &Record(&self.columns, row))?;
            buf.push(b'\n');
        }
        Ok(buf)
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record(&self.columns, row))?;
        }
        seq.end()
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ShapeError {
    #[error("table has no columns")]
    NoColumns,
    #[error("column name must not be empty")]
    EmptyColumnName,
    #[error("duplicate column {0}")]
    DuplicateColumn(String),
    #[error("row {row} has {actual} values, expected {expected}")]
    RaggedRow { row: usize, expected: usize, actual: usize },
    #[error("record {0} is not an object")]
    NotAnObject(usize),
    #[error("record {0} does not have the same columns as the first record")]
    MismatchedColumns(usize),
}

struct Record<'a>(&'a [String], &'a [Value]);

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_record(serializer, self.0, self.1)
    }
}

fn serialize_record<S: Serializer>(serializer: S, columns: &[String], values: &[Value]) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(columns.len()))?;
    for (column, value) in columns.iter().zip(values) {
        map.serialize_entry(column, value)?;
    }
    map.end()
}

fn take_values(columns: &[String], mut object: Map<String, Value>, index: usize) -> Result<Vec<Value>, ShapeError> {
    if object.len() != columns.len() {
        return Err(ShapeError::MismatchedColumns(index));
    }
    columns
        .iter()
        .map(|c| object.remove(c).ok_or(ShapeError::MismatchedColumns(index)))
        .collect()
}
