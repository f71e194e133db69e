//! Conversion of REST row envelopes into JSON values, driven by the result schema.

use serde_json::{Map, Number, Value as JsonValue};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::http::table::{TableFieldMode, TableFieldSchema, TableFieldType};
use crate::http::tabledata::{Cell, Tuple, Value};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("column {column}: expected {expected}, got {actual:?}")]
    InvalidType {
        column: String,
        expected: &'static str,
        actual: Value,
    },
    #[error("column {column}: invalid {kind} {value}")]
    InvalidScalar {
        column: String,
        kind: &'static str,
        value: String,
    },
    #[error("row has {actual} cells but the schema has {expected} fields")]
    Arity { expected: usize, actual: usize },
}

/// Decodes one row, returning one JSON value per schema field in schema order.
pub fn decode_row(fields: &[TableFieldSchema], row: Tuple) -> Result<Vec<JsonValue>, Error> {
    if row.f.len() != fields.len() {
        return Err(Error::Arity {
            expected: fields.len(),
            actual: row.f.len(),
        });
    }
    fields
        .iter()
        .zip(row.f)
        .map(|(field, cell)| decode_field(field, cell.v))
        .collect()
}

fn decode_field(field: &TableFieldSchema, value: Value) -> Result<JsonValue, Error> {
    if field.mode == Some(TableFieldMode::Repeated) {
        return match value {
            Value::Null => Ok(JsonValue::Array(vec![])),
            Value::Array(cells) => cells
                .into_iter()
                .map(|Cell { v }| decode_single(field, v))
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            other => Err(invalid_type(field, "array", other)),
        };
    }
    decode_single(field, value)
}

fn decode_single(field: &TableFieldSchema, value: Value) -> Result<JsonValue, Error> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Struct(tuple) => {
            let sub_fields = field.fields.as_deref().unwrap_or_default();
            let values = decode_row(sub_fields, tuple)?;
            let object: Map<String, JsonValue> = sub_fields.iter().map(|f| f.name.clone()).zip(values).collect();
            Ok(JsonValue::Object(object))
        }
        Value::Array(_) => Err(invalid_type(field, "scalar", value)),
        Value::String(text) => decode_scalar(field, text),
    }
}

fn decode_scalar(field: &TableFieldSchema, text: String) -> Result<JsonValue, Error> {
    match field.data_type {
        TableFieldType::Integer | TableFieldType::Int64 => text
            .parse::<i64>()
            .map(|v| JsonValue::Number(v.into()))
            .map_err(|_| invalid_scalar(field, "integer", text)),
        TableFieldType::Float | TableFieldType::Float64 => {
            let v = text.parse::<f64>().map_err(|_| invalid_scalar(field, "float", text))?;
            Ok(Number::from_f64(v).map(JsonValue::Number).unwrap_or(JsonValue::Null))
        }
        TableFieldType::Boolean | TableFieldType::Bool => match text.as_str() {
            "true" => Ok(JsonValue::Bool(true)),
            "false" => Ok(JsonValue::Bool(false)),
            _ => Err(invalid_scalar(field, "boolean", text)),
        },
        TableFieldType::Timestamp => {
            let micros = text
                .parse::<i128>()
                .map_err(|_| invalid_scalar(field, "timestamp", text.clone()))?;
            micros
                .checked_mul(1000)
                .and_then(|nanos| OffsetDateTime::from_unix_timestamp_nanos(nanos).ok())
                .and_then(|ts| ts.format(&Rfc3339).ok())
                .map(JsonValue::String)
                .ok_or_else(|| invalid_scalar(field, "timestamp", text))
        }
        TableFieldType::Record | TableFieldType::Struct => Err(invalid_type(field, "record", Value::String(text))),
        _ => Ok(JsonValue::String(text)),
    }
}

fn invalid_type(field: &TableFieldSchema, expected: &'static str, actual: Value) -> Error {
    Error::InvalidType {
        column: field.name.clone(),
        expected,
        actual,
    }
}

fn invalid_scalar(field: &TableFieldSchema, kind: &'static str, value: String) -> Error {
    Error::InvalidScalar {
        column: field.name.clone(),
        kind,
        value,
    }
}
