//! MySQL cell to JSON conversion.
//!
//! The text protocol delivers every non-NULL cell as bytes, so the column
//! type decides the JSON shape: integers and floats become numbers, DECIMAL
//! stays a string to keep its exact digits, JSON columns are parsed, and
//! everything else is UTF-8 text.

use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::{Column, Value as SqlValue};
use serde_json::{Number, Value};

use crate::query::Row;

/// Converts one driver row into an ordered column -> value map.
pub fn row_to_json(mut row: mysql_async::Row) -> Row {
    let columns = row.columns();
    let mut out = Row::with_capacity(columns.len());

    for (index, column) in columns.iter().enumerate() {
        let value = row.take::<SqlValue, usize>(index).unwrap_or(SqlValue::NULL);
        out.insert(column.name_str().into_owned(), column_to_json(value, column));
    }

    out
}

pub fn column_to_json(value: SqlValue, column: &Column) -> Value {
    let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);
    to_json(value, column.column_type(), unsigned)
}

pub fn to_json(value: SqlValue, column_type: ColumnType, unsigned: bool) -> Value {
    match value {
        SqlValue::NULL => Value::Null,
        SqlValue::Int(i) => Value::from(i),
        SqlValue::UInt(u) => Value::from(u),
        // Through the decimal text so 0.1f32 stays 0.1 rather than 0.10000000149.
        SqlValue::Float(f) => float(f.to_string().parse().unwrap_or(f64::from(f))),
        SqlValue::Double(d) => float(d),
        SqlValue::Date(year, month, day, hour, minute, second, micros) => Value::String(
            format_date(column_type, year, month, day, hour, minute, second, micros),
        ),
        SqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
            Value::String(format_time(negative, days, hours, minutes, seconds, micros))
        }
        SqlValue::Bytes(bytes) => text_to_json(bytes, column_type, unsigned),
    }
}

fn text_to_json(bytes: Vec<u8>, column_type: ColumnType, unsigned: bool) -> Value {
    use ColumnType::*;

    match column_type {
        MYSQL_TYPE_TINY
        | MYSQL_TYPE_SHORT
        | MYSQL_TYPE_LONG
        | MYSQL_TYPE_INT24
        | MYSQL_TYPE_LONGLONG
        | MYSQL_TYPE_YEAR => integer(&bytes, unsigned).unwrap_or_else(|| text(bytes)),
        MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE => std::str::from_utf8(&bytes)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .map(float)
            .unwrap_or_else(|| text(bytes)),
        MYSQL_TYPE_JSON => serde_json::from_slice(&bytes).unwrap_or_else(|_| text(bytes)),
        MYSQL_TYPE_BIT if bytes.len() <= 8 => {
            Value::from(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
        }
        _ => text(bytes),
    }
}

fn integer(bytes: &[u8], unsigned: bool) -> Option<Value> {
    let s = std::str::from_utf8(bytes).ok()?.trim();
    if unsigned {
        s.parse::<u64>().ok().map(Value::from)
    } else {
        s.parse::<i64>().ok().map(Value::from)
    }
}

fn float(f: f64) -> Value {
    Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(f.to_string()))
}

fn text(bytes: Vec<u8>) -> Value {
    match String::from_utf8(bytes) {
        Ok(s) => Value::String(s),
        Err(e) => Value::String(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

#[allow(clippy::too_many_arguments)]
fn format_date(
    column_type: ColumnType,
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    micros: u32,
) -> String {
    let date = format!("{:04}-{:02}-{:02}", year, month, day);

    if matches!(column_type, ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE) {
        return date;
    }

    let mut out = format!("{} {:02}:{:02}:{:02}", date, hour, minute, second);
    if micros != 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}

fn format_time(negative: bool, days: u32, hours: u8, minutes: u8, seconds: u8, micros: u32) -> String {
    let total_hours = u64::from(days) * 24 + u64::from(hours);
    let sign = if negative { "-" } else { "" };

    let mut out = format!("{}{:02}:{:02}:{:02}", sign, total_hours, minutes, seconds);
    if micros != 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}
