//! Column classification and SQL literal rendering.
//!
//! Rows are fetched with every column cast to text (binary columns as hex),
//! so decoding never depends on driver type mappings. Each column's
//! [`ColumnKind`] then turns that text back into a typed [`SqlValue`], which
//! renders as a MySQL literal.

use std::fmt::Write;

use crate::rewrite::UrlRewrite;

/// How a column's values are fetched and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// `TINYINT(1)` / `BOOLEAN`.
    Boolean,
    /// Integer types and `BIT`.
    Integer,
    /// `FLOAT` / `DOUBLE`.
    Float,
    /// `DECIMAL` / `NUMERIC`, kept as exact text.
    Decimal,
    /// Native `JSON` columns.
    Json,
    /// `LONGTEXT`, which MariaDB also uses for its `JSON` alias. Values that
    /// parse as a JSON object or array are treated as JSON.
    LongText,
    /// Binary strings, blobs and spatial types, fetched as hex.
    Binary,
    /// Everything else: character strings, temporal types, `ENUM`, `SET`.
    Text,
}

impl ColumnKind {
    /// Classify a column from `information_schema.COLUMNS`
    /// (`DATA_TYPE`, `COLUMN_TYPE`).
    pub fn classify(data_type: &str, column_type: &str) -> Self {
        let data_type = data_type.to_ascii_lowercase();
        let column_type = column_type.to_ascii_lowercase();

        match data_type.as_str() {
            "tinyint" if column_type.starts_with("tinyint(1)") => ColumnKind::Boolean,
            "bool" | "boolean" => ColumnKind::Boolean,
            "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" | "bit" => {
                ColumnKind::Integer
            }
            "float" | "double" | "real" => ColumnKind::Float,
            "decimal" | "numeric" => ColumnKind::Decimal,
            "json" => ColumnKind::Json,
            "longtext" => ColumnKind::LongText,
            "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob"
            | "geometry" | "point" | "linestring" | "polygon" | "multipoint"
            | "multilinestring" | "multipolygon" | "geometrycollection" | "geomcollection" => {
                ColumnKind::Binary
            }
            _ => ColumnKind::Text,
        }
    }

    /// The `SELECT` expression that fetches `column` as text.
    pub fn select_expr(self, data_type: &str, column: &str) -> String {
        let ident = quote_identifier(column);
        match self {
            ColumnKind::Binary => format!("HEX({ident})"),
            ColumnKind::Integer if data_type.eq_ignore_ascii_case("bit") => {
                format!("CAST(CAST({ident} AS UNSIGNED) AS CHAR)")
            }
            _ => format!("CAST({ident} AS CHAR)"),
        }
    }
}

/// A single column value ready to be written into an `INSERT`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Exact numeric text such as `12.50`.
    Decimal(String),
    /// A JSON document, kept as the text the server returned.
    Json(String),
    Text(String),
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Rebuild a typed value from the text fetched for a column of `kind`.
    ///
    /// Text that does not parse as the expected type falls back to a quoted
    /// string, which MySQL coerces on insert.
    pub fn from_fetched(kind: ColumnKind, raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return SqlValue::Null;
        };

        match kind {
            ColumnKind::Boolean => match raw.as_str() {
                "0" => SqlValue::Bool(false),
                "1" => SqlValue::Bool(true),
                _ => parse_integer(raw),
            },
            ColumnKind::Integer => parse_integer(raw),
            ColumnKind::Float => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => SqlValue::Float(v),
                _ => SqlValue::Text(raw),
            },
            ColumnKind::Decimal if is_decimal_literal(&raw) => SqlValue::Decimal(raw),
            ColumnKind::Json if is_json(&raw) => SqlValue::Json(raw),
            ColumnKind::Binary => match decode_hex(&raw) {
                Some(bytes) => SqlValue::Bytes(bytes),
                None => SqlValue::Text(raw),
            },
            ColumnKind::Decimal | ColumnKind::Json | ColumnKind::LongText | ColumnKind::Text => {
                SqlValue::Text(raw)
            }
        }
    }

    /// Apply a base-URL rewrite to JSON content.
    ///
    /// Native JSON documents are always candidates. Text is only touched
    /// when it parses as a JSON object or array. Only string values holding
    /// the URL change; all other bytes stay as fetched. Returns the number
    /// of replaced occurrences.
    pub fn rewrite_urls(&mut self, rewrite: &UrlRewrite) -> usize {
        let (text, rewritten) = match self {
            SqlValue::Json(text) => {
                let rewritten = rewrite.rewrite_json_document(text);
                (text, rewritten)
            }
            SqlValue::Text(text) => {
                let rewritten = rewrite.rewrite_json_text(text);
                (text, rewritten)
            }
            _ => return 0,
        };
        match rewritten {
            Some((new_text, count)) => {
                *text = new_text;
                count
            }
            None => 0,
        }
    }

    /// Render as a MySQL literal.
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            SqlValue::Int(v) => v.to_string(),
            SqlValue::UInt(v) => v.to_string(),
            // Debug formatting keeps full precision and switches to exponent
            // notation for very large or small magnitudes.
            SqlValue::Float(v) => format!("{v:?}"),
            SqlValue::Decimal(v) => v.clone(),
            SqlValue::Json(text) | SqlValue::Text(text) => quote_string(text),
            SqlValue::Bytes(bytes) if bytes.is_empty() => "''".to_string(),
            SqlValue::Bytes(bytes) => {
                let mut out = String::with_capacity(bytes.len() * 2 + 3);
                out.push_str("X'");
                for b in bytes {
                    let _ = write!(out, "{b:02X}");
                }
                out.push('\'');
                out
            }
        }
    }
}

fn parse_integer(raw: String) -> SqlValue {
    if let Ok(v) = raw.parse::<i64>() {
        SqlValue::Int(v)
    } else if let Ok(v) = raw.parse::<u64>() {
        SqlValue::UInt(v)
    } else {
        SqlValue::Text(raw)
    }
}

fn is_json(raw: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(raw).is_ok()
}

fn is_decimal_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    let mut seen_dot = false;
    !digits.is_empty()
        && !digits.starts_with('.')
        && !digits.ends_with('.')
        && digits.chars().all(|c| match c {
            '0'..='9' => true,
            '.' if !seen_dot => {
                seen_dot = true;
                true
            }
            _ => false,
        })
}

fn decode_hex(raw: &str) -> Option<Vec<u8>> {
    if raw.len() % 2 != 0 {
        return None;
    }
    raw.as_bytes()
        .chunks(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(s, 16).ok()
        })
        .collect()
}

/// Quote and escape a string the way `mysql_real_escape_string` does.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\u{1a}' => out.push_str("\\Z"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Quote an identifier with backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
