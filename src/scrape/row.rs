use thiserror::Error;

use crate::types::{RawRow, ScrapedRow, ROW_WIDTH};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("expected 8 fields, got {0}")]
    Width(usize),

    #[error("empty security description")]
    MissingDescription,

    #[error("{column}: cannot parse `{value}` as a number")]
    Number { column: &'static str, value: String },
}

/// Type a filtered raw row: description, Trades, TTA, Open, High, Low, LTP, LTY.
pub fn parse_row(raw: &RawRow) -> Result<ScrapedRow, RowError> {
    if raw.len() != ROW_WIDTH {
        return Err(RowError::Width(raw.len()));
    }

    let security_description = raw[0].trim().to_string();
    if security_description.is_empty() {
        return Err(RowError::MissingDescription);
    }

    Ok(ScrapedRow {
        security_description,
        trades: parse_count("Trades", &raw[1])?,
        tta: required("TTA", &raw[2])?,
        open: optional("Open", &raw[3])?,
        high: optional("High", &raw[4])?,
        low: optional("Low", &raw[5])?,
        ltp: optional("LTP", &raw[6])?,
        lty: optional("LTY", &raw[7])?,
    })
}

/// Type every row, splitting off the ones that don't fit.
pub fn parse_rows(raw: &[RawRow]) -> (Vec<ScrapedRow>, Vec<(RawRow, RowError)>) {
    let mut rows = Vec::with_capacity(raw.len());
    let mut rejected = Vec::new();
    for r in raw {
        match parse_row(r) {
            Ok(row) => rows.push(row),
            Err(e) => rejected.push((r.clone(), e)),
        }
    }
    (rows, rejected)
}

/// Entities the site emits inside numeric cells.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&#160;", " "),
    ("&#xa0;", " "),
    ("&#xA0;", " "),
    ("&minus;", "-"),
    ("&#8722;", "-"),
    ("&#x2212;", "-"),
    ("&amp;", "&"),
];

/// Markup-free, separator-free numeric text. `None` when the cell is blank.
fn clean_number(value: &str) -> Option<String> {
    let mut decoded = value.to_string();
    for (entity, replacement) in ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }

    let mut out = String::with_capacity(decoded.len());
    let mut in_tag = false;
    for ch in decoded.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if in_tag => {}
            ',' => {}
            '\u{2212}' => out.push('-'),
            c if c.is_whitespace() => {}
            c => out.push(c),
        }
    }
    if out.is_empty() || out == "-" {
        None
    } else {
        Some(out)
    }
}

/// `f64::from_str` also accepts `NaN` and `inf`; neither is a market value.
fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn optional(column: &'static str, value: &str) -> Result<Option<f64>, RowError> {
    match clean_number(value) {
        None => Ok(None),
        Some(s) => parse_finite(&s)
            .map(Some)
            .ok_or_else(|| RowError::Number { column, value: value.to_string() }),
    }
}

fn required(column: &'static str, value: &str) -> Result<f64, RowError> {
    optional(column, value)?.ok_or_else(|| RowError::Number { column, value: value.to_string() })
}

fn parse_count(column: &'static str, value: &str) -> Result<i64, RowError> {
    let err = || RowError::Number { column, value: value.to_string() };
    let s = clean_number(value).ok_or_else(err)?;
    if let Ok(n) = s.parse::<i64>() {
        return Ok(n);
    }
    // Occasionally rendered as "12.00".
    match parse_finite(&s) {
        Some(f) if f.fract() == 0.0 => Ok(f as i64),
        _ => Err(err()),
    }
}
