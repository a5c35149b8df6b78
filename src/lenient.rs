//! Forgiving deserializers for hand-written booking files.
//!
//! Numbers may arrive as integers, floats or strings (`"8,900"`), text may
//! arrive as any scalar, and blank strings count as absent. Only values of
//! the wrong shape (arrays or tables) are rejected.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use toml::Value;

use crate::format::parse_number;

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Array(_) | Value::Table(_) => {
            Err(D::Error::custom("expected a single value, found a list or table"))
        }
        value => Ok(value),
    }
}

fn to_amount(value: Value) -> Option<Decimal> {
    match value {
        Value::Integer(n) => Some(Decimal::from(n)),
        Value::Float(f) => Some(Decimal::try_from(f).unwrap_or_default()),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(parse_number(&s)),
        _ => Some(Decimal::ZERO),
    }
}

pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
    Ok(to_amount(scalar(deserializer)?))
}

pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(to_amount(scalar(deserializer)?).map(|n| n.trunc().to_u32().unwrap_or(0)))
}

pub fn hours<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(to_amount(scalar(deserializer)?).and_then(|n| n.to_f64()))
}

pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = match scalar(deserializer)? {
        Value::String(s) => s,
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(dt) => dt.to_string(),
        Value::Array(_) | Value::Table(_) => String::new(),
    };
    let trimmed = raw.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let parsed = match scalar(deserializer)? {
        Value::Datetime(dt) => dt
            .date
            .and_then(|d| NaiveDate::from_ymd_opt(i32::from(d.year), u32::from(d.month), u32::from(d.day))),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => {
            let s = s.trim();
            let parsed = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
                .ok();
            if parsed.is_none() {
                tracing::warn!(value = s, "ignoring unparsable event date");
            }
            parsed
        }
        _ => None,
    };
    Ok(parsed)
}
