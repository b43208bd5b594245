//! Field text → typed `Scalar`, one rule per `PrimitiveType`.
//!
//! A failed coercion is local to its field: the caller turns it into an
//! absent slot and keeps going with the rest of the record.

use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use delimrow_core::schema::PrimitiveType;
use delimrow_core::types::Scalar;
use thiserror::Error;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("invalid integer: {0}")]
    Integer(#[from] ParseIntError),

    #[error("invalid floating point literal: {0}")]
    Float(String),

    #[error("invalid boolean '{0}'")]
    Boolean(String),

    #[error("invalid {kind}: {source}")]
    Temporal {
        kind: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid decimal: {0}")]
    Decimal(String),

    #[error("value of length {len} exceeds varchar({max})")]
    TooLong { len: usize, max: u32 },
}

impl From<ParseFloatError> for CoerceError {
    fn from(e: ParseFloatError) -> Self {
        CoerceError::Float(e.to_string())
    }
}

/// Coerce one field into the declared type.
pub fn coerce(field: &str, ty: PrimitiveType) -> Result<Scalar, CoerceError> {
    let value = match ty {
        PrimitiveType::String => Scalar::Str(field.to_string()),
        PrimitiveType::Byte => Scalar::I8(field.parse()?),
        PrimitiveType::Short => Scalar::I16(field.parse()?),
        PrimitiveType::Int => Scalar::I32(field.parse()?),
        PrimitiveType::Long => Scalar::I64(field.parse()?),
        PrimitiveType::Float => Scalar::F32(parse_float(field)?),
        PrimitiveType::Double => Scalar::F64(parse_float(field)?),
        PrimitiveType::Boolean => Scalar::Bool(parse_bool(field)?),
        PrimitiveType::Timestamp => Scalar::Timestamp(
            NaiveDateTime::parse_from_str(field, TIMESTAMP_FORMAT)
                .map_err(|source| CoerceError::Temporal { kind: "timestamp", source })?,
        ),
        PrimitiveType::Date => Scalar::Date(
            NaiveDate::parse_from_str(field, DATE_FORMAT)
                .map_err(|source| CoerceError::Temporal { kind: "date", source })?,
        ),
        PrimitiveType::Decimal => Scalar::Decimal(
            BigDecimal::from_str(field).map_err(|e| CoerceError::Decimal(e.to_string()))?,
        ),
        PrimitiveType::Char(width) => Scalar::Char(fixed_width(field, width as usize)),
        PrimitiveType::Varchar(max) => {
            let len = field.chars().count();
            if len > max as usize {
                return Err(CoerceError::TooLong { len, max });
            }
            Scalar::Varchar(field.to_string())
        }
    };
    Ok(value)
}

// Only plain decimal or scientific notation; `inf`/`NaN` spellings that
// `f64::from_str` would otherwise accept are rejected.
fn parse_float<F>(field: &str) -> Result<F, CoerceError>
where
    F: FromStr<Err = ParseFloatError>,
{
    let plain = field
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !plain {
        return Err(CoerceError::Float(format!("'{}' is not a numeric literal", field)));
    }
    Ok(field.parse()?)
}

fn parse_bool(field: &str) -> Result<bool, CoerceError> {
    if field.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if field.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(CoerceError::Boolean(field.to_string()))
    }
}

/// Truncate to `width` characters, or pad with trailing spaces up to it.
fn fixed_width(field: &str, width: usize) -> String {
    let mut out: String = field.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}
