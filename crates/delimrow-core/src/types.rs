//! Scalar values and the decoded row.
//!
//! `Scalar::Null` is the absent marker: a slot whose field could not be
//! coerced into the column's declared type.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Str(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    Decimal(BigDecimal),
    /// Fixed-width value, already padded or truncated to the column width.
    Char(String),
    Varchar(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

/// One decoded record: a slot per schema column, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    values: Vec<Scalar>,
}

impl Row {
    /// A row of `width` absent slots.
    pub fn nulls(width: usize) -> Self {
        Self {
            values: vec![Scalar::Null; width],
        }
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn get(&self, idx: usize) -> Option<&Scalar> {
        self.values.get(idx)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overwrite one slot. The row never grows; out-of-range writes are
    /// ignored.
    pub fn set(&mut self, idx: usize, value: Scalar) {
        if let Some(slot) = self.values.get_mut(idx) {
            *slot = value;
        }
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

impl std::ops::Index<usize> for Row {
    type Output = Scalar;

    fn index(&self, idx: usize) -> &Scalar {
        &self.values[idx]
    }
}
