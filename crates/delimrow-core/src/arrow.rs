//! Arrow integration for columnar consumers.
//!
//! Converts decoded `Row`s into an Arrow `RecordBatch` shaped by the decoder's
//! `SchemaDescriptor`. Absent slots become Arrow nulls.
//! This module is feature-gated and only compiled when the `arrow` feature is enabled.

#[cfg(not(feature = "arrow"))]
compile_error!("arrow module requires 'arrow' feature to be enabled");

use std::sync::Arc;

use arrow_array::builder::{
    BooleanBuilder, Date32Builder, Decimal128Builder, Float32Builder, Float64Builder,
    Int16Builder, Int32Builder, Int64Builder, Int8Builder, StringBuilder,
    TimestampNanosecondBuilder,
};
use arrow_array::{ArrayRef, RecordBatch};
use arrow_schema::{DataType as ArrowDataType, Field as ArrowField, Schema as ArrowSchema, TimeUnit};
use bigdecimal::{num_bigint::BigInt, BigDecimal, ToPrimitive, Zero};
use chrono::NaiveDate;

use crate::schema::{PrimitiveType, SchemaDescriptor};
use crate::types::{Row, Scalar};

/// Precision and scale used for DECIMAL columns, which carry no parameters.
pub const DECIMAL_PRECISION: u8 = 38;
pub const DECIMAL_SCALE: i8 = 10;

/// Convert a `SchemaDescriptor` to an Arrow `Schema`. Every field is nullable.
pub fn schema_to_arrow(schema: &SchemaDescriptor) -> ArrowSchema {
    let fields: Vec<ArrowField> = schema
        .columns()
        .iter()
        .map(|c| {
            let field = ArrowField::new(c.name.clone(), data_type_to_arrow(&c.data_type), true);
            match &c.comment {
                Some(comment) => field.with_metadata(
                    [("comment".to_string(), comment.clone())].into_iter().collect(),
                ),
                None => field,
            }
        })
        .collect();
    ArrowSchema::new(fields)
}

pub fn data_type_to_arrow(dt: &PrimitiveType) -> ArrowDataType {
    match dt {
        PrimitiveType::String | PrimitiveType::Char(_) | PrimitiveType::Varchar(_) => {
            ArrowDataType::Utf8
        }
        PrimitiveType::Byte => ArrowDataType::Int8,
        PrimitiveType::Short => ArrowDataType::Int16,
        PrimitiveType::Int => ArrowDataType::Int32,
        PrimitiveType::Long => ArrowDataType::Int64,
        PrimitiveType::Float => ArrowDataType::Float32,
        PrimitiveType::Double => ArrowDataType::Float64,
        PrimitiveType::Boolean => ArrowDataType::Boolean,
        PrimitiveType::Timestamp => ArrowDataType::Timestamp(TimeUnit::Nanosecond, None),
        PrimitiveType::Date => ArrowDataType::Date32,
        PrimitiveType::Decimal => ArrowDataType::Decimal128(DECIMAL_PRECISION, DECIMAL_SCALE),
    }
}

/// Convert decoded rows to an Arrow `RecordBatch`.
///
/// Every row must have one slot per schema column and every non-null slot
/// must hold the column's declared type.
pub fn rows_to_record_batch(schema: &SchemaDescriptor, rows: &[Row]) -> Result<RecordBatch, String> {
    let arrow_schema = Arc::new(schema_to_arrow(schema));

    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != schema.len()) {
        return Err(format!(
            "Row {} has {} values but the schema declares {} columns",
            i,
            row.len(),
            schema.len()
        ));
    }

    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(schema.len());
    for (idx, column) in schema.columns().iter().enumerate() {
        let array = column_to_arrow_array(&column.data_type, rows, idx)
            .map_err(|e| format!("column '{}': {}", column.name, e))?;
        arrays.push(array);
    }

    RecordBatch::try_new(arrow_schema, arrays)
        .map_err(|e| format!("Failed to create RecordBatch: {}", e))
}

macro_rules! build_column {
    ($builder:expr, $rows:expr, $idx:expr, $variant:ident => |$v:ident| $conv:expr) => {{
        let mut builder = $builder;
        for row in $rows {
            match &row[$idx] {
                Scalar::Null => builder.append_null(),
                Scalar::$variant($v) => builder.append_value($conv),
                other => {
                    return Err(format!(
                        "Type mismatch: expected {}, got {:?}",
                        stringify!($variant),
                        other
                    ))
                }
            }
        }
        Ok(Arc::new(builder.finish()) as ArrayRef)
    }};
}

fn column_to_arrow_array(dt: &PrimitiveType, rows: &[Row], idx: usize) -> Result<ArrayRef, String> {
    let n = rows.len();
    match dt {
        PrimitiveType::String => {
            build_column!(StringBuilder::with_capacity(n, n * 10), rows, idx, Str => |v| v)
        }
        PrimitiveType::Char(_) => {
            build_column!(StringBuilder::with_capacity(n, n * 10), rows, idx, Char => |v| v)
        }
        PrimitiveType::Varchar(_) => {
            build_column!(StringBuilder::with_capacity(n, n * 10), rows, idx, Varchar => |v| v)
        }
        PrimitiveType::Byte => build_column!(Int8Builder::with_capacity(n), rows, idx, I8 => |v| *v),
        PrimitiveType::Short => build_column!(Int16Builder::with_capacity(n), rows, idx, I16 => |v| *v),
        PrimitiveType::Int => build_column!(Int32Builder::with_capacity(n), rows, idx, I32 => |v| *v),
        PrimitiveType::Long => build_column!(Int64Builder::with_capacity(n), rows, idx, I64 => |v| *v),
        PrimitiveType::Float => {
            build_column!(Float32Builder::with_capacity(n), rows, idx, F32 => |v| *v)
        }
        PrimitiveType::Double => {
            build_column!(Float64Builder::with_capacity(n), rows, idx, F64 => |v| *v)
        }
        PrimitiveType::Boolean => {
            build_column!(BooleanBuilder::with_capacity(n), rows, idx, Bool => |v| *v)
        }
        PrimitiveType::Timestamp => build_column!(
            TimestampNanosecondBuilder::with_capacity(n),
            rows,
            idx,
            Timestamp => |v| v
                .and_utc()
                .timestamp_nanos_opt()
                .ok_or_else(|| format!("Timestamp {} is outside the nanosecond range", v))?
        ),
        PrimitiveType::Date => build_column!(
            Date32Builder::with_capacity(n),
            rows,
            idx,
            Date => |v| days_since_epoch(v)?
        ),
        PrimitiveType::Decimal => {
            let builder = Decimal128Builder::with_capacity(n)
                .with_precision_and_scale(DECIMAL_PRECISION, DECIMAL_SCALE)
                .map_err(|e| e.to_string())?;
            build_column!(builder, rows, idx, Decimal => |v| decimal_to_i128(v)?)
        }
    }
}

fn days_since_epoch(date: &NaiveDate) -> Result<i32, String> {
    let days = date.signed_duration_since(NaiveDate::default()).num_days();
    i32::try_from(days).map_err(|_| format!("Date {} is outside the Date32 range", date))
}

// Works on the unscaled digits only. Rescaling (or comparing) a value like
// 1e100000000 as a BigDecimal materializes every digit of the exponent.
fn decimal_to_i128(d: &BigDecimal) -> Result<i128, String> {
    let (mut digits, mut scale) = d.as_bigint_and_exponent();
    if digits.is_zero() {
        return Ok(0);
    }
    let ten = BigInt::from(10);
    while scale > DECIMAL_SCALE as i64 && (&digits % &ten).is_zero() {
        digits /= &ten;
        scale -= 1;
    }
    if scale > DECIMAL_SCALE as i64 {
        return Err(format!(
            "Decimal {} has more than {} fractional digits",
            d, DECIMAL_SCALE
        ));
    }

    let width = digits.magnitude().to_string().len() as i64;
    if width - scale > (DECIMAL_PRECISION as i64 - DECIMAL_SCALE as i64) {
        return Err(format!("Decimal {} does not fit in Decimal128", d));
    }
    let factor = 10i128.pow((DECIMAL_SCALE as i64 - scale) as u32);
    digits
        .to_i128()
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(|| format!("Decimal {} does not fit in Decimal128", d))
}
