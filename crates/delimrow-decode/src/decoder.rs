//! The row decoder.
//!
//! A `RowDecoder` owns its schema, its delimiter and one output `Row` that is
//! overwritten by every `decode` call. `decode` hands back a borrow of that
//! row, so the borrow checker stops a caller from holding it across the next
//! call; use `decode_owned` (or clone the row) to keep it.
//!
//! One decoder processes records sequentially. Run one per worker for
//! parallel decoding.

use std::convert::Infallible;

use delimrow_core::config::DecoderConfig;
use delimrow_core::error::{OperationError, SetupError};
use delimrow_core::schema::SchemaDescriptor;
use delimrow_core::types::{Row, Scalar};

use crate::coerce::coerce;
use crate::report::{LogOnce, PartialMatchSink};
use crate::split::FieldSplitter;

/// Outcome of decoding one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoded<'a> {
    /// Every column was attempted; failed fields are `Scalar::Null`.
    Row(&'a Row),
    /// The record had fewer fields than the schema has columns.
    Skip,
}

impl<'a> Decoded<'a> {
    pub fn row(self) -> Option<&'a Row> {
        match self {
            Decoded::Row(row) => Some(row),
            Decoded::Skip => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Decoded::Skip)
    }
}

/// The encoded form a decoder consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializedForm {
    Text,
}

#[derive(Debug)]
pub struct RowDecoder<S = LogOnce> {
    schema: SchemaDescriptor,
    splitter: FieldSplitter,
    row: Row,
    sink: S,
}

impl RowDecoder {
    /// Decoder that warns once about partial matches through `tracing`.
    pub fn new(schema: SchemaDescriptor, delimiter: impl Into<String>) -> Result<Self, SetupError> {
        Self::with_sink(schema, delimiter, LogOnce::new())
    }

    /// Build from a setup property bag. The delimiter is checked before the
    /// schema.
    pub fn from_config(config: &DecoderConfig) -> Result<Self, SetupError> {
        let delimiter = config.delimiter()?;
        let schema = config.build_schema()?;
        Self::new(schema, delimiter)
    }
}

impl<S: PartialMatchSink> RowDecoder<S> {
    pub fn with_sink(
        schema: SchemaDescriptor,
        delimiter: impl Into<String>,
        sink: S,
    ) -> Result<Self, SetupError> {
        let splitter = FieldSplitter::new(delimiter)?;
        let row = Row::nulls(schema.len());
        tracing::debug!(
            columns = schema.len(),
            delimiter = splitter.delimiter(),
            "row decoder configured"
        );
        Ok(Self {
            schema,
            splitter,
            row,
            sink,
        })
    }

    /// Split `record` and coerce its leading fields into the output row.
    ///
    /// Records with too few fields are skipped untouched. Otherwise every
    /// column is attempted; a field that fails coercion leaves its slot
    /// `Null`, and the record counts once as a partial match no matter how
    /// many of its fields failed.
    pub fn decode(&mut self, record: &str) -> Decoded<'_> {
        let fields = match self.splitter.leading_fields(record, self.schema.len()) {
            Some(fields) => fields,
            None => return Decoded::Skip,
        };

        let mut first_failure = None;
        for (idx, (field, column)) in fields.iter().zip(self.schema.columns()).enumerate() {
            let value = match coerce(field, column.data_type) {
                Ok(value) => value,
                Err(e) => {
                    tracing::trace!(column = idx, error = %e, "field coercion failed");
                    first_failure.get_or_insert(idx);
                    Scalar::Null
                }
            };
            self.row.set(idx, value);
        }

        if let Some(column) = first_failure {
            self.sink.record(column, record);
        }
        Decoded::Row(&self.row)
    }

    /// Like `decode`, but returns a row the caller owns.
    pub fn decode_owned(&mut self, record: &str) -> Option<Row> {
        self.decode(record).row().cloned()
    }

    /// Encoding is not supported.
    pub fn serialize(&self, _row: &Row) -> Result<String, OperationError> {
        Err(OperationError::Unsupported {
            operation: "serialize",
        })
    }

    /// No decode statistics are collected; see `partial_match_count`.
    pub fn stats(&self) -> Result<Infallible, OperationError> {
        Err(OperationError::Unsupported {
            operation: "statistics",
        })
    }

    pub fn serialized_form(&self) -> SerializedForm {
        SerializedForm::Text
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    pub fn delimiter(&self) -> &str {
        self.splitter.delimiter()
    }

    /// Records that decoded with at least one absent slot.
    pub fn partial_match_count(&self) -> u64 {
        self.sink.count()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
