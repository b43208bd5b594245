#![forbid(unsafe_code)]
//! delimrow: decode multi-character delimited text records into typed rows.
//!
//! Re-exports the member crates so hosts depend on a single package.

pub use delimrow_core::config::DecoderConfig;
pub use delimrow_core::error::{Error, OperationError, SetupError};
pub use delimrow_core::schema::{Column, PrimitiveType, SchemaDescriptor};
pub use delimrow_core::types::{Row, Scalar};
pub use delimrow_decode::{Decoded, LogOnce, PartialMatchSink, RowDecoder};
