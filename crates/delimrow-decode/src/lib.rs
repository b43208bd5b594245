#![forbid(unsafe_code)]
//! delimrow-decode: text record → typed `Row`.
//!
//! - `split`: literal multi-character delimiter splitting.
//! - `coerce`: per-type field coercion into `Scalar`s.
//! - `report`: partial-match sinks (log the first, count the rest).
//! - `decoder`: `RowDecoder`, which ties the three together.

pub mod coerce;
pub mod decoder;
pub mod report;
pub mod split;

pub use decoder::{Decoded, RowDecoder, SerializedForm};
pub use report::{LogOnce, PartialMatchSink};
