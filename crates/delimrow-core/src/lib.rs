#![forbid(unsafe_code)]
//! delimrow-core: shared kernel for the delimrow decoder.
//!
//! This crate contains only *pure* types: the validated schema descriptor,
//! the scalar values a decoded row holds, the setup property bag, and the
//! error taxonomy. There is **no I/O** and **no logging** here.
//!
//! Crates that use this:
//! - delimrow-decode: splits records and coerces fields into `Scalar`s.
//! - delimrow-cli: loads `DecoderConfig` from YAML and prints decoded rows.

pub mod config;
pub mod error;
pub mod schema;
pub mod types;

#[cfg(feature = "arrow")]
pub mod arrow;
