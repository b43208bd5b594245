//! Partial-match reporting.
//!
//! A record is a *partial match* when it has enough fields but at least one
//! of them failed coercion. Decoders hand every partial match to a
//! `PartialMatchSink`. The default sink, `LogOnce`, counts all of them and
//! emits only the first, so a bad input file produces one warning and a
//! counter instead of one warning per line.

use std::fmt;

/// A partial match as seen by an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialMatch<'a> {
    /// Running total, including this record.
    pub count: u64,
    /// First column of the record that failed coercion.
    pub column: usize,
    pub record: &'a str,
}

impl fmt::Display for PartialMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} partially unmatched rows are found, cannot find group {}: {}",
            self.count, self.column, self.record
        )
    }
}

pub trait PartialMatchSink {
    /// Record one partially matched record. Called at most once per record.
    fn record(&mut self, column: usize, record: &str);

    /// Partial matches recorded so far.
    fn count(&self) -> u64;
}

/// Where a `LogOnce` sends the single event it lets through.
pub trait Emitter {
    fn emit(&mut self, event: &PartialMatch<'_>);
}

/// Emits through `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEmitter;

impl Emitter for TracingEmitter {
    fn emit(&mut self, event: &PartialMatch<'_>) {
        tracing::warn!(count = event.count, column = event.column, "{}", event);
    }
}

/// Collects rendered events; used where the emitted text must be inspected.
impl Emitter for Vec<String> {
    fn emit(&mut self, event: &PartialMatch<'_>) {
        self.push(event.to_string());
    }
}

/// Emit the first partial match, then count the rest silently.
#[derive(Debug, Default)]
pub struct LogOnce<E = TracingEmitter> {
    count: u64,
    logged_first: bool,
    emitter: E,
}

impl LogOnce {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Emitter> LogOnce<E> {
    pub fn with_emitter(emitter: E) -> Self {
        Self {
            count: 0,
            logged_first: false,
            emitter,
        }
    }

    pub fn has_logged(&self) -> bool {
        self.logged_first
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }
}

impl<E: Emitter> PartialMatchSink for LogOnce<E> {
    fn record(&mut self, column: usize, record: &str) {
        self.count += 1;
        if !self.logged_first {
            self.logged_first = true;
            self.emitter.emit(&PartialMatch {
                count: self.count,
                column,
                record,
            });
        }
    }

    fn count(&self) -> u64 {
        self.count
    }
}
