use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors raised while configuring a decoder. A decoder is never
/// constructed when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("column count mismatch: {names} column names but {types} column types")]
    ArityMismatch { names: usize, types: usize },

    #[error("column [{index}] named {name} has unsupported type '{type_string}'")]
    UnsupportedType {
        index: usize,
        name: String,
        type_string: String,
    },

    #[error("missing required property \"field_delimited\": a non-empty field delimiter must be specified")]
    MissingDelimiter,

    #[error("missing required property \"{0}\"")]
    MissingProperty(&'static str),

    #[error("schema must declare at least one column")]
    EmptySchema,
}

impl SetupError {
    /// Get suggestions for common setup errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            SetupError::ArityMismatch { names, types } => vec![
                format!("\"columns\" lists {} names but \"columns.types\" lists {} types", names, types),
                "Separate column names with ',' and column types with ':' or ','".into(),
            ],
            SetupError::UnsupportedType { type_string, .. } => vec![
                format!("'{}' is not a primitive type", type_string),
                "Supported types: string, tinyint, smallint, int, bigint, float, double, boolean, timestamp, date, decimal, char(n), varchar(n)".into(),
            ],
            SetupError::MissingDelimiter => {
                vec!["Set the \"field_delimited\" property, e.g. field_delimited: \"||\"".into()]
            }
            SetupError::MissingProperty(key) => vec![format!("Set the \"{}\" property", key)],
            SetupError::EmptySchema => vec![],
        }
    }
}

/// Errors returned by operations a decoder does not support. They fail the
/// call but leave the decoder usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("{operation} is not supported by this decoder")]
    Unsupported { operation: &'static str },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error with context chain for better debugging
    #[error("Error in {context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Add context to an error, creating an error chain.
    ///
    /// # Example
    /// ```rust,no_run
    /// use delimrow_core::error::{Error, SetupError};
    /// let err = Error::from(SetupError::MissingDelimiter);
    /// let err = err.with_context("while loading table properties");
    /// ```
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self) as Box<dyn std::error::Error + Send + Sync>,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::Setup(e) => e.suggestions(),
            Error::Config(msg) => {
                if msg.contains("expected") || msg.contains("invalid type") {
                    vec!["Property values must all be strings".into()]
                } else {
                    vec![]
                }
            }
            _ => vec![],
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
