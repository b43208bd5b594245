//! Setup property bag.
//!
//! Hosts describe a table with string properties. Only `field_delimited` is
//! decoder-specific; `columns`, `columns.types` and `columns.comments` carry
//! the schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetupError};
use crate::schema::{split_type_list, SchemaDescriptor};

pub const FIELD_DELIMITED: &str = "field_delimited";
pub const COLUMNS: &str = "columns";
pub const COLUMN_TYPES: &str = "columns.types";
pub const COLUMN_COMMENTS: &str = "columns.comments";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    #[serde(rename = "field_delimited", default, skip_serializing_if = "Option::is_none")]
    pub field_delimited: Option<String>,

    /// Comma-separated column names.
    #[serde(rename = "columns", default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<String>,

    /// Type list, e.g. `int:string:varchar(10)`.
    #[serde(rename = "columns.types", default, skip_serializing_if = "Option::is_none")]
    pub column_types: Option<String>,

    /// NUL-separated comments, one per column.
    #[serde(rename = "columns.comments", default, skip_serializing_if = "Option::is_none")]
    pub column_comments: Option<String>,
}

impl DecoderConfig {
    /// Pick the known keys out of an arbitrary property bag. Unknown keys are
    /// ignored.
    pub fn from_properties(props: &BTreeMap<String, String>) -> Self {
        Self {
            field_delimited: props.get(FIELD_DELIMITED).cloned(),
            columns: props.get(COLUMNS).cloned(),
            column_types: props.get(COLUMN_TYPES).cloned(),
            column_comments: props.get(COLUMN_COMMENTS).cloned(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The configured delimiter. There is no default.
    pub fn delimiter(&self) -> std::result::Result<&str, SetupError> {
        match self.field_delimited.as_deref() {
            Some(d) if !d.is_empty() => Ok(d),
            _ => Err(SetupError::MissingDelimiter),
        }
    }

    pub fn build_schema(&self) -> std::result::Result<SchemaDescriptor, SetupError> {
        let columns = self
            .columns
            .as_deref()
            .ok_or(SetupError::MissingProperty(COLUMNS))?;
        let types = self
            .column_types
            .as_deref()
            .ok_or(SetupError::MissingProperty(COLUMN_TYPES))?;

        if columns.is_empty() {
            return Err(SetupError::EmptySchema);
        }
        let names: Vec<&str> = columns.split(',').collect();
        let type_strings =
            split_type_list(types).map_err(|(index, token)| SetupError::UnsupportedType {
                index,
                name: names.get(index).map(|n| n.to_string()).unwrap_or_default(),
                type_string: token.to_string(),
            })?;

        let schema = SchemaDescriptor::build(&names, &type_strings)?;
        Ok(match self.column_comments.as_deref() {
            Some(comments) => schema.with_comments(comments.split('\0')),
            None => schema,
        })
    }
}
