//! Logical schema types. Pure data; no Arrow dependency here.
//!
//! A `SchemaDescriptor` is built once from the host's column names and type
//! strings, validated, and never changed afterwards.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::SetupError;

const MAX_CHAR_LENGTH: u32 = 255;
const MAX_VARCHAR_LENGTH: u32 = 65535;
const MAX_DECIMAL_PRECISION: u32 = 38;

/// The closed set of scalar column types a decoder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Timestamp,
    Date,
    Decimal,
    /// Fixed-width character string; values are truncated or space-padded.
    Char(u32),
    /// Bounded character string; longer values are rejected.
    Varchar(u32),
}

impl PrimitiveType {
    /// Parse a single type token such as `int`, `varchar(20)` or
    /// `decimal(10,2)`. Returns `None` for anything that is not a supported
    /// primitive, including complex types like `array<int>`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        let (base, params) = match token.find('(') {
            Some(open) => {
                let params = token[open + 1..].strip_suffix(')')?;
                (token[..open].trim_end(), Some(params))
            }
            None => (token.as_str(), None),
        };

        let ty = match (base, params) {
            ("string", None) => PrimitiveType::String,
            ("tinyint", None) => PrimitiveType::Byte,
            ("smallint", None) => PrimitiveType::Short,
            ("int" | "integer", None) => PrimitiveType::Int,
            ("bigint", None) => PrimitiveType::Long,
            ("float", None) => PrimitiveType::Float,
            ("double" | "double precision", None) => PrimitiveType::Double,
            ("boolean", None) => PrimitiveType::Boolean,
            ("timestamp", None) => PrimitiveType::Timestamp,
            ("date", None) => PrimitiveType::Date,
            ("decimal" | "numeric", params) => {
                if let Some(params) = params {
                    check_decimal_params(params)?;
                }
                PrimitiveType::Decimal
            }
            ("char", Some(len)) => PrimitiveType::Char(parse_length(len, MAX_CHAR_LENGTH)?),
            ("varchar", Some(len)) => {
                PrimitiveType::Varchar(parse_length(len, MAX_VARCHAR_LENGTH)?)
            }
            _ => return None,
        };
        Some(ty)
    }
}

fn parse_length(s: &str, max: u32) -> Option<u32> {
    let n: u32 = s.trim().parse().ok()?;
    (1..=max).contains(&n).then_some(n)
}

// Precision and scale are validated but not kept: decimals are
// arbitrary-precision once decoded.
fn check_decimal_params(s: &str) -> Option<()> {
    let mut parts = s.split(',');
    let precision: u32 = parts.next()?.trim().parse().ok()?;
    let scale: u32 = match parts.next() {
        Some(scale) => scale.trim().parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    let valid = (1..=MAX_DECIMAL_PRECISION).contains(&precision) && scale <= precision;
    valid.then_some(())
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::String => f.write_str("string"),
            PrimitiveType::Byte => f.write_str("tinyint"),
            PrimitiveType::Short => f.write_str("smallint"),
            PrimitiveType::Int => f.write_str("int"),
            PrimitiveType::Long => f.write_str("bigint"),
            PrimitiveType::Float => f.write_str("float"),
            PrimitiveType::Double => f.write_str("double"),
            PrimitiveType::Boolean => f.write_str("boolean"),
            PrimitiveType::Timestamp => f.write_str("timestamp"),
            PrimitiveType::Date => f.write_str("date"),
            PrimitiveType::Decimal => f.write_str("decimal"),
            PrimitiveType::Char(n) => write!(f, "char({})", n),
            PrimitiveType::Varchar(n) => write!(f, "varchar({})", n),
        }
    }
}

impl Serialize for PrimitiveType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Split a `columns.types` list into one token per column.
///
/// Types are separated by `:` or `,` at nesting depth zero, so the comma in
/// `decimal(10,2)` or `map<string,int>` does not start a new token. An
/// unterminated bracket swallows the rest of the list; that case is returned
/// as `Err((index, token))` so it can be reported against its own column.
pub fn split_type_list(types: &str) -> Result<Vec<&str>, (usize, &str)> {
    if types.trim().is_empty() {
        return Ok(vec![]);
    }

    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in types.char_indices() {
        match ch {
            '(' | '<' => depth += 1,
            ')' | '>' => depth = depth.saturating_sub(1),
            ':' | ',' if depth == 0 => {
                tokens.push(types[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = types[start..].trim();
    if depth > 0 {
        return Err((tokens.len(), last));
    }
    tokens.push(last);
    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: PrimitiveType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            data_type,
            comment: None,
        }
    }
}

/// Ordered, validated column list. Always holds at least one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaDescriptor {
    columns: Vec<Column>,
}

impl SchemaDescriptor {
    /// Validate host-supplied names and type strings into a schema.
    ///
    /// Fails with `ArityMismatch` when the sequences differ in length, and
    /// with `UnsupportedType` naming the first column whose type string is
    /// not a supported primitive.
    pub fn build<N, T>(names: &[N], type_strings: &[T]) -> Result<Self, SetupError>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        if names.len() != type_strings.len() {
            return Err(SetupError::ArityMismatch {
                names: names.len(),
                types: type_strings.len(),
            });
        }
        if names.is_empty() {
            return Err(SetupError::EmptySchema);
        }

        let columns = names
            .iter()
            .zip(type_strings)
            .enumerate()
            .map(|(index, (name, ty))| {
                let name = name.as_ref();
                let ty = ty.as_ref();
                PrimitiveType::parse(ty)
                    .map(|data_type| Column::new(name, data_type))
                    .ok_or_else(|| SetupError::UnsupportedType {
                        index,
                        name: name.to_string(),
                        type_string: ty.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns })
    }

    /// Attach descriptive comments by position. Missing comments stay `None`;
    /// extra comments are ignored.
    pub fn with_comments<I, S>(mut self, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (column, comment) in self.columns.iter_mut().zip(comments) {
            let comment = comment.into();
            column.comment = (!comment.is_empty()).then_some(comment);
        }
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Never true for a built schema.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn types(&self) -> impl Iterator<Item = PrimitiveType> + '_ {
        self.columns.iter().map(|c| c.data_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primitive_spellings() {
        assert_eq!(PrimitiveType::parse("INT"), Some(PrimitiveType::Int));
        assert_eq!(PrimitiveType::parse(" bigint "), Some(PrimitiveType::Long));
        assert_eq!(PrimitiveType::parse("varchar(20)"), Some(PrimitiveType::Varchar(20)));
        assert_eq!(PrimitiveType::parse("char( 5 )"), Some(PrimitiveType::Char(5)));
        assert_eq!(PrimitiveType::parse("decimal(10,2)"), Some(PrimitiveType::Decimal));
        assert_eq!(PrimitiveType::parse("double precision"), Some(PrimitiveType::Double));
    }

    #[test]
    fn rejects_complex_and_malformed_types() {
        for ty in [
            "array<int>",
            "map<string,int>",
            "binary",
            "char",
            "char(0)",
            "char(256)",
            "varchar(x)",
            "decimal(39)",
            "decimal(5,6)",
            "int(3)",
            "char(5",
        ] {
            assert_eq!(PrimitiveType::parse(ty), None, "{ty}");
        }
    }

    #[test]
    fn splits_type_list_at_depth_zero() {
        assert_eq!(
            split_type_list("int:decimal(10,2),map<string,int>:string"),
            Ok(vec!["int", "decimal(10,2)", "map<string,int>", "string"])
        );
        assert_eq!(split_type_list("  "), Ok(vec![]));
        assert_eq!(split_type_list("int:char(5"), Err((1, "char(5")));
        assert_eq!(
            split_type_list("char(5:int:string"),
            Err((0, "char(5:int:string"))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        let ty = PrimitiveType::Varchar(12);
        assert_eq!(ty.to_string(), "varchar(12)");
        assert_eq!(PrimitiveType::parse(&ty.to_string()), Some(ty));
    }
}
