//! Literal delimiter splitting.
//!
//! The delimiter is matched as plain text (never a pattern) and may span
//! several characters. Nothing is trimmed, quoted or escaped: a delimiter at
//! either end of the record produces an empty field there.

use delimrow_core::error::SetupError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSplitter {
    delimiter: String,
}

impl FieldSplitter {
    pub fn new(delimiter: impl Into<String>) -> Result<Self, SetupError> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(SetupError::MissingDelimiter);
        }
        Ok(Self { delimiter })
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn split<'r>(&'r self, record: &'r str) -> std::str::Split<'r, &'r str> {
        record.split(self.delimiter.as_str())
    }

    /// The first `width` fields of `record`, or `None` when it has fewer.
    /// Fields past `width` are never scanned.
    pub fn leading_fields<'r>(&self, record: &'r str, width: usize) -> Option<Vec<&'r str>> {
        let fields: Vec<&'r str> = record.split(self.delimiter.as_str()).take(width).collect();
        (fields.len() == width).then_some(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_multi_char_delimiter() {
        let s = FieldSplitter::new("||").unwrap();
        let fields: Vec<_> = s.split("7||alice||9.5").collect();
        assert_eq!(fields, vec!["7", "alice", "9.5"]);
    }

    #[test]
    fn edge_delimiters_yield_empty_fields() {
        let s = FieldSplitter::new("::").unwrap();
        let fields: Vec<_> = s.split("::a::").collect();
        assert_eq!(fields, vec!["", "a", ""]);
    }

    #[test]
    fn delimiter_is_not_a_pattern() {
        let s = FieldSplitter::new(".*").unwrap();
        let fields: Vec<_> = s.split("a.*b.c").collect();
        assert_eq!(fields, vec!["a", "b.c"]);
    }

    #[test]
    fn whitespace_is_preserved() {
        let s = FieldSplitter::new("|").unwrap();
        let fields: Vec<_> = s.split(" a | b ").collect();
        assert_eq!(fields, vec![" a ", " b "]);
    }

    #[test]
    fn leading_fields_requires_minimum_width() {
        let s = FieldSplitter::new("||").unwrap();
        assert_eq!(s.leading_fields("1||2", 3), None);
        assert_eq!(s.leading_fields("1||2||3||4", 3), Some(vec!["1", "2", "3"]));
        assert_eq!(s.leading_fields("", 1), Some(vec![""]));
    }

    #[test]
    fn empty_delimiter_is_rejected() {
        assert_eq!(FieldSplitter::new(""), Err(SetupError::MissingDelimiter));
    }
}
