//! Schema descriptor validation tests

use delimrow::{PrimitiveType, SchemaDescriptor, SetupError};
use delimrow_core::schema::split_type_list;

#[test]
fn test_build_valid_schema() {
    let schema = SchemaDescriptor::build(
        &["id", "name", "score", "code"],
        &["int", "string", "double", "char(4)"],
    )
    .unwrap();

    assert_eq!(schema.len(), 4);
    assert_eq!(schema.names().collect::<Vec<_>>(), vec!["id", "name", "score", "code"]);
    assert_eq!(
        schema.types().collect::<Vec<_>>(),
        vec![
            PrimitiveType::Int,
            PrimitiveType::String,
            PrimitiveType::Double,
            PrimitiveType::Char(4)
        ]
    );
    assert_eq!(schema.index_of("score"), Some(2));
    assert_eq!(schema.index_of("missing"), None);
    assert_eq!(schema.column(3).map(|c| c.data_type), Some(PrimitiveType::Char(4)));
    assert!(schema.column(4).is_none());
}

#[test]
fn test_all_primitive_types_accepted() {
    let types = [
        "string", "tinyint", "smallint", "int", "bigint", "float", "double", "boolean",
        "timestamp", "date", "decimal", "char(10)", "varchar(10)",
    ];
    let names: Vec<String> = (0..types.len()).map(|i| format!("c{}", i)).collect();
    let schema = SchemaDescriptor::build(&names, &types).unwrap();
    assert_eq!(schema.len(), types.len());
}

#[test]
fn test_arity_mismatch() {
    let err = SchemaDescriptor::build(&["a", "b", "c"], &["int", "int"]).unwrap_err();
    assert_eq!(err, SetupError::ArityMismatch { names: 3, types: 2 });
}

#[test]
fn test_unsupported_type_names_column() {
    let err = SchemaDescriptor::build(&["a", "tags"], &["int", "array<string>"]).unwrap_err();
    assert_eq!(
        err,
        SetupError::UnsupportedType {
            index: 1,
            name: "tags".into(),
            type_string: "array<string>".into(),
        }
    );
    let msg = err.to_string();
    assert!(msg.contains("[1]"));
    assert!(msg.contains("array<string>"));
}

#[test]
fn test_first_unsupported_column_is_reported() {
    let err = SchemaDescriptor::build(&["a", "b", "c"], &["binary", "int", "void"]).unwrap_err();
    assert!(matches!(err, SetupError::UnsupportedType { index: 0, .. }));
}

#[test]
fn test_empty_schema_rejected() {
    let names: [&str; 0] = [];
    let err = SchemaDescriptor::build(&names, &names).unwrap_err();
    assert_eq!(err, SetupError::EmptySchema);
}

#[test]
fn test_type_list_with_parameters() {
    let types = split_type_list("int:decimal(12,4):varchar(8)").unwrap();
    let schema = SchemaDescriptor::build(&["a", "b", "c"], &types).unwrap();
    assert_eq!(
        schema.types().collect::<Vec<_>>(),
        vec![PrimitiveType::Int, PrimitiveType::Decimal, PrimitiveType::Varchar(8)]
    );
}

#[test]
fn test_comments_attach_by_position() {
    let schema = SchemaDescriptor::build(&["a", "b", "c"], &["int", "int", "int"])
        .unwrap()
        .with_comments(vec!["first", ""]);

    assert_eq!(schema.columns()[0].comment.as_deref(), Some("first"));
    assert_eq!(schema.columns()[1].comment, None);
    assert_eq!(schema.columns()[2].comment, None);
}

#[test]
fn test_schema_description_serializes_type_names() {
    let schema = SchemaDescriptor::build(&["id", "tag"], &["bigint", "varchar(3)"]).unwrap();
    let json = serde_json::to_value(&schema).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "columns": [
                {"name": "id", "data_type": "bigint"},
                {"name": "tag", "data_type": "varchar(3)"}
            ]
        })
    );
}
