use schemars::schema_for;
use synthlab_core::Schema;

#[test]
fn json_schema_describes_columns() {
    let generated = schema_for!(Schema);
    let generated_json = serde_json::to_value(&generated).expect("serialize generated schema");

    let properties = generated_json
        .get("properties")
        .and_then(|value| value.as_object())
        .expect("root properties");
    assert!(properties.contains_key("columns"));

    let definitions = generated_json
        .get("definitions")
        .and_then(|value| value.as_object())
        .expect("definitions");
    assert!(definitions.contains_key("ColumnInfo"));
    assert!(definitions.contains_key("ColumnKind"));
}
