//! Custom assertion helpers for generated documents.

use serde_yaml::Value;

/// Keys of a generated mapping, in emission order.
#[allow(dead_code)]
pub fn mapping_keys(value: &Value) -> Vec<String> {
    value
        .as_mapping()
        .map(|mapping| {
            mapping
                .keys()
                .filter_map(|key| key.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Assert that a generated mapping has exactly `expected` keys, in order.
#[allow(dead_code)]
pub fn assert_keys(value: &Value, expected: &[&str]) {
    assert_eq!(mapping_keys(value), expected, "unexpected keys in {value:?}");
}

/// Assert that no string anywhere in `value` still holds a placeholder.
#[allow(dead_code)]
pub fn assert_fully_resolved(value: &Value) {
    match value {
        Value::String(text) => assert!(
            !text.contains("<<"),
            "unresolved placeholder left in {text:?}"
        ),
        Value::Sequence(items) => items.iter().for_each(assert_fully_resolved),
        Value::Mapping(mapping) => mapping.iter().for_each(|(key, item)| {
            assert_fully_resolved(key);
            assert_fully_resolved(item);
        }),
        _ => {}
    }
}
