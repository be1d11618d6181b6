//! Structural properties of reference inlining.

use proptest::prelude::*;
use serde_json::Value;

use apicheck_runner::openapi::inline_refs;

/// Arbitrary JSON with no `$ref` keys (object keys are drawn from
/// `[a-z_]`, which cannot produce `$ref`).
fn arb_ref_free_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-z]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// A schema with no references is returned unchanged.
    #[test]
    fn ref_free_schema_is_identity(schema in arb_ref_free_json()) {
        let document = Value::Null;
        let inlined = inline_refs(&document, &schema).unwrap();
        prop_assert_eq!(inlined, schema);
    }

    /// Inlining is a fixed point: inlining an already-inlined schema yields
    /// an identical structure.
    #[test]
    fn inlining_reaches_a_fixed_point(target in arb_ref_free_json()) {
        let document = serde_json::json!({
            "components": {"schemas": {"Target": target}}
        });
        let schema = serde_json::json!({"$ref": "#/components/schemas/Target"});

        let once = inline_refs(&document, &schema).unwrap();
        let twice = inline_refs(&document, &once).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// After one pass, no `$ref` keys remain anywhere in the output.
    #[test]
    fn inlined_output_has_no_refs(target in arb_ref_free_json()) {
        let document = serde_json::json!({
            "components": {"schemas": {"Target": target}}
        });
        let schema = serde_json::json!({
            "properties": {"a": {"$ref": "#/components/schemas/Target"}}
        });

        let inlined = inline_refs(&document, &schema).unwrap();
        prop_assert!(!contains_ref(&inlined));
    }
}

fn contains_ref(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key("$ref") || map.values().any(contains_ref)
        }
        Value::Array(items) => items.iter().any(contains_ref),
        _ => false,
    }
}
