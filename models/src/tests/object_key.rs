use crate::{AccountReadInput, ObjectKey};

use serde_json::json;

/// **VALUE**: Verifies the wire shape of simple and compound keys.
///
/// **WHY THIS MATTERS**: The platform sends keys as `{"simple":{"id":..}}`. A shape
/// mismatch would make every read and delete input fail to parse.
#[test]
fn given_platform_key_json_when_parsed_then_id_resolves() {
    // GIVEN: Simple and compound key payloads
    let simple: AccountReadInput = serde_json::from_value(json!({"key": {"simple": {"id": "42"}}})).unwrap();
    let compound: ObjectKey =
        serde_json::from_value(json!({"compound": {"lookupId": "7", "uniqueId": "u-7"}})).unwrap();

    // THEN: id() picks the native identifier
    assert_eq!(simple.key.id(), "42");
    assert_eq!(compound.id(), "7");
}

#[test]
fn given_simple_key_when_serialized_then_matches_platform_shape() {
    let key = ObjectKey::simple("99");
    assert_eq!(serde_json::to_value(&key).unwrap(), json!({"simple": {"id": "99"}}));
}
