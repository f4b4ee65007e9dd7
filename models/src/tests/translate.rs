use crate::{AccountObject, EntitlementObject, ModelError, RoleRecord, UserRecord};

use serde_json::json;

/// **VALUE**: Verifies the user → account translation, including the string id.
///
/// **WHY THIS MATTERS**: The account key is how the platform correlates identities. Umbrella
/// sends numeric ids; the platform keys must be the same digits as a string.
///
/// **BUG THIS CATCHES**: Would catch ids rendered as `Number(123)` or quoted twice.
#[test]
fn given_active_vendor_user_when_translated_then_key_is_string_id() {
    // GIVEN: A vendor user record as JSON
    let user: UserRecord = serde_json::from_value(json!({
        "id": 8215739,
        "firstname": "Ada",
        "lastname": "Lovelace",
        "email": "ada@example.com",
        "role": "Full Admin",
        "roleId": 1,
        "status": "Active",
        "twoFactorEnable": false,
        "timezone": "UTC",
        "lastLoginTime": "2023-04-01T10:00:00Z"
    }))
    .unwrap();

    // WHEN: Translating
    let account = AccountObject::try_from(user).unwrap();

    // THEN: Key and attributes carry the vendor values
    assert_eq!(account.key.id(), "8215739");
    assert_eq!(account.attributes.id, "8215739");
    assert!(!account.disabled);
    assert_eq!(account.attributes.role, Some(json!("Full Admin")));

    // AND: The serialized object uses platform attribute names
    let value = serde_json::to_value(&account).unwrap();
    assert_eq!(value["key"], json!({"simple": {"id": "8215739"}}));
    assert_eq!(value["attributes"]["roleId"], 1);
    assert_eq!(value["attributes"]["twoFactorEnable"], false);
}

#[test]
fn given_non_active_status_when_translated_then_disabled() {
    let user = UserRecord {
        id: Some(crate::VendorId::Text("u-1".into())),
        status: Some(json!("Inactive")),
        ..Default::default()
    };

    let account = AccountObject::try_from(user).unwrap();

    assert!(account.disabled);
    assert_eq!(account.key.id(), "u-1");
}

/// **VALUE**: Verifies attributes of an unexpected type pass through instead of failing.
///
/// **WHY THIS MATTERS**: One user with an epoch `lastLoginTime` must not abort the
/// aggregation of every other user.
///
/// **BUG THIS CATCHES**: Would catch non-key attributes being typed strictly again.
#[test]
fn given_user_with_unexpected_attribute_types_when_translated_then_values_pass_through() {
    // GIVEN: Numeric login time, string 2FA flag, numeric status
    let user: UserRecord = serde_json::from_value(json!({
        "id": 42,
        "status": 1,
        "twoFactorEnable": "yes",
        "lastLoginTime": 1690000000
    }))
    .unwrap();

    // WHEN
    let account = AccountObject::try_from(user).unwrap();

    // THEN: Values kept as sent; only the string "Active" enables
    assert_eq!(account.attributes.last_login_time, Some(json!(1690000000)));
    assert_eq!(account.attributes.two_factor_enable, Some(json!("yes")));
    assert!(account.disabled);
}

#[test]
fn given_user_without_id_when_translated_then_translation_error() {
    let result = AccountObject::try_from(UserRecord::default());
    assert!(matches!(result, Err(ModelError::Translation { .. })));
}

/// **VALUE**: Verifies roles become `group` entitlements keyed by roleId.
#[test]
fn given_vendor_role_when_translated_then_group_entitlement() {
    // GIVEN: A vendor role
    let role: RoleRecord =
        serde_json::from_value(json!({"roleId": 2, "label": "Read Only", "organizationId": 1234})).unwrap();

    // WHEN: Translating
    let entitlement = EntitlementObject::try_from(role).unwrap();

    // THEN: type is group and the key is the role id
    assert_eq!(entitlement.entitlement_type, "group");
    assert_eq!(entitlement.key.id(), "2");
    let value = serde_json::to_value(&entitlement).unwrap();
    assert_eq!(value["type"], "group");
    assert_eq!(value["attributes"]["label"], "Read Only");
    assert_eq!(value["attributes"]["organizationId"], 1234);
}
