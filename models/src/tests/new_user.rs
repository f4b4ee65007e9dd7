use crate::{ModelError, NewUser, NewUserBuilder};

use serde_json::{Map, Value, json};

fn complete_attributes() -> Map<String, Value> {
    match json!({
        "firstname": "Ada",
        "lastname": "Lovelace",
        "roleId": 2,
        "email": "ada@example.com",
        "timezone": "UTC",
        "password": "Passw0rd!"
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn missing_attribute(result: Result<NewUser, ModelError>) -> &'static str {
    match result {
        Err(ModelError::MissingAttribute { attribute, .. }) => attribute,
        other => panic!("expected MissingAttribute, got {other:?}"),
    }
}

/// **VALUE**: Verifies that each required attribute, when omitted alone, is the one reported.
///
/// **WHY THIS MATTERS**: The platform shows this message to the admin who filled in the
/// create form. Naming the wrong field sends them hunting in the wrong place.
///
/// **BUG THIS CATCHES**: Would catch a required field being dropped from validation or
/// two fields being checked under the same name.
#[test]
fn given_single_required_attribute_missing_when_validated_then_names_that_attribute() {
    let cases = [
        ("firstname", "firstname"),
        ("lastname", "lastname"),
        ("roleId", "role"),
        ("email", "email"),
        ("timezone", "timezone"),
        ("password", "password"),
    ];

    for (key, reported) in cases {
        // GIVEN: A complete plan with one attribute removed
        let mut attributes = complete_attributes();
        attributes.remove(key);

        // WHEN: Validating
        let result = NewUser::from_attributes(&attributes);

        // THEN: The removed attribute is named
        assert_eq!(missing_attribute(result), reported, "removing {key}");
    }
}

/// **VALUE**: Verifies the check order firstname → lastname → role → email → timezone → password.
///
/// **BUG THIS CATCHES**: Would catch validation being driven by map iteration order,
/// which would make the reported field depend on how the platform serialized the plan.
#[test]
fn given_empty_plan_when_validated_then_reports_firstname_first() {
    // GIVEN: Lastname and email present, everything else empty or missing
    let mut attributes = Map::new();
    attributes.insert("email".into(), json!("ada@example.com"));
    attributes.insert("lastname".into(), json!("Lovelace"));
    attributes.insert("firstname".into(), json!(""));

    // WHEN/THEN: firstname is reported even though it is present as ""
    assert_eq!(missing_attribute(NewUser::from_attributes(&attributes)), "firstname");

    // AND: once firstname is set, role comes before email
    attributes.insert("firstname".into(), json!("Ada"));
    assert_eq!(missing_attribute(NewUser::from_attributes(&attributes)), "role");
}

#[test]
fn given_blank_values_when_validated_then_treated_as_missing() {
    let mut attributes = complete_attributes();
    attributes.insert("timezone".into(), json!("   "));
    assert_eq!(missing_attribute(NewUser::from_attributes(&attributes)), "timezone");

    let mut attributes = complete_attributes();
    attributes.insert("roleId".into(), Value::Null);
    assert_eq!(missing_attribute(NewUser::from_attributes(&attributes)), "role");

    let mut attributes = complete_attributes();
    attributes.insert("roleId".into(), json!(0));
    assert_eq!(missing_attribute(NewUser::from_attributes(&attributes)), "role");
}

/// **VALUE**: Verifies the payload keeps vendor field names and passes extras through.
///
/// **BUG THIS CATCHES**: Would catch the password being dropped by the redacting wrapper,
/// or unknown attributes silently disappearing from the create request.
#[test]
fn given_complete_plan_when_payload_built_then_contains_all_fields() {
    // GIVEN: A complete plan with an extra attribute
    let mut attributes = complete_attributes();
    attributes.insert("department".into(), json!("R&D"));

    // WHEN: Building the payload
    let user = NewUser::from_attributes(&attributes).unwrap();
    let payload = user.to_payload();

    // THEN: Vendor names and values are all there
    assert_eq!(payload["firstname"], "Ada");
    assert_eq!(payload["lastname"], "Lovelace");
    assert_eq!(payload["roleId"], 2);
    assert_eq!(payload["email"], "ada@example.com");
    assert_eq!(payload["timezone"], "UTC");
    assert_eq!(payload["password"], "Passw0rd!");
    assert_eq!(payload["department"], "R&D");

    // AND: Debug output does not leak the password
    assert!(!format!("{user:?}").contains("Passw0rd!"));
}

#[test]
fn given_builder_with_all_fields_when_built_then_succeeds() {
    let user = NewUserBuilder::default()
        .with_firstname("Grace")
        .with_lastname("Hopper")
        .with_role_id("3")
        .with_email("grace@example.com")
        .with_timezone("America/New_York")
        .with_password("hunter22")
        .build()
        .unwrap();

    assert_eq!(user.firstname, "Grace");
    assert_eq!(user.role_id, json!("3"));
}

#[test]
fn given_missing_attribute_error_when_message_read_then_has_no_location() {
    let err = NewUserBuilder::default().build().unwrap_err();
    assert_eq!(err.message(), "Required attribute firstname is either null or empty");
    assert!(err.to_string().contains("new_user.rs"));
}
