use crate::helpers::{
    ROLES_PATH, USERS_PATH, api_requests, connector_for, mount_token, token_requests, user_json,
};

use connector_core::ErrorKind;

use models::{
    AccountCreateInput, AccountDeleteInput, AccountDeleteOutput, AccountObject, AccountReadInput,
    EntitlementObject, ObjectKey, TestConnectionOutput,
};

use serde_json::{Map, Value, json};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_plan() -> Map<String, Value> {
    let mut attributes = Map::new();
    attributes.insert("firstname".into(), json!("Ada"));
    attributes.insert("lastname".into(), json!("Lovelace"));
    attributes.insert("email".into(), json!("ada@example.com"));
    attributes.insert("roleId".into(), json!(2));
    attributes.insert("timezone".into(), json!("UTC"));
    attributes.insert("password".into(), json!("Sup3r-secret!"));
    attributes
}

// ============================================================================
// Test connection
// ============================================================================

#[tokio::test]
async fn given_valid_credentials_when_testing_connection_then_one_empty_output() {
    // GIVEN
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    let connector = connector_for(&server);
    let mut sink: Vec<TestConnectionOutput> = Vec::new();

    // WHEN
    connector.test_connection(&mut sink).await.unwrap();

    // THEN
    assert_eq!(sink, vec![TestConnectionOutput::default()]);
    assert_eq!(token_requests(&server).await, 1);
}

/// **VALUE**: Verifies an unreachable host surfaces as a configuration problem.
///
/// **WHY THIS MATTERS**: A wrong base URL or a blocked port is the most common
/// setup mistake. Reporting it as "invalid configuration" points the operator
/// at the right place.
#[tokio::test]
async fn given_nothing_listening_when_testing_connection_then_connection_refused() {
    // GIVEN: A base URL on a port nobody listens on
    let config = connector_core::ConnectorConfig::new("key", "secret")
        .unwrap()
        .with_base_url(url::Url::parse("http://127.0.0.1:1").unwrap());
    let connector = connector_core::UmbrellaConnector::new(&config).unwrap();
    let mut sink: Vec<TestConnectionOutput> = Vec::new();

    // WHEN
    let err = connector.test_connection(&mut sink).await.unwrap_err();

    // THEN
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    assert!(err.message().starts_with("Connection refused."), "got: {}", err.message());
    assert!(sink.is_empty());
}

// ============================================================================
// Read account
// ============================================================================

#[tokio::test]
async fn given_existing_user_when_reading_then_account_emitted() {
    // GIVEN
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(format!("{USERS_PATH}/17")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(17, "Active")))
        .expect(1)
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    // WHEN
    let input = AccountReadInput { key: ObjectKey::simple("17") };
    connector.read_account(&input, &mut sink).await.unwrap();

    // THEN
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].key, ObjectKey::simple("17"));
    assert!(!sink[0].disabled);
    assert_eq!(sink[0].attributes.email, Some(json!("user17@example.com")));
}

/// **VALUE**: Verifies blank identifiers are rejected before any network traffic.
///
/// **BUG THIS CATCHES**: Would catch `GET /admin/v2/users/` being sent, which the API
/// answers with a user LIST rather than an error.
#[tokio::test]
async fn given_blank_identifier_when_reading_then_invalid_request_without_network() {
    // GIVEN: A server that expects nothing
    let server = MockServer::start().await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    // WHEN
    let input = AccountReadInput { key: ObjectKey::simple("  ") };
    let err = connector.read_account(&input, &mut sink).await.unwrap_err();

    // THEN
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert_eq!(err.message(), "Native identifier cannot be empty.");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn given_empty_body_when_reading_then_invalid_response() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(format!("{USERS_PATH}/17")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    let input = AccountReadInput { key: ObjectKey::simple("17") };
    let err = connector.read_account(&input, &mut sink).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    assert_eq!(err.message(), "Empty response for user resource retrieve.");
    assert!(sink.is_empty());
}

#[tokio::test]
async fn given_unknown_user_when_reading_then_invalid_request() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(format!("{USERS_PATH}/99")))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    let input = AccountReadInput { key: ObjectKey::simple("99") };
    let err = connector.read_account(&input, &mut sink).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert!(err.message().starts_with("404"));
}

// ============================================================================
// List accounts
// ============================================================================

/// **VALUE**: Verifies pagination walks pages 1, 2, 3 and stops on the first empty page.
///
/// **WHY THIS MATTERS**: The API gives no total; the empty page is the only stop
/// signal. Off-by-one here either drops the first page or loops forever.
///
/// **BUG THIS CATCHES**: Would catch pages starting at 0, a missing increment, or
/// records from the empty terminating page being counted.
#[tokio::test]
async fn given_two_full_pages_when_listing_accounts_then_all_records_in_order() {
    // GIVEN: [2 users, 2 users, empty]
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    for (page, body) in [
        ("1", json!([user_json(1, "Active"), user_json(2, "Active")])),
        ("2", json!([user_json(3, "Inactive"), user_json(4, "Active")])),
        ("3", json!([])),
    ] {
        Mock::given(method("GET"))
            .and(path(USERS_PATH))
            .and(query_param("page", page))
            .and(query_param("limit", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    // WHEN
    connector.list_accounts(&mut sink).await.unwrap();

    // THEN: 4 accounts, order preserved, third disabled
    let ids: Vec<&str> = sink.iter().map(|a| a.key.id()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert!(sink[2].disabled);

    let pages: Vec<String> = api_requests(&server)
        .await
        .iter()
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "page")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(pages, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn given_configured_page_size_when_listing_then_limit_follows_config() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(query_param("page", "1"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let config = crate::helpers::config_for(&server).with_page_size(50);
    let client = connector_core::UmbrellaClient::new(&config)
        .unwrap()
        .with_retry_policy(crate::helpers::fast_retry());
    let connector = connector_core::UmbrellaConnector::from_client(client);
    let mut sink: Vec<AccountObject> = Vec::new();

    connector.list_accounts(&mut sink).await.unwrap();

    assert!(sink.is_empty());
}

#[tokio::test]
async fn given_null_body_when_listing_accounts_then_stops_without_error() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    connector.list_accounts(&mut sink).await.unwrap();

    assert!(sink.is_empty());
}

/// **VALUE**: Verifies a page that is not a list fails the aggregation.
///
/// **WHY THIS MATTERS**: Treating an error object as "no more users" reports a
/// successful aggregation with missing accounts, which deprovisions nothing and
/// hides the problem.
///
/// **BUG THIS CATCHES**: Would catch any non-array body being folded into the
/// empty-page stop condition.
#[tokio::test]
async fn given_object_body_when_listing_accounts_then_invalid_response() {
    // GIVEN: A 200 whose body is an object
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "unexpected"})))
        .expect(1)
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    // WHEN
    let err = connector.list_accounts(&mut sink).await.unwrap_err();

    // THEN
    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    assert!(err.message().contains("page 1"), "got: {}", err.message());
    assert!(sink.is_empty());
}

#[tokio::test]
async fn given_user_with_numeric_login_time_when_listing_then_account_still_emitted() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "status": "Active", "lastLoginTime": 1690000000},
            user_json(6, "Active")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    connector.list_accounts(&mut sink).await.unwrap();

    assert_eq!(sink.len(), 2);
    assert_eq!(sink[0].attributes.last_login_time, Some(json!(1690000000)));
}

#[tokio::test]
async fn given_failure_on_second_page_when_listing_then_first_page_already_emitted() {
    // GIVEN: page 1 fine, page 2 rejected
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_json(1, "Active")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad page"))
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    // WHEN
    let err = connector.list_accounts(&mut sink).await.unwrap_err();

    // THEN: emitted records stay emitted, error is classified
    assert_eq!(sink.len(), 1);
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
}

// ============================================================================
// List entitlements
// ============================================================================

#[tokio::test]
async fn given_roles_when_listing_entitlements_then_group_entitlements_emitted() {
    // GIVEN
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"roleId": 1, "label": "Full Admin", "organizationId": 0},
            {"roleId": 2, "label": "Read Only", "organizationId": 0}
        ])))
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<EntitlementObject> = Vec::new();

    // WHEN
    connector.list_entitlements(&mut sink).await.unwrap();

    // THEN
    assert_eq!(sink.len(), 2);
    assert_eq!(sink[0].key, ObjectKey::simple("1"));
    assert_eq!(sink[0].entitlement_type, "group");
    assert_eq!(sink[1].attributes.label, Some(json!("Read Only")));
}

#[tokio::test]
async fn given_empty_body_when_listing_entitlements_then_invalid_response() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("GET"))
        .and(path(ROLES_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<EntitlementObject> = Vec::new();

    let err = connector.list_entitlements(&mut sink).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    assert_eq!(err.message(), "Found empty response for entitlement list.");
}

// ============================================================================
// Delete account
// ============================================================================

#[tokio::test]
async fn given_existing_user_when_deleting_then_one_empty_output() {
    // GIVEN
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("DELETE"))
        .and(path(format!("{USERS_PATH}/42")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountDeleteOutput> = Vec::new();

    // WHEN
    let input = AccountDeleteInput { key: ObjectKey::simple("42") };
    connector.delete_account(&input, &mut sink).await.unwrap();

    // THEN
    assert_eq!(sink, vec![AccountDeleteOutput::default()]);
}

#[tokio::test]
async fn given_blank_identifier_when_deleting_then_invalid_request_without_network() {
    let server = MockServer::start().await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountDeleteOutput> = Vec::new();

    let input = AccountDeleteInput { key: ObjectKey::simple("") };
    let err = connector.delete_account(&input, &mut sink).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert_eq!(err.message(), "Native identifier cannot be empty.");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

// ============================================================================
// Create account
// ============================================================================

/// **VALUE**: Verifies the vendor payload and the numeric-to-string id conversion.
///
/// **WHY THIS MATTERS**: Umbrella returns numeric ids; the platform keys objects by
/// string. A number in the key breaks every later read or delete.
#[tokio::test]
async fn given_complete_plan_when_creating_then_payload_sent_and_string_id_emitted() {
    // GIVEN
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .and(body_partial_json(json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": "ada@example.com",
            "roleId": 2,
            "timezone": "UTC",
            "password": "Sup3r-secret!"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 8215739,
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": "ada@example.com",
            "roleId": 2,
            "status": "Active",
            "timezone": "UTC"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    // WHEN
    let input = AccountCreateInput { identity: None, attributes: create_plan() };
    connector.create_account(&input, &mut sink).await.unwrap();

    // THEN
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].key, ObjectKey::simple("8215739"));
    assert_eq!(sink[0].attributes.id, "8215739");
    assert!(!sink[0].disabled);
}

/// **VALUE**: Verifies validation failures never reach the network.
///
/// **BUG THIS CATCHES**: Would catch validation being moved after the POST, which
/// would leave half-created users on the vendor side.
#[tokio::test]
async fn given_plan_without_email_when_creating_then_invalid_request_without_network() {
    // GIVEN: No email
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut attributes = create_plan();
    attributes.remove("email");
    let mut sink: Vec<AccountObject> = Vec::new();

    // WHEN
    let input = AccountCreateInput { identity: None, attributes };
    let err = connector.create_account(&input, &mut sink).await.unwrap_err();

    // THEN
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert_eq!(
        err.message(),
        "Required attribute email is either null or empty"
    );
    assert!(sink.is_empty());
}

#[tokio::test]
async fn given_response_without_id_when_creating_then_invalid_response() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Active"})))
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    let input = AccountCreateInput { identity: None, attributes: create_plan() };
    let err = connector.create_account(&input, &mut sink).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    assert!(err.message().starts_with("Found empty response for user creation."));
}

#[tokio::test]
async fn given_duplicate_email_when_creating_then_conflict_is_invalid_request() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;
    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(409).set_body_string("email already exists"))
        .expect(1)
        .mount(&server)
        .await;
    let connector = connector_for(&server);
    let mut sink: Vec<AccountObject> = Vec::new();

    let input = AccountCreateInput { identity: None, attributes: create_plan() };
    let err = connector.create_account(&input, &mut sink).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert!(err.message().contains("email already exists"));
}
