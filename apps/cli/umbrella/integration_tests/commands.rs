use crate::helpers::Fixture;

use umbrella::cli::Command;
use umbrella::error::AppError;

use connector_core::ErrorKind;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn given_valid_config_when_test_connection_then_prints_empty_object() {
    // GIVEN
    let fixture = Fixture::start().await;

    // WHEN
    let lines = fixture.run(Command::TestConnection).await.unwrap();

    // THEN
    assert_eq!(lines, vec![json!({})]);
}

/// **VALUE**: Verifies a list command prints every record, in order, across pages.
///
/// **WHY THIS MATTERS**: This is the aggregation path the platform runs most often;
/// config page size must reach the `limit` query parameter.
#[tokio::test]
async fn given_users_over_two_pages_when_listing_then_one_line_per_account() {
    // GIVEN: pageSize 2 from the config file
    let fixture = Fixture::start().await;
    for (page, body) in [
        ("1", json!([{"id": 1, "status": "Active"}, {"id": 2, "status": "Active"}])),
        ("2", json!([{"id": 3, "status": "Inactive"}])),
        ("3", json!([])),
    ] {
        Mock::given(method("GET"))
            .and(path("/admin/v2/users"))
            .and(query_param("page", page))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&fixture.server)
            .await;
    }

    // WHEN
    let lines = fixture.run(Command::ListAccounts).await.unwrap();

    // THEN
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["key"], json!({"simple": {"id": "1"}}));
    assert_eq!(lines[2]["disabled"], json!(true));
    assert_eq!(lines[2]["attributes"]["id"], json!("3"));
}

#[tokio::test]
async fn given_roles_when_listing_entitlements_then_group_records_printed() {
    let fixture = Fixture::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/v2/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"roleId": 1, "label": "Full Admin", "organizationId": 123}
        ])))
        .mount(&fixture.server)
        .await;

    let lines = fixture.run(Command::ListEntitlements).await.unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["type"], json!("group"));
    assert_eq!(lines[0]["attributes"]["roleId"], json!("1"));
    assert_eq!(lines[0]["attributes"]["label"], json!("Full Admin"));
}

#[tokio::test]
async fn given_unknown_user_when_reading_then_invalid_request_passes_through() {
    // GIVEN
    let fixture = Fixture::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/v2/users/404404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
        .mount(&fixture.server)
        .await;

    // WHEN
    let result = fixture
        .run(Command::ReadAccount { id: String::from("404404") })
        .await;

    // THEN: Kind survives the handler boundary
    match result {
        Err(AppError::Connector(e)) => {
            assert_eq!(e.kind(), ErrorKind::InvalidRequest);
            assert!(e.message().contains("no such user"));
        }
        other => panic!("expected connector error, got: {other:?}"),
    }
}

#[tokio::test]
async fn given_existing_user_when_deleting_then_prints_empty_object() {
    let fixture = Fixture::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/v2/users/77"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let lines = fixture
        .run(Command::DeleteAccount { id: String::from("77") })
        .await
        .unwrap();

    assert_eq!(lines, vec![json!({})]);
}

#[tokio::test]
async fn given_complete_attributes_when_creating_then_created_account_printed() {
    // GIVEN
    let fixture = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/v2/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 555,
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": "ada@example.com",
            "roleId": 2,
            "status": "Active",
            "timezone": "UTC"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;
    let attributes = json!({
        "firstname": "Ada",
        "lastname": "Lovelace",
        "email": "ada@example.com",
        "roleId": 2,
        "timezone": "UTC",
        "password": "Sup3r-secret!"
    });

    // WHEN
    let lines = fixture
        .run(Command::CreateAccount {
            attributes: attributes.to_string(),
            identity: None,
        })
        .await
        .unwrap();

    // THEN
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["key"], json!({"simple": {"id": "555"}}));
    assert_eq!(lines[0]["disabled"], json!(false));
}

/// **VALUE**: Verifies malformed `--attributes` fails before the connector is touched.
#[tokio::test]
async fn given_malformed_attributes_when_creating_then_input_error_without_network() {
    // GIVEN
    let fixture = Fixture::start().await;

    // WHEN
    let result = fixture
        .run(Command::CreateAccount {
            attributes: String::from("not json"),
            identity: None,
        })
        .await;

    // THEN
    assert!(matches!(result, Err(AppError::Input { .. })));
    assert!(
        fixture
            .server
            .received_requests()
            .await
            .unwrap_or_default()
            .is_empty()
    );
}

#[tokio::test]
async fn given_missing_required_attribute_when_creating_then_invalid_request() {
    let fixture = Fixture::start().await;

    let result = fixture
        .run(Command::CreateAccount {
            attributes: json!({"firstname": "Ada"}).to_string(),
            identity: None,
        })
        .await;

    match result {
        Err(AppError::Connector(e)) => {
            assert_eq!(e.kind(), ErrorKind::InvalidRequest);
            assert_eq!(e.message(), "Required attribute lastname is either null or empty");
        }
        other => panic!("expected connector error, got: {other:?}"),
    }
}

/// **VALUE**: Verifies the connector (and its token) is reused across commands.
///
/// **BUG THIS CATCHES**: Would catch the handler context rebuilding the connector per
/// call, which costs a token request per operation.
#[tokio::test]
async fn given_one_context_when_running_two_commands_then_single_token_request() {
    // GIVEN
    let fixture = Fixture::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/v2/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&fixture.server)
        .await;

    // WHEN
    fixture.run(Command::TestConnection).await.unwrap();
    fixture.run(Command::ListEntitlements).await.unwrap();

    // THEN
    let token_calls = fixture
        .server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/auth/v2/token")
        .count();
    assert_eq!(token_calls, 1);
}
