//! End-to-end login behaviour over in-memory credential and profile stores.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use mineops::domain::{ADMIN_PROFILE, Row, TRACE_ID_HEADER, hash_credential};
use mineops::domain::ports::StoreError;
use mineops::test_support::{InMemoryCredentialStore, InMemoryProcedureGateway};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const IDENTITY: &str = "10452";
const PASSWORD: &str = "Shift-A-2024";

fn profile() -> Row {
    let mut row = Row::new();
    row.insert("userid".to_owned(), json!(IDENTITY));
    row.insert("name".to_owned(), json!("R. Mahato"));
    row.insert("USER_PWD".to_owned(), json!(hash_credential(PASSWORD).as_str()));
    row.insert("password".to_owned(), json!("legacy"));
    row
}

#[fixture]
fn store() -> InMemoryCredentialStore {
    InMemoryCredentialStore::new().with_account(IDENTITY, PASSWORD)
}

#[fixture]
fn gateway() -> InMemoryProcedureGateway {
    InMemoryProcedureGateway::new().with_rows(ADMIN_PROFILE.name(), vec![profile()])
}

async fn login(
    store: InMemoryCredentialStore,
    gateway: InMemoryProcedureGateway,
    body: Value,
) -> (StatusCode, Option<String>, Value) {
    let app = test::init_service(support::app(support::http_state(store, gateway))).await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/adminlogin")
            .set_json(body)
            .to_request(),
    )
    .await;
    let status = res.status();
    let trace_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body: Value = test::read_body_json(res).await;
    (status, trace_id, body)
}

#[rstest]
#[actix_web::test]
async fn correct_credentials_return_profile_without_credential_fields(
    store: InMemoryCredentialStore,
    gateway: InMemoryProcedureGateway,
) {
    let (status, trace_id, body) = login(
        store,
        gateway.clone(),
        json!({ "userid": IDENTITY, "password": PASSWORD }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(trace_id.is_some());
    let user = body["user"].as_object().expect("user object");
    assert_eq!(user.get("name"), Some(&json!("R. Mahato")));
    assert!(!user.contains_key("USER_PWD"));
    assert!(!user.contains_key("password"));

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].args,
        [
            Some(IDENTITY.to_owned()),
            Some(hash_credential(PASSWORD).as_str().to_owned())
        ]
    );
}

#[rstest]
#[case(json!({ "userid": IDENTITY, "password": "wrong" }))]
#[case(json!({ "userid": "99999", "password": PASSWORD }))]
#[actix_web::test]
async fn wrong_password_or_unknown_identity_is_unauthorized(
    store: InMemoryCredentialStore,
    gateway: InMemoryProcedureGateway,
    #[case] body: Value,
) {
    let (status, trace_id, body) = login(store, gateway.clone(), body).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Invalid credentials!"));
    assert_eq!(body["traceId"].as_str(), trace_id.as_deref());
    assert!(gateway.calls().is_empty());
}

#[rstest]
#[actix_web::test]
async fn uppercase_stored_digest_still_verifies(gateway: InMemoryProcedureGateway) {
    let stored = hash_credential(PASSWORD).as_str().to_ascii_uppercase();
    let store = InMemoryCredentialStore::new().with_stored_digest(IDENTITY, &stored);

    let (status, _, _) =
        login(store, gateway, json!({ "identity": 10452, "plaintextCredential": PASSWORD })).await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn valid_credential_without_profile_is_not_found(store: InMemoryCredentialStore) {
    let gateway = InMemoryProcedureGateway::new().with_rows(ADMIN_PROFILE.name(), Vec::new());

    let (status, _, body) =
        login(store, gateway, json!({ "userid": IDENTITY, "password": PASSWORD })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("User data not found"));
}

#[rstest]
#[actix_web::test]
async fn unreachable_store_is_service_unavailable(gateway: InMemoryProcedureGateway) {
    let store = InMemoryCredentialStore::new().failing(StoreError::timeout("fetch_stored_digest"));

    let (status, _, body) =
        login(store, gateway, json!({ "userid": IDENTITY, "password": PASSWORD })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], json!("service_unavailable"));
}

#[rstest]
#[actix_web::test]
async fn failing_profile_procedure_is_a_redacted_internal_error(store: InMemoryCredentialStore) {
    let gateway = InMemoryProcedureGateway::new().with_failure(
        ADMIN_PROFILE.name(),
        StoreError::query("syntax error near SP_MINES_ADMIN_USER_GET"),
    );

    let (status, _, body) =
        login(store, gateway, json!({ "userid": IDENTITY, "password": PASSWORD })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], json!("internal_error"));
    assert_eq!(body["error"], json!("Internal server error"));
}

#[rstest]
#[actix_web::test]
async fn account_listing_strips_digests(store: InMemoryCredentialStore, gateway: InMemoryProcedureGateway) {
    let app = test::init_service(support::app(support::http_state(store, gateway))).await;
    let res = test::call_service(&app, test::TestRequest::get().uri("/api/users").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    let rows: Vec<Value> = test::read_body_json(res).await;
    assert_eq!(rows, [json!({ "userid": IDENTITY })]);
}
