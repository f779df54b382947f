//! End-to-end record submission over an in-memory record table.

mod support;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use mineops::domain::RecordKind;
use mineops::test_support::{InMemoryCredentialStore, InMemoryProcedureGateway, RecordTable};
use rstest::rstest;
use serde_json::{Value, json};

fn excavation(quantity: &str) -> Value {
    json!({
        "Prod_date": "2024-03-05T10:00:00Z", "Shift": "A", "Loc_id": 3,
        "Face_Desc": "North bench", "OB_QTY_Cum": 5400, "ORE_QTY": quantity,
        "HG_QTY": "310.5", "MG_QTY": "420", "LG_QTY": "180", "userId": "10452"
    })
}

async fn submit(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    path: &str,
    body: Value,
) -> (StatusCode, Value) {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/users/{path}"))
            .set_json(body)
            .to_request(),
    )
    .await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

fn wired(kind: RecordKind) -> (mineops::inbound::http::state::HttpState, InMemoryProcedureGateway, RecordTable) {
    let (gateway, table) = InMemoryProcedureGateway::new().with_record_table(kind);
    let state = support::http_state(InMemoryCredentialStore::new(), gateway.clone());
    (state, gateway, table)
}

#[actix_web::test]
async fn submitting_the_same_key_twice_updates_the_single_row() {
    let (state, gateway, table) = wired(RecordKind::DailyExcavation);
    let app = test::init_service(support::app(state)).await;

    let (status, first) = submit(&app, "daily-excavation", excavation("1200")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["outcome"], json!("created"));
    assert_eq!(first["message"], json!("Daily excavation plan data submitted successfully!"));
    assert_eq!(first["data"][0]["Prod_date"], json!("2024-03-05"));

    let (status, second) = submit(&app, "daily-excavation", excavation("1350")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["outcome"], json!("updated"));

    let rows = table.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("ORE_QTY"), Some(&json!("1350")));
    assert_eq!(
        gateway.procedures_called(),
        [
            "SP_MINES_DAILY_EXCAVATION_PLAN_FIND",
            "SP_MINES_DAILY_EXCAVATION_PLAN_INSERT",
            "SP_MINES_DAILY_EXCAVATION_PLAN_FIND",
            "SP_MINES_DAILY_EXCAVATION_PLAN_UPDATE",
        ]
    );
}

#[actix_web::test]
async fn different_keys_create_separate_rows() {
    let (state, _, table) = wired(RecordKind::DailyExcavation);
    let app = test::init_service(support::app(state)).await;

    let mut other_shift = excavation("900");
    other_shift["Shift"] = json!("B");
    submit(&app, "daily-excavation", excavation("1200")).await;
    let (_, body) = submit(&app, "daily-excavation", other_shift).await;

    assert_eq!(body["outcome"], json!("created"));
    assert_eq!(table.len(), 2);
}

#[actix_web::test]
async fn atomic_fuel_upsert_reports_branch_without_marker() {
    let (state, gateway, table) = wired(RecordKind::FuelIssue);
    let app = test::init_service(support::app(state)).await;
    let body = json!({
        "Issue_date": "2024-03-05", "Shift": "A", "Equip_id": "DMP-07",
        "Fuel_qty": 120.5, "Hmr_reading": "8812", "Issued_by": "Store 2", "userId": 10452
    });

    let (_, first) = submit(&app, "fuel-issue", body.clone()).await;
    let (_, second) = submit(&app, "fuel-issue", body).await;

    assert_eq!(first["outcome"], json!("created"));
    assert_eq!(second["outcome"], json!("updated"));
    assert!(second["data"][0].get("inserted").is_none());
    assert_eq!(table.len(), 1);
    assert_eq!(
        gateway.procedures_called(),
        ["SP_MINES_FUEL_ISSUE_UPSERT", "SP_MINES_FUEL_ISSUE_UPSERT"]
    );
}

#[actix_web::test]
async fn form_encoded_submissions_are_accepted() {
    let (state, _, table) = wired(RecordKind::DailyExcavation);
    let app = test::init_service(support::app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/daily-excavation")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(concat!(
                "Prod_date=2024-03-05&Shift=A&Loc_id=3&Face_Desc=North+bench&OB_QTY_Cum=5400",
                "&ORE_QTY=1200&HG_QTY=310.5&MG_QTY=420&LG_QTY=180&userId=10452"
            ))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(table.len(), 1);
}

#[actix_web::test]
async fn multipart_dashboard_submissions_are_stored() {
    let (state, _, table) = wired(RecordKind::HrKpi);
    let app = test::init_service(support::app(state)).await;

    let fields = [
        ("date", "2024-03-05"),
        ("plant_id", "1"),
        ("func_id", "4"),
        ("kpi_code", "HR-01"),
        ("uom", "%"),
        ("hr_target", "95"),
        ("actual_data", "92.5"),
        ("userId", "10452"),
    ];
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--XB\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str("--XB--\r\n");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/hr-dashboard")
            .insert_header((header::CONTENT_TYPE, "multipart/form-data; boundary=XB"))
            .set_payload(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].get("kpi_code"), Some(&json!("HR-01")));
}

#[rstest]
#[case("Shift")]
#[case("userId")]
#[case("Prod_date")]
#[case("ORE_QTY")]
#[actix_web::test]
async fn missing_fields_never_reach_the_store(#[case] field: &str) {
    let (state, gateway, table) = wired(RecordKind::DailyExcavation);
    let app = test::init_service(support::app(state)).await;
    let mut body = excavation("1200");
    if let Some(object) = body.as_object_mut() {
        object.remove(field);
    }

    let (status, error) = submit(&app, "daily-excavation", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["field"], json!(field));
    assert!(gateway.calls().is_empty());
    assert!(table.is_empty());
}

#[actix_web::test]
async fn listing_returns_stored_rows_with_dates_normalised() {
    let (state, _, _) = wired(RecordKind::DailyExcavation);
    let app = test::init_service(support::app(state)).await;
    submit(&app, "daily-excavation", excavation("1200")).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/users/showExcavation").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let rows: Vec<Value> = test::read_body_json(res).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Prod_date"], json!("2024-03-05"));
}
