#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{Value, json};

use common::*;
use rust_teaching_alloc::entity::allocations;

fn as_user(req: TestRequest, user: i64) -> TestRequest {
    req.insert_header(("X-User-Id", user.to_string()))
}

fn submit(user: i64, body: Value) -> TestRequest {
    as_user(TestRequest::post().uri("/api/requests"), user).set_json(body)
}

fn decision(id: i64, user: i64, body: Value) -> TestRequest {
    as_user(
        TestRequest::post().uri(&format!("/api/requests/{id}/decision")),
        user,
    )
    .set_json(body)
}

fn review(id: i64, user: i64) -> TestRequest {
    as_user(TestRequest::get().uri(&format!("/api/requests/{id}/review")), user)
}

#[actix_web::test]
async fn claims_are_validated_and_deduplicated() {
    let storage = seeded_storage().await;
    let app = init_app!(storage);

    let claim = json!({
        "allocation_id": 1000,
        "request_type": "claim",
        "request_reason": "Ran over time",
        "details": {"hours": "2", "paycode": "TU2"}
    });
    let resp = test::call_service(&app, submit(ALICE, claim.clone()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["request_status"], json!("pending_ta"));
    assert_eq!(body["data"]["requester_id"], json!(ALICE));
    assert_eq!(body["data"]["details"], json!({"hours": 2.0, "paycode": "TU2"}));

    let resp = test::call_service(&app, submit(ALICE, claim).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(
        &app,
        submit(
            ALICE,
            json!({"allocation_id": 1000, "request_type": "overtime", "details": {}}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        submit(
            ALICE,
            json!({"allocation_id": 1001, "request_type": "claim", "details": {"hours": 2}}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        submit(
            ALICE,
            json!({"allocation_id": 9999, "request_type": "query", "details": null}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn claim_review_compares_against_system_record() {
    let storage = seeded_storage().await;
    let app = init_app!(storage);

    let req = submit(
        ALICE,
        json!({
            "allocation_id": 1000,
            "request_type": "claim",
            "details": {"hours": 2.5, "paycode": "TU2"}
        }),
    )
    .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let body: Value = test::call_and_read_body_json(&app, review(id, COORDINATOR).to_request()).await;
    let view = &body["data"];
    assert_eq!(view["title"], json!("Claim Request"));
    assert_eq!(view["panel"]["kind"], json!("claim"));
    assert_eq!(view["panel"]["system_hours"], json!(1.0));
    assert_eq!(view["panel"]["system_paycode"], json!("TU1"));
    assert_eq!(view["panel"]["hours_differ"], json!(true));
    assert_eq!(view["panel"]["paycode_differs"], json!(true));
    assert_eq!(view["actions"], json!(["approve", "reject"]));
    assert_eq!(view["requester"]["id"], json!(ALICE));

    // 导师只能查看
    let body: Value = test::call_and_read_body_json(&app, review(id, BOB).to_request()).await;
    assert_eq!(body["data"]["actions"], json!([]));
}

#[actix_web::test]
async fn unknown_request_type_falls_back_and_cannot_be_decided() {
    let storage = seeded_storage().await;
    let id = insert_raw_request(&storage, "overtime", "pending_uc", "{\"minutes\": 30}").await;
    let app = init_app!(storage.clone());

    let body: Value = test::call_and_read_body_json(&app, review(id, ADMIN).to_request()).await;
    let view = &body["data"];
    assert_eq!(view["title"], json!("Unknown Request Type"));
    assert_eq!(view["panel"]["kind"], json!("unsupported"));
    assert_eq!(
        view["panel"]["message"],
        json!("This request type is not recognized or supported yet.")
    );
    assert_eq!(view["actions"], json!([]));

    let resp = test::call_service(
        &app,
        decision(id, ADMIN, json!({"action": "approve"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let row = request_row(&storage, id).await;
    assert_eq!(row.request_status, "pending_uc");
    assert_eq!(row.reviewer_id, None);
}

#[actix_web::test]
async fn malformed_details_still_render_a_review() {
    let storage = seeded_storage().await;
    let id = insert_raw_request(&storage, "claim", "pending_uc", "{\"hours\": \"abc\"}").await;
    let app = init_app!(storage);

    let body: Value = test::call_and_read_body_json(&app, review(id, COORDINATOR).to_request()).await;
    let view = &body["data"];
    assert_eq!(view["title"], json!("Claim Request"));
    assert_eq!(view["panel"]["kind"], json!("invalid_details"));
    assert_eq!(view["actions"], json!(["approve", "reject"]));
}

#[actix_web::test]
async fn review_workflow_forward_then_approve() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let req = submit(
        ALICE,
        json!({
            "allocation_id": 1001,
            "request_type": "correction",
            "details": {
                "date": "2025-03-18",
                "start_at": "09:00",
                "end_at": "11:00",
                "hours": 2
            }
        }),
    )
    .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let body: Value = test::call_and_read_body_json(&app, review(id, ASSISTANT).to_request()).await;
    assert_eq!(body["data"]["panel"]["kind"], json!("correction"));
    assert_eq!(
        body["data"]["panel"]["changed_fields"],
        json!(["date", "end_at", "hours"])
    );
    assert_eq!(body["data"]["actions"], json!(["forward", "reject"]));

    // 助教不能直接批准
    let resp = test::call_service(
        &app,
        decision(id, ASSISTANT, json!({"action": "approve"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 导师没有审核权限
    let resp = test::call_service(
        &app,
        decision(id, BOB, json!({"action": "reject"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        decision(id, ASSISTANT, json!({"action": "forward", "comment": "Looks right"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["request_status"], json!("pending_uc"));
    assert_eq!(body["data"]["reviewer_note"], json!("Looks right"));

    let resp = test::call_service(
        &app,
        decision(id, COORDINATOR, json!({"action": "approve", "reason": "ignored"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["request_status"], json!("approved"));
    assert_eq!(body["data"]["rejection_reason"], Value::Null);
    assert_eq!(body["data"]["reviewer_id"], json!(COORDINATOR));

    // 终态不可再审核
    let resp = test::call_service(
        &app,
        decision(id, ADMIN, json!({"action": "reject", "reason": "late"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(request_row(&storage, id).await.request_status, "approved");
}

#[actix_web::test]
async fn rejection_records_reason() {
    let storage = seeded_storage().await;
    let app = init_app!(storage);

    let req = submit(
        ALICE,
        json!({"allocation_id": 1000, "request_type": "query", "request_reason": "Why TU1?"}),
    )
    .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["request_status"], json!("pending_uc"));

    let body: Value = test::call_and_read_body_json(&app, review(id, COORDINATOR).to_request()).await;
    assert_eq!(body["data"]["panel"], json!({"kind": "query", "reason": "Why TU1?"}));
    assert_eq!(body["data"]["actions"], json!(["reject"]));

    let resp = test::call_service(
        &app,
        decision(id, COORDINATOR, json!({"action": "reject", "reason": "Rate is correct"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["request_status"], json!("rejected"));
    assert_eq!(body["data"]["rejection_reason"], json!("Rate is correct"));
}

#[actix_web::test]
async fn swap_and_cancellation_panels_list_other_tutors() {
    let storage = seeded_storage().await;
    allocations::ActiveModel {
        id: Set(1002),
        user_id: Set(Some(BOB)),
        ..Default::default()
    }
    .update(storage.connection())
    .await
    .unwrap();
    let app = init_app!(storage);

    let req = submit(
        ALICE,
        json!({
            "allocation_id": 1000,
            "request_type": "swap",
            "details": {"suggested_tutor_id": BOB}
        }),
    )
    .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let body: Value = test::call_and_read_body_json(&app, review(id, COORDINATOR).to_request()).await;
    let panel = &body["data"]["panel"];
    assert_eq!(panel["kind"], json!("swap"));
    assert_eq!(panel["suggested_tutor"]["id"], json!(BOB));
    let eligible: Vec<i64> = panel["eligible_allocations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(eligible, vec![1002]);

    let req = submit(
        ALICE,
        json!({"allocation_id": 1000, "request_type": "cancellation", "details": {}}),
    )
    .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let body: Value = test::call_and_read_body_json(&app, review(id, COORDINATOR).to_request()).await;
    let candidates: Vec<i64> = body["data"]["panel"]["replacement_candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect();
    assert_eq!(candidates, vec![BOB]);
}

#[actix_web::test]
async fn open_requests_can_be_filtered_to_mine() {
    let storage = seeded_storage().await;
    let app = init_app!(storage);

    for (user, allocation_id) in [(ALICE, 1000), (BOB, 1002)] {
        let req = submit(
            user,
            json!({"allocation_id": allocation_id, "request_type": "query"}),
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = as_user(TestRequest::get().uri("/api/requests"), ADMIN).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

    let req = as_user(TestRequest::get().uri("/api/requests?mine=1"), BOB).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["requester_id"], json!(BOB));

    let req = as_user(TestRequest::get().uri("/api/requests/424242"), BOB).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
