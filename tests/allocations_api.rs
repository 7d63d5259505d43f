#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use sea_orm::ConnectionTrait;
use serde_json::{Value, json};

use common::*;

fn as_user(req: TestRequest, user: i64) -> TestRequest {
    req.insert_header(("X-User-Id", user.to_string()))
}

fn patch(id: i64, body: Value) -> TestRequest {
    as_user(
        TestRequest::patch().uri(&format!("/api/admin/allocations/{id}")),
        ADMIN,
    )
    .set_json(body)
}

#[actix_web::test]
async fn propagation_only_touches_the_owning_activity() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let req = patch(
        1000,
        json!({
            "user_id": BOB,
            "location": "Room B",
            "propagate_fields": ["tutor", "location"],
            "propagate_occurrence_ids": [101, 102]
        }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["ok"], json!(true));
    assert_eq!(body["data"]["dropped_occurrence_ids"], json!([102]));
    assert_eq!(body["data"]["row"]["user_id"], json!(BOB));
    assert_eq!(body["data"]["row"]["location"], json!("Room B"));

    assert_eq!(occurrence(&storage, 101).await.location.as_deref(), Some("Room B"));
    assert_eq!(allocation(&storage, 1001).await.user_id, Some(BOB));

    // 活动 20 的课次和分配保持原样
    assert_eq!(occurrence(&storage, 102).await.location.as_deref(), Some("Room A"));
    assert_eq!(allocation(&storage, 1002).await.user_id, Some(ALICE));
}

#[actix_web::test]
async fn partial_time_triple_is_rejected_without_changes() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let req = patch(
        1000,
        json!({"session_date": "2025-03-12", "location": "Room Z"}),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let occ = occurrence(&storage, 100).await;
    assert_eq!(occ.session_date, Some(date("2025-03-10")));
    assert_eq!(occ.location.as_deref(), Some("Room A"));
}

#[actix_web::test]
async fn schedule_change_moves_targets_to_weekday() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let req = patch(
        1000,
        json!({
            "session_date": "2025-03-12",
            "start_at": "11:00",
            "end_at": "12:30",
            "propagate_fields": ["start", "end"],
            "propagate_dow": "Wed",
            "propagate_occurrence_ids": [101]
        }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["row"]["hours"], json!(1.5));

    let current = occurrence(&storage, 100).await;
    assert_eq!(current.session_date, Some(date("2025-03-12")));
    assert_eq!(current.start_at, Some(time("11:00")));

    let target = occurrence(&storage, 101).await;
    assert_eq!(target.session_date, Some(date("2025-03-19")));
    assert_eq!(target.start_at, Some(time("11:00")));
    assert_eq!(target.end_at, Some(time("12:30")));
}

#[actix_web::test]
async fn appended_notes_keep_existing_text() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let req = patch(
        1000,
        json!({
            "note": "Bring laptop",
            "propagate_fields": ["note"],
            "propagate_notes_mode": "append",
            "propagate_occurrence_ids": [101]
        }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(occurrence(&storage, 100).await.note.as_deref(), Some("Bring laptop"));
    assert_eq!(
        occurrence(&storage, 101).await.note.as_deref(),
        Some("Week note\n\nBring laptop")
    );
}

#[actix_web::test]
async fn hours_are_rejected_on_scheduled_allocations() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let resp = test::call_service(&app, patch(1000, json!({"hours": 3.0})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(allocation(&storage, 1000).await.hours, None);
}

#[actix_web::test]
async fn unknown_references_are_validation_errors() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let resp = test::call_service(&app, patch(1000, json!({"user_id": 999})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp =
        test::call_service(&app, patch(1000, json!({"paycode_id": "NOPE"})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, patch(4242, json!({"location": "X"})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unscheduled_allocations_track_manual_hours() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let req = as_user(TestRequest::post().uri("/api/admin/allocations/unscheduled"), ADMIN)
        .set_json(json!({"offering_id": 1, "user_id": BOB, "hours": 4.5, "note": "Marking A1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let row = &body["data"];
    assert_eq!(row["mode"], json!("unscheduled"));
    assert_eq!(row["hours"], json!(4.5));
    assert_eq!(row["paycode_id"], json!("MARK"));
    assert_eq!(row["note"], json!("Marking A1"));
    assert_eq!(row["occurrence_id"], Value::Null);
    let id = row["id"].as_i64().unwrap();

    let resp = test::call_service(&app, patch(id, json!({"location": "Room C"})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, patch(id, json!({"hours": 6.0})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["row"]["hours"], json!(6.0));
}

#[actix_web::test]
async fn admin_routes_require_identity_and_role() {
    let storage = seeded_storage().await;
    let app = init_app!(storage);

    let req = TestRequest::get().uri("/api/admin/allocations").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = as_user(TestRequest::get().uri("/api/admin/allocations"), 999).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = as_user(TestRequest::get().uri("/api/admin/allocations"), ALICE).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = as_user(TestRequest::get().uri("/api/admin/allocations"), COORDINATOR).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn list_searches_sorts_and_pages() {
    let storage = seeded_storage().await;
    let app = init_app!(storage);

    let req = as_user(
        TestRequest::get().uri("/api/admin/allocations?sort=session_date&dir=desc&limit=2"),
        ADMIN,
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], json!(1002));
    assert_eq!(body["data"]["pagination"]["total"], json!(3));
    assert_eq!(body["data"]["pagination"]["total_pages"], json!(2));

    // 日期也能按 日/月/年 搜索
    let req = as_user(TestRequest::get().uri("/api/admin/allocations?q=24/03/2025"), ADMIN)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], json!(1002));

    let req = as_user(
        TestRequest::get().uri(&format!("/api/admin/allocations?activity_id={TUTORIAL_B}")),
        ADMIN,
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pagination"]["total"], json!(1));
}

#[actix_web::test]
async fn export_writes_csv_and_empty_export_has_no_content() {
    let storage = seeded_storage().await;
    let app = init_app!(storage);

    let req = as_user(
        TestRequest::get().uri(
            "/api/admin/allocations/export?format=csv&sort=session_date&columns=first_name,session_date,location",
        ),
        ADMIN,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/csv; charset=utf-8"
    );
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "first_name,session_date,location");
    assert_eq!(lines[1], "Alice,2025-03-10,Room A");
    assert_eq!(lines.len(), 4);

    let req = as_user(TestRequest::get().uri("/api/admin/allocations/export?user_id=999"), ADMIN)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = as_user(TestRequest::get().uri("/api/admin/allocations/export?format=xlsx"), ADMIN)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn occurrences_are_listed_in_schedule_order() {
    let storage = seeded_storage().await;
    let app = init_app!(storage);

    let req = as_user(
        TestRequest::get().uri(&format!("/api/admin/activities/{TUTORIAL_A}/occurrences")),
        ADMIN,
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<i64> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["occurrence_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![100, 101]);

    let req = as_user(TestRequest::get().uri("/api/admin/activities/77/occurrences"), ADMIN)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = as_user(TestRequest::get().uri("/api/admin/activities/abc/occurrences"), ADMIN)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn paycodes_and_unit_tutors() {
    let storage = seeded_storage().await;
    let app = init_app!(storage);

    let req = as_user(TestRequest::get().uri("/api/admin/paycodes"), ADMIN).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let codes: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["MARK", "TU1", "TU2"]);

    let req = as_user(TestRequest::get().uri("/api/units/COMP1000/tutors"), ALICE).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let tutors = body["data"]["items"].as_array().unwrap();
    assert_eq!(tutors.len(), 1);
    assert_eq!(tutors[0]["id"], json!(ALICE));
}

#[actix_web::test]
async fn omitted_fields_keep_stored_values_and_repeat_is_stable() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let body = json!({"location": "Room B"});
    let first: Value = test::call_and_read_body_json(&app, patch(1000, body.clone()).to_request()).await;
    let row = &first["data"]["row"];
    assert_eq!(row["location"], json!("Room B"));
    assert_eq!(row["user_id"], json!(ALICE));
    assert_eq!(row["paycode_id"], json!("TU1"));
    assert_eq!(row["status"], json!("Pending"));
    assert_eq!(row["note"], json!("Week note"));
    assert_eq!(row["session_date"], json!("2025-03-10"));

    let occ = occurrence(&storage, 100).await;
    assert_eq!(occ.start_at, Some(time("09:00")));
    assert_eq!(occ.end_at, Some(time("10:00")));

    let second: Value = test::call_and_read_body_json(&app, patch(1000, body).to_request()).await;
    assert_eq!(second["data"]["row"], first["data"]["row"]);
    assert_eq!(occurrence(&storage, 100).await, occ);
}

#[actix_web::test]
async fn unscheduled_allocations_reject_a_full_schedule() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let req = as_user(TestRequest::post().uri("/api/admin/allocations/unscheduled"), ADMIN)
        .set_json(json!({"offering_id": 1, "user_id": BOB, "hours": 2.0}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let req = patch(
        id,
        json!({"session_date": "2025-03-12", "start_at": "09:00", "end_at": "11:00"}),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let stored = allocation(&storage, id).await;
    assert_eq!(stored.occurrence_id, None);
    assert_eq!(stored.hours, Some(2.0));
}

#[actix_web::test]
async fn status_and_paycode_follow_to_target_weeks() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let req = patch(
        1000,
        json!({
            "status": "Approved Allocation",
            "paycode_id": "TU2",
            "propagate_fields": ["status", "paycode"],
            "propagate_occurrence_ids": [101]
        }),
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["row"]["status"], json!("Approved Allocation"));
    assert_eq!(body["data"]["row"]["paycode_id"], json!("TU2"));

    let target = allocation(&storage, 1001).await;
    assert_eq!(target.status, "Approved Allocation");
    assert_eq!(target.paycode_id.as_deref(), Some("TU2"));
    // 没有传播到的分配字段不变
    assert_eq!(target.user_id, Some(ALICE));

    let untouched = allocation(&storage, 1002).await;
    assert_eq!(untouched.status, "Pending");
    assert_eq!(untouched.paycode_id.as_deref(), Some("TU1"));
}

#[actix_web::test]
async fn overwritten_notes_replace_existing_text() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    let req = patch(
        1000,
        json!({
            "note": "Room change",
            "propagate_fields": ["note"],
            "propagate_notes_mode": "overwrite",
            "propagate_occurrence_ids": [101]
        }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(occurrence(&storage, 100).await.note.as_deref(), Some("Room change"));
    assert_eq!(occurrence(&storage, 101).await.note.as_deref(), Some("Room change"));
}

#[actix_web::test]
async fn failed_propagation_rolls_back_the_direct_edit() {
    let storage = seeded_storage().await;
    let app = init_app!(storage.clone());

    // 让课次 101 的更新在数据库层失败
    storage
        .connection()
        .execute_unprepared(
            "CREATE TRIGGER lock_occurrence_101 BEFORE UPDATE ON session_occurrences \
             WHEN OLD.id = 101 BEGIN SELECT RAISE(ABORT, 'occurrence locked'); END;",
        )
        .await
        .unwrap();

    let req = patch(
        1000,
        json!({
            "user_id": BOB,
            "location": "Room B",
            "propagate_fields": ["tutor", "location"],
            "propagate_occurrence_ids": [101]
        }),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(allocation(&storage, 1000).await.user_id, Some(ALICE));
    assert_eq!(occurrence(&storage, 100).await.location.as_deref(), Some("Room A"));
    assert_eq!(allocation(&storage, 1001).await.user_id, Some(ALICE));
    assert_eq!(occurrence(&storage, 101).await.location.as_deref(), Some("Room A"));
}

#[actix_web::test]
async fn out_of_range_page_returns_empty_items() {
    let storage = seeded_storage().await;
    let app = init_app!(storage);

    let req = as_user(
        TestRequest::get().uri("/api/admin/allocations?page=9223372036854775807&limit=50"),
        ADMIN,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["items"], json!([]));
    assert_eq!(body["data"]["pagination"]["total"], json!(3));
}
