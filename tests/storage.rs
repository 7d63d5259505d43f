mod common;

use rust_teaching_alloc::models::allocations::requests::{AllocationEdit, AllocationFilter};
use rust_teaching_alloc::models::requests::entities::{RequestDecision, RequestStatus};
use rust_teaching_alloc::storage::Storage;

use common::*;

#[tokio::test]
async fn occurrences_respect_start_date() {
    let storage = seeded_storage().await;

    let all = storage.list_occurrences(TUTORIAL_A, None).await.unwrap();
    assert_eq!(all.iter().map(|o| o.id).collect::<Vec<_>>(), vec![100, 101]);

    let later = storage
        .list_occurrences(TUTORIAL_A, Some(date("2025-03-11")))
        .await
        .unwrap();
    assert_eq!(later.iter().map(|o| o.id).collect::<Vec<_>>(), vec![101]);
}

#[tokio::test]
async fn unknown_status_filter_is_rejected() {
    let storage = seeded_storage().await;
    let filter = AllocationFilter {
        status: Some("Somewhere".to_string()),
        ..Default::default()
    };
    let err = storage.list_allocation_rows(&filter, None).await.unwrap_err();
    assert_eq!(err.code(), "E005");

    let filter = AllocationFilter {
        status: Some("pending".to_string()),
        unit_code: Some("COMP1000".to_string()),
        ..Default::default()
    };
    let rows = storage.list_allocation_rows(&filter, Some(2)).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn missing_allocation_is_not_an_error() {
    let storage = seeded_storage().await;
    let result = storage
        .update_allocation(31337, AllocationEdit::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn decided_requests_cannot_be_overwritten() {
    let storage = seeded_storage().await;
    let id = insert_raw_request(&storage, "query", "pending_uc", "{}").await;

    let approve = RequestDecision {
        status: RequestStatus::Rejected,
        reviewer_id: COORDINATOR,
        reviewer_note: None,
        rejection_reason: Some("Answered".to_string()),
    };
    let decided = storage.decide_request(id, approve.clone()).await.unwrap().unwrap();
    assert_eq!(decided.request_status, RequestStatus::Rejected);

    let err = storage.decide_request(id, approve).await.unwrap_err();
    assert_eq!(err.code(), "E007");
    assert_eq!(request_row(&storage, id).await.reviewer_id, Some(COORDINATOR));
}
