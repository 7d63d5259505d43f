#![allow(dead_code)]

use actix_web::web;
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use std::sync::Arc;

use rust_teaching_alloc::entity::prelude::*;
use rust_teaching_alloc::entity::{
    allocations, course_units, paycodes, requests, session_occurrences, teaching_activities,
    unit_offerings, users,
};
use rust_teaching_alloc::storage::Storage;
use rust_teaching_alloc::storage::sea_orm_storage::SeaOrmStorage;

pub const ADMIN: i64 = 1;
pub const ALICE: i64 = 2;
pub const BOB: i64 = 3;
pub const ASSISTANT: i64 = 4;
pub const COORDINATOR: i64 = 5;

pub const TUTORIAL_A: i64 = 10;
pub const TUTORIAL_B: i64 = 20;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

/// 内存库 + 基础数据
///
/// 单元 COMP1000 下有两个 Tutorial 活动：
/// - 活动 10：课次 100（2025-03-10 周一）、101（2025-03-17 周一），分配 1000、1001 属于 Alice
/// - 活动 20：课次 102（2025-03-24 周一），分配 1002 属于 Alice
pub async fn seeded_storage() -> SeaOrmStorage {
    let storage = SeaOrmStorage::new_in_memory().await.unwrap();
    let db = storage.connection();

    for (id, first, last, role) in [
        (ADMIN, "Admin", "Administrator", "admin"),
        (ALICE, "Alice", "Nguyen", "tutor"),
        (BOB, "Bob", "Smith", "tutor"),
        (ASSISTANT, "Tess", "Assistant", "assistant"),
        (COORDINATOR, "Uma", "Coordinator", "coordinator"),
    ] {
        users::ActiveModel {
            id: Set(id),
            first_name: Set(first.to_string()),
            last_name: Set(last.to_string()),
            email: Set(format!("{}@example.edu", first.to_lowercase())),
            role: Set(role.to_string()),
            created_at: Set(0),
            updated_at: Set(0),
        }
        .insert(db)
        .await
        .unwrap();
    }

    course_units::ActiveModel {
        unit_code: Set("COMP1000".to_string()),
        unit_name: Set("Introduction to Computing".to_string()),
    }
    .insert(db)
    .await
    .unwrap();

    unit_offerings::ActiveModel {
        id: Set(1),
        unit_code: Set("COMP1000".to_string()),
        year: Set(2025),
        session: Set("S1".to_string()),
    }
    .insert(db)
    .await
    .unwrap();

    for (code, amount) in [("TU1", 120.0), ("TU2", 80.0), ("MARK", 60.0)] {
        paycodes::ActiveModel {
            code: Set(code.to_string()),
            paycode_description: Set(Some(format!("{code} rate"))),
            amount: Set(amount),
        }
        .insert(db)
        .await
        .unwrap();
    }

    for (id, name) in [(TUTORIAL_A, "TUT-01"), (TUTORIAL_B, "TUT-02")] {
        teaching_activities::ActiveModel {
            id: Set(id),
            offering_id: Set(1),
            activity_type: Set("Tutorial".to_string()),
            activity_name: Set(name.to_string()),
            mode: Set("scheduled".to_string()),
        }
        .insert(db)
        .await
        .unwrap();
    }

    for (id, activity_id, day) in [
        (100, TUTORIAL_A, "2025-03-10"),
        (101, TUTORIAL_A, "2025-03-17"),
        (102, TUTORIAL_B, "2025-03-24"),
    ] {
        session_occurrences::ActiveModel {
            id: Set(id),
            activity_id: Set(activity_id),
            session_date: Set(Some(date(day))),
            start_at: Set(Some(time("09:00"))),
            end_at: Set(Some(time("10:00"))),
            location: Set(Some("Room A".to_string())),
            note: Set(Some("Week note".to_string())),
            is_cancelled: Set(false),
        }
        .insert(db)
        .await
        .unwrap();
    }

    for (id, occurrence_id, activity_id) in
        [(1000, 100, TUTORIAL_A), (1001, 101, TUTORIAL_A), (1002, 102, TUTORIAL_B)]
    {
        allocations::ActiveModel {
            id: Set(id),
            user_id: Set(Some(ALICE)),
            occurrence_id: Set(Some(occurrence_id)),
            activity_id: Set(activity_id),
            paycode_id: Set(Some("TU1".to_string())),
            status: Set("Pending".to_string()),
            teaching_role: Set(Some("Tutor".to_string())),
            hours: Set(None),
            note: Set(None),
            mode: Set("scheduled".to_string()),
            created_at: Set(0),
            updated_at: Set(0),
        }
        .insert(db)
        .await
        .unwrap();
    }

    storage
}

/// 直接写入一条申请（绕过校验，用于构造未知类型或损坏的详情）
pub async fn insert_raw_request(
    storage: &SeaOrmStorage,
    request_type: &str,
    status: &str,
    details: &str,
) -> i64 {
    let model = requests::ActiveModel {
        requester_id: Set(ALICE),
        allocation_id: Set(1000),
        request_type: Set(request_type.to_string()),
        request_status: Set(status.to_string()),
        request_reason: Set(Some("Please check".to_string())),
        details: Set(Some(details.to_string())),
        created_at: Set(0),
        updated_at: Set(0),
        ..Default::default()
    }
    .insert(storage.connection())
    .await
    .unwrap();
    model.id
}

pub async fn occurrence(storage: &SeaOrmStorage, id: i64) -> session_occurrences::Model {
    SessionOccurrences::find_by_id(id)
        .one(storage.connection())
        .await
        .unwrap()
        .unwrap()
}

pub async fn allocation(storage: &SeaOrmStorage, id: i64) -> allocations::Model {
    Allocations::find_by_id(id)
        .one(storage.connection())
        .await
        .unwrap()
        .unwrap()
}

pub async fn request_row(storage: &SeaOrmStorage, id: i64) -> requests::Model {
    Requests::find_by_id(id)
        .one(storage.connection())
        .await
        .unwrap()
        .unwrap()
}

pub fn shared(storage: SeaOrmStorage) -> web::Data<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = Arc::new(storage);
    web::Data::new(storage)
}

/// 与 main.rs 相同的应用配置
macro_rules! init_app {
    ($storage:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler(rust_teaching_alloc::utils::query_error_handler),
                )
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(rust_teaching_alloc::utils::json_error_handler),
                )
                .app_data(
                    actix_web::web::PathConfig::default()
                        .error_handler(rust_teaching_alloc::utils::path_error_handler),
                )
                .app_data($crate::common::shared($storage))
                .configure(rust_teaching_alloc::routes::configure_api_routes),
        )
        .await
    };
}
