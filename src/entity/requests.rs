//! 申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub requester_id: i64,
    pub allocation_id: i64,
    pub request_type: String,
    pub request_status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub request_reason: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,
    pub reviewer_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub reviewer_note: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RequesterId",
        to = "super::users::Column::Id"
    )]
    Requester,
    #[sea_orm(
        belongs_to = "super::allocations::Entity",
        from = "Column::AllocationId",
        to = "super::allocations::Column::Id"
    )]
    Allocation,
}

impl Related<super::allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_request(self) -> crate::models::requests::entities::RequestRecord {
        use crate::models::requests::entities::{RequestRecord, RequestStatus};
        use chrono::{DateTime, Utc};

        let details = self
            .details
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or(serde_json::Value::Null);

        RequestRecord {
            id: self.id,
            requester_id: self.requester_id,
            allocation_id: self.allocation_id,
            request_type: self.request_type,
            request_status: self
                .request_status
                .parse::<RequestStatus>()
                .unwrap_or(RequestStatus::Pending),
            request_reason: self.request_reason,
            details,
            reviewer_id: self.reviewer_id,
            reviewer_note: self.reviewer_note,
            rejection_reason: self.rejection_reason,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
