use super::SeaOrmStorage;
use crate::entity::requests::{ActiveModel, Column, Entity as Requests};
use crate::errors::{Result, TeachAllocError};
use crate::models::requests::{
    entities::{RequestDecision, RequestRecord, RequestStatus},
    requests::NewRequest,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

fn open_status_labels() -> Vec<&'static str> {
    RequestStatus::open_statuses()
        .iter()
        .map(|s| s.as_str())
        .collect()
}

impl SeaOrmStorage {
    /// 创建申请
    pub async fn create_request_impl(&self, req: NewRequest) -> Result<RequestRecord> {
        let now = chrono::Utc::now().timestamp();

        let details = serde_json::to_string(&req.details)?;

        let model = ActiveModel {
            requester_id: Set(req.requester_id),
            allocation_id: Set(req.allocation_id),
            request_type: Set(req.request_type),
            request_status: Set(req.request_status.to_string()),
            request_reason: Set(req.request_reason),
            details: Set(Some(details)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("创建申请失败: {e}")))?;

        Ok(result.into_request())
    }

    /// 通过 ID 获取申请
    pub async fn get_request_by_id_impl(&self, id: i64) -> Result<Option<RequestRecord>> {
        let result = Requests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("查询申请失败: {e}")))?;

        Ok(result.map(|m| m.into_request()))
    }

    /// 查找重复的未结申请
    pub async fn find_open_request_impl(
        &self,
        requester_id: i64,
        allocation_id: i64,
        request_type: &str,
    ) -> Result<Option<RequestRecord>> {
        let result = Requests::find()
            .filter(Column::RequesterId.eq(requester_id))
            .filter(Column::AllocationId.eq(allocation_id))
            .filter(Column::RequestType.eq(request_type))
            .filter(Column::RequestStatus.is_in(open_status_labels()))
            .one(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("查询申请失败: {e}")))?;

        Ok(result.map(|m| m.into_request()))
    }

    /// 列出未结申请，最新在前
    pub async fn list_open_requests_impl(
        &self,
        allocation_id: Option<i64>,
        requester_id: Option<i64>,
    ) -> Result<Vec<RequestRecord>> {
        let mut select = Requests::find().filter(Column::RequestStatus.is_in(open_status_labels()));

        if let Some(allocation_id) = allocation_id {
            select = select.filter(Column::AllocationId.eq(allocation_id));
        }

        if let Some(requester_id) = requester_id {
            select = select.filter(Column::RequesterId.eq(requester_id));
        }

        let result = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("查询申请列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_request()).collect())
    }

    /// 记录审核结果
    ///
    /// 仅在申请仍处于非终态时写入，已有结论时返回冲突。
    pub async fn decide_request_impl(
        &self,
        id: i64,
        decision: RequestDecision,
    ) -> Result<Option<RequestRecord>> {
        let Some(existing) = Requests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("查询申请失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let mut model: ActiveModel = existing.into();
        model.request_status = Set(decision.status.to_string());
        model.reviewer_id = Set(Some(decision.reviewer_id));
        model.reviewer_note = Set(decision.reviewer_note);
        model.rejection_reason = Set(decision.rejection_reason);
        model.updated_at = Set(now);

        let result = Requests::update_many()
            .set(model)
            .filter(Column::Id.eq(id))
            .filter(
                Column::RequestStatus.is_not_in([
                    RequestStatus::Approved.as_str(),
                    RequestStatus::Rejected.as_str(),
                ]),
            )
            .exec(&self.db)
            .await
            .map_err(|e| TeachAllocError::database_operation(format!("更新申请失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(TeachAllocError::conflict(format!(
                "Request {id} has already been decided"
            )));
        }

        self.get_request_by_id_impl(id).await
    }
}
