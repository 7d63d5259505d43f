use chrono::NaiveDate;

use crate::models::{
    activities::entities::Occurrence,
    allocations::{
        entities::AllocationRow,
        requests::{AllocationEdit, AllocationFilter, CreateUnscheduledRequest},
    },
    paycodes::entities::Paycode,
    requests::{
        entities::{RequestDecision, RequestRecord},
        requests::NewRequest,
    },
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 分配编辑结果
#[derive(Debug, Clone)]
pub struct AllocationUpdate {
    pub row: AllocationRow,
    /// 不属于该教学活动而被过滤掉的目标课次
    pub dropped_occurrence_ids: Vec<i64>,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 在某单元持有分配的导师
    async fn list_tutors_by_unit(&self, unit_code: &str) -> Result<Vec<User>>;

    /// 薪酬代码
    // 按代码排序列出
    async fn list_paycodes(&self) -> Result<Vec<Paycode>>;

    /// 教学活动与课次
    // 教学活动是否存在
    async fn activity_exists(&self, activity_id: i64) -> Result<bool>;
    // 按日期、开始时间、ID 列出课次，`from` 为最早日期
    async fn list_occurrences(
        &self,
        activity_id: i64,
        from: Option<NaiveDate>,
    ) -> Result<Vec<Occurrence>>;

    /// 分配管理方法
    // 按筛选条件列出分配行
    async fn list_allocation_rows(
        &self,
        filter: &AllocationFilter,
        limit: Option<u64>,
    ) -> Result<Vec<AllocationRow>>;
    // 获取单个分配行
    async fn get_allocation_row(&self, id: i64) -> Result<Option<AllocationRow>>;
    // 编辑分配并跨周传播（单个事务），分配不存在时返回 None
    async fn update_allocation(
        &self,
        id: i64,
        edit: AllocationEdit,
    ) -> Result<Option<AllocationUpdate>>;
    // 创建未排课分配
    async fn create_unscheduled_allocation(
        &self,
        req: CreateUnscheduledRequest,
    ) -> Result<AllocationRow>;
    // 换班候选：同单元同类型、其他导师的分配
    async fn list_swap_candidates(&self, allocation: &AllocationRow) -> Result<Vec<AllocationRow>>;

    /// 申请管理方法
    // 创建申请
    async fn create_request(&self, req: NewRequest) -> Result<RequestRecord>;
    // 通过ID获取申请
    async fn get_request_by_id(&self, id: i64) -> Result<Option<RequestRecord>>;
    // 同一申请人对同一分配、同一类型的未结申请
    async fn find_open_request(
        &self,
        requester_id: i64,
        allocation_id: i64,
        request_type: &str,
    ) -> Result<Option<RequestRecord>>;
    // 列出未结申请（最新在前）
    async fn list_open_requests(
        &self,
        allocation_id: Option<i64>,
        requester_id: Option<i64>,
    ) -> Result<Vec<RequestRecord>>;
    // 记录审核结果，申请不存在时返回 None
    async fn decide_request(
        &self,
        id: i64,
        decision: RequestDecision,
    ) -> Result<Option<RequestRecord>>;
}

/// 根据配置创建存储层并完成迁移
pub async fn create_storage() -> Result<std::sync::Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(std::sync::Arc::new(storage))
}
