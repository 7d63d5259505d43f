pub mod create;
pub mod export;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::allocations::requests::{
    AllocationExportParams, AllocationListParams, AllocationPatch, CreateUnscheduledRequest,
};
use crate::storage::Storage;

pub struct AllocationService {
    storage: Option<Arc<dyn Storage>>,
}

impl AllocationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    // 分配列表
    pub async fn list_allocations(
        &self,
        params: AllocationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_allocations(self, params, request).await
    }

    // 导出分配
    pub async fn export_allocations(
        &self,
        params: AllocationExportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_allocations(self, params, request).await
    }

    // 获取单个分配
    pub async fn get_allocation(
        &self,
        allocation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_allocation(self, allocation_id, request).await
    }

    // 编辑分配（含跨周传播）
    pub async fn update_allocation(
        &self,
        allocation_id: i64,
        patch: AllocationPatch,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_allocation(self, allocation_id, patch, request).await
    }

    // 创建未排课分配
    pub async fn create_unscheduled(
        &self,
        body: CreateUnscheduledRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_unscheduled(self, body, request).await
    }
}
