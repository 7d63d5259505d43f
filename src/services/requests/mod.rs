pub mod create;
pub mod decide;
pub mod get;
pub mod list;
pub mod review;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::requests::requests::{CreateRequestBody, DecisionBody, OpenRequestQuery};
use crate::storage::Storage;

pub struct RequestService {
    storage: Option<Arc<dyn Storage>>,
}

impl RequestService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    // 提交申请
    pub async fn create_request(
        &self,
        body: CreateRequestBody,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_request(self, body, request).await
    }

    // 获取申请
    pub async fn get_request(
        &self,
        request_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_request(self, request_id, request).await
    }

    // 未结申请列表
    pub async fn list_open_requests(
        &self,
        query: OpenRequestQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_open_requests(self, query, request).await
    }

    // 审核视图
    pub async fn review_request(
        &self,
        request_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        review::review_request(self, request_id, request).await
    }

    // 审核决定
    pub async fn decide_request(
        &self,
        request_id: i64,
        body: DecisionBody,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        decide::decide_request(self, request_id, body, request).await
    }
}
