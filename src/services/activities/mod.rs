pub mod occurrences;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::activities::requests::OccurrenceQuery;
use crate::storage::Storage;

pub struct ActivityService {
    storage: Option<Arc<dyn Storage>>,
}

impl ActivityService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    // 教学活动的课次列表
    pub async fn list_occurrences(
        &self,
        activity_id: i64,
        query: OccurrenceQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        occurrences::list_occurrences(self, activity_id, query, request).await
    }
}
