pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct PaycodeService {
    storage: Option<Arc<dyn Storage>>,
}

impl PaycodeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    // 薪酬代码列表
    pub async fn list_paycodes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_paycodes(self, request).await
    }
}
