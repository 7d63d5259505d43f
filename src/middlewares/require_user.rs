/*!
 * 用户身份中间件
 *
 * 从 `X-User-Id` 请求头解析当前用户，确认用户存在后放入请求扩展。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireUser;
 *
 * App::new().service(
 *     web::scope("/api")
 *         .wrap(RequireUser)
 *         .route("/me", web::get().to(handler)),
 * );
 *
 * async fn handler(req: HttpRequest) -> Result<HttpResponse> {
 *     let user_id = RequireUser::extract_user_id(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `X-User-Id: <用户ID>`
 * 2. 中间件解析 ID 并从存储层读取用户
 * 3. 用户存在则写入请求扩展并继续处理
 * 4. 请求头缺失、格式错误或用户不存在时返回 401
 */

use crate::models::users::entities::{self, UserRole};
use crate::models::ErrorCode;
use crate::storage::Storage;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Clone)]
pub struct RequireUser;

enum IdentityError {
    Unauthorized(String),
    Internal(String),
}

// 辅助函数：解析请求头并读取用户
async fn resolve_user(req: &ServiceRequest) -> Result<entities::User, IdentityError> {
    let raw = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| IdentityError::Unauthorized(format!("Missing {USER_ID_HEADER} header")))?;

    let user_id = raw
        .parse::<i64>()
        .map_err(|_| IdentityError::Unauthorized(format!("Invalid {USER_ID_HEADER} header")))?;

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| IdentityError::Internal("Storage not found in app data".to_string()))?;

    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(IdentityError::Unauthorized("User not found".to_string())),
        Err(e) => Err(IdentityError::Internal(format!(
            "Failed to retrieve user from storage: {e}"
        ))),
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireUser
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireUserMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireUserMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireUserMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireUserMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match resolve_user(&req).await {
                Ok(user) => {
                    debug!("Identity resolved for user ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(IdentityError::Unauthorized(err)) => {
                    info!("Identity check failed for request to {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
                Err(IdentityError::Internal(err)) => {
                    error!("Identity lookup failed for request to {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            &err,
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireUser {
    /// 从请求扩展中提取当前用户
    /// 此函数应该在应用了RequireUser中间件的路由处理程序中使用
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }

    /// 从请求扩展中提取用户ID
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<entities::User>().map(|user| user.id)
    }

    /// 从请求扩展中提取用户角色
    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions()
            .get::<entities::User>()
            .map(|user| user.role.clone())
    }
}
