pub mod activities;

pub mod allocations;

pub mod paycodes;

pub mod requests;

pub mod users;

pub use activities::configure_activity_routes;
pub use allocations::configure_allocation_routes;
pub use paycodes::configure_paycode_routes;
pub use requests::configure_request_routes;
pub use users::configure_user_routes;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.configure(configure_allocation_routes)
        .configure(configure_activity_routes)
        .configure(configure_paycode_routes)
        .configure(configure_request_routes)
        .configure(configure_user_routes);
}
