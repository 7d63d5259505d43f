use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use rust_teaching_alloc::config::{AppConfig, CorsConfig};
use rust_teaching_alloc::routes;
use rust_teaching_alloc::runtime::lifetime;
use rust_teaching_alloc::utils::{json_error_handler, path_error_handler, query_error_handler};

/// 开发环境输出带源码位置的文本日志，其余环境输出 JSON
fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.app.log_level))
        .with_writer(writer)
        .with_level(true);

    if config.is_development() {
        builder
            .with_ansi(true)
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        builder.json().init();
    }
    guard
}

/// 按配置放行来源，导出接口需要暴露 Content-Disposition
fn build_cors(cors: &CorsConfig) -> Cors {
    let mut builder = Cors::default()
        .allowed_methods(cors.allowed_methods.iter().map(String::as_str))
        .allowed_headers(cors.allowed_headers.iter().map(String::as_str))
        .expose_headers(["Content-Disposition"])
        .max_age(cors.max_age);

    if cors.allowed_origins.iter().any(|o| o == "*") {
        builder = builder.allow_any_origin();
    } else {
        for origin in &cors.allowed_origins {
            builder = builder.allowed_origin(origin);
        }
    }
    builder
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    setup_panic!();
    let started = Instant::now();

    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();
    let _log_guard = init_tracing(config);

    info!(
        "{} {} ({}) starting, environment: {}",
        config.app.system_name,
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_NAME"),
        config.app.environment
    );

    let startup = lifetime::startup::prepare_server_startup().await;
    let storage = startup.storage.clone();

    info!(
        "Storage ready in {} ms, page size {}..{}, export cap {} rows",
        started.elapsed().as_millis(),
        config.allocation.default_page_size,
        config.allocation.max_page_size,
        config.allocation.max_export_rows
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.cors))
            .wrap(Compress::default())
            // 分配数据随时可能被传播修改，响应一律不缓存
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store")))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(storage.clone()))
            .configure(routes::configure_api_routes)
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(config.server.timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            warn!("Listening on Unix socket {} with {} workers", socket_path, config.server.workers);
            server.bind_uds(socket_path)?
        }
        None => {
            let bind_address = config.server_bind_address();
            warn!("Listening on http://{} with {} workers", bind_address, config.server.workers);
            server.bind(bind_address)?
        }
    };

    #[cfg(not(unix))]
    let server = {
        let bind_address = config.server_bind_address();
        warn!("Listening on http://{} with {} workers", bind_address, config.server.workers);
        server.bind(bind_address)?
    };

    tokio::select! {
        res = server.run() => res?,
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Shutdown signal received, stopping allocation service");
        }
    }

    Ok(())
}
