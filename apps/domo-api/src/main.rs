use axum::middleware;
use domo_api::middleware::request_context;
use domo_api::{routes, AppState};
use domo_config::AppConfig;
use domo_telemetry::init_tracing;
use std::path::{Path, PathBuf};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let runtime = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let state = AppState::initialize(
        Path::new(&runtime.data_dir),
        PathBuf::from(&runtime.static_dir),
    )
    .await?;

    let config = state.config_store.current().await;
    let gateway_addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    info!(
        gateway = %gateway_addr,
        boards = config.boards.len(),
        lights = config.lights.len(),
        shutters = config.shutters.len(),
        thermostats = config.thermostats.len(),
        "configuration loaded"
    );
    drop(config);

    let app = routes::create_api_router()
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context));

    let listener =
        tokio::net::TcpListener::bind((runtime.http_host.as_str(), runtime.http_port)).await?;
    info!(
        addr = %listener.local_addr()?,
        data_dir = %runtime.data_dir,
        "domo bridge listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
