use tracing::info;
use tracing_subscriber::EnvFilter;

use subway_server::config::ServerConfig;
use subway_server::store::{SnapshotFile, Store};
use subway_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,subway_server=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    let store = match &config.data_file {
        Some(path) => Store::open(SnapshotFile::new(path)).expect("Failed to load snapshot"),
        None => {
            info!("SUBWAY_DATA_FILE not set, keeping network in memory only");
            Store::in_memory()
        }
    };

    let app = create_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .expect("Failed to bind listen address");
    info!(addr = %config.addr, "Subway server listening");
    info!("  GET/POST        /stations");
    info!("  GET/DELETE      /stations/{{id}}");
    info!("  GET/POST        /lines");
    info!("  GET/PUT/DELETE  /lines/{{id}}");
    info!("  POST/DELETE     /lines/{{id}}/sections");
    info!("  GET             /lines/{{id}}/stations");

    axum::serve(listener, app).await.expect("Server error");
}
