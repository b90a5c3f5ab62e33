use std::{sync::Arc, time::Duration};

use notebook_server::{
    config::{self, Storage},
    repository::Repository,
    router,
    service::NoteService,
};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to locate or load config: {e}");
    });

    // Repository creation and migration
    let repo = match &cfg.storage {
        Storage::Postgres { dsn } => Repository::connect(dsn).await.unwrap_or_else(|e| {
            tracing::error!("Failed to establish database connection: {e}");
            panic!("failed to establish database connection: {e}");
        }),
        Storage::Memory => Repository::in_memory(),
    };
    let repo_ptr = Arc::new(tokio::sync::Mutex::new(repo));

    repo_ptr.lock().await.migrate().await.unwrap_or_else(|e| {
        tracing::error!("Failed to migrate database: {e}");
        panic!("failed to migrate database: {e}");
    });

    // Service creation
    let service = Arc::new(
        NoteService::new(repo_ptr.clone())
            .with_revision_wait(Duration::from_secs(cfg.revision_wait_secs)),
    );

    let app = router::build(service);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to port {}: {e}", cfg.port);
            panic!("failed to bind to port {}: {e}", cfg.port);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Notebook server starting, listening on {}", addr),
        Err(e) => tracing::warn!("Listening, but local address is unknown: {e}"),
    }

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }
}
