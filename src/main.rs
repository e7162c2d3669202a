use std::sync::Arc;

use notepad_server::{
    config, handlers,
    repository::{MemoryNoteStore, NoteStore, PgNoteStore},
    seed,
    service::NoteService,
};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });

    // Store creation and migration
    let store: Arc<dyn NoteStore> = if let Some(dsn) = &cfg.database_dsn {
        let mut repo = PgNoteStore::new(dsn).await.unwrap_or_else(|e| {
            tracing::error!("Failed to establish database connection: {e}");
            panic!("failed to establish database connection: {e}");
        });

        repo.migrate().await.unwrap_or_else(|e| {
            tracing::error!("Failed to migrate database: {e}");
            panic!("failed to migrate database: {e}");
        });

        Arc::new(repo)
    } else {
        tracing::warn!("No database DSN configured, notepads are kept in memory only");
        Arc::new(MemoryNoteStore::new())
    };

    if cfg.seed_sample_data {
        seed::seed_sample_notes(store.as_ref())
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Failed to seed sample notepads: {e}");
                panic!("failed to seed sample notepads: {e}");
            });
    }

    // Service and router
    let service = Arc::new(NoteService::new(store));
    let router = handlers::router(service);

    let listener = tokio::net::TcpListener::bind(cfg.bind_address())
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {}: {e}", cfg.bind_address()));

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Notepad server starting, listening on {}", addr),
        Err(e) => tracing::warn!("Notepad server starting, local address unknown: {e}"),
    }

    axum::serve(listener, router)
        .await
        .expect("failed to start server");
}
