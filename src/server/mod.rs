use crate::config::Config;
use crate::store::GalleryStore;
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod auth;
pub mod error;
pub mod routes_gallery;

pub use auth::{ApiKeyResolver, Principal, PrincipalResolver};
pub use error::AppError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub store: GalleryStore,
    pub config: Arc<Config>,
    /// Decides who a request acts as; writes need a principal
    pub resolver: Arc<dyn PrincipalResolver>,
}

impl AppContext {
    /// Context using the API-key resolver described by `config.auth`.
    pub fn new(store: GalleryStore, config: Config) -> Self {
        let resolver = Arc::new(ApiKeyResolver::from_config(&config.auth));
        Self::with_resolver(store, config, resolver)
    }

    pub fn with_resolver(
        store: GalleryStore,
        config: Config,
        resolver: Arc<dyn PrincipalResolver>,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            resolver,
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api = routes_gallery::gallery_routes()
        .layer(middleware::from_fn_with_state(
            ctx.clone(),
            auth::principal_middleware,
        ))
        .layer(DefaultBodyLimit::max(ctx.config.server.max_upload_bytes));

    let mut app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/gallery", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Admin UI assets, with index.html as the SPA fallback
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        } else {
            tracing::warn!("Static directory {:?} does not exist; not serving assets", dir);
        }
    }

    app
}

async fn health_check() -> &'static str {
    "ok"
}

/// Start the HTTP server and run until Ctrl+C / SIGTERM.
pub async fn start_server(config: Config, store: GalleryStore) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::new(store, config);
    let app = create_router(ctx, static_dir);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
