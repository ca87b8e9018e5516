//! HTTP server for hintd

use crate::generator::GeminiClient;
use crate::resolver::HintResolver;
use crate::routes;
use crate::store::{DisabledStore, HintStore, SqliteHintStore};
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, request::Parts, HeaderName, HeaderValue, Method};
use axum::Router;
use hint_common::{FallbackMatcher, HintdConfig, ServerConfig};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const EXTENSION_ORIGIN_PREFIXES: &[&str] = &["chrome-extension://", "moz-extension://"];

/// Application state shared across handlers
pub struct AppState {
    pub resolver: HintResolver,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(resolver: HintResolver) -> Self {
        Self {
            resolver,
            start_time: Instant::now(),
        }
    }
}

/// Open the configured store, degrading to [`DisabledStore`] when it is
/// turned off or cannot be opened.
pub fn open_store(config: &HintdConfig) -> Arc<dyn HintStore> {
    if !config.store.enabled {
        info!("Store disabled by configuration - using fallback hints only");
        return Arc::new(DisabledStore);
    }

    match SqliteHintStore::open(&config.store.db_path) {
        Ok(store) => {
            info!("Hint store ready at {}", config.store.db_path.display());
            Arc::new(store)
        }
        Err(e) => {
            warn!("Store unavailable ({}), running without database - using fallback hints only", e);
            Arc::new(DisabledStore)
        }
    }
}

/// Wire store, generator and matcher from configuration.
pub fn build_resolver(config: &HintdConfig) -> Result<HintResolver> {
    if config.generation.api_key.is_none() {
        warn!("GEMINI_API_KEY not set - every request will use fallback hints");
    }

    let generator = GeminiClient::new(config.generation.clone())
        .context("Failed to create generation client")?;

    Ok(HintResolver::new(
        open_store(config),
        Arc::new(generator),
        FallbackMatcher::default(),
    ))
}

/// Full router with CORS, request tracing and body limit.
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::hint_routes())
        .fallback(routes::not_found)
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(server.body_limit_bytes))
        .layer(cors_layer(&server.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Exact configured origins plus any browser-extension origin.
pub fn origin_allowed(origin: &str, allowed: &[String]) -> bool {
    EXTENSION_ORIGIN_PREFIXES
        .iter()
        .any(|prefix| origin.starts_with(prefix))
        || allowed.iter().any(|a| a == origin)
}

fn cors_layer(allowed: &[String]) -> CorsLayer {
    let allowed = allowed.to_vec();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|o| origin_allowed(o, &allowed))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
}

/// Run the HTTP server until Ctrl-C or SIGTERM
pub async fn run(config: HintdConfig) -> Result<()> {
    let resolver = build_resolver(&config)?;
    let app = router(AppState::new(resolver), &config.server);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
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
    info!("Received shutdown signal, closing server...");
}
