//! HTTP layer serving the cleaning dashboard.

pub mod routes;
pub mod session;
pub mod types;
pub mod views;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{config::Settings, nlp::ConceptExtractor};

use self::session::Session;

/// Mutable dashboard state; one lock serialises every user event.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub session: Session,
    /// Failure reported once on the next page render.
    pub flash: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub extractor: Arc<ConceptExtractor>,
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(settings: Settings, extractor: Arc<ConceptExtractor>) -> Self {
        Self {
            settings,
            extractor,
            dashboard: Arc::new(Mutex::new(Dashboard::default())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.settings.max_upload_bytes;
    Router::new()
        .route("/", get(routes::dashboard))
        .route("/upload", post(routes::upload))
        .route("/clean", post(routes::clean))
        .route("/download", get(routes::download))
        .route("/api/extract", post(routes::extract))
        .route("/api/state", get(routes::session_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

pub async fn serve(settings: Settings, host: String, port: u16) -> Result<()> {
    let extractor = Arc::new(ConceptExtractor::load(&settings)?);
    let router = router(AppState::new(settings, extractor));

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving healthcare-cleaner dashboard");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
