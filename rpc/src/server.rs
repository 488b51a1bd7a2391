//! Axum-based read API server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use shadow_indexer::shutdown::signalled;
use shadow_indexer::{IndexerContext, IndexerMetrics, IndexerStatus};
use shadow_merkle::SnapshotReader;
use shadow_store::{IndexerStore, ProposalStore};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::RpcError;
use crate::handlers;

/// Everything the handlers read. Cheap to clone; the poller keeps writing
/// through its own handles while requests are served.
#[derive(Clone)]
pub struct RpcState {
    pub reader: SnapshotReader,
    pub proposals: Arc<dyn ProposalStore + Send + Sync>,
    pub status: Arc<IndexerStatus>,
    /// `None` keeps `/metrics` answering 404.
    pub metrics: Option<Arc<IndexerMetrics>>,
}

impl RpcState {
    /// Read handles onto a running indexer.
    pub fn from_context<S: IndexerStore + 'static>(
        ctx: &IndexerContext<S>,
        expose_metrics: bool,
    ) -> Self {
        Self {
            reader: ctx.reader(),
            proposals: ctx.store().clone(),
            status: ctx.status().clone(),
            metrics: expose_metrics.then(|| ctx.metrics().clone()),
        }
    }
}

/// Build the router with all routes and layers applied.
pub fn router(state: RpcState) -> Router {
    Router::new()
        .route("/root", get(handlers::get_root))
        .route("/proof/:account", get(handlers::get_proof))
        .route("/proposals", get(handlers::list_proposals))
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::get_status))
        .route("/metrics", get(handlers::get_metrics))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct RpcServer {
    pub addr: SocketAddr,
}

impl RpcServer {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Bind and serve until `shutdown` fires, then drain in-flight requests.
    pub async fn serve(
        &self,
        state: RpcState,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), RpcError> {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {}: {e}", self.addr)))?;
        info!(addr = %self.addr, "read API listening");

        axum::serve(listener, router(state))
            .with_graceful_shutdown(signalled(shutdown))
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;

        info!("read API stopped");
        Ok(())
    }
}
