//! Request handlers and response bodies.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use shadow_indexer::tracing_spans::rpc_span;
use shadow_store::ProposalRecord;
use shadow_types::AccountId;
use tracing::Instrument;

use crate::error::RpcError;
use crate::server::RpcState;

// ── Tree ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub root: String,
}

/// Inclusion proof in the shape circuits consume: sibling hashes and
/// direction bits, both leaf-to-root.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProofResponse {
    pub proof: Vec<String>,
    pub indices: Vec<bool>,
    pub encrypted_salt: String,
    pub root: String,
}

pub async fn get_root(State(state): State<RpcState>) -> Json<RootResponse> {
    rpc_span("root").in_scope(|| {
        Json(RootResponse {
            root: state.reader.root().to_decimal(),
        })
    })
}

pub async fn get_proof(
    State(state): State<RpcState>,
    Path(account): Path<String>,
) -> Result<Json<ProofResponse>, RpcError> {
    rpc_span("proof").in_scope(|| {
        let account =
            AccountId::new(account).map_err(|e| RpcError::InvalidRequest(e.to_string()))?;

        let snapshot = state.reader.current();
        let found = snapshot
            .proof_for(&account)
            .ok_or_else(|| RpcError::AccountNotFound(account.to_string()))?;

        tracing::debug!(account = %account, index = found.proof.index, "serving proof");
        Ok(Json(ProofResponse {
            proof: found.proof.siblings.iter().map(|s| s.to_decimal()).collect(),
            indices: found.proof.directions,
            encrypted_salt: found.encrypted_salt,
            root: found.proof.root.to_decimal(),
        }))
    })
}

// ── Proposals ────────────────────────────────────────────────────────────

pub async fn list_proposals(
    State(state): State<RpcState>,
) -> Result<Json<Vec<ProposalRecord>>, RpcError> {
    let proposals = state.proposals.clone();
    let records = tokio::task::spawn_blocking(move || proposals.list_proposals())
        .instrument(rpc_span("proposals"))
        .await
        .map_err(|e| RpcError::Server(e.to_string()))??;
    Ok(Json(records))
}

// ── Node ─────────────────────────────────────────────────────────────────

pub async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub next_height: Option<u64>,
    pub chain_head: Option<u64>,
    pub leaf_count: usize,
    pub tree_depth: u32,
    pub root: String,
}

pub async fn get_status(State(state): State<RpcState>) -> Json<StatusResponse> {
    let snapshot = state.reader.current();
    Json(StatusResponse {
        next_height: state.status.next_height(),
        chain_head: state.status.chain_head(),
        leaf_count: snapshot.leaf_count(),
        tree_depth: snapshot.depth(),
        root: snapshot.root().to_decimal(),
    })
}

pub async fn get_metrics(State(state): State<RpcState>) -> Result<impl IntoResponse, RpcError> {
    let metrics = state.metrics.as_ref().ok_or(RpcError::MetricsDisabled)?;
    let body = metrics
        .encode()
        .map_err(|e| RpcError::Server(e.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
