//! Read API for the Shadow Vote indexer.
//!
//! Endpoints:
//! - `GET /root`: current commitment root
//! - `GET /proof/{account}`: inclusion proof plus the leaf's encrypted salt
//! - `GET /proposals`: proposals from the durable log, newest first
//! - `GET /health`: liveness
//! - `GET /status`: poller position and tree size
//! - `GET /metrics`: Prometheus exposition, when enabled
//!
//! Every response is built from a single published tree snapshot, so a
//! proof and the root it is returned with always agree.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{router, RpcServer, RpcState};
