//! Shadow Vote commitment indexer.
//!
//! Follows a program's transitions on the Aleo ledger and maintains the
//! Merkle tree of `(account, balance, salt)` commitments that voters prove
//! membership against.
//!
//! - [`Poller`] advances a persisted cursor block by block against a
//!   [`shadow_chain::ChainSource`].
//! - [`events`] turns raw transitions into typed [`ProgramEvent`]s.
//! - [`handlers`] applies events to the [`IndexerContext`] (tree + durable log).
//! - `config`, `logging`, `metrics`, `shutdown` and `tracing_spans` carry
//!   the runtime plumbing shared with the daemon and the RPC server.

pub mod config;
pub mod context;
pub mod cursor;
pub mod error;
pub mod events;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod poller;
pub mod shutdown;
pub mod status;
pub mod tracing_spans;

pub use config::IndexerConfig;
pub use context::IndexerContext;
pub use cursor::CursorPolicy;
pub use error::IndexerError;
pub use events::ProgramEvent;
pub use logging::{init_logging, LogFormat};
pub use metrics::IndexerMetrics;
pub use poller::{CycleOutcome, Poller};
pub use shutdown::ShutdownController;
pub use status::IndexerStatus;
