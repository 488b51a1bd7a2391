//! Nullable infrastructure for deterministic testing.
//!
//! The chain API and the durable log are abstracted behind traits. This
//! crate provides in-memory implementations that:
//! - return scripted, deterministic values
//! - can inject transient failures on demand
//! - never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod store;

pub use chain::{execute_block, public_transition, NullChain};
pub use store::NullStore;
