//! LMDB backend for the Shadow Vote durable log.
//!
//! Implements the `shadow-store` traits on top of `heed`. All logical stores
//! live as named databases inside a single environment.

pub mod environment;
pub mod error;
pub mod leaf;
pub mod meta;
pub mod migration;
pub mod proposal;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
