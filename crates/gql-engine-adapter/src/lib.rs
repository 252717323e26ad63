//! GraphQL API definition -> execution engine configuration.
//!
//! This crate is intended to be used by:
//! - `unrelated-gql-adapter` (operator CLI)
//! - gateway configuration loaders that hand the result to an execution engine
//!
//! It performs **no** network I/O and holds **no** state; every function is a pure
//! transformation of its inputs.

pub mod config;
pub mod datasource;
pub mod engine;
pub mod error;
pub mod headers;
pub mod schema;
pub mod subscription;

pub use engine::{EngineAdapter, EngineConfig};
pub use error::{AdapterError, Result};
