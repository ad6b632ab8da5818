//! apiserver - User management HTTP API
//!
//! A single-process server exposing CRUD over user records, backed by a
//! SQL database through SeaORM.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: Process entry points (serve, version)
//! - **config**: Layered configuration and constants
//! - **domain**: Core business entities
//! - **services**: Validation, hashing and persistence orchestration
//! - **infra**: Persistence gateway (pool, migrations, repositories)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server with a config file
//! apiserver -c conf/config.yaml
//!
//! # Print build metadata
//! apiserver -v
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod logger;
pub mod services;
pub mod types;
pub mod version;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User};
pub use errors::{AppError, AppResult};
pub use infra::Database;
