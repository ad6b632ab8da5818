//! Infrastructure layer - persistence gateway
//!
//! Owns the connection pool, schema migrations and the user repository.

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
