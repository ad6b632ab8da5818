//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on the repository trait so tests can
//! swap in a mock.

mod user_service;

pub use user_service::{encrypt, validate, UserManager, UserService};
