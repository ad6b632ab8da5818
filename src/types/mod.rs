//! Shared types for DRY compliance.

mod pagination;
mod response;

pub use pagination::PageRequest;
pub use response::ApiResponse;
