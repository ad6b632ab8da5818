//! Custom request extractors.

mod correlation_id;
mod json_body;
mod query_params;
mod user_id;

pub use correlation_id::CorrelationId;
pub use json_body::JsonBody;
pub use query_params::QueryParams;
pub use user_id::UserId;
