//! API middleware.

mod headers;
mod recovery;
mod request_id;

pub use headers::{no_cache, security_headers, version_header};
pub use recovery::handle_panic;
pub use request_id::{MakeCorrelationId, REQUEST_ID_HEADER};
