//! HTTP request handlers.

pub mod sd_handler;
pub mod user_handler;

pub use sd_handler::sd_routes;
pub use user_handler::user_routes;
