//! Commands module - process entry points.

pub mod serve;
pub mod version;
