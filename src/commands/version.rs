//! Version command - prints build metadata.

use crate::errors::{AppError, AppResult};
use crate::version::VersionInfo;

/// Print `VersionInfo` as pretty JSON on stdout.
pub fn execute() -> AppResult<()> {
    let json = serde_json::to_string_pretty(&VersionInfo::get())
        .map_err(|e| AppError::internal(format!("Failed to encode version: {}", e)))?;
    println!("{}", json);
    Ok(())
}
