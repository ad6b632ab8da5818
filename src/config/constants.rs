//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

use std::time::Duration;

// =============================================================================
// Pagination
// =============================================================================

/// Fixed number of users per page
pub const PAGE_SIZE: u64 = 20;

/// First page number (1-indexed); lower values are clamped to it
pub const FIRST_PAGE: i64 = 1;

/// Highest page whose offset still fits a signed 64-bit bind parameter
pub const LAST_PAGE: u64 = i64::MAX as u64 / PAGE_SIZE + 1;

// =============================================================================
// Configuration Loading
// =============================================================================

/// Prefix for environment overrides (`APISERVER_CORE_PORT` -> `core.port`)
pub const ENV_PREFIX: &str = "APISERVER";

/// Environment variable naming the config file when `--config` is absent
pub const CONFIG_PATH_ENV: &str = "APISERVER_CONFIG";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default service name
pub const DEFAULT_SERVICE_NAME: &str = "apiserver";

/// Default run mode
pub const DEFAULT_MODE: &str = "debug";

/// Run mode that enables development-only routes (Swagger UI)
pub const MODE_DEBUG: &str = "debug";

/// Host used when `core.address` is empty
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 9090;

/// Default TLS port
pub const DEFAULT_TLS_PORT: u16 = 9098;

/// Default number of readiness pings after startup
pub const DEFAULT_MAX_PING_COUNT: u32 = 2;

/// Delay between readiness pings
pub const PING_INTERVAL: Duration = Duration::from_secs(1);

/// Grace period for in-flight requests once shutdown starts
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Response header carrying the server version
pub const VERSION_HEADER: &str = "x-apiserver-version";

// =============================================================================
// Logging
// =============================================================================

pub const DEFAULT_LOG_WRITERS: &str = "file,stdout";
pub const DEFAULT_LOG_LEVEL: &str = "DEBUG";
pub const DEFAULT_LOG_FILE: &str = "log/apiserver.log";
pub const DEFAULT_ROLLING_POLICY: &str = "size";
pub const LOG_WRITER_FILE: &str = "file";
pub const LOG_WRITER_STDOUT: &str = "stdout";

// =============================================================================
// Database
// =============================================================================

pub const DEFAULT_DB_DRIVER: &str = "mysql";
pub const DEFAULT_DB_NAME: &str = "db_apiserver";
pub const DEFAULT_DB_ADDR: &str = "127.0.0.1:3306";
pub const DEFAULT_DB_USERNAME: &str = "root";
pub const DEFAULT_DB_PASSWORD: &str = "root";

/// Default maximum number of open pool connections
pub const DEFAULT_MAX_OPEN_CONNS: u32 = 10;

/// Default number of idle connections kept warm (0 = none)
pub const DEFAULT_MAX_IDLE_CONNS: u32 = 0;

/// Default seconds before an idle pooled connection is reaped
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 60;

/// Default seconds to wait for a new connection
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// SQLite database name that selects an in-memory database
pub const SQLITE_MEMORY: &str = ":memory:";

/// Idle and lifetime limit for the pinned in-memory connection; recycling it
/// would drop the whole database
pub const MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// =============================================================================
// Validation
// =============================================================================

/// Order in which field constraint failures are reported
pub const VALIDATION_ORDER: &[&str] = &["username", "password"];

// =============================================================================
// Probes
// =============================================================================

/// Used percentage at which disk/ram probes report WARNING
pub const USAGE_WARNING_PERCENT: u64 = 90;

/// Used percentage at which disk/ram probes report CRITICAL
pub const USAGE_CRITICAL_PERCENT: u64 = 95;

pub const BYTES_PER_MB: u64 = 1024 * 1024;
pub const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;
