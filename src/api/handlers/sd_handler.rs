//! Operational probes under `/sd`.
//!
//! Responses are plain text so load balancers and shell checks can read them
//! without parsing the envelope.

use axum::{http::StatusCode, routing::get, Router};
use sysinfo::{Disks, System};

use crate::api::state::AppState;
use crate::config::{BYTES_PER_GB, BYTES_PER_MB, USAGE_CRITICAL_PERCENT, USAGE_WARNING_PERCENT};

/// Probe verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Ok,
    Warning,
    Critical,
}

impl ProbeStatus {
    pub fn status_code(self) -> StatusCode {
        match self {
            ProbeStatus::Ok => StatusCode::OK,
            ProbeStatus::Warning => StatusCode::TOO_MANY_REQUESTS,
            ProbeStatus::Critical => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProbeStatus::Ok => "OK",
            ProbeStatus::Warning => "WARNING",
            ProbeStatus::Critical => "CRITICAL",
        }
    }
}

/// Classify a used-space percentage.
pub fn usage_status(used_percent: u64) -> ProbeStatus {
    if used_percent >= USAGE_CRITICAL_PERCENT {
        ProbeStatus::Critical
    } else if used_percent >= USAGE_WARNING_PERCENT {
        ProbeStatus::Warning
    } else {
        ProbeStatus::Ok
    }
}

/// Classify the 5-minute load average against the core count.
pub fn load_status(load5: f64, cores: usize) -> ProbeStatus {
    let cores = cores as f64;
    if load5 >= cores - 1.0 {
        ProbeStatus::Critical
    } else if load5 >= cores - 2.0 {
        ProbeStatus::Warning
    } else {
        ProbeStatus::Ok
    }
}

fn used_percent(used: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    ((used as u128 * 100) / total as u128) as u64
}

/// Render a capacity probe line and its verdict.
pub fn capacity_report(free: u64, total: u64) -> (StatusCode, String) {
    let percent = used_percent(total.saturating_sub(free), total);
    let status = usage_status(percent);
    let text = format!(
        "{} - Free space: {}MB ({}GB) / {}MB ({}GB) | Used: {}%",
        status.as_str(),
        free / BYTES_PER_MB,
        free / BYTES_PER_GB,
        total / BYTES_PER_MB,
        total / BYTES_PER_GB,
        percent
    );
    (status.status_code(), text)
}

/// Create the probe routes
pub fn sd_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/disk", get(disk_check))
        .route("/cpu", get(cpu_check))
        .route("/ram", get(ram_check))
}

/// Liveness
pub async fn health_check() -> &'static str {
    "OK"
}

/// Root filesystem usage
pub async fn disk_check() -> (StatusCode, String) {
    let disks = Disks::new_with_refreshed_list();
    let root = disks
        .list()
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new("/"))
        .or_else(|| disks.list().first());

    match root {
        Some(disk) => capacity_report(disk.available_space(), disk.total_space()),
        None => {
            tracing::warn!("No disk found for the disk probe");
            (
                ProbeStatus::Critical.status_code(),
                "CRITICAL - No disk found".to_string(),
            )
        }
    }
}

/// Load average against available cores
pub async fn cpu_check() -> (StatusCode, String) {
    let load = System::load_average();
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    let status = load_status(load.five, cores);
    let text = format!(
        "{} - Load average: {:.2}, {:.2}, {:.2} | Cores: {}",
        status.as_str(),
        load.one,
        load.five,
        load.fifteen,
        cores
    );
    (status.status_code(), text)
}

/// Physical memory usage
pub async fn ram_check() -> (StatusCode, String) {
    let mut sys = System::new();
    sys.refresh_memory();

    let total = sys.total_memory();
    let free = total.saturating_sub(sys.used_memory());
    capacity_report(free, total)
}
