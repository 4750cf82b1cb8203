//! Runtime environment logging.
//!
//! Load numbers only mean something next to the resources they ran on, so the
//! CLI records CPU and memory before it starts generating work.

use serde::Serialize;
use tracing::info;

/// Host resources visible to this process.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentInfo {
    /// Number of CPU cores visible to the process
    pub cpu_cores: usize,
    /// Total memory in MB
    pub memory_mb: u64,
    /// Available memory in MB
    pub available_memory_mb: u64,
}

/// Log and capture runtime environment information.
pub fn log_runtime_environment() -> EnvironmentInfo {
    let cpu_cores = num_cpus::get();

    let sys = sysinfo::System::new_all();
    let memory_mb = sys.total_memory() / 1024 / 1024;
    let available_memory_mb = sys.available_memory() / 1024 / 1024;

    info!(
        "Runtime environment: {} CPU cores, {} MB memory ({} MB available)",
        cpu_cores, memory_mb, available_memory_mb
    );

    EnvironmentInfo {
        cpu_cores,
        memory_mb,
        available_memory_mb,
    }
}
