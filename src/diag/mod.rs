//! Best-effort host facts for startup diagnostics.
//!
//! Everything here is informational and never affects control flow:
//! a missing query tool or an unreadable fact degrades to an omitted
//! line, not an error.

use serde::Serialize;
use std::process::Command;

/// Static facts about the host this module runs on.
#[derive(Debug, Clone, Serialize)]
pub struct HostInfo {
    pub os: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel: Option<String>,
    pub arch: String,
    pub physical_cores: usize,
    pub logical_cores: usize,
    pub total_ram_gb: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gpus: Vec<String>,
}

impl HostInfo {
    /// Collect host facts. Never fails; unknown facts come back as
    /// `None` or empty.
    #[must_use]
    pub fn collect() -> Self {
        use sysinfo::System;
        let mut sys = System::new();
        sys.refresh_memory();

        Self {
            os: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            os_version: System::os_version(),
            kernel: System::kernel_version(),
            arch: std::env::consts::ARCH.to_string(),
            physical_cores: num_cpus::get_physical(),
            logical_cores: num_cpus::get(),
            total_ram_gb: sys.total_memory() as f64 / f64::from(1u32 << 30),
            gpus: query_nvidia_gpus(),
        }
    }
}

/// Query GPU names via nvidia-smi when the tool is present.
///
/// A missing binary or a non-zero exit is a soft miss (empty list).
fn query_nvidia_gpus() -> Vec<String> {
    let output = Command::new("nvidia-smi")
        .args(["--query-gpu=name,memory.total", "--format=csv,noheader"])
        .output();

    match output {
        Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Ok(_) | Err(_) => {
            tracing::debug!("nvidia-smi not available, skipping GPU info");
            Vec::new()
        }
    }
}
