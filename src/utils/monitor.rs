#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

/// Logs process CPU and memory after each suggestion phase.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    started: Instant,
    peak_memory_mb: Mutex<u64>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid().ok()
        } else {
            None
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
            started: Instant::now(),
            peak_memory_mb: Mutex::new(0),
            enabled,
        }
    }

    pub fn stats(&self) -> Option<PhaseStats> {
        if !self.enabled {
            return None;
        }
        let pid = self.pid?;

        let mut system = self.system.lock().ok()?;
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        let process = system.process(pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = self.peak_memory_mb.lock().ok()?;
        *peak = (*peak).max(memory_mb);

        Some(PhaseStats {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: *peak,
            elapsed: self.started.elapsed(),
        })
    }

    pub fn log_phase(&self, phase: &str) {
        if let Some(stats) = self.stats() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                phase,
                stats.cpu_usage,
                stats.memory_mb,
                stats.peak_memory_mb,
                stats.elapsed
            );
        }
    }

    pub fn log_final(&self) {
        if let Some(stats) = self.stats() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                stats.elapsed,
                stats.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 建置不收集系統資訊
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_phase(&self, _phase: &str) {}

    pub fn log_final(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
