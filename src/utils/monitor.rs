#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub phase_time: Duration,
    pub elapsed_time: Duration,
}

#[cfg(feature = "cli")]
struct MonitorState {
    system: System,
    peak_memory_mb: u64,
    last_mark: Instant,
}

/// 各階段的 CPU / 記憶體紀錄 (--monitor)
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    pid: Option<Pid>,
    start_time: Instant,
    state: Mutex<MonitorState>,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => Some(pid),
                Err(e) => {
                    tracing::warn!("System monitoring unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let now = Instant::now();
        Self {
            pid,
            start_time: now,
            state: Mutex::new(MonitorState {
                system: System::new(),
                peak_memory_mb: 0,
                last_mark: now,
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pid.is_some()
    }

    /// 記錄一個階段結束時的狀態
    pub fn sample(&self, phase: &str) -> Option<PhaseStats> {
        let pid = self.pid?;
        let mut state = self.state.lock().ok()?;

        state.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::everything(),
        );
        let (cpu_usage, memory_mb) = {
            let process = state.system.process(pid)?;
            (process.cpu_usage(), process.memory() / 1024 / 1024)
        };

        state.peak_memory_mb = state.peak_memory_mb.max(memory_mb);
        let now = Instant::now();
        let phase_time = now.duration_since(state.last_mark);
        state.last_mark = now;

        Some(PhaseStats {
            phase: phase.to_string(),
            cpu_usage,
            memory_mb,
            peak_memory_mb: state.peak_memory_mb,
            phase_time,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(stats) = self.sample(phase) {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Phase: {:?}, Total: {:?}",
                stats.phase,
                stats.cpu_usage,
                stats.memory_mb,
                stats.peak_memory_mb,
                stats.phase_time,
                stats.elapsed_time
            );
        }
    }

    pub fn log_final_stats(&self) {
        if let Some(stats) = self.sample("Final") {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                stats.elapsed_time,
                stats.peak_memory_mb
            );
        }
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 為非CLI環境提供空實現
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}
}
