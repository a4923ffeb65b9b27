//! Built-in process probes
//!
//! Reads metrics for the current process from procfs:
//! - /proc/self/stat for CPU time (utime + stime in clock ticks)
//! - /proc/self/statm for resident set size in pages
//!
//! Parsing is split into pure functions so tests can run against captured
//! file contents without a live procfs.

use super::MetricProbe;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use tokio::fs;

/// Kernel USER_HZ; /proc stat times are reported in these ticks
const CLOCK_TICKS_PER_SEC: f64 = 100.0;

/// Page size used to convert statm pages to bytes
const PAGE_SIZE_BYTES: u64 = 4096;

/// CPU usage probe for the current process
///
/// Reports percent of one core used since the previous reading. The first
/// read establishes a baseline and fails, which the scheduler treats as a
/// skipped sample for that cycle.
pub struct ProcCpuProbe {
    stat_path: PathBuf,
    baseline: Mutex<Option<CpuBaseline>>,
}

#[derive(Clone, Copy)]
struct CpuBaseline {
    total_ticks: u64,
    read_at: Instant,
}

impl ProcCpuProbe {
    pub fn new() -> Self {
        Self::with_stat_path("/proc/self/stat")
    }

    /// Create a probe reading from a custom path (for testing)
    pub fn with_stat_path(path: impl Into<PathBuf>) -> Self {
        Self {
            stat_path: path.into(),
            baseline: Mutex::new(None),
        }
    }

    /// Parse /proc/<pid>/stat contents into total CPU ticks (utime + stime)
    ///
    /// The comm field is parenthesized and may contain spaces, so fields are
    /// counted from the closing parenthesis: utime and stime are the 12th
    /// and 13th fields after it.
    pub fn parse_stat(content: &str) -> Result<u64> {
        let after_comm = content
            .rfind(')')
            .map(|idx| &content[idx + 1..])
            .context("malformed stat line: missing comm field")?;

        let fields: Vec<&str> = after_comm.split_whitespace().collect();
        if fields.len() < 13 {
            bail!("malformed stat line: {} fields after comm", fields.len());
        }

        let utime: u64 = fields[11].parse().context("failed to parse utime")?;
        let stime: u64 = fields[12].parse().context("failed to parse stime")?;
        Ok(utime + stime)
    }
}

impl Default for ProcCpuProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricProbe for ProcCpuProbe {
    async fn read(&self) -> Result<f64> {
        let content = fs::read_to_string(&self.stat_path)
            .await
            .with_context(|| format!("failed to read {}", self.stat_path.display()))?;
        let total_ticks = Self::parse_stat(&content)?;
        let now = Instant::now();

        let mut baseline = self
            .baseline
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let previous = baseline.replace(CpuBaseline {
            total_ticks,
            read_at: now,
        });

        match previous {
            None => bail!("awaiting baseline reading"),
            Some(prev) => {
                let elapsed = now.duration_since(prev.read_at).as_secs_f64();
                if elapsed <= 0.0 {
                    bail!("zero elapsed time since baseline");
                }
                let used_secs =
                    total_ticks.saturating_sub(prev.total_ticks) as f64 / CLOCK_TICKS_PER_SEC;
                Ok((used_secs / elapsed) * 100.0)
            }
        }
    }
}

/// Resident memory probe for the current process
pub struct ProcMemoryProbe {
    statm_path: PathBuf,
}

impl ProcMemoryProbe {
    pub fn new() -> Self {
        Self::with_statm_path("/proc/self/statm")
    }

    /// Create a probe reading from a custom path (for testing)
    pub fn with_statm_path(path: impl Into<PathBuf>) -> Self {
        Self {
            statm_path: path.into(),
        }
    }

    /// Parse /proc/<pid>/statm contents into resident bytes
    ///
    /// statm reports sizes in pages; the second field is the resident set.
    pub fn parse_statm(content: &str) -> Result<u64> {
        let resident_pages: u64 = content
            .split_whitespace()
            .nth(1)
            .context("malformed statm line: missing resident field")?
            .parse()
            .context("failed to parse resident pages")?;
        Ok(resident_pages * PAGE_SIZE_BYTES)
    }
}

impl Default for ProcMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricProbe for ProcMemoryProbe {
    async fn read(&self) -> Result<f64> {
        let content = fs::read_to_string(&self.statm_path)
            .await
            .with_context(|| format!("failed to read {}", self.statm_path.display()))?;
        Ok(ProcMemoryProbe::parse_statm(&content)? as f64)
    }
}
