use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;

use serde::Serialize;

use super::error::SamplerError;
use super::source;

/// Physical and swap usage derived from one read of `/proc/meminfo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemorySummary {
    pub total_physical_kb: u64,
    pub used_physical_kb: u64,
    pub physical_usage_percent: f64,
    pub total_swap_kb: u64,
    pub used_swap_kb: u64,
    pub swap_usage_percent: f64,
}

#[derive(Debug, Default)]
struct MemCounters {
    mem_total: u64,
    mem_free: u64,
    buffers: u64,
    cached: u64,
    swap_total: u64,
    swap_free: u64,
}

impl MemorySummary {
    fn from_counters(c: &MemCounters) -> Self {
        // Some kernels report free + buffers + cached slightly above total.
        let used_physical_kb = c
            .mem_total
            .saturating_sub(c.mem_free)
            .saturating_sub(c.buffers)
            .saturating_sub(c.cached);
        let used_swap_kb = c.swap_total.saturating_sub(c.swap_free);

        MemorySummary {
            total_physical_kb: c.mem_total,
            used_physical_kb,
            physical_usage_percent: usage_percent(used_physical_kb, c.mem_total),
            total_swap_kb: c.swap_total,
            used_swap_kb,
            swap_usage_percent: usage_percent(used_swap_kb, c.swap_total),
        }
    }

    /// The four display lines: physical total, physical usage, swap total,
    /// swap usage.
    pub fn lines(&self) -> [String; 4] {
        [
            format!("Total physical memory: {} MB", self.total_physical_kb / 1024),
            format!("Usage: {:.2}%", self.physical_usage_percent),
            format!("Total swap: {} MB", self.total_swap_kb / 1024),
            format!("Usage: {:.2}%", self.swap_usage_percent),
        ]
    }
}

impl fmt::Display for MemorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

fn usage_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 * 100.0 / total as f64).clamp(0.0, 100.0)
}

pub fn read_memory_summary(path: &Path) -> Result<MemorySummary, SamplerError> {
    let reader = source::open(path)?;
    parse_memory_summary(reader).map_err(|e| SamplerError::unavailable(path, e))
}

/// Fields that never appear read as zero; unrelated lines are skipped.
pub fn parse_memory_summary<R: BufRead>(reader: R) -> io::Result<MemorySummary> {
    let mut counters = MemCounters::default();

    for line in source::lossy_lines(reader) {
        let line = line?;
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(value) = rest.split_whitespace().next().and_then(|v| v.parse().ok()) else {
            continue;
        };
        match key {
            "MemTotal" => counters.mem_total = value,
            "MemFree" => counters.mem_free = value,
            "Buffers" => counters.buffers = value,
            "Cached" => counters.cached = value,
            "SwapTotal" => counters.swap_total = value,
            "SwapFree" => counters.swap_free = value,
            _ => {}
        }
    }

    Ok(MemorySummary::from_counters(&counters))
}
