//! Cumulative CPU tick counters from `/proc/stat` and the delta engine that
//! turns two snapshots into a utilization percentage.

use std::io::{self, BufRead};
use std::path::Path;

use serde::Serialize;

use super::error::{MalformedRecord, SamplerError};
use super::source;

pub const COUNTER_FIELDS: usize = 10;

/// Tick counters for one logical CPU, or for the aggregate record at slot 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CounterSnapshot {
    pub fn from_fields(f: [u64; COUNTER_FIELDS]) -> Self {
        CounterSnapshot {
            user: f[0],
            nice: f[1],
            system: f[2],
            idle: f[3],
            iowait: f[4],
            irq: f[5],
            softirq: f[6],
            steal: f[7],
            guest: f[8],
            guest_nice: f[9],
        }
    }

    pub fn idle_time(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    /// Guest time is already folded into `user` by the kernel.
    pub fn active_time(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .into_iter()
        .fold(0u64, u64::saturating_add)
    }

    pub fn total_time(&self) -> u64 {
        self.idle_time().saturating_add(self.active_time())
    }
}

/// Percentage of the interval between `prev` and `curr` spent non-idle.
///
/// Returns 0 when no ticks elapsed, and when any counter went backwards
/// (treated as a reset).
pub fn compute_utilization(prev: &CounterSnapshot, curr: &CounterSnapshot) -> f64 {
    let Some(total_delta) = curr.total_time().checked_sub(prev.total_time()) else {
        return 0.0;
    };
    let Some(idle_delta) = curr.idle_time().checked_sub(prev.idle_time()) else {
        return 0.0;
    };
    if total_delta == 0 {
        return 0.0;
    }
    let busy = total_delta.saturating_sub(idle_delta);
    (busy as f64 * 100.0 / total_delta as f64).clamp(0.0, 100.0)
}

/// Reads the counter file into `slots` (see [`parse_counters`]).
pub fn read_all_counters(
    path: &Path,
    slots: &mut [CounterSnapshot],
    thread_count: usize,
) -> Result<Vec<MalformedRecord>, SamplerError> {
    let reader = source::open(path)?;
    parse_counters(reader, slots, thread_count).map_err(|e| SamplerError::unavailable(path, e))
}

/// Parses the contiguous `cpu` records at the head of a stat source.
///
/// Slot 0 receives the aggregate record, slot `n + 1` the record for `cpuN`
/// when `n < thread_count` and the slot exists. A record with fewer than ten
/// numeric fields leaves its slot untouched and is reported back. Scanning
/// stops at the first record that is not a `cpu` record.
pub fn parse_counters<R: BufRead>(
    reader: R,
    slots: &mut [CounterSnapshot],
    thread_count: usize,
) -> io::Result<Vec<MalformedRecord>> {
    let mut malformed = Vec::new();

    for line in source::lossy_lines(reader) {
        let line = line?;

        if let Some(rest) = line.strip_prefix("cpu ") {
            match parse_fields(rest) {
                Ok(fields) => {
                    if let Some(slot) = slots.first_mut() {
                        *slot = CounterSnapshot::from_fields(fields);
                    }
                }
                Err(fields) => {
                    let record = MalformedRecord { cpu: None, fields };
                    tracing::warn!(%record, "skipping counter record");
                    malformed.push(record);
                }
            }
        } else if let Some(rest) = line.strip_prefix("cpu") {
            let Some((index, values)) = split_cpu_index(rest) else {
                continue;
            };
            if index >= thread_count || index + 1 >= slots.len() {
                continue;
            }
            match parse_fields(values) {
                Ok(fields) => slots[index + 1] = CounterSnapshot::from_fields(fields),
                Err(fields) => {
                    let record = MalformedRecord {
                        cpu: Some(index),
                        fields,
                    };
                    tracing::warn!(%record, "skipping counter record");
                    malformed.push(record);
                }
            }
        } else {
            break;
        }
    }

    Ok(malformed)
}

/// `"3 123 0 ..."` -> `(3, "123 0 ...")`
fn split_cpu_index(rest: &str) -> Option<(usize, &str)> {
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let index = rest[..digits].parse().ok()?;
    Some((index, &rest[digits..]))
}

/// Parses the first ten numeric fields. On failure returns how many parsed.
fn parse_fields(values: &str) -> Result<[u64; COUNTER_FIELDS], usize> {
    let mut fields = [0u64; COUNTER_FIELDS];
    let mut tokens = values.split_whitespace();
    for (parsed, slot) in fields.iter_mut().enumerate() {
        match tokens.next().and_then(|t| t.parse().ok()) {
            Some(value) => *slot = value,
            None => return Err(parsed),
        }
    }
    Ok(fields)
}
