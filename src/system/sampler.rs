//! Sampling cycle state machine over the counter source.
//!
//! The first cycle primes a baseline and waits out the settle delay; every
//! later cycle diffs against the snapshot retained from the cycle before.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use super::error::{MalformedRecord, SamplerError};
use super::stat::{CounterSnapshot, compute_utilization, read_all_counters};

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Where counter snapshots come from. `StatFile` in production; tests feed
/// scripted text.
pub trait CounterSource {
    fn read_counters(
        &mut self,
        slots: &mut [CounterSnapshot],
        thread_count: usize,
    ) -> Result<Vec<MalformedRecord>, SamplerError>;
}

#[derive(Debug, Clone)]
pub struct StatFile {
    path: PathBuf,
}

impl StatFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StatFile { path: path.into() }
    }
}

impl CounterSource for StatFile {
    fn read_counters(
        &mut self,
        slots: &mut [CounterSnapshot],
        thread_count: usize,
    ) -> Result<Vec<MalformedRecord>, SamplerError> {
        read_all_counters(&self.path, slots, thread_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SamplerPhase {
    Uninitialized,
    Primed,
    Steady,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuUtilization {
    pub aggregate: f64,
    /// Indexed by logical CPU number.
    pub per_thread: Vec<f64>,
    /// Records skipped this cycle; their values repeat the last good read.
    #[serde(skip)]
    pub malformed: Vec<MalformedRecord>,
}

pub struct CpuSampler<S = StatFile> {
    source: S,
    thread_count: usize,
    previous: Vec<CounterSnapshot>,
    current: Vec<CounterSnapshot>,
    phase: SamplerPhase,
    settle_delay: Duration,
}

impl<S: CounterSource> CpuSampler<S> {
    /// Snapshot buffers hold the aggregate plus one slot per logical thread.
    pub fn new(source: S, thread_count: usize) -> Self {
        CpuSampler {
            source,
            thread_count,
            previous: vec![CounterSnapshot::default(); thread_count + 1],
            current: vec![CounterSnapshot::default(); thread_count + 1],
            phase: SamplerPhase::Uninitialized,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn phase(&self) -> SamplerPhase {
        self.phase
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Runs one sampling cycle.
    ///
    /// Returns `Ok(None)` for the priming cycle, which blocks the thread for
    /// the settle delay. A source failure leaves the retained baseline intact
    /// so the next cycle can recover.
    pub fn cycle(&mut self) -> Result<Option<CpuUtilization>, SamplerError> {
        let _span = tracing::debug_span!("sampler.cycle", phase = ?self.phase).entered();

        if self.phase == SamplerPhase::Uninitialized {
            self.prime()?;
            return Ok(None);
        }

        let malformed = match self.source.read_counters(&mut self.current, self.thread_count) {
            Ok(malformed) => malformed,
            Err(err) => {
                self.current.copy_from_slice(&self.previous);
                return Err(err);
            }
        };

        let aggregate = compute_utilization(&self.previous[0], &self.current[0]);
        let per_thread = self
            .previous
            .iter()
            .zip(&self.current)
            .skip(1)
            .map(|(prev, curr)| compute_utilization(prev, curr))
            .collect();

        self.previous.copy_from_slice(&self.current);
        if self.phase == SamplerPhase::Primed {
            tracing::debug!("sampler steady");
        }
        self.phase = SamplerPhase::Steady;

        Ok(Some(CpuUtilization {
            aggregate,
            per_thread,
            malformed,
        }))
    }

    fn prime(&mut self) -> Result<(), SamplerError> {
        self.previous.fill(CounterSnapshot::default());
        self.source
            .read_counters(&mut self.previous, self.thread_count)?;
        self.current.copy_from_slice(&self.previous);
        std::thread::sleep(self.settle_delay);
        self.phase = SamplerPhase::Primed;
        tracing::debug!(delay_ms = self.settle_delay.as_millis() as u64, "sampler primed");
        Ok(())
    }
}
