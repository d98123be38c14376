//! Processor identity and topology, read once from `/proc/cpuinfo`.

use std::io::{self, BufRead};
use std::path::Path;

use serde::Serialize;

use super::error::SamplerError;
use super::source;
use crate::format::truncate_unicode;

/// Display columns kept from the `model name` field.
pub const MAX_NAME_WIDTH: usize = 127;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopologyFallback {
    /// `siblings` was missing or zero; the `processor` record count was used.
    pub threads_from_processor_count: bool,
    /// `cpu cores` was missing or zero; cores were assumed equal to threads.
    /// Wrong on SMT machines.
    pub cores_guessed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessorDescriptor {
    pub name: String,
    pub physical_cores: usize,
    pub logical_threads: usize,
    pub fallbacks: TopologyFallback,
}

pub fn read_processor_descriptor(path: &Path) -> Result<ProcessorDescriptor, SamplerError> {
    let reader = source::open(path)?;
    let descriptor =
        parse_processor_descriptor(reader).map_err(|e| SamplerError::unavailable(path, e))?;
    tracing::debug!(
        name = %descriptor.name,
        cores = descriptor.physical_cores,
        threads = descriptor.logical_threads,
        "processor descriptor loaded"
    );
    Ok(descriptor)
}

/// Scans topology records until the model name, `cpu cores` and `siblings`
/// have each been seen once. Only the first package is described.
pub fn parse_processor_descriptor<R: BufRead>(reader: R) -> io::Result<ProcessorDescriptor> {
    let mut name: Option<String> = None;
    let mut cores: Option<usize> = None;
    let mut siblings: Option<usize> = None;
    let mut processor_entries = 0usize;

    for line in source::lossy_lines(reader) {
        let line = line?;
        let line = line.trim_start();

        if name.is_none() && line.starts_with("model name") {
            if let Some((_, value)) = line.split_once(':') {
                name = Some(truncate_unicode(value.trim(), MAX_NAME_WIDTH));
            }
        } else if cores.is_none() && line.starts_with("cpu cores") {
            cores = field_count(line);
        } else if siblings.is_none() && line.starts_with("siblings") {
            siblings = field_count(line);
        } else if line.starts_with("processor") {
            processor_entries += 1;
        }

        if name.is_some() && cores.is_some() && siblings.is_some() {
            break;
        }
    }

    let mut fallbacks = TopologyFallback::default();

    let mut logical_threads = match siblings {
        Some(n) if n > 0 => n,
        _ => {
            fallbacks.threads_from_processor_count = true;
            processor_entries
        }
    };

    let mut physical_cores = match cores {
        Some(n) if n > 0 => n,
        _ => {
            fallbacks.cores_guessed = true;
            if logical_threads > 0 { logical_threads } else { 1 }
        }
    };

    physical_cores = physical_cores.max(1);
    logical_threads = logical_threads.max(1);
    if logical_threads < physical_cores {
        logical_threads = physical_cores;
    }

    if fallbacks != TopologyFallback::default() {
        tracing::debug!(?fallbacks, "topology fields missing, using fallbacks");
    }

    Ok(ProcessorDescriptor {
        name: name.unwrap_or_default(),
        physical_cores,
        logical_threads,
        fallbacks,
    })
}

fn field_count(line: &str) -> Option<usize> {
    let (_, value) = line.split_once(':')?;
    value.split_whitespace().next()?.parse().ok()
}
