use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that escape a reader. Record-level problems never do.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("cannot read {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SamplerError {
    pub fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SamplerError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// A counter record that parsed with fewer fields than expected.
///
/// `cpu` is `None` for the aggregate record. The affected snapshot slot is
/// left untouched for the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("malformed counter record for {}: parsed {fields} of 10 fields", describe_cpu(.cpu))]
pub struct MalformedRecord {
    pub cpu: Option<usize>,
    pub fields: usize,
}

fn describe_cpu(cpu: &Option<usize>) -> String {
    match cpu {
        Some(index) => format!("cpu{index}"),
        None => "aggregate cpu".to_string(),
    }
}
