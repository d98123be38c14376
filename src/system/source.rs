use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::error::SamplerError;

pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Locations of the three kernel counter files the engine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcPaths {
    pub cpuinfo: PathBuf,
    pub stat: PathBuf,
    pub meminfo: PathBuf,
}

impl ProcPaths {
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        ProcPaths {
            cpuinfo: root.join("cpuinfo"),
            stat: root.join("stat"),
            meminfo: root.join("meminfo"),
        }
    }
}

impl Default for ProcPaths {
    fn default() -> Self {
        Self::from_root(DEFAULT_PROC_ROOT)
    }
}

/// Opens a counter file for line-oriented scanning. The handle is dropped by
/// the caller's scope, parse failures included.
pub(crate) fn open(path: &Path) -> Result<BufReader<File>, SamplerError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| SamplerError::unavailable(path, e))
}

/// Line iterator that decodes each line lossily, so stray non-UTF-8 bytes
/// reach the parsers as U+FFFD instead of failing the whole read. Only
/// genuine read failures come back as `Err`.
pub(crate) struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

pub(crate) fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> {
    LossyLines {
        reader,
        buf: Vec::new(),
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let mut end = self.buf.len();
                if self.buf[..end].ends_with(b"\n") {
                    end -= 1;
                    if self.buf[..end].ends_with(b"\r") {
                        end -= 1;
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf[..end]).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
