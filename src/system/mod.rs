pub mod cpuinfo;
pub mod error;
pub mod meminfo;
pub mod sampler;
pub mod source;
pub mod stat;

pub use cpuinfo::{ProcessorDescriptor, read_processor_descriptor};
pub use error::{MalformedRecord, SamplerError};
pub use meminfo::{MemorySummary, read_memory_summary};
pub use sampler::{CpuSampler, CpuUtilization, SamplerPhase, StatFile};
pub use source::ProcPaths;
pub use stat::{CounterSnapshot, compute_utilization};
