use std::path::{Path, PathBuf};
use std::time::Duration;

use procmon::system::stat::read_all_counters;
use procmon::system::{
    CounterSnapshot, CpuSampler, MalformedRecord, ProcPaths, SamplerError, StatFile,
    read_memory_summary, read_processor_descriptor,
};

fn fixture(name: &str) -> ProcPaths {
    let root: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    ProcPaths::from_root(root)
}

#[test]
fn desktop_topology_uses_reported_fields() {
    let d = read_processor_descriptor(&fixture("desktop").cpuinfo).unwrap();
    assert_eq!(d.name, "Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz");
    assert_eq!(d.physical_cores, 4);
    assert_eq!(d.logical_threads, 8);
    assert!(!d.fallbacks.threads_from_processor_count);
    assert!(!d.fallbacks.cores_guessed);
}

#[test]
fn vm_topology_falls_back_to_processor_count() {
    let d = read_processor_descriptor(&fixture("vm").cpuinfo).unwrap();
    assert_eq!(d.name, "QEMU Virtual CPU version 2.5+");
    assert_eq!(d.logical_threads, 4);
    assert_eq!(d.physical_cores, 4);
    assert!(d.fallbacks.threads_from_processor_count);
    assert!(d.fallbacks.cores_guessed);
}

#[test]
fn desktop_counters_fill_every_slot() {
    let mut slots = vec![CounterSnapshot::default(); 9];
    let malformed = read_all_counters(&fixture("desktop").stat, &mut slots, 8).unwrap();
    assert!(malformed.is_empty());
    assert_eq!(slots[0].user, 4705);
    assert_eq!(slots[0].idle, 3_699_176);
    assert_eq!(slots[8].user, 580 + 7 * 3);
    assert!(slots.iter().all(|s| s.idle > 0));
}

#[test]
fn short_aggregate_record_is_reported_not_fatal() {
    let mut slots = vec![CounterSnapshot::default(); 5];
    let malformed = read_all_counters(&fixture("vm").stat, &mut slots, 4).unwrap();
    assert_eq!(malformed, vec![MalformedRecord { cpu: None, fields: 8 }]);
    assert_eq!(slots[0], CounterSnapshot::default());
    assert_eq!(slots[4].idle, 2000);
}

#[test]
fn memory_summaries_from_fixtures() {
    let desktop = read_memory_summary(&fixture("desktop").meminfo).unwrap();
    assert_eq!(desktop.used_physical_kb, 6000);
    assert!((desktop.physical_usage_percent - 37.5).abs() < 1e-9);
    assert_eq!(desktop.swap_usage_percent, 0.0);

    let vm = read_memory_summary(&fixture("vm").meminfo).unwrap();
    assert_eq!(vm.used_physical_kb, 1_028_000);
    assert_eq!(vm.used_swap_kb, 256_000);
    assert!((vm.swap_usage_percent - 25.0).abs() < 1e-9);
}

#[test]
fn missing_sources_are_source_unavailable() {
    let paths = fixture("does-not-exist");
    assert!(matches!(
        read_processor_descriptor(&paths.cpuinfo),
        Err(SamplerError::SourceUnavailable { .. })
    ));
    assert!(matches!(
        read_memory_summary(&paths.meminfo),
        Err(SamplerError::SourceUnavailable { .. })
    ));
    let mut slots = vec![CounterSnapshot::default(); 1];
    assert!(matches!(
        read_all_counters(&paths.stat, &mut slots, 0),
        Err(SamplerError::SourceUnavailable { .. })
    ));
}

#[test]
fn unchanged_counter_file_reads_as_idle() {
    let paths = fixture("desktop");
    let d = read_processor_descriptor(&paths.cpuinfo).unwrap();
    let mut sampler = CpuSampler::new(StatFile::new(&paths.stat), d.logical_threads)
        .with_settle_delay(Duration::from_millis(10));

    assert!(sampler.cycle().unwrap().is_none());
    let usage = sampler.cycle().unwrap().unwrap();
    assert_eq!(usage.aggregate, 0.0);
    assert_eq!(usage.per_thread.len(), 8);
    assert!(usage.per_thread.iter().all(|&p| p == 0.0));
}
