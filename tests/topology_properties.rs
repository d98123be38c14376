use proptest::prelude::*;
use procmon::system::cpuinfo::parse_processor_descriptor;

fn cpuinfo_text(cores: Option<u32>, siblings: Option<u32>, processors: usize) -> String {
    let mut fields = String::from("model name\t: Test CPU\n");
    if let Some(s) = siblings {
        fields.push_str(&format!("siblings\t: {s}\n"));
    }
    if let Some(c) = cores {
        fields.push_str(&format!("cpu cores\t: {c}\n"));
    }

    if processors == 0 {
        return fields;
    }
    (0..processors)
        .map(|i| format!("processor\t: {i}\n{fields}\n"))
        .collect()
}

proptest! {
    #[test]
    fn topology_is_never_empty_or_inverted(
        cores in proptest::option::of(0u32..64),
        siblings in proptest::option::of(0u32..128),
        processors in 0usize..64,
    ) {
        let text = cpuinfo_text(cores, siblings, processors);
        let d = parse_processor_descriptor(text.as_bytes()).unwrap();

        prop_assert!(d.physical_cores >= 1);
        prop_assert!(d.logical_threads >= 1);
        prop_assert!(d.logical_threads >= d.physical_cores);
    }

    #[test]
    fn reported_fields_are_taken_as_is(
        cores in 1u32..64,
        extra in 0u32..64,
        processors in 0usize..8,
    ) {
        let siblings = cores + extra;
        let text = cpuinfo_text(Some(cores), Some(siblings), processors);
        let d = parse_processor_descriptor(text.as_bytes()).unwrap();

        prop_assert_eq!(d.physical_cores, cores as usize);
        prop_assert_eq!(d.logical_threads, siblings as usize);
        prop_assert!(!d.fallbacks.threads_from_processor_count);
        prop_assert!(!d.fallbacks.cores_guessed);
    }

    #[test]
    fn missing_siblings_fall_back_to_processor_count(
        cores in proptest::option::of(0u32..64),
        processors in 0usize..64,
    ) {
        let text = cpuinfo_text(cores, None, processors);
        let d = parse_processor_descriptor(text.as_bytes()).unwrap();

        let counted = processors.max(1);
        let expected = match cores {
            Some(c) if c > 0 => counted.max(c as usize),
            _ => counted,
        };
        prop_assert!(d.fallbacks.threads_from_processor_count);
        prop_assert_eq!(d.logical_threads, expected);
    }
}
