use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Serialize;

use crate::action::Action;
use crate::config::{Config, KeybindsConfig, LayoutConfig, parse_key};
use crate::system::{
    CpuSampler, CpuUtilization, MemorySummary, ProcPaths, ProcessorDescriptor, StatFile,
    read_memory_summary, read_processor_descriptor,
};
use crate::ui::theme::Theme;

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
        }
    }
}

/// Relative panel positions, each ratio clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelAnchors {
    pub cpu: (f32, f32),
    pub memory: (f32, f32),
}

impl PanelAnchors {
    pub fn from_config(layout: &LayoutConfig) -> Self {
        let ratio = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            cpu: (ratio(layout.cpu_row), ratio(layout.cpu_col)),
            memory: (ratio(layout.mem_row), ratio(layout.mem_col)),
        }
    }
}

/// Latest reading from one source, with the error of the most recent
/// failed cycle if there was one.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading<T> {
    pub value: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for Reading<T> {
    fn default() -> Self {
        Self {
            value: None,
            error: None,
        }
    }
}

impl<T> Reading<T> {
    fn update<E: std::fmt::Display>(&mut self, result: Result<T, E>) {
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Values are still on screen but no longer refreshing.
    pub fn is_stale(&self) -> bool {
        self.error.is_some() && self.value.is_some()
    }
}

/// One line of `--dump` output.
#[derive(Debug, Serialize)]
pub struct DumpRecord<'a> {
    pub cycle: u64,
    pub aggregate: f64,
    pub per_thread: &'a [f64],
    pub memory: Option<&'a MemorySummary>,
}

pub struct App {
    pub running: bool,
    pub descriptor: ProcessorDescriptor,
    pub sampler: CpuSampler,
    pub paths: ProcPaths,
    pub cpu: Reading<CpuUtilization>,
    pub memory: Reading<MemorySummary>,
    pub anchors: PanelAnchors,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
    pub refresh_ms: u64,
    pub cycles: u64,
}

impl App {
    /// Reads the topology and primes the sampler. Either source being
    /// unreadable here means the dashboard cannot start.
    pub fn new(config: &Config) -> Result<Self> {
        let paths = ProcPaths::from_root(&config.general.proc_root);
        let descriptor = read_processor_descriptor(&paths.cpuinfo)
            .wrap_err("processor topology is unavailable")?;
        let sampler = CpuSampler::new(StatFile::new(&paths.stat), descriptor.logical_threads);

        let mut app = Self::from_parts(config, paths, descriptor, sampler);
        app.sampler
            .cycle()
            .wrap_err("CPU counters are unavailable")?;
        app.memory.update(read_memory_summary(&app.paths.meminfo));
        Ok(app)
    }

    pub fn from_parts(
        config: &Config,
        paths: ProcPaths,
        descriptor: ProcessorDescriptor,
        sampler: CpuSampler,
    ) -> Self {
        App {
            running: true,
            descriptor,
            sampler,
            paths,
            cpu: Reading::default(),
            memory: Reading::default(),
            anchors: PanelAnchors::from_config(&config.layout),
            theme: Theme::from_config(&config.general.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            refresh_ms: config.general.refresh_rate_ms,
            cycles: 0,
        }
    }

    pub fn refresh_data(&mut self) {
        match self.sampler.cycle() {
            Ok(Some(usage)) => self.cpu.update::<String>(Ok(usage)),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "cpu sampling failed");
                self.cpu.update(Err(err));
            }
        }

        let memory = read_memory_summary(&self.paths.meminfo);
        if let Err(err) = &memory {
            tracing::warn!(error = %err, "memory summary failed");
        }
        self.memory.update(memory);
        self.cycles += 1;
    }

    pub fn dump_record(&self) -> Option<DumpRecord<'_>> {
        let cpu = self.cpu.value.as_ref()?;
        Some(DumpRecord {
            cycle: self.cycles,
            aggregate: cpu.aggregate,
            per_thread: &cpu.per_thread,
            memory: self.memory.value.as_ref(),
        })
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        if key.code == self.keybinds.quit {
            return Action::Quit;
        }
        if key.code == self.keybinds.refresh {
            return Action::Refresh;
        }
        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Refresh => self.refresh_data(),
            Action::None => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::system::SamplerPhase;

    pub(crate) const CPUINFO: &str = "\
processor\t: 0
model name\t: Test CPU 3000
siblings\t: 2
cpu cores\t: 1

processor\t: 1
model name\t: Test CPU 3000
siblings\t: 2
cpu cores\t: 1
";
    pub(crate) const STAT_T0: &str = "\
cpu  100 0 100 800 0 0 0 0 0 0
cpu0 50 0 50 400 0 0 0 0 0 0
cpu1 50 0 50 400 0 0 0 0 0 0
intr 1 2 3
";
    pub(crate) const STAT_T1: &str = "\
cpu  200 0 200 900 0 0 0 0 0 0
cpu0 150 0 50 400 0 0 0 0 0 0
cpu1 50 0 150 500 0 0 0 0 0 0
intr 1 2 3
";
    pub(crate) const MEMINFO: &str = "\
MemTotal:       16000 kB
MemFree:         8000 kB
Buffers:         1000 kB
Cached:          1000 kB
SwapTotal:          0 kB
SwapFree:           0 kB
";

    /// A throwaway proc tree under the temp dir, removed on drop.
    /// A throwaway proc root holding the three counter files.
    pub(crate) struct FixtureRoot(TempDir);

    impl FixtureRoot {
        pub(crate) fn new() -> Self {
            let dir = tempfile::Builder::new().prefix("procmon_").tempdir().unwrap();
            fs::write(dir.path().join("cpuinfo"), CPUINFO).unwrap();
            fs::write(dir.path().join("stat"), STAT_T0).unwrap();
            fs::write(dir.path().join("meminfo"), MEMINFO).unwrap();
            FixtureRoot(dir)
        }

        pub(crate) fn write(&self, file: &str, contents: &str) {
            fs::write(self.path().join(file), contents).unwrap();
        }

        pub(crate) fn remove(&self, file: &str) {
            let _ = fs::remove_file(self.path().join(file));
        }

        pub(crate) fn path(&self) -> &Path {
            self.0.path()
        }
    }

    pub(crate) fn make_test_app(root: &FixtureRoot) -> App {
        let mut config = Config::default();
        config.general.proc_root = root.path().to_path_buf();
        let paths = ProcPaths::from_root(root.path());
        let descriptor = read_processor_descriptor(&paths.cpuinfo).unwrap();
        let sampler = CpuSampler::new(StatFile::new(&paths.stat), descriptor.logical_threads)
            .with_settle_delay(std::time::Duration::from_millis(5));
        let mut app = App::from_parts(&config, paths, descriptor, sampler);
        app.sampler.cycle().unwrap();
        app
    }

    #[test]
    fn refresh_produces_steady_cpu_and_memory() {
        let root = FixtureRoot::new();
        let mut app = make_test_app(&root);
        assert_eq!(app.sampler.phase(), SamplerPhase::Primed);

        root.write("stat", STAT_T1);
        app.refresh_data();

        assert_eq!(app.sampler.phase(), SamplerPhase::Steady);
        let cpu = app.cpu.value.as_ref().unwrap();
        assert_eq!(cpu.per_thread, vec![100.0, 50.0]);
        let mem = app.memory.value.unwrap();
        assert!((mem.physical_usage_percent - 37.5).abs() < 1e-9);
        assert_eq!(mem.swap_usage_percent, 0.0);
        assert_eq!(app.cycles, 1);
    }

    #[test]
    fn vanished_counter_source_marks_values_stale() {
        let root = FixtureRoot::new();
        let mut app = make_test_app(&root);
        root.write("stat", STAT_T1);
        app.refresh_data();

        root.remove("stat");
        app.refresh_data();
        assert!(app.cpu.is_stale());
        assert!(app.cpu.error.as_ref().unwrap().contains("stat"));

        root.write("stat", STAT_T1);
        app.refresh_data();
        assert!(!app.cpu.is_stale());
        assert_eq!(app.cpu.value.as_ref().unwrap().aggregate, 0.0);
    }

    #[test]
    fn missing_meminfo_is_reported_not_fatal() {
        let root = FixtureRoot::new();
        root.remove("meminfo");
        let mut app = make_test_app(&root);
        app.refresh_data();
        assert!(app.memory.value.is_none());
        assert!(app.memory.error.is_some());
    }

    #[test]
    fn startup_fails_without_topology() {
        let root = FixtureRoot::new();
        root.remove("cpuinfo");
        let mut config = Config::default();
        config.general.proc_root = root.path().to_path_buf();
        let err = App::new(&config).err().unwrap();
        assert!(format!("{err:#}").contains("topology"));
    }

    #[test]
    fn startup_fails_without_counters() {
        let root = FixtureRoot::new();
        root.remove("stat");
        let mut config = Config::default();
        config.general.proc_root = root.path().to_path_buf();
        let err = App::new(&config).err().unwrap();
        assert!(format!("{err:#}").contains("CPU counters"));
    }

    #[test]
    fn dump_record_waits_for_steady_sample() {
        let root = FixtureRoot::new();
        let mut app = make_test_app(&root);
        assert!(app.dump_record().is_none());

        root.write("stat", STAT_T1);
        app.refresh_data();
        let json = serde_json::to_string(&app.dump_record().unwrap()).unwrap();
        assert!(json.starts_with("{\"cycle\":1,"));
        assert!(json.contains("\"per_thread\":[100.0,50.0]"));
        assert!(json.contains("\"used_physical_kb\":6000"));
    }

    #[test]
    fn keybinds_map_to_actions() {
        let root = FixtureRoot::new();
        let mut app = make_test_app(&root);

        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Refresh);
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);

        app.keybinds.quit = KeyCode::Char('x');
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Quit);
        app.dispatch(Action::Quit);
        assert!(!app.running);
    }

    #[test]
    fn anchors_are_clamped() {
        let layout = LayoutConfig {
            cpu_row: -1.0,
            cpu_col: 2.0,
            mem_row: f32::NAN,
            mem_col: 0.5,
        };
        let anchors = PanelAnchors::from_config(&layout);
        assert_eq!(anchors.cpu, (0.0, 1.0));
        assert_eq!(anchors.memory, (0.0, 0.5));
    }
}
