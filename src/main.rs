use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use procmon::app::App;
use procmon::config::{self, load_config, load_config_from_path};
use procmon::event::{Event, EventHandler};
use procmon::{logging, ui};

#[derive(Parser)]
#[command(name = "procmon", about = "Live CPU and memory dashboard for the terminal")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Directory holding cpuinfo, stat and meminfo
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print N samples as JSON lines instead of opening the dashboard.
    #[arg(long, value_name = "N")]
    dump: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if let Some(samples) = cli.dump {
        return run_dump(&config, samples);
    }

    logging::init_tracing(&config.logging)?;

    // Topology and counters are checked before the terminal is taken over so
    // a startup failure prints normally.
    let app = App::new(&config)?;

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, app).await;

    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, mut app: App) -> Result<()> {
    let tick_rate = Duration::from_millis(app.refresh_ms.max(1));
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    let action = app.map_key(key);
                    app.dispatch(action);
                }
                Event::Tick => app.refresh_data(),
                Event::Resize => {}
            }
            if app.running {
                terminal.draw(|frame| ui::draw(frame, &app))?;
            }
        } else {
            break;
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref root) = cli.proc_root {
        config.general.proc_root = root.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.logging.file = Some(file.clone());
    }

    config
}

/// Headless sampling: primes, then prints one JSON object per steady cycle.
fn run_dump(config: &config::Config, samples: u64) -> Result<()> {
    if samples == 0 {
        return Err(eyre!("--dump must be greater than 0"));
    }
    logging::init_stderr_tracing(&config.logging)?;

    let mut app = App::new(config)?;
    let interval = Duration::from_millis(config.general.refresh_rate_ms);

    for _ in 0..samples {
        std::thread::sleep(interval);
        app.refresh_data();
        if let Some(err) = &app.cpu.error {
            return Err(eyre!("cpu sampling failed: {err}"));
        }
        if let Some(record) = app.dump_record() {
            println!("{}", serde_json::to_string(&record)?);
        }
    }

    Ok(())
}
