use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEventKind;

use proctop::app::App;
use proctop::config::{self, Config, load_config, load_config_from_path};
use proctop::event::{Event, EventHandler};
use proctop::system::{Collector, SortMode, rank_snapshot};
use proctop::{logging, ui};

#[derive(Parser)]
#[command(name = "proctop", about = "Live, sortable process table with kill support")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Initial sort: pid, cpu, memory
    #[arg(long)]
    sort: Option<String>,

    /// Write diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print one ranked snapshot as JSON and exit.
    #[arg(long, default_value_t = false)]
    dump: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli)?;
    logging::init(&config.logging)?;

    if cli.dump {
        return dump_snapshot(&config);
    }

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config).await;

    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: Config) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms());
    let mut app = App::new(config);
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        let should_draw = match event {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    let action = app.map_key(key);
                    app.dispatch(action);
                    true
                } else {
                    false
                }
            }
            Event::Tick => {
                app.refresh_data();
                true
            }
            Event::Resize => {
                app.on_resize();
                true
            }
        };
        if should_draw {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
        }
    }

    tracing::info!("exiting");
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        if rate < config::MIN_REFRESH_RATE_MS {
            return Err(eyre!(
                "--refresh-rate must be at least {} ms",
                config::MIN_REFRESH_RATE_MS
            ));
        }
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref sort) = cli.sort {
        if !matches!(sort.to_lowercase().as_str(), "pid" | "cpu" | "memory") {
            return Err(eyre!("--sort must be one of: pid, cpu, memory"));
        }
        config.general.default_sort = sort.clone();
    }
    if let Some(ref path) = cli.log_file {
        config.logging.file = path.display().to_string();
    }

    Ok(config)
}

fn dump_snapshot(config: &Config) -> Result<()> {
    let collector = Collector::new().with_command_width(config.general.command_width);
    let mode = SortMode::from_str_config(&config.general.default_sort);
    let snapshot = rank_snapshot(collector.refresh(), mode);

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &snapshot)?;
    writeln!(stdout)?;
    Ok(())
}
