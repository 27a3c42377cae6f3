mod app;
mod handler;
mod tui;
mod ui;

use std::fs::OpenOptions;

use anyhow::Result;
use clap::Parser;
use finn_core::Config;
use tracing_appender::non_blocking;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use app::App;
use tui::EventHandler;

/// Finn, the GenAI Sports shopping assistant, in your terminal
#[derive(Parser)]
#[command(name = "finn")]
#[command(version, about)]
struct Cli {
    /// Chat backend base URL (overrides config and FINN_BACKEND_URL)
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Write debug-level logs
    #[arg(long)]
    debug: bool,
}

/// Route tracing output to `<config_dir>/finn/log/finn-tui.log`. The terminal
/// belongs to the TUI, so nothing is written to stderr.
fn init_logging(debug: bool) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = Config::config_dir()?.join("log");
    std::fs::create_dir_all(&log_dir)?;

    let mut log_file_opts = OpenOptions::new();
    log_file_opts.create(true).append(true);

    // Parse failures log full reply content
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        log_file_opts.mode(0o600);
    }

    let log_file = log_file_opts.open(log_dir.join("finn-tui.log"))?;
    let (non_blocking, guard) = non_blocking(log_file);

    let default_filter = if debug {
        "finn_core=debug,finn_tui=debug"
    } else {
        "finn_core=info,finn_tui=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(file_layer).try_init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(cli.debug)?;

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not load config, using defaults");
        Config::default()
    });

    let mut app = App::new(&config, cli.backend_url.as_deref());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let tx = events.sender();

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            let Some(event) = events.next().await else {
                break;
            };
            handler::handle_event(&mut app, event, &tx);

            // Drain whatever else is queued so a burst of chunks costs one redraw
            while let Some(event) = events.try_next() {
                handler::handle_event(&mut app, event, &tx);
                if app.should_quit {
                    break;
                }
            }
        }
        Ok::<_, anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    tracing::info!("exiting");
    result
}
