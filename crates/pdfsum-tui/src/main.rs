use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;

use pdfsum_core::{Config, HttpApi, SummaryApi, Transition};

mod action;
mod app;
mod backend;
mod input;
mod logging;
mod theme;
mod tui_event;
mod view;

use app::App;
use tui_event::BackendCommand;

/// Interactive terminal client for the PDF summarization service.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// PDF to load into the upload form
    file: Option<PathBuf>,

    /// Backend base URL (overrides PDFSUM_URL and the config file)
    #[arg(long)]
    url: Option<String>,

    /// Color theme: default or mono
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Resolve config from CLI flags > env vars > config file > defaults
    let mut config = Config::load()?;
    if let Some(url) = args.url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    config.validate()?;

    let _log_guard = logging::init()?;
    tracing::info!(base_url = %config.base_url, "starting");

    let api: Arc<dyn SummaryApi> = Arc::new(HttpApi::from_config(&config)?);
    let theme = theme::Theme::from_name(args.theme.as_deref().or(config.theme.as_deref()));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(config.default_mode.clone(), config.upload_limit(), theme);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<BackendCommand>();
    app.backend_cmd_tx = Some(cmd_tx);

    let settings = backend::BackendSettings {
        limit: config.upload_limit(),
        poll: config.poll_config(),
        download_dir: config.download_dir.clone(),
    };
    tokio::spawn(backend::run(api, settings, cmd_rx, event_tx));

    app.apply([Transition::ListLoading]);
    app.send(BackendCommand::LoadLibrary);
    if let Some(path) = args.file {
        app.path_input = path.display().to_string();
        app.send(BackendCommand::OpenFile(path));
    }

    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            Some(backend_event) = event_rx.recv() => {
                app.handle_backend_event(backend_event);
                // Drain any additional queued backend events
                while let Ok(evt) = event_rx.try_recv() {
                    app.handle_backend_event(evt);
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let action = input::map_event(&evt, &app.input_mode);
                        app.update(action);
                    }
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    tracing::info!("exiting");

    Ok(())
}
