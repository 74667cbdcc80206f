use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use pdfsum_core::notice::NoticeLevel;
use pdfsum_core::{
    Config, DownloadFormat, HttpApi, Mode, Notice, Session, SummaryApi, UploadFile, flows,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// Summarize PDFs with a running summarization backend
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL (overrides PDFSUM_URL and the config file)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log requests and poll attempts to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the text the backend extracts from a PDF, without storing it
    Preview {
        /// Path to the PDF
        file: PathBuf,
    },

    /// Upload a PDF and wait for its summary
    Submit {
        /// Path to the PDF
        file: PathBuf,

        /// Summary style: short, detailed or bullet
        #[arg(short, long)]
        mode: Option<String>,

        /// Delay between status checks, in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Maximum number of status checks
        #[arg(long)]
        attempts: Option<u32>,
    },

    /// List uploaded documents
    List,

    /// Show the latest summary of a document
    Show { id: String },

    /// Show every summary version of a document, newest first
    History { id: String },

    /// Generate a new summary version for a document
    Regenerate {
        id: String,

        /// Summary style: short, detailed or bullet
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Delete a document
    Delete {
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Download the rendered summary of a document
    Download {
        id: String,

        #[arg(short, long, value_enum, default_value_t = Format::Txt)]
        format: Format,

        /// Directory to save into (default: PDFSUM_DOWNLOAD_DIR, config, or Downloads)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Txt,
    Pdf,
}

impl From<Format> for DownloadFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Txt => DownloadFormat::Txt,
            Format::Pdf => DownloadFormat::Pdf,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(cli.url.clone(), cli.timeout)?;
    tracing::debug!(base_url = %config.base_url, timeout_secs = config.request_timeout_secs, "resolved config");

    let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());
    let mut out = std::io::stdout();

    match cli.command {
        Command::Preview { file } => preview(&config, &file, &mut out, color).await,
        Command::Submit {
            file,
            mode,
            interval_ms,
            attempts,
        } => {
            let mut config = config;
            if let Some(ms) = interval_ms {
                config.poll_interval_ms = ms;
            }
            if let Some(n) = attempts {
                config.poll_max_attempts = n;
            }
            config.validate()?;
            let mode = mode.as_deref().map(Mode::from);
            submit(&config, &file, mode, &mut out, color).await
        }
        Command::List => list(&config, &mut out, color).await,
        Command::Show { id } => show(&config, &id, false, &mut out, color).await,
        Command::History { id } => show(&config, &id, true, &mut out, color).await,
        Command::Regenerate { id, mode } => {
            let mode = mode
                .as_deref()
                .map(Mode::from)
                .unwrap_or_else(|| config.default_mode.clone());
            regenerate(&config, &id, &mode, &mut out, color).await
        }
        Command::Delete { id, yes } => delete(&config, &id, yes, &mut out, color).await,
        Command::Download { id, format, dir } => {
            let dir = dir.unwrap_or_else(|| config.download_dir.clone());
            download(&config, &id, format.into(), &dir, &mut out, color).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,pdfsum_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve configuration: CLI flags > env vars > config file > defaults.
fn resolve_config(url: Option<String>, timeout: Option<u64>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(url) = url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = timeout {
        config.request_timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

fn session(config: &Config) -> anyhow::Result<Session> {
    let api: Arc<dyn SummaryApi> = Arc::new(HttpApi::from_config(config)?);
    Ok(Session::new(api, config))
}

/// Print the pending notice. Error notices become the command's error.
fn finish(session: &mut Session, out: &mut dyn Write, color: ColorMode) -> anyhow::Result<()> {
    match session.take_notice() {
        Some(notice) if notice.level == NoticeLevel::Error => anyhow::bail!(notice.text),
        Some(notice) => {
            output::print_notice(out, &notice, color)?;
            Ok(())
        }
        None => Ok(()),
    }
}

/// Load a file, or surface why it was refused.
async fn choose(session: &mut Session, file: &Path) -> anyhow::Result<bool> {
    let upload = UploadFile::from_path(file)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {e}", file.display()))?;
    Ok(session.choose_file(upload).await)
}

async fn preview(
    config: &Config,
    file: &Path,
    out: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let mut session = session(config)?;
    if !choose(&mut session, file).await? {
        return finish(&mut session, out, color);
    }
    let state = session.state();
    let name = state
        .selected_file
        .as_ref()
        .map(|f| f.name.as_str())
        .unwrap_or_default();
    output::print_preview(out, name, state.preview.as_deref(), color)?;
    Ok(())
}

async fn submit(
    config: &Config,
    file: &Path,
    mode: Option<Mode>,
    out: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let mut session = session(config)?;
    if let Some(mode) = mode {
        session.set_mode(mode);
    }
    if !choose(&mut session, file).await? {
        return finish(&mut session, out, color);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")?);
    spinner.set_message(format!("Uploading ({} mode)", session.state().mode));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_clone.cancel();
        }
    });

    let resolved = session
        .submit(&cancel, |event| spinner.set_message(output::poll_message(&event)))
        .await;
    spinner.finish_and_clear();

    if resolved {
        output::print_summary(out, session.state(), color)?;
        if let Some(id) = session.state().selected_id.as_deref() {
            writeln!(out)?;
            writeln!(out, "Document ID: {id}")?;
        }
    }
    finish(&mut session, out, color)
}

async fn list(config: &Config, out: &mut dyn Write, color: ColorMode) -> anyhow::Result<()> {
    let mut session = session(config)?;
    if !session.refresh_library().await {
        anyhow::bail!("Could not load the document list from {}", config.base_url);
    }
    output::print_documents(out, &session.state().documents, color)?;
    Ok(())
}

async fn show(
    config: &Config,
    id: &str,
    history: bool,
    out: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let mut session = session(config)?;
    if !session.open(id).await {
        anyhow::bail!("Could not load document {id}");
    }
    if history {
        output::print_history(out, &session.state().history, color)?;
    } else {
        output::print_summary(out, session.state(), color)?;
    }
    Ok(())
}

async fn regenerate(
    config: &Config,
    id: &str,
    mode: &Mode,
    out: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let mut session = session(config)?;
    if session.regenerate(id, mode).await {
        output::print_summary(out, session.state(), color)?;
    }
    finish(&mut session, out, color)
}

async fn delete(
    config: &Config,
    id: &str,
    yes: bool,
    out: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let mut session = session(config)?;
    let deleted = session
        .delete(id, |question| yes || confirm(&format!("{question} ({id})")))
        .await;
    if deleted {
        output::print_notice(out, &Notice::info(format!("Deleted {id}")), color)?;
    }
    finish(&mut session, out, color)
}

fn confirm(question: &str) -> bool {
    eprint!("{question} [y/N] ");
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

async fn download(
    config: &Config,
    id: &str,
    format: DownloadFormat,
    dir: &Path,
    out: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<()> {
    let api = HttpApi::from_config(config)?;
    match flows::download(&api, Some(id), format, dir).await {
        Ok(path) => {
            output::print_notice(out, &Notice::info(format!("Saved {}", path.display())), color)?;
            Ok(())
        }
        Err(notice) => anyhow::bail!(notice.text),
    }
}
