use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use genscan_core::config_file::{self, ConfigFile, PollingConfig, ServerConfig};
use genscan_core::{
    DetectionBackend, HttpBackend, ImageFile, Notification, NotificationKind, Session,
    SessionConfig,
};

mod output;

use output::{ColorMode, JsonVerdict};

/// genscan - ask a detection service whether an image or text is AI-generated
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Detection service URL (default: http://localhost:5042)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Print the verdict as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the service once and print its state
    Health,

    /// Check an image file
    Image {
        /// Path to the image
        path: PathBuf,
    },

    /// Check a piece of text (`-` reads stdin)
    Text {
        /// Text to analyze
        text: String,
    },

    /// Show the resolved configuration
    Config {
        /// Write it to the platform config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let mut config = SessionConfig::from_file(&config_file::load_config());
    config.apply_env();
    if let Some(url) = &cli.url {
        config.base_url = url.trim_end_matches('/').to_string();
    }

    tracing::debug!(url = %config.base_url, "resolved config");

    let color = ColorMode(!cli.no_color && std::env::var_os("NO_COLOR").is_none());

    match cli.command {
        Command::Config { save } => show_config(&config, save),
        Command::Health => health(&config, color).await,
        Command::Image { path } => {
            let image = ImageFile::open(&path)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
            let mut session = connect(&config)?;
            session.wait_for_probe().await?;
            session.capture_image(Some(image));
            let notification = session.submit_image().await;
            finish(session, notification, cli.json, color).await
        }
        Command::Text { text } => {
            let text = if text == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                text
            };
            let mut session = connect(&config)?;
            session.wait_for_probe().await?;
            session.capture_text(text);
            let notification = session.submit_text().await;
            finish(session, notification, cli.json, color).await
        }
    }
}

fn connect(config: &SessionConfig) -> anyhow::Result<Session> {
    let backend: Arc<dyn DetectionBackend> = Arc::new(HttpBackend::new(config)?);
    Ok(Session::start(backend, config))
}

async fn health(config: &SessionConfig, color: ColorMode) -> anyhow::Result<ExitCode> {
    let mut session = connect(config)?;
    let state = session.wait_for_probe().await?;
    session.shutdown().await;

    let mut stdout = std::io::stdout().lock();
    output::print_health(&mut stdout, &config.base_url, state, color)?;
    Ok(if state == genscan_core::BackendHealth::Ready {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Print the outcome of a submission and pick the exit code.
async fn finish(
    mut session: Session,
    notification: Notification,
    json: bool,
    color: ColorMode,
) -> anyhow::Result<ExitCode> {
    session.shutdown().await;

    if notification.kind == NotificationKind::Error {
        let mut stderr = std::io::stderr().lock();
        output::print_error(&mut stderr, &notification.message, color)?;
        return Ok(ExitCode::FAILURE);
    }

    let mut stdout = std::io::stdout().lock();
    match (session.result_slot().result(), session.result_view()) {
        (Some(result), Some(view)) if json => {
            serde_json::to_writer_pretty(&mut stdout, &JsonVerdict::new(result, &view))?;
            writeln!(stdout)?;
        }
        (_, Some(view)) => output::print_result(&mut stdout, &view, color)?,
        _ => writeln!(stdout, "{}", notification.message)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn show_config(config: &SessionConfig, save: bool) -> anyhow::Result<ExitCode> {
    let file = ConfigFile {
        server: Some(ServerConfig {
            url: Some(config.base_url.clone()),
            request_timeout_secs: Some(config.request_timeout.as_secs()),
            health_timeout_secs: Some(config.health_timeout.as_secs()),
        }),
        polling: Some(PollingConfig {
            interval_secs: Some(config.poll_interval.as_secs()),
        }),
        // Keep the TUI display section as it is on disk
        display: config_file::load_config().display,
    };

    print!("{}", toml::to_string_pretty(&file)?);
    if save {
        let path = config_file::save_config(&file)?;
        eprintln!("Saved to {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
