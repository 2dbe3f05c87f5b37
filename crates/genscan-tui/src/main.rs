use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use genscan_core::{DetectionBackend, DetectionMode, HttpBackend, Session, SessionConfig};

mod action;
mod app;
mod input;
mod theme;
mod tui_event;
mod view;

use app::App;

const DEFAULT_FPS: u32 = 10;

/// genscan TUI: check images and text for AI-generated content.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Detection service URL (default: http://localhost:5042)
    #[arg(long)]
    url: Option<String>,

    /// Seconds between health probes
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Timeout for detection requests, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Write logs here instead of the cache directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Image to load on startup
    #[arg(long, conflicts_with = "text")]
    image: Option<PathBuf>,

    /// Text to load on startup (starts in text mode)
    #[arg(long)]
    text: Option<String>,
}

/// Route tracing output to a file; the terminal belongs to the UI.
fn init_logging(log_file: Option<PathBuf>) -> anyhow::Result<WorkerGuard> {
    let path = match log_file {
        Some(p) => p,
        None => dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("genscan")
            .join("genscan-tui.log"),
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "genscan-tui.log".into());
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging(args.log_file.clone())?;

    if let Some(path) = &args.image
        && !path.exists()
    {
        anyhow::bail!("Image file not found: {}", path.display());
    }

    // Resolve config from CLI flags > env vars > config file > defaults
    let file_config = genscan_core::config_file::load_config();
    let mut config = SessionConfig::from_file(&file_config);
    config.apply_env();
    if let Some(url) = &args.url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = args.poll_interval {
        config.poll_interval = Duration::from_secs(secs.max(1));
    }
    if let Some(secs) = args.timeout {
        config.request_timeout = Duration::from_secs(secs.max(1));
    }

    let display = file_config.display.unwrap_or_default();
    let theme_name = args
        .theme
        .or(display.theme)
        .unwrap_or_else(|| "hacker".to_string());
    let fps = display.fps.unwrap_or(DEFAULT_FPS).clamp(1, 60);
    let tick_rate = Duration::from_millis(1000 / u64::from(fps));

    tracing::info!(url = %config.base_url, theme = %theme_name, fps, "starting genscan-tui");

    let backend: Arc<dyn DetectionBackend> = Arc::new(HttpBackend::new(&config)?);
    let session = Session::start(backend.clone(), &config);
    let mut app = App::new(session, &theme_name);

    if let Some(path) = &args.image {
        app.load_image(path);
    }
    if let Some(text) = args.text {
        app.session.set_mode(DetectionMode::TextDetection);
        app.set_text(text);
    }

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<tui_event::BackendEvent>();
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    let cancel = CancellationToken::new();

    app.backend_cmd_tx = Some(cmd_tx);

    // Spawn backend command listener. Each submission runs on its own task so a
    // slow inference never blocks the next one.
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                tui_event::BackendCommand::Submit(prepared) => {
                    let backend = backend.clone();
                    let tx = event_tx.clone();
                    tokio::spawn(async move {
                        let outcome = prepared.dispatch(backend.as_ref()).await;
                        let _ = tx.send(tui_event::BackendEvent::SubmissionFinished(outcome));
                    });
                }
            }
        }
    });

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    // Main event loop
    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let action = input::map_event(&evt, &app.input_mode);
                    app.update(action);
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit || cancel.is_cancelled() {
            cancel.cancel();
            break;
        }
    }

    app.session.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    Ok(())
}
