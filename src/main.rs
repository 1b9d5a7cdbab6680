//! Orbit chat widget binary.
//!
//! Entry point for the preview server, the terminal chat harness, and the
//! markup renderer.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use orbit_widget::config::{AppConfig, Command};
use orbit_widget::server;
use orbit_widget::session::FileStorage;
use orbit_widget::ui::TerminalMount;
use orbit_widget::widget::{ChatWidget, WidgetEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before reading config
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (config, command) = match AppConfig::load() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    let config = Arc::new(config);

    match command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { .. } => server::start_server(config).await,
        Command::Render => {
            let html = server::render_widget(&config.widget, false)
                .map_err(|(_, msg)| anyhow::anyhow!(msg))?;
            println!("{html}");
            Ok(())
        }
        Command::Chat => run_chat(&config).await,
    }
}

/// Terminal harness: each stdin line is typed into the input and sent with
/// Enter. `/toggle` toggles the panel, `/quit` exits.
async fn run_chat(config: &AppConfig) -> anyhow::Result<()> {
    let storage = FileStorage::new(&config.storage.path);
    let widget = ChatWidget::with_http(
        config.widget.clone(),
        &storage,
        Arc::new(TerminalMount::stdout()),
    )?;
    tracing::info!(session_id = %widget.session_id(), "Chat session ready");

    widget.handle_event(WidgetEvent::LauncherClick).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = line.trim().to_owned();
        match command.as_str() {
            "/quit" => break,
            "/toggle" => {
                widget.handle_event(WidgetEvent::LauncherClick).await;
            }
            _ => {
                widget.handle_event(WidgetEvent::Input(line)).await;
                widget
                    .handle_event(WidgetEvent::KeyPress("Enter".to_string()))
                    .await;
            }
        }
    }
    Ok(())
}
