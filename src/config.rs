//! Widget and application configuration.
//!
//! [`WidgetConfig`] is the widget's constructor input and uses the same
//! camelCase keys a host page would pass. [`AppConfig`] wraps it for the
//! binary, layered from defaults, an optional file, `ORBIT_` environment
//! variables, and CLI flags.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Default header title.
pub const DEFAULT_CHAT_TITLE: &str = "Orbit Support";
/// Default accent color.
pub const DEFAULT_PRIMARY_COLOR: &str = "#0284c7";
/// Default first bot message.
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hello! How can Orbit help you today?";

/// Config file picked up from the working directory when none is given.
const CWD_CONFIG_FILE: &str = "orbit.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE", global = true)]
    pub config: Option<String>,

    /// Webhook URL messages are posted to
    #[arg(long, env = "WEBHOOK_URL", global = true)]
    pub webhook_url: Option<String>,

    /// Local storage file (session id persistence)
    #[arg(long, env = "STORAGE_PATH", global = true)]
    pub storage_path: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve a preview host page and a demo echo webhook
    Serve {
        /// Port to listen on
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// Chat with the webhook from the terminal
    Chat,
    /// Print the widget host markup
    Render,
}

/// Widget constructor input.
///
/// Serialized with camelCase keys; the snake_case aliases are what the
/// layered [`AppConfig`] sources produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Endpoint every message is posted to.
    #[serde(alias = "webhook_url")]
    pub webhook_url: String,
    /// Launcher image; a built-in icon is used when absent.
    #[serde(default, alias = "logo_url")]
    pub logo_url: Option<String>,
    /// Header image; the title text is used when absent.
    #[serde(default, alias = "header_logo_url")]
    pub header_logo_url: Option<String>,
    #[serde(default = "default_chat_title", alias = "chat_title")]
    pub chat_title: String,
    #[serde(default = "default_primary_color", alias = "primary_color")]
    pub primary_color: String,
    #[serde(default = "default_welcome_message", alias = "welcome_message")]
    pub welcome_message: String,
}

fn default_chat_title() -> String {
    DEFAULT_CHAT_TITLE.to_string()
}
fn default_primary_color() -> String {
    DEFAULT_PRIMARY_COLOR.to_string()
}
fn default_welcome_message() -> String {
    DEFAULT_WELCOME_MESSAGE.to_string()
}

impl WidgetConfig {
    /// Config with defaults for everything but the webhook.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            logo_url: None,
            header_logo_url: None,
            chat_title: default_chat_title(),
            primary_color: default_primary_color(),
            welcome_message: default_welcome_message(),
        }
    }

    #[must_use]
    pub fn with_logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_header_logo_url(mut self, url: impl Into<String>) -> Self {
        self.header_logo_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_chat_title(mut self, title: impl Into<String>) -> Self {
        self.chat_title = title.into();
        self
    }

    #[must_use]
    pub fn with_primary_color(mut self, color: impl Into<String>) -> Self {
        self.primary_color = color.into();
        self
    }

    #[must_use]
    pub fn with_welcome_message(mut self, message: impl Into<String>) -> Self {
        self.welcome_message = message.into();
        self
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub widget: WidgetConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl AppConfig {
    pub fn load() -> Result<(Self, Option<Command>), config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<(Self, Option<Command>), config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        // 1. Defaults. The webhook defaults to the preview server's echo route.
        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("widget.webhook_url", "http://127.0.0.1:3000/webhook/echo")?
            .set_default("storage.path", ".orbit/local-storage.json")?;

        // 2. Config file: explicit path, else ./orbit.yaml when present.
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::with_name(CWD_CONFIG_FILE));
        }

        // 3. Environment, e.g. ORBIT_SERVER__PORT=8000 or ORBIT_WIDGET__CHAT_TITLE=Help
        builder = builder.add_source(
            Environment::with_prefix("ORBIT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (clap also folds in their plain env vars).
        if let Some(url) = &cli.webhook_url {
            builder = builder.set_override("widget.webhook_url", url.as_str())?;
        }
        if let Some(path) = &cli.storage_path {
            builder = builder.set_override("storage.path", path.as_str())?;
        }
        if let Some(Command::Serve { port: Some(port) }) = &cli.command {
            builder = builder.set_override("server.port", i64::from(*port))?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        Ok((cfg, cli.command))
    }
}
