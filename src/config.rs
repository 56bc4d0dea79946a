use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatboxConfig {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub chat: Chat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    #[serde(default = "default_server_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Max characters of file context attached to a message.
    #[serde(default = "default_context_limit")]
    pub context_limit: usize,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_context_limit() -> usize {
    crate::context::DEFAULT_CONTEXT_LIMIT
}

impl Default for Server {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Chat {
    fn default() -> Self {
        Self {
            context_limit: default_context_limit(),
        }
    }
}

impl Default for ChatboxConfig {
    fn default() -> Self {
        Self {
            server: Server::default(),
            chat: Chat::default(),
        }
    }
}

impl ChatboxConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs.max(1))
    }

    /// Apply environment overrides on top of file values.
    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("CHATBOX_SERVER_URL") {
            let url = url.trim();
            if !url.is_empty() {
                self.server.url = url.to_string();
            }
        }
        self
    }
}

/// Base directory for logs and preferences (`~/.chatbox`).
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".chatbox"))
        .unwrap_or_else(|| std::env::temp_dir().join("chatbox"))
}

fn parse(path: &Path) -> Option<ChatboxConfig> {
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<ChatboxConfig>(&content) {
            Ok(config) => {
                info!(
                    path = %path.display(),
                    server = %config.server.url,
                    "loaded chatbox config"
                );
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse config");
                None
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read config");
            None
        }
    }
}

/// Load the chatbox config file.
/// Search order:
///   1. CHATBOX_CONFIG env var
///   2. ~/.chatbox/config.toml
///   3. Default values
/// CHATBOX_SERVER_URL overrides the server URL in every case.
pub fn load() -> ChatboxConfig {
    let candidates = [
        std::env::var("CHATBOX_CONFIG").ok().map(PathBuf::from),
        Some(data_dir().join("config.toml")),
    ];

    for candidate in candidates.into_iter().flatten() {
        if candidate.exists() {
            if let Some(config) = parse(&candidate) {
                return config.with_env_overrides();
            }
        }
    }

    info!("no config file found, using defaults");
    ChatboxConfig::default().with_env_overrides()
}
