use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub mod api;
pub mod config_file;
pub mod flows;
pub mod model;
pub mod normalize;
pub mod notice;
pub mod poll;
pub mod session;
pub mod state;
pub mod upload;

// Re-export for convenience
pub use api::{ApiError, SummaryApi, http::HttpApi};
pub use model::{
    DocumentDetail, DocumentListItem, DownloadFormat, HistoryEntry, Mode, SummaryRecord,
    SummaryStatus,
};
pub use notice::Notice;
pub use poll::{PollConfig, PollEvent, PollOutcome};
pub use session::Session;
pub use state::{SelectionToken, Transition, View, ViewState};
pub use upload::{UploadFile, ValidationError};

/// Backend address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Upload ceiling enforced client-side before any request is sent.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 10;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    /// Timeout applied to every individual request.
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub poll_max_attempts: u32,
    pub max_upload_mb: u64,
    pub default_mode: Mode,
    /// Where downloaded artifacts are written.
    pub download_dir: PathBuf,
    /// Colour theme name for the terminal UI.
    pub theme: Option<String>,
}

impl Config {
    /// Defaults, overlaid by the config file cascade, overlaid by `PDFSUM_*`
    /// environment variables. Command-line flags are applied by the caller.
    pub fn load() -> Result<Self, ClientError> {
        let mut config = Self::default();
        config.apply_file(&config_file::load_config());
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `PDFSUM_URL`, `PDFSUM_TIMEOUT` and `PDFSUM_DOWNLOAD_DIR`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ClientError> {
        if let Some(url) = var("PDFSUM_URL") {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = var("PDFSUM_TIMEOUT") {
            self.request_timeout_secs = secs.trim().parse().map_err(|_| {
                ClientError::Config(format!(
                    "PDFSUM_TIMEOUT must be a number of seconds, got {secs:?}"
                ))
            })?;
        }
        if let Some(dir) = var("PDFSUM_DOWNLOAD_DIR") {
            self.download_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Reject values the client cannot work with.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.poll_max_attempts == 0 {
            return Err(ClientError::Config(
                "polling.max_attempts must be at least 1".into(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.poll_max_attempts,
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.upload_limit().bytes()
    }

    pub fn upload_limit(&self) -> flows::UploadLimit {
        flows::UploadLimit {
            max_mb: self.max_upload_mb,
        }
    }

    /// Apply values from an on-disk config file over the current values.
    pub fn apply_file(&mut self, file: &config_file::ConfigFile) {
        if let Some(server) = &file.server {
            if let Some(url) = &server.base_url {
                self.base_url = url.trim_end_matches('/').to_string();
            }
            if let Some(secs) = server.timeout_secs {
                self.request_timeout_secs = secs;
            }
        }
        if let Some(polling) = &file.polling {
            if let Some(ms) = polling.interval_ms {
                self.poll_interval_ms = ms;
            }
            if let Some(n) = polling.max_attempts {
                self.poll_max_attempts = n;
            }
        }
        if let Some(upload) = &file.upload {
            if let Some(mb) = upload.max_size_mb {
                self.max_upload_mb = mb;
            }
            if let Some(mode) = &upload.default_mode {
                self.default_mode = Mode::from(mode.as_str());
            }
        }
        if let Some(dir) = file.downloads.as_ref().and_then(|d| d.dir.as_ref()) {
            self.download_dir = PathBuf::from(dir);
        }
        if let Some(theme) = file.display.as_ref().and_then(|d| d.theme.as_ref()) {
            self.theme = Some(theme.clone());
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            poll_interval_ms: 1000,
            poll_max_attempts: 30,
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
            default_mode: Mode::Detailed,
            download_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            theme: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::{ConfigFile, PollingConfig, ServerConfig, UploadConfig};

    #[test]
    fn defaults_match_backend_contract() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_upload_bytes(), 10 * 1024 * 1024);
        let poll = config.poll_config();
        assert_eq!(poll.interval, Duration::from_secs(1));
        assert_eq!(poll.max_attempts, 30);
    }

    #[test]
    fn apply_file_overrides_only_present_fields() {
        let mut config = Config::default();
        let file = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("http://summaries.internal:9000/".into()),
                timeout_secs: None,
            }),
            polling: Some(PollingConfig {
                interval_ms: Some(250),
                max_attempts: None,
            }),
            upload: Some(UploadConfig {
                max_size_mb: None,
                default_mode: Some("bullet".into()),
            }),
            ..ConfigFile::default()
        };

        config.apply_file(&file);

        assert_eq!(config.base_url, "http://summaries.internal:9000");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.poll_max_attempts, 30);
        assert_eq!(config.default_mode, Mode::Bullet);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        config.base_url = "http://from-file:8080".into();
        config
            .apply_env(|key| match key {
                "PDFSUM_URL" => Some("http://from-env:9090/".into()),
                "PDFSUM_TIMEOUT" => Some("5".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.base_url, "http://from-env:9090");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let mut config = Config::default();
        let err = config
            .apply_env(|key| (key == "PDFSUM_TIMEOUT").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn validate_rejects_zero_attempts_and_bare_hosts() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.poll_max_attempts = 0;
        assert!(config.validate().is_err());
        config.poll_max_attempts = 30;
        config.base_url = "localhost:8080".into();
        assert!(config.validate().is_err());
    }
}
