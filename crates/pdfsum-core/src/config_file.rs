use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub polling: Option<PollingConfig>,
    pub upload: Option<UploadConfig>,
    pub downloads: Option<DownloadsConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollingConfig {
    pub interval_ms: Option<u64>,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_size_mb: Option<u64>,
    pub default_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadsConfig {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

/// Platform config directory path: `<config_dir>/pdfsum/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdfsum").join("config.toml"))
}

/// Load config by cascading CWD `.pdfsum.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdfsum.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

fn pick<T: Clone>(overlay: Option<&T>, base: Option<&T>) -> Option<T> {
    overlay.or(base).cloned()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bs, os) = (base.server.as_ref(), overlay.server.as_ref());
    let (bp, op) = (base.polling.as_ref(), overlay.polling.as_ref());
    let (bu, ou) = (base.upload.as_ref(), overlay.upload.as_ref());
    let (bd, od) = (base.downloads.as_ref(), overlay.downloads.as_ref());
    let (bv, ov) = (base.display.as_ref(), overlay.display.as_ref());

    ConfigFile {
        server: Some(ServerConfig {
            base_url: pick(
                os.and_then(|s| s.base_url.as_ref()),
                bs.and_then(|s| s.base_url.as_ref()),
            ),
            timeout_secs: pick(
                os.and_then(|s| s.timeout_secs.as_ref()),
                bs.and_then(|s| s.timeout_secs.as_ref()),
            ),
        }),
        polling: Some(PollingConfig {
            interval_ms: pick(
                op.and_then(|p| p.interval_ms.as_ref()),
                bp.and_then(|p| p.interval_ms.as_ref()),
            ),
            max_attempts: pick(
                op.and_then(|p| p.max_attempts.as_ref()),
                bp.and_then(|p| p.max_attempts.as_ref()),
            ),
        }),
        upload: Some(UploadConfig {
            max_size_mb: pick(
                ou.and_then(|u| u.max_size_mb.as_ref()),
                bu.and_then(|u| u.max_size_mb.as_ref()),
            ),
            default_mode: pick(
                ou.and_then(|u| u.default_mode.as_ref()),
                bu.and_then(|u| u.default_mode.as_ref()),
            ),
        }),
        downloads: Some(DownloadsConfig {
            dir: pick(
                od.and_then(|d| d.dir.as_ref()),
                bd.and_then(|d| d.dir.as_ref()),
            ),
        }),
        display: Some(DisplayConfig {
            theme: pick(
                ov.and_then(|d| d.theme.as_ref()),
                bv.and_then(|d| d.theme.as_ref()),
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_parses() {
        let toml_str = "[server]\nbase_url = \"http://10.0.0.5:8080\"\n\n[polling]\nmax_attempts = 60\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(
            parsed.server.unwrap().base_url.as_deref(),
            Some("http://10.0.0.5:8080")
        );
        let polling = parsed.polling.unwrap();
        assert_eq!(polling.max_attempts, Some(60));
        assert!(polling.interval_ms.is_none());
        assert!(parsed.upload.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("http://base:8080".to_string()),
                timeout_secs: Some(5),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("http://overlay:8080".to_string()),
                timeout_secs: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let server = merged.server.unwrap();
        assert_eq!(server.base_url.as_deref(), Some("http://overlay:8080"));
        assert_eq!(server.timeout_secs, Some(5));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            downloads: Some(DownloadsConfig {
                dir: Some("/srv/summaries".to_string()),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.downloads.unwrap().dir.as_deref(), Some("/srv/summaries"));
    }

    #[test]
    fn load_from_path_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server = [[[").unwrap();
        assert!(load_from_path(&path).is_none());
        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());
    }
}
