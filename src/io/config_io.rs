use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::model::config::DeckConfig;

/// Config file looked for in the working directory.
pub const CONFIG_FILE: &str = "deck.toml";
/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "DECK_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid site address '{url}': {source}")]
    BadUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Read and parse a config file.
pub fn read_config(path: &Path) -> Result<DeckConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Which config file applies: the explicit path, then `$DECK_CONFIG`,
/// then `./deck.toml` if it exists.
pub fn locate_config(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let local = cwd.join(CONFIG_FILE);
    local.is_file().then_some(local)
}

/// Load the applicable config, falling back to defaults when none exists.
pub fn load_config(explicit: Option<&Path>) -> Result<DeckConfig, ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match locate_config(explicit, &cwd) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            read_config(&path)
        }
        None => Ok(DeckConfig::default()),
    }
}

/// Address of the post list page, unless `override_url` is given.
pub fn page_address(config: &DeckConfig, override_url: Option<&str>) -> Result<Url, ConfigError> {
    let bad = |url: &str, source| ConfigError::BadUrl {
        url: url.to_string(),
        source,
    };
    if let Some(raw) = override_url {
        return Url::parse(raw).map_err(|e| bad(raw, e));
    }
    let base = Url::parse(&config.site.base_url).map_err(|e| bad(&config.site.base_url, e))?;
    base.join(&config.site.list_path)
        .map_err(|e| bad(&config.site.list_path, e))
}
