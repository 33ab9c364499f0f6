use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const BASE_URL_ENV: &str = "TIMECHART_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Client-side configuration. Today that is just where the service lives.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads `~/.timechart/config.json` when present, falling back to the
    /// default. The `TIMECHART_API_URL` environment variable wins over both.
    pub fn load(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match base_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?
                .join(".timechart"),
        };
        let path = dir.join(CONFIG_FILE_NAME);

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        if let Ok(url) = env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                config.base_url = url;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("timechart_config_{}_{tag}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_falls_back_to_the_default() {
        let dir = scratch_dir("missing");
        let config = ClientConfig::load(Some(dir)).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn file_contents_are_honored() {
        let dir = scratch_dir("file");
        fs::write(
            dir.join(CONFIG_FILE_NAME),
            r#"{"base_url":"http://example.com:9000"}"#,
        )
        .unwrap();
        let config = ClientConfig::load(Some(dir)).unwrap();
        assert_eq!(config.base_url, "http://example.com:9000");
    }
}
