// Configuration file loading

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::exclusion::LOOPBACK;

const CONFIG_DIR: &str = "ifreaper";
const CONFIG_FILE: &str = "config.json";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Interfaces never to disable, merged with `--exclude`
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Loopback interface name, always excluded
    #[serde(default = "default_loopback")]
    pub loopback: String,

    /// Preferred backend; `--backend` overrides it
    #[serde(default)]
    pub backend: Option<String>,
}

fn default_loopback() -> String {
    LOOPBACK.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            loopback: default_loopback(),
            backend: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine the user config directory"))?;
        Ok(config_dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location if `None`.
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = match Self::config_path() {
                    Ok(path) => path,
                    Err(e) => {
                        log::debug!("{e}, using defaults");
                        return Ok(Config::default());
                    }
                };
                if !path.exists() {
                    log::debug!("Config file not found, using defaults");
                    return Ok(Config::default());
                }
                path
            }
        };

        let contents =
            fs::read_to_string(&path).context(format!("Failed to read config file: {:?}", path))?;

        let config = Self::from_json(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Config exclusions plus the command-line list, as one comma-separated string
    pub fn merged_exclusions(&self, cli: Option<&str>) -> String {
        let mut parts: Vec<&str> = self.exclude.iter().map(String::as_str).collect();
        if let Some(cli) = cli {
            parts.push(cli);
        }
        parts.join(",")
    }
}
