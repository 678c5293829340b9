use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot open config {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Text and assets shown on the simulator screen, plus an optional fixed seed.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub page_title: String,
    pub subtitle: String,
    pub previous_title: String,
    pub current_title: String,
    pub stat_name: String,
    pub stat_value: u32,
    pub badge: String,
    pub button: String,
    pub image: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_title: "Potential Reset".to_string(),
            subtitle: "Your potential has changed.".to_string(),
            previous_title: "Previous Potential".to_string(),
            current_title: "New Potential".to_string(),
            stat_name: "Extra-Base Hit Suppression".to_string(),
            stat_value: 10,
            badge: "SR+! Congratulations.".to_string(),
            button: "Reroll".to_string(),
            image: Some(PathBuf::from("potential.png")),
            seed: None,
        }
    }
}

impl Config {
    /// Read the config at `path`. When the file does not exist and was not `required`, the
    /// defaults are used.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let fd = match OpenOptions::new().read(true).open(path) {
            Ok(fd) => fd,
            Err(e) if !required && e.kind() == io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Open {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let conf = serde_json::from_reader(BufReader::new(fd)).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(conf)
    }
}
