use crate::engine::config::EngineConfig;
use crate::engine::error::{EngineError, EngineResult};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default = "default_console_output")]
    pub console_output: bool,
    #[serde(default = "default_file_output")]
    pub file_output: bool,
    #[serde(default = "default_log_file_path")]
    pub file_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LogLevel::Info,
            console_output: default_console_output(),
            file_output: default_file_output(),
            file_path: default_log_file_path(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_console_output() -> bool {
    true
}

fn default_file_output() -> bool {
    false
}

fn default_log_file_path() -> String {
    // Use config directory + logs/dataforge.log
    match Config::get_config_directory() {
        Some(config_dir) => config_dir
            .join("logs")
            .join("dataforge.log")
            .to_string_lossy()
            .to_string(),
        None => "dataforge.log".to_string(),
    }
}

impl Config {
    /// Configuration directory, `~/.config/dataforge`
    pub fn get_config_directory() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".config").join("dataforge"))
    }

    /// Default location of the config file
    pub fn get_config_path() -> Option<PathBuf> {
        Self::get_config_directory().map(|dir| dir.join("config.toml"))
    }

    /// Load the config from the default location.
    ///
    /// A missing file yields the defaults. A file that cannot be read, parsed or
    /// validated is reported on stderr and the defaults are used instead.
    pub fn load() -> Self {
        let Some(config_path) = Self::get_config_path() else {
            return Config::default();
        };

        if !config_path.exists() {
            return Config::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e.user_message());
                eprintln!(
                    "Using default configuration. Fix or delete {} to silence this warning.",
                    config_path.display()
                );
                Config::default()
            }
        }
    }

    /// Load and validate a config file, failing on any problem
    pub fn load_from(path: &Path) -> EngineResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty TOML with each engine option preceded by its documentation comment
    pub fn to_documented_toml(&self) -> EngineResult<String> {
        let body = toml::to_string_pretty(self)
            .map_err(|e| EngineError::Configuration(format!("cannot serialize config: {e}")))?;
        let docs = EngineConfig::documentation();
        let doc_for = |key: &str| docs.iter().find(|(name, _)| *name == key).map(|(_, doc)| *doc);

        let mut content = String::new();
        content.push_str("# Dataforge configuration file\n");
        content.push_str("# Lines starting with '#' are comments.\n\n");

        let mut in_engine = false;
        for line in body.lines() {
            let trimmed = line.trim();
            let doc = if trimmed.starts_with('[') {
                in_engine = trimmed == "[engine]" || trimmed.starts_with("[engine.");
                match trimmed.strip_prefix("[engine.") {
                    Some(rest) => doc_for(rest.trim_end_matches(']')),
                    None => doc_for(trimmed),
                }
            } else if in_engine {
                trimmed.split_once(" =").and_then(|(key, _)| doc_for(key.trim()))
            } else {
                None
            };

            if let Some(doc) = doc {
                content.push_str(&format!("# {doc}\n"));
            }
            content.push_str(line);
            content.push('\n');
        }
        Ok(content)
    }

    /// Write the documented config, creating parent directories
    pub fn save_to(&self, path: &Path) -> EngineResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_documented_toml()?)?;
        Ok(())
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.engine.validate()?;
        if self.logging.file_output && self.logging.file_path.trim().is_empty() {
            return Err(EngineError::Configuration(
                "logging.file_path is required when file_output is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
