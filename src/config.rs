use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    fn set(&mut self, value: T, source: ConfigSource) {
        self.value = value;
        self.source = source;
    }
}

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_PAGE_INCREMENT: usize = 20;
pub const DEFAULT_LOAD_MORE_DELAY_MS: u64 = 300;
pub const DEFAULT_DISPLAY_DATE_FORMAT: &str = "%Y年%-m月%-d日";

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the dish document
    pub data_dir: ConfigValue<PathBuf>,
    /// Dishes shown before any "load more"
    pub page_size: ConfigValue<usize>,
    /// Dishes revealed by each "load more"
    pub page_increment: ConfigValue<usize>,
    /// Delay before a "load more" reveal, in milliseconds
    pub load_more_delay_ms: ConfigValue<u64>,
    /// strftime format for dates shown on screen (not used in share payloads)
    pub display_date_format: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    page_size: Option<usize>,
    page_increment: Option<usize>,
    load_more_delay_ms: Option<u64>,
    display_date_format: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut page_size = ConfigValue::new(DEFAULT_PAGE_SIZE, ConfigSource::Default);
        let mut page_increment = ConfigValue::new(DEFAULT_PAGE_INCREMENT, ConfigSource::Default);
        let mut load_more_delay_ms =
            ConfigValue::new(DEFAULT_LOAD_MORE_DELAY_MS, ConfigSource::Default);
        let mut display_date_format = ConfigValue::new(
            DEFAULT_DISPLAY_DATE_FORMAT.to_string(),
            ConfigSource::Default,
        );
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir.set(resolved, ConfigSource::File);
            }
            if let Some(size) = file_config.page_size {
                page_size.set(size, ConfigSource::File);
            }
            if let Some(increment) = file_config.page_increment {
                page_increment.set(increment, ConfigSource::File);
            }
            if let Some(delay) = file_config.load_more_delay_ms {
                load_more_delay_ms.set(delay, ConfigSource::File);
            }
            if let Some(format) = file_config.display_date_format {
                display_date_format.set(format, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("CASEORDER_DATA_DIR") {
            data_dir.set(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Some(size) = env_number("CASEORDER_PAGE_SIZE")? {
            page_size.set(size, ConfigSource::Environment);
        }
        if let Some(increment) = env_number("CASEORDER_PAGE_INCREMENT")? {
            page_increment.set(increment, ConfigSource::Environment);
        }
        if let Some(delay) = env_number("CASEORDER_LOAD_MORE_DELAY_MS")? {
            load_more_delay_ms.set(delay, ConfigSource::Environment);
        }
        if let Ok(format) = std::env::var("CASEORDER_DISPLAY_DATE_FORMAT") {
            display_date_format.set(format, ConfigSource::Environment);
        }

        if !is_valid_date_format(&display_date_format.value) {
            return Err(ConfigError::InvalidDateFormat(display_date_format.value));
        }

        Ok(Self {
            data_dir,
            page_size,
            page_increment,
            load_more_delay_ms,
            display_date_format,
            config_file,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/caseorder/
    /// - macOS: ~/Library/Application Support/caseorder/
    /// - Windows: %APPDATA%/caseorder/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("caseorder")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/caseorder/
    /// - macOS: ~/Library/Application Support/caseorder/
    /// - Windows: %APPDATA%/caseorder/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("caseorder")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn env_number<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvValue(name.to_string(), raw)),
        Err(_) => Ok(None),
    }
}

fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidEnvValue(String, String),
    InvalidDateFormat(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidEnvValue(name, value) => {
                write!(f, "Invalid value '{}' for {}: expected a number", value, name)
            }
            ConfigError::InvalidDateFormat(format) => {
                write!(f, "Invalid display_date_format '{}'", format)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
