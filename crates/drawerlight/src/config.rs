//! Configuration management for drawerlight.
//!
//! Where the component list lives, how to find and talk to the controller
//! board, and how the interactive screen behaves. Every value has a default,
//! so a missing config file is not an error.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the platform config and data dirs.
const DATA_DIR_NAME: &str = "drawerlight";

const DATA_FILE_NAME: &str = "komponenter.json";

/// Default log file name used by the interactive UI.
const LOG_FILE_NAME: &str = "drawerlight.log";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `DRAWERLIGHT_`, sections split on `__`)
/// 2. TOML config file at `~/.config/drawerlight/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Component store configuration.
    pub store: StoreConfig,
    /// Serial link configuration.
    pub serial: SerialConfig,
    /// Interactive UI configuration.
    pub ui: UiConfig,
}

/// Component store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the component file.
    /// Defaults to `~/.local/share/drawerlight/komponenter.json`
    pub data_file: Option<PathBuf>,
}

/// Serial link configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Use this port instead of scanning for one.
    pub port: Option<String>,
    /// Line speed.
    pub baud_rate: u32,
    /// Time to wait after opening a port for the board to reset.
    pub settle_delay_ms: u64,
    /// How long to wait for the ready token after the settle delay.
    pub handshake_timeout_ms: u64,
    /// Timeout of a single read while waiting for the handshake.
    pub read_timeout_ms: u64,
    /// Pause after every command written.
    pub send_delay_ms: u64,
    /// Line the board prints once it is ready for commands.
    pub ready_token: String,
    /// Regex patterns; a port is a candidate if its description matches any.
    pub port_patterns: Vec<String>,
}

/// Interactive UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Connect to the board when the UI starts.
    pub auto_connect: bool,
    /// How long each LED stays lit during the LED test.
    pub test_dwell_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: 9600,
            settle_delay_ms: 2000,
            handshake_timeout_ms: 5000,
            read_timeout_ms: 100,
            send_delay_ms: 50,
            ready_token: "ARDUINO_READY".to_string(),
            port_patterns: default_port_patterns(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            auto_connect: true,
            test_dwell_ms: 500,
        }
    }
}

/// Default patterns for recognizing a controller board's port.
fn default_port_patterns() -> Vec<String> {
    vec!["USB".to_string(), "Arduino".to_string()]
}

impl SerialConfig {
    /// Get the settle delay as a Duration.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Get the handshake timeout as a Duration.
    #[must_use]
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    /// Get the per-read timeout as a Duration.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Get the post-send delay as a Duration.
    #[must_use]
    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }
}

impl Config {
    /// Load from `config_path` (or the default file) and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or a value is invalid.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("DRAWERLIGHT_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// `config.toml` in the platform config directory.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// The platform data directory for drawerlight.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Reject settings the serial link cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.serial.baud_rate == 0 {
            return Err(Error::config_validation("baud_rate must be greater than 0"));
        }

        if self.serial.handshake_timeout_ms == 0 {
            return Err(Error::config_validation(
                "handshake_timeout_ms must be greater than 0",
            ));
        }

        if self.serial.ready_token.trim().is_empty() {
            return Err(Error::config_validation("ready_token must not be empty"));
        }

        for pattern in &self.serial.port_patterns {
            if regex::Regex::new(pattern).is_err() {
                return Err(Error::config_validation(format!(
                    "invalid regex pattern: {pattern}"
                )));
            }
        }

        Ok(())
    }

    /// Get the component file path, resolving defaults if not set.
    #[must_use]
    pub fn data_file(&self) -> PathBuf {
        self.store
            .data_file
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATA_FILE_NAME))
    }

    /// Get the log file path used while the interactive UI owns the terminal.
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        Self::default_data_dir().join(LOG_FILE_NAME)
    }

    /// Get the LED test dwell time as a Duration.
    #[must_use]
    pub fn test_dwell(&self) -> Duration {
        Duration::from_millis(self.ui.test_dwell_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.store.data_file.is_none());
        assert!(config.serial.port.is_none());
        assert!(config.ui.auto_connect);
    }

    #[test]
    fn test_default_serial_config() {
        let serial = SerialConfig::default();

        assert_eq!(serial.baud_rate, 9600);
        assert_eq!(serial.settle_delay(), Duration::from_secs(2));
        assert_eq!(serial.handshake_timeout(), Duration::from_secs(5));
        assert_eq!(serial.send_delay(), Duration::from_millis(50));
        assert_eq!(serial.ready_token, "ARDUINO_READY");
        assert_eq!(serial.port_patterns, vec!["USB", "Arduino"]);
    }

    #[test]
    fn test_default_ui_config() {
        let config = Config::default();
        assert_eq!(config.test_dwell(), Duration::from_millis(500));
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_baud() {
        let mut config = Config::default();
        config.serial.baud_rate = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("baud_rate"));
    }

    #[test]
    fn test_validate_zero_handshake_timeout() {
        let mut config = Config::default();
        config.serial.handshake_timeout_ms = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("handshake_timeout_ms"));
    }

    #[test]
    fn test_validate_empty_ready_token() {
        let mut config = Config::default();
        config.serial.ready_token = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("ready_token"));
    }

    #[test]
    fn test_validate_invalid_regex() {
        let mut config = Config::default();
        config.serial.port_patterns = vec!["[invalid".to_string()];

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid regex"));
    }

    #[test]
    fn test_data_file_default() {
        let config = Config::default();
        assert!(config
            .data_file()
            .to_string_lossy()
            .contains("komponenter.json"));
    }

    #[test]
    fn test_data_file_custom() {
        let mut config = Config::default();
        config.store.data_file = Some(PathBuf::from("/custom/parts.json"));

        assert_eq!(config.data_file(), PathBuf::from("/custom/parts.json"));
    }

    #[test]
    fn test_log_file_in_data_dir() {
        let config = Config::default();
        let path = config.log_file();
        assert!(path.starts_with(Config::default_data_dir()));
        assert!(path.to_string_lossy().ends_with("drawerlight.log"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("drawerlight"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[serial]\nport = \"/dev/ttyACM0\"\nbaud_rate = 115200\n\n[ui]\ntest_dwell_ms = 100\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();

        assert_eq!(config.serial.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.serial.ready_token, "ARDUINO_READY");
        assert_eq!(config.ui.test_dwell_ms, 100);
        assert!(config.ui.auto_connect);
    }

    #[test]
    fn test_load_invalid_toml_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[serial]\nbaud_rate = 0\n").unwrap();

        let result = Config::load_from(Some(path));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_serial_config_deserialize_partial() {
        let json = r#"{"baud_rate": 19200, "port_patterns": ["CH340"]}"#;
        let serial: SerialConfig = serde_json::from_str(json).unwrap();
        assert_eq!(serial.baud_rate, 19200);
        assert_eq!(serial.port_patterns, vec!["CH340"]);
        assert_eq!(serial.send_delay_ms, 50);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("ready_token"));
        assert!(json.contains("test_dwell_ms"));
    }
}
