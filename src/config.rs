use crate::error::{Result, TexpandError};
use crate::keyboard::parse_key_name;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const PID_FILENAME: &str = "texpand-daemon.pid";
pub const CONFIG_FILENAME: &str = "config.json";
pub const DICTIONARY_FILENAME: &str = "dictionary.txt";
pub const LOG_FILENAME: &str = "texpand.log";

/// Runtime configuration, loaded from `config.json` in the config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Named key that accepts the current suggestion (e.g. "f8", "tab").
    pub accept_key: String,
    /// Maximum number of trailing characters kept for matching.
    pub max_buffer: usize,
    pub replacement: ReplacementConfig,
    pub startup: StartupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplacementConfig {
    pub pre_backspace_delay_ms: u64,
    pub post_backspace_delay_ms: u64,
    pub per_character_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    pub print_banner: bool,
    pub print_dictionary_count: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            accept_key: "f8".to_string(),
            max_buffer: 32,
            replacement: ReplacementConfig::default(),
            startup: StartupConfig::default(),
        }
    }
}

impl Default for ReplacementConfig {
    fn default() -> Self {
        ReplacementConfig {
            pre_backspace_delay_ms: 50,
            post_backspace_delay_ms: 50,
            per_character_delay_ms: 0,
        }
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        StartupConfig {
            print_banner: true,
            print_dictionary_count: true,
        }
    }
}

impl Config {
    /// Reject configurations the daemon cannot safely start with.
    pub fn validate(&self) -> Result<()> {
        if self.max_buffer == 0 {
            return Err(TexpandError::Config(
                "max_buffer must be a positive integer".to_string(),
            ));
        }
        if parse_key_name(&self.accept_key).is_none() {
            return Err(TexpandError::Config(format!(
                "unknown accept_key '{}'",
                self.accept_key
            )));
        }
        Ok(())
    }
}

/// Get the texpand configuration directory
pub fn get_config_dir() -> PathBuf {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".texpand"))
        .unwrap_or_else(|_| PathBuf::from(".texpand"))
}

/// Get the path to the config file
pub fn get_config_file_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILENAME)
}

/// Get the path to the dictionary file
pub fn get_dictionary_file_path() -> PathBuf {
    get_config_dir().join(DICTIONARY_FILENAME)
}

/// Get the path to the PID file
pub fn get_pid_file_path() -> PathBuf {
    get_config_dir().join(PID_FILENAME)
}

/// Get the path to the daemon log file
pub fn get_log_file_path() -> PathBuf {
    get_config_dir().join(LOG_FILENAME)
}

/// Load and validate the configuration. A missing or malformed config file
/// is fatal at startup; `texpand init` writes a starter config.
pub fn load_config() -> Result<Config> {
    let path = get_config_file_path();
    if !path.exists() {
        return Err(TexpandError::Config(format!(
            "config file not found at {} (run `texpand init`)",
            path.display()
        )));
    }

    let content = fs::read_to_string(&path)?;
    let config: Config = serde_json::from_str(&content)
        .map_err(|e| TexpandError::Config(format!("failed to parse {}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory with a default config file and an empty
/// dictionary. Existing files are left untouched.
pub fn initialize() -> Result<PathBuf> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    let config_path = get_config_file_path();
    if !config_path.exists() {
        println!("Creating config file at: {}", config_path.display());
        let serialized = serde_json::to_string_pretty(&Config::default())?;
        fs::write(&config_path, serialized)?;
    }

    let dict_path = get_dictionary_file_path();
    if !dict_path.exists() {
        println!("Creating dictionary file at: {}", dict_path.display());
        fs::write(&dict_path, "# abbreviation=expansion, one per line\n")?;
    }

    Ok(config_dir)
}

/// Check if daemon is running
pub fn is_daemon_running() -> Result<Option<u32>> {
    let pid_file = get_pid_file_path();

    if !pid_file.exists() {
        return Ok(None);
    }

    let pid_str = fs::read_to_string(&pid_file)?;
    let pid = pid_str
        .trim()
        .parse::<u32>()
        .map_err(|_| TexpandError::InvalidPid)?;

    #[cfg(unix)]
    {
        let status = std::process::Command::new("kill")
            .arg("-0")
            .arg(pid.to_string())
            .status();

        if status.is_ok() && status.unwrap().success() {
            return Ok(Some(pid));
        }
        Ok(None)
    }

    // For non-Unix systems, assume it's running if PID file exists
    #[cfg(not(unix))]
    {
        Ok(Some(pid))
    }
}
