use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{MonitorError, MonitorResult};
use crate::models::{Config, DEFAULT_REFRESH, check_refresh};

/// Name of the config file in the user's home directory
const CONFIG_FILE_NAME: &str = ".octoprint-st-rc";

/// Path to the default config file
pub fn default_config_path() -> MonitorResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or_else(|| MonitorError::Config("Failed to get home directory".to_string()))
}

/// Load and validate the configuration file
pub fn load_config(path: &Path) -> MonitorResult<Config> {
    let contents = fs::read_to_string(path).map_err(|e| {
        MonitorError::Config(format!(
            "Can not read the configuration file at {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut config: Config = serde_json::from_str(&contents)?;

    config.url = config.url.trim().trim_end_matches('/').to_string();
    if config.url.is_empty() {
        return Err(MonitorError::Config(format!(
            "No OctoPrint url configured in {}",
            path.display()
        )));
    }

    check_refresh(config.refresh).map_err(MonitorError::Config)?;

    if config.refresh.is_zero() {
        info!(
            refresh_secs = DEFAULT_REFRESH.as_secs(),
            "Using default refresh interval"
        );
    }

    debug!(path = %path.display(), url = %config.url, "Loaded configuration");
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &Config, path: &Path) -> MonitorResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        // create_dir_all is idempotent - no need to check existence first
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "Saved configuration");
    Ok(())
}
