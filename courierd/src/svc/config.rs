use std::path::{Path, PathBuf};

use homedir::my_home;
use rst_common::with_logging::log::debug;

use crate::errors::CourierdError;

const COURIER_DIR: &str = ".courier";
const CONFIG_FILE: &str = "config.toml";

/// `resolve_config` returns the given config file, or `~/.courier/config.toml` when none is given
pub fn resolve_config(config: Option<String>) -> Result<String, CourierdError> {
    if let Some(file) = config {
        return Ok(file);
    }

    let home = my_home()
        .map_err(|err| CourierdError::HomeDirError(err.to_string()))?
        .ok_or(CourierdError::HomeDirError(
            "unknown home directory path".to_string(),
        ))?;

    let file = default_config(&home);
    debug!("[config:resolve] using default config: {}", file.display());
    Ok(file.display().to_string())
}

fn default_config(home: &Path) -> PathBuf {
    home.join(COURIER_DIR).join(CONFIG_FILE)
}
