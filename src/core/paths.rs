use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base dockhand config directory (universal ~/.config/dockhand/ on all platforms)
pub fn dockhand() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("dockhand"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("dockhand"))
    }
}

/// Targets directory
pub fn targets() -> Result<PathBuf> {
    Ok(dockhand()?.join("targets"))
}

/// Keys directory
pub fn keys() -> Result<PathBuf> {
    Ok(dockhand()?.join("keys"))
}

/// Target config file path
pub fn target(id: &str) -> Result<PathBuf> {
    Ok(targets()?.join(format!("{}.json", id)))
}

/// Key file path for a target's injected key material
pub fn key(target_id: &str) -> Result<PathBuf> {
    Ok(keys()?.join(format!("{}.pem", target_id)))
}
