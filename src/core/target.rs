use crate::config;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fixed environment variable names read from the CI secret store.
pub const ENV_HOST: &str = "DEPLOY_HOST";
pub const ENV_PORT: &str = "DEPLOY_PORT";
pub const ENV_USER: &str = "DEPLOY_USER";
pub const ENV_KEY: &str = "DEPLOY_KEY";
pub const ENV_PATH: &str = "DEPLOY_PATH";
pub const ENV_REMOTE: &str = "DEPLOY_REMOTE";
pub const ENV_BRANCH: &str = "DEPLOY_BRANCH";
pub const ENV_RESTART_CMD: &str = "RESTART_CMD";

pub const ALL_ENV_VARS: [&str; 8] = [
    ENV_HOST,
    ENV_PORT,
    ENV_USER,
    ENV_KEY,
    ENV_PATH,
    ENV_REMOTE,
    ENV_BRANCH,
    ENV_RESTART_CMD,
];

/// A deploy target: one remote checkout reachable over SSH.
///
/// Saved targets hold the non-secret coordinates; key material always comes
/// from the environment (`DEPLOY_KEY`) or an identity file path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(skip_deserializing, default)]
    pub id: String,
    pub host: String,
    pub user: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Absolute path to the checkout on the remote host.
    pub path: String,
    #[serde(default = "default_remote")]
    pub remote: String,
    pub branch: String,
    #[serde(default)]
    pub restart_cmd: Option<String>,
    #[serde(default)]
    pub identity_file: Option<String>,
}

fn default_port() -> u16 {
    22
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Target {
    /// Build a target entirely from the fixed environment variable names.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Same as [`Target::from_env`] with an injectable variable lookup.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String> {
            match lookup(name) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(Error::config_missing_key(name, None)
                    .with_hint("Export it in the CI job's environment from the secret store")),
            }
        };

        let port = match lookup(ENV_PORT) {
            Some(raw) if !raw.trim().is_empty() => parse_port(&raw)?,
            _ => default_port(),
        };

        let remote = match lookup(ENV_REMOTE) {
            Some(v) if !v.trim().is_empty() => v,
            _ => default_remote(),
        };

        let restart_cmd = lookup(ENV_RESTART_CMD).filter(|v| !v.trim().is_empty());

        Ok(Self {
            id: String::new(),
            host: require(ENV_HOST)?,
            user: require(ENV_USER)?,
            port,
            path: require(ENV_PATH)?,
            remote,
            branch: require(ENV_BRANCH)?,
            restart_cmd,
            identity_file: None,
        })
    }

    /// Overlay environment values onto a saved target. Set variables win;
    /// unset variables leave the saved value alone.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = set(ENV_HOST) {
            self.host = host;
        }
        if let Some(user) = set(ENV_USER) {
            self.user = user;
        }
        if let Some(raw) = set(ENV_PORT) {
            self.port = parse_port(&raw)?;
        }
        if let Some(path) = set(ENV_PATH) {
            self.path = path;
        }
        if let Some(remote) = set(ENV_REMOTE) {
            self.remote = remote;
        }
        if let Some(branch) = set(ENV_BRANCH) {
            self.branch = branch;
        }
        if let Some(restart) = set(ENV_RESTART_CMD) {
            self.restart_cmd = Some(restart);
        }

        Ok(())
    }

    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.host.is_empty() {
            missing.push("host".to_string());
        }
        if self.user.is_empty() {
            missing.push("user".to_string());
        }
        if self.path.is_empty() {
            missing.push("path".to_string());
        }
        if self.branch.is_empty() {
            missing.push("branch".to_string());
        }
        missing
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// The checkout path must be absolute: the remote chain starts with
    /// `cd <path>` from whatever directory sshd hands us, so a relative
    /// path would resolve against the login directory instead of failing.
    pub fn validate_path(&self) -> Result<()> {
        // An empty path is a missing field, reported by missing_fields().
        if self.path.is_empty() || self.path.starts_with('/') {
            return Ok(());
        }

        Err(Error::config_invalid_value(
            "path",
            Some(self.path.clone()),
            "must be an absolute path on the remote host",
        ))
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim().parse::<u16>().map_err(|_| {
        Error::config_invalid_value(
            ENV_PORT,
            Some(raw.to_string()),
            "must be a port number (1-65535)",
        )
    })
}

// ============================================================================
// Core CRUD - Thin wrappers around config module
// ============================================================================

pub fn load(id: &str) -> Result<Target> {
    config::load(id)
}

pub fn list() -> Result<Vec<Target>> {
    config::list()
}

pub fn save(target: &Target) -> Result<()> {
    config::save(target)
}

pub fn delete(id: &str) -> Result<()> {
    config::delete(id)
}

pub fn exists(id: &str) -> bool {
    config::exists(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            (ENV_HOST, "deploy.example.com"),
            (ENV_PORT, "2222"),
            (ENV_USER, "deploy"),
            (ENV_PATH, "/var/www/app"),
            (ENV_REMOTE, "origin"),
            (ENV_BRANCH, "main"),
            (ENV_RESTART_CMD, "systemctl restart app"),
        ])
    }

    #[test]
    fn from_env_full_set() {
        let vars = full_env();
        let target = Target::from_env_with(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(target.host, "deploy.example.com");
        assert_eq!(target.port, 2222);
        assert_eq!(target.user, "deploy");
        assert_eq!(target.path, "/var/www/app");
        assert_eq!(target.remote, "origin");
        assert_eq!(target.branch, "main");
        assert_eq!(target.restart_cmd.as_deref(), Some("systemctl restart app"));
        assert!(target.is_valid());
    }

    #[test]
    fn from_env_defaults() {
        let mut vars = full_env();
        vars.remove(ENV_PORT);
        vars.remove(ENV_REMOTE);
        vars.remove(ENV_RESTART_CMD);

        let target = Target::from_env_with(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(target.port, 22);
        assert_eq!(target.remote, "origin");
        assert!(target.restart_cmd.is_none());
    }

    #[test]
    fn from_env_missing_host() {
        let mut vars = full_env();
        vars.remove(ENV_HOST);

        let err = Target::from_env_with(|k| vars.get(k).cloned()).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigMissingKey);
    }

    #[test]
    fn from_env_blank_value_counts_as_missing() {
        let mut vars = full_env();
        vars.insert(ENV_BRANCH.to_string(), "  ".to_string());

        let err = Target::from_env_with(|k| vars.get(k).cloned()).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigMissingKey);
    }

    #[test]
    fn from_env_bad_port() {
        let mut vars = full_env();
        vars.insert(ENV_PORT.to_string(), "not-a-port".to_string());

        let err = Target::from_env_with(|k| vars.get(k).cloned()).unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigInvalidValue);
    }

    #[test]
    fn env_overrides_saved_target() {
        let mut target = Target {
            id: "prod".to_string(),
            host: "old.example.com".to_string(),
            user: "deploy".to_string(),
            port: 22,
            path: "/srv/app".to_string(),
            remote: "origin".to_string(),
            branch: "main".to_string(),
            restart_cmd: None,
            identity_file: None,
        };

        let vars = env(&[(ENV_HOST, "new.example.com"), (ENV_BRANCH, "release")]);
        target.apply_env_overrides(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(target.host, "new.example.com");
        assert_eq!(target.branch, "release");
        assert_eq!(target.user, "deploy");
        assert_eq!(target.path, "/srv/app");
    }

    #[test]
    fn missing_fields_reported() {
        let target = Target {
            id: String::new(),
            host: String::new(),
            user: "deploy".to_string(),
            port: 22,
            path: String::new(),
            remote: "origin".to_string(),
            branch: "main".to_string(),
            restart_cmd: None,
            identity_file: None,
        };

        assert_eq!(target.missing_fields(), vec!["host", "path"]);
        assert!(!target.is_valid());
    }

    #[test]
    fn relative_checkout_path_fails_validation() {
        let mut target = Target::from_env_with(|k| full_env().get(k).cloned()).unwrap();
        assert!(target.validate_path().is_ok());

        target.path = "var/www/app".to_string();
        let err = target.validate_path().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ConfigInvalidValue);

        // Emptiness is a separate missing-field condition, not a path error.
        target.path = String::new();
        assert!(target.validate_path().is_ok());
        assert!(target.missing_fields().contains(&"path".to_string()));
    }
}
