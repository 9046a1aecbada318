//! File-based config discovery
//!
//! Settings are layered with figment: built-in defaults, then `fob.toml`,
//! then `FOB_`-prefixed environment variables.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use crate::error::{ConfigError, Result};
use crate::settings::BuildSettings;

/// Name of the configuration file looked up in the project root.
pub const CONFIG_FILE: &str = "fob.toml";

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "FOB_";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use fob_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let settings = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find `fob.toml` in the root directory
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        toml_path.is_file().then_some(toml_path)
    }

    /// Layered figment: defaults ← `fob.toml` (if present) ← `FOB_*` env.
    pub fn figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(BuildSettings::default()));
        if let Some(path) = self.find() {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load settings from `fob.toml`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if there is no config file.
    pub fn load(&self) -> Result<BuildSettings> {
        if self.find().is_none() {
            return Err(ConfigError::NotFound(self.root.clone()));
        }
        self.load_or_default()
    }

    /// Load settings, using defaults when no config file exists.
    pub fn load_or_default(&self) -> Result<BuildSettings> {
        let settings: BuildSettings = self.figment().extract()?;
        Ok(settings)
    }
}

/// Discover and load settings from the current directory (convenience function)
pub fn discover() -> Result<BuildSettings> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        let discovery = ConfigDiscovery::new(dir.path());
        assert!(discovery.find().is_none());
    }

    #[test]
    fn load_returns_not_found_when_no_config() {
        let dir = TempDir::new().unwrap();
        let result = ConfigDiscovery::new(dir.path()).load();
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn find_discovers_toml_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "entries = [\"in.js\"]\n").unwrap();

        let discovery = ConfigDiscovery::new(dir.path());
        assert_eq!(discovery.find().unwrap(), config_path);
    }
}
