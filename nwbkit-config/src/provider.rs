//! Configuration provider using Figment

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, info};

use crate::discovery::{ConfigFile, ConfigFormat, FileDiscovery};
use crate::error::{ConfigError, ConfigResult};
use crate::types::ConstructionConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "NWBKIT_";

/// Builds a [`ConstructionConfig`] from layered sources.
///
/// Nothing is cached; every load reads the sources again.
#[derive(Debug, Default)]
pub struct ConfigProvider;

impl ConfigProvider {
    pub fn new() -> Self {
        Self
    }

    /// Load from defaults, files discovered in `dir`, and the environment.
    pub fn load_in(&self, dir: &Path) -> ConfigResult<ConstructionConfig> {
        let mut figment = self.defaults();
        for file in FileDiscovery::new(dir).discover_all() {
            figment = figment.merge(self.file(&file));
        }
        self.extract(figment.merge(self.env()))
    }

    /// Load from defaults, one explicit file, and the environment.
    pub fn load_from(&self, path: &Path) -> ConfigResult<ConstructionConfig> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let file = ConfigFile {
            path: path.to_path_buf(),
            format,
        };
        self.extract(self.defaults().merge(self.file(&file)).merge(self.env()))
    }

    fn defaults(&self) -> Figment {
        Figment::from(Serialized::defaults(ConstructionConfig::default()))
    }

    fn file(&self, file: &ConfigFile) -> Figment {
        debug!(path = %file.path.display(), format = ?file.format, "loading configuration file");
        match file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(&file.path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(&file.path)),
            ConfigFormat::Json => Figment::from(Json::file(&file.path)),
        }
    }

    fn env(&self) -> Figment {
        Figment::from(Env::prefixed(ENV_PREFIX))
    }

    fn extract(&self, figment: Figment) -> ConfigResult<ConstructionConfig> {
        let config: ConstructionConfig = figment.extract()?;
        info!(
            timing_conflict = ?config.timing_conflict,
            verify_link_paths = config.verify_link_paths,
            "construction configuration loaded"
        );
        Ok(config)
    }
}

impl ConstructionConfig {
    /// Load from defaults, files in the working directory, and the
    /// environment.
    pub fn load() -> ConfigResult<Self> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
        ConfigProvider::new().load_in(&cwd)
    }

    /// Load from defaults, `path`, and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        ConfigProvider::new().load_from(path.as_ref())
    }
}
