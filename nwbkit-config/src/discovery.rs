//! Configuration file discovery
//!
//! Looks for `nwbkit.{toml,yaml,yml,json}` in one directory. Every file found
//! is merged, in that order.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

/// File stem searched for in the configuration directory
pub const CONFIG_STEM: &str = "nwbkit";

const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// A discovered configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
}

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// File discovery rooted at one directory
pub struct FileDiscovery {
    dir: PathBuf,
}

impl FileDiscovery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Discover configuration files in merge order.
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        debug!(dir = %self.dir.display(), "discovering configuration files");
        EXTENSIONS
            .iter()
            .filter_map(|ext| {
                let path = self.dir.join(format!("{CONFIG_STEM}.{ext}"));
                if !path.is_file() {
                    return None;
                }
                trace!(path = %path.display(), "found configuration file");
                ConfigFormat::from_extension(ext).map(|format| ConfigFile { path, format })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("yml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("a/nwbkit.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("ini"), None);
    }

    #[test]
    fn test_discovers_in_merge_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("nwbkit.json"), "{}").unwrap();
        fs::write(dir.path().join("nwbkit.toml"), "").unwrap();
        fs::write(dir.path().join("other.toml"), "").unwrap();

        let found = FileDiscovery::new(dir.path()).discover_all();
        let formats: Vec<_> = found.iter().map(|f| f.format).collect();
        assert_eq!(formats, [ConfigFormat::Toml, ConfigFormat::Json]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(FileDiscovery::new(dir.path()).discover_all().is_empty());
    }
}
