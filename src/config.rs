//! Configuration loading and management
//!
//! Handles parsing of the optional `config.toml` in the platform config
//! directory (for example `~/.config/thingsctl/config.toml` on Linux and
//! `~/Library/Application Support/thingsctl/config.toml` on macOS).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const CONFIG_FILENAME: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Scripting bridge configuration
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Skill installer configuration
    #[serde(default)]
    pub skills: SkillsConfig,
}

/// Scripting bridge configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Application (and process) name to address
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// AppleScript interpreter binary
    #[serde(default = "default_osascript")]
    pub osascript: PathBuf,

    /// Check that the application is running before each script
    #[serde(default = "default_true")]
    pub probe: bool,
}

fn default_app_name() -> String {
    "Things3".to_string()
}

fn default_osascript() -> PathBuf {
    PathBuf::from("osascript")
}

fn default_true() -> bool {
    true
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            osascript: default_osascript(),
            probe: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Emit JSON unless told otherwise
    #[serde(default)]
    pub json: bool,
}

/// Skill installer configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillsConfig {
    /// Destination directory for `skill install`
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or the default one when it exists.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::InvalidConfig(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Platform config file location, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "thingsctl")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    fn validate(&self) -> Result<()> {
        if self.bridge.app_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "bridge.app_name cannot be empty".to_string(),
            ));
        }
        if self.bridge.osascript.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "bridge.osascript cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_target_things3() {
        let cfg = Config::default();
        assert_eq!(cfg.bridge.app_name, "Things3");
        assert_eq!(cfg.bridge.osascript, PathBuf::from("osascript"));
        assert!(cfg.bridge.probe);
        assert!(!cfg.output.json);
        assert!(cfg.skills.dir.is_none());
    }

    #[test]
    fn load_reads_all_sections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let content = r#"
[bridge]
app_name = "Things"
osascript = "/usr/bin/osascript"
probe = false

[output]
json = true

[skills]
dir = "/tmp/skills"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.bridge.app_name, "Things");
        assert_eq!(cfg.bridge.osascript, PathBuf::from("/usr/bin/osascript"));
        assert!(!cfg.bridge.probe);
        assert!(cfg.output.json);
        assert_eq!(cfg.skills.dir, Some(PathBuf::from("/tmp/skills")));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\njson = true\n").expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.bridge.app_name, "Things3");
        assert!(cfg.bridge.probe);
        assert!(cfg.output.json);
    }

    #[test]
    fn empty_app_name_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[bridge]\napp_name = \" \"\n").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::load_or_default(Some(&dir.path().join("missing.toml")))
            .expect_err("missing config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
