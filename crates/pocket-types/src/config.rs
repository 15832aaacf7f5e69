//! Application configuration loaded from `pocket.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PocketError, Result};

/// Top-level runtime configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PocketConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub window_title: String,
    /// Integer scale applied to the 8x8 font.
    pub font_scale: u32,
    /// Directory the file browser starts in. Defaults to the executable's
    /// directory when unset.
    pub app_dir: Option<PathBuf>,
    /// Optional `UiStyle` TOML file.
    pub style_path: Option<PathBuf>,
}

impl Default for PocketConfig {
    fn default() -> Self {
        Self {
            screen_width: 960,
            screen_height: 544,
            window_title: "pocket".to_string(),
            font_scale: 2,
            app_dir: None,
            style_path: None,
        }
    }
}

impl PocketConfig {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn parse(text: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("loaded config from {}", path.display());
        Self::parse(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(PocketError::Config(format!(
                "screen size {}x{} is empty",
                self.screen_width, self.screen_height
            )));
        }
        if self.font_scale == 0 {
            return Err(PocketError::Config("font_scale must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = PocketConfig::parse("").unwrap();
        assert_eq!(cfg, PocketConfig::default());
        assert_eq!((cfg.screen_width, cfg.screen_height), (960, 544));
    }

    #[test]
    fn partial_document_overrides_fields() {
        let cfg = PocketConfig::parse(
            r#"
            screen_width = 480
            screen_height = 272
            font_scale = 1
            app_dir = "/ms0/PSP/GAME/demo"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.screen_width, 480);
        assert_eq!(cfg.font_scale, 1);
        assert_eq!(cfg.app_dir, Some(PathBuf::from("/ms0/PSP/GAME/demo")));
        assert_eq!(cfg.window_title, "pocket");
    }

    #[test]
    fn zero_scale_is_rejected() {
        let err = PocketConfig::parse("font_scale = 0").unwrap_err();
        assert!(matches!(err, PocketError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = PocketConfig::parse("screen_width = ").unwrap_err();
        assert!(matches!(err, PocketError::TomlParse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "window_title = \"demo\"").unwrap();
        let cfg = PocketConfig::load(file.path()).unwrap();
        assert_eq!(cfg.window_title, "demo");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PocketConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, PocketError::Io(_)));
    }
}
