use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stencil_syntax::{NestingSequences, ParseOptions};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Parser settings as stored in `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub design_time: bool,
    pub text_tag_name: String,
    pub script_tag_name: String,
    pub html_script_type: String,
    pub void_elements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nesting: Option<NestingConfig>,
}

/// Sequences bounding a nested markup region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestingConfig {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl Default for Config {
    fn default() -> Self {
        let options = ParseOptions::default();
        Self {
            design_time: options.design_time,
            text_tag_name: options.text_tag_name,
            script_tag_name: options.script_tag_name,
            html_script_type: options.html_script_type,
            void_elements: options.void_elements,
            nesting: None,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/stencil");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The parse options these settings describe.
    pub fn to_options(&self) -> ParseOptions {
        ParseOptions {
            design_time: self.design_time,
            text_tag_name: self.text_tag_name.clone(),
            script_tag_name: self.script_tag_name.clone(),
            html_script_type: self.html_script_type.clone(),
            void_elements: self.void_elements.clone(),
        }
    }

    pub fn nesting_sequences(&self) -> Option<NestingSequences> {
        self.nesting.as_ref().map(|nesting| {
            NestingSequences::new(nesting.start.as_str(), nesting.end.as_str())
                .case_sensitive(nesting.case_sensitive)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/stencil/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.to_options(), ParseOptions::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config_content = r#"
design_time = true
void_elements = ["br", "hr"]

[nesting]
start = "{"
end = "}"
"#;

        let config: Config = toml::from_str(config_content).unwrap();
        let options = config.to_options();

        assert!(options.design_time);
        assert_eq!(options.text_tag_name, "text");
        assert!(options.is_void_element("HR"));
        assert!(!options.is_void_element("img"));
        assert_eq!(
            config.nesting_sequences(),
            Some(NestingSequences::new("{", "}"))
        );
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "design_time = \"yes\"").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let test_config = Config {
            script_tag_name: "template".to_string(),
            nesting: Some(NestingConfig {
                start: "BEGIN".to_string(),
                end: "END".to_string(),
                case_sensitive: true,
            }),
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
