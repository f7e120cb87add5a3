use crate::facade::DEFAULT_PAGE_SIZE;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub csv: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            csv: PathBuf::from("settlements.csv"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
            preview_rows: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub page_size: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "Failed to parse TOML configuration")?;
        if config.report.page_size == 0 {
            anyhow::bail!("report.page_size must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [input]
            csv = "data/russia.csv"

            [report]
            page_size = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.input.csv, PathBuf::from("data/russia.csv"));
        assert_eq!(config.report.page_size, 50);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn rejects_zero_page_size() {
        assert!(AppConfig::from_toml("[report]\npage_size = 0").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\ndir = \"out\"\npreview_rows = 3").unwrap();
        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.output.preview_rows, 3);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::load_from_file(Path::new("/nonexistent/settlements.toml")).is_err());
    }
}
