use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// TOML file configuration. Every field is optional; missing fields fall
/// back to the values supplied by the embedding process.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub db_dir: Option<String>,
    pub chart_size: Option<usize>,
    pub default_currency: Option<String>,
    pub stats_retention_days: Option<u32>,
    pub read_pool_size: Option<usize>,
}

impl FileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "db_dir = \"/data\"\nchart_size = 20").unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.db_dir.as_deref(), Some("/data"));
        assert_eq!(config.chart_size, Some(20));
        assert!(config.default_currency.is_none());
    }

    #[test]
    fn rejects_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "db_dir = \"/data\"\nnot_a_field = 1").unwrap();

        assert!(FileConfig::load(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(FileConfig::load("/definitely/not/here.toml").is_err());
    }
}
