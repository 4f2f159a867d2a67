//! Configuration collaborator seam.
//!
//! Drivers fetch provider credentials (the API token) at reply time from a
//! [`ConfigProvider`]; they never generate or cache credentials themselves.

use std::collections::HashMap;
use std::path::Path;

/// Read-only key/value configuration source.
pub trait ConfigProvider: Send + Sync {
    /// Look up one configuration value.
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory provider, handy for hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    /// Provider over the given key/value pairs.
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Insert or replace one value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ConfigProvider for MapConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl FromIterator<(String, String)> for MapConfig {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Load a flat TOML table of string values into a [`MapConfig`].
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or
/// contains non-string values.
pub fn load_file_config(path: &Path) -> anyhow::Result<MapConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let table: toml::Table = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;

    let mut config = MapConfig::default();
    for (key, value) in table {
        match value {
            toml::Value::String(s) => config.set(key, s),
            other => anyhow::bail!(
                "config key {key} must be a string, got {}",
                other.type_str()
            ),
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn map_config_lookup() {
        let mut config = MapConfig::default();
        config.set("telegram_token", "tok-123");
        assert_eq!(config.get("telegram_token").as_deref(), Some("tok-123"));
        assert!(config.get("missing").is_none());
    }

    #[test]
    fn load_flat_toml_table() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "telegram_token = \"tok-abc\"").expect("write");
        let config = load_file_config(file.path()).expect("should load");
        assert_eq!(config.get("telegram_token").as_deref(), Some("tok-abc"));
    }

    #[test]
    fn non_string_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "retries = 3").expect("write");
        assert!(load_file_config(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_file_config(Path::new("/nonexistent/config.toml")).is_err());
    }
}
