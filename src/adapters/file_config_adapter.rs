//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// No file: every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_uint(&self, section: &str, key: &str, default: u64) -> u64 {
        self.config
            .getuint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[journal]
storage_dir = /home/trader/journal
storage_key = mnqTrades

[export]
file_prefix = MNQ_Journal
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("journal", "storage_dir"),
            Some("/home/trader/journal".to_string())
        );
        assert_eq!(
            adapter.get_string("export", "file_prefix"),
            Some("MNQ_Journal".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[journal]\npoint_value = 2\n").unwrap();
        assert_eq!(adapter.get_string("journal", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_uint_returns_value() {
        let adapter = FileConfigAdapter::from_string("[metrics]\nequity_window = 45\n").unwrap();
        assert_eq!(adapter.get_uint("metrics", "equity_window", 30), 45);
    }

    #[test]
    fn get_uint_returns_default_for_missing_or_invalid() {
        let adapter = FileConfigAdapter::from_string("[metrics]\nstreak_window = abc\n").unwrap();
        assert_eq!(adapter.get_uint("metrics", "streak_window", 3), 3);
        assert_eq!(adapter.get_uint("metrics", "equity_window", 30), 30);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter = FileConfigAdapter::from_string("[journal]\npoint_value = 5.0\n").unwrap();
        assert_eq!(adapter.get_double("journal", "point_value", 2.0), 5.0);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[journal]\npoint_value = not_a_number\n").unwrap();
        assert_eq!(adapter.get_double("journal", "point_value", 2.0), 2.0);
    }

    #[test]
    fn empty_adapter_uses_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("journal", "storage_key"), None);
        assert_eq!(adapter.get_double("journal", "point_value", 2.0), 2.0);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[export]\noutput_dir = /tmp/exports\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("export", "output_dir"),
            Some("/tmp/exports".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/journal.ini");
        assert!(result.is_err());
    }
}
