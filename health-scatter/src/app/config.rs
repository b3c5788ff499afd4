use app_core::string_error::ErrorStringExt;
use std::{
    io::Read,
    path::{Path, PathBuf},
};

const CONFIG_FILE_NAME: &str = ".health_scatter";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// CSV file the chart is built from.
    pub data_path: PathBuf,
    /// File name suggested by the SVG export dialog.
    pub svg_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("assets/data/data.csv"),
            svg_file_name: "scatter.svg".to_string(),
        }
    }
}

impl Config {
    pub fn from_config_file() -> Result<Self, String> {
        #[allow(deprecated)]
        let Some(home) = std::env::home_dir() else {
            return Err("could not determine home directory to load config file".into());
        };
        Self::from_path(&home.join(CONFIG_FILE_NAME))
    }

    pub fn from_path(path: &Path) -> Result<Self, String> {
        let config_raw = {
            let mut file = std::fs::File::open(path)
                .err_to_string(&format!("could not open config file {:?}", path))?;
            let mut buf = String::new();
            file.read_to_string(&mut buf)
                .err_to_string("could not load config file")?;
            buf
        };
        Ok(Self::parse(&config_raw))
    }

    /// Read `key=value` lines on top of the defaults.
    pub fn parse(config_raw: &str) -> Self {
        let mut config = Self::default();
        for line in config_raw.lines() {
            let line = line.trim();
            // Lines starting with "#" are considered comments.
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                log::warn!("ignoring config line without '=': {line}");
                continue;
            };
            match (key.trim(), val.trim()) {
                ("data_path", "") => log::warn!("'data_path' is empty, keeping default"),
                ("data_path", path) => config.data_path = PathBuf::from(path),
                ("svg_file_name", "") => log::warn!("'svg_file_name' is empty, keeping default"),
                ("svg_file_name", name) => config.svg_file_name = name.to_string(),
                _ => continue,
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let _ = env_logger::builder().is_test(true).try_init();
        let raw = "# comment\n\
data_path = /tmp/states.csv\n\
unknown=1\n\
not a pair\n\
svg_file_name=\n";
        let config = Config::parse(raw);
        assert_eq!(config.data_path, PathBuf::from("/tmp/states.csv"));
        assert_eq!(config.svg_file_name, "scatter.svg");
    }

    #[test]
    fn test_parse_empty_gives_defaults() {
        assert_eq!(Config::parse(""), Config::default());
    }

    #[test]
    fn test_from_path() {
        let _ = env_logger::builder().is_test(true).try_init();
        let path = std::env::temp_dir().join("health_scatter_test_config");
        std::fs::write(&path, "svg_file_name = states.svg\n").unwrap();
        let config = Config::from_path(&path);
        let _ = std::fs::remove_file(&path);

        let config = config.unwrap();
        assert_eq!(config.svg_file_name, "states.svg");
        assert_eq!(config.data_path, Config::default().data_path);
    }

    #[test]
    fn test_from_missing_path_fails() {
        let path = std::env::temp_dir().join("health_scatter_no_such_config");
        let err = Config::from_path(&path).unwrap_err();
        assert!(err.contains("could not open config file"), "{err}");
    }
}
