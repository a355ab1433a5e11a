use serde::Deserialize;
use std::path::PathBuf;

use crate::style::Style;

fn default_width() -> u32 {
    512
}
fn default_height() -> u32 {
    512
}
fn default_style() -> Style {
    Style::Standard
}
fn default_verbose() -> bool {
    false
}

/// Settings loadable from a TOML file; command-line flags take precedence.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_style")]
    pub style: Style,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("stl2normalmap.toml"));
    paths.push(PathBuf::from(".stl2normalmap.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("stl2normalmap").join("config.toml"));
        paths.push(config_dir.join("stl2normalmap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".stl2normalmap.toml"));
        paths.push(
            home.join(".config")
                .join("stl2normalmap")
                .join("config.toml"),
        );
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
            input = "model.stl"
            output = "model.png"
            width = 1024
            height = 768
            style = "war-thunder"
            verbose = true
            "#,
        )
        .unwrap();

        assert_eq!(config.input, Some(PathBuf::from("model.stl")));
        assert_eq!(config.output, Some(PathBuf::from("model.png")));
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 768);
        assert_eq!(config.style, Style::WarThunder);
        assert!(config.verbose);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.input, None);
        assert_eq!(config.width, 512);
        assert_eq!(config.height, 512);
        assert_eq!(config.style, Style::Standard);
        assert!(!config.verbose);
    }
}
