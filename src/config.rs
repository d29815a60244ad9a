use crate::scale::{Palette, Rgb};
use crate::scene::Renderer;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_PATH_ENV_VAR: &str = "WORKHEAT_CONFIG";

/// Container width used for SVG output when none is given on the command line
const DEFAULT_SVG_WIDTH: u16 = 960;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Bucket colors from fewest to most workshops
    pub(crate) palette: Palette,
    /// Fill of days without any workshops
    pub(crate) empty_fill: Rgb,
    /// Stroke color of month outlines
    pub(crate) outline: Rgb,
    pub(crate) svg_width: u16,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            palette: Palette::default(),
            empty_fill: Rgb::new(0xee, 0xee, 0xee),
            outline: Rgb::new(0, 0, 0),
            svg_width: DEFAULT_SVG_WIDTH,
        }
    }
}

impl Config {
    /// Loads the configuration from `path` if given, otherwise from the file
    /// named by `$WORKHEAT_CONFIG`.  With neither, the defaults are used.
    pub(crate) fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match env::var_os(CONFIG_PATH_ENV_VAR) {
                Some(p) => PathBuf::from(p),
                None => {
                    log::debug!("No configuration file given; using defaults");
                    return Ok(Config::default());
                }
            },
        };
        log::info!("Loading configuration from {}", path.display());
        let src = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Config::parse(&src).map_err(|source| ConfigError::Parse { path, source })
    }

    pub(crate) fn parse(src: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(src)
    }

    pub(crate) fn renderer(&self) -> Renderer {
        Renderer {
            palette: self.palette,
            empty_fill: self.empty_fill,
            outline_color: self.outline,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration file {}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_full_config() {
        let cfg = Config::parse(
            r##"
palette = ["#fff", "#eee", "#ddd", "#ccc", "#bbb", "#aaa", "#999", "#888"]
empty_fill = "#ffffff"
outline = "#333"
svg_width = 1200
"##,
        )
        .unwrap();
        assert_eq!(cfg.palette.colors().first(), Some(&Rgb::new(0xff, 0xff, 0xff)));
        assert_eq!(cfg.palette.colors().last(), Some(&Rgb::new(0x88, 0x88, 0x88)));
        assert_eq!(cfg.empty_fill, Rgb::new(0xff, 0xff, 0xff));
        assert_eq!(cfg.outline, Rgb::new(0x33, 0x33, 0x33));
        assert_eq!(cfg.svg_width, 1200);
    }

    #[test]
    fn test_partial_config() {
        let cfg = Config::parse("outline = \"#123456\"\n").unwrap();
        assert_eq!(cfg.outline, Rgb::new(0x12, 0x34, 0x56));
        assert_eq!(cfg.palette, Palette::default());
        assert_eq!(cfg.svg_width, DEFAULT_SVG_WIDTH);
    }

    #[test]
    fn test_palette_must_have_eight_colors() {
        assert!(Config::parse(r##"palette = ["#fff", "#000"]"##).is_err());
    }

    #[test]
    fn test_bad_color() {
        assert!(Config::parse("empty_fill = \"grey\"\n").is_err());
    }

    #[test]
    fn test_unknown_key() {
        assert!(Config::parse("cell_size = 12\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let r = Config::load(Some(Path::new("/nonexistent/workheat.toml")));
        assert!(matches!(r, Err(ConfigError::Read { .. })));
    }
}
