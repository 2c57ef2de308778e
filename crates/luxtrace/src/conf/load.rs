//! Load — config loading from file and environment variables.

use std::path::Path;
use std::str::FromStr;

use super::model::CaptureConfig;
use crate::error::{CaptureError, CaptureResult};
use crate::ingest::SessionKind;

pub const CONFIG_FILE_ENV: &str = "LUXTRACE_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "luxtrace.toml";

impl CaptureConfig {
    /// Load configuration.
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> CaptureResult<Self> {
        let config_path =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> CaptureResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CaptureError::Config(format!("cannot read {}: {}", path, e)))?;

        toml::from_str(&contents)
            .map_err(|e| CaptureError::Config(format!("invalid {}: {}", path, e)))
    }

    /// Apply `LUXTRACE_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> CaptureResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(session) = lookup("LUXTRACE_SESSION") {
            self.session = SessionKind::from_str(&session).map_err(CaptureError::Config)?;
        }
        if let Some(port) = lookup("LUXTRACE_PORT") {
            self.port = port;
        }
        if let Some(baud) = lookup("LUXTRACE_BAUD") {
            self.baud = parse_env("LUXTRACE_BAUD", &baud)?;
        }
        if let Some(window) = lookup("LUXTRACE_WINDOW") {
            self.window = parse_env("LUXTRACE_WINDOW", &window)?;
        }
        if let Some(sentinel) = lookup("LUXTRACE_SENTINEL") {
            self.sentinel_text = sentinel;
        }
        if let Some(dir) = lookup("LUXTRACE_OUTPUT_DIR") {
            self.output_dir = dir;
        }
        if let Some(target) = lookup("LUXTRACE_TARGET") {
            self.target = Some(parse_env("LUXTRACE_TARGET", &target)?);
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> CaptureResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CaptureError::Config(format!("{} has an invalid value: {:?}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_apply() {
        let mut cfg = CaptureConfig::default();
        cfg.apply_env_overrides(lookup(&[
            ("LUXTRACE_SESSION", "sweep_down"),
            ("LUXTRACE_PORT", "/dev/ttyUSB0"),
            ("LUXTRACE_BAUD", "9600"),
            ("LUXTRACE_WINDOW", "50"),
            ("LUXTRACE_TARGET", "450"),
        ]))
        .unwrap();

        assert_eq!(cfg.session, SessionKind::SweepDown);
        assert_eq!(cfg.port, "/dev/ttyUSB0");
        assert_eq!(cfg.baud, 9600);
        assert_eq!(cfg.window, 50);
        assert_eq!(cfg.target, Some(450.0));
    }

    #[test]
    fn test_no_overrides_keeps_values() {
        let mut cfg = CaptureConfig::default();
        cfg.apply_env_overrides(lookup(&[])).unwrap();
        assert_eq!(cfg.port, "COM6");
    }

    #[test]
    fn test_bad_numeric_override_is_config_error() {
        let mut cfg = CaptureConfig::default();
        let err = cfg
            .apply_env_overrides(lookup(&[("LUXTRACE_BAUD", "fast")]))
            .unwrap_err();
        assert!(matches!(err, CaptureError::Config(ref m) if m.contains("LUXTRACE_BAUD")));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("luxtrace.toml");
        std::fs::write(&path, "session = \"live\"\nwindow = 42\n").unwrap();

        let cfg = CaptureConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.session, SessionKind::Live);
        assert_eq!(cfg.window, 42);
    }

    #[test]
    fn test_from_file_reports_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("luxtrace.toml");
        std::fs::write(&path, "window = \"many\"").unwrap();

        let err = CaptureConfig::from_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CaptureError::Config(_)));
    }
}
