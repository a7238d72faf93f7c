use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub buffer: BufferConfig,

    #[serde(default)]
    pub driver: DriverConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Capacity used when `--capacity` is not given. Must be positive.
    pub default_capacity: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Abort a script at the first Full/Empty error instead of recording it and moving on.
    pub stop_on_error: bool,
    /// Prefix each printed result with the command that produced it.
    pub echo_commands: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// tracing filter directive used when RUST_LOG is unset: "error", "warn", "info", "debug", ...
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for BufferConfig {
    fn default() -> Self {
        Self { default_capacity: 3 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "warn".into() }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    /// Load from the per-user config file, falling back to defaults.
    ///
    /// A missing file is normal: defaults are written out (best-effort) and
    /// no error is returned. A file that exists but fails to parse or
    /// validate is left alone, and the reason comes back alongside the
    /// defaults so the caller can report it once logging is up.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        match Config::config_path() {
            Some(path) => load_at(&path),
            None       => (Config::default(), None),
        }
    }

    /// Load an explicit file. Unlike [`Config::load`], errors are reported
    /// and nothing is ever written.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path.display(), e))?;
        Self::parse(&text)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {:#}", path.display(), e))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(text)?;
        if cfg.buffer.default_capacity == 0 {
            anyhow::bail!("buffer.default_capacity must be positive");
        }
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("circbuf").join("circbuf.toml"))
    }
}

fn load_at(path: &Path) -> (Config, Option<anyhow::Error>) {
    if !path.exists() {
        // Write defaults on first run (best-effort)
        let _ = try_write_defaults(path);
        return (Config::default(), None);
    }
    match Config::load_from(path) {
        Ok(c)  => (c, None),
        Err(e) => (Config::default(), Some(e)),
    }
}

fn try_write_defaults(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# circbuf configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.buffer.default_capacity, 3);
        assert_eq!(cfg.log.level, "warn");
        assert!(!cfg.driver.stop_on_error);
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let cfg = Config::parse("[driver]\nstop_on_error = true\n").unwrap();
        assert!(cfg.driver.stop_on_error);
        assert!(!cfg.driver.echo_commands);
        assert_eq!(cfg.buffer.default_capacity, 3);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(Config::parse("[buffer]\ndefault_capacity = 0\n").is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), Config::default());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(&path, "[buffer]\ndefault_capacity = 16\n[log]\nlevel = \"debug\"\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.buffer.default_capacity, 16);
        assert_eq!(cfg.log.level, "debug");

        assert!(Config::load_from(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circbuf").join("circbuf.toml");
        let (cfg, ignored) = load_at(&path);
        assert_eq!(cfg, Config::default());
        assert!(ignored.is_none());
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn invalid_existing_file_is_reported_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circbuf.toml");
        let text = "[buffer]\ndefault_capacity = 0\n";
        fs::write(&path, text).unwrap();

        let (cfg, ignored) = load_at(&path);
        assert_eq!(cfg, Config::default());
        let msg = format!("{:#}", ignored.expect("invalid file should be reported"));
        assert!(msg.contains("default_capacity must be positive"), "{}", msg);
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }
}
