/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Problems are collected as warnings so they can be logged once the
/// subscriber is up (the terminal itself is busy drawing the scene).

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct DuelConfig {
    pub render: RenderConfig,
    pub sim: SimConfig,
    pub log: LogConfig,
    /// Non-fatal problems met while loading (parse errors, unreadable file).
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub fps: u32,
    pub fallback_width: u16,  // used when the terminal size can't be read
    pub fallback_height: u16,
}

#[derive(Clone, Debug)]
pub struct SimConfig {
    pub seed: u64,
    pub skip_intro: bool,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub file: PathBuf,
    pub filter: String,
}

impl RenderConfig {
    /// Fixed simulation step in seconds.
    pub fn frame_time(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    render: TomlRender,
    #[serde(default)]
    sim: TomlSim,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlRender {
    #[serde(default = "default_fps")]
    fps: u32,
    #[serde(default = "default_width")]
    fallback_width: u16,
    #[serde(default = "default_height")]
    fallback_height: u16,
}

#[derive(Deserialize, Debug)]
struct TomlSim {
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default)]
    skip_intro: bool,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_filter")]
    filter: String,
}

// ── Defaults ──

fn default_fps() -> u32 { 20 }
fn default_width() -> u16 { 80 }
fn default_height() -> u16 { 25 }
fn default_seed() -> u64 { 123 }
fn default_log_file() -> String { "cli-duel.log".into() }
fn default_filter() -> String { "info".into() }

impl Default for TomlRender {
    fn default() -> Self {
        TomlRender {
            fps: default_fps(),
            fallback_width: default_width(),
            fallback_height: default_height(),
        }
    }
}

impl Default for TomlSim {
    fn default() -> Self {
        TomlSim {
            seed: default_seed(),
            skip_intro: false,
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: default_log_file(),
            filter: default_filter(),
        }
    }
}

// ── Loading ──

impl DuelConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let mut warnings = Vec::new();
        let mut cfg = match read_config_text(&candidate_dirs(), &mut warnings) {
            Some(text) => Self::parse(&text),
            None => Self::default(),
        };
        warnings.append(&mut cfg.warnings);
        cfg.warnings = warnings;
        cfg
    }

    /// Parse a config document that is already in memory.
    pub fn parse(text: &str) -> Self {
        let mut warnings = Vec::new();
        let toml_cfg = match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => cfg,
            Err(e) => {
                warnings.push(format!("config.toml parse error: {e}; using default settings"));
                TomlConfig::default()
            }
        };
        Self::from_toml(toml_cfg, warnings)
    }

    fn from_toml(toml_cfg: TomlConfig, mut warnings: Vec<String>) -> Self {
        if toml_cfg.render.fps == 0 {
            warnings.push("render.fps = 0 is invalid; using 1".into());
        }
        DuelConfig {
            render: RenderConfig {
                fps: toml_cfg.render.fps.max(1),
                fallback_width: toml_cfg.render.fallback_width.max(1),
                fallback_height: toml_cfg.render.fallback_height.max(1),
            },
            sim: SimConfig {
                seed: toml_cfg.sim.seed,
                skip_intro: toml_cfg.sim.skip_intro,
            },
            log: LogConfig {
                file: PathBuf::from(toml_cfg.log.file),
                filter: toml_cfg.log.filter,
            },
            warnings,
        }
    }
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), Vec::new())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories and return its text.
fn read_config_text(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> Option<String> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return Some(text),
                Err(e) => {
                    warnings.push(format!("could not read {}: {e}", path.display()));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = DuelConfig::parse("");
        assert_eq!(cfg.render.fps, 20);
        assert_eq!(cfg.render.fallback_width, 80);
        assert_eq!(cfg.render.fallback_height, 25);
        assert_eq!(cfg.sim.seed, 123);
        assert!(!cfg.sim.skip_intro);
        assert_eq!(cfg.log.filter, "info");
        assert!(cfg.warnings.is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = DuelConfig::parse("[sim]\nseed = 7\n\n[render]\nfps = 30\n");
        assert_eq!(cfg.sim.seed, 7);
        assert_eq!(cfg.render.fps, 30);
        assert_eq!(cfg.render.fallback_width, 80);
        assert_eq!(cfg.log.file, PathBuf::from("cli-duel.log"));
    }

    #[test]
    fn parse_error_falls_back_with_warning() {
        let cfg = DuelConfig::parse("[render\nfps = ");
        assert_eq!(cfg.render.fps, 20);
        assert_eq!(cfg.warnings.len(), 1);
    }

    #[test]
    fn zero_fps_is_clamped() {
        let cfg = DuelConfig::parse("[render]\nfps = 0\n");
        assert_eq!(cfg.render.fps, 1);
        assert!((cfg.render.frame_time() - 1.0).abs() < 1e-6);
        assert!(!cfg.warnings.is_empty());
    }
}
