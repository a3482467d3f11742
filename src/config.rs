use std::error::Error;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Settings read from `chisel.toml`. Every field is optional in the file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChiselConfig {
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Voxel writes handed out per tick, shared by all owners.
    #[serde(default = "default_tick_budget")]
    pub tick_budget: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: i32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Block registry TOML; the built-in palette is used when absent.
    #[serde(default)]
    pub blocks: Option<PathBuf>,
}

fn default_history_capacity() -> usize { 20 }
fn default_tick_budget() -> usize { 4096 }
fn default_chunk_size() -> i32 { 32 }
fn default_log_level() -> String { "info".into() }

impl Default for ChiselConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            tick_budget: default_tick_budget(),
            chunk_size: default_chunk_size(),
            log_level: default_log_level(),
            blocks: None,
        }
    }
}

impl ChiselConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: ChiselConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Relative `blocks` paths resolve against the config file's directory.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| format!("read {}: {}", path.display(), e))?;
        let mut cfg = Self::from_toml_str(&s)?;
        if let (Some(blocks), Some(dir)) = (cfg.blocks.as_mut(), path.parent()) {
            if blocks.is_relative() {
                *blocks = dir.join(&*blocks);
            }
        }
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.history_capacity == 0 {
            return Err("history_capacity must be at least 1".into());
        }
        if self.tick_budget == 0 {
            return Err("tick_budget must be at least 1".into());
        }
        if self.chunk_size <= 0 {
            return Err(format!("chunk_size must be positive, got {}", self.chunk_size).into());
        }
        Ok(())
    }
}
