//! Save system configuration
//!
//! Where snapshots are written, where they are searched for on read, and
//! the play-area bounds restored positions are clamped to. Every field has a
//! default, so a config file only needs the values it wants to change.

use crate::bounds::PlayArea;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Subdirectory created under the platform data directory
const APP_DIR_NAME: &str = "rampart";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Primary, writable save directory
    pub save_dir: PathBuf,
    /// Read-only location shipped with the game (e.g. tutorial saves)
    pub bundled_dir: Option<PathBuf>,
    /// Relative layouts used by older builds, searched last
    pub legacy_dirs: Vec<PathBuf>,
    /// File extension appended to sanitized slot names
    pub extension: String,
    /// Slot used when the caller gives no name
    pub default_slot: String,
    /// Area new worlds are created with. Restores clamp against the target
    /// world's own `play_area`; `SaveManager` warns when the two differ.
    pub play_area: PlayArea,
}

impl Default for SaveConfig {
    fn default() -> Self {
        SaveConfig {
            save_dir: default_save_dir(),
            bundled_dir: Some(PathBuf::from("assets").join("saves")),
            legacy_dirs: vec![PathBuf::from("saves"), PathBuf::from(".")],
            extension: "json".to_string(),
            default_slot: "quicksave".to_string(),
            play_area: PlayArea::default(),
        }
    }
}

impl SaveConfig {
    /// Config rooted at `save_dir` with no bundled or legacy locations
    pub fn with_save_dir(save_dir: impl Into<PathBuf>) -> Self {
        SaveConfig {
            save_dir: save_dir.into(),
            bundled_dir: None,
            legacy_dirs: Vec::new(),
            ..SaveConfig::default()
        }
    }

    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: SaveConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}

/// `<data dir>/rampart/saves`, or `./saves` when the platform has no data dir
fn default_save_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join("saves"))
        .unwrap_or_else(|| PathBuf::from("saves"))
}
