//! Snapshot store for slot-based file operations
//!
//! This module provides the SnapshotStore struct which handles:
//! - Turning slot names into safe file paths
//! - Writing snapshots to the primary save directory
//! - Reading with fallback to bundled and legacy locations
//! - Save file management (listing, existence checks, deletion)

use super::codec;
use super::types::{SaveError, SaveResult, Snapshot};
use crate::config::SaveConfig;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

/// Strips every character outside `[A-Za-z0-9 _-]`.
///
/// # Example
///
/// ```ignore
/// assert_eq!(sanitize_slot_name("../My Save #2"), "My Save 2");
/// ```
pub fn sanitize_slot_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect()
}

/// Summary of a save found in the primary directory
#[derive(Debug, Clone, PartialEq)]
pub struct SlotInfo {
    pub slot: String,
    pub path: PathBuf,
    pub saved_at: Option<DateTime<Utc>>,
    pub map_id: Option<String>,
}

pub struct SnapshotStore {
    config: SaveConfig,
}

impl SnapshotStore {
    pub fn new(config: SaveConfig) -> Self {
        SnapshotStore { config }
    }

    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    /// File name for a slot. Names that sanitize to nothing use the default slot.
    fn file_name(&self, slot: &str) -> String {
        let mut name = sanitize_slot_name(slot);
        if name.trim().is_empty() {
            name = sanitize_slot_name(&self.config.default_slot);
        }
        format!("{}.{}", name, self.config.extension)
    }

    /// Where `write` puts this slot
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.config.save_dir.join(self.file_name(slot))
    }

    /// Every location `read` tries for this slot, in order
    pub fn candidate_paths(&self, slot: &str) -> Vec<PathBuf> {
        let file_name = self.file_name(slot);
        let mut paths = vec![self.config.save_dir.join(&file_name)];

        if let Some(bundled) = &self.config.bundled_dir {
            paths.push(bundled.join(&file_name));
        }
        for legacy in &self.config.legacy_dirs {
            paths.push(legacy.join(&file_name));
        }

        paths.dedup();
        paths
    }

    /// Writes a snapshot to the primary save directory, creating it if needed.
    ///
    /// A crash mid-write can leave a truncated file behind; the next read
    /// will skip it as undecodable.
    pub fn write(&self, slot: &str, snapshot: &Snapshot) -> SaveResult<PathBuf> {
        if !self.config.save_dir.exists() {
            fs::create_dir_all(&self.config.save_dir)?;
        }

        let path = self.slot_path(slot);
        let bytes = codec::encode(snapshot)?;
        fs::write(&path, bytes)?;

        log::debug!("wrote {}", path.display());
        Ok(path)
    }

    /// Reads the first candidate location that exists and decodes.
    ///
    /// Returns `NotFound` only if no candidate exists. If some exist but none
    /// decode, the last error is returned.
    pub fn read(&self, slot: &str) -> SaveResult<Snapshot> {
        let candidates = self.candidate_paths(slot);
        let mut last_error = None;

        for path in &candidates {
            if !path.is_file() {
                log::debug!("no save at {}", path.display());
                continue;
            }

            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("could not read {}: {}", path.display(), e);
                    last_error = Some(SaveError::Io(e));
                    continue;
                }
            };

            match codec::decode(&bytes) {
                Ok(snapshot) => {
                    log::debug!("read {}", path.display());
                    return Ok(snapshot);
                }
                Err(e) => {
                    log::warn!("skipping {}: {}", path.display(), e);
                    last_error = Some(SaveError::Decode(e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SaveError::NotFound {
            slot: slot.to_string(),
            searched: candidates,
        }))
    }

    /// Check if a save exists for the slot in any candidate location
    pub fn exists(&self, slot: &str) -> bool {
        self.candidate_paths(slot).iter().any(|p| p.is_file())
    }

    /// List decodable saves in the primary directory, newest first
    pub fn list_slots(&self) -> SaveResult<Vec<SlotInfo>> {
        let mut slots = Vec::new();
        if !self.config.save_dir.exists() {
            return Ok(slots);
        }

        for entry in fs::read_dir(&self.config.save_dir)? {
            let path = entry?.path();

            if path.extension().and_then(|s| s.to_str()) != Some(self.config.extension.as_str()) {
                continue;
            }
            let Some(slot) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            match fs::read(&path).map_err(SaveError::from).and_then(|b| Ok(codec::decode(&b)?)) {
                Ok(snapshot) => slots.push(SlotInfo {
                    slot,
                    path,
                    saved_at: snapshot.saved_at,
                    map_id: snapshot.map_id,
                }),
                Err(e) => log::warn!("ignoring {}: {}", path.display(), e),
            }
        }

        // Sort by timestamp, newest first
        slots.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));

        Ok(slots)
    }

    /// Deletes the slot's file from the primary directory
    pub fn delete(&self, slot: &str) -> SaveResult<()> {
        fs::remove_file(self.slot_path(slot))?;
        Ok(())
    }
}
