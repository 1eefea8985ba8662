//! Snapshot data types
//!
//! This module defines the durable representation of a play session and the
//! error types for save/load operations. It uses Serde for JSON
//! serialization.
//!
//! Every field has a default, so documents written by older builds (or by
//! newer builds with extra fields) still decode. Semantically odd values
//! such as negative health are accepted here and sanitized on restore.

use crate::game::{EnemyKind, HeroKind, TowerKind};
use crate::geometry::Point;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Current snapshot document version
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

/// An archetype kind as read from a document.
///
/// A kind written by a newer build (or hand-edited) is kept verbatim as
/// `Unrecognized` rather than failing the whole decode, so the restorer can
/// substitute a default for that one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Archetype<K> {
    Known(K),
    Unrecognized(String),
}

impl<K: Copy> Archetype<K> {
    pub fn known(&self) -> Option<K> {
        match self {
            Archetype::Known(kind) => Some(*kind),
            Archetype::Unrecognized(_) => None,
        }
    }
}

impl<K: Default> Default for Archetype<K> {
    fn default() -> Self {
        Archetype::Known(K::default())
    }
}

impl<K> From<K> for Archetype<K> {
    fn from(kind: K) -> Self {
        Archetype::Known(kind)
    }
}

/// The root persisted document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    /// 0 for documents written before versioning
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    /// None means the default map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_id: Option<String>,
    pub player: Option<PlayerSnapshot>,
    pub towers: Vec<TowerSnapshot>,
    pub heroes: Vec<HeroSnapshot>,
    pub enemies: Vec<EnemySnapshot>,
}

impl Snapshot {
    /// An empty snapshot at the current version
    pub fn new(map_id: Option<String>) -> Self {
        Snapshot {
            version: CURRENT_SNAPSHOT_VERSION,
            map_id,
            ..Snapshot::default()
        }
    }

    /// Number of entries across all lists, player included
    pub fn entry_count(&self) -> usize {
        usize::from(self.player.is_some()) + self.towers.len() + self.heroes.len() + self.enemies.len()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub position: Point,
    pub health: i32,
    pub coins: i32,
    pub gems: i32,
    pub essence: i32,
    /// Single balance written by builds before the currency split
    #[serde(skip_serializing_if = "is_zero")]
    pub gold: i32,
}

impl PlayerSnapshot {
    /// The three balances, falling back to legacy `gold` as coins when all
    /// of them are zero
    pub fn balances(&self) -> (i32, i32, i32) {
        if self.coins == 0 && self.gems == 0 && self.essence == 0 && self.gold > 0 {
            (self.gold, 0, 0)
        } else {
            (self.coins, self.gems, self.essence)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TowerSnapshot {
    pub kind: Archetype<TowerKind>,
    pub position: Point,
    pub health: i32,
    pub attack_cooldown: f32,
    pub level_a: i32,
    pub level_b: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroSnapshot {
    pub kind: Archetype<HeroKind>,
    pub position: Point,
    pub health: i32,
    pub base_attack: i32,
    pub level: i32,
}

impl Default for HeroSnapshot {
    fn default() -> Self {
        HeroSnapshot {
            kind: Archetype::default(),
            position: Point::default(),
            health: 0,
            base_attack: 0,
            level: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnemySnapshot {
    pub kind: Archetype<EnemyKind>,
    pub position: Point,
    pub health: i32,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// A document that is not structurally valid JSON for a snapshot
#[derive(Error, Debug)]
#[error("Invalid snapshot document: {0}")]
pub struct DecodeError(#[from] pub serde_json::Error);

/// Error types for save/load operations
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Serialization error: {0}")]
    Encode(serde_json::Error),

    #[error("No save found for slot '{slot}' ({} locations searched)", .searched.len())]
    NotFound { slot: String, searched: Vec<PathBuf> },

    #[error("No snapshot is pending")]
    NoPendingSnapshot,
}

pub type SaveResult<T> = Result<T, SaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_gold_fallback() {
        let legacy = PlayerSnapshot {
            gold: 250,
            ..PlayerSnapshot::default()
        };
        assert_eq!(legacy.balances(), (250, 0, 0));

        let current = PlayerSnapshot {
            coins: 10,
            gems: 2,
            gold: 250,
            ..PlayerSnapshot::default()
        };
        assert_eq!(current.balances(), (10, 2, 0));
    }

    #[test]
    fn test_archetype_known() {
        let known: Archetype<TowerKind> = TowerKind::Tesla.into();
        assert_eq!(known.known(), Some(TowerKind::Tesla));
        assert_eq!(Archetype::<TowerKind>::Unrecognized("Laser".into()).known(), None);
    }

    #[test]
    fn test_entry_count() {
        let mut snapshot = Snapshot::new(None);
        assert_eq!(snapshot.entry_count(), 0);
        snapshot.player = Some(PlayerSnapshot::default());
        snapshot.enemies.push(EnemySnapshot::default());
        assert_eq!(snapshot.entry_count(), 2);
    }
}
