//! Save manager for handling save/load operations
//!
//! This module provides the SaveManager struct which handles:
//! - Saving the live world to a named slot
//! - Loading a slot straight into the live world
//! - Two-phase loading through a pending buffer, for callers that switch map
//!   scenes between reading and applying
//!
//! Nothing here returns an error to the caller. Every failure is logged and
//! turned into `false`, so the frame loop never has to handle a fault.

use super::builder::build_snapshot;
use super::report::RestoreReport;
use super::restore::{RestoreContext, restore};
use super::store::SnapshotStore;
use super::types::{SaveError, SaveResult, Snapshot};
use crate::config::SaveConfig;
use crate::game::{ArchetypeBuilders, World};
use crate::geometry::Point;
use crate::path::PathProvider;

/// Where a two-phase load stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    /// A snapshot sits in the pending buffer, waiting for `apply_pending`
    Loaded,
}

pub struct SaveManager {
    store: SnapshotStore,
    pending: Option<Snapshot>,
    last_report: Option<RestoreReport>,
}

impl SaveManager {
    pub fn new(config: SaveConfig) -> Self {
        SaveManager {
            store: SnapshotStore::new(config),
            pending: None,
            last_report: None,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn state(&self) -> LoadState {
        if self.pending.is_some() { LoadState::Loaded } else { LoadState::Idle }
    }

    /// Report of the most recent restore, if any
    pub fn last_report(&self) -> Option<&RestoreReport> {
        self.last_report.as_ref()
    }

    /// Map the pending snapshot was saved on
    pub fn pending_map_id(&self) -> Option<&str> {
        self.pending.as_ref().and_then(|s| s.map_id.as_deref())
    }

    fn slot_name<'a>(&'a self, slot: Option<&'a str>) -> &'a str {
        slot.unwrap_or(&self.store.config().default_slot)
    }

    /// Saves the world to `slot` (or the default slot).
    pub fn save(&self, slot: Option<&str>, world: &World) -> bool {
        let slot = self.slot_name(slot);
        let snapshot = build_snapshot(&world.registry, world.map_id.as_deref());

        match self.store.write(slot, &snapshot) {
            Ok(path) => {
                log::info!(
                    "saved {} entries to slot '{}' ({})",
                    snapshot.entry_count(),
                    slot,
                    path.display()
                );
                true
            }
            Err(e) => {
                log::error!("save to slot '{}' failed: {}", slot, e);
                false
            }
        }
    }

    /// Reads `slot` and restores it into `world` in one step.
    ///
    /// Returns false if the slot could not be read; the world is untouched
    /// in that case. Otherwise the restore is queued on the world's command
    /// queue and shows up after the next `end_frame`.
    pub fn load(
        &mut self,
        slot: Option<&str>,
        world: &mut World,
        builders: &dyn ArchetypeBuilders,
        paths: &dyn PathProvider,
    ) -> bool {
        let slot = self.slot_name(slot).to_string();
        let snapshot = match self.store.read(&slot) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("load of slot '{}' failed: {}", slot, e);
                return false;
            }
        };

        let waypoints = paths.canonical_waypoints();
        self.apply(&snapshot, world, builders, &waypoints)
    }

    /// Reads `slot` into the pending buffer without touching any world.
    pub fn load_to_pending(&mut self, slot: Option<&str>) -> bool {
        let slot = self.slot_name(slot).to_string();
        match self.store.read(&slot) {
            Ok(snapshot) => {
                log::info!("slot '{}' loaded, waiting to be applied", slot);
                self.pending = Some(snapshot);
                true
            }
            Err(e) => {
                log::error!("load of slot '{}' failed: {}", slot, e);
                false
            }
        }
    }

    /// Restores the pending snapshot into `world` and clears the buffer.
    ///
    /// `None` waypoints means the map has no path available; enemies are
    /// then anchored in place.
    pub fn apply_pending(
        &mut self,
        world: &mut World,
        builders: &dyn ArchetypeBuilders,
        waypoints: Option<&[Point]>,
    ) -> bool {
        let snapshot = match self.take_pending() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("apply failed: {}", e);
                return false;
            }
        };

        self.apply(&snapshot, world, builders, waypoints.unwrap_or(&[]))
    }

    /// Drops a pending snapshot without applying it
    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    fn take_pending(&mut self) -> SaveResult<Snapshot> {
        self.pending.take().ok_or(SaveError::NoPendingSnapshot)
    }

    /// Positions are clamped to `world.play_area`, not to the configured one.
    fn apply(
        &mut self,
        snapshot: &Snapshot,
        world: &mut World,
        builders: &dyn ArchetypeBuilders,
        waypoints: &[Point],
    ) -> bool {
        if snapshot.map_id != world.map_id {
            log::warn!(
                "snapshot was saved on map {:?}, world is on {:?}; adopting the snapshot's map",
                snapshot.map_id,
                world.map_id
            );
        }
        world.map_id = snapshot.map_id.clone();

        let configured = self.store.config().play_area;
        if configured != world.play_area {
            log::warn!(
                "configured play area {:?} differs from the world's {:?}; clamping to the world's",
                configured,
                world.play_area
            );
        }

        let report = {
            let mut ctx = RestoreContext::for_world(world, builders, waypoints);
            restore(snapshot, &mut ctx)
        };

        let ok = report.failures.is_empty();
        if ok {
            log::info!("restore queued: {}", report);
        } else {
            log::error!("restore queued with failures: {}", report);
        }

        self.last_report = Some(report);
        ok
    }
}
