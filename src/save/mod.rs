//! Save/Load system for Rampart
//!
//! This module persists the live world to a named slot and rebuilds it later:
//! - JSON-based snapshot files (human-readable, debuggable)
//! - Named slots with bundled and legacy fallback locations on read
//! - Best-effort restore that substitutes or skips bad entries instead of
//!   failing the whole load
//!
//! # Architecture
//!
//! - `types`: Snapshot data structures and error types
//! - `builder`: Live registry to snapshot
//! - `codec`: Snapshot to bytes and back
//! - `store`: Slot names to files
//! - `restore`: Snapshot back into the live world
//! - `report`: What a restore did
//! - `manager`: SaveManager, the bool-returning surface the UI calls
//!
//! # Example Usage
//!
//! ```ignore
//! let manager = SaveManager::new(SaveConfig::default());
//! manager.save(Some("before boss"), &world);
//!
//! let mut manager = manager;
//! if manager.load_to_pending(Some("before boss")) {
//!     switch_scene(manager.pending_map_id());
//!     manager.apply_pending(&mut world, &builders, Some(&waypoints));
//! }
//! world.end_frame();
//! ```

pub mod builder;
pub mod codec;
pub mod manager;
pub mod report;
pub mod restore;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use builder::build_snapshot;
pub use manager::{LoadState, SaveManager};
pub use report::{EntryFailure, PlayerOutcome, RestoreReport, Section, Substitution};
pub use restore::{RestoreContext, restore};
pub use store::{SlotInfo, SnapshotStore, sanitize_slot_name};
pub use types::*;
