// Game module - Contains the live simulation state
//
// This module contains:
// - object.rs: GameObject, its role-tagged data and the kind enums
// - registry.rs: LiveRegistry and the deferred CommandQueue
// - world.rs: World struct, Camera and Difficulty
// - archetypes.rs: Builders that construct objects from a kind
// - systems.rs: Per-frame movement and cooldown systems

// Module declarations
pub mod archetypes;
pub mod object;
pub mod registry;
pub mod systems;
pub mod world;

// Re-export types for convenience
pub use archetypes::{ArchetypeBuilders, ArchetypeError, BuiltTower, StandardArchetypes};
pub use object::*;
pub use registry::{Command, CommandQueue, LiveRegistry};
pub use world::{Camera, Difficulty, World};
