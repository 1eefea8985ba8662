// World struct and per-frame bookkeeping
//
// This module contains the World struct which bundles the live registry with
// the per-session state the save pipeline needs: camera, difficulty, active
// map and play-area bounds.

use crate::bounds::PlayArea;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

use super::object::{GameObject, ObjectId, Role};
use super::registry::{CommandQueue, LiveRegistry};
use super::systems;

/// Viewport a hero is bound to when it is built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: Point::ORIGIN,
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Scales enemy base health
    pub fn health_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }
}

/// World bundles all live objects and the session state around them
#[derive(Debug, Default)]
pub struct World {
    pub registry: LiveRegistry,
    pub commands: CommandQueue,
    pub camera: Camera,
    pub difficulty: Difficulty,
    /// None means the default map
    pub map_id: Option<String>,
    pub play_area: PlayArea,
}

impl World {
    pub fn new(play_area: PlayArea) -> Self {
        World {
            registry: LiveRegistry::new(),
            commands: CommandQueue::new(),
            camera: Camera::default(),
            difficulty: Difficulty::default(),
            map_id: None,
            play_area,
        }
    }

    /// Spawns an object immediately; for world setup outside the frame loop
    pub fn spawn_now(&mut self, object: GameObject) -> ObjectId {
        self.registry.insert(object)
    }

    /// Runs one simulation step, then applies everything systems queued.
    pub fn update(&mut self, delta_time: f32) {
        systems::tick_towers(&mut self.registry, delta_time);
        systems::advance_enemies(&mut self.registry, &mut self.commands, delta_time);
        self.end_frame();
    }

    /// Applies deferred registry mutations. Call once per frame after all
    /// iteration is done.
    pub fn end_frame(&mut self) -> usize {
        self.commands.apply(&mut self.registry)
    }

    pub fn count(&self, role: Role) -> usize {
        self.registry.count(role)
    }

    pub fn player(&self) -> Option<&GameObject> {
        self.registry.with_role(Role::Player).next()
    }
}
