// Per-frame gameplay systems
//
// Systems iterate the registry mutably for in-place updates and push any
// structural change (despawns) onto the command queue.

use crate::geometry::Point;

use super::object::ObjectKind;
use super::registry::{CommandQueue, LiveRegistry};

/// Counts tower cooldowns down. Returns how many towers fired this frame.
pub fn tick_towers(registry: &mut LiveRegistry, delta_time: f32) -> usize {
    let mut shots = 0;
    for object in registry.iter_mut() {
        if let ObjectKind::Tower(tower) = &mut object.kind {
            tower.attack_cooldown -= delta_time;
            if tower.attack_cooldown <= 0.0 {
                tower.attack_cooldown = tower.fire_interval;
                shots += 1;
            }
        }
    }
    shots
}

/// Moves enemies along their path.
///
/// Enemies that run out of waypoints or health are queued for despawn.
/// An enemy with no waypoints stays where it is, and one with a single
/// waypoint walks onto it and holds there.
pub fn advance_enemies(registry: &mut LiveRegistry, commands: &mut CommandQueue, delta_time: f32) {
    for object in registry.iter_mut() {
        let ObjectKind::Enemy(enemy) = &mut object.kind else {
            continue;
        };

        if object.health.is_some_and(|h| !h.is_alive()) {
            commands.despawn(object.id);
            continue;
        }

        let Some(target) = enemy.target_point() else {
            if enemy.waypoints.len() > 1 {
                // Walked off the end of the path
                commands.despawn(object.id);
            }
            continue;
        };

        let before = object.position;
        let (next, arrived) = before.step_toward(target, enemy.speed * delta_time);
        object.position = next;
        if arrived {
            enemy.target += 1;
        }

        if let Some(body) = object.body.as_mut() {
            if delta_time > 0.0 {
                body.velocity = Point::new((next.x - before.x) / delta_time, (next.y - before.y) / delta_time);
            }
        }
    }
}
