//! Snapshot builder
//!
//! One read-only pass over the live registry that extracts the minimal state
//! needed to resume play. Derived state (enemy path progress, tower heads,
//! hero level bonuses) is deliberately left out; the restorer re-derives it.

use super::types::{EnemySnapshot, HeroSnapshot, PlayerSnapshot, Snapshot, TowerSnapshot};
use crate::game::{LiveRegistry, ObjectKind};
use chrono::Utc;

/// Builds a snapshot of `registry`. Never fails; a missing sub-component
/// (no wallet, no health) is recorded as zero.
pub fn build_snapshot(registry: &LiveRegistry, map_id: Option<&str>) -> Snapshot {
    let mut snapshot = Snapshot::new(map_id.map(str::to_string));
    snapshot.saved_at = Some(Utc::now());

    for object in registry.iter() {
        match &object.kind {
            ObjectKind::Player(player) => {
                if snapshot.player.is_some() {
                    log::warn!("more than one player in the world; saving the first");
                    continue;
                }
                let wallet = player.wallet.unwrap_or_default();
                snapshot.player = Some(PlayerSnapshot {
                    position: object.position.finite_or_zero(),
                    health: object.health_or_zero(),
                    coins: wallet.coins,
                    gems: wallet.gems,
                    essence: wallet.essence,
                    gold: 0,
                });
            }
            ObjectKind::Tower(tower) => snapshot.towers.push(TowerSnapshot {
                kind: tower.kind.into(),
                position: object.position.finite_or_zero(),
                health: object.health_or_zero(),
                attack_cooldown: finite_or_zero(tower.attack_cooldown),
                level_a: tower.level_a,
                level_b: tower.level_b,
            }),
            ObjectKind::Hero(hero) => snapshot.heroes.push(HeroSnapshot {
                kind: hero.kind.into(),
                position: object.position.finite_or_zero(),
                health: object.health_or_zero(),
                base_attack: hero.base_attack,
                level: hero.level.max(1),
            }),
            ObjectKind::Enemy(enemy) => snapshot.enemies.push(EnemySnapshot {
                kind: enemy.kind.into(),
                position: object.position.finite_or_zero(),
                health: object.health_or_zero(),
            }),
            // Re-derived from their parent tower, or transient
            ObjectKind::TowerHead(_) | ObjectKind::Projectile => {}
        }
    }

    snapshot
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        ArchetypeBuilders, Camera, Difficulty, EnemyKind, GameObject, HeroKind, PlayerData, StandardArchetypes,
        TowerKind,
    };
    use crate::geometry::Point;
    use crate::save::types::Archetype;

    #[test]
    fn test_empty_registry_builds_empty_snapshot() {
        let snapshot = build_snapshot(&LiveRegistry::new(), None);
        assert!(snapshot.player.is_none());
        assert_eq!(snapshot.entry_count(), 0);
        assert!(snapshot.saved_at.is_some());
    }

    #[test]
    fn test_extracts_each_role() {
        let builders = StandardArchetypes::new(Point::new(20.0, 30.0), 75);
        let mut registry = LiveRegistry::new();

        registry.insert(builders.build_player().unwrap());
        let built = builders.build_tower(TowerKind::Tesla, Point::new(100.0, 100.0)).unwrap();
        registry.insert(built.tower);
        registry.insert(built.head.unwrap());
        let mut hero = builders
            .build_hero(HeroKind::Knight, Point::new(50.0, 60.0), &Camera::default())
            .unwrap();
        if let ObjectKind::Hero(data) = &mut hero.kind {
            data.level_up_to(3);
        }
        registry.insert(hero);
        registry.insert(
            builders
                .build_enemy(EnemyKind::Ogre, &[Point::new(0.0, 0.0), Point::new(9.0, 9.0)], 1, Difficulty::Normal)
                .unwrap(),
        );
        registry.insert(GameObject::new(Point::ORIGIN, ObjectKind::Projectile));

        let snapshot = build_snapshot(&registry, Some("canyon"));

        assert_eq!(snapshot.map_id.as_deref(), Some("canyon"));
        let player = snapshot.player.unwrap();
        assert_eq!(player.position, Point::new(20.0, 30.0));
        assert_eq!(player.coins, 75);
        assert_eq!(player.health, 10);

        assert_eq!(snapshot.towers.len(), 1); // head is not saved
        assert_eq!(snapshot.towers[0].kind, Archetype::Known(TowerKind::Tesla));

        assert_eq!(snapshot.heroes[0].level, 3);
        assert_eq!(snapshot.heroes[0].base_attack, 12); // base, not level-boosted

        assert_eq!(snapshot.enemies.len(), 1);
        assert_eq!(snapshot.enemies[0].position, Point::new(9.0, 9.0));
    }

    #[test]
    fn test_missing_components_default_to_zero() {
        let mut registry = LiveRegistry::new();
        registry.insert(GameObject::new(
            Point::new(f32::NAN, 4.0),
            ObjectKind::Player(PlayerData::default()),
        ));

        let player = build_snapshot(&registry, None).player.unwrap();
        assert_eq!(player.coins, 0);
        assert_eq!(player.health, 0);
        assert_eq!(player.position, Point::new(0.0, 4.0));
    }
}
