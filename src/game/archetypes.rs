// Archetype builders
//
// Construction of concrete players, towers, heroes and enemies from a kind
// and a few parameters. The save pipeline only ever creates objects through
// the `ArchetypeBuilders` trait, so a game can plug in builders that attach
// textures and colliders while tests use the plain stat tables below.

use crate::geometry::Point;
use thiserror::Error;

use super::object::{
    EnemyData, EnemyKind, GameObject, HeadData, HeroData, HeroKind, ObjectId, ObjectKind, PlayerData,
    TowerData, TowerKind, Wallet,
};
use super::world::{Camera, Difficulty};

/// Errors a builder can raise for an individual object
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArchetypeError {
    #[error("Missing asset: {0}")]
    MissingAsset(String),
}

/// A freshly built tower and its optional head sub-object.
///
/// The head's `parent` link is not set yet; whoever registers the pair
/// assigns ids and links them.
#[derive(Debug, Clone)]
pub struct BuiltTower {
    pub tower: GameObject,
    pub head: Option<GameObject>,
}

pub trait ArchetypeBuilders {
    fn build_player(&self) -> Result<GameObject, ArchetypeError>;

    fn build_tower(&self, kind: TowerKind, position: Point) -> Result<BuiltTower, ArchetypeError>;

    fn build_hero(&self, kind: HeroKind, position: Point, camera: &Camera) -> Result<GameObject, ArchetypeError>;

    fn build_enemy(
        &self,
        kind: EnemyKind,
        waypoints: &[Point],
        start_index: usize,
        difficulty: Difficulty,
    ) -> Result<GameObject, ArchetypeError>;
}

/// Base stats per tower kind: (health, seconds between shots, has a head)
fn tower_stats(kind: TowerKind) -> (i32, f32, bool) {
    match kind {
        TowerKind::Arrow => (100, 0.8, true),
        TowerKind::Cannon => (150, 2.0, true),
        TowerKind::Frost => (90, 1.2, false),
        TowerKind::Tesla => (120, 1.5, true),
    }
}

/// Base stats per hero kind: (health, attack, shots per second)
fn hero_stats(kind: HeroKind) -> (i32, i32, f32) {
    match kind {
        HeroKind::Knight => (200, 12, 0.8),
        HeroKind::Ranger => (120, 8, 1.5),
        HeroKind::Mage => (90, 15, 0.6),
    }
}

/// Base stats per enemy kind: (health, speed)
fn enemy_stats(kind: EnemyKind) -> (i32, f32) {
    match kind {
        EnemyKind::Slime => (8, 30.0),
        EnemyKind::Goblin => (15, 45.0),
        EnemyKind::Bat => (6, 70.0),
        EnemyKind::Ogre => (60, 20.0),
    }
}

/// Builders with the stock stat tables and no asset loading
#[derive(Debug, Clone, Default)]
pub struct StandardArchetypes {
    /// Where a new player appears
    pub player_spawn: Point,
    pub starting_coins: i32,
}

impl StandardArchetypes {
    pub fn new(player_spawn: Point, starting_coins: i32) -> Self {
        StandardArchetypes { player_spawn, starting_coins }
    }
}

impl ArchetypeBuilders for StandardArchetypes {
    fn build_player(&self) -> Result<GameObject, ArchetypeError> {
        let data = PlayerData {
            wallet: Some(Wallet {
                coins: self.starting_coins,
                ..Wallet::default()
            }),
            heroes: Vec::new(),
        };
        Ok(GameObject::new(self.player_spawn, ObjectKind::Player(data))
            .with_health(10)
            .with_body())
    }

    fn build_tower(&self, kind: TowerKind, position: Point) -> Result<BuiltTower, ArchetypeError> {
        let (health, fire_interval, has_head) = tower_stats(kind);
        let tower = GameObject::new(
            position,
            ObjectKind::Tower(TowerData {
                kind,
                attack_cooldown: fire_interval,
                fire_interval,
                level_a: 0,
                level_b: 0,
                head: None,
            }),
        )
        .with_health(health);

        let head = has_head.then(|| {
            GameObject::new(
                position,
                ObjectKind::TowerHead(HeadData {
                    parent: ObjectId::UNASSIGNED,
                    facing: 0.0,
                }),
            )
        });

        Ok(BuiltTower { tower, head })
    }

    fn build_hero(&self, kind: HeroKind, position: Point, camera: &Camera) -> Result<GameObject, ArchetypeError> {
        let (health, attack, fire_rate) = hero_stats(kind);
        Ok(GameObject::new(position, ObjectKind::Hero(HeroData::new(kind, attack, fire_rate, *camera)))
            .with_health(health)
            .with_body())
    }

    fn build_enemy(
        &self,
        kind: EnemyKind,
        waypoints: &[Point],
        start_index: usize,
        difficulty: Difficulty,
    ) -> Result<GameObject, ArchetypeError> {
        let (base_health, speed) = enemy_stats(kind);
        let health = (base_health as f32 * difficulty.health_multiplier()).round() as i32;
        let position = waypoints
            .get(start_index)
            .or_else(|| waypoints.first())
            .copied()
            .unwrap_or_default();

        Ok(GameObject::new(
            position,
            ObjectKind::Enemy(EnemyData {
                kind,
                waypoints: waypoints.to_vec(),
                target: start_index,
                speed,
                difficulty,
            }),
        )
        .with_health(health)
        .with_body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::object::Role;

    #[test]
    fn test_tower_heads_follow_kind() {
        let builders = StandardArchetypes::default();
        let cannon = builders.build_tower(TowerKind::Cannon, Point::new(5.0, 5.0)).unwrap();
        assert_eq!(cannon.tower.role(), Role::Tower);
        assert_eq!(cannon.head.map(|h| h.role()), Some(Role::TowerHead));

        let frost = builders.build_tower(TowerKind::Frost, Point::new(5.0, 5.0)).unwrap();
        assert!(frost.head.is_none());
    }

    #[test]
    fn test_enemy_health_scales_with_difficulty() {
        let builders = StandardArchetypes::default();
        let path = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let hard = builders.build_enemy(EnemyKind::Goblin, &path, 1, Difficulty::Hard).unwrap();
        let easy = builders.build_enemy(EnemyKind::Goblin, &path, 1, Difficulty::Easy).unwrap();

        assert_eq!(hard.health_or_zero(), 23); // 15 * 1.5 rounded
        assert_eq!(easy.health_or_zero(), 11); // 15 * 0.75 rounded
        assert_eq!(hard.position, Point::new(10.0, 0.0));
        assert_eq!(hard.as_enemy().unwrap().target, 1);
    }

    #[test]
    fn test_new_hero_starts_at_level_one() {
        let builders = StandardArchetypes::default();
        let hero = builders
            .build_hero(HeroKind::Mage, Point::new(1.0, 2.0), &Camera::default())
            .unwrap();
        let data = hero.as_hero().unwrap();
        assert_eq!(data.level, 1);
        assert!(data.modifiers.is_empty());
        assert!(data.owner.is_none());
    }
}
