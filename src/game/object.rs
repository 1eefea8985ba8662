// Live simulation objects
//
// Every object in the live registry is a `GameObject`. Its role is an explicit
// closed enum (`ObjectKind`) carrying the role-specific data, so systems and
// the save pipeline match on it exhaustively instead of probing which
// optional parts happen to be attached.

use crate::geometry::Point;
use crate::stats::{self, Health, ModifierEffect, StatType};
use serde::{Deserialize, Serialize};

use super::world::{Camera, Difficulty};

/// Identifier of a live object. `ObjectId::UNASSIGNED` until registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectId(pub u64);

impl ObjectId {
    pub const UNASSIGNED: ObjectId = ObjectId(0);

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

/// Role tag of a live object, used for filtering and restore dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Player,
    Tower,
    /// Rotating turret owned by a tower; never saved on its own
    TowerHead,
    Hero,
    Enemy,
    Projectile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TowerKind {
    #[default]
    Arrow,
    Cannon,
    Frost,
    Tesla,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeroKind {
    #[default]
    Knight,
    Ranger,
    Mage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Slime,
    Goblin,
    Bat,
    Ogre,
}

/// Physical body state integrated by the movement systems
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub velocity: Point,
    pub angular_velocity: f32,
}

impl Body {
    pub fn stop(&mut self) {
        self.velocity = Point::ORIGIN;
        self.angular_velocity = 0.0;
    }

    pub fn is_at_rest(&self) -> bool {
        self.velocity == Point::ORIGIN && self.angular_velocity == 0.0
    }
}

/// The player's three currency balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wallet {
    pub coins: i32,
    pub gems: i32,
    pub essence: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerData {
    /// Absent until the economy system attaches one
    pub wallet: Option<Wallet>,
    pub heroes: Vec<ObjectId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TowerData {
    pub kind: TowerKind,
    /// Seconds until the next shot
    pub attack_cooldown: f32,
    /// Seconds between shots
    pub fire_interval: f32,
    pub level_a: i32,
    pub level_b: i32,
    pub head: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadData {
    pub parent: ObjectId,
    /// Facing angle in radians
    pub facing: f32,
}

/// Hero state. Level bonuses live in `modifiers` and are only ever produced
/// by `level_up`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroData {
    pub kind: HeroKind,
    pub base_attack: i32,
    /// Base shots per second before level bonuses
    pub base_fire_rate: f32,
    pub level: i32,
    pub modifiers: Vec<ModifierEffect>,
    pub owner: Option<ObjectId>,
    pub camera: Camera,
}

impl HeroData {
    pub fn new(kind: HeroKind, base_attack: i32, base_fire_rate: f32, camera: Camera) -> Self {
        HeroData {
            kind,
            base_attack,
            base_fire_rate,
            level: 1,
            modifiers: Vec::new(),
            owner: None,
            camera,
        }
    }

    /// Gains one level and its stat bonuses. This is the only upgrade path,
    /// in play and when rebuilding from a save. Does nothing at
    /// `MAX_HERO_LEVEL`.
    pub fn level_up(&mut self) {
        if self.level >= stats::MAX_HERO_LEVEL {
            return;
        }
        self.level += 1;
        self.modifiers.extend(stats::hero_level_effects(self.level));
    }

    /// Levels up until `target` (capped at `MAX_HERO_LEVEL`) is reached.
    /// Never lowers the level.
    pub fn level_up_to(&mut self, target: i32) {
        let target = target.min(stats::MAX_HERO_LEVEL);
        while self.level < target {
            self.level_up();
        }
    }

    pub fn attack(&self) -> f32 {
        stats::effective_stat(self.base_attack as f32, StatType::AttackDamage, &self.modifiers)
    }

    pub fn fire_rate(&self) -> f32 {
        stats::effective_stat(self.base_fire_rate, StatType::AttackSpeed, &self.modifiers)
    }
}

/// An enemy walking the map path toward `waypoints[target]`
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyData {
    pub kind: EnemyKind,
    pub waypoints: Vec<Point>,
    pub target: usize,
    /// Units per second
    pub speed: f32,
    pub difficulty: Difficulty,
}

impl EnemyData {
    pub fn target_point(&self) -> Option<Point> {
        self.waypoints.get(self.target).copied()
    }

    pub fn finished_path(&self) -> bool {
        self.target >= self.waypoints.len()
    }
}

/// Role-specific data; the variant is the object's role tag
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Player(PlayerData),
    Tower(TowerData),
    TowerHead(HeadData),
    Hero(HeroData),
    Enemy(EnemyData),
    Projectile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameObject {
    pub id: ObjectId,
    pub position: Point,
    pub health: Option<Health>,
    pub body: Option<Body>,
    pub kind: ObjectKind,
}

impl GameObject {
    pub fn new(position: Point, kind: ObjectKind) -> Self {
        GameObject {
            id: ObjectId::UNASSIGNED,
            position,
            health: None,
            body: None,
            kind,
        }
    }

    pub fn with_health(mut self, max: i32) -> Self {
        self.health = Some(Health::new(max));
        self
    }

    pub fn with_body(mut self) -> Self {
        self.body = Some(Body::default());
        self
    }

    pub fn role(&self) -> Role {
        match self.kind {
            ObjectKind::Player(_) => Role::Player,
            ObjectKind::Tower(_) => Role::Tower,
            ObjectKind::TowerHead(_) => Role::TowerHead,
            ObjectKind::Hero(_) => Role::Hero,
            ObjectKind::Enemy(_) => Role::Enemy,
            ObjectKind::Projectile => Role::Projectile,
        }
    }

    /// Current health, or 0 when the object has no health component
    pub fn health_or_zero(&self) -> i32 {
        self.health.map(|h| h.current()).unwrap_or(0)
    }

    /// Sets current health, attaching a health component if there is none
    pub fn restore_health(&mut self, value: i32) {
        match self.health.as_mut() {
            Some(health) => health.restore(value),
            None => {
                let mut health = Health::new(0);
                health.restore(value);
                self.health = Some(health);
            }
        }
    }

    pub fn as_tower(&self) -> Option<&TowerData> {
        match &self.kind {
            ObjectKind::Tower(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_hero(&self) -> Option<&HeroData> {
        match &self.kind {
            ObjectKind::Hero(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&EnemyData> {
        match &self.kind {
            ObjectKind::Enemy(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&PlayerData> {
        match &self.kind {
            ObjectKind::Player(data) => Some(data),
            _ => None,
        }
    }
}
