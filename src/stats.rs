//! Health and stat modifier system
//!
//! This module provides the stat model shared by every live object:
//! - Health that can be restored from a save
//! - Percentage stat modifiers granted by hero levels
//! - The hero growth rules applied on every level gained
//!
//! # Design Philosophy
//!
//! Level-derived bonuses are never stored as raw numbers. A hero's level is
//! the source of truth and its modifiers are regenerated from it, so changing
//! the growth constants here rebalances old saves too.
//!
//! # Rust Learning Notes
//!
//! This module demonstrates:
//! - **NewType Pattern**: Wrapping primitives in meaningful types (`Health`)
//! - **Enums for Type Safety**: `StatType` prevents mixing up stat categories

/// Attack bonus granted per hero level above 1 (+10%)
pub const HERO_ATTACK_GROWTH: f32 = 0.10;

/// Attack speed bonus granted per hero level above 1 (+8%)
pub const HERO_FIRE_RATE_GROWTH: f32 = 0.08;

/// Highest level a hero can reach
pub const MAX_HERO_LEVEL: i32 = 50;

/// Represents an object's health points
///
/// # Example
///
/// ```ignore
/// let mut health = Health::new(100);
/// health.restore(70);
/// assert_eq!(health.current(), 70);
/// assert!(health.is_alive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    /// Creates a new Health instance with full health
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Health { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Overwrites current health with a value read from a save.
    ///
    /// Negative values become 0. A value above max raises max, since the save
    /// may predate a balance change that lowered base health.
    pub fn restore(&mut self, value: i32) {
        self.current = value.max(0);
        if self.current > self.max {
            self.max = self.current;
        }
    }
}

/// Categories of stats that can be modified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatType {
    /// Damage per shot
    AttackDamage,
    /// Shots per second
    AttackSpeed,
}

/// A stat modification effect
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierEffect {
    /// Which stat this modifies
    pub stat_type: StatType,
    /// Multiplier bonus, so 0.5 means +50% and -0.2 means -20%
    pub percentage: f32,
    /// What applied this effect (for debugging/UI)
    pub source: String,
}

/// Calculates the effective value of a stat after applying modifiers.
///
/// Percentages stack additively: two +10% bonuses give +20%, not +21%.
pub fn effective_stat(base_value: f32, stat_type: StatType, modifiers: &[ModifierEffect]) -> f32 {
    let bonus: f32 = modifiers
        .iter()
        .filter(|m| m.stat_type == stat_type)
        .map(|m| m.percentage)
        .sum();

    base_value * (1.0 + bonus)
}

/// The modifiers a hero gains on reaching `new_level`.
pub fn hero_level_effects(new_level: i32) -> Vec<ModifierEffect> {
    let source = format!("Level {}", new_level);
    vec![
        ModifierEffect {
            stat_type: StatType::AttackDamage,
            percentage: HERO_ATTACK_GROWTH,
            source: source.clone(),
        },
        ModifierEffect {
            stat_type: StatType::AttackSpeed,
            percentage: HERO_FIRE_RATE_GROWTH,
            source,
        },
    ]
}
