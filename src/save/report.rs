//! Restore diagnostics
//!
//! A restore never stops at a bad entry. Everything it substituted or had
//! to skip is collected here so the caller can log it or show a toast.

use crate::game::ObjectId;
use std::fmt;

/// Which snapshot list an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Player,
    Tower,
    Hero,
    Enemy,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Section::Player => "player",
            Section::Tower => "tower",
            Section::Hero => "hero",
            Section::Enemy => "enemy",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlayerOutcome {
    /// Snapshot had no player and a live one already existed
    #[default]
    Untouched,
    /// The existing live player was overwritten in place
    Updated(ObjectId),
    /// No live player existed, so one was built
    Created(ObjectId),
    Failed(String),
}

/// An unrecognized kind replaced by a default
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub section: Section,
    pub index: usize,
    pub requested: String,
    pub used: String,
}

/// A saved number outside what this build accepts, replaced by the nearest
/// accepted value
#[derive(Debug, Clone, PartialEq)]
pub struct ClampedValue {
    pub section: Section,
    pub index: usize,
    pub field: &'static str,
    pub requested: i64,
    pub used: i64,
}

/// An entry that could not be rebuilt and was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFailure {
    pub section: Section,
    pub index: usize,
    pub reason: String,
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} #{}: {}", self.section, self.index, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestoreReport {
    pub player: PlayerOutcome,
    pub towers_restored: usize,
    pub heads_registered: usize,
    pub heroes_restored: usize,
    pub enemies_restored: usize,
    /// Enemies anchored in place because the map path was unavailable
    pub enemies_without_path: usize,
    pub substitutions: Vec<Substitution>,
    pub clamped: Vec<ClampedValue>,
    pub failures: Vec<EntryFailure>,
}

impl RestoreReport {
    /// True when nothing was substituted, clamped or skipped
    pub fn is_clean(&self) -> bool {
        self.substitutions.is_empty() && self.clamped.is_empty() && self.failures.is_empty()
    }

    pub(crate) fn substitute(&mut self, section: Section, index: usize, requested: &str, used: impl fmt::Debug) {
        let used = format!("{:?}", used);
        log::warn!("{} #{}: unknown kind '{}', restoring as {}", section, index, requested, used);
        self.substitutions.push(Substitution {
            section,
            index,
            requested: requested.to_string(),
            used,
        });
    }

    pub(crate) fn clamp(&mut self, section: Section, index: usize, field: &'static str, requested: i64, used: i64) {
        log::warn!("{} #{}: {} {} out of range, restoring as {}", section, index, field, requested, used);
        self.clamped.push(ClampedValue {
            section,
            index,
            field,
            requested,
            used,
        });
    }

    pub(crate) fn fail(&mut self, section: Section, index: usize, reason: impl fmt::Display) {
        let failure = EntryFailure {
            section,
            index,
            reason: reason.to_string(),
        };
        log::error!("skipping {}", failure);
        self.failures.push(failure);
    }
}

impl fmt::Display for RestoreReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} towers ({} heads), {} heroes, {} enemies ({} off-path), {} substitutions, {} clamped, {} failures",
            self.towers_restored,
            self.heads_registered,
            self.heroes_restored,
            self.enemies_restored,
            self.enemies_without_path,
            self.substitutions.len(),
            self.clamped.len(),
            self.failures.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TowerKind;

    #[test]
    fn test_report_tracks_problems() {
        let mut report = RestoreReport::default();
        assert!(report.is_clean());

        report.substitute(Section::Tower, 2, "Laser", TowerKind::Arrow);
        report.fail(Section::Enemy, 0, "Missing asset: ogre.png");
        report.clamp(Section::Hero, 1, "level", 900, 50);

        assert!(!report.is_clean());
        assert_eq!(report.substitutions[0].used, "Arrow");
        assert_eq!(report.failures[0].to_string(), "enemy #0: Missing asset: ogre.png");
        assert_eq!(report.clamped[0].used, 50);
    }
}
