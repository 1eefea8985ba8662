//! World restorer
//!
//! Rebuilds a live world from a decoded snapshot.
//!
//! # Restore order
//!
//! 1. **Player**: the existing live player is overwritten in place, or one is
//!    built if none exists. Never duplicated.
//! 2. **Clear**: every tower (with its head) and every enemy is despawned.
//!    Heroes are not cleared, so restoring into a world that already has
//!    heroes keeps them alongside the restored ones.
//! 3. **Towers**: rebuilt through the archetype builders; a head sub-object
//!    is registered next to its tower.
//! 4. **Heroes**: always built fresh, attached to the player and levelled up
//!    through the normal upgrade path before health and base attack are
//!    overwritten.
//! 5. **Enemies**: rebuilt on the map path, starting at the waypoint picked by
//!    `resolve_start_index`, or anchored on a one-point path at their saved
//!    position when no path is available.
//!
//! Every registration and removal goes through the command queue, so nothing
//! is visible in the registry until the queue is applied at end of frame. The
//! player overwrite is the one in-place edit.
//!
//! # Failure model
//!
//! Unknown kinds fall back to the kind's default and builder errors skip the
//! entry; both are recorded in the `RestoreReport`. There is no rollback: a
//! restore with failures leaves a partially restored world.

use super::report::{PlayerOutcome, RestoreReport, Section};
use super::types::{Archetype, EnemySnapshot, HeroSnapshot, PlayerSnapshot, Snapshot, TowerSnapshot};
use crate::bounds::PlayArea;
use crate::game::{
    ArchetypeBuilders, Camera, CommandQueue, Difficulty, GameObject, LiveRegistry, ObjectId, ObjectKind, Role,
    Wallet, World,
};
use crate::geometry::Point;
use crate::path::resolve_start_index;
use crate::stats::MAX_HERO_LEVEL;

/// Everything a restore reads from or writes to
pub struct RestoreContext<'a> {
    pub registry: &'a mut LiveRegistry,
    pub commands: &'a mut CommandQueue,
    pub builders: &'a dyn ArchetypeBuilders,
    pub camera: Camera,
    pub difficulty: Difficulty,
    pub play_area: PlayArea,
    /// Canonical path of the current map; empty when unavailable
    pub waypoints: &'a [Point],
}

impl<'a> RestoreContext<'a> {
    pub fn for_world(world: &'a mut World, builders: &'a dyn ArchetypeBuilders, waypoints: &'a [Point]) -> Self {
        RestoreContext {
            registry: &mut world.registry,
            commands: &mut world.commands,
            builders,
            camera: world.camera,
            difficulty: world.difficulty,
            play_area: world.play_area,
            waypoints,
        }
    }
}

/// The player heroes get attached to
enum PlayerSlot {
    Live(ObjectId),
    /// Spawned by an earlier restore this frame, still in the queue
    Queued(ObjectId),
    /// Built during this restore, spawned once heroes are attached
    New(GameObject),
    Missing,
}

impl PlayerSlot {
    fn id(&self) -> Option<ObjectId> {
        match self {
            PlayerSlot::Live(id) | PlayerSlot::Queued(id) => Some(*id),
            PlayerSlot::New(object) => Some(object.id),
            PlayerSlot::Missing => None,
        }
    }

    fn object_mut<'s>(&'s mut self, ctx: &'s mut RestoreContext<'_>) -> Option<&'s mut GameObject> {
        match self {
            PlayerSlot::Live(id) => ctx.registry.get_mut(*id),
            PlayerSlot::Queued(_) => ctx.commands.queued_spawn_mut(Role::Player),
            PlayerSlot::New(object) => Some(object),
            PlayerSlot::Missing => None,
        }
    }
}

/// Restores `snapshot` into the world described by `ctx`.
pub fn restore(snapshot: &Snapshot, ctx: &mut RestoreContext) -> RestoreReport {
    let mut report = RestoreReport::default();

    let mut player = restore_player(snapshot.player.as_ref(), ctx, &mut report);

    ctx.commands.despawn_roles(&[Role::Tower, Role::Enemy]);

    for (index, entry) in snapshot.towers.iter().enumerate() {
        restore_tower(index, entry, ctx, &mut report);
    }

    for (index, entry) in snapshot.heroes.iter().enumerate() {
        restore_hero(index, entry, &mut player, ctx, &mut report);
    }

    if let PlayerSlot::New(object) = player {
        ctx.commands.spawn(object);
    }

    for (index, entry) in snapshot.enemies.iter().enumerate() {
        restore_enemy(index, entry, ctx, &mut report);
    }

    report
}

fn unwrap_kind<K: Copy + Default + std::fmt::Debug>(
    kind: &Archetype<K>,
    section: Section,
    index: usize,
    report: &mut RestoreReport,
) -> K {
    match kind {
        Archetype::Known(kind) => *kind,
        Archetype::Unrecognized(name) => {
            let fallback = K::default();
            report.substitute(section, index, name, fallback);
            fallback
        }
    }
}

fn apply_player_fields(object: &mut GameObject, saved: &PlayerSnapshot, play_area: &PlayArea) {
    object.position = play_area.clamp(saved.position);
    object.restore_health(saved.health);

    let (coins, gems, essence) = saved.balances();
    if let ObjectKind::Player(data) = &mut object.kind {
        data.wallet = Some(Wallet {
            coins: coins.max(0),
            gems: gems.max(0),
            essence: essence.max(0),
        });
    }
    if let Some(body) = object.body.as_mut() {
        body.stop();
    }
}

fn restore_player(saved: Option<&PlayerSnapshot>, ctx: &mut RestoreContext, report: &mut RestoreReport) -> PlayerSlot {
    // A live player, or one a restore earlier this frame already queued
    let mut existing = match ctx.registry.first_id(Role::Player) {
        Some(id) => PlayerSlot::Live(id),
        None => match ctx.commands.queued_spawn_mut(Role::Player) {
            Some(object) => PlayerSlot::Queued(object.id),
            None => PlayerSlot::Missing,
        },
    };

    if let Some(id) = existing.id() {
        let play_area = ctx.play_area;
        match (saved, existing.object_mut(ctx)) {
            (Some(saved), Some(object)) => {
                apply_player_fields(object, saved, &play_area);
                report.player = PlayerOutcome::Updated(id);
            }
            _ => report.player = PlayerOutcome::Untouched,
        }
        return existing;
    }

    match ctx.builders.build_player() {
        Ok(mut object) => {
            if let Some(saved) = saved {
                apply_player_fields(&mut object, saved, &ctx.play_area);
            } else {
                object.position = ctx.play_area.clamp(object.position);
            }
            let id = ctx.registry.assign_id(&mut object);
            report.player = PlayerOutcome::Created(id);
            PlayerSlot::New(object)
        }
        Err(e) => {
            report.fail(Section::Player, 0, &e);
            report.player = PlayerOutcome::Failed(e.to_string());
            PlayerSlot::Missing
        }
    }
}

fn restore_tower(index: usize, saved: &TowerSnapshot, ctx: &mut RestoreContext, report: &mut RestoreReport) {
    let kind = unwrap_kind(&saved.kind, Section::Tower, index, report);
    let position = ctx.play_area.clamp(saved.position);

    let built = match ctx.builders.build_tower(kind, position) {
        Ok(built) => built,
        Err(e) => return report.fail(Section::Tower, index, e),
    };

    let mut tower = built.tower;
    tower.position = position;
    tower.restore_health(saved.health);
    let tower_id = ctx.registry.assign_id(&mut tower);

    let head = built.head.map(|mut head| {
        head.position = position;
        if let ObjectKind::TowerHead(data) = &mut head.kind {
            data.parent = tower_id;
        }
        ctx.registry.assign_id(&mut head);
        head
    });

    if let ObjectKind::Tower(data) = &mut tower.kind {
        data.attack_cooldown = if saved.attack_cooldown.is_finite() {
            saved.attack_cooldown.max(0.0)
        } else {
            0.0
        };
        data.level_a = saved.level_a.max(0);
        data.level_b = saved.level_b.max(0);
        data.head = head.as_ref().map(|h| h.id);
    }

    ctx.commands.spawn(tower);
    if let Some(head) = head {
        ctx.commands.spawn(head);
        report.heads_registered += 1;
    }
    report.towers_restored += 1;
}

fn restore_hero(
    index: usize,
    saved: &HeroSnapshot,
    player: &mut PlayerSlot,
    ctx: &mut RestoreContext,
    report: &mut RestoreReport,
) {
    let kind = unwrap_kind(&saved.kind, Section::Hero, index, report);
    let position = ctx.play_area.clamp(saved.position);

    let mut hero = match ctx.builders.build_hero(kind, position, &ctx.camera) {
        Ok(hero) => hero,
        Err(e) => return report.fail(Section::Hero, index, e),
    };
    hero.position = position;
    let hero_id = ctx.registry.assign_id(&mut hero);

    let level = saved.level.clamp(1, MAX_HERO_LEVEL);
    if level != saved.level {
        report.clamp(Section::Hero, index, "level", saved.level.into(), level.into());
    }

    if let ObjectKind::Hero(data) = &mut hero.kind {
        data.owner = player.id();
        data.level_up_to(level);
        data.base_attack = saved.base_attack.max(0);
    }
    hero.restore_health(saved.health);

    if let Some(ObjectKind::Player(data)) = player.object_mut(ctx).map(|o| &mut o.kind) {
        data.heroes.push(hero_id);
    }

    ctx.commands.spawn(hero);
    report.heroes_restored += 1;
}

fn restore_enemy(index: usize, saved: &EnemySnapshot, ctx: &mut RestoreContext, report: &mut RestoreReport) {
    let kind = unwrap_kind(&saved.kind, Section::Enemy, index, report);
    let position = ctx.play_area.clamp(saved.position);

    let anchored = ctx.waypoints.is_empty();
    let built = if anchored {
        ctx.builders.build_enemy(kind, &[position], 0, ctx.difficulty)
    } else {
        let start = resolve_start_index(ctx.waypoints, position);
        ctx.builders.build_enemy(kind, ctx.waypoints, start, ctx.difficulty)
    };

    let mut enemy = match built {
        Ok(enemy) => enemy,
        Err(e) => return report.fail(Section::Enemy, index, e),
    };

    enemy.position = position;
    enemy.restore_health(saved.health);
    if let Some(body) = enemy.body.as_mut() {
        body.stop();
    }

    ctx.commands.spawn(enemy);
    report.enemies_restored += 1;
    if anchored {
        report.enemies_without_path += 1;
    }
}
