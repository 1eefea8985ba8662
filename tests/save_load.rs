//! End-to-end save/load behaviour: live world -> slot file -> live world.
//!
//! Every test gets its own `TempDir`, and restores
//! only become visible after `World::end_frame()`.

use rampart::bounds::PlayArea;
use rampart::config::SaveConfig;
use rampart::game::{
    ArchetypeBuilders, ArchetypeError, BuiltTower, Camera, Difficulty, EnemyKind, GameObject, HeroKind, ObjectKind,
    PlayerData, Role, StandardArchetypes, TowerKind, Wallet, World,
};
use rampart::geometry::Point;
use rampart::path::{FixedPath, PathProvider};
use rampart::stats::MAX_HERO_LEVEL;
use rampart::save::{
    Archetype, PlayerOutcome, PlayerSnapshot, SaveManager, Section, Snapshot, TowerSnapshot, build_snapshot, codec,
};
use std::fs;
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn map_path() -> FixedPath {
    FixedPath::new(vec![
        Point::new(0.0, 100.0),
        Point::new(100.0, 100.0),
        Point::new(100.0, 300.0),
        Point::new(500.0, 300.0),
    ])
}

fn builders() -> StandardArchetypes {
    StandardArchetypes::new(Point::new(320.0, 180.0), 50)
}

/// Player, two towers (one with a head), a levelled hero and two enemies
/// partway along the path.
fn populated_world(builders: &StandardArchetypes) -> World {
    let mut world = World::new(PlayArea::default());
    world.map_id = Some("meadow".to_string());

    let player_id = world.spawn_now(builders.build_player().expect("player"));

    for (kind, position) in [
        (TowerKind::Cannon, Point::new(150.0, 50.0)),
        (TowerKind::Frost, Point::new(250.0, 200.0)),
    ] {
        let built = builders.build_tower(kind, position).expect("tower");
        let tower_id = world.spawn_now(built.tower);
        if let Some(mut head) = built.head {
            if let ObjectKind::TowerHead(data) = &mut head.kind {
                data.parent = tower_id;
            }
            world.spawn_now(head);
        }
    }

    let mut hero = builders
        .build_hero(HeroKind::Mage, Point::new(60.0, 60.0), &Camera::default())
        .expect("hero");
    if let ObjectKind::Hero(data) = &mut hero.kind {
        data.owner = Some(player_id);
        data.level_up_to(4);
    }
    world.spawn_now(hero);

    let waypoints = map_path().canonical_waypoints();
    for (kind, start) in [(EnemyKind::Goblin, 1), (EnemyKind::Ogre, 2)] {
        world.spawn_now(builders.build_enemy(kind, &waypoints, start, Difficulty::Normal).expect("enemy"));
    }
    world.update(0.5);

    world
}

fn kinds_by_role(world: &World) -> (Vec<TowerKind>, Vec<EnemyKind>) {
    let towers = world.registry.with_role(Role::Tower).filter_map(|o| o.as_tower()).map(|t| t.kind).collect();
    let enemies = world.registry.with_role(Role::Enemy).filter_map(|o| o.as_enemy()).map(|e| e.kind).collect();
    (towers, enemies)
}

#[test]
fn snapshot_survives_encode_and_decode() {
    init_logging();
    let world = populated_world(&builders());

    let snapshot = build_snapshot(&world.registry, world.map_id.as_deref());
    let decoded = codec::decode(&codec::encode(&snapshot).expect("encode")).expect("decode");

    assert_eq!(decoded, snapshot);
    assert_eq!(decoded.towers.len(), 2);
    assert_eq!(decoded.enemies.len(), 2);
}

#[test]
fn save_then_load_reproduces_the_world() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    let builders = builders();
    let world = populated_world(&builders);
    let mut manager = SaveManager::new(SaveConfig::with_save_dir(&dir));

    assert!(manager.save(Some("run"), &world));

    let mut restored = World::new(PlayArea::default());
    assert!(manager.load(Some("run"), &mut restored, &builders, &map_path()));
    restored.end_frame();

    let before = build_snapshot(&world.registry, world.map_id.as_deref());
    let after = build_snapshot(&restored.registry, restored.map_id.as_deref());
    assert_eq!(after.map_id, before.map_id);
    assert_eq!(after.player, before.player);
    assert_eq!(after.towers, before.towers);
    assert_eq!(after.heroes, before.heroes);
    assert_eq!(after.enemies, before.enemies);

    // The cannon's head came back with it
    assert_eq!(restored.count(Role::TowerHead), 1);
}

#[test]
fn restoring_twice_does_not_duplicate() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    let builders = builders();
    let mut manager = SaveManager::new(SaveConfig::with_save_dir(&dir));
    manager.save(None, &populated_world(&builders));

    let mut world = World::new(PlayArea::default());
    assert!(manager.load(None, &mut world, &builders, &map_path()));
    world.end_frame();
    let first = kinds_by_role(&world);
    let heads = world.count(Role::TowerHead);

    assert!(manager.load(None, &mut world, &builders, &map_path()));
    world.end_frame();

    assert_eq!(kinds_by_role(&world), first);
    assert_eq!(world.count(Role::TowerHead), heads);
    assert_eq!(world.count(Role::Player), 1);
}

#[test]
fn restoring_twice_in_one_frame_does_not_duplicate() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    let builders = builders();
    let mut manager = SaveManager::new(SaveConfig::with_save_dir(&dir));
    manager.save(None, &populated_world(&builders));

    let mut world = World::new(PlayArea::default());
    assert!(manager.load(None, &mut world, &builders, &map_path()));
    assert!(manager.load(None, &mut world, &builders, &map_path()));
    world.end_frame();

    let (towers, enemies) = kinds_by_role(&world);
    assert_eq!(towers, vec![TowerKind::Cannon, TowerKind::Frost]);
    assert_eq!(enemies, vec![EnemyKind::Goblin, EnemyKind::Ogre]);
    assert_eq!(world.count(Role::Player), 1);
}

#[test]
fn unknown_tower_kind_restores_as_default() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    fs::write(
        dir.join("future.json"),
        br#"{ "version": 2, "towers": [{ "kind": "Railgun", "position": { "x": 10.0, "y": 20.0 }, "health": 80 }] }"#,
    )
    .expect("write save");

    let builders = builders();
    let mut manager = SaveManager::new(SaveConfig::with_save_dir(&dir));
    let mut world = World::new(PlayArea::default());

    assert!(manager.load(Some("future"), &mut world, &builders, &map_path()));
    world.end_frame();

    let report = manager.last_report().expect("report");
    assert_eq!(report.substitutions.len(), 1);
    assert_eq!(report.substitutions[0].requested, "Railgun");
    assert!(report.failures.is_empty());

    let tower = world.registry.with_role(Role::Tower).next().expect("tower");
    assert_eq!(tower.as_tower().map(|t| t.kind), Some(TowerKind::default()));
    assert_eq!(tower.health_or_zero(), 80);
}

#[test]
fn out_of_bounds_player_is_clamped() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    let store_manager = SaveManager::new(SaveConfig::with_save_dir(&dir));
    let mut snapshot = Snapshot::new(None);
    snapshot.player = Some(PlayerSnapshot {
        position: Point::new(-5.0, 999.0),
        health: 6,
        coins: 10,
        ..PlayerSnapshot::default()
    });
    store_manager.store().write("edge", &snapshot).expect("write");

    let mut manager = store_manager;
    let mut world = World::new(PlayArea::default());
    assert!(manager.load(Some("edge"), &mut world, &builders(), &map_path()));
    world.end_frame();

    let player = world.player().expect("player");
    assert!(world.play_area.contains(player.position));
    assert_eq!(player.position, Point::new(0.0, 360.0));
}

#[test]
fn missing_slot_leaves_world_untouched() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    let builders = builders();
    let mut manager = SaveManager::new(SaveConfig::with_save_dir(&dir));
    let mut world = populated_world(&builders);
    let before = world.registry.iter().cloned().collect::<Vec<_>>();

    assert!(!manager.load(Some("nonexistent"), &mut world, &builders, &map_path()));

    assert!(world.commands.is_empty());
    world.end_frame();
    assert_eq!(world.registry.iter().cloned().collect::<Vec<_>>(), before);
    assert_eq!(world.map_id.as_deref(), Some("meadow"));
    assert!(manager.last_report().is_none());
}

#[test]
fn live_player_is_merged_not_duplicated() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    let builders = builders();
    let mut manager = SaveManager::new(SaveConfig::with_save_dir(&dir));

    let mut saved_world = World::new(PlayArea::default());
    let player = GameObject::new(
        Point::new(400.0, 100.0),
        ObjectKind::Player(PlayerData {
            wallet: Some(Wallet { coins: 999, gems: 4, essence: 2 }),
            heroes: Vec::new(),
        }),
    )
    .with_health(3);
    saved_world.spawn_now(player);
    manager.save(None, &saved_world);

    let mut world = World::new(PlayArea::default());
    let live_id = world.spawn_now(builders.build_player().expect("player"));

    assert!(manager.load(None, &mut world, &builders, &map_path()));
    world.end_frame();

    assert_eq!(world.count(Role::Player), 1);
    assert_eq!(manager.last_report().map(|r| r.player.clone()), Some(PlayerOutcome::Updated(live_id)));

    let player = world.player().expect("player");
    assert_eq!(player.id, live_id);
    assert_eq!(player.position, Point::new(400.0, 100.0));
    assert_eq!(player.health_or_zero(), 3);
    assert_eq!(
        player.as_player().and_then(|p| p.wallet),
        Some(Wallet { coins: 999, gems: 4, essence: 2 })
    );
}

#[test]
fn legacy_gold_becomes_coins() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    fs::write(dir.join("old.json"), br#"{ "player": { "position": { "x": 5.0, "y": 5.0 }, "health": 9, "gold": 250 } }"#)
        .expect("write save");

    let mut manager = SaveManager::new(SaveConfig::with_save_dir(&dir));
    let mut world = World::new(PlayArea::default());
    assert!(manager.load(Some("old"), &mut world, &builders(), &map_path()));
    world.end_frame();

    let wallet = world.player().and_then(|p| p.as_player()).and_then(|p| p.wallet);
    assert_eq!(wallet.map(|w| w.coins), Some(250));
}

// Heroes are not cleared before a restore. This pins that: a hero already
// in the world stays and the saved heroes are added next to it.
#[test]
fn restoring_into_world_with_hero_keeps_existing_hero() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    let builders = builders();
    let mut manager = SaveManager::new(SaveConfig::with_save_dir(&dir));
    manager.save(None, &populated_world(&builders));

    let mut world = World::new(PlayArea::default());
    world.spawn_now(builders.build_player().expect("player"));
    world.spawn_now(
        builders
            .build_hero(HeroKind::Knight, Point::new(10.0, 10.0), &Camera::default())
            .expect("hero"),
    );

    assert!(manager.load(None, &mut world, &builders, &map_path()));
    world.end_frame();

    assert_eq!(world.count(Role::Hero), 2);
    let kinds: Vec<_> = world.registry.with_role(Role::Hero).filter_map(|o| o.as_hero()).map(|h| h.kind).collect();
    assert_eq!(kinds, vec![HeroKind::Knight, HeroKind::Mage]);
}

#[test]
fn restored_hero_rederives_level_bonuses() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    let builders = builders();
    let world = populated_world(&builders);
    let original = world.registry.with_role(Role::Hero).next().and_then(|o| o.as_hero()).cloned().expect("hero");

    let mut manager = SaveManager::new(SaveConfig::with_save_dir(&dir));
    manager.save(None, &world);
    let mut restored = World::new(PlayArea::default());
    manager.load(None, &mut restored, &builders, &map_path());
    restored.end_frame();

    let hero = restored.registry.with_role(Role::Hero).next().and_then(|o| o.as_hero()).expect("hero");
    assert_eq!(hero.level, 4);
    assert_eq!(hero.modifiers, original.modifiers);
    assert_eq!(hero.attack(), original.attack());
    assert_eq!(hero.fire_rate(), original.fire_rate());

    let player_id = restored.player().map(|p| p.id);
    assert_eq!(hero.owner, player_id);
}

#[test]
fn enemies_without_a_path_stay_put() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    let builders = builders();
    let world = populated_world(&builders);
    let saved_positions: Vec<_> = world.registry.with_role(Role::Enemy).map(|e| e.position).collect();

    let mut manager = SaveManager::new(SaveConfig::with_save_dir(&dir));
    manager.save(None, &world);
    assert!(manager.load_to_pending(None));
    assert_eq!(manager.pending_map_id(), Some("meadow"));

    let mut restored = World::new(PlayArea::default());
    assert!(manager.apply_pending(&mut restored, &builders, None));
    restored.end_frame();
    assert_eq!(manager.last_report().map(|r| r.enemies_without_path), Some(2));

    for _ in 0..10 {
        restored.update(0.1);
    }
    let positions: Vec<_> = restored.registry.with_role(Role::Enemy).map(|e| e.position).collect();
    assert_eq!(positions, saved_positions);
}

/// Stock builders, except one enemy kind whose assets are missing
struct MissingOgreAssets(StandardArchetypes);

impl ArchetypeBuilders for MissingOgreAssets {
    fn build_player(&self) -> Result<GameObject, ArchetypeError> {
        self.0.build_player()
    }

    fn build_tower(&self, kind: TowerKind, position: Point) -> Result<BuiltTower, ArchetypeError> {
        self.0.build_tower(kind, position)
    }

    fn build_hero(&self, kind: HeroKind, position: Point, camera: &Camera) -> Result<GameObject, ArchetypeError> {
        self.0.build_hero(kind, position, camera)
    }

    fn build_enemy(
        &self,
        kind: EnemyKind,
        waypoints: &[Point],
        start_index: usize,
        difficulty: Difficulty,
    ) -> Result<GameObject, ArchetypeError> {
        if kind == EnemyKind::Ogre {
            return Err(ArchetypeError::MissingAsset("ogre.png".to_string()));
        }
        self.0.build_enemy(kind, waypoints, start_index, difficulty)
    }
}

#[test]
fn failing_entry_is_skipped_and_reported() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    let mut manager = SaveManager::new(SaveConfig::with_save_dir(&dir));
    manager.save(None, &populated_world(&builders()));

    let failing = MissingOgreAssets(builders());
    let mut world = World::new(PlayArea::default());
    assert!(!manager.load(None, &mut world, &failing, &map_path()));
    world.end_frame();

    let report = manager.last_report().expect("report");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].section, Section::Enemy);
    assert_eq!(report.failures[0].index, 1);

    // Everything else still came back
    assert_eq!(report.towers_restored, 2);
    assert_eq!(report.heroes_restored, 1);
    assert_eq!(kinds_by_role(&world).1, vec![EnemyKind::Goblin]);
}

#[test]
fn hand_written_snapshot_with_bad_values_is_sanitized() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    let dir = tmp.path().to_path_buf();
    let manager = SaveManager::new(SaveConfig::with_save_dir(&dir));
    let mut snapshot = Snapshot::new(Some("meadow".to_string()));
    snapshot.towers.push(TowerSnapshot {
        kind: Archetype::Known(TowerKind::Tesla),
        position: Point::new(700.0, -40.0),
        health: -20,
        attack_cooldown: -1.0,
        level_a: -3,
        level_b: 2,
    });
    manager.store().write("odd", &snapshot).expect("write");

    let mut manager = manager;
    let mut world = World::new(PlayArea::default());
    assert!(manager.load(Some("odd"), &mut world, &builders(), &map_path()));
    world.end_frame();

    let tower = world.registry.with_role(Role::Tower).next().expect("tower");
    let data = tower.as_tower().expect("tower data");
    assert_eq!(tower.position, Point::new(640.0, 0.0));
    assert_eq!(tower.health_or_zero(), 0);
    assert_eq!(data.attack_cooldown, 0.0);
    assert_eq!((data.level_a, data.level_b), (0, 2));
}

#[test]
fn absurd_hero_level_is_capped() {
    init_logging();
    let tmp = TempDir::new().expect("temp dir");
    fs::write(
        tmp.path().join("tampered.json"),
        br#"{ "heroes": [{ "kind": "Knight", "position": { "x": 20.0, "y": 20.0 }, "health": 40, "level": 2147483647 }] }"#,
    )
    .expect("write save");

    let mut manager = SaveManager::new(SaveConfig::with_save_dir(tmp.path()));
    let mut world = World::new(PlayArea::default());
    assert!(manager.load(Some("tampered"), &mut world, &builders(), &map_path()));
    world.end_frame();

    let report = manager.last_report().expect("report");
    assert_eq!(report.heroes_restored, 1);
    assert_eq!(report.clamped.len(), 1);
    assert_eq!(report.clamped[0].section, Section::Hero);

    let hero = world.registry.with_role(Role::Hero).next().and_then(|o| o.as_hero()).expect("hero");
    assert_eq!(hero.kind, HeroKind::Knight);
    assert_eq!(hero.level, MAX_HERO_LEVEL);
}
