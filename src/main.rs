// Headless save/load session
//
// Builds a small world, saves it to the default slot, loads it back into a
// fresh world and logs what the restore did. Set RUST_LOG=debug to see every
// candidate file the store tries.

use rampart::config::SaveConfig;
use rampart::game::{ArchetypeBuilders, EnemyKind, HeroKind, ObjectKind, Role, StandardArchetypes, TowerKind, World};
use rampart::geometry::Point;
use rampart::path::{FixedPath, PathProvider};
use rampart::save::SaveManager;

const CONFIG_PATH: &str = "rampart.json";

fn load_config() -> SaveConfig {
    match SaveConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => {
            log::info!("using config from {}", CONFIG_PATH);
            config
        }
        Err(e) => {
            log::debug!("no config at {} ({}), using defaults", CONFIG_PATH, e);
            SaveConfig::default()
        }
    }
}

fn build_demo_world(
    builders: &StandardArchetypes,
    path: &FixedPath,
    config: &SaveConfig,
) -> Result<World, String> {
    let mut world = World::new(config.play_area);
    world.map_id = Some("meadow".to_string());
    let waypoints = path.canonical_waypoints();

    let player_id = world.spawn_now(builders.build_player().map_err(|e| e.to_string())?);

    for (kind, position) in [
        (TowerKind::Arrow, Point::new(120.0, 80.0)),
        (TowerKind::Frost, Point::new(260.0, 240.0)),
    ] {
        let built = builders.build_tower(kind, position).map_err(|e| e.to_string())?;
        let tower_id = world.spawn_now(built.tower);
        if let Some(mut head) = built.head {
            if let ObjectKind::TowerHead(data) = &mut head.kind {
                data.parent = tower_id;
            }
            let head_id = world.spawn_now(head);
            if let Some(ObjectKind::Tower(data)) = world.registry.get_mut(tower_id).map(|t| &mut t.kind) {
                data.head = Some(head_id);
            }
        }
    }

    let mut hero = builders
        .build_hero(HeroKind::Ranger, Point::new(200.0, 150.0), &world.camera)
        .map_err(|e| e.to_string())?;
    if let ObjectKind::Hero(data) = &mut hero.kind {
        data.owner = Some(player_id);
        data.level_up_to(3);
    }
    let hero_id = world.spawn_now(hero);
    if let Some(ObjectKind::Player(data)) = world.registry.get_mut(player_id).map(|p| &mut p.kind) {
        data.heroes.push(hero_id);
    }

    for (kind, start) in [(EnemyKind::Slime, 0), (EnemyKind::Goblin, 1)] {
        let enemy = builders
            .build_enemy(kind, &waypoints, start, world.difficulty)
            .map_err(|e| e.to_string())?;
        world.spawn_now(enemy);
    }

    // Let enemies walk a little so their positions sit between waypoints
    for _ in 0..30 {
        world.update(1.0 / 30.0);
    }

    Ok(world)
}

fn main() -> Result<(), String> {
    env_logger::init();

    let config = load_config();
    let builders = StandardArchetypes::new(Point::new(320.0, 180.0), 100);
    let path = FixedPath::new(vec![
        Point::new(0.0, 180.0),
        Point::new(200.0, 180.0),
        Point::new(200.0, 60.0),
        Point::new(640.0, 60.0),
    ]);

    let world = build_demo_world(&builders, &path, &config)?;
    log::info!(
        "demo world: {} towers, {} heroes, {} enemies",
        world.count(Role::Tower),
        world.count(Role::Hero),
        world.count(Role::Enemy)
    );

    let mut manager = SaveManager::new(config);
    if !manager.save(None, &world) {
        return Err("save failed".to_string());
    }

    let mut restored = World::new(world.play_area);
    let loaded = manager.load(None, &mut restored, &builders, &path);
    restored.end_frame();

    if let Some(report) = manager.last_report() {
        log::info!("restore report: {}", report);
        for failure in &report.failures {
            log::warn!("  {}", failure);
        }
    }
    log::info!(
        "restored world: {} towers, {} heroes, {} enemies on map {:?}",
        restored.count(Role::Tower),
        restored.count(Role::Hero),
        restored.count(Role::Enemy),
        restored.map_id
    );

    if loaded { Ok(()) } else { Err("load failed".to_string()) }
}
