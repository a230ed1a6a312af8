use std::time::Duration;

use approx::assert_relative_eq;
use emberline_core::{
    AimStrategy, Command, EnemyId, EnemyKind, EnemyRoster, EnemyStats, Enchantment, Event,
    RoadArc, TowerId, TowerLoadout, TowerStats, Vec2, WaypointCoord, WorldBounds,
};
use emberline_world::{self as world, query, World};

fn roster() -> EnemyRoster {
    EnemyRoster {
        pig: EnemyStats {
            speed: 1.0,
            full_health: 10.0,
            gold_reward: 1,
        },
        ogre: EnemyStats {
            speed: 0.5,
            full_health: 40.0,
            gold_reward: 4,
        },
    }
}

fn arc(from: (i32, i32), to: (i32, i32), weight: u32) -> RoadArc {
    RoadArc {
        from_x: from.0,
        from_y: from.1,
        to_x: to.0,
        to_y: to.1,
        weight,
    }
}

fn highway() -> World {
    World::new(
        WorldBounds::new(0, 0, 20, 20).expect("bounds"),
        &[arc((0, 5), (19, 5), 1)],
        roster(),
    )
    .expect("world")
}

fn loadout(damage: f64, damage_area: Option<f64>, enchantment: Enchantment) -> TowerLoadout {
    TowerLoadout {
        stats: TowerStats {
            fire_rate: 1.0,
            damage,
            damage_area,
            range: 6.0,
            projectile_speed: 6.0,
        },
        enchantment,
        strategy: AimStrategy::Close,
    }
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn spawn_pig(world: &mut World) -> EnemyId {
    let events = run(
        world,
        Command::SpawnEnemy {
            waypoint: WaypointCoord::new(0, 5),
            kind: EnemyKind::Pig,
        },
    );
    match events.as_slice() {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected spawn outcome: {other:?}"),
    }
}

fn place_tower(world: &mut World, loadout: TowerLoadout) -> TowerId {
    let events = run(
        world,
        Command::PlaceTower {
            position: Vec2::new(5.5, 8.5),
            loadout,
        },
    );
    match events.as_slice() {
        [Event::TowerPlaced { tower, .. }] => *tower,
        other => panic!("unexpected placement outcome: {other:?}"),
    }
}

fn tick(world: &mut World, dt: Duration) -> Vec<Event> {
    run(world, Command::Tick { dt })
}

fn fire(world: &mut World, tower: TowerId, candidates: Vec<EnemyId>) -> Vec<Event> {
    run(world, Command::FireProjectile { tower, candidates })
}

fn launched_flight_time(events: &[Event]) -> i64 {
    match events {
        [Event::ProjectileLaunched { flight_time_ns, .. }] => *flight_time_ns,
        other => panic!("expected a launch: {other:?}"),
    }
}

fn damage_events(events: &[Event]) -> Vec<(EnemyId, f64)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyDamaged { enemy, health, .. } => Some((*enemy, *health)),
            _ => None,
        })
        .collect()
}

#[test]
fn projectile_meets_walking_enemy_at_the_intercept_point() {
    let mut world = highway();
    let enemy = spawn_pig(&mut world);
    let tower = place_tower(&mut world, loadout(4.0, None, Enchantment::None));
    let _ = tick(&mut world, Duration::from_secs(1));

    let launch = fire(&mut world, tower, vec![enemy]);
    let flight_time_ns = launched_flight_time(&launch);
    assert!(flight_time_ns > 0);
    let impact = match launch[0] {
        Event::ProjectileLaunched { impact, target, .. } => {
            assert_eq!(target, enemy);
            impact
        }
        _ => unreachable!(),
    };
    assert_eq!(query::projectile_view(&world).iter().count(), 1);

    let landing = tick(
        &mut world,
        Duration::from_nanos(u64::try_from(flight_time_ns).expect("positive flight")),
    );

    assert!(landing
        .iter()
        .any(|event| matches!(event, Event::ProjectileLanded { position, .. } if *position == impact)));
    assert_eq!(damage_events(&landing), vec![(enemy, 6.0)]);

    let snapshot = query::enemy_view(&world).into_vec()[0];
    assert_relative_eq!(snapshot.position.x, impact.x, epsilon = 1e-6);
    assert_relative_eq!(snapshot.position.y, impact.y, epsilon = 1e-6);
    assert_eq!(query::projectile_view(&world).iter().count(), 0);
}

#[test]
fn area_shots_enchant_every_enemy_in_radius() {
    let mut world = highway();
    let first = spawn_pig(&mut world);
    let second = spawn_pig(&mut world);
    let tower = place_tower(
        &mut world,
        loadout(
            4.0,
            Some(2.0),
            Enchantment::Fire {
                damage_per_second: 2.0,
                duration: 1.0,
            },
        ),
    );
    let _ = tick(&mut world, Duration::from_secs(1));

    let flight_time_ns = launched_flight_time(&fire(&mut world, tower, vec![second, first]));
    let landing = tick(
        &mut world,
        Duration::from_nanos(u64::try_from(flight_time_ns).expect("positive flight")),
    );
    assert_eq!(damage_events(&landing), vec![(first, 6.0), (second, 6.0)]);

    let burning = tick(&mut world, Duration::from_secs(1));
    let burns = damage_events(&burning);
    assert_eq!(burns.len(), 2);
    for (_, health) in burns {
        assert_relative_eq!(health, 4.0, epsilon = 1e-9);
    }

    assert!(damage_events(&tick(&mut world, Duration::from_secs(1))).is_empty());
}

#[test]
fn single_target_shots_hit_only_the_closest_enemy() {
    let mut world = highway();
    let first = spawn_pig(&mut world);
    let second = spawn_pig(&mut world);
    let tower = place_tower(&mut world, loadout(3.0, None, Enchantment::None));
    let _ = tick(&mut world, Duration::from_secs(1));

    let flight_time_ns = launched_flight_time(&fire(&mut world, tower, vec![second, first]));
    let landing = tick(
        &mut world,
        Duration::from_nanos(u64::try_from(flight_time_ns).expect("positive flight")),
    );

    assert_eq!(damage_events(&landing), vec![(first, 7.0)]);
}

#[test]
fn lethal_hits_remove_the_enemy_from_the_index() {
    let mut world = highway();
    let enemy = spawn_pig(&mut world);
    let tower = place_tower(&mut world, loadout(25.0, None, Enchantment::None));
    let _ = tick(&mut world, Duration::from_secs(1));

    let flight_time_ns = launched_flight_time(&fire(&mut world, tower, vec![enemy]));
    let landing = tick(
        &mut world,
        Duration::from_nanos(u64::try_from(flight_time_ns).expect("positive flight")),
    );

    assert_eq!(landing.last(), Some(&Event::EnemyDied { enemy }));
    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::indexed_enemy_count(&world), 0);
}

#[test]
fn enemies_reaching_the_end_of_the_road_arrive_and_leave() {
    let mut world = highway();
    let enemy = spawn_pig(&mut world);

    let events = tick(&mut world, Duration::from_secs(60));

    assert_eq!(events.last(), Some(&Event::EnemyArrived { enemy }));
    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::indexed_enemy_count(&world), 0);
}

#[test]
fn towers_must_cool_down_before_firing() {
    let mut world = highway();
    let enemy = spawn_pig(&mut world);
    let tower = place_tower(&mut world, loadout(1.0, None, Enchantment::None));

    assert_eq!(
        fire(&mut world, tower, vec![enemy]),
        vec![Event::ShotSkipped { tower }]
    );
    assert_eq!(
        fire(&mut world, TowerId::new(7), vec![enemy]),
        vec![Event::TowerMissing {
            tower: TowerId::new(7)
        }]
    );

    let _ = tick(&mut world, Duration::from_secs(1));
    let _ = launched_flight_time(&fire(&mut world, tower, vec![enemy]));
    assert_eq!(
        fire(&mut world, tower, vec![enemy]),
        vec![Event::ShotSkipped { tower }]
    );
}

#[test]
fn unreachable_candidates_keep_the_tower_ready() {
    let mut world = highway();
    let enemy = spawn_pig(&mut world);
    let mut slow = loadout(1.0, None, Enchantment::None);
    slow.stats.projectile_speed = 0.1;
    let tower = place_tower(&mut world, slow);
    let _ = tick(&mut world, Duration::from_secs(1));

    assert_eq!(
        fire(&mut world, tower, vec![EnemyId::new(42), enemy]),
        vec![Event::ShotSkipped { tower }]
    );
    let cooldown = query::tower_cooldowns(&world).into_vec()[0];
    assert_eq!(cooldown.ready_in, Duration::ZERO);
}

#[test]
fn ice_slows_enemies_hit_by_the_tower() {
    let mut world = highway();
    let enemy = spawn_pig(&mut world);
    let tower = place_tower(
        &mut world,
        loadout(
            1.0,
            None,
            Enchantment::Ice {
                slowing_factor: 0.5,
                duration: 10.0,
            },
        ),
    );
    let _ = tick(&mut world, Duration::from_secs(1));

    let flight_time_ns = launched_flight_time(&fire(&mut world, tower, vec![enemy]));
    let _ = tick(
        &mut world,
        Duration::from_nanos(u64::try_from(flight_time_ns).expect("positive flight")),
    );
    let before = query::enemy_view(&world).into_vec()[0].position;

    let _ = tick(&mut world, Duration::from_secs(2));
    let after = query::enemy_view(&world).into_vec()[0].position;

    assert_relative_eq!(after.x - before.x, 1.0, epsilon = 1e-9);
}

#[test]
fn weighted_junction_splits_successive_spawns() {
    let mut world = World::new(
        WorldBounds::new(0, 0, 10, 10).expect("bounds"),
        &[arc((0, 0), (5, 0), 3), arc((0, 0), (0, 5), 1)],
        roster(),
    )
    .expect("world");

    let mut branches = Vec::new();
    for _ in 0..8 {
        let events = run(
            &mut world,
            Command::SpawnEnemy {
                waypoint: WaypointCoord::new(0, 0),
                kind: EnemyKind::Ogre,
            },
        );
        let Event::EnemySpawned { enemy, .. } = events[0] else {
            panic!("spawn rejected: {events:?}");
        };
        let plan = query::planned_motion(&world, enemy, 1_000_000_000).expect("enemy");
        branches.push(if plan[0].velocity.x > 0.0 { 'A' } else { 'B' });
    }

    assert_eq!(branches, vec!['A', 'A', 'A', 'B', 'A', 'A', 'A', 'B']);
}

#[test]
fn enemies_near_reports_hittable_enemies_in_radius() {
    let mut world = highway();
    let enemy = spawn_pig(&mut world);

    let near = query::enemies_near(&world, Vec2::new(0.55, 5.55), 0.1);
    assert_eq!(near.len(), 1);
    assert_eq!(near[0].id, enemy);
    assert!(query::enemies_near(&world, Vec2::new(10.0, 10.0), 0.1).is_empty());
}
