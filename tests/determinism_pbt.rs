//! Determinism, ordering, and conservation properties over whole worlds.

use proptest::prelude::*;
use tankworld::data::{Entity, Vec2};
use tankworld::tracker::events::SimEvent;
use tankworld::{verify_determinism, AppConfig, Command, World};

fn busy_config(initial_fish: usize) -> AppConfig {
    let mut config = AppConfig::default();
    config.world.initial_fish = initial_fish;
    config
}

#[test]
fn ten_thousand_frames_are_bit_identical() {
    let config = busy_config(8);
    verify_determinism(&config, 42, 10_000).expect("snapshot streams must match");
}

#[test]
fn different_seeds_diverge() {
    let mut a = World::new(busy_config(20), 1).unwrap();
    let mut b = World::new(busy_config(20), 2).unwrap();
    a.run_until(50);
    b.run_until(50);
    let sa = serde_json::to_string(&a.snapshot()).unwrap();
    let sb = serde_json::to_string(&b.snapshot()).unwrap();
    assert_ne!(sa, sb);
}

#[test]
fn command_permutations_do_not_change_snapshots() {
    let commands = vec![
        Command::AddFood {
            pos: Some(Vec2::new(100.0, 50.0)),
        },
        Command::SpawnFish {
            genome: None,
            pos: Some(Vec2::new(200.0, 200.0)),
        },
        Command::SpawnCrab {
            pos: Some(Vec2::new(600.0, 400.0)),
        },
        Command::AddFood {
            pos: Some(Vec2::new(700.0, 50.0)),
        },
    ];
    let mut forward = World::new(busy_config(10), 42).unwrap();
    let mut backward = World::new(busy_config(10), 42).unwrap();
    for command in commands.iter().cloned() {
        forward.enqueue(command);
    }
    for command in commands.iter().rev().cloned() {
        backward.enqueue(command);
    }
    for _ in 0..50 {
        forward.tick();
        backward.tick();
        let a = serde_json::to_string(&forward.snapshot()).unwrap();
        let b = serde_json::to_string(&backward.snapshot()).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn events_within_a_tick_appear_in_phase_order() {
    let mut world = World::new(busy_config(50), 42).unwrap();
    for _ in 0..150 {
        world.tick();
        let snapshot = world.snapshot();
        for pair in snapshot.events.windows(2) {
            assert_eq!(pair[0].frame(), pair[1].frame());
            assert!(
                pair[0].phase() <= pair[1].phase(),
                "phase order violated at frame {}: {:?} then {:?}",
                snapshot.frame,
                pair[0].phase(),
                pair[1].phase()
            );
        }
    }
}

#[test]
fn closed_window_energy_conservation() {
    // no food, no mating, no poker: the only flows are metabolism and
    // movement, so the ledger residual must equal the change in total
    // fish energy exactly (modulo f32 rounding)
    let config = AppConfig::default()
        .with_overrides(&[
            ("spawner.auto_food_interval", "0"),
            ("reproduction.threshold", "1000000.0"),
            ("physics.poker_contact_radius", "0.001"),
        ])
        .unwrap();
    let mut config = config;
    config.world.initial_fish = 10;
    let mut world = World::new(config, 7).unwrap();

    let total_energy = |world: &World| -> f64 {
        world
            .snapshot()
            .entities
            .iter()
            .filter(|e| e.kind == tankworld::data::EntityKind::Fish)
            .map(|e| e.energy as f64)
            .sum()
    };

    let before = total_energy(&world);
    world.run_until(150);
    let after = total_energy(&world);

    let stats = world.export_stats();
    assert_eq!(stats.energy.food_in, 0.0);
    assert_eq!(stats.energy.poker_in, 0.0);
    assert_eq!(stats.energy.birth_transfer_in, 0.0);
    let residual = stats.energy.residual();
    assert!(
        ((after - before) - residual).abs() < 0.5,
        "energy drift: delta {} vs residual {residual}",
        after - before
    );
    assert!(
        (residual
            + stats.energy.metabolism_out
            + stats.energy.movement_out
            + stats.energy.death_loss_out)
            .abs()
            < 1e-6
    );
}

#[test]
fn extinction_is_monotone_for_the_rest_of_the_run() {
    let config = AppConfig::default()
        .with_overrides(&[("energy.initial_fish_energy", "5.0")])
        .unwrap();
    let mut world = World::new(config, 42).unwrap();
    world.inject_fish(None, Some(Vec2::new(400.0, 300.0)));
    // the fish starves almost immediately; 1200 frames later its
    // algorithm is extinct
    world.run_until(1300);
    let extinct = world.export_stats().extinctions;
    assert_eq!(extinct.len(), 1);
    let algorithm = extinct[0].0;

    world.run_until(500);
    let later = world.export_stats();
    assert!(later.extinctions.iter().any(|(a, _)| *a == algorithm));
    let stats = later
        .algorithms
        .iter()
        .find(|(a, _)| *a == algorithm)
        .map(|(_, s)| s.clone())
        .unwrap();
    assert_eq!(stats.current_population, 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn determinism_holds_for_arbitrary_seeds(seed in any::<u64>()) {
        let config = busy_config(6);
        prop_assert!(verify_determinism(&config, seed, 120).is_ok());
    }

    #[test]
    fn populations_never_exceed_capacity(seed in any::<u64>(), extra in 0usize..40) {
        let mut config = AppConfig::default();
        config.world.max_population = 30;
        config.world.initial_fish = 30;
        let mut world = World::new(config, seed).unwrap();
        for _ in 0..extra {
            world.inject_fish(None, None);
        }
        world.run_until(60);
        prop_assert!(world.population() <= 30);
    }
}

#[test]
fn dead_entities_leave_within_one_tick() {
    let config = AppConfig::default()
        .with_overrides(&[("energy.initial_fish_energy", "1.0")])
        .unwrap();
    let mut world = World::new(config, 42).unwrap();
    world.inject_fish(None, Some(Vec2::new(10.0, 10.0)));
    for _ in 0..40 {
        world.tick();
        let snapshot = world.snapshot();
        let died = snapshot
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::Death { .. }));
        if died {
            let still_there = snapshot
                .entities
                .iter()
                .any(|e| e.kind == tankworld::data::EntityKind::Fish);
            assert!(!still_there, "dead fish must leave the set within its tick");
            return;
        }
    }
    panic!("fish with 1 energy should starve within forty ticks");
}

#[test]
fn reset_restores_the_initial_world() {
    let mut config = AppConfig::default();
    config.world.initial_fish = 15;
    let mut world = World::new(config.clone(), 42).unwrap();
    world.run_until(80);
    world.reset();
    world.tick(); // reset applies at FRAME_START
    // a second world run from scratch must produce the same stream
    let mut reference = World::new(config, 42).unwrap();
    reference.tick();
    for _ in 0..40 {
        world.tick();
        reference.tick();
        let a = serde_json::to_string(&world.snapshot()).unwrap();
        let b = serde_json::to_string(&reference.snapshot()).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn plants_produce_food_on_their_timers() {
    let mut world = World::new(AppConfig::default(), 42).unwrap();
    world.inject_plant(Some(Vec2::new(300.0, 300.0)));
    world.run_until(300);
    let snapshot = world.snapshot();
    assert_eq!(snapshot.stats.plant_count, 1);
    let plant_matter = snapshot
        .entities
        .iter()
        .filter(|e| e.kind == tankworld::data::EntityKind::Food)
        .count();
    // the feeder alone would have dropped 15 pellets by frame 300; the
    // plant adds its own production on a 120-frame timer
    assert!(plant_matter > 15, "expected plant production, saw {plant_matter}");
}

#[test]
fn entity_enum_round_trips_through_serde() {
    let mut config = AppConfig::default();
    config.world.initial_fish = 3;
    let world = World::new(config, 9).unwrap();
    let snapshot = world.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: tankworld::WorldSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot, back);
    // the data-model entities themselves are serializable too
    let entity = Entity::Food(tankworld::lifecycle::spawn_food(
        tankworld::data::EntityId(1),
        Vec2::new(1.0, 2.0),
        tankworld::data::FoodKind::Pellet,
        &AppConfig::default(),
    ));
    let json = serde_json::to_string(&entity).unwrap();
    let back: Entity = serde_json::from_str(&json).unwrap();
    assert_eq!(entity, back);
}
