//! End-to-end scenarios with literal seed 42 against the default config
//! (plus the minimal overrides each scenario states).

use tankworld::behavior;
use tankworld::data::{
    AlgorithmId, BehaviorGenes, DeathCause, EntityKind, Genome, PhysicalGenes, PokerGenes,
    PokerStyle, Vec2,
};
use tankworld::poker::strategy;
use tankworld::tracker::events::SimEvent;
use tankworld::{AppConfig, World, WorldSnapshot};

const SEED: u64 = 42;

fn neutral_genome(algorithm: AlgorithmId, style: PokerStyle) -> Genome {
    Genome {
        physical: PhysicalGenes::neutral(),
        behavior: BehaviorGenes {
            algorithm,
            params: behavior::default_params(algorithm),
            aggression: 0.5,
            social_tendency: 0.5,
        },
        poker: PokerGenes {
            style,
            params: strategy::default_params(style),
        },
        color_hue: 0.5,
        stress: 0.0,
    }
}

/// Ticks the world once and returns that tick's snapshot.
fn step(world: &mut World) -> WorldSnapshot {
    world.tick();
    world.snapshot()
}

#[test]
fn empty_world_smoke() {
    let mut world = World::new(AppConfig::default(), SEED).unwrap();
    let mut events = Vec::new();
    for _ in 0..300 {
        events.extend(step(&mut world).events);
    }
    let snapshot = world.snapshot();
    assert_eq!(snapshot.frame, 300);
    assert_eq!(snapshot.stats.population, 0);

    // the only activity is the automatic feeder on its cadence
    let interval = AppConfig::default().spawner.auto_food_interval;
    assert!(events
        .iter()
        .all(|e| matches!(e, SimEvent::FoodSpawned { .. })));
    assert_eq!(events.len(), (300 / interval) as usize);
    for event in &events {
        assert_eq!(event.frame() % interval, 0);
    }
    assert_eq!(snapshot.stats.food_count, (300 / interval) as usize);
}

#[test]
fn lone_fish_starves() {
    let config = AppConfig::default()
        .with_overrides(&[("energy.initial_fish_energy", "20.0")])
        .unwrap();
    let base_metabolism = config.energy.base_metabolism;
    let mut world = World::new(config, SEED).unwrap();
    world.inject_fish(
        Some(neutral_genome(AlgorithmId::NearestFood, PokerStyle::Balanced)),
        Some(Vec2::new(400.0, 300.0)),
    );

    let deadline = (20.0 / base_metabolism).ceil() as u64;
    let mut death_frame = None;
    for _ in 0..deadline + 5 {
        let snapshot = step(&mut world);
        if let Some(SimEvent::Death { cause, frame, .. }) = snapshot
            .events
            .iter()
            .find(|e| matches!(e, SimEvent::Death { .. }))
        {
            assert_eq!(*cause, DeathCause::Starvation);
            death_frame = Some(*frame);
            break;
        }
    }
    let death_frame = death_frame.expect("fish should starve");
    assert!(
        death_frame <= deadline,
        "death at {death_frame}, deadline {deadline}"
    );

    let stats = world.export_stats();
    assert_eq!(stats.total_deaths, 1);
    assert_eq!(stats.death_causes.starvation, 1);
    assert_eq!(world.snapshot().stats.population, 0);
}

#[test]
fn adults_reproduce_within_sixty_ticks() {
    let config = AppConfig::default()
        .with_overrides(&[
            ("energy.initial_fish_energy", "90.0"),
            // keep the pair out of the poker loop so the energy books stay
            // pure reproduction
            ("physics.poker_contact_radius", "0.5"),
        ])
        .unwrap();
    let mating_cost = config.energy.mating_cost;
    let transfer = config.energy.birth_transfer;
    let mut world = World::new(config, SEED).unwrap();
    let genome = neutral_genome(AlgorithmId::NearestFood, PokerStyle::Balanced);
    world.inject_fish(Some(genome.clone()), Some(Vec2::new(400.0, 300.0)));
    world.inject_fish(Some(genome), Some(Vec2::new(402.0, 300.0)));

    let mut birth = None;
    let mut birth_snapshot = None;
    for _ in 0..60 {
        let snapshot = step(&mut world);
        let found = snapshot.events.iter().find_map(|e| match e {
            SimEvent::Birth {
                id,
                parents,
                generation,
                frame,
                ..
            } => Some((*id, *parents, *generation, *frame)),
            _ => None,
        });
        if let Some(info) = found {
            birth = Some(info);
            birth_snapshot = Some(snapshot);
            break;
        }
    }
    let (child_id, parents, generation, frame) =
        birth.expect("a newborn should appear within 60 ticks");
    let snapshot = birth_snapshot.unwrap();
    assert!(frame <= 60);
    assert_eq!(generation, 1);

    let child = snapshot
        .entities
        .iter()
        .find(|e| e.id == child_id)
        .expect("newborn visible in the birth-tick snapshot");
    assert_eq!(child.energy, transfer);
    assert_eq!(child.generation, Some(1));

    // the mother paid the mating cost plus the transfer; the remaining
    // difference is a few frames of metabolism
    let mother = snapshot
        .entities
        .iter()
        .find(|e| e.id == parents.0)
        .expect("mother alive");
    let expected = 90.0 - mating_cost - transfer;
    assert!(
        (mother.energy - expected).abs() < 6.0,
        "mother at {}, expected about {expected}",
        mother.energy
    );
    assert_eq!(snapshot.stats.population, 3);
}

#[test]
fn poker_exchange_between_styles() {
    let config = AppConfig::default()
        .with_overrides(&[
            ("energy.base_metabolism", "0.05"),
            ("energy.movement_cost", "0.0"),
            ("energy.initial_fish_energy", "100.0"),
            ("poker.cooldown", "10"),
            ("reproduction.post_poker_mating", "false"),
            ("reproduction.threshold", "100000.0"),
            ("spawner.auto_food_interval", "0"),
        ])
        .unwrap();
    let small_blind = config.poker.base_stake * config.poker.small_blind_fraction;
    let mut world = World::new(config, SEED).unwrap();

    let fold_genome = neutral_genome(AlgorithmId::PokerSeeker, PokerStyle::AlwaysFold);
    let mut tag_genome = neutral_genome(AlgorithmId::PokerSeeker, PokerStyle::TightAggressive);
    tag_genome.color_hue = 0.9; // distinguishable digest
    world.inject_fish(Some(fold_genome.clone()), Some(Vec2::new(400.0, 300.0)));
    world.inject_fish(Some(tag_genome.clone()), Some(Vec2::new(400.0, 300.0)));

    let mut outcomes = Vec::new();
    for _ in 0..400 {
        let snapshot = step(&mut world);
        for event in &snapshot.events {
            if let SimEvent::Poker { outcome, frame, .. } = event {
                outcomes.push((outcome.clone(), *frame));
            }
        }
    }
    assert!(!outcomes.is_empty(), "contact should force poker games");

    // identify the two fish by genome digest
    let snapshot = world.snapshot();
    let find_id = |digest: &str| {
        snapshot
            .entities
            .iter()
            .find(|e| e.genome_digest.as_deref() == Some(digest))
            .map(|e| e.id)
            .expect("fish alive at end")
    };
    let fold_id = find_id(&fold_genome.digest());
    let tag_id = find_id(&tag_genome.digest());
    assert_eq!(snapshot.stats.population, 2, "both players survive");

    // seat 0 belongs to the lower entity id
    let fold_seat = usize::from(fold_id > tag_id);
    let mut tag_won_blinds = false;
    for (outcome, _) in &outcomes {
        let total: f32 = outcome.energy_delta_per_player.iter().map(|(_, d)| d).sum();
        assert!(
            (total + outcome.house_cut).abs() < 1e-2,
            "pot deltas must balance the house cut"
        );
        let sb_seat = (outcome.button_seat + 1) % 2;
        if sb_seat == fold_seat {
            // AlwaysFold posted the small blind and acted first: it folds,
            // so the aggressor takes the blinds every time
            assert_eq!(outcome.winner, tag_id);
            let fold_delta = outcome
                .energy_delta_per_player
                .iter()
                .find(|(id, _)| *id == fold_id)
                .unwrap()
                .1;
            assert!((fold_delta + small_blind).abs() < 1e-3);
            tag_won_blinds = true;
        }
    }
    assert!(tag_won_blinds, "the button should land on both seats");

    // cooldown pacing: games are at least poker.cooldown frames apart
    for pair in outcomes.windows(2) {
        assert!(pair[1].1 - pair[0].1 >= 10);
    }
}

#[test]
fn crab_kills_fish_on_contact() {
    let mut world = World::new(AppConfig::default(), SEED).unwrap();
    world.inject_fish(
        Some(neutral_genome(AlgorithmId::NearestFood, PokerStyle::Balanced)),
        Some(Vec2::new(400.0, 300.0)),
    );
    world.inject_crab(Some(Vec2::new(400.0, 300.0)));

    let mut cause = None;
    for _ in 0..5 {
        let snapshot = step(&mut world);
        if let Some(SimEvent::Death { cause: c, .. }) = snapshot
            .events
            .iter()
            .find(|e| matches!(e, SimEvent::Death { .. }))
        {
            cause = Some(*c);
            break;
        }
    }
    assert_eq!(cause, Some(DeathCause::Predation));

    let snapshot = world.snapshot();
    assert_eq!(snapshot.stats.population, 0);
    assert_eq!(snapshot.stats.crab_count, 1);
    let stats = world.export_stats();
    assert_eq!(stats.death_causes.predation, 1);

    // the crab is on hunt cooldown after the kill
    let crab = snapshot
        .entities
        .iter()
        .find(|e| e.kind == EntityKind::Crab)
        .unwrap();
    assert!(crab.id.raw() > 0);
}

#[test]
fn capacity_refuses_spawns_at_the_cap() {
    let config = AppConfig::default()
        .with_overrides(&[("world.initial_fish", "500")])
        .unwrap();
    assert_eq!(config.world.max_population, 500);
    let mut world = World::new(config, SEED).unwrap();
    for _ in 0..50 {
        world.inject_fish(None, None);
    }
    let snapshot = step(&mut world);
    let refusals = snapshot
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::CapacityReached { .. }))
        .count();
    assert_eq!(refusals, 50);
    assert_eq!(snapshot.stats.population, 500);
}
