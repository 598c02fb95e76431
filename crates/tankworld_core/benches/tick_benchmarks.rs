use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tankworld_core::config::AppConfig;
use tankworld_core::world::World;

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for population in [50usize, 200, 500] {
        group.bench_function(format!("{population}_fish"), |b| {
            let mut config = AppConfig::default();
            config.world.initial_fish = population;
            let mut world = World::new(config, 42).expect("default config is valid");
            b.iter(|| {
                world.tick();
                black_box(world.frame());
            });
        });
    }
    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    c.bench_function("snapshot_500_fish", |b| {
        let mut config = AppConfig::default();
        config.world.initial_fish = 500;
        let mut world = World::new(config, 42).expect("default config is valid");
        world.run_until(100);
        b.iter(|| black_box(world.snapshot()));
    });
}

criterion_group!(benches, bench_tick, bench_snapshot);
criterion_main!(benches);
