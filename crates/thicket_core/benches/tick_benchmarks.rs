use criterion::{black_box, criterion_group, criterion_main, Criterion};
use thicket_core::steering;
use thicket_core::{SimConfig, World};
use thicket_data::{Biome, Entity, EntityId, Position, Rect, Room, RoomId, Species, Vec2};

const ROOMS: u32 = 8;

fn populated_world(per_room: usize, parallel_threshold: usize) -> World {
    let rooms: Vec<Room> = (0..ROOMS)
        .map(|i| {
            Room::new(
                RoomId(i),
                Rect::new(f64::from(i) * 1000.0, 0.0, 800.0, 600.0),
                Biome::ALL[i as usize % Biome::ALL.len()],
            )
        })
        .collect();

    let mix = [
        Species::Moss,
        Species::Fern,
        Species::Mushroom,
        Species::Flower,
        Species::Lichen,
        Species::Cactus,
        Species::Rabbit,
        Species::Deer,
        Species::Beetle,
        Species::Fox,
    ];
    let mut entities = Vec::new();
    let mut next = 1u128;
    for i in 0..ROOMS {
        for k in 0..per_room {
            let x = f64::from(i) * 1000.0 + 20.0 + (k % 20) as f64 * 38.0;
            let y = 20.0 + (k / 20) as f64 * 38.0;
            entities.push(Entity::spawn(
                EntityId::from_u128(next),
                mix[k % mix.len()],
                Position::new(x, y),
                RoomId(i),
            ));
            next += 1;
        }
    }

    let mut config = SimConfig::default();
    config.world.parallel_threshold = parallel_threshold;
    World::new(config, rooms, entities).expect("bench world")
}

fn bench_tick_sequential(c: &mut Criterion) {
    let mut world = populated_world(100, usize::MAX);
    c.bench_function("tick_800_sequential", |b| {
        b.iter(|| black_box(world.update()))
    });
}

fn bench_tick_parallel(c: &mut Criterion) {
    let mut world = populated_world(100, 0);
    c.bench_function("tick_800_parallel", |b| b.iter(|| black_box(world.update())));
}

fn bench_flocking(c: &mut Criterion) {
    let neighbours: Vec<steering::Neighbor> = (0..30)
        .map(|i| steering::Neighbor {
            position: Position::new(f64::from(i) * 3.0, f64::from(i % 5) * 4.0),
            velocity: Vec2::new(1.0, f64::from(i % 3)),
        })
        .collect();
    let pos = Position::new(40.0, 8.0);

    c.bench_function("flocking_triad_30", |b| {
        b.iter(|| {
            let sep = steering::separation(pos, &neighbours, 60.0);
            let ali = steering::alignment(pos, &neighbours, 60.0);
            let coh = steering::cohesion(pos, &neighbours, 60.0);
            black_box(sep + ali + coh)
        })
    });
}

criterion_group!(
    benches,
    bench_tick_sequential,
    bench_tick_parallel,
    bench_flocking
);
criterion_main!(benches);
