use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::Rng;

use chaser_tilemap::{
    default_collision, seeded_rng, Config, Difficulty, Rectangle, Renderer, Size, TextureId,
    Theme, TileId, Tilemap, Vector2, VisualTile,
};

// Fixed seed for deterministic benchmarks
const BENCHMARK_SEED: u64 = 12345;

/// Counts draw calls so rendering can be timed without a backend.
struct NullRenderer {
    draws: usize,
}

impl Renderer for NullRenderer {
    type Error = String;

    fn draw_texture(&mut self, texture: TextureId, position: Vector2, size: f32) -> Result<(), Self::Error> {
        black_box((texture, position, size));
        self.draws += 1;
        Ok(())
    }
}

fn create_map(difficulty: Difficulty, size: usize) -> Tilemap {
    let mut map = Tilemap::new();
    map.regenerate(&mut seeded_rng(BENCHMARK_SEED), &Config::new(difficulty, Size::uniform(size)));
    map
}

fn bench_regenerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("regenerate");

    for difficulty in Difficulty::ALL {
        for size in [16, 64, 256].iter() {
            let config = Config::new(difficulty, Size::uniform(*size));

            group.bench_with_input(format!("{}_{}", difficulty.name(), size), &config, |b, config| {
                b.iter_batched(
                    || (Tilemap::new(), seeded_rng(BENCHMARK_SEED)),
                    |(mut map, mut rng)| {
                        map.regenerate(&mut rng, config);
                        black_box(map)
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }

    group.finish();
}

fn bench_get_collision(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_collision");

    for size in [32, 128].iter() {
        let map = create_map(Difficulty::Extreme, *size);
        let extent = map.width() as f32 * map.tile_size();

        // Random actor-sized boxes spread over the whole map
        let mut rng = seeded_rng(BENCHMARK_SEED);
        let probes: Vec<Rectangle> = (0..1000)
            .map(|_| {
                Rectangle::new(
                    rng.gen_range(0.0..extent - 12.0),
                    rng.gen_range(0.0..extent - 12.0),
                    12.0,
                    12.0,
                )
            })
            .collect();

        group.bench_with_input(format!("probes_{}", size), &probes, |b, probes| {
            b.iter(|| {
                for &probe in probes {
                    black_box(map.get_collision(probe, default_collision));
                }
            });
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let mut theme = Theme::default();
    theme[TileId::Empty] = VisualTile::new(vec![TextureId(0)]);
    theme[TileId::Wall] = VisualTile::new(vec![TextureId(0), TextureId(1)]);
    theme[TileId::Marker] = VisualTile::new(vec![TextureId(0), TextureId(2)]);
    theme[TileId::Orb] = VisualTile::new(vec![TextureId(0), TextureId(3)]);

    for size in [32, 128].iter() {
        let mut map = create_map(Difficulty::Hard, *size);
        map.init(vec![theme.clone()]);

        group.bench_with_input(format!("size_{}", size), &map, |b, map| {
            b.iter(|| {
                let mut renderer = NullRenderer { draws: 0 };
                map.render(&mut renderer, 0).map(|_| black_box(renderer.draws))
            });
        });
    }

    group.finish();
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(std::time::Duration::from_secs(5))
        .warm_up_time(std::time::Duration::from_secs(2))
}

criterion_group!(
    name = benches;
    config = configure_criterion();
    targets =
        bench_regenerate,
        bench_get_collision,
        bench_render
);

criterion_main!(benches);
