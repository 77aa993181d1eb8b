use std::collections::VecDeque;

use chaser_tilemap::{seeded_rng, Config, Difficulty, Size, TileId, Tilemap};

const TEST_SEED: u64 = 1234;

const TEST_SIZES: [(usize, usize); 5] = [(3, 3), (4, 9), (10, 10), (19, 7), (32, 24)];

fn generate(seed: u64, difficulty: Difficulty, width: usize, height: usize) -> Tilemap {
    let mut map = Tilemap::new();
    map.regenerate(&mut seeded_rng(seed), &Config::new(difficulty, Size::new(width, height)));
    map
}

fn count(map: &Tilemap, id: TileId) -> usize {
    map.grid().as_slice().iter().filter(|&&cell| cell == id).count()
}

/// Every cell reachable from the spawn through non-wall cells.
fn reachable_from_spawn(map: &Tilemap) -> Vec<bool> {
    let (width, height) = (map.width(), map.height());
    let mut seen = vec![false; (width * height) as usize];
    let mut queue = VecDeque::new();

    let (sx, sy) = map.spawn();
    if map.get(sx, sy) != TileId::Wall {
        seen[(sx + sy * width) as usize] = true;
        queue.push_back((sx, sy));
    }

    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
            let id = map.get(nx, ny);

            if id == TileId::OutOfBounds || id == TileId::Wall {
                continue;
            }

            let index = (nx + ny * width) as usize;
            if !seen[index] {
                seen[index] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    seen
}

fn assert_level_invariants(map: &Tilemap, difficulty: Difficulty) {
    assert_eq!(map.orbs_collected(), 0);
    assert_eq!(map.total_orbs(), count(map, TileId::Orb));
    assert!(map.total_orbs() >= 1);
    assert!(count(map, TileId::Marker) <= difficulty.parameters().eggs);

    // The pool is exactly the set of empty cells
    let mut pool = map.free_cells().to_vec();
    pool.sort_unstable();
    let empty: Vec<usize> = map
        .grid()
        .as_slice()
        .iter()
        .enumerate()
        .filter(|&(_, &id)| id == TileId::Empty)
        .map(|(index, _)| index)
        .collect();
    assert_eq!(pool, empty);

    let (sx, sy) = map.spawn();
    assert_eq!(map.get(sx, sy), TileId::Empty);

    let reachable = reachable_from_spawn(map);
    for (index, &id) in map.grid().as_slice().iter().enumerate() {
        if id != TileId::Wall {
            assert!(reachable[index], "cell {} ({:?}) cut off from the spawn", index, id);
        }
    }
}

#[test]
fn test_generated_levels_hold_invariants() {
    for difficulty in Difficulty::ALL {
        for (width, height) in TEST_SIZES {
            for seed in 0..20 {
                let map = generate(seed, difficulty, width, height);

                assert_eq!(map.width(), width as i32);
                assert_eq!(map.height(), height as i32);
                assert_level_invariants(&map, difficulty);
            }
        }
    }
}

#[test]
fn test_small_hard_level() {
    let map = generate(TEST_SEED, Difficulty::Hard, 10, 10);

    let open = 100 - count(&map, TileId::Wall);

    assert!(map.total_orbs() > 0);
    assert!(map.total_orbs() <= open);
    assert_level_invariants(&map, Difficulty::Hard);
}

#[test]
fn test_eggs_keep_away_from_spawn() {
    for seed in 0..20 {
        let map = generate(seed, Difficulty::Extreme, 32, 24);
        let (sx, sy) = map.spawn();

        assert_eq!(count(&map, TileId::Marker), Difficulty::Extreme.parameters().eggs);

        for (x, y, &id) in map.grid() {
            if id == TileId::Marker {
                let distance = (x as i32 - sx).abs().max((y as i32 - sy).abs());
                assert!(distance >= 3, "egg at ({}, {}) next to the spawn", x, y);
            }
        }
    }
}

#[test]
fn test_generation_is_deterministic() {
    for difficulty in Difficulty::ALL {
        let first = generate(TEST_SEED, difficulty, 32, 24);
        let second = generate(TEST_SEED, difficulty, 32, 24);

        assert_eq!(first.grid(), second.grid());
        assert_eq!(first.free_cells(), second.free_cells());
        assert_eq!(first.total_orbs(), second.total_orbs());
    }
}

#[test]
fn test_different_seeds_give_different_maps() {
    let first = generate(1, Difficulty::Hard, 32, 24);
    let second = generate(2, Difficulty::Hard, 32, 24);

    assert_ne!(first.grid(), second.grid());
}

#[test]
fn test_regenerate_replaces_previous_level() {
    let mut rng = seeded_rng(TEST_SEED);
    let mut map = Tilemap::new();

    map.regenerate(&mut rng, &Config::new(Difficulty::Extreme, Size::new(32, 24)));

    let (x, y, _) = map
        .grid()
        .iter()
        .find(|&(_, _, &id)| id == TileId::Orb)
        .expect("level has an orb");
    assert!(map.collect_orb(x as i32, y as i32));
    assert_eq!(map.orbs_collected(), 1);

    map.regenerate(&mut rng, &Config::new(Difficulty::Easy, Size::new(10, 10)));

    assert_eq!(map.width(), 10);
    assert_eq!(map.height(), 10);
    assert!(map.free_cells().iter().all(|&index| index < 100));
    assert_level_invariants(&map, Difficulty::Easy);
}

#[test]
fn test_size_is_clamped() {
    let map = generate(TEST_SEED, Difficulty::Hard, 0, 1);
    assert_eq!((map.width(), map.height()), (3, 3));
    assert_level_invariants(&map, Difficulty::Hard);

    let map = generate(TEST_SEED, Difficulty::Easy, 1000, 5);
    assert_eq!((map.width(), map.height()), (256, 5));
    assert_level_invariants(&map, Difficulty::Easy);
}

#[test]
fn test_tier_parameters_increase() {
    for pair in Difficulty::ALL.windows(2) {
        let (lower, higher) = (pair[0].parameters(), pair[1].parameters());

        assert!(lower.wall_coverage < higher.wall_coverage);
        assert!(lower.max_block <= higher.max_block);
        assert!(lower.eggs <= higher.eggs);
        assert!(lower.orb_ratio < higher.orb_ratio);
    }
}

#[test]
fn test_harder_tiers_leave_less_open_space() {
    let walls: Vec<usize> = Difficulty::ALL
        .iter()
        .map(|&difficulty| {
            (0..10)
                .map(|seed| count(&generate(seed, difficulty, 32, 24), TileId::Wall))
                .sum()
        })
        .collect();

    assert!(walls[0] < walls[1], "{:?}", walls);
    assert!(walls[1] < walls[2], "{:?}", walls);
}

#[test]
fn test_difficulty_parsing() {
    assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
    assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
    assert_eq!(" Extreme ".parse::<Difficulty>(), Ok(Difficulty::Extreme));

    // Numeric levels clamp to the nearest tier
    assert_eq!("-4".parse::<Difficulty>(), Ok(Difficulty::Easy));
    assert_eq!("0".parse::<Difficulty>(), Ok(Difficulty::Easy));
    assert_eq!("1".parse::<Difficulty>(), Ok(Difficulty::Hard));
    assert_eq!("2".parse::<Difficulty>(), Ok(Difficulty::Extreme));
    assert_eq!("99".parse::<Difficulty>(), Ok(Difficulty::Extreme));

    assert!("nightmare".parse::<Difficulty>().is_err());
    assert!("".parse::<Difficulty>().is_err());
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.difficulty, Difficulty::Hard);
    assert_eq!(config.size, Size::new(32, 24));
}

#[cfg(feature = "serde")]
#[test]
fn test_config_from_json() {
    let config: Config =
        serde_json::from_str(r#"{"difficulty": 5, "size": {"width": 12, "height": 9}}"#).unwrap();
    assert_eq!(config, Config::new(Difficulty::Extreme, Size::new(12, 9)));

    let config: Config = serde_json::from_str(r#"{"difficulty": "Easy"}"#).unwrap();
    assert_eq!(config, Config::new(Difficulty::Easy, Size::new(32, 24)));

    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config, Config::default());

    assert!(serde_json::from_str::<Config>(r#"{"difficulty": "nightmare"}"#).is_err());

    assert_eq!(serde_json::to_string(&Difficulty::Extreme).unwrap(), r#""extreme""#);
}
