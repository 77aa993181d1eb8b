//! Built-in tile art, generated at start up so maps can be drawn without
//! any asset files.

use enum_map::enum_map;
use image::{DynamicImage, Rgba, RgbaImage};

use crate::tile::{TextureId, Theme, TileId, VisualTile};

type Rgb = [u8; 3];

struct ThemeColors {
    name: &'static str,
    floor: Rgb,
    wall: Rgb,
    egg: Rgb,
    orb: Rgb,
}

const THEMES: [ThemeColors; 2] = [
    ThemeColors {
        name: "meadow",
        floor: [118, 170, 92],
        wall: [92, 72, 58],
        egg: [236, 228, 196],
        orb: [250, 214, 64],
    },
    ThemeColors {
        name: "cavern",
        floor: [38, 40, 56],
        wall: [96, 102, 128],
        egg: [170, 84, 196],
        orb: [80, 220, 240],
    },
];

/// Texture atlas plus the theme tables that index into it.
pub struct Palette {
    pub textures: Vec<DynamicImage>,
    pub themes: Vec<Theme>,
}

impl Palette {
    pub fn new(tile_size: u32) -> Self {
        let size = tile_size.max(1);
        let mut textures = Vec::new();
        let mut themes = Vec::new();

        for colors in &THEMES {
            let mut push = |image: RgbaImage| {
                textures.push(DynamicImage::ImageRgba8(image));
                TextureId(textures.len() as u32 - 1)
            };

            let floor = push(floor(size, colors.floor));
            let wall = push(block(size, colors.wall));
            let egg = push(disc(size, colors.egg, 0.30, 0.40));
            let orb = push(disc(size, colors.orb, 0.28, 0.28));

            themes.push(enum_map! {
                TileId::OutOfBounds => VisualTile::default(),
                TileId::Empty => VisualTile::new(vec![floor]),
                TileId::Wall => VisualTile::new(vec![floor, wall]),
                TileId::Marker => VisualTile::new(vec![floor, egg]),
                TileId::Orb => VisualTile::new(vec![floor, orb]),
            });
        }

        Self { textures, themes }
    }

    pub fn theme_names() -> Vec<&'static str> {
        THEMES.iter().map(|t| t.name).collect()
    }
}

fn shade(color: Rgb, amount: i16) -> Rgba<u8> {
    let channel = |c: u8| (c as i16 + amount).clamp(0, 255) as u8;

    Rgba([channel(color[0]), channel(color[1]), channel(color[2]), 255])
}

fn floor(size: u32, color: Rgb) -> RgbaImage {
    let half = (size / 2).max(1);

    RgbaImage::from_fn(size, size, |x, y| {
        if (x / half + y / half) % 2 == 0 {
            shade(color, 0)
        } else {
            shade(color, -8)
        }
    })
}

fn block(size: u32, color: Rgb) -> RgbaImage {
    let last = size - 1;

    RgbaImage::from_fn(size, size, |x, y| {
        if x == 0 || y == 0 {
            shade(color, 24)
        } else if x == last || y == last {
            shade(color, -32)
        } else {
            shade(color, 0)
        }
    })
}

/// Ellipse with radii given as fractions of the tile, on a transparent
/// background.
fn disc(size: u32, color: Rgb, radius_x: f32, radius_y: f32) -> RgbaImage {
    let center = size as f32 / 2.0;
    let (rx, ry) = (radius_x * size as f32, radius_y * size as f32);

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = (x as f32 + 0.5 - center) / rx;
        let dy = (y as f32 + 0.5 - center) / ry;

        if dx * dx + dy * dy <= 1.0 {
            shade(color, 0)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
