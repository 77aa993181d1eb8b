//! Grid level for a 2D chase game: tile storage, procedural generation,
//! rectangle-versus-grid collision and tile rendering.

pub mod collision;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod render;
pub mod system;
pub mod tile;
pub mod tilemap;

#[cfg(feature = "image")]
pub mod palette;

#[cfg(feature = "sdl2")]
pub mod texture_cache;

pub use generator::{seeded_rng, Config, Difficulty};
pub use geometry::{Rectangle, Vector2};
pub use grid::Size;
pub use render::Renderer;
pub use system::System;
pub use tile::{default_collision, CollisionType, TextureId, Theme, TileId, VisualTile};
pub use tilemap::Tilemap;
