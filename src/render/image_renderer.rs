use super::Renderer;
use crate::geometry::Vector2;
use crate::tile::TextureId;
use crate::tilemap::Tilemap;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Pixel, Rgba, RgbaImage};
use log::debug;
use std::path::Path;

/// Renders into an in-memory RGBA image, one world unit per pixel.
pub struct ImageRenderer {
    textures: Vec<RgbaImage>,
    canvas: RgbaImage,
}

impl ImageRenderer {
    /// `textures[n]` is the image behind `TextureId(n)`.
    pub fn new(textures: Vec<DynamicImage>, width: u32, height: u32) -> Self {
        Self {
            textures: textures.into_iter().map(DynamicImage::into_rgba8).collect(),
            canvas: RgbaImage::new(width, height),
        }
    }

    /// Canvas sized to cover the whole map.
    pub fn for_tilemap(textures: Vec<DynamicImage>, tilemap: &Tilemap) -> Self {
        let width = (tilemap.width() as f32 * tilemap.tile_size()).ceil() as u32;
        let height = (tilemap.height() as f32 * tilemap.tile_size()).ceil() as u32;

        Self::new(textures, width, height)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        self.canvas
            .save(path)
            .map_err(|e| format!("Failed to save image: {}", e))?;

        debug!("Saved {}x{} map image to {}", self.canvas.width(), self.canvas.height(), path.display());

        Ok(())
    }
}

impl Renderer for ImageRenderer {
    type Error = String;

    fn clear(&mut self) -> Result<(), Self::Error> {
        for pixel in self.canvas.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }

        Ok(())
    }

    fn draw_texture(&mut self, texture: TextureId, position: Vector2, size: f32) -> Result<(), Self::Error> {
        let image = self
            .textures
            .get(texture.0 as usize)
            .ok_or(format!("Missing texture {}", texture.0))?;

        let side = size.round().max(1.0) as u32;
        let (x, y) = (position.x.round() as i64, position.y.round() as i64);

        let scaled;
        let source = if image.dimensions() == (side, side) {
            image
        } else {
            scaled = imageops::resize(image, side, side, FilterType::Nearest);
            &scaled
        };

        let (width, height) = (i64::from(self.canvas.width()), i64::from(self.canvas.height()));

        for (sx, sy, pixel) in source.enumerate_pixels() {
            let (cx, cy) = (x + i64::from(sx), y + i64::from(sy));

            if cx < 0 || cy < 0 || cx >= width || cy >= height {
                continue;
            }

            let target = self.canvas.get_pixel_mut(cx as u32, cy as u32);

            match pixel[3] {
                0 => {}
                255 => *target = *pixel,
                _ => target.blend(pixel),
            }
        }

        Ok(())
    }
}
