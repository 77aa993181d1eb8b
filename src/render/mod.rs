#[cfg(feature = "sdl2")]
pub mod sdl_renderer;

#[cfg(feature = "image")]
pub mod image_renderer;

use crate::geometry::Vector2;
use crate::tile::TextureId;

/// Drawing surface the tilemap renders into.
///
/// Textures are referenced by [`TextureId`]; the renderer owns whatever the
/// handle points at.
pub trait Renderer {
    type Error;

    /// Start a new frame
    fn clear(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Draw `texture` scaled to a `size`×`size` square with its top left
    /// corner at `position` (world units).
    fn draw_texture(&mut self, texture: TextureId, position: Vector2, size: f32) -> Result<(), Self::Error>;

    /// Finish the frame
    fn present(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
