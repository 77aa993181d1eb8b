use crate::tile::TextureId;

use image::{DynamicImage, GenericImageView};
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Texture, TextureCreator};
use sdl2::video::WindowContext;

/// SDL textures uploaded once, addressed by [`TextureId`].
pub struct TextureCache {
    textures: Vec<Texture>,
}

impl TextureCache {
    pub fn load(
        texture_creator: &TextureCreator<WindowContext>,
        images: &[DynamicImage],
    ) -> Result<Self, String> {
        let textures = images
            .iter()
            .map(|image| image_to_texture(texture_creator, image))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { textures })
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }
}

fn image_to_texture(
    texture_creator: &TextureCreator<WindowContext>,
    image: &DynamicImage,
) -> Result<Texture, String> {
    let (width, height) = image.dimensions();
    let mut texture = texture_creator
        .create_texture_streaming(PixelFormatEnum::RGBA32, width, height)
        .map_err(|e| e.to_string())?;

    let rgba = image.to_rgba8();
    let row_length = width as usize * 4;

    texture
        .with_lock(None, |buffer: &mut [u8], pitch: usize| {
            for (row, pixels) in rgba.chunks(row_length).enumerate() {
                let start = row * pitch;
                buffer[start..start + row_length].copy_from_slice(pixels);
            }
        })
        .map_err(|e| e.to_string())?;

    texture.set_blend_mode(sdl2::render::BlendMode::Blend);

    Ok(texture)
}
