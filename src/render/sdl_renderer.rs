use super::Renderer;
use crate::geometry::{Rectangle, Vector2};
use crate::grid::Size;
use crate::texture_cache::TextureCache;
use crate::tile::TextureId;

use image::DynamicImage;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::{FullscreenType, Window};
use sdl2::EventPump;

#[derive(Debug, Clone, Copy)]
pub struct SdlConfig {
    pub window_size: Size,
    pub vsync: bool,
    pub fullscreen: bool,
}

/// Window renderer; one world unit is one pixel.
pub struct SdlRenderer {
    canvas: Canvas<Window>,
    events: EventPump,
    textures: TextureCache,
    should_quit: bool,
}

impl SdlRenderer {
    pub fn new(config: &SdlConfig, images: &[DynamicImage]) -> Result<Self, String> {
        let context = sdl2::init()?;
        let video = context.video()?;

        let mut window = video
            .window(
                "Chaser",
                config.window_size.width as u32,
                config.window_size.height as u32,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        if config.fullscreen {
            window.set_fullscreen(FullscreenType::True)?;
        }

        if window.fullscreen_state() != FullscreenType::Off {
            context.mouse().show_cursor(false);
        }

        let mut builder = window.into_canvas().target_texture();

        if config.vsync {
            builder = builder.present_vsync();
        }

        let mut canvas = builder.build().map_err(|e| e.to_string())?;
        canvas.set_blend_mode(BlendMode::Blend);

        let events = context.event_pump()?;
        let textures = TextureCache::load(&canvas.texture_creator(), images)?;

        Ok(Self {
            canvas,
            events,
            textures,
            should_quit: false,
        })
    }

    /// Drain pending events; quit requests are recorded.
    pub fn poll_events(&mut self) -> Vec<Event> {
        let events: Vec<Event> = self.events.poll_iter().collect();

        for event in &events {
            if let Event::Quit { .. } = event {
                self.should_quit = true;
            }
        }

        events
    }

    pub fn is_pressed(&self, scancode: Scancode) -> bool {
        self.events.keyboard_state().is_scancode_pressed(scancode)
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn fill_rectangle(&mut self, rectangle: Rectangle, color: (u8, u8, u8)) -> Result<(), String> {
        let rect = Rect::new(
            rectangle.x.round() as i32,
            rectangle.y.round() as i32,
            rectangle.width.round().max(1.0) as u32,
            rectangle.height.round().max(1.0) as u32,
        );

        self.canvas.set_draw_color(Color::RGB(color.0, color.1, color.2));
        self.canvas.fill_rect(rect)
    }
}

impl Renderer for SdlRenderer {
    type Error = String;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.canvas.set_draw_color(Color::BLACK);
        self.canvas.clear();

        Ok(())
    }

    fn draw_texture(&mut self, texture: TextureId, position: Vector2, size: f32) -> Result<(), Self::Error> {
        let side = size.round().max(1.0) as u32;
        let rect = Rect::new(position.x.round() as i32, position.y.round() as i32, side, side);
        let texture = self.textures.get(texture).ok_or("Texture not found")?;

        self.canvas.copy(texture, None, Some(rect))
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.canvas.present();

        Ok(())
    }
}
