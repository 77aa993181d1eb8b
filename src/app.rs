use crate::cli::AppConfig;

use chaser_tilemap::palette::Palette;
use chaser_tilemap::render::image_renderer::ImageRenderer;
use chaser_tilemap::{seeded_rng, Renderer, TileId, Tilemap};

#[cfg(feature = "sdl2")]
use chaser_tilemap::render::sdl_renderer::{SdlConfig, SdlRenderer};
#[cfg(feature = "sdl2")]
use chaser_tilemap::{default_collision, Rectangle, Size, System, Vector2};
#[cfg(feature = "sdl2")]
use rand_xorshift::XorShiftRng;
#[cfg(feature = "sdl2")]
use std::time::{Duration, Instant};

use log::{info, warn};
use rand::rngs::OsRng;
use rand::Rng;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Actor speed in tiles per second
#[cfg(feature = "sdl2")]
const ACTOR_SPEED: f32 = 6.0;

/// Level as written by `--json`: rows of numeric tile ids.
#[derive(Serialize)]
struct LevelExport {
    seed: u64,
    width: i32,
    height: i32,
    total_orbs: usize,
    tiles: Vec<Vec<TileId>>,
}

impl LevelExport {
    fn new(tilemap: &Tilemap, seed: u64) -> Self {
        let tiles = (0..tilemap.height())
            .map(|y| (0..tilemap.width()).map(|x| tilemap.get(x, y)).collect())
            .collect();

        Self {
            seed,
            width: tilemap.width(),
            height: tilemap.height(),
            total_orbs: tilemap.total_orbs(),
            tiles,
        }
    }

    fn save(&self, path: &Path) -> Result<(), String> {
        let file = File::create(path).map_err(|e| format!("Failed to create level file: {}", e))?;

        serde_json::to_writer(BufWriter::new(file), self)
            .map_err(|e| format!("Failed to write level file: {}", e))
    }
}

pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let seed = self.config.seed.unwrap_or_else(|| OsRng.gen());

        info!("Using seed: {}", seed);

        let mut rng = seeded_rng(seed);
        let palette = Palette::new(self.config.tile_size);
        let mut tilemap = Tilemap::with_tile_size(self.config.tile_size as f32);

        tilemap.init(palette.themes.clone());

        if self.config.theme < tilemap.theme_count() {
            tilemap.set_theme(self.config.theme);
        } else {
            warn!(
                "Unknown theme {}, available: {:?}",
                self.config.theme,
                Palette::theme_names()
            );
        }

        tilemap.regenerate(&mut rng, &self.config.level);

        info!(
            "{}x{} {} map with {} orbs",
            tilemap.width(),
            tilemap.height(),
            self.config.level.difficulty.name(),
            tilemap.total_orbs()
        );

        if self.config.print {
            print!("{}", tilemap);
        }

        if let Some(path) = &self.config.png_path {
            let mut renderer = ImageRenderer::for_tilemap(palette.textures.clone(), &tilemap);

            renderer.clear()?;
            tilemap.render(&mut renderer, tilemap.theme())?;
            renderer.save(path)?;

            info!("Map image written to {}", path.display());
        }

        if let Some(path) = &self.config.json_path {
            LevelExport::new(&tilemap, seed).save(path)?;

            info!("Level written to {}", path.display());
        }

        #[cfg(feature = "sdl2")]
        if self.config.renderer.visual {
            self.run_visual(tilemap, rng, &palette)?;
        }

        Ok(())
    }

    #[cfg(feature = "sdl2")]
    fn run_visual(
        &self,
        mut tilemap: Tilemap,
        mut rng: XorShiftRng,
        palette: &Palette,
    ) -> Result<(), Box<dyn std::error::Error>> {
        use sdl2::event::Event;
        use sdl2::keyboard::{Keycode, Scancode};

        let tile_size = tilemap.tile_size();
        let config = SdlConfig {
            window_size: Size::new(
                (tilemap.width() as f32 * tile_size) as usize,
                (tilemap.height() as f32 * tile_size) as usize,
            ),
            vsync: self.config.renderer.vsync,
            fullscreen: self.config.renderer.fullscreen,
        };

        let mut renderer = SdlRenderer::new(&config, &palette.textures)?;
        let mut actor = spawn_actor(&tilemap);
        let mut last_frame = Instant::now();

        info!("Arrow keys move, R regenerates, Tab switches theme, Escape quits");

        while !renderer.should_quit() {
            for event in renderer.poll_events() {
                match event {
                    Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => renderer.request_quit(),
                    Event::KeyDown {
                        keycode: Some(Keycode::R),
                        ..
                    } => {
                        tilemap.regenerate(&mut rng, &self.config.level);
                        actor = spawn_actor(&tilemap);
                        info!("New map with {} orbs", tilemap.total_orbs());
                    }
                    Event::KeyDown {
                        keycode: Some(Keycode::Tab),
                        ..
                    } => {
                        let next = (tilemap.theme() + 1) % tilemap.theme_count().max(1);
                        tilemap.set_theme(next);
                    }
                    _ => {}
                }
            }

            let dt = last_frame.elapsed().as_secs_f32().min(0.1);
            last_frame = Instant::now();

            let mut direction = Vector2::ZERO;

            if renderer.is_pressed(Scancode::Left) {
                direction.x -= 1.0;
            }
            if renderer.is_pressed(Scancode::Right) {
                direction.x += 1.0;
            }
            if renderer.is_pressed(Scancode::Up) {
                direction.y -= 1.0;
            }
            if renderer.is_pressed(Scancode::Down) {
                direction.y += 1.0;
            }

            let step = ACTOR_SPEED * tile_size * dt;

            // One axis at a time so the actor slides along walls
            let (moved, _) = tilemap.get_collision(
                actor.translated(Vector2::new(direction.x * step, 0.0)),
                default_collision,
            );
            let (moved, _) = tilemap.get_collision(
                moved.translated(Vector2::new(0.0, direction.y * step)),
                default_collision,
            );
            actor = moved;

            for (x, y, id) in tilemap.cells_at(&actor) {
                if id == TileId::Orb && tilemap.collect_orb(x, y) {
                    info!("Orb {}/{}", tilemap.orbs_collected(), tilemap.total_orbs());
                }
            }

            if tilemap.all_orbs_collected() {
                info!("All orbs collected");
                tilemap.regenerate(&mut rng, &self.config.level);
                actor = spawn_actor(&tilemap);
            }

            tilemap.update(dt);

            renderer.clear()?;
            System::render(&mut tilemap, &mut renderer)?;
            renderer.fill_rectangle(actor, (220, 60, 60))?;
            renderer.present()?;

            if !self.config.renderer.vsync {
                std::thread::sleep(Duration::from_millis(16));
            }
        }

        Ok(())
    }
}

/// Actor box centred on the spawn cell.
#[cfg(feature = "sdl2")]
fn spawn_actor(tilemap: &Tilemap) -> Rectangle {
    let (x, y) = tilemap.spawn();
    let cell = tilemap.cell_rectangle(x, y);
    let side = tilemap.tile_size() * 0.75;
    let center = cell.center();

    Rectangle::new(center.x - side / 2.0, center.y - side / 2.0, side, side)
}
