use chaser_tilemap::{Config, Difficulty, Size};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use structopt::clap::Shell;
use structopt::StructOpt;
use structopt_flags::QuietVerbose;

fn load_config(s: &str) -> Result<Config, String> {
    let path = PathBuf::from(s);
    let file = File::open(path).map_err(|e| format!("Failed to open config file: {}", e))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| format!("Failed to parse config file: {}", e))?;
    Ok(config)
}

#[derive(Debug)]
pub struct RendererConfig {
    #[cfg(feature = "sdl2")]
    pub visual: bool,
    #[cfg(feature = "sdl2")]
    pub vsync: bool,
    #[cfg(feature = "sdl2")]
    pub fullscreen: bool,
}

#[derive(Debug)]
pub struct AppConfig {
    pub level: Config,
    pub seed: Option<u64>,
    pub theme: usize,
    pub tile_size: u32,
    pub png_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub print: bool,
    pub renderer: RendererConfig,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "chaser-tilemap",
    about = "Generate and explore procedural chase levels"
)]
pub struct Opt {
    #[structopt(flatten)]
    pub verbose: QuietVerbose,

    #[structopt(
        parse(try_from_str = load_config),
        short,
        long,
        help = "JSON level config; flags below override it"
    )]
    config: Option<Config>,

    #[structopt(
        parse(try_from_str),
        short,
        long,
        help = "Difficulty: easy, hard, extreme or a number (clamped to 0-2)"
    )]
    difficulty: Option<Difficulty>,

    #[structopt(
        parse(try_from_str),
        short = "o",
        long,
        help = "Map size in cells, e.g. 32x24"
    )]
    size: Option<Size>,

    #[structopt(parse(try_from_str), short, long, help = "Random seed")]
    seed: Option<u64>,

    #[structopt(short, long, default_value = "0", help = "Theme index")]
    theme: usize,

    #[structopt(long, default_value = "16", help = "Tile size in pixels")]
    tile_size: u32,

    #[structopt(long, parse(from_os_str), help = "Save the map as an image")]
    png: Option<PathBuf>,

    #[structopt(long, parse(from_os_str), help = "Save the tile ids as JSON")]
    json: Option<PathBuf>,

    #[structopt(long, help = "Do not print the map to stdout")]
    quiet_map: bool,

    #[cfg(feature = "sdl2")]
    #[structopt(short = "w", long, help = "Open a window and play the map")]
    visual: bool,

    #[cfg(feature = "sdl2")]
    #[structopt(long, help = "Turns on vsync")]
    vsync: bool,

    #[cfg(feature = "sdl2")]
    #[structopt(short, long, help = "Runs the application in full screen")]
    fullscreen: bool,

    #[structopt(long, possible_values = &Shell::variants(), case_insensitive = true, help = "Generate shell completions and exit")]
    pub completions: Option<Shell>,
}

impl Opt {
    pub fn to_app_config(self) -> AppConfig {
        let mut level = self.config.unwrap_or_default();

        if let Some(difficulty) = self.difficulty {
            level.difficulty = difficulty;
        }

        if let Some(size) = self.size {
            level.size = size;
        }

        AppConfig {
            level,
            seed: self.seed,
            theme: self.theme,
            tile_size: self.tile_size.max(1),
            png_path: self.png,
            json_path: self.json,
            print: !self.quiet_map,
            renderer: RendererConfig {
                #[cfg(feature = "sdl2")]
                visual: self.visual,
                #[cfg(feature = "sdl2")]
                vsync: self.vsync,
                #[cfg(feature = "sdl2")]
                fullscreen: self.fullscreen,
            },
        }
    }
}
