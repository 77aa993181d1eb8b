use std::fmt;

use log::{debug, trace};

use crate::geometry::{Rectangle, Vector2};
use crate::grid::Grid;
use crate::render::Renderer;
use crate::system::System;
use crate::tile::{Theme, TileId};

pub const DEFAULT_TILE_SIZE: f32 = 16.0;

/// The level: tile grid, item bookkeeping and the tile visuals.
///
/// Cells are stored row-major, `index = x + y * width`. Coordinates are
/// signed so that callers can probe past the edges; such reads return
/// [`TileId::OutOfBounds`] and writes are ignored.
#[derive(Debug, Clone)]
pub struct Tilemap {
    pub(crate) grid: Grid<TileId>,
    pub(crate) free_cells: Vec<usize>,
    pub(crate) total_orbs: usize,
    pub(crate) orbs_collected: usize,
    tile_size: f32,
    themes: Vec<Theme>,
    theme: usize,
}

impl Default for Tilemap {
    fn default() -> Self {
        Self::new()
    }
}

impl Tilemap {
    /// An empty 0x0 map; call [`Tilemap::regenerate`] to fill it.
    pub fn new() -> Self {
        Self::with_tile_size(DEFAULT_TILE_SIZE)
    }

    pub fn with_tile_size(tile_size: f32) -> Self {
        Self {
            grid: Grid::filled(0, 0, TileId::Empty),
            free_cells: Vec::new(),
            total_orbs: 0,
            orbs_collected: 0,
            tile_size: tile_size.max(f32::EPSILON),
            themes: Vec::new(),
            theme: 0,
        }
    }

    /// Install the identity to texture-layer table, one entry per theme.
    pub fn init(&mut self, themes: Vec<Theme>) {
        debug!("Tilemap initialised with {} themes", themes.len());

        self.themes = themes;
        self.theme = self.theme.min(self.themes.len().saturating_sub(1));
    }

    pub fn width(&self) -> i32 {
        self.grid.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.grid.height() as i32
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn grid(&self) -> &Grid<TileId> {
        &self.grid
    }

    /// Linear index of `(x, y)` in the row-major layout.
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }

        self.grid.index(x as usize, y as usize)
    }

    pub fn position_of(&self, index: usize) -> Option<(i32, i32)> {
        self.grid
            .position(index)
            .map(|(x, y)| (x as i32, y as i32))
    }

    pub fn get(&self, x: i32, y: i32) -> TileId {
        match self.index_of(x, y) {
            Some(index) => self.grid.as_slice()[index],
            None => TileId::OutOfBounds,
        }
    }

    /// Overwrite a cell. The free-cell pool is not updated.
    pub fn set(&mut self, x: i32, y: i32, id: TileId) {
        if x >= 0 && y >= 0 {
            // Out of range writes are dropped
            let _ = self.grid.set(x as usize, y as usize, id);
        }
    }

    /// Fill `[x, x + width) × [y, y + height)`, clipped to the map.
    pub fn set_area(&mut self, x: i32, y: i32, width: i32, height: i32, id: TileId) {
        let x_start = i64::from(x).max(0);
        let y_start = i64::from(y).max(0);
        let x_end = (i64::from(x) + i64::from(width)).min(i64::from(self.width()));
        let y_end = (i64::from(y) + i64::from(height)).min(i64::from(self.height()));

        for cy in y_start..y_end {
            for cx in x_start..x_end {
                self.set(cx as i32, cy as i32, id);
            }
        }
    }

    /// Like [`Tilemap::set_area`], with the top row drawn as `top_id`.
    pub fn set_area_with_top(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        mid_id: TileId,
        top_id: TileId,
    ) {
        if height <= 0 {
            return;
        }

        self.set_area(x, y, width, height, mid_id);
        self.set_area(x, y, width, 1, top_id);
    }

    /// Indices that held `Empty` when the map was generated.
    ///
    /// Runtime edits through `set`, `set_area*` or `collect_orb` do not
    /// touch this pool.
    pub fn free_cells(&self) -> &[usize] {
        &self.free_cells
    }

    /// Designated start cell, the centre of the map.
    pub fn spawn(&self) -> (i32, i32) {
        (self.width() / 2, self.height() / 2)
    }

    /// World-space rectangle covered by cell `(x, y)`.
    pub fn cell_rectangle(&self, x: i32, y: i32) -> Rectangle {
        Rectangle::new(
            x as f32 * self.tile_size,
            y as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// In-map cells that `rectangle` overlaps with positive area.
    pub fn cells_at(&self, rectangle: &Rectangle) -> Vec<(i32, i32, TileId)> {
        let mut output = Vec::new();

        let columns = cell_span(rectangle.left(), rectangle.right(), self.tile_size);
        let rows = cell_span(rectangle.top(), rectangle.bottom(), self.tile_size);

        if let (Some((x0, x1)), Some((y0, y1))) = (columns, rows) {
            for y in y0.max(0)..=y1.min(self.height() - 1) {
                for x in x0.max(0)..=x1.min(self.width() - 1) {
                    output.push((x, y, self.get(x, y)));
                }
            }
        }

        output
    }

    pub fn total_orbs(&self) -> usize {
        self.total_orbs
    }

    pub fn orbs_collected(&self) -> usize {
        self.orbs_collected
    }

    pub fn all_orbs_collected(&self) -> bool {
        self.orbs_collected >= self.total_orbs
    }

    /// Take the orb at `(x, y)`, clearing the cell.
    pub fn collect_orb(&mut self, x: i32, y: i32) -> bool {
        if self.get(x, y) != TileId::Orb || self.orbs_collected >= self.total_orbs {
            return false;
        }

        self.set(x, y, TileId::Empty);
        self.orbs_collected += 1;

        trace!(
            "Orb collected at ({}, {}), {}/{}",
            x,
            y,
            self.orbs_collected,
            self.total_orbs
        );

        true
    }

    pub fn theme(&self) -> usize {
        self.theme
    }

    pub fn theme_count(&self) -> usize {
        self.themes.len()
    }

    pub fn set_theme(&mut self, theme: usize) {
        self.theme = theme;
    }

    /// Draw every cell's texture layers for `theme`, lowest layer first.
    pub fn render<R>(&self, renderer: &mut R, theme: usize) -> Result<(), R::Error>
    where
        R: Renderer + ?Sized,
    {
        let table = match self.themes.get(theme) {
            Some(table) => table,
            None => {
                trace!("No theme {} installed, nothing to draw", theme);
                return Ok(());
            }
        };

        for (x, y, id) in &self.grid {
            let position = Vector2::new(x as f32 * self.tile_size, y as f32 * self.tile_size);

            for &layer in &table[*id].layers {
                renderer.draw_texture(layer, position, self.tile_size)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Tilemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                write!(f, "{}", self.get(x, y).symbol())?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

impl System for Tilemap {
    fn render(&mut self, renderer: &mut dyn Renderer<Error = String>) -> Result<(), String> {
        Tilemap::render(self, renderer, self.theme)
    }
}

/// Inclusive range of cells whose span `[i * size, (i + 1) * size)`
/// overlaps `[low, high)` with positive length. Non-finite ends and spans
/// that collapse at f32 precision cover nothing.
pub(crate) fn cell_span(low: f32, high: f32, size: f32) -> Option<(i32, i32)> {
    if !low.is_finite() || !high.is_finite() || high <= low {
        return None;
    }

    let first = (low / size).floor() as i32;
    let last = (high / size).ceil() as i32 - 1;

    if last < first {
        None
    } else {
        Some((first, last))
    }
}
