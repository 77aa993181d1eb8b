use log::trace;

use crate::geometry::Rectangle;
use crate::tile::{CollisionType, TileId};
use crate::tilemap::{cell_span, Tilemap};

type Span = (i32, i32);

/// Extremes of the blocking cells found in a cell range.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl Bounds {
    fn cell(x: i32, y: i32) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    fn include(self, x: i32, y: i32) -> Self {
        Self {
            min_x: self.min_x.min(x),
            max_x: self.max_x.max(x),
            min_y: self.min_y.min(y),
            max_y: self.max_y.max(y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    Left,
    Right,
    Up,
    Down,
}

impl Sweep {
    const ORDER: [Sweep; 4] = [Sweep::Left, Sweep::Right, Sweep::Up, Sweep::Down];

    /// Sweeps along the other axis.
    fn across(self) -> [Sweep; 2] {
        match self {
            Sweep::Left | Sweep::Right => [Sweep::Up, Sweep::Down],
            Sweep::Up | Sweep::Down => [Sweep::Left, Sweep::Right],
        }
    }
}

/// A rectangle together with the cell range it covers.
#[derive(Debug, Clone, Copy)]
struct Placement {
    rectangle: Rectangle,
    columns: Span,
    rows: Span,
}

/// Where a sweep went: the blocked positions it passed through, nearest
/// first, and the free position it reached, if any.
struct SweepPath {
    stops: Vec<Placement>,
    cleared: Option<Rectangle>,
}

impl Tilemap {
    /// Push `rectangle` out of every cell `classify` marks as
    /// [`CollisionType::Full`].
    ///
    /// Cells past the map edge are classified as [`TileId::OutOfBounds`].
    /// The rectangle is moved along a single axis by the smallest amount
    /// that clears all blocking cells; ties prefer left, right, up, down.
    /// When no single axis works, a move along one axis followed by one
    /// along the other is tried. Returns the corrected rectangle and
    /// whether it was moved.
    ///
    /// When the map edge is solid, a rectangle reaching past it is first
    /// brought back inside, so far away or infinite coordinates still
    /// resolve. Rectangles with a NaN coordinate or without positive area
    /// overlap nothing and come back unchanged.
    pub fn get_collision<F>(&self, rectangle: Rectangle, classify: F) -> (Rectangle, bool)
    where
        F: Fn(TileId) -> CollisionType,
    {
        let edges_solid = classify(TileId::OutOfBounds) == CollisionType::Full;

        if edges_solid && self.reaches_past_edge(&rectangle) {
            let inside = self.clamp_to_extent(rectangle);
            trace!("Rectangle past the map edge, moved to ({}, {})", inside.x, inside.y);

            let (resolved, _) = self.resolve(inside, &classify, edges_solid);
            return (resolved, true);
        }

        self.resolve(rectangle, &classify, edges_solid)
    }

    fn resolve<F>(&self, rectangle: Rectangle, classify: &F, edges_solid: bool) -> (Rectangle, bool)
    where
        F: Fn(TileId) -> CollisionType,
    {
        let start = match self.placement(rectangle) {
            Some(start) => start,
            None => return (rectangle, false),
        };

        if self.blocking_bounds(start.columns, start.rows, classify).is_none() {
            return (rectangle, false);
        }

        let mut candidates = Vec::new();
        let mut crossings = Vec::new();

        for sweep in Sweep::ORDER {
            let path = self.sweep(start, sweep, classify, edges_solid);

            candidates.extend(path.cleared);
            crossings.extend(path.stops.into_iter().map(|stop| (sweep, stop)));
        }

        if candidates.is_empty() {
            for (first, stop) in crossings {
                for second in first.across() {
                    candidates.extend(self.sweep(stop, second, classify, edges_solid).cleared);
                }
            }
        }

        // Earlier candidates win ties
        let best = candidates
            .into_iter()
            .map(|candidate| {
                let distance = (candidate.x - rectangle.x).abs() + (candidate.y - rectangle.y).abs();
                (candidate, distance)
            })
            .fold(None, |best: Option<(Rectangle, f32)>, (candidate, distance)| match best {
                Some((_, shortest)) if shortest <= distance => best,
                _ => Some((candidate, distance)),
            });

        match best {
            Some((corrected, distance)) => {
                trace!("Collision resolved, moved by {}", distance);
                (corrected, true)
            }
            None => {
                trace!("No free placement reachable, clamping to the map");
                let corrected = if edges_solid {
                    self.clamp_to_extent(rectangle)
                } else {
                    rectangle
                };

                (corrected, true)
            }
        }
    }

    fn placement(&self, rectangle: Rectangle) -> Option<Placement> {
        let columns = cell_span(rectangle.left(), rectangle.right(), self.tile_size())?;
        let rows = cell_span(rectangle.top(), rectangle.bottom(), self.tile_size())?;

        Some(Placement {
            rectangle,
            columns,
            rows,
        })
    }

    fn reaches_past_edge(&self, rectangle: &Rectangle) -> bool {
        let size = self.tile_size();
        let has_area = rectangle.width > 0.0 && rectangle.height > 0.0;
        let finite_size = rectangle.width.is_finite() && rectangle.height.is_finite();

        has_area
            && finite_size
            && (rectangle.left() < 0.0
                || rectangle.top() < 0.0
                || rectangle.right() > self.width() as f32 * size
                || rectangle.bottom() > self.height() as f32 * size)
    }

    /// Cells past the edge all classify alike, so ranges are cut down to
    /// the map plus one ring of outside cells.
    fn blocking_bounds<F>(&self, columns: Span, rows: Span, classify: &F) -> Option<Bounds>
    where
        F: Fn(TileId) -> CollisionType,
    {
        let (width, height) = (self.width(), self.height());
        let (x0, x1) = (columns.0.clamp(-1, width), columns.1.clamp(-1, width));
        let (y0, y1) = (rows.0.clamp(-1, height), rows.1.clamp(-1, height));
        let mut bounds: Option<Bounds> = None;

        for y in y0..=y1 {
            for x in x0..=x1 {
                if classify(self.get(x, y)) != CollisionType::Full {
                    continue;
                }

                bounds = Some(match bounds {
                    None => Bounds::cell(x, y),
                    Some(bounds) => bounds.include(x, y),
                });
            }
        }

        bounds
    }

    /// Slide along one axis until the band the rectangle covers is free.
    /// Stops short when that would leave the map while its edges are solid.
    fn sweep<F>(&self, start: Placement, sweep: Sweep, classify: &F, edges_solid: bool) -> SweepPath
    where
        F: Fn(TileId) -> CollisionType,
    {
        let size = self.tile_size();
        let extent_width = self.width() as f32 * size;
        let extent_height = self.height() as f32 * size;
        let Placement {
            rectangle,
            mut columns,
            mut rows,
        } = start;
        let mut result = rectangle;
        let mut stops = Vec::new();

        while let Some(bounds) = self.blocking_bounds(columns, rows, classify) {
            if result != rectangle {
                stops.push(Placement {
                    rectangle: result,
                    columns,
                    rows,
                });
            }

            match sweep {
                Sweep::Left => {
                    let right = bounds.min_x as f32 * size;
                    result.x = right - rectangle.width;

                    if edges_solid && result.x < 0.0 {
                        return SweepPath { stops, cleared: None };
                    }

                    columns = ((result.x / size).floor() as i32, bounds.min_x - 1);
                }
                Sweep::Right => {
                    result.x = (bounds.max_x + 1) as f32 * size;

                    if edges_solid && result.right() > extent_width {
                        return SweepPath { stops, cleared: None };
                    }

                    columns = (bounds.max_x + 1, (result.right() / size).ceil() as i32 - 1);
                }
                Sweep::Up => {
                    let bottom = bounds.min_y as f32 * size;
                    result.y = bottom - rectangle.height;

                    if edges_solid && result.y < 0.0 {
                        return SweepPath { stops, cleared: None };
                    }

                    rows = ((result.y / size).floor() as i32, bounds.min_y - 1);
                }
                Sweep::Down => {
                    result.y = (bounds.max_y + 1) as f32 * size;

                    if edges_solid && result.bottom() > extent_height {
                        return SweepPath { stops, cleared: None };
                    }

                    rows = (bounds.max_y + 1, (result.bottom() / size).ceil() as i32 - 1);
                }
            }
        }

        SweepPath {
            stops,
            cleared: Some(result),
        }
    }

    fn clamp_to_extent(&self, rectangle: Rectangle) -> Rectangle {
        let size = self.tile_size();
        let max_x = (self.width() as f32 * size - rectangle.width).max(0.0);
        let max_y = (self.height() as f32 * size - rectangle.height).max(0.0);

        Rectangle {
            x: rectangle.x.clamp(0.0, max_x),
            y: rectangle.y.clamp(0.0, max_y),
            ..rectangle
        }
    }
}
