//! Collision and trigger resolution against the static tile map

use super::bonus::GridCell;
use super::input::Direction;

const EDGE_EPSILON: f32 = 1e-3;

/// Axis-aligned box in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }
}

/// Result of probing one direction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisProbe {
    /// A full step would enter a solid cell
    pub blocked: bool,
    /// Signed delta that brings the box flush with the obstacle
    pub clamp: f32,
}

/// Per-direction probe results for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroundProbe {
    pub up: AxisProbe,
    pub down: AxisProbe,
    pub left: AxisProbe,
    pub right: AxisProbe,
}

impl GroundProbe {
    /// Nothing blocks in any direction
    pub fn open() -> Self {
        Self::default()
    }

    pub fn axis(&self, direction: Direction) -> AxisProbe {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Displacement for one step of `speed` in `direction`
    pub fn step(&self, direction: Direction, speed: f32) -> (f32, f32) {
        let axis = self.axis(direction);
        let delta = |sign: f32| if axis.blocked { axis.clamp } else { sign * speed };
        match direction {
            Direction::Up => (0.0, delta(-1.0)),
            Direction::Down => (0.0, delta(1.0)),
            Direction::Left => (delta(-1.0), 0.0),
            Direction::Right => (delta(1.0), 0.0),
        }
    }
}

/// Answers, per direction, whether a box can move `reach` pixels.
pub trait CollisionResolver {
    fn probe(&self, bounds: &Aabb, reach: f32) -> GroundProbe;
}

/// Answers whether a box overlaps a pickup cell.
pub trait TriggerResolver {
    fn overlaps(&self, bounds: &Aabb, cell: GridCell) -> bool;
}

/// Grid of solid/open cells.
///
/// Cells outside the grid are open, and a degenerate map blocks nothing:
/// stale or missing map data must never freeze the player.
#[derive(Debug, Clone)]
pub struct TileMap {
    tile_size: f32,
    cols: usize,
    rows: usize,
    solid: Vec<bool>,
}

impl TileMap {
    /// Build from text rows where `#` is solid and anything else is open.
    pub fn from_rows(rows: &[&str], tile_size: f32) -> Self {
        let cols = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut solid = vec![false; cols * rows.len()];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                solid[y * cols + x] = ch == '#';
            }
        }
        Self {
            tile_size,
            cols,
            rows: rows.len(),
            solid,
        }
    }

    /// Walled arena with a pillar on every even interior cell
    pub fn arena(cols: usize, rows: usize, tile_size: f32) -> Self {
        let mut solid = vec![false; cols * rows];
        for y in 0..rows {
            for x in 0..cols {
                let border = x == 0 || y == 0 || x + 1 == cols || y + 1 == rows;
                let pillar = x % 2 == 0 && y % 2 == 0;
                solid[y * cols + x] = border || pillar;
            }
        }
        Self {
            tile_size,
            cols,
            rows,
            solid,
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn is_solid(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return false;
        }
        self.solid[y as usize * self.cols + x as usize]
    }

    pub fn cell_bounds(&self, cell: GridCell) -> Aabb {
        Aabb {
            x: cell.x as f32 * self.tile_size,
            y: cell.y as f32 * self.tile_size,
            w: self.tile_size,
            h: self.tile_size,
        }
    }

    fn is_usable(&self) -> bool {
        self.tile_size.is_finite() && self.tile_size > 0.0 && !self.solid.is_empty()
    }

    fn index(&self, coord: f32) -> i64 {
        (coord / self.tile_size).floor() as i64
    }

    fn span(&self, start: f32, len: f32) -> (i64, i64) {
        (self.index(start), self.index(start + len - EDGE_EPSILON))
    }

    fn row_blocked(&self, row: i64, cols: (i64, i64)) -> bool {
        (cols.0..=cols.1).any(|col| self.is_solid(col, row))
    }

    fn col_blocked(&self, col: i64, rows: (i64, i64)) -> bool {
        (rows.0..=rows.1).any(|row| self.is_solid(col, row))
    }

    /// Free distance in `direction`, capped at `reach`
    fn free_distance(&self, b: &Aabb, direction: Direction, reach: f32) -> f32 {
        let t = self.tile_size;
        let gap = match direction {
            Direction::Up => {
                let cols = self.span(b.x, b.w);
                let start = self.index(b.y - EDGE_EPSILON);
                let end = self.index(b.y - reach);
                (end..=start)
                    .rev()
                    .find(|row| self.row_blocked(*row, cols))
                    .map(|row| b.y - (row + 1) as f32 * t)
            }
            Direction::Down => {
                let cols = self.span(b.x, b.w);
                let start = self.index(b.bottom() + EDGE_EPSILON);
                let end = self.index(b.bottom() + reach);
                (start..=end)
                    .find(|row| self.row_blocked(*row, cols))
                    .map(|row| row as f32 * t - b.bottom())
            }
            Direction::Left => {
                let rows = self.span(b.y, b.h);
                let start = self.index(b.x - EDGE_EPSILON);
                let end = self.index(b.x - reach);
                (end..=start)
                    .rev()
                    .find(|col| self.col_blocked(*col, rows))
                    .map(|col| b.x - (col + 1) as f32 * t)
            }
            Direction::Right => {
                let rows = self.span(b.y, b.h);
                let start = self.index(b.right() + EDGE_EPSILON);
                let end = self.index(b.right() + reach);
                (start..=end)
                    .find(|col| self.col_blocked(*col, rows))
                    .map(|col| col as f32 * t - b.right())
            }
        };
        gap.map_or(reach, |gap| gap.clamp(0.0, reach))
    }

    fn axis_probe(&self, b: &Aabb, direction: Direction, reach: f32) -> AxisProbe {
        let free = self.free_distance(b, direction, reach);
        if free >= reach {
            return AxisProbe::default();
        }
        let clamp = match direction {
            Direction::Up | Direction::Left => -free,
            Direction::Down | Direction::Right => free,
        };
        AxisProbe {
            blocked: true,
            clamp,
        }
    }
}

impl CollisionResolver for TileMap {
    fn probe(&self, bounds: &Aabb, reach: f32) -> GroundProbe {
        if !self.is_usable() || !bounds.is_finite() || reach.is_nan() || reach <= 0.0 {
            return GroundProbe::open();
        }
        GroundProbe {
            up: self.axis_probe(bounds, Direction::Up, reach),
            down: self.axis_probe(bounds, Direction::Down, reach),
            left: self.axis_probe(bounds, Direction::Left, reach),
            right: self.axis_probe(bounds, Direction::Right, reach),
        }
    }
}

impl TriggerResolver for TileMap {
    fn overlaps(&self, bounds: &Aabb, cell: GridCell) -> bool {
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return false;
        }
        bounds.overlaps(&self.cell_bounds(cell))
    }
}

/// Map used when no map data is loaded: nothing blocks, nothing triggers
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl CollisionResolver for OpenField {
    fn probe(&self, _bounds: &Aabb, _reach: f32) -> GroundProbe {
        GroundProbe::open()
    }
}

impl TriggerResolver for OpenField {
    fn overlaps(&self, _bounds: &Aabb, _cell: GridCell) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> TileMap {
        TileMap::from_rows(
            &[
                "#####", //
                "#...#", //
                "#####", //
            ],
            32.0,
        )
    }

    fn player_at(x: f32, y: f32) -> Aabb {
        Aabb { x, y, w: 24.0, h: 24.0 }
    }

    #[test]
    fn open_space_is_not_blocked() {
        let map = corridor();
        let probe = map.probe(&player_at(64.0, 36.0), 2.0);
        assert!(!probe.left.blocked);
        assert!(!probe.right.blocked);
    }

    #[test]
    fn wall_clamps_to_remaining_gap() {
        let map = corridor();
        // right edge at 127, wall column 4 starts at 128
        let probe = map.probe(&player_at(103.0, 36.0), 2.0);
        assert!(probe.right.blocked);
        assert!((probe.right.clamp - 1.0).abs() < 1e-4);
        assert_eq!(probe.step(Direction::Right, 2.0), (probe.right.clamp, 0.0));
    }

    #[test]
    fn flush_against_wall_clamps_to_zero() {
        let map = corridor();
        // top edge at 32 touches row 0
        let probe = map.probe(&player_at(40.0, 32.0), 2.0);
        assert!(probe.up.blocked);
        assert_eq!(probe.up.clamp, 0.0);
        // bottom edge at 56, wall row 2 starts at 64
        assert!(!probe.down.blocked);
    }

    #[test]
    fn out_of_grid_and_degenerate_maps_block_nothing() {
        let map = corridor();
        let far = map.probe(&player_at(1000.0, 1000.0), 2.0);
        assert_eq!(far, GroundProbe::open());

        let broken = TileMap::from_rows(&[], 0.0);
        assert_eq!(broken.probe(&player_at(0.0, 0.0), 2.0), GroundProbe::open());

        let nan = player_at(f32::NAN, 0.0);
        assert_eq!(map.probe(&nan, 2.0), GroundProbe::open());
    }

    #[test]
    fn trigger_needs_strict_overlap() {
        let map = corridor();
        let cell = GridCell::new(2, 1);
        assert!(map.overlaps(&player_at(50.0, 36.0), cell));
        // right edge exactly on the cell's left edge
        assert!(!map.overlaps(&player_at(40.0, 36.0), cell));
    }

    #[test]
    fn arena_has_walls_and_pillars() {
        let map = TileMap::arena(7, 7, 32.0);
        assert!(map.is_solid(0, 3));
        assert!(map.is_solid(2, 2));
        assert!(!map.is_solid(1, 1));
        assert!(!map.is_solid(3, 1));
    }
}
