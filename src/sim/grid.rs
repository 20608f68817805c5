//! The arena grid
//!
//! A fixed square of tiles generated once per match. Special types are drawn
//! from stacked probability bands; ownership is the only thing that changes
//! afterwards.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::tile::{Tile, TileKind};
use crate::settings::{ArenaSettings, TileProbabilities, TileSettings};
use crate::{Color, PlayerId};

/// Grid coordinate (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
}

impl Cell {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Pick a tile type for one uniform roll in [0, 1).
///
/// Bands are tested in a fixed order (Teleporter, Damage, Sticky, Healing,
/// Super) against the running sum, so the first band whose upper bound
/// exceeds the roll wins.
pub fn roll_kind(roll: f32, probabilities: &TileProbabilities) -> TileKind {
    let bands = [
        (TileKind::Teleporter, probabilities.teleporter),
        (TileKind::Damage, probabilities.damage),
        (TileKind::Sticky, probabilities.sticky),
        (TileKind::Healing, probabilities.healing),
        (TileKind::Super, probabilities.super_tile),
    ];

    let mut upper = 0.0;
    for (kind, p) in bands {
        upper += p;
        if roll < upper {
            return kind;
        }
    }
    TileKind::None
}

/// Square matrix of tiles, row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Generate a grid with randomly placed special tiles
    pub fn generate<R: Rng>(
        arena: &ArenaSettings,
        tuning: &TileSettings,
        rng: &mut R,
    ) -> Self {
        let probabilities = arena.probabilities;
        let grid = Self::from_fn(arena.grid_size, arena.tile_size, tuning, |_| {
            roll_kind(rng.random::<f32>(), &probabilities)
        });

        log::debug!(
            "Generated {}x{} grid: {} teleporter, {} damage, {} sticky, {} healing, {} super",
            grid.size,
            grid.size,
            grid.count_kind(TileKind::Teleporter),
            grid.count_kind(TileKind::Damage),
            grid.count_kind(TileKind::Sticky),
            grid.count_kind(TileKind::Healing),
            grid.count_kind(TileKind::Super),
        );
        grid
    }

    /// Build a grid with an explicit layout (cells visited row-major)
    pub fn from_fn(
        size: usize,
        tile_size: f32,
        tuning: &TileSettings,
        mut kind_at: impl FnMut(Cell) -> TileKind,
    ) -> Self {
        let mut tiles = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let cell = Cell::new(col, row);
                let pos = Vec2::new(col as f32 * tile_size, row as f32 * tile_size);
                tiles.push(Tile::new(kind_at(cell), pos, tuning));
            }
        }
        Self {
            size,
            tile_size,
            tiles,
        }
    }

    /// Tiles per side
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Side length of the arena in world units
    #[inline]
    pub fn world_size(&self) -> f32 {
        self.size as f32 * self.tile_size
    }

    #[inline]
    pub fn total_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Tiles with their coordinates, row-major
    pub fn iter_cells(&self) -> impl Iterator<Item = (Cell, &Tile)> {
        let size = self.size;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (Cell::new(i % size, i / size), tile))
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        (cell.col < self.size && cell.row < self.size).then(|| cell.row * self.size + cell.col)
    }

    pub fn tile(&self, cell: Cell) -> Option<&Tile> {
        self.index(cell).map(|i| &self.tiles[i])
    }

    pub fn tile_mut(&mut self, cell: Cell) -> Option<&mut Tile> {
        self.index(cell).map(|i| &mut self.tiles[i])
    }

    /// World-space bounds of a cell
    pub fn cell_bounds(&self, cell: Cell) -> Aabb {
        let min = Vec2::new(cell.col as f32, cell.row as f32) * self.tile_size;
        Aabb::new(min, min + Vec2::splat(self.tile_size))
    }

    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        (Vec2::new(cell.col as f32, cell.row as f32) + Vec2::splat(0.5)) * self.tile_size
    }

    /// Cell containing a world position, clamped to the grid
    pub fn cell_at(&self, pos: Vec2) -> Cell {
        Cell::new(self.clamp_axis(pos.x), self.clamp_axis(pos.y))
    }

    fn clamp_axis(&self, coord: f32) -> usize {
        let idx = (coord / self.tile_size).floor();
        if idx <= 0.0 {
            0
        } else {
            (idx as usize).min(self.size.saturating_sub(1))
        }
    }

    /// Inclusive range of cells covering a box, clamped to the grid
    pub fn cell_range(&self, bounds: &Aabb) -> (Cell, Cell) {
        (self.cell_at(bounds.min), self.cell_at(bounds.max))
    }

    /// Set the owner of one tile. Out-of-range cells are ignored.
    pub fn claim(&mut self, cell: Cell, player: PlayerId, color: Color) -> bool {
        match self.tile_mut(cell) {
            Some(tile) => {
                tile.claim(player, color);
                true
            }
            None => false,
        }
    }

    /// Claim every tile whose center lies within the circle.
    ///
    /// Returns how many tiles changed owner.
    pub fn paint_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        player: PlayerId,
        color: Color,
    ) -> usize {
        let reach = Aabb::from_center(center, Vec2::splat(radius));
        let (min, max) = self.cell_range(&reach);
        let radius_sq = radius * radius;
        let mut changed = 0;

        for row in min.row..=max.row {
            for col in min.col..=max.col {
                let cell = Cell::new(col, row);
                if self.cell_center(cell).distance_squared(center) > radius_sq {
                    continue;
                }
                if let Some(tile) = self.tile_mut(cell) {
                    if !tile.is_owned_by(player) {
                        changed += 1;
                    }
                    tile.claim(player, color);
                }
            }
        }
        changed
    }

    /// Unclaim every tile (new round)
    pub fn reset_ownership(&mut self) {
        for tile in &mut self.tiles {
            tile.release();
        }
    }

    /// Number of tiles owned per player (unowned tiles are not listed)
    pub fn player_tile_counts(&self) -> BTreeMap<PlayerId, usize> {
        let mut counts = BTreeMap::new();
        for owner in self.tiles.iter().filter_map(Tile::owner) {
            *counts.entry(owner).or_insert(0) += 1;
        }
        counts
    }

    pub fn owned_by(&self, player: PlayerId) -> usize {
        self.tiles.iter().filter(|t| t.is_owned_by(player)).count()
    }

    pub fn count_kind(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind() == kind).count()
    }

    /// Pick a uniformly random cell
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cell {
        Cell::new(rng.random_range(0..self.size), rng.random_range(0..self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn plain_grid(size: usize) -> Grid {
        Grid::from_fn(size, 20.0, &TileSettings::default(), |_| TileKind::None)
    }

    #[test]
    fn test_tile_count_and_positions() {
        let grid = plain_grid(7);
        assert_eq!(grid.total_tiles(), 49);
        assert_eq!(grid.world_size(), 140.0);
        let tile = grid.tile(Cell::new(3, 2)).unwrap();
        assert_eq!(tile.pos(), Vec2::new(60.0, 40.0));
        assert!(grid.tile(Cell::new(7, 0)).is_none());
    }

    #[test]
    fn test_roll_kind_band_order() {
        let p = TileProbabilities {
            teleporter: 0.1,
            damage: 0.1,
            sticky: 0.1,
            healing: 0.1,
            super_tile: 0.1,
        };
        assert_eq!(roll_kind(0.0, &p), TileKind::Teleporter);
        assert_eq!(roll_kind(0.099, &p), TileKind::Teleporter);
        assert_eq!(roll_kind(0.15, &p), TileKind::Damage);
        assert_eq!(roll_kind(0.25, &p), TileKind::Sticky);
        assert_eq!(roll_kind(0.35, &p), TileKind::Healing);
        assert_eq!(roll_kind(0.45, &p), TileKind::Super);
        assert_eq!(roll_kind(0.5, &p), TileKind::None);
        assert_eq!(roll_kind(0.99, &p), TileKind::None);
    }

    #[test]
    fn test_roll_kind_zero_width_band_is_skipped() {
        let p = TileProbabilities {
            teleporter: 0.0,
            damage: 0.5,
            sticky: 0.0,
            healing: 0.0,
            super_tile: 0.5,
        };
        assert_eq!(roll_kind(0.0, &p), TileKind::Damage);
        assert_eq!(roll_kind(0.5, &p), TileKind::Super);
    }

    #[test]
    fn test_distribution_converges() {
        let arena = ArenaSettings {
            grid_size: 300,
            tile_size: 20.0,
            probabilities: TileProbabilities {
                teleporter: 0.05,
                damage: 0.1,
                sticky: 0.1,
                healing: 0.05,
                super_tile: 0.1,
            },
        };
        let mut rng = Pcg32::seed_from_u64(42);
        let grid = Grid::generate(&arena, &TileSettings::default(), &mut rng);
        let total = grid.total_tiles() as f32;

        let expect = [
            (TileKind::Teleporter, 0.05),
            (TileKind::Damage, 0.1),
            (TileKind::Sticky, 0.1),
            (TileKind::Healing, 0.05),
            (TileKind::Super, 0.1),
            (TileKind::None, 0.6),
        ];
        for (kind, p) in expect {
            let observed = grid.count_kind(kind) as f32 / total;
            assert!(
                (observed - p).abs() < 0.01,
                "{kind:?}: observed {observed}, expected {p}"
            );
        }
    }

    #[test]
    fn test_same_rng_stream_gives_different_grids() {
        let arena = ArenaSettings {
            grid_size: 30,
            ..ArenaSettings::default()
        };
        let tuning = TileSettings::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let a = Grid::generate(&arena, &tuning, &mut rng);
        let b = Grid::generate(&arena, &tuning, &mut rng);
        let same = a
            .tiles()
            .iter()
            .zip(b.tiles())
            .all(|(x, y)| x.kind() == y.kind());
        assert!(!same);

        // Same seed reproduces the layout
        let mut rng = Pcg32::seed_from_u64(7);
        let c = Grid::generate(&arena, &tuning, &mut rng);
        assert!(a.tiles().iter().zip(c.tiles()).all(|(x, y)| x.kind() == y.kind()));
    }

    #[test]
    fn test_cell_at_clamps() {
        let grid = plain_grid(10);
        assert_eq!(grid.cell_at(Vec2::new(-50.0, -1.0)), Cell::new(0, 0));
        assert_eq!(grid.cell_at(Vec2::new(45.0, 19.9)), Cell::new(2, 0));
        assert_eq!(grid.cell_at(Vec2::new(10_000.0, 200.0)), Cell::new(9, 9));
    }

    #[test]
    fn test_tile_counts() {
        let mut grid = plain_grid(4);
        assert!(grid.player_tile_counts().is_empty());

        grid.claim(Cell::new(0, 0), 1, Color::BLUE);
        grid.claim(Cell::new(1, 0), 1, Color::BLUE);
        grid.claim(Cell::new(2, 0), 2, Color::CYAN);
        // Re-claim moves the tile, it is never counted twice
        grid.claim(Cell::new(1, 0), 2, Color::CYAN);
        assert!(!grid.claim(Cell::new(9, 9), 1, Color::BLUE));

        let counts = grid.player_tile_counts();
        assert_eq!(counts.get(&1), Some(&1));
        assert_eq!(counts.get(&2), Some(&2));
        assert_eq!(grid.owned_by(2), 2);

        grid.reset_ownership();
        assert!(grid.player_tile_counts().is_empty());
    }

    #[test]
    fn test_paint_circle() {
        let mut grid = plain_grid(20);
        let center = grid.cell_center(Cell::new(10, 10));

        // Radius of exactly one tile reaches the 4 orthogonal neighbours
        let changed = grid.paint_circle(center, 20.0, 1, Color::BLUE);
        assert_eq!(changed, 5);
        assert!(grid.tile(Cell::new(10, 9)).unwrap().is_owned_by(1));
        assert!(grid.tile(Cell::new(11, 11)).unwrap().owner().is_none());

        // Repainting the same area changes nothing
        assert_eq!(grid.paint_circle(center, 20.0, 1, Color::BLUE), 0);

        // Opponent steals them back
        assert_eq!(grid.paint_circle(center, 20.0, 2, Color::CYAN), 5);
        assert_eq!(grid.owned_by(1), 0);
    }

    #[test]
    fn test_paint_circle_at_corner_is_clamped() {
        let mut grid = plain_grid(5);
        let changed = grid.paint_circle(Vec2::new(0.0, 0.0), 32.0, 1, Color::BLUE);
        // Centers (10,10), (30,10), (10,30) are within 32 units
        assert_eq!(changed, 3);
    }
}
