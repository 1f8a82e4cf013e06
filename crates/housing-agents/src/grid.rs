//! Toroidal market grid.
//!
//! Houses are placed once at setup and never move, so the grid keeps a
//! static cell index of house ids. Households only carry a [`Position`];
//! they are not indexed here.

use std::collections::{BTreeMap, BTreeSet};

use housing_types::{HouseId, Position};
use rand::Rng;

/// A `width` x `height` torus with a cell index of houses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    houses_by_cell: BTreeMap<Position, Vec<HouseId>>,
}

impl Grid {
    /// Create an empty grid. Zero dimensions are bumped to 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            houses_by_cell: BTreeMap::new(),
        }
    }

    /// Grid width in cells.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Uniformly random cell.
    pub fn random_cell(&self, rng: &mut impl Rng) -> Position {
        Position::new(
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        )
    }

    /// Register a house on its cell.
    pub fn place_house(&mut self, house: HouseId, cell: Position) {
        self.houses_by_cell.entry(cell).or_default().push(house);
    }

    /// Houses standing on a cell.
    pub fn houses_at(&self, cell: Position) -> &[HouseId] {
        self.houses_by_cell.get(&cell).map_or(&[], Vec::as_slice)
    }

    /// Distinct cells of the radius-1 Moore neighborhood, wrapping at the
    /// edges. The center cell is excluded.
    pub fn moore_neighbors(&self, cell: Position) -> BTreeSet<Position> {
        let mut out = BTreeSet::new();
        for dx in [-1_i64, 0, 1] {
            for dy in [-1_i64, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let neighbor = Position::new(
                    wrap(cell.x, dx, self.width),
                    wrap(cell.y, dy, self.height),
                );
                if neighbor != cell {
                    out.insert(neighbor);
                }
            }
        }
        out
    }

    /// Houses on all neighboring cells of `cell`.
    pub fn neighbor_houses(&self, cell: Position) -> Vec<HouseId> {
        self.moore_neighbors(cell)
            .into_iter()
            .flat_map(|c| self.houses_at(c).iter().copied())
            .collect()
    }
}

/// Add `delta` to `coord` modulo `size`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn wrap(coord: u32, delta: i64, size: u32) -> u32 {
    let size = i64::from(size.max(1));
    // rem_euclid keeps the result in [0, size), which fits in u32.
    (i64::from(coord) + delta).rem_euclid(size) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_cell_has_eight_neighbors() {
        let grid = Grid::new(10, 10);
        let n = grid.moore_neighbors(Position::new(5, 5));
        assert_eq!(n.len(), 8);
        assert!(n.contains(&Position::new(4, 4)));
        assert!(n.contains(&Position::new(6, 6)));
        assert!(!n.contains(&Position::new(5, 5)));
    }

    #[test]
    fn corner_wraps_around() {
        let grid = Grid::new(10, 10);
        let n = grid.moore_neighbors(Position::new(0, 0));
        assert_eq!(n.len(), 8);
        assert!(n.contains(&Position::new(9, 9)));
        assert!(n.contains(&Position::new(9, 0)));
        assert!(n.contains(&Position::new(0, 9)));
    }

    #[test]
    fn tiny_grid_deduplicates() {
        let grid = Grid::new(2, 1);
        let n = grid.moore_neighbors(Position::new(0, 0));
        assert_eq!(n.len(), 1);
        assert!(n.contains(&Position::new(1, 0)));

        let single = Grid::new(1, 1);
        assert!(single.moore_neighbors(Position::new(0, 0)).is_empty());
    }

    #[test]
    fn neighbor_houses_skip_center() {
        let mut grid = Grid::new(5, 5);
        grid.place_house(HouseId::new(1), Position::new(2, 2));
        grid.place_house(HouseId::new(2), Position::new(1, 2));
        grid.place_house(HouseId::new(3), Position::new(1, 2));
        grid.place_house(HouseId::new(4), Position::new(4, 4));

        let near = grid.neighbor_houses(Position::new(2, 2));
        assert_eq!(near, vec![HouseId::new(2), HouseId::new(3)]);
    }

    #[test]
    fn zero_dimensions_are_bumped() {
        let grid = Grid::new(0, 0);
        assert_eq!(grid.width(), 1);
        assert_eq!(grid.height(), 1);
    }
}
