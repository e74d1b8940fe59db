//! Static maze topology: cells, walls and the interior edge set
//!
//! Cells are stored row-major, so a cell's id is always `y * width + x`.
//! A wall joins one or two cells; a wall with a single cell is a boundary
//! wall on the outer edge and is never removed.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque tag marking special cells. The core only sets and looks them up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellTag(pub u8);

impl CellTag {
    pub const NONE: CellTag = CellTag(0);
    pub const START: CellTag = CellTag(1);
    pub const GOAL: CellTag = CellTag(2);
}

/// A maze cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub id: usize,
    pub x: usize,
    pub y: usize,
    /// Scratch flag for the backtracker, cleared before each run
    pub visited: bool,
    pub tag: CellTag,
}

impl Cell {
    pub fn new(id: usize, x: usize, y: usize) -> Self {
        Self {
            id,
            x,
            y,
            visited: false,
            tag: CellTag::NONE,
        }
    }
}

/// Build the row-major cell array for a `width x height` grid
pub fn make_cells(width: usize, height: usize) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            cells.push(Cell::new(y * width + x, x, y));
        }
    }
    cells
}

/// A wall between `v1` and `v2`, or a boundary wall when `v2` is `None`.
///
/// Equality ignores order: `Wall(a, Some(b)) == Wall(b, Some(a))`.
#[derive(Clone, Copy, Debug, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wall {
    pub v1: usize,
    pub v2: Option<usize>,
}

impl Wall {
    pub fn between(a: usize, b: usize) -> Self {
        Self { v1: a, v2: Some(b) }
    }

    pub fn boundary(cell: usize) -> Self {
        Self { v1: cell, v2: None }
    }

    pub fn is_boundary(&self) -> bool {
        self.v2.is_none()
    }

    /// Both cells of an interior wall
    pub fn cells(&self) -> Option<(usize, usize)> {
        self.v2.map(|v2| (self.v1, v2))
    }
}

impl PartialEq for Wall {
    fn eq(&self, other: &Self) -> bool {
        match (self.v2, other.v2) {
            (None, None) => self.v1 == other.v1,
            (Some(a2), Some(b2)) => {
                (self.v1 == other.v1 && a2 == b2) || (self.v1 == b2 && a2 == other.v1)
            }
            _ => false,
        }
    }
}

/// Every wall of a fresh grid: boundary walls first (top/bottom per column,
/// then left/right per row), then one interior wall to the right of and
/// below each cell, scanning columns outermost.
pub fn make_all_walls(width: usize, height: usize) -> Vec<Wall> {
    let mut walls = Vec::with_capacity(boundary_wall_count(width, height) + interior_wall_count(width, height));

    for x in 0..width {
        walls.push(Wall::boundary(x));
        walls.push(Wall::boundary(x + width * (height - 1)));
    }
    for y in 0..height {
        walls.push(Wall::boundary(y * width));
        walls.push(Wall::boundary(y * width + (width - 1)));
    }

    for x in 0..width {
        for y in 0..height {
            if x < width - 1 {
                walls.push(Wall::between(y * width + x, y * width + x + 1));
            }
            if y < height - 1 {
                walls.push(Wall::between(y * width + x, (y + 1) * width + x));
            }
        }
    }

    walls
}

pub fn boundary_wall_count(width: usize, height: usize) -> usize {
    2 * width + 2 * height
}

pub fn interior_wall_count(width: usize, height: usize) -> usize {
    (width - 1) * height + width * (height - 1)
}

/// Whether `a` and `b` are horizontally or vertically adjacent
pub fn adjacent(width: usize, a: usize, b: usize) -> bool {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    (hi - lo == 1 && hi % width != 0) || hi - lo == width
}

/// Whether a boundary wall on `cell` actually sits on the outer edge
pub fn on_edge(width: usize, height: usize, cell: usize) -> bool {
    let (x, y) = (cell % width, cell / width);
    x == 0 || y == 0 || x == width - 1 || y == height - 1
}

/// Up to four grid-adjacent neighbours (left, right, up, down), no wrap
pub fn neighbors(width: usize, height: usize, cell: usize) -> ([usize; 4], usize) {
    let (x, y) = (cell % width, cell / width);
    let mut out = [0usize; 4];
    let mut count = 0;

    if x != 0 {
        out[count] = cell - 1;
        count += 1;
    }
    if x != width - 1 {
        out[count] = cell + 1;
        count += 1;
    }
    if y != 0 {
        out[count] = cell - width;
        count += 1;
    }
    if y != height - 1 {
        out[count] = cell + width;
        count += 1;
    }

    (out, count)
}

/// Bitset over the interior edges of a grid.
///
/// Slot layout: the `(width - 1) * height` horizontal edges (cell to its
/// right neighbour) first, then the `width * (height - 1)` vertical edges
/// (cell to the one below).
#[derive(Clone, Debug)]
pub struct EdgeSet {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl EdgeSet {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: alloc::vec![false; interior_wall_count(width, height)],
        }
    }

    /// Slot for the edge between two adjacent cells
    fn slot(&self, a: usize, b: usize) -> Option<usize> {
        if a >= self.width * self.height || b >= self.width * self.height {
            return None;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (x, y) = (lo % self.width, lo / self.width);
        if hi == lo + 1 && x < self.width - 1 {
            Some(y * (self.width - 1) + x)
        } else if hi == lo + self.width {
            Some((self.width - 1) * self.height + lo)
        } else {
            None
        }
    }

    /// Mark the edge; returns false if already present or not an edge
    pub fn insert(&mut self, a: usize, b: usize) -> bool {
        match self.slot(a, b) {
            Some(slot) if !self.bits[slot] => {
                self.bits[slot] = true;
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.slot(a, b).map_or(false, |slot| self.bits[slot])
    }

    pub fn len(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    /// Present edges as `(lower id, higher id)` walls
    pub fn walls(&self) -> Vec<Wall> {
        let horizontal = (self.width - 1) * self.height;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, &set)| set)
            .map(|(slot, _)| {
                if slot < horizontal {
                    let (x, y) = (slot % (self.width - 1), slot / (self.width - 1));
                    let cell = y * self.width + x;
                    Wall::between(cell, cell + 1)
                } else {
                    let cell = slot - horizontal;
                    Wall::between(cell, cell + self.width)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_are_row_major() {
        let cells = make_cells(4, 3);
        assert_eq!(cells.len(), 12);
        for cell in &cells {
            assert_eq!(cell.id, cell.y * 4 + cell.x);
            assert!(!cell.visited);
            assert_eq!(cell.tag, CellTag::NONE);
        }
        assert_eq!((cells[5].x, cells[5].y), (1, 1));
    }

    #[test]
    fn test_wall_equality_is_unordered() {
        assert_eq!(Wall::between(3, 7), Wall::between(7, 3));
        assert_ne!(Wall::between(3, 7), Wall::between(3, 8));
        assert_ne!(Wall::between(3, 7), Wall::boundary(3));
        assert_eq!(Wall::boundary(2), Wall::boundary(2));
    }

    #[test]
    fn test_wall_counts() {
        let walls = make_all_walls(4, 4);
        let boundary = walls.iter().filter(|w| w.is_boundary()).count();
        let interior = walls.len() - boundary;
        assert_eq!(boundary, 16);
        assert_eq!(interior, 24);
        assert_eq!(interior, interior_wall_count(4, 4));

        let walls = make_all_walls(5, 2);
        assert_eq!(walls.iter().filter(|w| w.is_boundary()).count(), 14);
        assert_eq!(walls.iter().filter(|w| !w.is_boundary()).count(), 4 * 2 + 5);
    }

    #[test]
    fn test_interior_walls_join_adjacent_cells_once() {
        let (w, h) = (5, 4);
        let walls = make_all_walls(w, h);
        let mut seen = EdgeSet::new(w, h);
        for wall in walls.iter().filter_map(|w| w.cells()) {
            assert!(adjacent(w, wall.0, wall.1));
            assert!(seen.insert(wall.0, wall.1), "duplicate wall {:?}", wall);
        }
        assert_eq!(seen.len(), interior_wall_count(w, h));
        for wall in walls.iter().filter(|w| w.is_boundary()) {
            assert!(on_edge(w, h, wall.v1));
        }
    }

    #[test]
    fn test_adjacency_does_not_wrap_rows() {
        assert!(adjacent(4, 0, 1));
        assert!(adjacent(4, 1, 5));
        assert!(!adjacent(4, 3, 4), "end of row is not next to start of next row");
        assert!(!adjacent(4, 0, 5));
    }

    #[test]
    fn test_neighbors() {
        let (n, count) = neighbors(3, 3, 4);
        assert_eq!(&n[..count], &[3, 5, 1, 7]);
        let (n, count) = neighbors(3, 3, 0);
        assert_eq!(&n[..count], &[1, 3]);
        let (n, count) = neighbors(3, 3, 8);
        assert_eq!(&n[..count], &[7, 5]);
    }

    #[test]
    fn test_edge_set_walls_round_trip() {
        let mut edges = EdgeSet::new(3, 3);
        assert!(edges.is_empty());
        assert!(edges.insert(4, 5));
        assert!(edges.insert(7, 4));
        assert!(!edges.insert(5, 4));
        assert!(!edges.insert(2, 3), "row wrap is not an edge");

        assert!(edges.contains(5, 4));
        assert!(edges.contains(4, 7));
        assert_eq!(edges.len(), 2);
        assert_eq!(edges.walls(), alloc::vec![Wall::between(4, 5), Wall::between(4, 7)]);
    }
}
