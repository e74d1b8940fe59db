//! Bit-packed toroidal automaton board
//!
//! One byte per cell, row-major:
//! - bits 0..=3: number of live neighbours (0-8)
//! - bit 4: liveness flag
//! - bits 5..=7: unused, always zero
//!
//! Neighbour counts are maintained incrementally by `set_alive` and
//! `set_dead`; they are never recomputed during normal stepping. All
//! coordinates wrap at every edge.

use alloc::vec::Vec;

use crate::error::{ConfigError, SnapshotError};
use crate::{MAX_CELLS, MIN_BOARD_DIM};

pub const ALIVE_MASK: u8 = 0x10;
pub const NEIGHBORS_MASK: u8 = 0x0f;
const MAX_NEIGHBORS: u8 = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutomatonBoard {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl AutomatonBoard {
    /// An all-dead board
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        if width < MIN_BOARD_DIM || height < MIN_BOARD_DIM {
            return Err(ConfigError::BoardTooSmall { width, height });
        }
        let area = match width.checked_mul(height) {
            Some(area) if area <= MAX_CELLS => area,
            _ => return Err(ConfigError::TooLarge { width, height }),
        };
        Ok(Self {
            width,
            height,
            cells: alloc::vec![0; area],
        })
    }

    /// Rebuild a board from packed bytes, checking every byte and the
    /// neighbour count invariant.
    pub fn from_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, SnapshotError> {
        let mut board = Self::new(width, height)?;
        if bytes.len() != board.cells.len() {
            return Err(SnapshotError::Truncated);
        }
        for (index, &byte) in bytes.iter().enumerate() {
            if byte & !(ALIVE_MASK | NEIGHBORS_MASK) != 0 || byte & NEIGHBORS_MASK > MAX_NEIGHBORS {
                return Err(SnapshotError::InvalidCellByte { index, byte });
            }
        }
        board.cells.copy_from_slice(bytes);
        if let Some(index) = board.first_count_mismatch() {
            return Err(SnapshotError::NeighborCountMismatch { index });
        }
        Ok(board)
    }

    /// Board with the given cells alive
    pub fn with_live_cells(width: usize, height: usize, live: &[(usize, usize)]) -> Result<Self, ConfigError> {
        let mut board = Self::new(width, height)?;
        for &(x, y) in live {
            if !board.is_alive(x, y) {
                board.set_alive(x, y);
            }
        }
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The raw packed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    pub fn index_of(&self, x: usize, y: usize) -> usize {
        (y % self.height) * self.width + (x % self.width)
    }

    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.is_alive_at(self.index_of(x, y))
    }

    pub fn is_alive_at(&self, index: usize) -> bool {
        self.cells[index] & ALIVE_MASK != 0
    }

    pub fn neighbor_count(&self, x: usize, y: usize) -> u8 {
        self.neighbor_count_at(self.index_of(x, y))
    }

    pub fn neighbor_count_at(&self, index: usize) -> u8 {
        self.cells[index] & NEIGHBORS_MASK
    }

    /// The 8 toroidal neighbours of `(x, y)`
    pub fn neighbors(&self, x: usize, y: usize) -> [usize; 8] {
        let (w, h) = (self.width, self.height);
        let (x, y) = (x % w, y % h);
        let left = (x + w - 1) % w;
        let right = (x + 1) % w;
        let up = (y + h - 1) % h;
        let down = (y + 1) % h;
        [
            y * w + right,
            down * w + right,
            up * w + right,
            down * w + x,
            up * w + x,
            y * w + left,
            down * w + left,
            up * w + left,
        ]
    }

    /// Make `(x, y)` alive and bump each neighbour's count
    pub fn set_alive(&mut self, x: usize, y: usize) {
        let index = self.index_of(x, y);
        debug_assert!(!self.is_alive_at(index), "cell ({}, {}) is already alive", x, y);
        if self.is_alive_at(index) {
            return;
        }
        self.cells[index] |= ALIVE_MASK;

        for n in self.neighbors(x, y) {
            let count = self.cells[n] & NEIGHBORS_MASK;
            debug_assert!(count < MAX_NEIGHBORS, "neighbour count overflow at {}", n);
            if count < MAX_NEIGHBORS {
                self.cells[n] += 1;
            }
        }
    }

    /// Make `(x, y)` dead and drop each neighbour's count
    pub fn set_dead(&mut self, x: usize, y: usize) {
        let index = self.index_of(x, y);
        debug_assert!(self.is_alive_at(index), "cell ({}, {}) is already dead", x, y);
        if !self.is_alive_at(index) {
            return;
        }
        self.cells[index] &= !ALIVE_MASK;

        for n in self.neighbors(x, y) {
            let count = self.cells[n] & NEIGHBORS_MASK;
            debug_assert!(count > 0, "neighbour count underflow at {}", n);
            if count > 0 {
                self.cells[n] -= 1;
            }
        }
    }

    /// Apply a liveness value at a flat index. Returns false if the cell
    /// already had that state.
    pub fn set_state_at(&mut self, index: usize, alive: bool) -> bool {
        if self.is_alive_at(index) == alive {
            return false;
        }
        let (x, y) = self.coords_of(index);
        if alive {
            self.set_alive(x, y);
        } else {
            self.set_dead(x, y);
        }
        true
    }

    /// Kill everything and zero all counts
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c & ALIVE_MASK != 0).count()
    }

    /// Flat indices of all live cells, ascending
    pub fn live_cells(&self) -> Vec<usize> {
        (0..self.cells.len()).filter(|&i| self.is_alive_at(i)).collect()
    }

    /// Liveness only, row-major
    pub fn liveness(&self) -> Vec<bool> {
        self.cells.iter().map(|&c| c & ALIVE_MASK != 0).collect()
    }

    /// Count live neighbours of `index` from liveness flags alone
    pub fn count_live_neighbors(&self, index: usize) -> u8 {
        let (x, y) = self.coords_of(index);
        self.neighbors(x, y)
            .iter()
            .filter(|&&n| self.is_alive_at(n))
            .count() as u8
    }

    /// Recompute every neighbour count from liveness
    pub fn recount(&mut self) {
        for index in 0..self.cells.len() {
            let count = self.count_live_neighbors(index);
            self.cells[index] = (self.cells[index] & ALIVE_MASK) | count;
        }
    }

    /// Whether every stored count matches a full recount
    pub fn verify_neighbor_counts(&self) -> bool {
        self.first_count_mismatch().is_none()
    }

    fn first_count_mismatch(&self) -> Option<usize> {
        (0..self.cells.len()).find(|&i| self.neighbor_count_at(i) != self.count_live_neighbors(i))
    }
}
