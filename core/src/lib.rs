//! Maze generation and background cellular automata
//!
//! This crate provides the two algorithmic engines behind the game:
//! perfect maze generation (Kruskal over a union-find, or a randomized
//! depth-first backtracker) and a toroidal Game-of-Life-style automaton
//! stepped either incrementally from change lists or by full double
//! buffering.
//!
//! The crate is no_std compatible (it needs `alloc`), with an optional
//! `std` feature for `std::error::Error` impls and a `serde` feature for
//! the plain configuration types. It never reads input or draws pixels.

#![no_std]

extern crate alloc;

pub mod board;
pub mod double_buffer;
pub mod error;
pub mod grid;
pub mod incremental;
pub mod maze_gen;
pub mod rng;
pub mod rules;
pub mod simulation;
pub mod snapshot;
pub mod stepper;
pub mod union_find;

// Re-export commonly used types for convenience
pub use board::AutomatonBoard;
pub use double_buffer::DoubleBufferStepper;
pub use error::{ConfigError, SnapshotError};
pub use grid::{Cell, CellTag, Wall};
pub use incremental::IncrementalStepper;
pub use maze_gen::{generate_maze, DfsStats, Maze, MazeAlgorithm};
pub use rng::{RandomSource, SimpleLCG};
pub use rules::Rules;
pub use simulation::{init_board, Generation, GenerationBudget, LifeConfig, SeedPolicy, Simulation};
pub use snapshot::{LifeSnapshot, MazeSnapshot};
pub use stepper::{ChangeList, LifeEngine};
pub use union_find::UnionFind;

/// Smallest maze edge, in cells
pub const MIN_MAZE_DIM: usize = 2;

/// Largest grid area, in cells, for mazes and boards alike. Keeps every
/// cell index inside the u32 snapshot encoding.
pub const MAX_CELLS: usize = 1 << 24;

/// Smallest automaton edge, in cells. Below 3 a cell's eight toroidal
/// neighbours stop being distinct.
pub const MIN_BOARD_DIM: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(MIN_MAZE_DIM, 2);
        assert!(MIN_BOARD_DIM >= 3);
        assert!(MAX_CELLS < u32::MAX as usize);
    }
}
