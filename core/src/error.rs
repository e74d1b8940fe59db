//! Error types for configuration and snapshot decoding
//!
//! Invariant violations (neighbour counter drift, a disconnected maze) are
//! bugs and are caught with `debug_assert!`, not reported here.

use core::fmt;

/// Invalid construction parameters. Never silently clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Maze smaller than `MIN_MAZE_DIM` in either direction
    MazeTooSmall { width: usize, height: usize },
    /// Board smaller than `MIN_BOARD_DIM` in either direction
    BoardTooSmall { width: usize, height: usize },
    /// More than `MAX_CELLS` cells, or an area that overflows `usize`
    TooLarge { width: usize, height: usize },
    /// A rule neighbour count outside 0..=8
    RuleCountOutOfRange(u8),
    /// Rule notation that is not `B<digits>/S<digits>`
    InvalidRuleNotation,
    /// A seed policy that can never place a cell
    InvalidSeedPolicy,
    /// Unknown maze algorithm name
    InvalidAlgorithm,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MazeTooSmall { width, height } => write!(
                f,
                "maze of {}x{} cells is too small (minimum {}x{})",
                width,
                height,
                crate::MIN_MAZE_DIM,
                crate::MIN_MAZE_DIM
            ),
            ConfigError::BoardTooSmall { width, height } => write!(
                f,
                "board of {}x{} cells is too small (minimum {}x{})",
                width,
                height,
                crate::MIN_BOARD_DIM,
                crate::MIN_BOARD_DIM
            ),
            ConfigError::TooLarge { width, height } => write!(
                f,
                "grid of {}x{} cells is too large (maximum {} cells)",
                width,
                height,
                crate::MAX_CELLS
            ),
            ConfigError::RuleCountOutOfRange(count) => {
                write!(f, "rule neighbour count {} is outside 0..=8", count)
            }
            ConfigError::InvalidRuleNotation => {
                write!(f, "invalid rule notation, expected something like 'B3/S1234'")
            }
            ConfigError::InvalidSeedPolicy => {
                write!(f, "seed policy must place at least one cell with a non-zero spread")
            }
            ConfigError::InvalidAlgorithm => {
                write!(f, "unknown maze algorithm, expected 'kruskal' or 'dfs'")
            }
        }
    }
}

/// A snapshot byte stream that cannot be turned back into live state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    /// Wrong magic bytes for the expected snapshot kind
    BadMagic,
    /// A version this build does not understand
    UnsupportedVersion(u8),
    /// Input ended before the declared contents
    Truncated,
    /// Extra bytes after the declared contents
    TrailingBytes(usize),
    /// Dimensions in the header are not constructible
    Config(ConfigError),
    /// A cell or wall refers to an index outside the grid
    IndexOutOfRange(usize),
    /// A packed cell byte uses bits above the liveness flag or counts past 8
    InvalidCellByte { index: usize, byte: u8 },
    /// Stored neighbour counts disagree with stored liveness
    NeighborCountMismatch { index: usize },
    /// A wall that does not separate two grid-adjacent cells
    InvalidWall { v1: usize, v2: Option<usize> },
    /// A generation counter past the point where the board would already
    /// have been reseeded
    GenerationOutOfRange { generation: u32, budget: u32 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::BadMagic => write!(f, "snapshot magic bytes do not match"),
            SnapshotError::UnsupportedVersion(v) => {
                write!(f, "unsupported snapshot version {}", v)
            }
            SnapshotError::Truncated => write!(f, "snapshot is truncated"),
            SnapshotError::TrailingBytes(n) => {
                write!(f, "snapshot has {} unexpected trailing bytes", n)
            }
            SnapshotError::Config(e) => write!(f, "snapshot header is invalid: {}", e),
            SnapshotError::IndexOutOfRange(i) => {
                write!(f, "snapshot refers to cell {} outside the grid", i)
            }
            SnapshotError::InvalidCellByte { index, byte } => {
                write!(f, "cell {} has invalid packed state {:#04x}", index, byte)
            }
            SnapshotError::NeighborCountMismatch { index } => {
                write!(f, "cell {} has a neighbour count that disagrees with the board", index)
            }
            SnapshotError::InvalidWall { v1, v2 } => match v2 {
                Some(v2) => write!(f, "wall between {} and {} does not join adjacent cells", v1, v2),
                None => write!(f, "boundary wall on cell {} is not on the grid edge", v1),
            },
            SnapshotError::GenerationOutOfRange { generation, budget } => {
                write!(f, "generation {} is past budget {}", generation, budget)
            }
        }
    }
}

impl From<ConfigError> for SnapshotError {
    fn from(e: ConfigError) -> Self {
        SnapshotError::Config(e)
    }
}

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for SnapshotError {}
