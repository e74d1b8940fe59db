//! Suspend/resume snapshots
//!
//! Plain data plus explicit byte encodings, independent of whatever host
//! lifecycle stores them. All integers are little-endian u32.
//!
//! Life snapshot layout:
//! - magic `LIFE` (4 bytes) + version (1 byte)
//! - width, height, budget, generation (4 x u32)
//! - width * height packed cell bytes
//! - pending count (u32), then per entry: index (u32) + alive (u8)
//!
//! Maze snapshot layout:
//! - magic `MAZE` (4 bytes) + version (1 byte)
//! - width, height (2 x u32)
//! - per cell, row-major: visited (u8) + tag (u8)
//! - wall count (u32), then per wall: v1 (u32) + v2 (u32, `u32::MAX` for a
//!   boundary wall)

use alloc::vec::Vec;

use crate::board::AutomatonBoard;
use crate::error::SnapshotError;
use crate::grid::{self, Cell, CellTag, Wall};
use crate::maze_gen::{self, Maze};

pub const LIFE_MAGIC: [u8; 4] = *b"LIFE";
pub const MAZE_MAGIC: [u8; 4] = *b"MAZE";
pub const SNAPSHOT_VERSION: u8 = 1;

/// Header size of a life snapshot: magic + version + 4 u32 fields
pub const LIFE_HEADER_SIZE: usize = 4 + 1 + 4 * 4;

const NO_CELL: u32 = u32::MAX;

/// State of a running simulation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifeSnapshot {
    pub width: usize,
    pub height: usize,
    /// Packed board bytes, row-major
    pub cells: Vec<u8>,
    /// Transitions the next step will apply
    pub pending: Vec<(usize, bool)>,
    pub budget: u32,
    pub generation: u32,
}

impl LifeSnapshot {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(LIFE_HEADER_SIZE + self.cells.len() + 4 + self.pending.len() * 5);
        out.extend_from_slice(&LIFE_MAGIC);
        out.push(SNAPSHOT_VERSION);
        put_u32(&mut out, self.width as u32);
        put_u32(&mut out, self.height as u32);
        put_u32(&mut out, self.budget);
        put_u32(&mut out, self.generation);
        out.extend_from_slice(&self.cells);
        put_u32(&mut out, self.pending.len() as u32);
        for &(index, alive) in &self.pending {
            put_u32(&mut out, index as u32);
            out.push(alive as u8);
        }
        out
    }

    /// Decode and validate. The board must satisfy the neighbour count
    /// invariant and every pending index must be on the board.
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let mut reader = ByteReader::new(bytes);
        reader.expect_header(&LIFE_MAGIC)?;

        let width = reader.u32()? as usize;
        let height = reader.u32()? as usize;
        let budget = reader.u32()?;
        let generation = reader.u32()?;

        let len = width.checked_mul(height).ok_or(SnapshotError::Truncated)?;
        let cells = reader.take(len)?.to_vec();
        AutomatonBoard::from_bytes(width, height, &cells)?;

        let count = reader.u32()? as usize;
        let mut pending = Vec::with_capacity(count.min(len));
        for _ in 0..count {
            let index = reader.u32()? as usize;
            if index >= len {
                return Err(SnapshotError::IndexOutOfRange(index));
            }
            pending.push((index, reader.u8()? != 0));
        }
        reader.finish()?;

        Ok(Self {
            width,
            height,
            cells,
            pending,
            budget,
            generation,
        })
    }
}

/// Cells and standing walls of a maze
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeSnapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Cell>,
    pub walls: Vec<Wall>,
}

impl MazeSnapshot {
    pub fn of(maze: &Maze) -> Self {
        Self {
            width: maze.width(),
            height: maze.height(),
            cells: maze.cells().to_vec(),
            walls: maze.walls().to_vec(),
        }
    }

    /// Rebuild the maze. Fails if any wall is not a real edge of the grid.
    pub fn into_maze(self) -> Result<Maze, SnapshotError> {
        maze_gen::check_dims(self.width, self.height)?;
        let len = self.width * self.height;
        if self.cells.len() != len {
            return Err(SnapshotError::Truncated);
        }
        for (id, cell) in self.cells.iter().enumerate() {
            if cell.id != id || cell.x != id % self.width || cell.y != id / self.width {
                return Err(SnapshotError::IndexOutOfRange(cell.id));
            }
        }
        for wall in &self.walls {
            validate_wall(self.width, self.height, wall)?;
        }
        Ok(Maze::from_parts(self.width, self.height, self.cells, self.walls))
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + 1 + 8 + self.cells.len() * 2 + 4 + self.walls.len() * 8);
        out.extend_from_slice(&MAZE_MAGIC);
        out.push(SNAPSHOT_VERSION);
        put_u32(&mut out, self.width as u32);
        put_u32(&mut out, self.height as u32);
        for cell in &self.cells {
            out.push(cell.visited as u8);
            out.push(cell.tag.0);
        }
        put_u32(&mut out, self.walls.len() as u32);
        for wall in &self.walls {
            put_u32(&mut out, wall.v1 as u32);
            put_u32(&mut out, wall.v2.map_or(NO_CELL, |v| v as u32));
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let mut reader = ByteReader::new(bytes);
        reader.expect_header(&MAZE_MAGIC)?;

        let width = reader.u32()? as usize;
        let height = reader.u32()? as usize;
        maze_gen::check_dims(width, height)?;
        let len = width.checked_mul(height).ok_or(SnapshotError::Truncated)?;
        if len.checked_mul(2).map_or(true, |need| reader.remaining() < need) {
            return Err(SnapshotError::Truncated);
        }

        let mut cells = grid::make_cells(width, height);
        for cell in &mut cells {
            cell.visited = reader.u8()? != 0;
            cell.tag = CellTag(reader.u8()?);
        }

        let count = reader.u32()? as usize;
        let mut walls = Vec::with_capacity(count.min(4 * cells.len()));
        for _ in 0..count {
            let v1 = reader.u32()? as usize;
            let v2 = match reader.u32()? {
                NO_CELL => None,
                v => Some(v as usize),
            };
            let wall = Wall { v1, v2 };
            validate_wall(width, height, &wall)?;
            walls.push(wall);
        }
        reader.finish()?;

        Ok(Self {
            width,
            height,
            cells,
            walls,
        })
    }
}

fn validate_wall(width: usize, height: usize, wall: &Wall) -> Result<(), SnapshotError> {
    let len = width * height;
    for id in [Some(wall.v1), wall.v2].into_iter().flatten() {
        if id >= len {
            return Err(SnapshotError::IndexOutOfRange(id));
        }
    }
    let valid = match wall.v2 {
        Some(v2) => grid::adjacent(width, wall.v1, v2),
        None => grid::on_edge(width, height, wall.v1),
    };
    if valid {
        Ok(())
    } else {
        Err(SnapshotError::InvalidWall {
            v1: wall.v1,
            v2: wall.v2,
        })
    }
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SnapshotError> {
        let end = self.pos.checked_add(n).ok_or(SnapshotError::Truncated)?;
        let slice = self.bytes.get(self.pos..end).ok_or(SnapshotError::Truncated)?;
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, SnapshotError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, SnapshotError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn expect_header(&mut self, magic: &[u8; 4]) -> Result<(), SnapshotError> {
        if self.take(4)? != magic {
            return Err(SnapshotError::BadMagic);
        }
        match self.u8()? {
            SNAPSHOT_VERSION => Ok(()),
            v => Err(SnapshotError::UnsupportedVersion(v)),
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn finish(&self) -> Result<(), SnapshotError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(SnapshotError::TrailingBytes(n)),
        }
    }
}

impl Maze {
    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::maze_gen::{generate_maze, MazeAlgorithm};
    use crate::rng::SimpleLCG;

    fn life_snapshot() -> LifeSnapshot {
        let board = AutomatonBoard::with_live_cells(4, 3, &[(1, 1), (2, 1)]).unwrap();
        LifeSnapshot {
            width: 4,
            height: 3,
            cells: board.as_bytes().to_vec(),
            pending: alloc::vec![(5, false), (9, true)],
            budget: 10,
            generation: 3,
        }
    }

    #[test]
    fn test_life_layout() {
        let bytes = life_snapshot().encode();
        assert_eq!(&bytes[..4], b"LIFE");
        assert_eq!(bytes[4], SNAPSHOT_VERSION);
        assert_eq!(&bytes[5..9], &4u32.to_le_bytes());
        assert_eq!(bytes.len(), LIFE_HEADER_SIZE + 12 + 4 + 2 * 5);
        assert_eq!(LifeSnapshot::decode(&bytes), Ok(life_snapshot()));
    }

    #[test]
    fn test_life_decode_errors() {
        let bytes = life_snapshot().encode();

        let mut bad = bytes.clone();
        bad[0] = b'X';
        assert_eq!(LifeSnapshot::decode(&bad), Err(SnapshotError::BadMagic));

        let mut bad = bytes.clone();
        bad[4] = 9;
        assert_eq!(LifeSnapshot::decode(&bad), Err(SnapshotError::UnsupportedVersion(9)));

        assert_eq!(LifeSnapshot::decode(&bytes[..bytes.len() - 1]), Err(SnapshotError::Truncated));

        let mut bad = bytes.clone();
        bad.push(0);
        assert_eq!(LifeSnapshot::decode(&bad), Err(SnapshotError::TrailingBytes(1)));

        let mut bad = bytes.clone();
        bad[LIFE_HEADER_SIZE] = 0x03; // cell 0 really has one live neighbour
        assert_eq!(
            LifeSnapshot::decode(&bad),
            Err(SnapshotError::NeighborCountMismatch { index: 0 })
        );

        let mut snapshot = life_snapshot();
        snapshot.pending.push((12, true));
        assert_eq!(
            LifeSnapshot::decode(&snapshot.encode()),
            Err(SnapshotError::IndexOutOfRange(12))
        );
    }

    #[test]
    fn test_maze_round_trip() {
        for algorithm in [MazeAlgorithm::Kruskal, MazeAlgorithm::Dfs] {
            let maze = generate_maze(7, 4, algorithm, &mut SimpleLCG::new(808)).unwrap();
            let bytes = maze.snapshot().encode();
            let restored = MazeSnapshot::decode(&bytes).unwrap().into_maze().unwrap();
            assert_eq!(restored, maze);
        }
    }

    #[test]
    fn test_maze_rejects_oversized_dims() {
        let snapshot = MazeSnapshot {
            width: usize::MAX / 2,
            height: 3,
            cells: Vec::new(),
            walls: Vec::new(),
        };
        assert!(matches!(
            snapshot.into_maze(),
            Err(SnapshotError::Config(ConfigError::TooLarge { .. }))
        ));

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAZE_MAGIC);
        bytes.push(SNAPSHOT_VERSION);
        put_u32(&mut bytes, u32::MAX);
        put_u32(&mut bytes, u32::MAX);
        assert!(matches!(
            MazeSnapshot::decode(&bytes),
            Err(SnapshotError::Config(ConfigError::TooLarge { .. }))
        ));
    }

    #[test]
    fn test_maze_rejects_bad_walls() {
        let maze = generate_maze(3, 3, MazeAlgorithm::Kruskal, &mut SimpleLCG::new(1)).unwrap();

        let mut snapshot = maze.snapshot();
        snapshot.walls.push(Wall::between(2, 3));
        assert_eq!(
            snapshot.into_maze(),
            Err(SnapshotError::InvalidWall { v1: 2, v2: Some(3) })
        );

        let mut snapshot = maze.snapshot();
        snapshot.walls.push(Wall::boundary(4));
        assert_eq!(
            MazeSnapshot::decode(&snapshot.encode()),
            Err(SnapshotError::InvalidWall { v1: 4, v2: None })
        );

        let mut snapshot = maze.snapshot();
        snapshot.walls.push(Wall::between(8, 9));
        assert_eq!(
            MazeSnapshot::decode(&snapshot.encode()),
            Err(SnapshotError::IndexOutOfRange(9))
        );
    }
}
