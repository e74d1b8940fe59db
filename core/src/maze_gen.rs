//! Perfect maze generation
//!
//! Two interchangeable algorithms thin the full wall set of a grid until
//! the removed walls (the passages) form a spanning tree over the cells:
//!
//! Kruskal (union-find):
//! 1. Build every wall, boundary and interior
//! 2. Shuffle the walls
//! 3. For each interior wall whose two cells are in different sets,
//!    remove the wall and union the sets
//!
//! Recursive backtracker (DFS with an explicit stack):
//! 1. Start at a random cell, mark it visited
//! 2. While unvisited cells remain:
//!    - If the current cell has unvisited neighbours, push it, knock down
//!      the wall to a random one and move there
//!    - Else pop the stack and continue from the popped cell

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::error::ConfigError;
use crate::grid::{self, Cell, CellTag, EdgeSet, Wall};
use crate::rng::RandomSource;
use crate::union_find::UnionFind;
use crate::{MAX_CELLS, MIN_MAZE_DIM};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which generator thins the walls
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MazeAlgorithm {
    /// Randomized Kruskal over a union-find. Even, bushy corridors.
    #[default]
    Kruskal,
    /// Randomized depth-first backtracker. Long, winding corridors.
    Dfs,
}

impl core::str::FromStr for MazeAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("kruskal") {
            Ok(MazeAlgorithm::Kruskal)
        } else if s.eq_ignore_ascii_case("dfs") || s.eq_ignore_ascii_case("backtracker") {
            Ok(MazeAlgorithm::Dfs)
        } else {
            Err(ConfigError::InvalidAlgorithm)
        }
    }
}

impl core::fmt::Display for MazeAlgorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MazeAlgorithm::Kruskal => write!(f, "kruskal"),
            MazeAlgorithm::Dfs => write!(f, "dfs"),
        }
    }
}

/// Bookkeeping from one backtracker run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DfsStats {
    /// Times the stack ran dry with unvisited cells left. Always 0 on a
    /// rectangular grid; anything else means the generator is broken.
    pub restarts: usize,
}

/// A maze: the cell array plus the walls still standing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    walls: Vec<Wall>,
}

impl Maze {
    /// An ungenerated maze with every wall in place
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        check_dims(width, height)?;
        Ok(Self {
            width,
            height,
            cells: grid::make_cells(width, height),
            walls: grid::make_all_walls(width, height),
        })
    }

    /// Reassemble a maze from stored parts. Callers validate the parts.
    pub(crate) fn from_parts(width: usize, height: usize, cells: Vec<Cell>, walls: Vec<Wall>) -> Self {
        Self {
            width,
            height,
            cells,
            walls,
        }
    }

    /// Generate a maze with the given algorithm
    ///
    /// # Arguments
    /// * `width` / `height` - Size in cells, each at least `MIN_MAZE_DIM`
    /// * `algorithm` - Kruskal or DFS backtracker
    /// * `rng` - Source of every random decision
    ///
    /// # Returns
    /// A perfect maze with (0, 0) tagged START and the opposite corner GOAL
    pub fn generate<R: RandomSource>(
        width: usize,
        height: usize,
        algorithm: MazeAlgorithm,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let mut maze = Self::new(width, height)?;
        match algorithm {
            MazeAlgorithm::Kruskal => maze.make_kruskal(rng),
            MazeAlgorithm::Dfs => {
                maze.make_dfs(rng);
            }
        }
        maze.place_endpoints();
        Ok(maze)
    }

    /// Kruskal's algorithm over a shuffled wall list
    pub fn make_kruskal<R: RandomSource>(&mut self, rng: &mut R) {
        self.walls = grid::make_all_walls(self.width, self.height);
        rng.shuffle(&mut self.walls);

        let mut sets = UnionFind::new(self.cells.len());
        // retain visits walls in order, so removal follows the shuffle
        self.walls.retain(|wall| match wall.cells() {
            Some((a, b)) => !sets.union(a, b),
            None => true,
        });

        debug_assert_eq!(
            self.walls.len(),
            grid::boundary_wall_count(self.width, self.height)
                + grid::interior_wall_count(self.width, self.height)
                - (self.cells.len() - 1)
        );
    }

    /// Recursive backtracker (iterative with explicit stack)
    pub fn make_dfs<R: RandomSource>(&mut self, rng: &mut R) -> DfsStats {
        self.walls = grid::make_all_walls(self.width, self.height);
        self.reset_visited();

        let mut stats = DfsStats::default();
        let mut removed = EdgeSet::new(self.width, self.height);
        let mut stack: Vec<usize> = Vec::with_capacity(self.cells.len());

        let mut current = rng.choice_index(self.cells.len());
        self.cells[current].visited = true;
        let mut unvisited = self.cells.len() - 1;

        while unvisited > 0 {
            if let Some(next) = self.random_unvisited_neighbor(current, rng) {
                stack.push(current);
                removed.insert(current, next);
                current = next;
                self.cells[current].visited = true;
                unvisited -= 1;
            } else if let Some(popped) = stack.pop() {
                current = popped;
            } else {
                // Unreachable on a connected grid; recover by restarting at
                // the first unvisited cell.
                stats.restarts += 1;
                match self.cells.iter_mut().find(|c| !c.visited) {
                    Some(cell) => {
                        cell.visited = true;
                        current = cell.id;
                        unvisited -= 1;
                    }
                    None => break,
                }
            }
        }

        debug_assert_eq!(stats.restarts, 0, "backtracker lost connectivity");

        self.walls.retain(|wall| match wall.cells() {
            Some((a, b)) => !removed.contains(a, b),
            None => true,
        });
        stats
    }

    fn random_unvisited_neighbor<R: RandomSource>(&self, cell: usize, rng: &mut R) -> Option<usize> {
        let (neighbors, count) = grid::neighbors(self.width, self.height, cell);
        let mut candidates = [0usize; 4];
        let mut n = 0;
        for &neighbor in &neighbors[..count] {
            if !self.cells[neighbor].visited {
                candidates[n] = neighbor;
                n += 1;
            }
        }
        if n == 0 {
            None
        } else {
            Some(candidates[rng.choice_index(n)])
        }
    }

    /// Clear the backtracker's visited flags
    pub fn reset_visited(&mut self) {
        for cell in &mut self.cells {
            cell.visited = false;
        }
    }

    /// Tag (0, 0) as START and the far corner as GOAL
    pub fn place_endpoints(&mut self) {
        let last = self.cells.len() - 1;
        self.cells[0].tag = CellTag::START;
        self.cells[last].tag = CellTag::GOAL;
    }

    pub fn set_tag(&mut self, x: usize, y: usize, tag: CellTag) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x].tag = tag;
        }
    }

    /// First cell carrying `tag`, scanning column by column
    pub fn cell_by_tag(&self, tag: CellTag) -> Option<&Cell> {
        (0..self.width)
            .flat_map(|x| (0..self.height).map(move |y| y * self.width + x))
            .map(|id| &self.cells[id])
            .find(|cell| cell.tag == tag)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            Some(&self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Walls still standing, boundary walls included
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Interior edges with no wall: the maze's corridors
    pub fn passages(&self) -> Vec<Wall> {
        self.open_edges().walls()
    }

    fn open_edges(&self) -> EdgeSet {
        let mut standing = EdgeSet::new(self.width, self.height);
        for (a, b) in self.walls.iter().filter_map(|w| w.cells()) {
            standing.insert(a, b);
        }

        let mut open = EdgeSet::new(self.width, self.height);
        for id in 0..self.cells.len() {
            let (neighbors, count) = grid::neighbors(self.width, self.height, id);
            for &n in &neighbors[..count] {
                if !standing.contains(id, n) {
                    open.insert(id, n);
                }
            }
        }
        open
    }

    /// Whether two cells are joined by a passage
    pub fn is_open(&self, a: usize, b: usize) -> bool {
        let len = self.cells.len();
        a < len && b < len && grid::adjacent(self.width, a, b) && !self.walls.contains(&Wall::between(a, b))
    }

    /// Shortest corridor route from `from` to `to` (both inclusive), BFS
    pub fn path(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        if from >= self.cells.len() || to >= self.cells.len() {
            return None;
        }
        let open = self.open_edges();
        let mut came_from: Vec<Option<usize>> = alloc::vec![None; self.cells.len()];
        let mut queue = VecDeque::new();
        came_from[from] = Some(from);
        queue.push_back(from);

        while let Some(cell) = queue.pop_front() {
            if cell == to {
                let mut route = alloc::vec![to];
                let mut at = to;
                while at != from {
                    at = came_from[at]?;
                    route.push(at);
                }
                route.reverse();
                return Some(route);
            }
            let (neighbors, count) = grid::neighbors(self.width, self.height, cell);
            for &n in &neighbors[..count] {
                if came_from[n].is_none() && open.contains(cell, n) {
                    came_from[n] = Some(cell);
                    queue.push_back(n);
                }
            }
        }
        None
    }

    /// Binary grid representation for renderers
    ///
    /// Creates a grid where:
    /// - 0 = wall
    /// - 1 = path (walkable cell or open passage)
    ///
    /// For a maze of W x H cells the grid is (H*2 + 1) rows of (W*2 + 1)
    /// bytes, with cell centres at (y*2 + 1, x*2 + 1).
    pub fn to_binary_grid(&self) -> Vec<Vec<u8>> {
        let mut out = alloc::vec![alloc::vec![0u8; self.width * 2 + 1]; self.height * 2 + 1];

        for cell in &self.cells {
            out[cell.y * 2 + 1][cell.x * 2 + 1] = 1;
        }
        for passage in self.passages() {
            if let Some((a, b)) = passage.cells() {
                let (ax, ay) = (a % self.width, a / self.width);
                let (bx, by) = (b % self.width, b / self.width);
                out[ay + by + 1][ax + bx + 1] = 1;
            }
        }

        out
    }
}

pub(crate) fn check_dims(width: usize, height: usize) -> Result<(), ConfigError> {
    if width < MIN_MAZE_DIM || height < MIN_MAZE_DIM {
        return Err(ConfigError::MazeTooSmall { width, height });
    }
    match width.checked_mul(height) {
        Some(area) if area <= MAX_CELLS => Ok(()),
        _ => Err(ConfigError::TooLarge { width, height }),
    }
}

/// Generate a maze from scratch
pub fn generate_maze<R: RandomSource>(
    width: usize,
    height: usize,
    algorithm: MazeAlgorithm,
    rng: &mut R,
) -> Result<Maze, ConfigError> {
    Maze::generate(width, height, algorithm, rng)
}
