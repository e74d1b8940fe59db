use amazing_core::{
    CellTag, Generation, LifeConfig, LifeSnapshot, Maze, MazeAlgorithm, MazeSnapshot, SimpleLCG, Simulation, Wall,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::RwLock;

/// A generated maze, as saved to disk
///
/// `grid` and `passages` are derived views kept for display and quick
/// inspection. `snapshot` is the authoritative encoded maze; loading always
/// decodes it and checks the views against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeReport {
    /// The seed used to generate this maze
    pub seed: u32,

    pub algorithm: MazeAlgorithm,

    pub width: usize,
    pub height: usize,

    /// Binary grid (0=wall, 1=path), (height*2+1) x (width*2+1)
    pub grid: Vec<Vec<u8>>,

    /// Walls still standing, boundary walls included
    pub walls: Vec<Wall>,

    /// Number of removed interior walls. Always width*height - 1.
    pub passages: usize,

    /// Encoded `MazeSnapshot`
    pub snapshot: Vec<u8>,
}

impl MazeReport {
    /// Decode the stored snapshot back into a maze
    pub fn to_maze(&self) -> Result<Maze, Box<dyn std::error::Error>> {
        let maze = MazeSnapshot::decode(&self.snapshot)?.into_maze()?;

        if maze.width() != self.width || maze.height() != self.height {
            return Err(format!(
                "Report says {}x{} but snapshot holds {}x{}",
                self.width,
                self.height,
                maze.width(),
                maze.height()
            )
            .into());
        }
        if maze.to_binary_grid() != self.grid {
            return Err("Report grid does not match its snapshot".into());
        }

        Ok(maze)
    }
}

/// Generate a maze and package it for saving
pub fn generate_maze_report(
    width: usize,
    height: usize,
    algorithm: MazeAlgorithm,
    seed: u32,
) -> Result<MazeReport, Box<dyn std::error::Error>> {
    tracing::info!("Generating {}x{} maze with {} (seed {})", width, height, algorithm, seed);

    let mut rng = SimpleLCG::new(seed);
    let mut maze = Maze::new(width, height)?;
    match algorithm {
        MazeAlgorithm::Kruskal => maze.make_kruskal(&mut rng),
        MazeAlgorithm::Dfs => {
            let stats = maze.make_dfs(&mut rng);
            if stats.restarts > 0 {
                tracing::warn!("Backtracker restarted {} times on a {}x{} grid", stats.restarts, width, height);
            }
        }
    }
    maze.place_endpoints();

    let passages = maze.passages().len();
    tracing::info!("Maze generated ({} walls standing, {} passages)", maze.walls().len(), passages);

    Ok(MazeReport {
        seed,
        algorithm,
        width,
        height,
        grid: maze.to_binary_grid(),
        walls: maze.walls().to_vec(),
        passages,
        snapshot: maze.snapshot().encode(),
    })
}

/// Draw a maze with `#` walls, `S` at the start and `G` at the goal
pub fn render_maze(maze: &Maze) -> String {
    let mut rows: Vec<Vec<char>> = maze
        .to_binary_grid()
        .iter()
        .map(|row| row.iter().map(|&b| if b == 1 { ' ' } else { '#' }).collect())
        .collect();

    for (tag, mark) in [(CellTag::START, 'S'), (CellTag::GOAL, 'G')] {
        if let Some(cell) = maze.cell_by_tag(tag) {
            rows[cell.y * 2 + 1][cell.x * 2 + 1] = mark;
        }
    }

    let mut out = String::with_capacity(rows.len() * (rows[0].len() + 1));
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}

/// A suspended background simulation, as saved to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeSave {
    /// Seed the session was started with
    pub seed: u32,

    /// Random generator state at the time of saving
    pub rng_state: u32,

    pub config: LifeConfig,

    /// Encoded `LifeSnapshot`
    pub snapshot: Vec<u8>,
}

/// A background simulation shared between a stepping thread and readers.
///
/// Stepping takes the write lock for the whole generation, so a reader
/// never sees a half-applied change list.
pub struct LifeSession {
    seed: u32,
    sim: RwLock<Simulation<SimpleLCG>>,
}

impl LifeSession {
    pub fn new(width: usize, height: usize, config: LifeConfig, seed: u32) -> Result<Self, Box<dyn std::error::Error>> {
        let sim = Simulation::new(width, height, config, SimpleLCG::new(seed))?;
        tracing::info!(
            "Starting {}x{} simulation (rules {}, budget {}, {} live cells)",
            width,
            height,
            config.rules,
            sim.budget(),
            sim.board().population()
        );
        Ok(Self {
            seed,
            sim: RwLock::new(sim),
        })
    }

    /// Pick up a saved session where it stopped
    pub fn resume(save: &LifeSave) -> Result<Self, Box<dyn std::error::Error>> {
        let snapshot = LifeSnapshot::decode(&save.snapshot).map_err(|e| {
            tracing::warn!("Rejected life snapshot: {}", e);
            e
        })?;
        let sim = Simulation::restore(&snapshot, save.config, SimpleLCG::new(save.rng_state)).map_err(|e| {
            tracing::warn!("Rejected life snapshot: {}", e);
            e
        })?;
        tracing::info!(
            "Resumed {}x{} simulation at generation {}/{}",
            snapshot.width,
            snapshot.height,
            sim.generation(),
            sim.budget()
        );
        Ok(Self {
            seed: save.seed,
            sim: RwLock::new(sim),
        })
    }

    /// Advance one generation
    pub fn advance(&self) -> Result<Generation, Box<dyn std::error::Error>> {
        let mut sim = self.sim.write().map_err(|_| "Life session lock poisoned")?;
        let outcome = sim.advance();
        if outcome.restarted {
            tracing::info!("Budget spent, reseeded board ({} live cells)", sim.board().population());
        }
        tracing::debug!("Generation {}: {} cells changed", outcome.generation, outcome.changes.len());
        Ok(outcome)
    }

    /// Advance `generations` times, returning how many restarts happened
    pub fn run(&self, generations: u32) -> Result<u32, Box<dyn std::error::Error>> {
        let mut restarts = 0;
        for _ in 0..generations {
            if self.advance()?.restarted {
                restarts += 1;
            }
        }
        Ok(restarts)
    }

    /// Draw the board with `O` for live cells and `.` for dead ones
    pub fn render_ascii(&self) -> Result<String, Box<dyn std::error::Error>> {
        let sim = self.sim.read().map_err(|_| "Life session lock poisoned")?;
        let board = sim.board();

        let mut out = String::with_capacity((board.width() + 1) * board.height());
        for y in 0..board.height() {
            for x in 0..board.width() {
                out.push(if board.is_alive(x, y) { 'O' } else { '.' });
            }
            out.push('\n');
        }
        Ok(out)
    }

    pub fn population(&self) -> Result<usize, Box<dyn std::error::Error>> {
        let sim = self.sim.read().map_err(|_| "Life session lock poisoned")?;
        Ok(sim.board().population())
    }

    pub fn generation(&self) -> Result<u32, Box<dyn std::error::Error>> {
        let sim = self.sim.read().map_err(|_| "Life session lock poisoned")?;
        Ok(sim.generation())
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Everything needed to resume this session later
    pub fn save(&self) -> Result<LifeSave, Box<dyn std::error::Error>> {
        let sim = self.sim.read().map_err(|_| "Life session lock poisoned")?;
        Ok(LifeSave {
            seed: self.seed,
            rng_state: sim.rng().state(),
            config: *sim.config(),
            snapshot: sim.snapshot().encode(),
        })
    }
}

pub fn save_maze_report(report: &MazeReport, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_maze_report(path: &str) -> Result<MazeReport, Box<dyn std::error::Error>> {
    let json = read_save_file(path, MAX_SAVE_BYTES)?;
    let report: MazeReport = serde_json::from_str(&json)?;
    Ok(report)
}

pub fn save_life(save: &LifeSave, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(save)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_life(path: &str) -> Result<LifeSave, Box<dyn std::error::Error>> {
    let json = read_save_file(path, MAX_SAVE_BYTES)?;
    let save: LifeSave = serde_json::from_str(&json)?;
    Ok(save)
}

/// Largest save file either loader accepts
pub const MAX_SAVE_BYTES: u64 = 64_000_000;

fn read_save_file(path: &str, max_bytes: u64) -> Result<String, Box<dyn std::error::Error>> {
    // Validate file size (prevent loading gigabytes into memory)
    let size = fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(format!("{} is too large ({} bytes, max {})", path, size, max_bytes).into());
    }

    Ok(fs::read_to_string(path)?)
}
