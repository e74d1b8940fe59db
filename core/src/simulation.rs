//! Generation-budgeted simulation with automatic reseeding
//!
//! A background automaton left alone tends to die out or freeze into still
//! lifes. The simulation counts generations against a budget and, once the
//! budget is exceeded, throws the board away and starts over from a fresh
//! random cluster of seed cells.

use alloc::vec::Vec;

use crate::board::AutomatonBoard;
use crate::error::{ConfigError, SnapshotError};
use crate::incremental::IncrementalStepper;
use crate::rng::RandomSource;
use crate::rules::Rules;
use crate::snapshot::LifeSnapshot;
use crate::stepper::{ChangeList, LifeEngine};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a fresh board is seeded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeedPolicy {
    /// Between `min` and `max` (inclusive) placement attempts, each within
    /// `spread` cells right of and below one random origin
    Clustered { min: usize, max: usize, spread: usize },
    /// Exactly `count` placement attempts around one random origin
    Fixed { count: usize, spread: usize },
}

impl SeedPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        let ok = match *self {
            SeedPolicy::Clustered { min, max, spread } => min >= 1 && min <= max && spread >= 1,
            SeedPolicy::Fixed { count, spread } => count >= 1 && spread >= 1,
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidSeedPolicy)
        }
    }

    /// Flat indices of the seed cells. Duplicate picks collapse, so the
    /// result may be shorter than the number of attempts.
    pub fn seed_cells<R: RandomSource>(&self, width: usize, height: usize, rng: &mut R) -> Vec<usize> {
        let (attempts, spread) = match *self {
            SeedPolicy::Clustered { min, max, spread } => (rng.randint(min, max), spread),
            SeedPolicy::Fixed { count, spread } => (count, spread),
        };

        let origin_x = rng.choice_index(width);
        let origin_y = rng.choice_index(height);

        let mut cells = Vec::with_capacity(attempts);
        for _ in 0..attempts {
            let x = (origin_x + rng.choice_index(spread)) % width;
            let y = (origin_y + rng.choice_index(spread)) % height;
            let index = y * width + x;
            if !cells.contains(&index) {
                cells.push(index);
            }
        }
        cells
    }
}

/// How many generations a board gets before it is reseeded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GenerationBudget {
    /// 2.5x the larger board dimension
    Proportional,
    Fixed(u32),
}

impl GenerationBudget {
    pub fn for_board(&self, width: usize, height: usize) -> u32 {
        match *self {
            GenerationBudget::Proportional => (width.max(height) * 5 / 2) as u32,
            GenerationBudget::Fixed(n) => n,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LifeConfig {
    pub rules: Rules,
    pub seeding: SeedPolicy,
    pub budget: GenerationBudget,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            seeding: SeedPolicy::Clustered {
                min: 20,
                max: 30,
                spread: 10,
            },
            budget: GenerationBudget::Proportional,
        }
    }
}

impl LifeConfig {
    /// Cheaper variant: fewer seed cells and a flat 200-generation budget
    pub fn light() -> Self {
        Self {
            rules: Rules::default(),
            seeding: SeedPolicy::Fixed { count: 12, spread: 10 },
            budget: GenerationBudget::Fixed(200),
        }
    }
}

/// Result of one `advance`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generation {
    /// Cells whose liveness changed, with their new state
    pub changes: ChangeList,
    /// The board was reseeded before this step; redraw it in full
    pub restarted: bool,
    /// Generation counter after the step
    pub generation: u32,
}

/// A self-restarting automaton driven one generation per call
pub struct Simulation<R: RandomSource, E: LifeEngine = IncrementalStepper> {
    engine: E,
    config: LifeConfig,
    rng: R,
    budget: u32,
    generation: u32,
}

impl<R: RandomSource, E: LifeEngine> Simulation<R, E> {
    /// Fresh board of `width x height`, seeded per `config.seeding`
    pub fn new(width: usize, height: usize, config: LifeConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.seeding.validate()?;
        let mut board = AutomatonBoard::new(width, height)?;
        seed_board(&mut board, &config.seeding, &mut rng);
        Ok(Self {
            engine: E::from_board(board, config.rules),
            budget: config.budget.for_board(width, height),
            config,
            rng,
            generation: 0,
        })
    }

    /// Pick up a suspended simulation exactly where it stopped
    pub fn restore(snapshot: &LifeSnapshot, config: LifeConfig, rng: R) -> Result<Self, SnapshotError> {
        config.seeding.validate()?;
        if snapshot.generation > snapshot.budget.saturating_add(1) {
            return Err(SnapshotError::GenerationOutOfRange {
                generation: snapshot.generation,
                budget: snapshot.budget,
            });
        }
        let board = AutomatonBoard::from_bytes(snapshot.width, snapshot.height, &snapshot.cells)?;
        let mut pending = ChangeList::new();
        for &(index, alive) in &snapshot.pending {
            if index >= board.len() {
                return Err(SnapshotError::IndexOutOfRange(index));
            }
            pending.insert(index, alive);
        }
        Ok(Self {
            engine: E::resume(board, pending, config.rules),
            config,
            rng,
            budget: snapshot.budget,
            generation: snapshot.generation,
        })
    }

    /// Everything needed to resume later
    pub fn snapshot(&self) -> LifeSnapshot {
        let board = self.engine.board();
        LifeSnapshot {
            width: board.width(),
            height: board.height(),
            cells: board.as_bytes().to_vec(),
            pending: self.engine.pending().to_vec(),
            budget: self.budget,
            generation: self.generation,
        }
    }

    /// Advance one generation, reseeding first if the budget is spent.
    /// A counter at `u32::MAX` counts as spent whatever the budget.
    pub fn advance(&mut self) -> Generation {
        let restarted = self.generation > self.budget || self.generation == u32::MAX;
        if restarted {
            self.restart();
        }

        let changes = self.engine.step();
        self.generation = self.generation.saturating_add(1);
        Generation {
            changes,
            restarted,
            generation: self.generation,
        }
    }

    /// Throw the board away and reseed it
    pub fn restart(&mut self) {
        let mut board = self.engine.board().clone();
        board.clear();
        seed_board(&mut board, &self.config.seeding, &mut self.rng);
        self.engine = E::from_board(board, self.config.rules);
        self.generation = 0;
    }

    pub fn board(&self) -> &AutomatonBoard {
        self.engine.board()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    /// The random source, for callers persisting its state
    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }
}

/// Bring the policy's seed cells to life on an empty board
fn seed_board<R: RandomSource>(board: &mut AutomatonBoard, seeding: &SeedPolicy, rng: &mut R) {
    for index in seeding.seed_cells(board.width(), board.height(), rng) {
        board.set_state_at(index, true);
    }
}

/// A fresh default-configured simulation
pub fn init_board<R: RandomSource>(width: usize, height: usize, rng: R) -> Result<Simulation<R>, ConfigError> {
    Simulation::new(width, height, LifeConfig::default(), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::double_buffer::DoubleBufferStepper;
    use crate::rng::SimpleLCG;

    #[test]
    fn test_budget() {
        assert_eq!(GenerationBudget::Proportional.for_board(40, 64), 160);
        assert_eq!(GenerationBudget::Proportional.for_board(5, 3), 12);
        assert_eq!(GenerationBudget::Fixed(200).for_board(5, 3), 200);
    }

    #[test]
    fn test_seed_cells_cluster_near_origin() {
        let policy = SeedPolicy::Clustered { min: 20, max: 30, spread: 10 };
        let mut rng = SimpleLCG::new(4242);
        let cells = policy.seed_cells(64, 48, &mut rng);
        assert!(!cells.is_empty() && cells.len() <= 30);

        let mut sorted = cells.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), cells.len(), "seed cells are unique");
    }

    #[test]
    fn test_invalid_seed_policy() {
        let config = LifeConfig {
            seeding: SeedPolicy::Clustered { min: 5, max: 2, spread: 3 },
            ..LifeConfig::default()
        };
        let result = Simulation::<_, IncrementalStepper>::new(10, 10, config, SimpleLCG::new(1));
        assert!(matches!(result, Err(ConfigError::InvalidSeedPolicy)));

        let config = LifeConfig {
            seeding: SeedPolicy::Fixed { count: 3, spread: 0 },
            ..LifeConfig::default()
        };
        assert!(init_board(10, 10, SimpleLCG::new(1)).is_ok());
        assert!(Simulation::<_, DoubleBufferStepper>::new(10, 10, config, SimpleLCG::new(1)).is_err());
    }

    #[test]
    fn test_first_step_reports_seeds_moving() {
        let mut sim = init_board(20, 20, SimpleLCG::new(99)).unwrap();
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.budget(), 50);
        assert!(sim.board().population() > 0);

        let outcome = sim.advance();
        assert!(!outcome.restarted);
        assert_eq!(outcome.generation, 1);
        assert!(sim.board().verify_neighbor_counts());
    }

    #[test]
    fn test_restart_after_budget() {
        let config = LifeConfig {
            budget: GenerationBudget::Fixed(3),
            ..LifeConfig::default()
        };
        let mut sim: Simulation<_> = Simulation::new(12, 12, config, SimpleLCG::new(7)).unwrap();

        // Counter runs 1..=4 before the check `generation > budget` trips
        for expected in 1..=4 {
            let outcome = sim.advance();
            assert!(!outcome.restarted);
            assert_eq!(outcome.generation, expected);
        }
        let outcome = sim.advance();
        assert!(outcome.restarted);
        assert_eq!(outcome.generation, 1);
        assert!(sim.board().verify_neighbor_counts());
    }

    #[test]
    fn test_board_is_consistent_right_after_restart() {
        let mut sim = init_board(30, 20, SimpleLCG::new(1234)).unwrap();
        for _ in 0..9 {
            sim.advance();
        }
        let before = sim.board().clone();

        sim.restart();
        assert_eq!(sim.generation(), 0);
        assert!(sim.board().verify_neighbor_counts());
        assert!(sim.board().population() > 0);
        assert_ne!(sim.board(), &before);
        assert_eq!(sim.engine().pending(), crate::stepper::scan_transitions(sim.board(), &Rules::default()));
    }

    #[test]
    fn test_counter_at_max_restarts_instead_of_overflowing() {
        let sim = init_board(6, 6, SimpleLCG::new(8)).unwrap();
        let mut snapshot = sim.snapshot();
        snapshot.budget = u32::MAX;
        snapshot.generation = u32::MAX;
        let decoded = LifeSnapshot::decode(&snapshot.encode()).unwrap();

        let mut restored: Simulation<_> = Simulation::restore(&decoded, LifeConfig::default(), SimpleLCG::new(8)).unwrap();
        let outcome = restored.advance();
        assert!(outcome.restarted);
        assert_eq!(outcome.generation, 1);
        assert!(restored.board().verify_neighbor_counts());
    }

    #[test]
    fn test_restore_rejects_generation_past_budget() {
        let sim = init_board(6, 6, SimpleLCG::new(8)).unwrap();
        let mut snapshot = sim.snapshot();
        snapshot.budget = 5;

        // budget + 1 is the last counter a live simulation can hold
        snapshot.generation = 6;
        assert!(Simulation::<_, IncrementalStepper>::restore(&snapshot, LifeConfig::default(), SimpleLCG::new(8)).is_ok());

        snapshot.generation = 9;
        let result = Simulation::<_, IncrementalStepper>::restore(&snapshot, LifeConfig::default(), SimpleLCG::new(8));
        assert!(matches!(
            result,
            Err(SnapshotError::GenerationOutOfRange { generation: 9, budget: 5 })
        ));
    }

    #[test]
    fn test_snapshot_restore_continues_identically() {
        let mut original: Simulation<_> = Simulation::new(16, 12, LifeConfig::default(), SimpleLCG::new(321)).unwrap();
        for _ in 0..7 {
            original.advance();
        }

        let snapshot = original.snapshot();
        let mut restored: Simulation<_> =
            Simulation::restore(&snapshot, LifeConfig::default(), SimpleLCG::new(321)).unwrap();
        assert_eq!(restored.generation(), 7);
        assert_eq!(restored.budget(), original.budget());

        for _ in 0..10 {
            assert_eq!(original.advance().changes, restored.advance().changes);
        }
        assert_eq!(original.board(), restored.board());
    }

    #[test]
    fn test_restore_rejects_out_of_range_pending() {
        let sim = init_board(5, 5, SimpleLCG::new(3)).unwrap();
        let mut snapshot = sim.snapshot();
        snapshot.pending.push((25, true));
        let result = Simulation::<_, IncrementalStepper>::restore(&snapshot, LifeConfig::default(), SimpleLCG::new(3));
        assert!(matches!(result, Err(SnapshotError::IndexOutOfRange(25))));
    }
}
