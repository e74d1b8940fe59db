//! Change-list stepping
//!
//! Only cells that just changed, and their neighbours, can change next, so
//! each step:
//! 1. Applies the current change list to the board
//! 2. Re-examines every applied cell and its 8 neighbours against the
//!    rules, collecting the next change list
//! 3. Swaps the lists
//!
//! Work per step is proportional to activity, not board area. Examining a
//! cell twice is harmless because the decision reads only the board, which
//! is fully updated before any examination starts.

use core::mem;

use crate::board::AutomatonBoard;
use crate::rules::Rules;
use crate::stepper::{check_cell, scan_transitions, ChangeList, LifeEngine};

#[derive(Clone, Debug)]
pub struct IncrementalStepper {
    board: AutomatonBoard,
    rules: Rules,
    current: ChangeList,
    next: ChangeList,
}

impl IncrementalStepper {
    /// Cells that will be re-examined after the next apply pass
    pub fn current_changes(&self) -> &ChangeList {
        &self.current
    }

    /// Consume the stepper, keeping the board
    pub fn into_board(self) -> AutomatonBoard {
        self.board
    }
}

impl LifeEngine for IncrementalStepper {
    /// Primes the first change list with a full scan, so every cell that
    /// should move in generation 1 is known regardless of the rules.
    fn from_board(board: AutomatonBoard, rules: Rules) -> Self {
        let current = scan_transitions(&board, &rules);
        Self {
            board,
            rules,
            current,
            next: ChangeList::new(),
        }
    }

    fn resume(board: AutomatonBoard, pending: ChangeList, rules: Rules) -> Self {
        Self {
            board,
            rules,
            current: pending,
            next: ChangeList::new(),
        }
    }

    fn board(&self) -> &AutomatonBoard {
        &self.board
    }

    fn rules(&self) -> &Rules {
        &self.rules
    }

    fn pending(&self) -> ChangeList {
        self.current.clone()
    }

    fn step(&mut self) -> ChangeList {
        let mut applied = ChangeList::new();
        for (index, alive) in self.current.iter() {
            if self.board.set_state_at(index, alive) {
                applied.insert(index, alive);
            }
        }

        for (index, _) in applied.iter() {
            check_cell(&self.board, &self.rules, index, &mut self.next);
            let (x, y) = self.board.coords_of(index);
            for neighbor in self.board.neighbors(x, y) {
                check_cell(&self.board, &self.rules, neighbor, &mut self.next);
            }
        }

        mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
        applied
    }
}
