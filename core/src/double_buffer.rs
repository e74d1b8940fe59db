//! Full-scan double-buffered stepping
//!
//! Two complete boards. Every generation scans every cell of the front
//! board, writes the result into the back board, then flips. O(area) per
//! step no matter how quiet the board is; it exists as a straightforward
//! reference the incremental engine is checked against.

use crate::board::AutomatonBoard;
use crate::rules::Rules;
use crate::stepper::{scan_transitions, ChangeList, LifeEngine};

#[derive(Clone, Debug)]
pub struct DoubleBufferStepper {
    buffers: [AutomatonBoard; 2],
    front: usize,
    rules: Rules,
}

impl LifeEngine for DoubleBufferStepper {
    fn from_board(board: AutomatonBoard, rules: Rules) -> Self {
        Self {
            buffers: [board.clone(), board],
            front: 0,
            rules,
        }
    }

    /// No pending state to carry: the next generation is always recomputed
    /// from the board.
    fn resume(board: AutomatonBoard, _pending: ChangeList, rules: Rules) -> Self {
        Self::from_board(board, rules)
    }

    fn board(&self) -> &AutomatonBoard {
        &self.buffers[self.front]
    }

    fn rules(&self) -> &Rules {
        &self.rules
    }

    fn pending(&self) -> ChangeList {
        scan_transitions(self.board(), &self.rules)
    }

    fn step(&mut self) -> ChangeList {
        let back = 1 - self.front;
        let [a, b] = &mut self.buffers;
        let (current, next) = if self.front == 0 { (&*a, b) } else { (&*b, a) };

        let changes = scan_transitions(current, &self.rules);
        next.clone_from(current);
        for (index, alive) in changes.iter() {
            next.set_state_at(index, alive);
        }

        self.front = back;
        changes
    }
}
