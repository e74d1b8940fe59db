//! Change lists and the common stepping interface
//!
//! A [`ChangeList`] maps a flat cell index to the liveness it should take
//! on. Keys are unique; iteration order carries no meaning for callers.

use alloc::collections::btree_map::{self, BTreeMap};
use alloc::vec::Vec;

use crate::board::AutomatonBoard;
use crate::rules::Rules;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeList {
    entries: BTreeMap<usize, bool>,
}

impl ChangeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transition; a later insert for the same cell wins
    pub fn insert(&mut self, index: usize, alive: bool) {
        self.entries.insert(index, alive);
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.entries.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.entries.iter().map(|(&index, &alive)| (index, alive))
    }

    pub fn to_vec(&self) -> Vec<(usize, bool)> {
        self.iter().collect()
    }
}

impl FromIterator<(usize, bool)> for ChangeList {
    fn from_iter<I: IntoIterator<Item = (usize, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ChangeList {
    type Item = (usize, bool);
    type IntoIter = btree_map::IntoIter<usize, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Record the transition (if any) that `index` should make next generation,
/// judged purely from its current packed state.
pub fn check_cell(board: &AutomatonBoard, rules: &Rules, index: usize, next: &mut ChangeList) {
    if let Some(alive) = rules.transition(board.is_alive_at(index), board.neighbor_count_at(index)) {
        next.insert(index, alive);
    }
}

/// Every transition the board would make right now. Full O(area) scan.
pub fn scan_transitions(board: &AutomatonBoard, rules: &Rules) -> ChangeList {
    let mut changes = ChangeList::new();
    for index in 0..board.len() {
        check_cell(board, rules, index, &mut changes);
    }
    changes
}

/// One way of advancing an automaton a generation at a time.
///
/// Both engines agree on the board after every step; they differ only in
/// how much of the board they touch to get there.
pub trait LifeEngine {
    /// Engine over an existing board, ready to compute its next generation
    fn from_board(board: AutomatonBoard, rules: Rules) -> Self
    where
        Self: Sized;

    /// Engine over a board whose next transitions are already known
    fn resume(board: AutomatonBoard, pending: ChangeList, rules: Rules) -> Self
    where
        Self: Sized;

    fn board(&self) -> &AutomatonBoard;

    fn rules(&self) -> &Rules;

    /// Transitions the next `step` will apply
    fn pending(&self) -> ChangeList;

    /// Advance one generation. Returns the cells that changed, each with its
    /// new liveness.
    fn step(&mut self) -> ChangeList;
}
