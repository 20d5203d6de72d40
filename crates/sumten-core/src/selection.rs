//! Selection rules: the single authority on whether a group of cells clears.
//!
//! A selection is accepted when the values of its *uncleared* cells add up
//! to exactly the target. Cells that are already cleared are skipped rather
//! than rejecting the whole selection, so a client whose view lags the
//! server by one clear still gets a sensible answer.

use crate::board::{Board, CellPos};

/// Sum every accepted selection must hit.
pub const TARGET_SUM: u32 = 10;

/// Why a selection was turned down.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// At least one coordinate lies outside the board.
    OutOfRange,
    /// Every candidate was already cleared (or the list was empty).
    NothingToClear,
    /// The uncleared values summed to something other than the target.
    WrongSum(u32),
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// These cells were cleared, in the order they were submitted.
    Cleared(Vec<CellPos>),
    Rejected(RejectReason),
}

impl Selection {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Selection::Cleared(_))
    }

    /// Score earned by this selection: one point per cleared cell.
    pub fn points(&self) -> u32 {
        match self {
            Selection::Cleared(cells) => cells.len() as u32,
            Selection::Rejected(_) => 0,
        }
    }
}

/// Check `candidates` against `board` and clear them if they hit `target`.
///
/// The board is only mutated on acceptance. Duplicate coordinates count once.
pub fn validate(board: &mut Board, candidates: &[CellPos], target: u32) -> Selection {
    if candidates.iter().any(|pos| !board.contains(*pos)) {
        return Selection::Rejected(RejectReason::OutOfRange);
    }

    let mut live: Vec<CellPos> = Vec::with_capacity(candidates.len());
    let mut sum = 0u32;

    for &pos in candidates {
        if live.contains(&pos) {
            continue;
        }
        match board.get(pos) {
            Some(cell) if !cell.cleared => {
                sum += u32::from(cell.value);
                live.push(pos);
            }
            _ => {}
        }
    }

    if live.is_empty() {
        return Selection::Rejected(RejectReason::NothingToClear);
    }
    if sum != target {
        return Selection::Rejected(RejectReason::WrongSum(sum));
    }

    for &pos in &live {
        if let Some(cell) = board.get_mut(pos) {
            cell.cleared = true;
        }
    }

    Selection::Cleared(live)
}
