use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintOutcome {
    /// Assistant off, game not running, or nothing analyzed yet.
    NotApplicable,
    Safe(Coord2),
    Mine(Coord2),
    NothingCertain,
}

impl HintOutcome {
    pub const fn coords(self) -> Option<Coord2> {
        match self {
            Self::Safe(coords) | Self::Mine(coords) => Some(coords),
            Self::NotApplicable | Self::NothingCertain => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Reveal(Coord2),
    Flag(Coord2),
}

impl Move {
    pub const fn coords(self) -> Coord2 {
        match self {
            Self::Reveal(coords) | Self::Flag(coords) => coords,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoSolveOutcome {
    NotApplicable,
    /// Number of moves queued, zero when nothing was certain.
    Queued(usize),
}

impl AutoSolveOutcome {
    pub const fn move_count(self) -> usize {
        match self {
            Self::NotApplicable => 0,
            Self::Queued(count) => count,
        }
    }
}

/// First proven-safe cell in row-major order, otherwise the first proven mine.
pub fn hint(map: &ProbabilityMap) -> HintOutcome {
    if let Some(coords) = map.safe_cells().next() {
        HintOutcome::Safe(coords)
    } else if let Some(coords) = map.mine_cells().next() {
        HintOutcome::Mine(coords)
    } else {
        HintOutcome::NothingCertain
    }
}

/// Reveals for every proven-safe cell followed by flags for every proven
/// mine, each group row-major.
pub fn auto_solve_moves(map: &ProbabilityMap) -> Vec<Move> {
    map.safe_cells()
        .map(Move::Reveal)
        .chain(map.mine_cells().map(Move::Flag))
        .collect()
}

/// Least likely mine, first in row-major order among equals.
pub fn best_guess(map: &ProbabilityMap) -> Option<Coord2> {
    map.iter()
        .min_by_key(|&(coords, value)| (value, coords))
        .map(|(coords, _)| coords)
}
