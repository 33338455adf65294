use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ClueRule, ConstraintStats, Observation, base_probability, build_constraints};
use crate::*;

/// Mine likelihood in percent for every hidden, unflagged cell.
///
/// Rebuilt from scratch on every computation. Iterates in row-major order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbabilityMap {
    cells: BTreeMap<Coord2, u8>,
    base_probability: u8,
}

impl ProbabilityMap {
    pub fn get(&self, coords: Coord2) -> Option<u8> {
        self.cells.get(&coords).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, u8)> + '_ {
        self.cells.iter().map(|(&coords, &value)| (coords, value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn base_probability(&self) -> u8 {
        self.base_probability
    }

    /// Cells proven safe, row-major.
    pub fn safe_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter()
            .filter(|&(_, value)| value == 0)
            .map(|(coords, _)| coords)
    }

    /// Cells proven to be mines, row-major.
    pub fn mine_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter()
            .filter(|&(_, value)| value == 100)
            .map(|(coords, _)| coords)
    }

    /// Copy keeping only the cells accepted by `keep`.
    pub fn restricted_to(&self, mut keep: impl FnMut(Coord2) -> bool) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .filter(|&(&coords, _)| keep(coords))
                .map(|(&coords, &value)| (coords, value))
                .collect(),
            base_probability: self.base_probability,
        }
    }

    /// Share of mapped cells whose value is certain (0 or 100).
    pub fn confidence(&self) -> u8 {
        self.summary().confidence
    }

    pub fn summary(&self) -> AnalysisSummary {
        let safe = self.safe_cells().count();
        let mines = self.mine_cells().count();
        let total = self.len();
        AnalysisSummary {
            safe,
            mines,
            uncertain: total - safe - mines,
            confidence: percent(
                (safe + mines).try_into().unwrap_or(i32::MAX),
                total.try_into().unwrap_or(i32::MAX),
            ),
        }
    }
}

/// Counts behind a full-board analysis report.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub safe: usize,
    pub mines: usize,
    pub uncertain: usize,
    pub confidence: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    ClearSafeCells,
    FlagMines,
    ProceedWithCaution,
}

impl AnalysisSummary {
    pub fn recommendation(&self) -> Recommendation {
        if self.safe > 0 {
            Recommendation::ClearSafeCells
        } else if self.mines > 0 {
            Recommendation::FlagMines
        } else {
            Recommendation::ProceedWithCaution
        }
    }
}

/// Everything the clues around one cell say about it.
#[derive(Copy, Clone, Debug, Default)]
struct Evidence {
    safe: bool,
    mine: bool,
    bias: Option<u8>,
}

impl Evidence {
    fn add(&mut self, rule: ClueRule) {
        match rule {
            ClueRule::CertainMine => self.mine = true,
            ClueRule::CertainSafe => self.safe = true,
            ClueRule::LocalBias(local) => {
                self.bias = Some(match self.bias {
                    Some(current) => more_extreme(current, local),
                    None => local,
                });
            }
            ClueRule::Inert => {}
        }
    }

    fn resolve(self, coords: Coord2, base: u8) -> u8 {
        // The base rate is the starting value, so it wins ties against any bias.
        let heuristic = self.bias.map_or(base, |bias| more_extreme(base, bias));
        match (self.mine, self.safe) {
            (true, false) => 100,
            (false, true) => 0,
            (true, true) => {
                log::warn!("Cell {:?} deduced both safe and mine, flags disagree with clues", coords);
                heuristic
            }
            (false, false) => heuristic,
        }
    }
}

fn distance_from_even(value: u8) -> u8 {
    value.abs_diff(50)
}

/// Keeps whichever of `current` and `candidate` is farther from 50, `current`
/// on a tie.
fn more_extreme(current: u8, candidate: u8) -> u8 {
    if distance_from_even(candidate) > distance_from_even(current) {
        candidate
    } else {
        current
    }
}

/// Estimates mine likelihood for every hidden, unflagged cell.
///
/// Each cell starts at the global base rate. Every nonzero clue then
/// contributes a rule to its open neighbors, in row-major clue order, and each
/// cell folds its contributions: proven mines and proven safe cells are exact
/// and win over any heuristic bias, a bias only replaces the current estimate
/// when strictly more extreme.
pub fn infer(obs: &Observation) -> ProbabilityMap {
    let base = base_probability(obs);
    let constraints = build_constraints(obs);

    let mut evidence: BTreeMap<Coord2, Evidence> =
        obs.iter_open().map(|coords| (coords, Evidence::default())).collect();
    let mut stats = ConstraintStats {
        clue_count: constraints.len(),
        ..Default::default()
    };

    for constraint in &constraints {
        let rule = constraint.rule(base);
        match rule {
            ClueRule::CertainMine => stats.certain_mine_count += 1,
            ClueRule::CertainSafe => stats.certain_safe_count += 1,
            ClueRule::LocalBias(_) => stats.local_bias_count += 1,
            ClueRule::Inert => continue,
        }
        log::trace!(
            "Clue {:?} needs {} of {} open neighbors: {:?}",
            constraint.clue,
            constraint.need,
            constraint.open.len(),
            rule
        );

        for coords in &constraint.open {
            if let Some(cell) = evidence.get_mut(coords) {
                cell.add(rule);
            }
        }
    }

    let cells: BTreeMap<Coord2, u8> = evidence
        .into_iter()
        .map(|(coords, cell)| (coords, cell.resolve(coords, base)))
        .collect();

    let map = ProbabilityMap {
        cells,
        base_probability: base,
    };
    log::debug!(
        "Analyzed {} cells at base {}%: {:?}, {:?}",
        map.len(),
        base,
        map.summary(),
        stats
    );
    map
}
