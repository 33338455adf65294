use serde::{Deserialize, Serialize};

use super::Observation;
use crate::*;

/// Deduction a single clue supports about its open neighbors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClueRule {
    /// Every open neighbor must be a mine.
    CertainMine,
    /// Every open neighbor is safe.
    CertainSafe,
    /// Local mine density differs enough from the global rate to matter.
    LocalBias(u8),
    /// Nothing to contribute.
    Inert,
}

/// A revealed number and the neighbors it constrains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueConstraint {
    pub clue: Coord2,
    pub open: Neighbors,
    pub flagged: u8,
    /// Mines still unaccounted for, negative when over-flagged.
    pub need: i16,
}

impl ClueConstraint {
    pub fn rule(&self, base_probability: u8) -> ClueRule {
        let open = self.open.len() as i16;
        if self.need > 0 && self.need == open {
            ClueRule::CertainMine
        } else if self.need == 0 && open > 0 {
            ClueRule::CertainSafe
        } else if self.need > 0 && open > 0 {
            let local = percent(self.need.into(), open.into());
            if local.abs_diff(base_probability) > 10 {
                ClueRule::LocalBias(local)
            } else {
                ClueRule::Inert
            }
        } else {
            ClueRule::Inert
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintStats {
    pub clue_count: usize,
    pub certain_mine_count: usize,
    pub certain_safe_count: usize,
    pub local_bias_count: usize,
}

/// Global mine rate over cells that are neither revealed nor flagged.
pub fn base_probability(obs: &Observation) -> u8 {
    let flagged = i32::from(obs.flagged_count());
    let remaining_mines = i32::from(obs.mine_count) - flagged;
    let remaining_cells = i32::from(obs.total_cells()) - i32::from(obs.revealed_count()) - flagged;
    percent(remaining_mines, remaining_cells)
}

/// One constraint per revealed cell with a nonzero number, row-major.
pub fn build_constraints(obs: &Observation) -> Vec<ClueConstraint> {
    let mut constraints = Vec::new();

    for ((row, col), cell) in obs.cells.indexed_iter() {
        let Some(count) = cell.clue().filter(|&count| count > 0) else {
            continue;
        };
        let clue = (row as Coord, col as Coord);

        let mut open = Neighbors::new();
        let mut flagged = 0u8;
        for neighbor in obs.iter_neighbors(clue) {
            match obs.cell(neighbor) {
                CellState::Hidden => open.push(neighbor),
                CellState::Flagged => flagged += 1,
                CellState::Revealed(_) | CellState::Detonated => {}
            }
        }

        constraints.push(ClueConstraint {
            clue,
            open,
            flagged,
            need: i16::from(count) - i16::from(flagged),
        });
    }

    constraints
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;

    fn observe(size: Coord, mines: CellCount, rows: &[&str]) -> Observation {
        let cells: Vec<CellState> = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|ch| match ch {
                '#' => CellState::Hidden,
                'F' => CellState::Flagged,
                digit => CellState::Revealed(digit.to_digit(10).unwrap() as u8),
            })
            .collect();
        let cells = Array2::from_shape_vec([size as usize, size as usize], cells).unwrap();
        Observation::new(size, mines, cells).unwrap()
    }

    #[test]
    fn builds_one_constraint_per_nonzero_clue() {
        let obs = observe(3, 1, &["#1#", "111", "000"]);

        let constraints = build_constraints(&obs);

        assert_eq!(constraints.len(), 4);
        let top = &constraints[0];
        assert_eq!(top.clue, (0, 1));
        assert_eq!(top.open.as_slice(), &[(0, 0), (0, 2)]);
        assert_eq!(top.need, 1);
    }

    #[test]
    fn flags_reduce_need() {
        let obs = observe(3, 2, &["F2#", "###", "###"]);

        let constraint = &build_constraints(&obs)[0];

        assert_eq!(constraint.flagged, 1);
        assert_eq!(constraint.need, 1);
        assert_eq!(constraint.open.len(), 4);
    }

    #[test]
    fn classifies_rules() {
        let mine = ClueConstraint {
            clue: (0, 0),
            open: Neighbors::from_slice(&[(0, 1), (1, 0)]),
            flagged: 0,
            need: 2,
        };
        let safe = ClueConstraint {
            need: 0,
            flagged: 2,
            ..mine.clone()
        };
        let biased = ClueConstraint {
            need: 1,
            ..mine.clone()
        };
        let over_flagged = ClueConstraint {
            need: -1,
            ..mine.clone()
        };

        assert_eq!(mine.rule(15), ClueRule::CertainMine);
        assert_eq!(safe.rule(15), ClueRule::CertainSafe);
        assert_eq!(biased.rule(15), ClueRule::LocalBias(50));
        assert_eq!(biased.rule(45), ClueRule::Inert);
        assert_eq!(over_flagged.rule(15), ClueRule::Inert);
    }

    #[test]
    fn base_probability_uses_remaining_mines_and_cells() {
        let obs = observe(3, 2, &["F1#", "###", "###"]);
        // 1 mine left over 7 cells
        assert_eq!(base_probability(&obs), 14);

        let full = observe(2, 1, &["F1", "11"]);
        assert_eq!(base_probability(&full), 0);
    }
}
