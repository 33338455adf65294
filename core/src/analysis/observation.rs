use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible snapshot of a board: what the assistant is allowed to see.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub size: Coord,
    pub mine_count: CellCount,
    pub cells: Array2<CellState>,
}

impl Observation {
    pub fn new(size: Coord, mine_count: CellCount, cells: Array2<CellState>) -> Result<Self> {
        let obs = Self {
            size,
            mine_count,
            cells,
        };
        obs.validate()?;
        Ok(obs)
    }

    pub fn from_board(board: &Board) -> Self {
        Self {
            size: board.size(),
            mine_count: board.total_mines(),
            cells: board.cells().clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let expected = (self.size as usize, self.size as usize);
        if self.cells.dim() != expected {
            return Err(GameError::InvalidBoardShape);
        }

        if self.mine_count > mult(self.size, self.size) {
            return Err(GameError::TooManyMines);
        }

        Ok(())
    }

    pub fn cell(&self, coords: Coord2) -> CellState {
        self.cells[coords.to_nd_index()]
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count_matching(CellState::is_revealed)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_matching(CellState::is_flagged)
    }

    /// Hidden, unflagged cells in row-major order.
    pub fn iter_open(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_open())
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    fn count_matching(&self, pred: impl Fn(CellState) -> bool) -> CellCount {
        self.cells
            .iter()
            .filter(|&&cell| pred(cell))
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_board_maps_revealed_and_flagged_cells() {
        let layout = MineLayout::from_mine_coords(2, &[(0, 0)]).unwrap();
        let mut board = Board::from_layout(layout);
        let mut generator = ShuffleGenerator::from_seed(0);

        board.reveal((1, 1), &mut generator).unwrap();
        board.toggle_flag((0, 0)).unwrap();

        let obs = Observation::from_board(&board);

        assert_eq!(obs.mine_count, 1);
        assert_eq!(obs.cell((1, 1)), CellState::Revealed(1));
        assert!(obs.cell((0, 0)).is_flagged());
        assert_eq!(obs.revealed_count(), 1);
        assert_eq!(obs.flagged_count(), 1);
        assert_eq!(obs.iter_open().collect::<Vec<_>>(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn validate_rejects_shape_mismatch() {
        let obs = Observation {
            size: 2,
            mine_count: 1,
            cells: Array2::default([1, 2]),
        };

        assert_eq!(obs.validate(), Err(GameError::InvalidBoardShape));
    }

    #[test]
    fn validate_rejects_impossible_mine_count() {
        let result = Observation::new(2, 5, Array2::default([2, 2]));
        assert_eq!(result, Err(GameError::TooManyMines));
    }
}
