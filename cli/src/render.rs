use neonsweeper_core::*;

fn cell_char(cell: CellState) -> char {
    match cell {
        CellState::Hidden => '#',
        CellState::Flagged => 'F',
        CellState::Detonated => '*',
        CellState::Revealed(0) => '.',
        CellState::Revealed(count) => char::from(b'0' + count),
    }
}

/// One line per row: `#` hidden, `F` flagged, `*` detonated, `.` or the clue
/// for revealed cells.
pub fn board_text(board: &Board) -> String {
    let mut text = String::new();
    let size = board.size();
    for row in 0..size {
        for col in 0..size {
            let cell = board.cell_at((row, col)).unwrap_or_default();
            text.push(cell_char(cell));
        }
        text.push('\n');
    }
    text
}

/// Percentages aligned in a grid, blanks for cells outside the map.
pub fn probability_text(size: Coord, map: &ProbabilityMap) -> String {
    let mut text = String::new();
    for row in 0..size {
        for col in 0..size {
            let cell = match map.get((row, col)) {
                Some(value) => format!("{value:>4}"),
                None => format!("{:>4}", "-"),
            };
            text.push_str(&cell);
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        let layout = MineLayout::from_mine_coords(3, &[(0, 0)]).unwrap();
        let mut board = Board::from_layout(layout);
        let mut generator = ShuffleGenerator::from_seed(0);
        board.reveal((2, 2), &mut generator).unwrap();
        board
    }

    #[test]
    fn renders_clues_and_hidden_cells() {
        assert_eq!(board_text(&board()), "#1.\n11.\n...\n");
    }

    #[test]
    fn renders_probability_grid() {
        let map = infer(&Observation::from_board(&board()));
        assert_eq!(
            probability_text(3, &map),
            " 100   -   -\n   -   -   -\n   -   -   -\n"
        );
    }
}
