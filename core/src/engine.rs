use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for the first reveal, no mines placed yet.
    #[default]
    Standby,
    Active,
    GameOver,
    Victory,
}

impl GameState {
    pub const fn is_standby(self) -> bool {
        matches!(self, Self::Standby)
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }
}

/// Mine placement phase. Placement waits for the first reveal so the opening
/// move can be kept safe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
enum Minefield {
    Pending,
    Placed(MineLayout),
}

/// What a reveal request did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    /// Newly revealed cells, the requested cell first.
    pub cells: Vec<Coord2>,
    /// Whether this request moved the game out of standby.
    pub started: bool,
    pub state: GameState,
}

impl RevealReport {
    fn no_change(state: GameState) -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            cells: Vec::new(),
            started: false,
            state,
        }
    }
}

/// What a flag toggle did.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagReport {
    pub outcome: MarkOutcome,
    pub coords: Coord2,
    /// Flag status of the cell after the request.
    pub flagged: bool,
    pub state: GameState,
}

/// Board state machine: visible cells, deferred mine layout, counters and
/// game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    minefield: Minefield,
    cells: Array2<CellState>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Fresh board in standby, mines are placed on the first reveal.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_minefield(config, Minefield::Pending))
    }

    /// Board over an already placed layout, still in standby until the first
    /// reveal.
    pub fn from_layout(layout: MineLayout) -> Self {
        Self::with_minefield(layout.game_config(), Minefield::Placed(layout))
    }

    fn with_minefield(config: GameConfig, minefield: Minefield) -> Self {
        Self {
            config,
            minefield,
            cells: Array2::default(config.dims().to_nd_index()),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: GameState::Standby,
            triggered_mine: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// Configured mines minus placed flags, floored at zero. Flags are not
    /// checked against the real layout.
    pub fn remaining_mine_estimate(&self) -> CellCount {
        self.config.mines.saturating_sub(self.flagged_count.0)
    }

    /// Share of player actions that were reveals rather than flags.
    pub fn accuracy(&self) -> u8 {
        let revealed = i32::from(self.revealed_count.0);
        let total = revealed + i32::from(self.flagged_count.0);
        if total == 0 { 100 } else { percent(revealed, total) }
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<CellState> {
        let coords = self.config.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    pub fn cells(&self) -> &Array2<CellState> {
        &self.cells
    }

    /// All cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, CellState)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn layout(&self) -> Option<&MineLayout> {
        match &self.minefield {
            Minefield::Pending => None,
            Minefield::Placed(layout) => Some(layout),
        }
    }

    pub fn is_placed(&self) -> bool {
        self.layout().is_some()
    }

    /// Mine at `coords`, `None` while mines are not placed yet.
    pub fn has_mine_at(&self, coords: Coord2) -> Result<Option<bool>> {
        let coords = self.config.validate_coords(coords)?;
        Ok(self.layout().map(|layout| layout.contains_mine(coords)))
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.config.dims())
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagReport> {
        use CellState::*;
        use MarkOutcome::*;

        let coords = self.config.validate_coords(coords)?;
        let index = coords.to_nd_index();

        let outcome = if self.state.is_finished() {
            NoChange
        } else {
            match self.cells[index] {
                Hidden => {
                    self.cells[index] = Flagged;
                    self.flagged_count += 1;
                    Changed
                }
                Flagged => {
                    self.cells[index] = Hidden;
                    self.flagged_count -= 1;
                    Changed
                }
                Revealed(_) | Detonated => NoChange,
            }
        };

        Ok(FlagReport {
            outcome,
            coords,
            flagged: self.cells[index].is_flagged(),
            state: self.state,
        })
    }

    /// Opens a cell, placing mines first when this is the opening move.
    pub fn reveal<G>(&mut self, coords: Coord2, generator: &mut G) -> Result<RevealReport>
    where
        G: LayoutGenerator + ?Sized,
    {
        let coords = self.config.validate_coords(coords)?;

        if self.state.is_finished() || !self.cells[coords.to_nd_index()].is_open() {
            return Ok(RevealReport::no_change(self.state));
        }

        if let Minefield::Pending = self.minefield {
            let layout = generator.generate(self.config, coords);
            if layout.size() != self.config.size {
                return Err(GameError::InvalidBoardShape);
            }
            self.config = layout.game_config();
            self.minefield = Minefield::Placed(layout);
        }

        let started = self.mark_started();
        let (outcome, cells) = self.reveal_single_cell(coords);

        Ok(RevealReport {
            outcome,
            cells,
            started,
            state: self.state,
        })
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> (RevealOutcome, Vec<Coord2>) {
        let Minefield::Placed(layout) = &self.minefield else {
            return (RevealOutcome::NoChange, Vec::new());
        };

        if layout.contains_mine(coords) {
            self.cells[coords.to_nd_index()] = CellState::Detonated;
            self.revealed_count += 1;
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return (RevealOutcome::HitMine, vec![coords]);
        }

        let mut revealed = Vec::new();
        let mut to_visit = vec![coords];

        while let Some(visit_coords) = to_visit.pop() {
            let index = visit_coords.to_nd_index();
            if !self.cells[index].is_open() || layout.contains_mine(visit_coords) {
                continue;
            }

            let adjacent_mines = layout.adjacent_mine_count(visit_coords);
            self.cells[index] = CellState::Revealed(adjacent_mines);
            self.revealed_count += 1;
            revealed.push(visit_coords);

            if adjacent_mines == 0 {
                to_visit.extend(
                    layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.cells[pos.to_nd_index()].is_open()),
                );
            }
        }

        if self.revealed_count.0 >= layout.safe_cell_count() {
            self.end_game(true);
            (RevealOutcome::Won, revealed)
        } else {
            (RevealOutcome::Revealed, revealed)
        }
    }

    fn mark_started(&mut self) -> bool {
        if self.state.is_standby() {
            self.state = GameState::Active;
            log::debug!("Game started");
            true
        } else {
            false
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            GameState::Victory
        } else {
            GameState::GameOver
        };
        log::debug!("Game ended in {:?}", self.state);
    }
}
