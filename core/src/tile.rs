use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
///
/// A cell is in exactly one of these states, so a flagged cell can never be
/// revealed at the same time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    /// Opened safe cell with its adjacent mine count.
    Revealed(u8),
    /// Opened mine, ends the game.
    Detonated,
}

impl CellState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_revealed(self) -> bool {
        !self.is_unrevealed()
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    /// Hidden and not flagged, the only cells the assistant estimates.
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn clue(self) -> Option<u8> {
        match self {
            Self::Revealed(count) => Some(count),
            _ => None,
        }
    }
}
