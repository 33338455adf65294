use crate::*;
pub use fixed::*;
pub use shuffle::*;

mod fixed;
mod shuffle;

/// Source of mine layouts, consulted once per game at the first reveal.
pub trait LayoutGenerator {
    /// Places `config.mines` mines on a `config.size` square board, keeping
    /// `safe` free of mines.
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> MineLayout;
}

impl<G: LayoutGenerator + ?Sized> LayoutGenerator for Box<G> {
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> MineLayout {
        (**self).generate(config, safe)
    }
}
