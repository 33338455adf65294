use super::*;

/// Replays a predetermined layout, for tests and recorded games.
///
/// The layout is used as-is, so the opening move is only safe if the layout
/// already leaves it free.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedLayoutGenerator {
    layout: MineLayout,
}

impl FixedLayoutGenerator {
    pub fn new(layout: MineLayout) -> Self {
        Self { layout }
    }

    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        MineLayout::from_mine_coords(size, mine_coords).map(Self::new)
    }
}

impl LayoutGenerator for FixedLayoutGenerator {
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> MineLayout {
        if self.layout.game_config() != config {
            log::warn!(
                "Fixed layout {:?} does not match requested {:?}",
                self.layout.game_config(),
                config
            );
        }
        if self.layout.contains_mine(safe) {
            log::warn!("Fixed layout has a mine on the opening cell {:?}", safe);
        }
        self.layout.clone()
    }
}
