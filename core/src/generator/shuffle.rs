use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::*;

/// Uniform placement: every cell except the safe one is a candidate, the
/// candidates are shuffled (Fisher-Yates) and the first `mines` become mines.
#[derive(Clone, Debug)]
pub struct ShuffleGenerator<R = SmallRng> {
    rng: R,
}

impl ShuffleGenerator<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_os_rng())
    }
}

impl<R: RngCore> ShuffleGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> LayoutGenerator for ShuffleGenerator<R> {
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> MineLayout {
        place_mines(&mut self.rng, config, safe)
    }
}

/// Shuffle-based placement that never puts a mine on `safe`.
pub fn place_mines<R: Rng + ?Sized>(rng: &mut R, config: GameConfig, safe: Coord2) -> MineLayout {
    let size = config.size;
    let mut candidates: Vec<Coord2> = (0..size)
        .flat_map(|row| (0..size).map(move |col| (row, col)))
        .filter(|&coords| coords != safe)
        .collect();

    let mines = usize::from(config.mines);
    if mines > candidates.len() {
        log::warn!(
            "Board too small for requested mines, requested {} but only fits {}",
            mines,
            candidates.len()
        );
    }

    candidates.shuffle(rng);
    candidates.truncate(mines);

    let mut mine_mask: Array2<bool> = Array2::default(config.dims().to_nd_index());
    for coords in candidates {
        mine_mask[coords.to_nd_index()] = true;
    }

    let layout = MineLayout::from_mine_mask(mine_mask);
    log::debug!(
        "Placed {} mines on {}x{} board, safe start at {:?}",
        layout.mine_count(),
        size,
        size,
        safe
    );
    layout
}
