use std::time::Duration;

use anyhow::{Result, bail};
use neonsweeper_core::*;
use serde::Serialize;

/// One decision of the automatic player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Opening click at the centre of the board.
    Opened(Coord2),
    /// A batch of certain moves, with how many took effect.
    Solved(usize),
    /// Nothing was certain, the least likely cell was revealed.
    Guessed(Coord2, u8),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub seed: u64,
    pub won: bool,
    pub score: Option<u32>,
    pub guesses: u32,
    pub moves: u32,
}

/// Plays one seeded game to the end, calling `observe` after every step.
pub fn play_game(
    settings: SessionConfig,
    seed: u64,
    move_time: Duration,
    mut observe: impl FnMut(&Session, Step),
) -> Result<GameRecord> {
    let clock = ManualClock::new();
    let mut session = Session::new(settings)?
        .with_generator(ShuffleGenerator::from_seed(seed))
        .with_clock(clock.clone());

    let size = settings.game.size;
    let centre = (size / 2, size / 2);
    session.reveal(centre)?;
    observe(&session, Step::Opened(centre));
    session.toggle_assistant();

    let mut guesses = 0;
    let mut moves = 1;
    while session.state().is_active() {
        clock.advance(move_time);
        session.recompute_probabilities();

        let step = match session.auto_solve() {
            AutoSolveOutcome::Queued(count) if count > 0 => {
                let applied = session.drain()?;
                moves += applied as u32;
                Step::Solved(applied)
            }
            _ => {
                let Some(coords) = best_guess(session.probabilities()) else {
                    bail!("no cell left to guess on an active board (seed {seed})");
                };
                let likelihood = session.probabilities().get(coords).unwrap_or_default();
                session.reveal(coords)?;
                guesses += 1;
                moves += 1;
                Step::Guessed(coords, likelihood)
            }
        };
        observe(&session, step);
    }

    log::debug!(
        "Game {} ended {:?} after {} moves, {} guesses",
        seed,
        session.state(),
        moves,
        guesses
    );
    Ok(GameRecord {
        seed,
        won: session.state() == GameState::Victory,
        score: session.score(),
        guesses,
        moves,
    })
}

/// Aggregate over a batch of simulated games.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    /// Mean score over won games.
    pub mean_score: f64,
    pub mean_guesses: f64,
}

impl Report {
    pub fn from_records(records: &[GameRecord]) -> Self {
        let games = records.len() as u32;
        let wins = records.iter().filter(|record| record.won).count() as u32;
        let scores: Vec<u64> = records
            .iter()
            .filter_map(|record| record.score.map(u64::from))
            .collect();
        let guesses: u64 = records.iter().map(|record| u64::from(record.guesses)).sum();

        Self {
            games,
            wins,
            losses: games - wins,
            win_rate: ratio(u64::from(wins), u64::from(games)),
            mean_score: ratio(scores.iter().sum(), scores.len() as u64),
            mean_guesses: ratio(guesses, u64::from(games)),
        }
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
