use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::*;

/// Session settings, loadable from partial config files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub game: GameConfig,
    /// Minimum time between two throttled probability recomputes.
    pub recompute_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            recompute_interval_ms: 100,
        }
    }
}

impl SessionConfig {
    pub fn recompute_interval(&self) -> Duration {
        Duration::from_millis(self.recompute_interval_ms)
    }
}

/// Rate limiter for probability recomputes: at most one per interval and
/// never while one is still in flight.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
    last_start: Option<Duration>,
    in_flight: bool,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_start: None,
            in_flight: false,
        }
    }

    /// Claims a recompute slot at `now`, `false` if it must be skipped.
    pub fn try_begin(&mut self, now: Duration) -> bool {
        if self.in_flight {
            return false;
        }
        if let Some(last) = self.last_start {
            if now.saturating_sub(last) < self.interval {
                return false;
            }
        }
        self.last_start = Some(now);
        self.in_flight = true;
        true
    }

    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn reset(&mut self) {
        self.last_start = None;
        self.in_flight = false;
    }
}

/// Score for a won game: a time bonus worth up to 1000 points plus ten points
/// per percent of assistant confidence.
pub fn victory_score(elapsed: Duration, confidence: u8) -> u32 {
    let time_bonus = (1000.0 - elapsed.as_secs_f64()).max(0.0);
    (time_bonus + f64::from(confidence) * 10.0).round() as u32
}

/// One game at a time: the board, the assistant's probability map, pending
/// auto-solve moves and the collaborators supplied by the presentation layer.
pub struct Session {
    config: SessionConfig,
    board: Board,
    generator: Box<dyn LayoutGenerator>,
    clock: Box<dyn Clock>,
    sink: Box<dyn EventSink>,
    assistant: bool,
    probabilities: ProbabilityMap,
    throttle: Throttle,
    recompute_pending: bool,
    moves: VecDeque<Move>,
    started_at: Option<Duration>,
    finished_at: Option<Duration>,
    score: Option<u32>,
    generation: u64,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("state", &self.board.state())
            .field("assistant", &self.assistant)
            .field("generation", &self.generation)
            .field("pending_moves", &self.moves.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Standby session with an entropy-seeded generator, the system clock and
    /// no event sink.
    pub fn new(config: SessionConfig) -> Result<Self> {
        Ok(Self {
            config,
            board: Board::new(config.game)?,
            generator: Box::new(ShuffleGenerator::from_entropy()),
            clock: Box::new(SystemClock::new()),
            sink: Box::new(NullSink),
            assistant: false,
            probabilities: ProbabilityMap::default(),
            throttle: Throttle::new(config.recompute_interval()),
            recompute_pending: false,
            moves: VecDeque::new(),
            started_at: None,
            finished_at: None,
            score: None,
            generation: 0,
        })
    }

    pub fn with_generator(mut self, generator: impl LayoutGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Discards the current game and starts a fresh board in standby.
    ///
    /// Pending auto-solve moves and throttled recomputes of the old game are
    /// dropped.
    pub fn new_game(&mut self, game: GameConfig) -> Result<()> {
        self.board = Board::new(game)?;
        self.config.game = game;
        self.assistant = false;
        self.probabilities = ProbabilityMap::default();
        self.throttle.reset();
        self.recompute_pending = false;
        self.moves.clear();
        self.started_at = None;
        self.finished_at = None;
        self.score = None;
        self.generation += 1;
        log::debug!(
            "New game {}: {}x{} with {} mines",
            self.generation,
            game.size,
            game.size,
            game.mines
        );
        Ok(())
    }

    /// New game with the current configuration.
    pub fn reset(&mut self) -> Result<()> {
        self.new_game(self.config.game)
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.board.state()
    }

    /// Counter bumped by every new game; deferred work tagged with an older
    /// value belongs to a discarded board.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn assistant_enabled(&self) -> bool {
        self.assistant
    }

    pub fn probabilities(&self) -> &ProbabilityMap {
        &self.probabilities
    }

    pub fn is_recompute_pending(&self) -> bool {
        self.recompute_pending
    }

    pub fn pending_moves(&self) -> usize {
        self.moves.len()
    }

    /// Score of a won game.
    pub fn score(&self) -> Option<u32> {
        self.score
    }

    /// Time since the first reveal, frozen once the game ends.
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            None => Duration::ZERO,
            Some(start) => self
                .finished_at
                .unwrap_or_else(|| self.clock.now())
                .saturating_sub(start),
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let report = self.board.reveal(coords, &mut *self.generator)?;
        if !report.outcome.has_update() {
            return Ok(report);
        }

        if report.started {
            self.started_at = Some(self.clock.now());
            self.sink.notify(GameEvent::Started);
        }
        self.sink.notify(GameEvent::Revealed {
            cells: report.cells.clone(),
        });

        match report.outcome {
            RevealOutcome::HitMine => {
                self.finish();
                self.sink.notify(GameEvent::GameOver { mine: coords });
            }
            RevealOutcome::Won => {
                self.finish();
                let elapsed = self.elapsed();
                let score = victory_score(elapsed, self.probabilities.confidence());
                self.score = Some(score);
                log::debug!("Won in {:?}, score {}", elapsed, score);
                self.sink.notify(GameEvent::Victory { score, elapsed });
            }
            RevealOutcome::Revealed | RevealOutcome::NoChange => {}
        }

        self.request_recompute();
        Ok(report)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagReport> {
        let report = self.board.toggle_flag(coords)?;
        if report.outcome.has_update() {
            self.sink.notify(GameEvent::Flagged {
                coords: report.coords,
                flagged: report.flagged,
            });
            self.request_recompute();
        }
        Ok(report)
    }

    /// Switches the assistant on or off. Only allowed while the game runs;
    /// switching on analyzes the board right away, switching off forgets the
    /// map.
    pub fn toggle_assistant(&mut self) -> MarkOutcome {
        if !self.board.state().is_active() {
            log::debug!("Assistant needs an active game");
            return MarkOutcome::NoChange;
        }

        self.assistant = !self.assistant;
        if self.assistant {
            self.recompute_probabilities();
        } else {
            self.probabilities = ProbabilityMap::default();
            self.recompute_pending = false;
            self.throttle.finish();
        }
        log::debug!("Assistant enabled: {}", self.assistant);
        MarkOutcome::Changed
    }

    /// Recomputes the probability map now, bypassing the throttle.
    ///
    /// The result is kept as the session's map only while the assistant is
    /// on; otherwise it is a detached snapshot.
    pub fn recompute_probabilities(&mut self) -> ProbabilityMap {
        if !self.assistant {
            return infer(&Observation::from_board(&self.board));
        }
        let now = self.clock.now();
        self.throttle.reset();
        self.throttle.try_begin(now);
        self.run_recompute();
        self.probabilities.clone()
    }

    /// Schedules a recompute after a board change, unless one ran within the
    /// configured interval or one is already scheduled. Returns whether it
    /// was scheduled.
    pub fn request_recompute(&mut self) -> bool {
        if !self.assistant || self.board.is_finished() {
            return false;
        }
        if self.throttle.try_begin(self.clock.now()) {
            self.recompute_pending = true;
            true
        } else {
            log::trace!("Recompute throttled");
            false
        }
    }

    /// Runs the scheduled recompute, if any. Meant to be called once per
    /// frame by the presentation layer.
    pub fn tick(&mut self) -> bool {
        if !self.recompute_pending {
            return false;
        }
        self.run_recompute();
        true
    }

    fn run_recompute(&mut self) {
        self.probabilities = infer(&Observation::from_board(&self.board));
        self.recompute_pending = false;
        self.throttle.finish();
    }

    /// Full analysis of the current board, independent of the assistant
    /// toggle. `None` unless the game is running.
    pub fn analyze(&mut self) -> Option<AnalysisSummary> {
        if !self.board.state().is_active() {
            return None;
        }
        Some(self.recompute_probabilities().summary())
    }

    /// Map entries whose cells are still hidden and unflagged.
    fn current_probabilities(&self) -> ProbabilityMap {
        let cells = self.board.cells();
        self.probabilities
            .restricted_to(|coords| cells[coords.to_nd_index()].is_open())
    }

    fn advice_applicable(&self) -> bool {
        self.assistant && self.board.state().is_active() && !self.probabilities.is_empty()
    }

    pub fn hint(&self) -> HintOutcome {
        if !self.advice_applicable() {
            return HintOutcome::NotApplicable;
        }
        hint(&self.current_probabilities())
    }

    /// Queues every certain move: reveals first, then flags. Replaces any
    /// moves still queued from an earlier call.
    pub fn auto_solve(&mut self) -> AutoSolveOutcome {
        if !self.advice_applicable() {
            return AutoSolveOutcome::NotApplicable;
        }
        let moves = auto_solve_moves(&self.current_probabilities());
        log::debug!("Auto-solve queued {} moves", moves.len());
        self.moves = moves.into();
        AutoSolveOutcome::Queued(self.moves.len())
    }

    /// Applies the next queued move whose cell is still hidden and unflagged.
    pub fn step(&mut self) -> Result<Option<Move>> {
        while let Some(next) = self.moves.pop_front() {
            if self.board.is_finished() {
                self.moves.clear();
                break;
            }
            if !self.board.cell_at(next.coords())?.is_open() {
                continue;
            }
            match next {
                Move::Reveal(coords) => {
                    self.reveal(coords)?;
                }
                Move::Flag(coords) => {
                    self.toggle_flag(coords)?;
                }
            }
            return Ok(Some(next));
        }
        Ok(None)
    }

    /// Applies every queued move, returning how many took effect.
    pub fn drain(&mut self) -> Result<usize> {
        let mut applied = 0;
        while self.step()?.is_some() {
            applied += 1;
        }
        Ok(applied)
    }

    fn finish(&mut self) {
        self.finished_at = Some(self.clock.now());
        self.moves.clear();
        self.recompute_pending = false;
        self.throttle.finish();
    }
}
