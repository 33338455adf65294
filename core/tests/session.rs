use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use neonsweeper_core::*;

/// Row 0 is mined except the corner (0,9), which is boxed in by (1,8) and
/// (1,9). Row 1 has mines in columns 0-3. Opening the centre floods every
/// other safe cell.
const POCKET_MINES: [Coord2; 15] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (0, 5),
    (0, 6),
    (0, 7),
    (0, 8),
    (1, 0),
    (1, 1),
    (1, 2),
    (1, 3),
    (1, 8),
    (1, 9),
];

fn session_with(
    size: Coord,
    mines: &[Coord2],
) -> (Session, ManualClock, Receiver<GameEvent>) {
    let generator = FixedLayoutGenerator::from_mine_coords(size, mines).unwrap();
    let config = SessionConfig {
        game: GameConfig::new(size, mines.len() as CellCount).unwrap(),
        recompute_interval_ms: 100,
    };
    let clock = ManualClock::new();
    let (tx, rx) = mpsc::channel();
    let session = Session::new(config)
        .unwrap()
        .with_generator(generator)
        .with_clock(clock.clone())
        .with_sink(tx);
    (session, clock, rx)
}

fn drain_events(rx: &Receiver<GameEvent>) -> Vec<GameEvent> {
    rx.try_iter().collect()
}

#[test]
fn opening_click_floods_default_board() {
    let (mut session, _, rx) = session_with(10, &POCKET_MINES);
    assert_eq!(session.state(), GameState::Standby);

    let report = session.reveal((5, 5)).unwrap();

    assert_eq!(report.outcome, RevealOutcome::Revealed);
    assert!(report.started);
    assert_eq!(report.cells[0], (5, 5));
    assert_eq!(report.cells.len(), 84);
    assert_eq!(session.state(), GameState::Active);
    assert_eq!(session.board().revealed_count(), 84);
    assert_eq!(session.board().cell_at((0, 9)), Ok(CellState::Hidden));
    assert_eq!(session.board().cell_at((1, 4)), Ok(CellState::Revealed(4)));

    let events = drain_events(&rx);
    assert_eq!(
        events,
        vec![
            GameEvent::Started,
            GameEvent::Revealed {
                cells: report.cells.clone()
            },
        ]
    );
}

#[test]
fn clearing_the_pocket_wins_with_time_score() {
    let (mut session, clock, rx) = session_with(10, &POCKET_MINES);
    session.reveal((5, 5)).unwrap();
    clock.advance(Duration::from_secs(20));
    drain_events(&rx);

    let report = session.reveal((0, 9)).unwrap();

    assert_eq!(report.outcome, RevealOutcome::Won);
    assert_eq!(session.state(), GameState::Victory);
    assert_eq!(session.score(), Some(980));
    assert_eq!(
        drain_events(&rx),
        vec![
            GameEvent::Revealed {
                cells: vec![(0, 9)]
            },
            GameEvent::Victory {
                score: 980,
                elapsed: Duration::from_secs(20),
            },
        ]
    );

    // Finished boards ignore input and stay quiet.
    assert_eq!(
        session.toggle_flag((0, 0)).unwrap().outcome,
        MarkOutcome::NoChange
    );
    assert_eq!(
        session.reveal((0, 0)).unwrap().outcome,
        RevealOutcome::NoChange
    );
    assert!(drain_events(&rx).is_empty());
}

#[test]
fn one_notification_per_transition() {
    let (mut session, _, rx) = session_with(4, &[(0, 0), (3, 3)]);

    session.toggle_flag((2, 2)).unwrap();
    session.reveal((0, 1)).unwrap();
    session.reveal((0, 1)).unwrap();
    session.toggle_flag((0, 1)).unwrap();
    session.toggle_flag((2, 2)).unwrap();
    session.reveal((0, 0)).unwrap();

    assert_eq!(
        drain_events(&rx),
        vec![
            GameEvent::Flagged {
                coords: (2, 2),
                flagged: true
            },
            GameEvent::Started,
            GameEvent::Revealed {
                cells: vec![(0, 1)]
            },
            GameEvent::Flagged {
                coords: (2, 2),
                flagged: false
            },
            GameEvent::Revealed {
                cells: vec![(0, 0)]
            },
            GameEvent::GameOver { mine: (0, 0) },
        ]
    );
    assert_eq!(session.board().triggered_mine(), Some((0, 0)));
    assert_eq!(
        session.board().cell_at((0, 0)),
        Ok(CellState::Detonated)
    );
}

#[test]
fn rapid_changes_share_one_recompute() {
    let (mut session, clock, _rx) = session_with(4, &[(0, 0), (3, 3)]);
    session.reveal((0, 1)).unwrap();
    session.toggle_assistant();
    clock.advance(Duration::from_millis(200));

    let mut recomputes = 0;
    for coords in [(2, 0), (2, 1), (2, 2), (2, 3)] {
        session.toggle_flag(coords).unwrap();
        if session.tick() {
            recomputes += 1;
        }
        clock.advance(Duration::from_millis(10));
    }
    assert_eq!(recomputes, 1);

    // Once the interval has passed the next change is picked up again.
    clock.advance(Duration::from_millis(100));
    session.toggle_flag((3, 0)).unwrap();
    assert!(session.tick());
    assert_eq!(session.probabilities().get((3, 0)), None);
    assert_eq!(session.probabilities().get((2, 3)), None);
}

#[test]
fn auto_solve_stops_at_victory() {
    let (mut session, _, rx) = session_with(4, &[(0, 0), (0, 3)]);
    session.reveal((3, 0)).unwrap();
    session.reveal((0, 1)).unwrap();
    session.toggle_flag((0, 3)).unwrap();
    assert_eq!(session.toggle_assistant(), MarkOutcome::Changed);
    assert_eq!(session.hint(), HintOutcome::Safe((0, 2)));
    drain_events(&rx);

    assert_eq!(session.auto_solve(), AutoSolveOutcome::Queued(2));
    assert_eq!(session.drain(), Ok(1));

    assert_eq!(session.state(), GameState::Victory);
    assert_eq!(session.pending_moves(), 0);
    // Both remaining cells were certain when the game was won.
    assert_eq!(session.score(), Some(2000));
    let events = drain_events(&rx);
    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], GameEvent::Victory { score: 2000, .. }));
}

#[test]
fn new_game_cancels_queued_moves() {
    let (mut session, _, rx) = session_with(4, &[(0, 0), (0, 3)]);
    session.reveal((3, 0)).unwrap();
    session.reveal((0, 1)).unwrap();
    session.toggle_flag((0, 3)).unwrap();
    session.toggle_assistant();
    session.auto_solve();
    assert_eq!(session.pending_moves(), 2);
    drain_events(&rx);

    session.new_game(GameConfig::new(5, 3).unwrap()).unwrap();

    assert_eq!(session.drain(), Ok(0));
    assert!(drain_events(&rx).is_empty());
    assert_eq!(session.board().size(), 5);
    assert_eq!(session.board().revealed_count(), 0);
    assert!(session.probabilities().is_empty());
    assert_eq!(session.hint(), HintOutcome::NotApplicable);
}

#[test]
fn analyze_reports_certain_cells() {
    let (mut session, _, _rx) = session_with(4, &[(0, 0), (0, 3)]);
    assert_eq!(session.analyze(), None);
    session.reveal((3, 0)).unwrap();
    session.reveal((0, 1)).unwrap();
    session.toggle_flag((0, 3)).unwrap();

    let summary = session.analyze().unwrap();

    assert_eq!(
        summary,
        AnalysisSummary {
            safe: 1,
            mines: 1,
            uncertain: 0,
            confidence: 100,
        }
    );
    assert_eq!(summary.recommendation(), Recommendation::ClearSafeCells);
    assert!(!session.assistant_enabled());
}

#[test]
fn shuffled_games_never_open_on_a_mine() {
    for seed in 0..32 {
        let config = SessionConfig::default();
        let mut session = Session::new(config)
            .unwrap()
            .with_generator(ShuffleGenerator::from_seed(seed));

        let report = session.reveal((5, 5)).unwrap();

        assert_ne!(report.outcome, RevealOutcome::HitMine, "seed {seed}");
        assert_eq!(session.board().total_mines(), 15);
        assert_eq!(session.board().has_mine_at((5, 5)), Ok(Some(false)));
    }
}
