use std::sync::mpsc::Sender;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::*;

/// Notification sent to the presentation layer after a board change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// First reveal placed the mines, the game is running.
    Started,
    /// Cells opened by a single reveal, flood-fill included.
    Revealed { cells: Vec<Coord2> },
    Flagged { coords: Coord2, flagged: bool },
    GameOver { mine: Coord2 },
    Victory { score: u32, elapsed: Duration },
}

/// Receiver of [`GameEvent`]s.
pub trait EventSink {
    fn notify(&mut self, event: GameEvent);
}

/// Drops every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&mut self, _event: GameEvent) {}
}

impl EventSink for Vec<GameEvent> {
    fn notify(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl EventSink for Sender<GameEvent> {
    fn notify(&mut self, event: GameEvent) {
        if self.send(event).is_err() {
            log::trace!("Event receiver dropped");
        }
    }
}

/// Adapts a closure into an [`EventSink`].
pub struct FnSink<F>(pub F);

impl<F: FnMut(GameEvent)> EventSink for FnSink<F> {
    fn notify(&mut self, event: GameEvent) {
        (self.0)(event)
    }
}
