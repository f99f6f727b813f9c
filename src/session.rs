use std::sync::mpsc::{self, Receiver, Sender};

use crate::game::Reason;

/// Outcome counts for this process. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub cancels: u32,
}

impl Tally {
    pub fn record(&mut self, reason: Reason) {
        match reason {
            Reason::Win => self.wins += 1,
            Reason::Lose => self.losses += 1,
            Reason::Cancel => self.cancels += 1,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.wins + self.losses + self.cancels
    }
}

impl std::fmt::Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "won {}  lost {}  cancelled {}",
            self.wins, self.losses, self.cancels
        )
    }
}

pub fn popup_message(reason: Reason) -> &'static str {
    match reason {
        Reason::Win => "YOU WON 🎉",
        Reason::Lose => "YOU LOST 💩",
        Reason::Cancel => "REPLAY ❓",
    }
}

/// Receiving end of the game's stop listener: result popup plus tally
#[derive(Debug)]
pub struct Session {
    tx: Sender<Reason>,
    rx: Receiver<Reason>,
    popup: Option<Reason>,
    tally: Tally,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            popup: None,
            tally: Tally::default(),
        }
    }

    /// Listener to hand to `Game::set_stop_listener`
    pub fn listener(&self) -> impl FnMut(Reason) + 'static {
        let tx = self.tx.clone();
        move |reason| {
            // receiver lives as long as the session; a send can only fail on shutdown
            let _ = tx.send(reason);
        }
    }

    /// Picks up reported outcomes. Returns how many arrived.
    pub fn drain(&mut self) -> usize {
        let mut received = 0;
        while let Ok(reason) = self.rx.try_recv() {
            self.tally.record(reason);
            self.popup = Some(reason);
            received += 1;
        }
        received
    }

    pub fn popup(&self) -> Option<Reason> {
        self.popup
    }

    pub fn dismiss_popup(&mut self) {
        self.popup = None;
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }
}
