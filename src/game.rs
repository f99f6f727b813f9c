use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::field::{Cell, Field, ItemKind};
use crate::hud::{ButtonIcon, GameView};
use crate::schedule::Schedule;

/// Countdown resolution
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Reason {
    Win,
    Lose,
    Cancel,
}

pub type StopListener = Box<dyn FnMut(Reason)>;

/// Collects the game settings and wires up a [`Game`]
#[derive(Debug, Clone, PartialEq)]
pub struct GameBuilder {
    game_duration: u32,
    clam_count: usize,
    crab_count: usize,
    columns: u16,
    seed: Option<u64>,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            game_duration: config.game_duration_secs,
            clam_count: config.clam_count,
            crab_count: config.crab_count,
            columns: config.columns,
            seed: None,
        }
    }

    pub fn with_game_duration(mut self, secs: u32) -> Self {
        self.game_duration = secs;
        self
    }

    pub fn with_clam_count(mut self, num: usize) -> Self {
        self.clam_count = num;
        self
    }

    pub fn with_crab_count(mut self, num: usize) -> Self {
        self.crab_count = num;
        self
    }

    pub fn with_columns(mut self, columns: u16) -> Self {
        self.columns = columns;
        self
    }

    /// Fixes the field layout sequence, mostly useful for tests
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build<V: GameView, S: Schedule>(self, view: V, schedule: S) -> Game<V, S> {
        let field = match self.seed {
            Some(seed) => Field::with_seed(self.clam_count, self.crab_count, self.columns, seed),
            None => Field::new(self.clam_count, self.crab_count, self.columns),
        };
        // the field may have clamped the counts; the target follows it
        Game::new(
            self.game_duration,
            field.clam_count(),
            field.crab_count(),
            field,
            view,
            schedule,
        )
    }
}

/// One clam-collecting round and everything it drives
pub struct Game<V: GameView, S: Schedule> {
    game_duration: u32,
    clam_count: usize,
    crab_count: usize,
    field: Field,
    view: V,
    schedule: S,
    started: bool,
    score: usize,
    remaining_secs: u32,
    on_stop: Option<StopListener>,
}

impl<V: GameView, S: Schedule> Game<V, S> {
    fn new(
        game_duration: u32,
        clam_count: usize,
        crab_count: usize,
        field: Field,
        mut view: V,
        schedule: S,
    ) -> Self {
        view.hide_timer_and_score();
        view.show_button(ButtonIcon::Play);

        Self {
            game_duration,
            clam_count,
            crab_count,
            field,
            view,
            schedule,
            started: false,
            score: 0,
            remaining_secs: game_duration,
            on_stop: None,
        }
    }

    /// Registers the outcome listener, replacing any previous one
    pub fn set_stop_listener<F>(&mut self, on_stop: F)
    where
        F: FnMut(Reason) + 'static,
    {
        self.on_stop = Some(Box::new(on_stop));
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Starts a run whose countdown is measured from `now`
    pub fn start_at(&mut self, now: Instant) {
        if self.started {
            warn!("start ignored, a run is already in progress");
            return;
        }

        self.started = true;
        self.score = 0;
        self.field.init();
        self.view.update_score(self.clam_count);
        self.view.show_button(ButtonIcon::Stop);
        self.view.show_timer_and_score();

        self.remaining_secs = self.game_duration;
        self.view.update_timer(self.remaining_secs);
        self.schedule.start(TICK_PERIOD, now);

        info!(
            duration = self.game_duration,
            clams = self.clam_count,
            crabs = self.crab_count,
            "game started"
        );
    }

    /// Tears the run down. Only a running game reports `reason`.
    pub fn stop(&mut self, reason: Reason) {
        let was_running = std::mem::replace(&mut self.started, false);
        self.schedule.cancel();
        self.view.hide_button();

        if !was_running {
            debug!(%reason, "stop on idle game, nothing to report");
            return;
        }

        info!(
            %reason,
            score = self.score,
            remaining_secs = self.remaining_secs,
            "game stopped"
        );
        if let Some(on_stop) = self.on_stop.as_mut() {
            on_stop(reason);
        }
    }

    pub fn on_item_click(&mut self, kind: ItemKind) {
        if !self.started {
            return;
        }

        match kind {
            ItemKind::Clam => {
                self.score = (self.score + 1).min(self.clam_count);
                self.view
                    .update_score(self.clam_count.saturating_sub(self.score));
                debug!(score = self.score, "clam collected");
                if self.score == self.clam_count {
                    self.stop(Reason::Win);
                }
            }
            ItemKind::Crab => {
                debug!("crab clicked");
                self.stop(Reason::Lose);
            }
        }
    }

    /// Resolves a click on a field slot and scores it. Returns what was hit.
    pub fn on_field_click(&mut self, cell: Cell) -> Option<ItemKind> {
        if !self.started {
            return None;
        }
        let kind = self.field.click(cell)?;
        self.on_item_click(kind);
        Some(kind)
    }

    pub fn on_tick(&mut self) {
        if !self.started {
            return;
        }

        if self.remaining_secs == 0 {
            let reason = if self.score == self.clam_count {
                Reason::Win
            } else {
                Reason::Lose
            };
            self.stop(reason);
            return;
        }

        self.remaining_secs -= 1;
        self.view.update_timer(self.remaining_secs);
    }

    /// Delivers every tick the schedule says is due at `now`
    pub fn poll_schedule(&mut self, now: Instant) {
        let due = self.schedule.poll(now);
        for _ in 0..due {
            if !self.started {
                break;
            }
            self.on_tick();
        }
    }

    pub fn on_button_click(&mut self) {
        if self.started {
            self.stop(Reason::Cancel);
        } else {
            self.start();
        }
    }

    pub fn is_running(&self) -> bool {
        self.started
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn game_duration(&self) -> u32 {
        self.game_duration
    }

    pub fn clam_count(&self) -> usize {
        self.clam_count
    }

    pub fn crab_count(&self) -> usize {
        self.crab_count
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn schedule(&self) -> &S {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut S {
        &mut self.schedule
    }
}
