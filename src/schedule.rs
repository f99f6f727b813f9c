use std::time::{Duration, Instant};

/// Periodic timer capability handed to the game.
///
/// The game arms it on start and cancels it on every stop path. The event
/// loop asks it, via [`Schedule::poll`], how many periods have gone by.
pub trait Schedule {
    /// Arms the schedule; the first period ends at `now + period`
    fn start(&mut self, period: Duration, now: Instant);
    fn cancel(&mut self);
    fn is_armed(&self) -> bool;
    /// Number of whole periods elapsed since the last poll (or since start).
    /// Always zero while cancelled.
    fn poll(&mut self, now: Instant) -> u32;
}

/// Wall-clock schedule backed by a monotonic deadline
#[derive(Debug, Default)]
pub struct IntervalSchedule {
    armed: Option<Armed>,
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    period: Duration,
    next_deadline: Instant,
}

impl IntervalSchedule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Schedule for IntervalSchedule {
    fn start(&mut self, period: Duration, now: Instant) {
        self.armed = Some(Armed {
            period,
            next_deadline: now + period,
        });
    }

    fn cancel(&mut self) {
        self.armed = None;
    }

    fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    fn poll(&mut self, now: Instant) -> u32 {
        let Some(armed) = self.armed.as_mut() else {
            return 0;
        };
        if armed.period.is_zero() {
            return 0;
        }

        let mut fired = 0;
        // catch up if the loop stalled for more than one period
        while now >= armed.next_deadline {
            armed.next_deadline += armed.period;
            fired += 1;
        }
        fired
    }
}

/// Schedule that only fires when told to. Used for headless runs and tests.
#[derive(Debug, Default)]
pub struct ManualSchedule {
    period: Option<Duration>,
    pending: u32,
}

impl ManualSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `n` elapsed periods. Ignored while cancelled.
    pub fn fire(&mut self, n: u32) {
        if self.period.is_some() {
            self.pending += n;
        }
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Schedule for ManualSchedule {
    fn start(&mut self, period: Duration, _now: Instant) {
        self.period = Some(period);
        self.pending = 0;
    }

    fn cancel(&mut self) {
        self.period = None;
        self.pending = 0;
    }

    fn is_armed(&self) -> bool {
        self.period.is_some()
    }

    fn poll(&mut self, _now: Instant) -> u32 {
        std::mem::take(&mut self.pending)
    }
}
