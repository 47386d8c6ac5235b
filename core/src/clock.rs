use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use time::{Date, OffsetDateTime};
use web_time::Instant;

/// Time source for timers and the daily cap.
pub trait Clock {
    /// Monotonic time since an arbitrary, clock-specific origin.
    fn now(&self) -> Duration;

    /// Current calendar day.
    fn today(&self) -> Date;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn today(&self) -> Date {
        (**self).today()
    }
}

/// Wall clock; calendar days roll over at UTC midnight.
#[derive(Copy, Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }
}

/// Virtual clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
    today: Rc<Cell<Date>>,
}

impl ManualClock {
    pub fn new(today: Date) -> Self {
        Self {
            now: Rc::new(Cell::new(Duration::ZERO)),
            today: Rc::new(Cell::new(today)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    /// Moves to the next calendar day without touching monotonic time.
    pub fn next_day(&self) {
        if let Some(next) = self.today.get().next_day() {
            self.today.set(next);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn today(&self) -> Date {
        self.today.get()
    }
}
