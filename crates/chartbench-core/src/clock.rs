use std::cell::Cell;
use std::time::{Duration, SystemTime};

/// Wall-clock source for metric timestamps.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to; every `now()` advances it by `step`.
#[derive(Debug)]
pub struct ManualClock {
    current: Cell<SystemTime>,
    step: Duration,
}

impl ManualClock {
    pub fn new(start: SystemTime, step: Duration) -> Self {
        Self {
            current: Cell::new(start),
            step,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }

    pub fn peek(&self) -> SystemTime {
        self.current.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        let now = self.current.get();
        self.current.set(now + self.step);
        now
    }
}
