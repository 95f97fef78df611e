use std::time::Duration;

/// Waits between field words so the receiver can process each byte.
pub trait Pacer {
    /// Called once after every field word is written.
    fn pause(&mut self);
}

/// Blocks the current thread for a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepPacer {
    interval: Duration,
}

impl SleepPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Pacer for SleepPacer {
    fn pause(&mut self) {
        if !self.interval.is_zero() {
            std::thread::sleep(self.interval);
        }
    }
}

/// Never waits. For capture files and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&mut self) {}
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn pause(&mut self) {
        (**self).pause();
    }
}
