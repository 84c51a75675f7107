use std::time::{Duration, Instant};

pub const TIMER_DEC_PER_SECOND: u64 = 60;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn get(&self) -> u8 {
        self.count
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }

    /// One 60 Hz period has elapsed.
    pub fn tick(&mut self) {
        self.count = self.count.saturating_sub(1);
    }
}

/// Wall clock pacing for the 60 Hz timer hook. Instruction execution never
/// drives it.
#[derive(Debug)]
pub struct TimerClock {
    period: Duration,
    last_updated: Instant,
}

impl TimerClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            period: Duration::from_nanos(1_000_000_000 / TIMER_DEC_PER_SECOND),
            last_updated: now,
        }
    }

    /// Number of whole periods due at `now`; the remainder carries over.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last_updated);
        let ticks = (elapsed.as_nanos() / self.period.as_nanos()) as u32;
        self.last_updated += self.period * ticks;
        ticks
    }

    pub fn poll(&mut self) -> u32 {
        self.due_ticks(Instant::now())
    }
}

impl Default for TimerClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_saturates_at_zero() {
        let mut timer = Timer::new(2);
        assert!(timer.is_active());
        timer.tick();
        timer.tick();
        timer.tick();
        assert_eq!(timer.get(), 0);
        assert!(!timer.is_active());
    }

    #[test]
    fn clock_counts_whole_periods() {
        let start = Instant::now();
        let mut clock = TimerClock::starting_at(start);
        let period = Duration::from_nanos(1_000_000_000 / TIMER_DEC_PER_SECOND);
        assert_eq!(clock.due_ticks(start), 0);
        assert_eq!(clock.due_ticks(start + period / 2), 0);
        assert_eq!(clock.due_ticks(start + period * 3 + period / 2), 3);
        // the half period left over is not lost
        assert_eq!(clock.due_ticks(start + period * 4), 1);
    }
}
