use std::time::{Duration, Instant};

pub const TIMER_DEC_PER_SECOND: u32 = 60;

/// Delay and sound counters, both decremented once per 60Hz tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self { delay: 0, sound: 0 }
    }

    /// Returns whether the tone should be sounding after this tick.
    pub fn tick(&mut self) -> bool {
        if self.delay > 0 {
            self.delay -= 1;
        }
        if self.sound > 0 {
            self.sound -= 1;
        }
        self.tone_active()
    }

    pub fn tone_active(&self) -> bool {
        self.sound > 0
    }
}

/// Turns wall-clock time into a count of 60Hz ticks, independent of how many
/// instructions ran in between.
#[derive(Debug)]
pub struct TickClock {
    period: Duration,
    pending: Duration,
    last_updated: Instant,
}

impl TickClock {
    pub fn new() -> Self {
        Self::with_rate(TIMER_DEC_PER_SECOND)
    }

    pub fn with_rate(hz: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / hz.max(1),
            pending: Duration::ZERO,
            last_updated: Instant::now(),
        }
    }

    /// Ticks due since the previous call.
    pub fn sync(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_updated);
        self.last_updated = now;
        self.advance(elapsed)
    }

    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.pending += elapsed;
        let mut due = 0;
        while self.pending >= self.period {
            self.pending -= self.period;
            due += 1;
        }
        due
    }

    // pausing must not bank ticks
    pub fn restart(&mut self) {
        self.pending = Duration::ZERO;
        self.last_updated = Instant::now();
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
