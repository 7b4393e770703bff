/// Tracks simulation time as a monotonic tick counter.
///
/// The counter is stamped into relation records as `last_updated`. Stopping
/// the scheduler resets it to zero.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    tick: u64,
}

impl SimClock {
    /// Create a new clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick. Returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Rewind to tick 0.
    pub fn reset(&mut self) {
        self.tick = 0;
    }
}
