use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How equipment changes hands when a country is annihilated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LootPolicy {
    /// The winner's counts are replaced by the loser's, field by field.
    #[default]
    Overwrite,
    /// The loser's counts are added to the winner's.
    Add,
}

impl fmt::Display for LootPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Add => write!(f, "add"),
        }
    }
}

impl FromStr for LootPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "add" => Ok(Self::Add),
            other => Err(format!("unknown loot policy: {other} (expected add or overwrite)")),
        }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for reproducible runs.
    pub seed: u64,
    /// Wall-clock period between scheduled ticks.
    pub tick_interval: Duration,
    /// Ceiling on units of a single equipment kind produced per country per tick.
    pub max_units_per_tick: u32,
    /// Equipment transfer rule on annihilation.
    pub loot_policy: LootPolicy,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited
    /// for headless runs; a [`Scheduler`](crate::Scheduler) bounds it instead.
    pub max_events: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_interval: Duration::from_millis(200),
            max_units_per_tick: 10,
            loot_policy: LootPolicy::Overwrite,
            max_events: 0,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the wall-clock tick period.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the per-kind production ceiling.
    pub fn with_max_units_per_tick(mut self, units: u32) -> Self {
        self.max_units_per_tick = units;
        self
    }

    /// Set the annihilation loot policy.
    pub fn with_loot_policy(mut self, policy: LootPolicy) -> Self {
        self.loot_policy = policy;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}
