use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rp_core::CountryId;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::error::SimResult;
use crate::simulation::Simulation;

/// Event log bound applied by [`Scheduler::new`] when the config leaves the
/// log unlimited. A running scheduler never stops on its own.
pub const DEFAULT_LIVE_EVENTS: usize = 1_000;

/// Whether the scheduler is currently firing ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No timer is armed.
    Stopped,
    /// Ticks fire every interval.
    Running,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Running => write!(f, "running"),
        }
    }
}

/// Drives a [`Simulation`] on a wall-clock interval.
///
/// The simulation sits behind an async mutex shared by the tick task and the
/// admin methods, so a tick and an admin action never interleave. Ticks that
/// fall behind are skipped rather than queued.
pub struct Scheduler {
    sim: Arc<Mutex<Simulation>>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("interval", &self.interval)
            .field("state", &self.state())
            .finish()
    }
}

impl Scheduler {
    /// Wrap a simulation. The tick period comes from its config. An unlimited
    /// event log is bounded to [`DEFAULT_LIVE_EVENTS`].
    pub fn new(mut sim: Simulation) -> Self {
        if sim.config().max_events == 0 {
            sim.set_max_events(DEFAULT_LIVE_EVENTS);
        }
        // A zero period would make the timer panic.
        let interval = sim.config().tick_interval.max(Duration::from_millis(1));
        Self {
            sim: Arc::new(Mutex::new(sim)),
            interval,
            task: None,
        }
    }

    /// Shared handle to the simulation, for read access between ticks.
    pub fn simulation(&self) -> Arc<Mutex<Simulation>> {
        Arc::clone(&self.sim)
    }

    /// Tick period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the tick task is alive.
    pub fn state(&self) -> SchedulerState {
        match &self.task {
            Some(task) if !task.is_finished() => SchedulerState::Running,
            _ => SchedulerState::Stopped,
        }
    }

    /// Shorthand for `state() == Running`.
    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Arm the timer. Does nothing if already running. Must be called from
    /// within a Tokio runtime.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        let sim = Arc::clone(&self.sim);
        let period = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut timer = time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of an interval completes immediately.
            timer.tick().await;
            loop {
                timer.tick().await;
                let mut sim = sim.lock().await;
                if let Err(e) = sim.tick() {
                    tracing::error!(error = %e, tick = sim.current_tick(), "tick failed");
                }
            }
        }));
        tracing::info!(interval_ms = period.as_millis() as u64, "simulation started");
        true
    }

    /// Cancel the timer and rewind the tick counter to 0. Countries are left
    /// as they are.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // Cancellation surfaces as a JoinError; nothing to report.
            let _ = task.await;
            tracing::info!("simulation stopped");
        }
        self.sim.lock().await.reset_clock();
    }

    /// Replace all countries with `count` new ones.
    pub async fn generate(&self, count: usize) -> SimResult<()> {
        self.sim
            .lock()
            .await
            .generate(count)
            .inspect_err(|e| tracing::warn!(count, error = %e, "generate rejected"))
    }

    /// Credit a country's treasury. Returns the new balance.
    pub async fn add_funds(&self, id: CountryId, amount: f64) -> SimResult<f64> {
        self.sim
            .lock()
            .await
            .add_funds(id, amount)
            .inspect_err(|e| tracing::warn!(%id, amount, error = %e, "add_funds rejected"))
    }

    /// Force a war between two countries.
    pub async fn declare_war(&self, attacker: CountryId, defender: CountryId) -> SimResult<()> {
        self.sim
            .lock()
            .await
            .declare_war(attacker, defender)
            .inspect_err(|e| tracing::warn!(%attacker, %defender, error = %e, "declare_war rejected"))
    }

    /// Tick counter of the shared simulation.
    pub async fn current_tick(&self) -> u64 {
        self.sim.lock().await.current_tick()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::error::SimError;

    fn scheduler(countries: usize) -> Scheduler {
        let mut sim = Simulation::new(SimConfig::default().with_seed(5));
        sim.generate(countries).unwrap();
        Scheduler::new(sim)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_fire_on_the_interval() {
        let mut sched = scheduler(3);
        assert_eq!(sched.state(), SchedulerState::Stopped);
        assert!(sched.start());
        assert_eq!(sched.state(), SchedulerState::Running);

        time::sleep(Duration::from_millis(1_100)).await;
        let ticks = sched.current_tick().await;
        assert!((4..=6).contains(&ticks), "ticks = {ticks}");
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent() {
        let mut sched = scheduler(2);
        assert!(sched.start());
        assert!(!sched.start());
        time::sleep(Duration::from_millis(1_100)).await;
        let ticks = sched.current_tick().await;
        assert!(ticks <= 6, "double timer would give ~10, got {ticks}");
    }

    #[tokio::test(start_paused = true)]
    async fn stop_resets_clock_and_halts_ticks() {
        let mut sched = scheduler(3);
        sched.start();
        time::sleep(Duration::from_millis(700)).await;
        assert!(sched.current_tick().await > 0);

        sched.stop().await;
        assert_eq!(sched.state(), SchedulerState::Stopped);
        assert_eq!(sched.current_tick().await, 0);

        time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(sched.current_tick().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_without_start_changes_nothing() {
        let mut sched = scheduler(5);
        let before: Vec<f64> = {
            let sim = sched.simulation();
            let sim = sim.lock().await;
            sim.store().iter().map(|c| c.economy).collect()
        };

        sched.stop().await;
        time::sleep(Duration::from_millis(1_000)).await;

        let sim = sched.simulation();
        let sim = sim.lock().await;
        let after: Vec<f64> = sim.store().iter().map(|c| c.economy).collect();
        assert_eq!(before, after);
        assert_eq!(sim.current_tick(), 0);
    }

    #[tokio::test]
    async fn admin_actions_go_through_the_lock() {
        let sched = scheduler(2);
        let (a, b) = {
            let sim = sched.simulation();
            let sim = sim.lock().await;
            let ids = sim.store().ids();
            (ids[0], ids[1])
        };

        let before = sched.simulation().lock().await.country(a).unwrap().economy;
        assert_eq!(sched.add_funds(a, 500.0).await.unwrap(), before + 500.0);
        assert!(matches!(
            sched.add_funds(a, f64::INFINITY).await,
            Err(SimError::InvalidAmount(_))
        ));

        sched.declare_war(a, b).await.unwrap();
        assert!(sched.declare_war(b, a).await.is_err());
        assert!(sched.generate(0).await.is_err());
    }

    #[test]
    fn unlimited_event_log_is_bounded() {
        let sched = Scheduler::new(Simulation::new(SimConfig::default()));
        let sim = sched.simulation();
        let sim = sim.try_lock().unwrap();
        assert_eq!(sim.config().max_events, DEFAULT_LIVE_EVENTS);
        assert_eq!(sim.events().max_events(), DEFAULT_LIVE_EVENTS);

        let sched = Scheduler::new(Simulation::new(SimConfig::default().with_max_events(50)));
        let sim = sched.simulation();
        assert_eq!(sim.try_lock().unwrap().events().max_events(), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn long_runs_keep_the_log_bounded() {
        let mut sim = Simulation::new(SimConfig::default().with_seed(3));
        sim.generate(6).unwrap();
        let mut sched = Scheduler::new(sim);
        sched.start();
        time::sleep(Duration::from_secs(60)).await;
        let sim = sched.simulation();
        let sim = sim.lock().await;
        assert!(sim.current_tick() > 200);
        assert!(sim.events().len() <= DEFAULT_LIVE_EVENTS);
    }

    #[test]
    fn zero_interval_is_raised_to_one_millisecond() {
        let sim = Simulation::new(SimConfig::default().with_tick_interval(Duration::ZERO));
        assert_eq!(Scheduler::new(sim).interval(), Duration::from_millis(1));
    }
}
