use rand::SeedableRng;
use rand::rngs::StdRng;
use rp_core::{Country, CountryId, CountryStore};

use crate::clock::SimClock;
use crate::combat::WarSystem;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::diplomacy::{self, DiplomacySystem};
use crate::economy::EconomySystem;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEventKind};
use crate::message::{CountryList, CountryMessage, CountryUpdate};
use crate::production::ProductionSystem;
use crate::sink::{BroadcastSink, NullSink};
use crate::system::System;

/// The top-level simulation orchestrator.
///
/// Owns the country store, clock, RNG, event log, sink, and registered
/// systems. Each tick runs every system for every live country in store
/// order, then pushes one update per live country.
pub struct Simulation {
    store: CountryStore,
    clock: SimClock,
    rng: StdRng,
    events: EventLog,
    config: SimConfig,
    systems: Vec<Box<dyn System>>,
    sink: Box<dyn BroadcastSink>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("countries", &self.store.len())
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Create a simulation with the standard pipeline (economy, war,
    /// diplomacy, production), an empty store and a [`NullSink`].
    pub fn new(config: SimConfig) -> Self {
        let mut sim = Self::empty(config);
        sim.add_system(EconomySystem::new());
        sim.add_system(WarSystem::new());
        sim.add_system(DiplomacySystem::new());
        sim.add_system(ProductionSystem::new());
        sim
    }

    /// Create a simulation with no systems registered.
    pub fn empty(config: SimConfig) -> Self {
        Self {
            store: CountryStore::new(),
            clock: SimClock::new(),
            rng: StdRng::seed_from_u64(config.seed),
            events: EventLog::new(config.max_events),
            config,
            systems: Vec::new(),
            sink: Box::new(NullSink),
        }
    }

    /// Replace the outbound sink.
    pub fn with_sink(mut self, sink: impl BroadcastSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Replace the country store.
    pub fn with_store(mut self, store: CountryStore) -> Self {
        self.store = store;
        self
    }

    /// Register a system. Systems run in registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Names of the registered systems, in run order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Replace every country with `count` freshly generated ones, rewind the
    /// clock and broadcast the new country list.
    pub fn generate(&mut self, count: usize) -> SimResult<()> {
        self.store.generate(count, &mut self.rng)?;
        self.clock.reset();
        self.events.clear();
        self.emit(
            SimEventKind::Generated { count },
            format!("Generated {count} countries"),
        );
        tracing::info!(count, "countries generated");

        let list = CountryList::from_countries(self.store.iter());
        if let Err(e) = self.sink.push_list(&list) {
            tracing::warn!(error = %e, "country list not delivered");
        }
        Ok(())
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> SimResult<()> {
        let tick = self.clock.advance();
        tracing::debug!(tick, "tick started");

        let Self {
            store,
            clock,
            rng,
            events,
            config,
            systems,
            sink,
        } = self;
        let mut ctx = SimContext {
            store,
            clock,
            config,
            events,
            rng,
            sink: sink.as_mut(),
        };

        for system in systems.iter_mut() {
            system.begin_tick(&mut ctx)?;
        }
        for id in ctx.store.ids() {
            for system in systems.iter_mut() {
                // Annihilated before or during its own turn.
                if !ctx.store.is_alive(id) {
                    break;
                }
                system.update(&mut ctx, id)?;
            }
        }

        self.broadcast_updates();
        Ok(())
    }

    /// Advance the simulation by `n` ticks.
    pub fn run(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    fn broadcast_updates(&mut self) {
        for country in self.store.iter().filter(|c| c.is_alive()) {
            let message = CountryMessage::CountryUpdate {
                country: CountryUpdate::from(country),
            };
            if let Err(e) = self.sink.push_update(country.id, &message) {
                tracing::warn!(country = %country.name, error = %e, "update not delivered");
            }
        }
    }

    /// Credit (or debit) a country's treasury. The result is clamped at 0.
    /// Returns the new balance.
    pub fn add_funds(&mut self, id: CountryId, amount: f64) -> SimResult<f64> {
        if !amount.is_finite() {
            return Err(SimError::InvalidAmount(amount));
        }
        let country = self.store.get_mut(id).ok_or(SimError::UnknownCountry(id))?;
        if !country.is_alive() {
            return Err(SimError::Annihilated(id));
        }
        country.economy = (country.economy + amount).max(0.0);
        let (balance, name) = (country.economy, country.name.clone());

        tracing::info!(country = %name, amount, balance, "funds added");
        self.emit(
            SimEventKind::FundsAdded {
                country: id,
                amount,
            },
            format!("{name} received {amount:.2} in funds"),
        );
        Ok(balance)
    }

    /// Force a war, bypassing the hostility and acceptance rolls.
    pub fn declare_war(&mut self, attacker: CountryId, defender: CountryId) -> SimResult<()> {
        let mut ctx = SimContext {
            store: &mut self.store,
            clock: &self.clock,
            config: &self.config,
            events: &mut self.events,
            rng: &mut self.rng,
            sink: self.sink.as_mut(),
        };
        diplomacy::declare_war(&mut ctx, attacker, defender, true)
    }

    /// Bound the event log to `max` entries (0 = unlimited).
    pub fn set_max_events(&mut self, max: usize) {
        self.config.max_events = max;
        self.events.set_max_events(max);
    }

    /// Rewind the tick counter to 0 without touching countries.
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events.push(crate::event::SimEvent::new(
            self.clock.tick(),
            kind,
            description,
        ));
    }

    /// Countries in the world.
    pub fn store(&self) -> &CountryStore {
        &self.store
    }

    /// Mutable access for tooling and tests. Bypasses the engine's checks.
    pub fn store_mut(&mut self) -> &mut CountryStore {
        &mut self.store
    }

    /// Look up a country by ID.
    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.store.get(id)
    }

    /// Tick counter.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Engine event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Ticks processed since the last reset.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}
