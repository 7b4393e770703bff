use rand::rngs::StdRng;
use rp_core::{CountryId, CountryStore};

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::message::{CountryMessage, GlobalEvent};
use crate::sink::BroadcastSink;

/// Mutable context passed to each system during a tick.
pub struct SimContext<'a> {
    /// Countries being simulated.
    pub store: &'a mut CountryStore,
    /// Current tick.
    pub clock: &'a SimClock,
    /// Engine settings.
    pub config: &'a SimConfig,
    /// Log that `emit` appends to.
    pub events: &'a mut EventLog,
    /// The engine's only source of randomness.
    pub rng: &'a mut StdRng,
    /// Outbound messages for observers.
    pub sink: &'a mut dyn BroadcastSink,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    /// Push a world-wide announcement. Delivery failures are logged.
    pub fn announce(&mut self, event: GlobalEvent) {
        if let Err(e) = self.sink.push_global(&event) {
            tracing::warn!(kind = event.tag(), error = %e, "global event not delivered");
        }
    }

    /// Push a message to one country's observers. Delivery failures are logged.
    pub fn notify(&mut self, country: CountryId, message: CountryMessage) {
        if let Err(e) = self.sink.push_update(country, &message) {
            tracing::warn!(%country, error = %e, "country message not delivered");
        }
    }

    /// Tick being processed.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }
}

/// Owned backing state for building a [`SimContext`] in unit tests.
#[cfg(test)]
pub(crate) struct TestWorld {
    pub store: CountryStore,
    pub clock: SimClock,
    pub config: SimConfig,
    pub events: EventLog,
    pub rng: StdRng,
    pub sink: crate::sink::RecordingSink,
}

#[cfg(test)]
impl TestWorld {
    pub fn new(store: CountryStore) -> Self {
        use rand::SeedableRng;
        Self {
            store,
            clock: SimClock::new(),
            config: SimConfig::default(),
            events: EventLog::new(0),
            rng: StdRng::seed_from_u64(7),
            sink: crate::sink::RecordingSink::new(),
        }
    }

    pub fn ctx(&mut self) -> SimContext<'_> {
        SimContext {
            store: &mut self.store,
            clock: &self.clock,
            config: &self.config,
            events: &mut self.events,
            rng: &mut self.rng,
            sink: &mut self.sink,
        }
    }
}
