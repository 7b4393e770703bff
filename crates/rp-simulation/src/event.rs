use rp_core::{CountryId, EquipmentKind, WarOutcome};

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEventKind {
    // Lifecycle
    /// A fresh set of countries was generated.
    Generated {
        /// How many countries were created.
        count: usize,
    },

    // Diplomacy
    /// A war was declared.
    WarDeclared {
        /// The declaring country.
        attacker: CountryId,
        /// The target.
        defender: CountryId,
        /// Whether the declaration came from an admin command.
        forced: bool,
    },

    // Combat
    /// A war reached completion and was resolved.
    WarResolved {
        /// The recorded attacker.
        attacker: CountryId,
        /// The recorded defender.
        defender: CountryId,
        /// How the war ended.
        outcome: WarOutcome,
    },
    /// A country was annihilated.
    CountryAnnihilated {
        /// The annihilated country.
        country: CountryId,
        /// The victor.
        by: CountryId,
    },

    // Production
    /// A country bought equipment.
    EquipmentProduced {
        /// The buyer.
        country: CountryId,
        /// What was built.
        kind: EquipmentKind,
        /// How many units.
        units: u32,
    },

    // Admin
    /// Funds were credited by an admin command.
    FundsAdded {
        /// The credited country.
        country: CountryId,
        /// Requested amount (may be negative).
        amount: f64,
    },
}

impl SimEventKind {
    /// Check whether a given country is involved in this event.
    pub fn involves(&self, id: CountryId) -> bool {
        match self {
            Self::Generated { .. } => false,
            Self::WarDeclared {
                attacker, defender, ..
            }
            | Self::WarResolved {
                attacker, defender, ..
            } => *attacker == id || *defender == id,
            Self::CountryAnnihilated { country, by } => *country == id || *by == id,
            Self::EquipmentProduced { country, .. } | Self::FundsAdded { country, .. } => {
                *country == id
            }
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        self.trim();
    }

    /// Change the capacity (0 = unlimited), dropping the oldest events if the
    /// log is already over it.
    pub fn set_max_events(&mut self, max_events: usize) {
        self.max_events = max_events;
        self.trim();
    }

    /// Current capacity; 0 means unlimited.
    pub fn max_events(&self) -> usize {
        self.max_events
    }

    fn trim(&mut self) {
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events involving the given country.
    pub fn events_for_country(&self, id: CountryId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Count the events matching a predicate.
    pub fn count_where(&self, pred: impl Fn(&SimEventKind) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.kind)).count()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
