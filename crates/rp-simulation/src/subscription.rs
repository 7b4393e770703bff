use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rp_core::CountryId;
use tokio::sync::mpsc;

use crate::message::{CountryList, CountryMessage, GlobalEvent, OutboundMessage};
use crate::sink::{BroadcastSink, SinkError};

/// Opaque handle for a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// A single client of the fan-out.
pub trait Observer: Send {
    /// Deliver one message. Must not block.
    fn deliver(&mut self, message: &OutboundMessage) -> Result<(), SinkError>;
}

/// Forwards every message as a JSON line over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelObserver {
    /// Wrap an existing sender.
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Create an observer together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Observer for ChannelObserver {
    fn deliver(&mut self, message: &OutboundMessage) -> Result<(), SinkError> {
        let line = message.to_json()?;
        self.tx.send(line).map_err(|_| SinkError::Closed)
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: BTreeMap<ObserverId, Box<dyn Observer>>,
    subscriptions: BTreeMap<CountryId, BTreeSet<ObserverId>>,
}

impl Registry {
    fn deliver_to(&mut self, targets: impl IntoIterator<Item = ObserverId>, msg: &OutboundMessage) {
        for id in targets {
            let Some(observer) = self.observers.get_mut(&id) else {
                continue;
            };
            if let Err(e) = observer.deliver(msg) {
                tracing::warn!(observer = %id, error = %e, "failed to deliver message");
            }
        }
    }
}

/// In-process fan-out of engine messages to per-country observers.
///
/// Cloning yields another handle to the same registry, so the transport can
/// keep one to manage subscriptions while the simulation owns another as its
/// sink.
#[derive(Clone, Default)]
pub struct SubscriptionRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reg = self.lock();
        f.debug_struct("SubscriptionRegistry")
            .field("observers", &reg.observers.len())
            .field("countries", &reg.subscriptions.len())
            .finish()
    }
}

impl SubscriptionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new observer. It receives country lists and global events
    /// straight away, and per-country messages once it subscribes.
    pub fn register(&self, observer: impl Observer + 'static) -> ObserverId {
        let mut reg = self.lock();
        reg.next_id += 1;
        let id = ObserverId(reg.next_id);
        reg.observers.insert(id, Box::new(observer));
        id
    }

    /// Subscribe an observer to a country. Returns `false` for an unknown
    /// observer.
    pub fn subscribe(&self, observer: ObserverId, country: CountryId) -> bool {
        let mut reg = self.lock();
        if !reg.observers.contains_key(&observer) {
            return false;
        }
        reg.subscriptions.entry(country).or_default().insert(observer);
        true
    }

    /// Drop one subscription. Empty country sets are removed.
    pub fn unsubscribe(&self, observer: ObserverId, country: CountryId) {
        let mut reg = self.lock();
        if let Some(set) = reg.subscriptions.get_mut(&country) {
            set.remove(&observer);
            if set.is_empty() {
                reg.subscriptions.remove(&country);
            }
        }
    }

    /// Forget an observer and every subscription it holds.
    pub fn remove_observer(&self, observer: ObserverId) {
        let mut reg = self.lock();
        reg.observers.remove(&observer);
        reg.subscriptions.retain(|_, set| {
            set.remove(&observer);
            !set.is_empty()
        });
    }

    /// Observers subscribed to `country`.
    pub fn subscribers_of(&self, country: CountryId) -> Vec<ObserverId> {
        self.lock()
            .subscriptions
            .get(&country)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Countries with at least one subscriber.
    pub fn subscribed_countries(&self) -> Vec<CountryId> {
        self.lock().subscriptions.keys().copied().collect()
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }
}

impl BroadcastSink for SubscriptionRegistry {
    fn push_update(
        &mut self,
        country: CountryId,
        message: &CountryMessage,
    ) -> Result<(), SinkError> {
        let mut reg = self.lock();
        let Some(targets) = reg.subscriptions.get(&country).cloned() else {
            return Ok(());
        };
        reg.deliver_to(targets, &OutboundMessage::Country(message.clone()));
        // The annihilation notice is the last message a country produces.
        if matches!(message, CountryMessage::CountryAnnihilated { .. }) {
            reg.subscriptions.remove(&country);
        }
        Ok(())
    }

    fn push_global(&mut self, event: &GlobalEvent) -> Result<(), SinkError> {
        let mut reg = self.lock();
        // One copy per observer, subscribed or not.
        let targets: Vec<ObserverId> = reg.observers.keys().copied().collect();
        reg.deliver_to(targets, &OutboundMessage::Global(event.clone()));
        Ok(())
    }

    fn push_list(&mut self, list: &CountryList) -> Result<(), SinkError> {
        let mut reg = self.lock();
        let targets: Vec<ObserverId> = reg.observers.keys().copied().collect();
        reg.deliver_to(targets, &OutboundMessage::List(list.clone()));
        Ok(())
    }
}
