use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rp_core::CountryId;

use crate::message::{CountryList, CountryMessage, GlobalEvent};

/// Failure delivering a message to an observer.
///
/// The engine logs these and carries on; they never abort a tick.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The receiving end has gone away.
    #[error("observer channel closed")]
    Closed,

    /// The payload could not be encoded.
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    /// The sink refused the message for some other reason.
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

/// Where the engine sends its outbound messages.
///
/// Implementations must not block; the tick holds the simulation lock while
/// pushing.
pub trait BroadcastSink: Send {
    /// Deliver a message to the observers of `country`.
    fn push_update(&mut self, country: CountryId, message: &CountryMessage)
    -> Result<(), SinkError>;

    /// Deliver a world-wide announcement.
    fn push_global(&mut self, event: &GlobalEvent) -> Result<(), SinkError>;

    /// Deliver a snapshot of every country. Sinks that have no use for it may
    /// ignore it.
    fn push_list(&mut self, _list: &CountryList) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl BroadcastSink for NullSink {
    fn push_update(&mut self, _: CountryId, _: &CountryMessage) -> Result<(), SinkError> {
        Ok(())
    }

    fn push_global(&mut self, _: &GlobalEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Recording {
    updates: Vec<(CountryId, CountryMessage)>,
    globals: Vec<GlobalEvent>,
    lists: Vec<CountryList>,
}

/// Keeps every pushed message in memory.
///
/// Clones share the same buffer, so a caller can hand one clone to a
/// [`crate::Simulation`] and inspect the other afterwards.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingSink {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every targeted message, in push order.
    pub fn updates(&self) -> Vec<(CountryId, CountryMessage)> {
        self.lock().updates.clone()
    }

    /// Targeted messages for one country.
    pub fn updates_for(&self, country: CountryId) -> Vec<CountryMessage> {
        self.lock()
            .updates
            .iter()
            .filter(|(id, _)| *id == country)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Every global event, in push order.
    pub fn globals(&self) -> Vec<GlobalEvent> {
        self.lock().globals.clone()
    }

    /// Every country list snapshot.
    pub fn lists(&self) -> Vec<CountryList> {
        self.lock().lists.clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        let mut rec = self.lock();
        rec.updates.clear();
        rec.globals.clear();
        rec.lists.clear();
    }
}

impl BroadcastSink for RecordingSink {
    fn push_update(
        &mut self,
        country: CountryId,
        message: &CountryMessage,
    ) -> Result<(), SinkError> {
        self.lock().updates.push((country, message.clone()));
        Ok(())
    }

    fn push_global(&mut self, event: &GlobalEvent) -> Result<(), SinkError> {
        self.lock().globals.push(event.clone());
        Ok(())
    }

    fn push_list(&mut self, list: &CountryList) -> Result<(), SinkError> {
        self.lock().lists.push(list.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_clones_share_buffer() {
        let sink = RecordingSink::new();
        let mut handle = sink.clone();
        handle
            .push_global(&GlobalEvent::war_declaration("A", "B"))
            .unwrap();
        assert_eq!(sink.globals().len(), 1);
        sink.clear();
        assert!(handle.globals().is_empty());
    }

    #[test]
    fn null_sink_accepts_everything() {
        let mut sink = NullSink;
        assert!(
            sink.push_global(&GlobalEvent::war_declaration("A", "B"))
                .is_ok()
        );
        assert!(sink.push_list(&CountryList { countries: vec![] }).is_ok());
    }
}
