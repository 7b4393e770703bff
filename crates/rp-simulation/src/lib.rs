//! Tick-based country simulation for Realpolitik.
//!
//! Provides a system-based simulation engine operating on a
//! [`rp_core::CountryStore`]. Each tick runs the registered systems for every
//! live country in store order (economy, wars, diplomacy, production), then
//! pushes one update per live country to the configured [`BroadcastSink`].
//! A [`Scheduler`] drives ticks on a wall-clock interval and serializes admin
//! actions with tick processing.

/// Simulation clock for tracking ticks.
pub mod clock;
/// War progression, damage, and resolution.
pub mod combat;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each tick.
pub mod context;
/// Relation drift and war declarations.
pub mod diplomacy;
/// Economy and resource drift.
pub mod economy;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Outbound payloads pushed to observers.
pub mod message;
/// Equipment production.
pub mod production;
/// Wall-clock tick scheduler.
pub mod scheduler;
/// Top-level simulation orchestrator.
pub mod simulation;
/// The contract between the engine and whatever fans messages out.
pub mod sink;
/// In-process observer registry implementing [`sink::BroadcastSink`].
pub mod subscription;
/// The trait that all simulation systems implement.
pub mod system;

/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-exports of [`config::SimConfig`] and [`config::LootPolicy`].
pub use config::{LootPolicy, SimConfig};
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-exports of the outbound message types.
pub use message::{CountryList, CountryMessage, CountryUpdate, GlobalEvent, OutboundMessage};
/// Re-exports of [`scheduler::Scheduler`] and [`scheduler::SchedulerState`].
pub use scheduler::{Scheduler, SchedulerState};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-exports of the sink contract and the bundled sinks.
pub use sink::{BroadcastSink, NullSink, RecordingSink, SinkError};
/// Re-exports of the subscription registry types.
pub use subscription::{ChannelObserver, Observer, ObserverId, SubscriptionRegistry};
/// Re-export of [`system::System`].
pub use system::System;
