//! Core types for Realpolitik: countries, resources, equipment, and the country store.
//!
//! This crate defines the data model that the simulation engine mutates. It is
//! independent of the tick pipeline: build a [`CountryStore`] by hand
//! or generate one from a seeded RNG.

/// Countries, identifiers, and ideologies.
pub mod country;
/// Diplomatic relations and wars between countries.
pub mod diplomacy;
/// Military equipment kinds, categories, and stockpiles.
pub mod equipment;
/// Error types used throughout the crate.
pub mod error;
/// Natural resource kinds and stockpiles.
pub mod resource;
/// The store that owns every country for the lifetime of a simulation.
pub mod store;

/// Re-export country types.
pub use country::{Country, CountryId, Ideology};
/// Re-export diplomacy types.
pub use diplomacy::{DiplomaticRelation, RelationStatus, War, WarOutcome};
/// Re-export equipment types.
pub use equipment::{EquipmentCategory, EquipmentKind, MilitaryEquipment};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export resource types.
pub use resource::{Resource, Resources};
/// Re-export the country store.
pub use store::CountryStore;
