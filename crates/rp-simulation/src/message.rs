use std::collections::BTreeMap;

use rp_core::{Country, CountryId, Ideology, MilitaryEquipment, Resources, War};
use serde::Serialize;

/// Per-tick delta for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryUpdate {
    /// The country.
    pub id: CountryId,
    /// Treasury after the tick.
    pub economy: f64,
    /// Stockpile after the tick.
    pub resources: Resources,
    /// Military after the tick.
    pub military_equipment: MilitaryEquipment,
    /// Every war record, keyed by enemy.
    pub wars: BTreeMap<CountryId, War>,
    /// Always `false` for per-tick updates.
    pub is_annihilated: bool,
}

impl From<&Country> for CountryUpdate {
    fn from(country: &Country) -> Self {
        Self {
            id: country.id,
            economy: country.economy,
            resources: country.resources,
            military_equipment: country.military_equipment.clone(),
            wars: country.wars.clone(),
            is_annihilated: country.is_annihilated,
        }
    }
}

/// Final notice sent to a country's observers when it is destroyed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnihilationNotice {
    /// The annihilated country.
    pub id: CountryId,
    /// Its name.
    pub name: String,
    /// Always `true`.
    pub is_annihilated: bool,
}

/// A message addressed to the observers of one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CountryMessage {
    /// End-of-tick state.
    CountryUpdate {
        /// The delta.
        country: CountryUpdate,
    },
    /// The country was annihilated.
    CountryAnnihilated {
        /// The notice.
        country: AnnihilationNotice,
    },
}

/// A world-wide announcement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GlobalEvent {
    /// Someone declared war.
    WarDeclaration {
        /// Human-readable announcement.
        message: String,
    },
    /// Someone was wiped out.
    #[serde(rename_all = "camelCase")]
    CountryAnnihilated {
        /// Human-readable announcement.
        message: String,
        /// The victim's name.
        country_name: String,
        /// The victim's ID.
        country_id: CountryId,
    },
}

impl GlobalEvent {
    /// Build a war declaration announcement.
    pub fn war_declaration(attacker: &str, defender: &str) -> Self {
        Self::WarDeclaration {
            message: format!("{attacker} has declared war on {defender}!"),
        }
    }

    /// Build an annihilation announcement.
    pub fn country_annihilated(id: CountryId, name: &str) -> Self {
        Self::CountryAnnihilated {
            message: format!("{name} has been annihilated!"),
            country_name: name.to_string(),
            country_id: id,
        }
    }

    /// The human-readable text.
    pub fn message(&self) -> &str {
        match self {
            Self::WarDeclaration { message } | Self::CountryAnnihilated { message, .. } => message,
        }
    }

    /// The wire tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::WarDeclaration { .. } => "war_declaration",
            Self::CountryAnnihilated { .. } => "country_annihilated",
        }
    }
}

/// Full public view of a country, as sent in the `country_list` message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySummary {
    /// Stable country ID.
    pub id: CountryId,
    /// Display name.
    pub name: String,
    /// Political alignment.
    pub ideology: Ideology,
    /// Head of state.
    pub leader: String,
    /// Treasury balance.
    pub economy: f64,
    /// Raw material stockpile.
    pub resources: Resources,
    /// Military stockpile.
    pub military_equipment: MilitaryEquipment,
    /// Wars keyed by opponent.
    pub wars: BTreeMap<CountryId, War>,
    /// Set once the country has lost a war by annihilation.
    pub is_annihilated: bool,
}

impl From<&Country> for CountrySummary {
    fn from(c: &Country) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            ideology: c.ideology,
            leader: c.leader.clone(),
            economy: c.economy,
            resources: c.resources,
            military_equipment: c.military_equipment.clone(),
            wars: c.wars.clone(),
            is_annihilated: c.is_annihilated,
        }
    }
}

/// Snapshot of every country, sent after generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "country_list")]
pub struct CountryList {
    /// Countries in store order.
    pub countries: Vec<CountrySummary>,
}

impl CountryList {
    /// Summarize every country in `countries`.
    pub fn from_countries<'a>(countries: impl IntoIterator<Item = &'a Country>) -> Self {
        Self {
            countries: countries.into_iter().map(CountrySummary::from).collect(),
        }
    }
}

/// Anything an observer may receive.
///
/// Serializes without an extra wrapper: each variant already carries its
/// `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    /// Addressed to one country's observers.
    Country(CountryMessage),
    /// Addressed to everyone.
    Global(GlobalEvent),
    /// World snapshot.
    List(CountryList),
}

impl OutboundMessage {
    /// Serialize to a single JSON line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
