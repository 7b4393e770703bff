use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::diplomacy::{DiplomaticRelation, War};
use crate::equipment::MilitaryEquipment;
use crate::resource::Resources;

/// Unique, stable identifier for a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryId(pub Uuid);

impl CountryId {
    /// Generate a new random country ID from the OS entropy source.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Generate a country ID from a caller-supplied RNG, so seeded runs
    /// produce the same IDs.
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.random()).into_uuid())
    }

    /// The all-zero ID.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for CountryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Political alignment of a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ideology {
    /// Score -1.
    Authoritarian,
    /// Score 0.
    Neutral,
    /// Score +1.
    Democratic,
}

impl Ideology {
    /// All ideologies.
    pub const ALL: [Ideology; 3] = [
        Ideology::Authoritarian,
        Ideology::Neutral,
        Ideology::Democratic,
    ];

    /// Scalar stance used to bias diplomacy: -1, 0 or +1.
    pub fn score(self) -> i8 {
        match self {
            Self::Authoritarian => -1,
            Self::Neutral => 0,
            Self::Democratic => 1,
        }
    }

    /// Ideological distance to another ideology: 0, 1 or 2.
    pub fn distance(self, other: Ideology) -> u8 {
        (self.score() - other.score()).unsigned_abs()
    }
}

impl fmt::Display for Ideology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authoritarian => write!(f, "Authoritarian"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Democratic => write!(f, "Democratic"),
        }
    }
}

/// A simulated country.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// Unique identifier.
    pub id: CountryId,
    /// Display name, unique within a store.
    pub name: String,
    /// Political alignment.
    pub ideology: Ideology,
    /// Name of the head of state.
    pub leader: String,
    /// Treasury balance.
    pub economy: f64,
    /// Natural resource stockpile.
    pub resources: Resources,
    /// Military stockpile.
    pub military_equipment: MilitaryEquipment,
    /// Relations keyed by the partner's ID.
    pub relations: BTreeMap<CountryId, DiplomaticRelation>,
    /// Wars keyed by the enemy's ID.
    pub wars: BTreeMap<CountryId, War>,
    /// Terminal flag: annihilated countries are inert.
    pub is_annihilated: bool,
}

impl Country {
    /// A blank country: no funds, no resources, no equipment.
    pub fn new(
        id: CountryId,
        name: impl Into<String>,
        ideology: Ideology,
        leader: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            ideology,
            leader: leader.into(),
            economy: 0.0,
            resources: Resources::new(),
            military_equipment: MilitaryEquipment::default(),
            relations: BTreeMap::new(),
            wars: BTreeMap::new(),
            is_annihilated: false,
        }
    }

    /// Set the starting treasury.
    pub fn with_economy(mut self, economy: f64) -> Self {
        self.economy = economy;
        self
    }

    /// Set the starting resource stockpile.
    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    /// Set the starting military stockpile.
    pub fn with_equipment(mut self, equipment: MilitaryEquipment) -> Self {
        self.military_equipment = equipment;
        self
    }

    /// Shorthand for `self.ideology.score()`.
    pub fn ideology_score(&self) -> i8 {
        self.ideology.score()
    }

    /// Whether the country can still act.
    pub fn is_alive(&self) -> bool {
        !self.is_annihilated
    }

    /// Whether any war record (open or resolved) exists against `other`.
    pub fn has_war_with(&self, other: CountryId) -> bool {
        self.wars.contains_key(&other)
    }

    /// Enemies of every unresolved war.
    pub fn open_war_enemies(&self) -> Vec<CountryId> {
        self.wars
            .iter()
            .filter(|(_, w)| !w.is_resolved())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Weighted military power.
    pub fn military_power(&self) -> u64 {
        self.military_equipment.power()
    }

    /// Mark the country annihilated and zero all of its stockpiles.
    pub fn annihilate(&mut self) {
        self.is_annihilated = true;
        self.economy = 0.0;
        self.resources.clear();
        self.military_equipment = MilitaryEquipment::default();
    }
}
