use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// The closed set of natural resources a country stockpiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// Crude oil, the most volatile stockpile.
    Oil,
    /// Iron ore.
    Iron,
    /// Coal.
    Coal,
    /// Uranium, scarce.
    Uranium,
    /// Gold.
    Gold,
    /// Aluminum.
    Aluminum,
    /// Rare earth metals, scarce.
    RareEarthMetals,
    /// Natural rubber.
    Rubber,
    /// Copper.
    Copper,
    /// Lithium.
    Lithium,
}

impl Resource {
    /// Number of resource kinds.
    pub const COUNT: usize = 10;

    /// Every resource kind in declaration order.
    pub const ALL: [Resource; Resource::COUNT] = [
        Resource::Oil,
        Resource::Iron,
        Resource::Coal,
        Resource::Uranium,
        Resource::Gold,
        Resource::Aluminum,
        Resource::RareEarthMetals,
        Resource::Rubber,
        Resource::Copper,
        Resource::Lithium,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Returns true for resources that start with small stockpiles (0..100).
    pub fn is_scarce(self) -> bool {
        matches!(
            self,
            Self::Uranium | Self::Gold | Self::RareEarthMetals | Self::Lithium
        )
    }

    /// The wire name of this resource (`"RareEarthMetals"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Oil => "Oil",
            Self::Iron => "Iron",
            Self::Coal => "Coal",
            Self::Uranium => "Uranium",
            Self::Gold => "Gold",
            Self::Aluminum => "Aluminum",
            Self::RareEarthMetals => "RareEarthMetals",
            Self::Rubber => "Rubber",
            Self::Copper => "Copper",
            Self::Lithium => "Lithium",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer stockpile for every [`Resource`].
///
/// Backed by a fixed array so every kind is always present. Serializes as a
/// map keyed by resource name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<Resource, u64>", from = "BTreeMap<Resource, u64>")]
pub struct Resources {
    amounts: [u64; Resource::COUNT],
}

impl Resources {
    /// An empty stockpile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, resource: Resource, amount: u64) -> Self {
        self[resource] = amount;
        self
    }

    /// Stock of a single resource.
    pub fn get(&self, resource: Resource) -> u64 {
        self.amounts[resource.index()]
    }

    /// Iterate `(resource, amount)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u64)> + '_ {
        Resource::ALL.iter().map(|r| (*r, self.get(*r)))
    }

    /// Sum of all stockpiles.
    pub fn total(&self) -> u64 {
        self.amounts.iter().sum()
    }

    /// Set every stockpile to zero.
    pub fn clear(&mut self) {
        self.amounts = [0; Resource::COUNT];
    }

    /// Move `amount` of `resource` into `other`, limited to what is held.
    /// Returns the quantity actually moved.
    pub fn transfer_to(&mut self, other: &mut Resources, resource: Resource, amount: u64) -> u64 {
        let moved = amount.min(self.get(resource));
        self[resource] -= moved;
        other[resource] = other[resource].saturating_add(moved);
        moved
    }
}

impl Index<Resource> for Resources {
    type Output = u64;

    fn index(&self, resource: Resource) -> &u64 {
        &self.amounts[resource.index()]
    }
}

impl IndexMut<Resource> for Resources {
    fn index_mut(&mut self, resource: Resource) -> &mut u64 {
        &mut self.amounts[resource.index()]
    }
}

impl From<Resources> for BTreeMap<Resource, u64> {
    fn from(resources: Resources) -> Self {
        resources.iter().collect()
    }
}

impl From<BTreeMap<Resource, u64>> for Resources {
    fn from(map: BTreeMap<Resource, u64>) -> Self {
        let mut resources = Resources::new();
        for (resource, amount) in map {
            resources[resource] = amount;
        }
        resources
    }
}
