use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::country::{Country, CountryId, Ideology};
use crate::diplomacy::DiplomaticRelation;
use crate::error::{CoreError, CoreResult};
use crate::resource::{Resource, Resources};

const BASE_NAMES: [&str; 10] = [
    "Arendelle",
    "Wakanda",
    "Atlantis",
    "Elarion",
    "Nexora",
    "Valoria",
    "Solara",
    "Terranova",
    "Oceana",
    "Celestia",
];

const LEADERS: [&str; 5] = ["Elsa", "T'Challa", "Poseidon", "Aeloria", "Nexus"];

/// Owns every country for the lifetime of a simulation.
///
/// Countries are never removed: annihilation is a flag on [`Country`], so IDs
/// stay resolvable for late lookups and for other countries' relation maps.
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct CountryStore {
    countries: Vec<Country>,

    // Indexes
    by_id: HashMap<CountryId, usize>,
    by_name_lower: HashMap<String, CountryId>,
}

impl CountryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Replace the contents with `count` freshly generated countries.
    ///
    /// Every ordered pair receives a peaceful relation with a strength drawn
    /// uniformly from `[-20, 20]`.
    pub fn generate<R: Rng>(&mut self, count: usize, rng: &mut R) -> CoreResult<()> {
        if count == 0 {
            return Err(CoreError::EmptyGeneration);
        }
        self.clear();

        let mut names = BASE_NAMES;
        names.shuffle(rng);
        for i in 0..count {
            let base = names[i % names.len()];
            let cycle = i / names.len();
            let name = if cycle == 0 {
                base.to_string()
            } else {
                format!("{base} {}", roman(cycle + 1))
            };
            let ideology = Ideology::ALL[rng.random_range(0..Ideology::ALL.len())];
            let leader = LEADERS[rng.random_range(0..LEADERS.len())];

            let country = Country::new(CountryId::from_rng(rng), name, ideology, leader)
                .with_economy(rng.random_range(0.0..1000.0))
                .with_resources(random_resources(rng));
            self.insert(country)?;
        }

        let ids = self.ids();
        for country in &mut self.countries {
            for other in &ids {
                if *other != country.id {
                    let strength = rng.random_range(-20.0..=20.0);
                    country
                        .relations
                        .insert(*other, DiplomaticRelation::new(strength));
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Add a country. Returns its ID.
    pub fn insert(&mut self, country: Country) -> CoreResult<CountryId> {
        if self.by_id.contains_key(&country.id) {
            return Err(CoreError::DuplicateId(country.id));
        }
        let name_lower = country.name.to_lowercase();
        if self.by_name_lower.contains_key(&name_lower) {
            return Err(CoreError::DuplicateName(country.name.clone()));
        }

        let id = country.id;
        self.by_id.insert(id, self.countries.len());
        self.by_name_lower.insert(name_lower, id);
        self.countries.push(country);
        Ok(id)
    }

    /// Get a country by ID.
    pub fn get(&self, id: CountryId) -> Option<&Country> {
        self.by_id.get(&id).map(|i| &self.countries[*i])
    }

    /// Get a mutable reference to a country by ID.
    pub fn get_mut(&mut self, id: CountryId) -> Option<&mut Country> {
        self.by_id.get(&id).map(|i| &mut self.countries[*i])
    }

    /// Mutable access to two distinct countries at once.
    pub fn get_pair_mut(
        &mut self,
        a: CountryId,
        b: CountryId,
    ) -> CoreResult<(&mut Country, &mut Country)> {
        if a == b {
            return Err(CoreError::SamePair(a));
        }
        let ia = *self.by_id.get(&a).ok_or(CoreError::CountryNotFound(a))?;
        let ib = *self.by_id.get(&b).ok_or(CoreError::CountryNotFound(b))?;
        if ia < ib {
            let (left, right) = self.countries.split_at_mut(ib);
            Ok((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.countries.split_at_mut(ia);
            Ok((&mut right[0], &mut left[ib]))
        }
    }

    /// Find a country by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Country> {
        self.by_name_lower
            .get(&name.to_lowercase())
            .and_then(|id| self.get(*id))
    }

    /// Whether `id` exists and has not been annihilated.
    pub fn is_alive(&self, id: CountryId) -> bool {
        self.get(id).is_some_and(Country::is_alive)
    }

    /// Enemies of `id`'s unresolved wars that still exist. A war against an
    /// annihilated country is frozen and not reported.
    pub fn live_war_enemies(&self, id: CountryId) -> Vec<CountryId> {
        self.get(id)
            .map(|c| {
                c.open_war_enemies()
                    .into_iter()
                    .filter(|enemy| self.is_alive(*enemy))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All countries in insertion order, including annihilated ones.
    pub fn list(&self) -> &[Country] {
        &self.countries
    }

    /// Iterate all countries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    /// All IDs in insertion order.
    pub fn ids(&self) -> Vec<CountryId> {
        self.countries.iter().map(|c| c.id).collect()
    }

    /// IDs of countries that have not been annihilated, in insertion order.
    pub fn live_ids(&self) -> Vec<CountryId> {
        self.countries
            .iter()
            .filter(|c| c.is_alive())
            .map(|c| c.id)
            .collect()
    }

    /// Display name for an ID, or `"?"` if unknown.
    pub fn name_of(&self, id: CountryId) -> &str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or("?")
    }

    /// Number of countries, annihilated ones included.
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// True if no country has been added.
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Drop every country. Used when a new world is generated.
    pub fn clear(&mut self) {
        self.countries.clear();
        self.by_id.clear();
        self.by_name_lower.clear();
    }
}

fn random_resources<R: Rng>(rng: &mut R) -> Resources {
    let mut resources = Resources::new();
    for resource in Resource::ALL {
        let ceiling = if resource.is_scarce() { 100 } else { 1000 };
        resources[resource] = rng.random_range(0..ceiling);
    }
    resources
}

fn roman(mut n: usize) -> String {
    const TABLE: [(usize, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, numeral) in TABLE {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}
