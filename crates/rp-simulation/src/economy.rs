use std::ops::Range;

use rand::Rng;
use rp_core::{CountryId, Resource};

use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::system::System;

/// Per-tick change applied to every treasury.
pub const ECONOMY_DRIFT: Range<f64> = -2500.0..7500.0;

/// Per-tick change range for one resource kind.
pub fn resource_drift(resource: Resource) -> Range<f64> {
    match resource {
        Resource::Oil => -60.0..90.0,
        Resource::Iron => -20.0..70.0,
        Resource::Uranium | Resource::RareEarthMetals => -5.0..5.0,
        _ => -20.0..20.0,
    }
}

/// Apply a fractional change to an integer stock, flooring and clamping at 0.
pub fn apply_drift(amount: u64, delta: f64) -> u64 {
    (amount as f64 + delta).floor().max(0.0) as u64
}

/// Random walk on treasury and resource stockpiles.
#[derive(Debug, Default)]
pub struct EconomySystem;

impl EconomySystem {
    /// Create the system.
    pub fn new() -> Self {
        Self
    }
}

impl System for EconomySystem {
    fn name(&self) -> &str {
        "economy"
    }

    fn update(&mut self, ctx: &mut SimContext<'_>, id: CountryId) -> SimResult<()> {
        let country = ctx.store.get_mut(id).ok_or(SimError::UnknownCountry(id))?;

        country.economy += ctx.rng.random_range(ECONOMY_DRIFT);

        for resource in Resource::ALL {
            let delta = ctx.rng.random_range(resource_drift(resource));
            country.resources[resource] = apply_drift(country.resources[resource], delta);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rp_core::{Country, CountryStore, Ideology, Resources};

    use super::*;
    use crate::context::TestWorld;

    #[test]
    fn drift_ranges_follow_resource_kind() {
        assert_eq!(resource_drift(Resource::Oil), -60.0..90.0);
        assert_eq!(resource_drift(Resource::Iron), -20.0..70.0);
        assert_eq!(resource_drift(Resource::Uranium), -5.0..5.0);
        assert_eq!(resource_drift(Resource::RareEarthMetals), -5.0..5.0);
        assert_eq!(resource_drift(Resource::Lithium), -20.0..20.0);
    }

    #[test]
    fn apply_drift_floors_and_clamps() {
        assert_eq!(apply_drift(10, 2.9), 12);
        assert_eq!(apply_drift(10, -2.1), 7);
        assert_eq!(apply_drift(3, -50.0), 0);
    }

    #[test]
    fn economy_system_moves_treasury_within_range() {
        let mut store = CountryStore::new();
        let id = store
            .insert(
                Country::new(CountryId::new(), "Genovia", Ideology::Neutral, "Renaldi")
                    .with_economy(1000.0)
                    .with_resources(Resources::new().with(Resource::Oil, 5)),
            )
            .unwrap();
        let mut world = TestWorld::new(store);

        for _ in 0..50 {
            let before = world.store.get(id).unwrap().economy;
            EconomySystem::new().update(&mut world.ctx(), id).unwrap();
            let delta = world.store.get(id).unwrap().economy - before;
            assert!((-2500.01..7500.01).contains(&delta), "delta {delta}");
        }
    }

    proptest! {
        #[test]
        fn drift_never_underflows(amount in 0u64..10_000, delta in -10_000.0f64..10_000.0) {
            let out = apply_drift(amount, delta);
            prop_assert!(out as f64 <= (amount as f64 + delta).max(0.0));
        }
    }
}
