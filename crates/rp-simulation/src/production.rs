use std::ops::Range;

use rand::Rng;
use rp_core::{Country, CountryId, EquipmentKind, Resources};

use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::system::System;

/// Random offset added to each kind's base priority every tick.
pub const PRIORITY_JITTER: Range<f64> = -1.5..1.5;

/// Whole units of `kind` affordable with `funds` and `stock`, ignoring any
/// per-tick cap.
pub fn max_buildable(funds: f64, stock: &Resources, kind: EquipmentKind) -> u32 {
    if funds <= 0.0 {
        return 0;
    }
    let by_funds = (funds / kind.unit_cost()).floor() as u64;
    let by_materials = kind
        .materials()
        .iter()
        .map(|&(resource, required)| stock[resource] / required)
        .min()
        .unwrap_or(u64::MAX);
    u32::try_from(by_funds.min(by_materials)).unwrap_or(u32::MAX)
}

/// Deduct the cost and materials of `units` and add them to the stockpile.
///
/// Callers must size `units` with [`max_buildable`] first.
pub fn purchase(country: &mut Country, kind: EquipmentKind, units: u32) {
    let n = u64::from(units);
    country.economy -= kind.unit_cost() * f64::from(units);
    for &(resource, required) in kind.materials() {
        let stock = &mut country.resources[resource];
        *stock = stock.saturating_sub(required * n);
    }
    country.military_equipment.add(kind, units);
}

/// Order in which a country considers equipment this tick, most wanted first.
pub fn shopping_list<R: Rng>(rng: &mut R) -> Vec<EquipmentKind> {
    let mut ranked: Vec<(EquipmentKind, f64)> = EquipmentKind::ALL
        .iter()
        .map(|&kind| (kind, kind.base_priority() + rng.random_range(PRIORITY_JITTER)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().map(|(kind, _)| kind).collect()
}

/// Spends each country's treasury and stockpile on equipment.
#[derive(Debug, Default)]
pub struct ProductionSystem;

impl ProductionSystem {
    /// Create the system.
    pub fn new() -> Self {
        Self
    }
}

impl System for ProductionSystem {
    fn name(&self) -> &str {
        "production"
    }

    fn update(&mut self, ctx: &mut SimContext<'_>, id: CountryId) -> SimResult<()> {
        let cap = ctx.config.max_units_per_tick;
        let order = shopping_list(ctx.rng);
        let country = ctx.store.get_mut(id).ok_or(SimError::UnknownCountry(id))?;

        let mut produced = Vec::new();
        for kind in order {
            let units = max_buildable(country.economy, &country.resources, kind).min(cap);
            if units == 0 {
                continue;
            }
            purchase(country, kind, units);
            produced.push((kind, units));
        }
        country.economy = country.economy.max(0.0);

        let name = country.name.clone();
        if produced.is_empty() {
            tracing::debug!(country = %name, "nothing affordable this tick");
        }
        for (kind, units) in produced {
            tracing::debug!(country = %name, %kind, units, "equipment produced");
            ctx.emit(
                SimEventKind::EquipmentProduced {
                    country: id,
                    kind,
                    units,
                },
                format!("{name} produced {units}x {kind}"),
            );
        }
        Ok(())
    }
}
