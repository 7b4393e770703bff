//! War progression, attrition and resolution.
//!
//! A war is advanced once per tick no matter which side is processed first.
//! Below completion both sides lose frontline equipment in inverse proportion
//! to their share of the combined power; at completion the recorded
//! attacker's power decides the outcome.

use std::collections::HashSet;
use std::ops::Range;

use rand::Rng;
use rp_core::diplomacy::WAR_COMPLETE;
use rp_core::{
    Country, CountryId, CountryStore, EquipmentKind, MilitaryEquipment, Resource, War, WarOutcome,
};

use crate::config::LootPolicy;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::message::{AnnihilationNotice, CountryMessage, GlobalEvent};
use crate::system::System;

/// Progress added to an open war each tick.
pub const WAR_STEP: Range<f64> = 0.5..2.0;

/// Share of each resource a surrendering country hands over, as a divisor.
const SURRENDER_TRIBUTE_DIVISOR: u64 = 5;

/// Fraction of frontline equipment lost this tick by the side with `own`
/// power facing `other`.
pub fn damage_factor(own: u64, other: u64, progress: f64) -> f64 {
    let share = if own == other {
        0.5
    } else {
        own as f64 / (own + other) as f64
    };
    (1.0 - share) * (progress / WAR_COMPLETE)
}

/// Remove `⌊count × factor⌋` units of every frontline kind.
pub fn apply_damage(equipment: &mut MilitaryEquipment, factor: f64) {
    for kind in EquipmentKind::FRONTLINE {
        let count = equipment.count_mut(kind);
        let lost = (f64::from(*count) * factor).floor() as u32;
        *count = count.saturating_sub(lost);
    }
}

/// Decide how a completed war ends.
pub fn outcome_for(attacker_power: u64, defender_power: u64) -> WarOutcome {
    if attacker_power > defender_power.saturating_mul(2) {
        WarOutcome::Annihilation
    } else if attacker_power > defender_power {
        WarOutcome::Surrender
    } else {
        WarOutcome::Peace
    }
}

fn pair_key(a: CountryId, b: CountryId) -> (CountryId, CountryId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Add `step` to both mirror records of the war between `a` and `b`.
/// Returns a copy of the updated record.
pub fn advance_war(store: &mut CountryStore, a: CountryId, b: CountryId, step: f64) -> SimResult<War> {
    let (ca, cb) = store.get_pair_mut(a, b)?;
    let mirror = cb.wars.get_mut(&a).ok_or(SimError::MissingWar(b, a))?;
    let war = ca.wars.get_mut(&b).ok_or(SimError::MissingWar(a, b))?;
    mirror.progress = war.advance(step);
    Ok(war.clone())
}

/// Apply one tick of attrition to both sides of an open war.
pub fn apply_war_damage(
    store: &mut CountryStore,
    a: CountryId,
    b: CountryId,
    progress: f64,
) -> SimResult<()> {
    let (ca, cb) = store.get_pair_mut(a, b)?;
    let (pa, pb) = (ca.military_power(), cb.military_power());
    let (fa, fb) = (damage_factor(pa, pb, progress), damage_factor(pb, pa, progress));
    apply_damage(&mut ca.military_equipment, fa);
    apply_damage(&mut cb.military_equipment, fb);
    tracing::debug!(
        a = %ca.name,
        b = %cb.name,
        progress,
        tanks_a = ca.military_equipment.ground_forces.main_battle_tanks,
        tanks_b = cb.military_equipment.ground_forces.main_battle_tanks,
        "war damage applied"
    );
    Ok(())
}

fn loot_equipment(winner: &mut Country, loser: &Country, policy: LootPolicy) {
    match policy {
        LootPolicy::Overwrite => winner.military_equipment = loser.military_equipment.clone(),
        LootPolicy::Add => {
            for (kind, units) in loser.military_equipment.iter() {
                winner.military_equipment.add(kind, units);
            }
        }
    }
}

/// Resolve the completed war between `a` and `b`, using the roles recorded
/// on the war rather than the order of the arguments.
pub fn resolve_war(ctx: &mut SimContext<'_>, a: CountryId, b: CountryId) -> SimResult<WarOutcome> {
    let war = ctx
        .store
        .get(a)
        .ok_or(SimError::UnknownCountry(a))?
        .wars
        .get(&b)
        .ok_or(SimError::MissingWar(a, b))?;
    let (attacker_id, defender_id) = (war.attacker, war.defender);
    let policy = ctx.config.loot_policy;

    let (attacker, defender) = ctx.store.get_pair_mut(attacker_id, defender_id)?;
    if !defender.wars.contains_key(&attacker_id) {
        return Err(SimError::MissingWar(defender_id, attacker_id));
    }
    let outcome = outcome_for(attacker.military_power(), defender.military_power());
    for war in [
        attacker.wars.get_mut(&defender_id),
        defender.wars.get_mut(&attacker_id),
    ]
    .into_iter()
    .flatten()
    {
        war.outcome = Some(outcome);
    }

    match outcome {
        WarOutcome::Annihilation => {
            for resource in Resource::ALL {
                let amount = defender.resources[resource];
                defender
                    .resources
                    .transfer_to(&mut attacker.resources, resource, amount);
            }
            loot_equipment(attacker, defender, policy);
            defender.annihilate();
        }
        WarOutcome::Surrender => {
            for resource in Resource::ALL {
                let tribute = defender.resources[resource] / SURRENDER_TRIBUTE_DIVISOR;
                defender
                    .resources
                    .transfer_to(&mut attacker.resources, resource, tribute);
            }
            let tanks = defender
                .military_equipment
                .count_mut(EquipmentKind::MainBattleTanks);
            *tanks /= 2;
        }
        WarOutcome::Peace => {
            if let Some(rel) = attacker.relations.get_mut(&defender_id) {
                rel.strength = 0.0;
            }
            if let Some(rel) = defender.relations.get_mut(&attacker_id) {
                rel.strength = 0.0;
            }
        }
    }

    let attacker_name = attacker.name.clone();
    let defender_name = defender.name.clone();
    tracing::info!(
        attacker = %attacker_name,
        defender = %defender_name,
        %outcome,
        "war resolved"
    );
    ctx.emit(
        SimEventKind::WarResolved {
            attacker: attacker_id,
            defender: defender_id,
            outcome,
        },
        format!("War between {attacker_name} and {defender_name} ended in {outcome}"),
    );

    if outcome == WarOutcome::Annihilation {
        tracing::info!(country = %defender_name, by = %attacker_name, "country annihilated");
        ctx.emit(
            SimEventKind::CountryAnnihilated {
                country: defender_id,
                by: attacker_id,
            },
            format!("{defender_name} was annihilated by {attacker_name}"),
        );
        ctx.announce(GlobalEvent::country_annihilated(defender_id, &defender_name));
        ctx.notify(
            defender_id,
            CountryMessage::CountryAnnihilated {
                country: AnnihilationNotice {
                    id: defender_id,
                    name: defender_name,
                    is_annihilated: true,
                },
            },
        );
    }

    Ok(outcome)
}

/// Advances every open war of a country, applying damage or resolving it.
#[derive(Debug, Default)]
pub struct WarSystem {
    advanced: HashSet<(CountryId, CountryId)>,
}

impl WarSystem {
    /// Create the system with no pairs advanced.
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for WarSystem {
    fn name(&self) -> &str {
        "war"
    }

    fn begin_tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        self.advanced.clear();
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext<'_>, id: CountryId) -> SimResult<()> {
        if ctx.store.get(id).is_none() {
            return Err(SimError::UnknownCountry(id));
        }
        // Wars against annihilated countries are frozen and skipped here.
        for enemy in ctx.store.live_war_enemies(id) {
            if !ctx.store.is_alive(id) {
                break;
            }
            if !self.advanced.insert(pair_key(id, enemy)) {
                continue;
            }

            let step = ctx.rng.random_range(WAR_STEP);
            let war = advance_war(ctx.store, id, enemy, step)?;
            if war.is_complete() {
                resolve_war(ctx, id, enemy)?;
            } else {
                apply_war_damage(ctx.store, id, enemy, war.progress)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;
    use rp_core::{DiplomaticRelation, Ideology, Resources, War};

    use super::*;
    use crate::context::TestWorld;

    fn armed(name: &str, tanks: u32) -> Country {
        let mut eq = MilitaryEquipment::default();
        eq.add(EquipmentKind::MainBattleTanks, tanks);
        Country::new(CountryId::new(), name, Ideology::Neutral, "Leader").with_equipment(eq)
    }

    /// Two countries at war with `progress` already on the clock.
    fn at_war(a: Country, b: Country, progress: f64) -> (TestWorld, CountryId, CountryId) {
        let mut store = CountryStore::new();
        let a = store.insert(a).unwrap();
        let b = store.insert(b).unwrap();
        let mut war = War::new(a, b, Utc::now());
        war.progress = progress;
        let (ca, cb) = store.get_pair_mut(a, b).unwrap();
        ca.wars.insert(b, war.clone());
        cb.wars.insert(a, war);
        ca.relations.insert(b, DiplomaticRelation::new(-50.0));
        cb.relations.insert(a, DiplomaticRelation::new(-40.0));
        (TestWorld::new(store), a, b)
    }

    #[test]
    fn damage_factor_uses_power_share() {
        assert_eq!(damage_factor(30, 10, 100.0), 0.25);
        assert_eq!(damage_factor(10, 30, 100.0), 0.75);
        assert_eq!(damage_factor(10, 30, 50.0), 0.375);
    }

    #[test]
    fn damage_factor_ties_split_evenly() {
        assert_eq!(damage_factor(0, 0, 100.0), 0.5);
        assert_eq!(damage_factor(40, 40, 20.0), 0.1);
    }

    #[test]
    fn apply_damage_only_touches_frontline() {
        let mut eq = MilitaryEquipment::default();
        eq.add(EquipmentKind::MainBattleTanks, 10);
        eq.add(EquipmentKind::Submarines, 3);
        eq.add(EquipmentKind::AssaultRifles, 100);
        apply_damage(&mut eq, 0.25);
        assert_eq!(eq.count(EquipmentKind::MainBattleTanks), 8);
        assert_eq!(eq.count(EquipmentKind::Submarines), 3);
        assert_eq!(eq.count(EquipmentKind::AssaultRifles), 100);
    }

    #[test]
    fn outcome_thresholds() {
        assert_eq!(outcome_for(30, 10), WarOutcome::Annihilation);
        assert_eq!(outcome_for(20, 10), WarOutcome::Surrender);
        assert_eq!(outcome_for(11, 10), WarOutcome::Surrender);
        assert_eq!(outcome_for(10, 10), WarOutcome::Peace);
        assert_eq!(outcome_for(0, 0), WarOutcome::Peace);
        assert_eq!(outcome_for(5, 0), WarOutcome::Annihilation);
    }

    #[test]
    fn advance_war_keeps_mirrors_equal() {
        let (mut world, a, b) = at_war(armed("A", 0), armed("B", 0), 99.5);
        let war = advance_war(&mut world.store, b, a, 1.7).unwrap();
        assert_eq!(war.progress, 100.0);
        assert!(war.is_complete());
        assert_eq!(world.store.get(a).unwrap().wars[&b].progress, 100.0);
        assert_eq!(world.store.get(b).unwrap().wars[&a].progress, 100.0);
    }

    #[test]
    fn resolve_zero_power_is_peace() {
        let (mut world, a, b) = at_war(armed("A", 0), armed("B", 0), 100.0);
        let outcome = resolve_war(&mut world.ctx(), b, a).unwrap();
        assert_eq!(outcome, WarOutcome::Peace);
        let ca = world.store.get(a).unwrap();
        let cb = world.store.get(b).unwrap();
        assert_eq!(ca.wars[&b].outcome, Some(WarOutcome::Peace));
        assert_eq!(cb.wars[&a].outcome, Some(WarOutcome::Peace));
        assert_eq!(ca.relations[&b].strength, 0.0);
        assert_eq!(cb.relations[&a].strength, 0.0);
    }

    #[test]
    fn resolve_triple_power_annihilates_defender() {
        let rich = armed("Victim", 10)
            .with_economy(700.0)
            .with_resources(Resources::new().with(Resource::Oil, 40).with(Resource::Gold, 9));
        let (mut world, a, b) = at_war(
            armed("Conqueror", 30).with_resources(Resources::new().with(Resource::Oil, 2)),
            rich,
            100.0,
        );

        // Argument order does not matter; roles come from the war record.
        let outcome = resolve_war(&mut world.ctx(), b, a).unwrap();
        assert_eq!(outcome, WarOutcome::Annihilation);

        let winner = world.store.get(a).unwrap();
        assert_eq!(winner.resources[Resource::Oil], 42);
        assert_eq!(winner.resources[Resource::Gold], 9);
        // Overwrite loot: the winner now holds the loser's counts.
        assert_eq!(winner.military_equipment.count(EquipmentKind::MainBattleTanks), 10);

        let loser = world.store.get(b).unwrap();
        assert!(loser.is_annihilated);
        assert_eq!(loser.economy, 0.0);
        assert_eq!(loser.resources.total(), 0);
        assert_eq!(loser.military_equipment.total_units(), 0);

        let globals = world.sink.globals();
        assert_eq!(globals, vec![GlobalEvent::country_annihilated(b, "Victim")]);
        let notices = world.sink.updates_for(b);
        assert!(matches!(
            notices.as_slice(),
            [CountryMessage::CountryAnnihilated { country }] if country.is_annihilated
        ));
        assert_eq!(world.events.events_for_country(b).len(), 2);
    }

    #[test]
    fn resolve_with_add_policy_sums_equipment() {
        let (mut world, a, b) = at_war(armed("Big", 30), armed("Small", 10), 100.0);
        world.config.loot_policy = LootPolicy::Add;
        resolve_war(&mut world.ctx(), a, b).unwrap();
        let winner = world.store.get(a).unwrap();
        assert_eq!(winner.military_equipment.count(EquipmentKind::MainBattleTanks), 40);
    }

    #[test]
    fn resolve_surrender_takes_tribute_and_halves_tanks() {
        let (mut world, a, b) = at_war(
            armed("Strong", 15),
            armed("Weak", 11).with_resources(Resources::new().with(Resource::Iron, 99)),
            100.0,
        );
        let outcome = resolve_war(&mut world.ctx(), a, b).unwrap();
        assert_eq!(outcome, WarOutcome::Surrender);
        let winner = world.store.get(a).unwrap();
        let loser = world.store.get(b).unwrap();
        assert_eq!(winner.resources[Resource::Iron], 19);
        assert_eq!(loser.resources[Resource::Iron], 80);
        assert_eq!(loser.military_equipment.count(EquipmentKind::MainBattleTanks), 5);
        assert!(!loser.is_annihilated);
        assert!(world.sink.globals().is_empty());
    }

    #[test]
    fn war_system_advances_each_pair_once_per_tick() {
        let (mut world, a, b) = at_war(armed("A", 0), armed("B", 0), 10.0);
        let mut system = WarSystem::new();
        system.begin_tick(&mut world.ctx()).unwrap();
        system.update(&mut world.ctx(), a).unwrap();
        let after_first = world.store.get(a).unwrap().wars[&b].progress;
        system.update(&mut world.ctx(), b).unwrap();
        let after_second = world.store.get(b).unwrap().wars[&a].progress;
        assert!(after_first > 10.0 && after_first < 12.0);
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn war_system_resolves_war_once_complete() {
        let (mut world, a, b) = at_war(armed("A", 0), armed("B", 0), 99.6);
        let mut system = WarSystem::new();
        system.begin_tick(&mut world.ctx()).unwrap();
        system.update(&mut world.ctx(), a).unwrap();

        let war = &world.store.get(a).unwrap().wars[&b];
        assert!(war.is_complete());
        assert_eq!(war.outcome, Some(WarOutcome::Peace));
        assert!(world.store.live_war_enemies(a).is_empty());

        // A resolved war is not picked up again.
        system.begin_tick(&mut world.ctx()).unwrap();
        system.update(&mut world.ctx(), b).unwrap();
        let resolved = world
            .events
            .count_where(|k| matches!(k, SimEventKind::WarResolved { .. }));
        assert_eq!(resolved, 1);
    }

    #[test]
    fn war_against_annihilated_country_is_frozen() {
        let (mut world, a, b) = at_war(armed("A", 5), armed("B", 5), 42.0);
        world.store.get_mut(b).unwrap().annihilate();
        let mut system = WarSystem::new();
        system.begin_tick(&mut world.ctx()).unwrap();
        system.update(&mut world.ctx(), a).unwrap();
        let war = &world.store.get(a).unwrap().wars[&b];
        assert_eq!(war.progress, 42.0);
        assert!(war.outcome.is_none());
    }

    proptest! {
        #[test]
        fn damage_never_increases_counts(count in 0u32..10_000, own in 0u64..1000, other in 0u64..1000, progress in 0.0f64..100.0) {
            let mut eq = MilitaryEquipment::default();
            eq.add(EquipmentKind::Destroyers, count);
            apply_damage(&mut eq, damage_factor(own, other, progress));
            prop_assert!(eq.count(EquipmentKind::Destroyers) <= count);
        }
    }
}
