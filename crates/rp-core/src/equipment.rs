use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resource::Resource;

/// The four branches a piece of equipment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipmentCategory {
    /// Army equipment.
    GroundForces,
    /// Aircraft.
    AirForces,
    /// Ships and ship-launched weapons.
    NavalForces,
    /// Air and missile defense.
    DefenseSystems,
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroundForces => write!(f, "ground"),
            Self::AirForces => write!(f, "air"),
            Self::NavalForces => write!(f, "naval"),
            Self::DefenseSystems => write!(f, "defense"),
        }
    }
}

/// Every producible equipment type.
///
/// Category, unit cost, material bill and base production priority are
/// static data attached to each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipmentKind {
    // Ground
    /// Infantry rifles.
    AssaultRifles,
    /// Infantry machine guns.
    MachineGuns,
    /// Portable anti-tank launchers.
    AntiTankMissiles,
    /// Heavy armor; counts toward military power.
    MainBattleTanks,
    /// Armored troop carriers.
    InfantryFightingVehicles,
    /// Towed guns.
    Artillery,
    /// Tracked guns.
    SelfPropelledArtillery,
    /// Shoulder-fired air defense.
    Manpads,

    // Air
    /// Air superiority fighters; count toward military power.
    FighterJets,
    /// Multirole combat aircraft.
    MultiroleAircraft,
    /// Long-range bombers.
    StrategicBombers,
    /// Attack helicopters.
    AttackHelicopters,
    /// Airlift.
    TransportAircraft,

    // Naval
    /// Surface combatants; count toward military power.
    Destroyers,
    /// Attack submarines.
    Submarines,
    /// Carriers.
    AircraftCarriers,
    /// Ship-launched cruise missiles.
    CruiseMissiles,

    // Defense
    /// SAM batteries.
    SurfaceToAirMissiles,
    /// Anti-aircraft guns.
    AntiAircraftGuns,
    /// Ballistic missile defense.
    BallisticMissileDefense,
}

impl EquipmentKind {
    /// Every equipment kind in declaration order.
    pub const ALL: [EquipmentKind; 20] = [
        Self::AssaultRifles,
        Self::MachineGuns,
        Self::AntiTankMissiles,
        Self::MainBattleTanks,
        Self::InfantryFightingVehicles,
        Self::Artillery,
        Self::SelfPropelledArtillery,
        Self::Manpads,
        Self::FighterJets,
        Self::MultiroleAircraft,
        Self::StrategicBombers,
        Self::AttackHelicopters,
        Self::TransportAircraft,
        Self::Destroyers,
        Self::Submarines,
        Self::AircraftCarriers,
        Self::CruiseMissiles,
        Self::SurfaceToAirMissiles,
        Self::AntiAircraftGuns,
        Self::BallisticMissileDefense,
    ];

    /// Kinds that lose units while a war is in progress.
    pub const FRONTLINE: [EquipmentKind; 9] = [
        Self::MainBattleTanks,
        Self::InfantryFightingVehicles,
        Self::Artillery,
        Self::FighterJets,
        Self::AttackHelicopters,
        Self::Destroyers,
        Self::Submarines,
        Self::SurfaceToAirMissiles,
        Self::BallisticMissileDefense,
    ];

    /// The branch this kind is stockpiled under.
    pub fn category(self) -> EquipmentCategory {
        use EquipmentKind::*;
        match self {
            AssaultRifles | MachineGuns | AntiTankMissiles | MainBattleTanks
            | InfantryFightingVehicles | Artillery | SelfPropelledArtillery | Manpads => {
                EquipmentCategory::GroundForces
            }
            FighterJets | MultiroleAircraft | StrategicBombers | AttackHelicopters
            | TransportAircraft => EquipmentCategory::AirForces,
            Destroyers | Submarines | AircraftCarriers | CruiseMissiles => {
                EquipmentCategory::NavalForces
            }
            SurfaceToAirMissiles | AntiAircraftGuns | BallisticMissileDefense => {
                EquipmentCategory::DefenseSystems
            }
        }
    }

    /// Funds needed per unit.
    pub fn unit_cost(self) -> f64 {
        use EquipmentKind::*;
        match self {
            AssaultRifles => 300.0,
            MachineGuns => 200.0,
            AntiTankMissiles => 1_000.0,
            MainBattleTanks => 5_000.0,
            InfantryFightingVehicles => 3_000.0,
            Artillery => 2_000.0,
            SelfPropelledArtillery => 4_000.0,
            Manpads => 1_500.0,
            FighterJets => 10_000.0,
            MultiroleAircraft => 12_000.0,
            StrategicBombers => 25_000.0,
            AttackHelicopters => 8_000.0,
            TransportAircraft => 15_000.0,
            Destroyers => 50_000.0,
            Submarines => 75_000.0,
            AircraftCarriers => 200_000.0,
            CruiseMissiles => 5_000.0,
            SurfaceToAirMissiles => 3_000.0,
            AntiAircraftGuns => 2_000.0,
            BallisticMissileDefense => 100_000.0,
        }
    }

    /// Materials consumed per unit.
    pub fn materials(self) -> &'static [(Resource, u64)] {
        use EquipmentKind::*;
        use Resource::*;
        match self {
            AssaultRifles => &[(Iron, 5), (Aluminum, 2)],
            MachineGuns => &[(Iron, 3), (Aluminum, 1)],
            AntiTankMissiles => &[(RareEarthMetals, 2), (Oil, 5)],
            MainBattleTanks => &[(Iron, 20), (Aluminum, 10), (Oil, 50)],
            InfantryFightingVehicles => &[(Iron, 15), (Aluminum, 8), (Oil, 40)],
            Artillery => &[(Iron, 10), (Copper, 5), (Oil, 30)],
            SelfPropelledArtillery => &[(Iron, 15), (Copper, 8), (Oil, 40)],
            Manpads => &[(RareEarthMetals, 3), (Aluminum, 2)],
            FighterJets => &[(Aluminum, 50), (RareEarthMetals, 10), (Oil, 100)],
            MultiroleAircraft => &[(Aluminum, 60), (RareEarthMetals, 15), (Oil, 120)],
            StrategicBombers => &[(Aluminum, 100), (RareEarthMetals, 25), (Oil, 200)],
            AttackHelicopters => &[(Aluminum, 40), (RareEarthMetals, 8), (Oil, 80)],
            TransportAircraft => &[(Aluminum, 70), (RareEarthMetals, 12), (Oil, 150)],
            Destroyers => &[(Iron, 200), (Aluminum, 100), (Oil, 500)],
            Submarines => &[
                (Iron, 250),
                (Aluminum, 120),
                (RareEarthMetals, 50),
                (Oil, 600),
            ],
            AircraftCarriers => &[
                (Iron, 500),
                (Aluminum, 300),
                (RareEarthMetals, 100),
                (Oil, 1000),
            ],
            CruiseMissiles => &[(RareEarthMetals, 5), (Aluminum, 3), (Oil, 20)],
            SurfaceToAirMissiles => &[(RareEarthMetals, 4), (Aluminum, 2), (Oil, 10)],
            AntiAircraftGuns => &[(Iron, 8), (Copper, 4), (Oil, 20)],
            BallisticMissileDefense => &[(RareEarthMetals, 100), (Aluminum, 50), (Oil, 500)],
        }
    }

    /// Base production priority before per-tick jitter. Higher builds first.
    pub fn base_priority(self) -> f64 {
        use EquipmentKind::*;
        match self {
            AssaultRifles => 8.0,
            MachineGuns | TransportAircraft | SurfaceToAirMissiles => 6.0,
            AntiTankMissiles | Manpads | CruiseMissiles | AntiAircraftGuns => 5.0,
            MainBattleTanks
            | InfantryFightingVehicles
            | Artillery
            | FighterJets
            | MultiroleAircraft
            | AttackHelicopters
            | BallisticMissileDefense => 4.0,
            SelfPropelledArtillery | StrategicBombers | Destroyers | Submarines => 3.0,
            AircraftCarriers => 2.0,
        }
    }

    /// Contribution of one unit to military power (zero for most kinds).
    pub fn power_weight(self) -> u64 {
        match self {
            Self::MainBattleTanks => 10,
            Self::FighterJets => 8,
            Self::Destroyers => 12,
            _ => 0,
        }
    }
}

impl fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EquipmentKind::*;
        let name = match self {
            AssaultRifles => "assault rifles",
            MachineGuns => "machine guns",
            AntiTankMissiles => "anti-tank missiles",
            MainBattleTanks => "main battle tanks",
            InfantryFightingVehicles => "infantry fighting vehicles",
            Artillery => "artillery",
            SelfPropelledArtillery => "self-propelled artillery",
            Manpads => "MANPADS",
            FighterJets => "fighter jets",
            MultiroleAircraft => "multirole aircraft",
            StrategicBombers => "strategic bombers",
            AttackHelicopters => "attack helicopters",
            TransportAircraft => "transport aircraft",
            Destroyers => "destroyers",
            Submarines => "submarines",
            AircraftCarriers => "aircraft carriers",
            CruiseMissiles => "cruise missiles",
            SurfaceToAirMissiles => "surface-to-air missiles",
            AntiAircraftGuns => "anti-aircraft guns",
            BallisticMissileDefense => "ballistic missile defense",
        };
        f.write_str(name)
    }
}

/// Ground force stockpile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundForces {
    /// Infantry rifles.
    pub assault_rifles: u32,
    /// Machine guns.
    pub machine_guns: u32,
    /// Anti-tank guided missiles.
    pub anti_tank_missiles: u32,
    /// Main battle tanks. Halved by a lost war.
    pub main_battle_tanks: u32,
    /// Infantry fighting vehicles.
    pub infantry_fighting_vehicles: u32,
    /// Towed artillery.
    pub artillery: u32,
    /// Self-propelled artillery.
    pub self_propelled_artillery: u32,
    /// Man-portable air defense.
    pub manpads: u32,
}

/// Air force stockpile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirForces {
    /// Fighter jets.
    pub fighter_jets: u32,
    /// Multirole aircraft.
    pub multirole_aircraft: u32,
    /// Strategic bombers.
    pub strategic_bombers: u32,
    /// Attack helicopters.
    pub attack_helicopters: u32,
    /// Transport aircraft.
    pub transport_aircraft: u32,
}

/// Naval stockpile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavalForces {
    /// Destroyers.
    pub destroyers: u32,
    /// Submarines.
    pub submarines: u32,
    /// Aircraft carriers.
    pub aircraft_carriers: u32,
    /// Cruise missiles.
    pub cruise_missiles: u32,
}

/// Air and missile defense stockpile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenseSystems {
    /// Surface-to-air missile batteries.
    pub surface_to_air_missiles: u32,
    /// Anti-aircraft guns.
    pub anti_aircraft_guns: u32,
    /// Ballistic missile defense sites.
    pub ballistic_missile_defense: u32,
}

/// A country's full military stockpile, grouped by branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilitaryEquipment {
    /// Army equipment.
    pub ground_forces: GroundForces,
    /// Aircraft.
    pub air_forces: AirForces,
    /// Ships.
    pub naval_forces: NavalForces,
    /// Air and missile defense.
    pub defense_systems: DefenseSystems,
}

impl MilitaryEquipment {
    /// Units held of a single kind.
    pub fn count(&self, kind: EquipmentKind) -> u32 {
        use EquipmentKind::*;
        let (g, a, n, d) = (
            &self.ground_forces,
            &self.air_forces,
            &self.naval_forces,
            &self.defense_systems,
        );
        match kind {
            AssaultRifles => g.assault_rifles,
            MachineGuns => g.machine_guns,
            AntiTankMissiles => g.anti_tank_missiles,
            MainBattleTanks => g.main_battle_tanks,
            InfantryFightingVehicles => g.infantry_fighting_vehicles,
            Artillery => g.artillery,
            SelfPropelledArtillery => g.self_propelled_artillery,
            Manpads => g.manpads,
            FighterJets => a.fighter_jets,
            MultiroleAircraft => a.multirole_aircraft,
            StrategicBombers => a.strategic_bombers,
            AttackHelicopters => a.attack_helicopters,
            TransportAircraft => a.transport_aircraft,
            Destroyers => n.destroyers,
            Submarines => n.submarines,
            AircraftCarriers => n.aircraft_carriers,
            CruiseMissiles => n.cruise_missiles,
            SurfaceToAirMissiles => d.surface_to_air_missiles,
            AntiAircraftGuns => d.anti_aircraft_guns,
            BallisticMissileDefense => d.ballistic_missile_defense,
        }
    }

    /// Mutable access to the counter for a single kind.
    pub fn count_mut(&mut self, kind: EquipmentKind) -> &mut u32 {
        use EquipmentKind::*;
        let g = &mut self.ground_forces;
        let a = &mut self.air_forces;
        let n = &mut self.naval_forces;
        let d = &mut self.defense_systems;
        match kind {
            AssaultRifles => &mut g.assault_rifles,
            MachineGuns => &mut g.machine_guns,
            AntiTankMissiles => &mut g.anti_tank_missiles,
            MainBattleTanks => &mut g.main_battle_tanks,
            InfantryFightingVehicles => &mut g.infantry_fighting_vehicles,
            Artillery => &mut g.artillery,
            SelfPropelledArtillery => &mut g.self_propelled_artillery,
            Manpads => &mut g.manpads,
            FighterJets => &mut a.fighter_jets,
            MultiroleAircraft => &mut a.multirole_aircraft,
            StrategicBombers => &mut a.strategic_bombers,
            AttackHelicopters => &mut a.attack_helicopters,
            TransportAircraft => &mut a.transport_aircraft,
            Destroyers => &mut n.destroyers,
            Submarines => &mut n.submarines,
            AircraftCarriers => &mut n.aircraft_carriers,
            CruiseMissiles => &mut n.cruise_missiles,
            SurfaceToAirMissiles => &mut d.surface_to_air_missiles,
            AntiAircraftGuns => &mut d.anti_aircraft_guns,
            BallisticMissileDefense => &mut d.ballistic_missile_defense,
        }
    }

    /// Add produced or captured units of `kind`.
    pub fn add(&mut self, kind: EquipmentKind, units: u32) {
        let slot = self.count_mut(kind);
        *slot = slot.saturating_add(units);
    }

    /// Weighted sum of power-bearing equipment.
    pub fn power(&self) -> u64 {
        EquipmentKind::ALL
            .iter()
            .map(|k| u64::from(self.count(*k)) * k.power_weight())
            .sum()
    }

    /// Total units across all kinds.
    pub fn total_units(&self) -> u64 {
        EquipmentKind::ALL
            .iter()
            .map(|k| u64::from(self.count(*k)))
            .sum()
    }

    /// Iterate `(kind, count)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipmentKind, u32)> + '_ {
        EquipmentKind::ALL.iter().map(|k| (*k, self.count(*k)))
    }
}
