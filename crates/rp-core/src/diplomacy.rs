use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::country::CountryId;

/// Lower bound of relation strength.
pub const MIN_STRENGTH: f64 = -100.0;
/// Upper bound of relation strength.
pub const MAX_STRENGTH: f64 = 100.0;
/// Progress value at which a war resolves.
pub const WAR_COMPLETE: f64 = 100.0;

/// Coarse label on a bilateral relation.
///
/// The label is cosmetic: it is rerolled at random and does not drive war
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationStatus {
    /// No hostilities.
    Peace,
    /// Hostile.
    War,
    /// Friendly.
    Allied,
}

impl fmt::Display for RelationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Peace => write!(f, "peace"),
            Self::War => write!(f, "war"),
            Self::Allied => write!(f, "allied"),
        }
    }
}

/// One country's view of another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiplomaticRelation {
    /// Coarse label.
    pub status: RelationStatus,
    /// Friendliness score in `[-100, 100]`.
    pub strength: f64,
    /// Tick of the last update.
    pub last_updated: u64,
}

impl DiplomaticRelation {
    /// A peaceful relation with the given starting strength (clamped).
    pub fn new(strength: f64) -> Self {
        Self {
            status: RelationStatus::Peace,
            strength: clamp_strength(strength),
            last_updated: 0,
        }
    }

    /// Shift strength by `delta`, keeping it within bounds.
    pub fn adjust(&mut self, delta: f64) {
        self.strength = clamp_strength(self.strength + delta);
    }
}

/// Clamp a strength value into `[MIN_STRENGTH, MAX_STRENGTH]`.
pub fn clamp_strength(strength: f64) -> f64 {
    strength.clamp(MIN_STRENGTH, MAX_STRENGTH)
}

/// How a war ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarOutcome {
    /// The defender yielded part of its stockpiles.
    Surrender,
    /// The defender was wiped out.
    Annihilation,
    /// Neither side prevailed.
    Peace,
}

impl fmt::Display for WarOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surrender => write!(f, "surrender"),
            Self::Annihilation => write!(f, "annihilation"),
            Self::Peace => write!(f, "peace"),
        }
    }
}

/// A war record. Both participants hold an identical copy keyed by the
/// other's ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct War {
    /// The country that declared the war.
    pub attacker: CountryId,
    /// The country war was declared on.
    pub defender: CountryId,
    /// Wall-clock time of the declaration.
    pub start_date: DateTime<Utc>,
    /// Progress toward resolution, `0..=100`.
    pub progress: f64,
    /// Set once the war is resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<WarOutcome>,
}

impl War {
    /// A fresh war with zero progress.
    pub fn new(attacker: CountryId, defender: CountryId, start_date: DateTime<Utc>) -> Self {
        Self {
            attacker,
            defender,
            start_date,
            progress: 0.0,
            outcome: None,
        }
    }

    /// Whether an outcome has been recorded.
    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    /// Add progress, capped at [`WAR_COMPLETE`]. Returns the new value.
    pub fn advance(&mut self, amount: f64) -> f64 {
        self.progress = (self.progress + amount).min(WAR_COMPLETE);
        self.progress
    }

    /// Whether progress has reached the resolution threshold.
    pub fn is_complete(&self) -> bool {
        self.progress >= WAR_COMPLETE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_strength_is_clamped() {
        let mut rel = DiplomaticRelation::new(150.0);
        assert_eq!(rel.strength, MAX_STRENGTH);
        rel.adjust(-500.0);
        assert_eq!(rel.strength, MIN_STRENGTH);
        rel.adjust(42.5);
        assert!((rel.strength - -57.5).abs() < f64::EPSILON);
    }

    #[test]
    fn war_progress_caps_at_complete() {
        let mut war = War::new(CountryId::nil(), CountryId::nil(), Utc::now());
        war.advance(60.0);
        assert!(!war.is_complete());
        assert_eq!(war.advance(60.0), WAR_COMPLETE);
        assert!(war.is_complete());
        assert!(!war.is_resolved());
    }

    #[test]
    fn war_serializes_camel_case_and_skips_open_outcome() {
        let war = War::new(CountryId::nil(), CountryId::nil(), Utc::now());
        let json = serde_json::to_value(&war).unwrap();
        assert!(json.get("startDate").is_some());
        assert!(json.get("outcome").is_none());

        let mut resolved = war.clone();
        resolved.outcome = Some(WarOutcome::Annihilation);
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["outcome"], "annihilation");
    }

    #[test]
    fn status_labels_are_lowercase() {
        assert_eq!(
            serde_json::to_value(RelationStatus::Allied).unwrap(),
            "allied"
        );
        assert_eq!(RelationStatus::War.to_string(), "war");
    }
}
