use rp_core::{CoreError, CountryId};

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the simulation engine and its admin surface.
///
/// Every variant describes rejected input or a missing record; the state is
/// left untouched when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A store operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No country with this ID exists.
    #[error("unknown country: {0}")]
    UnknownCountry(CountryId),

    /// The country has been annihilated and can no longer act or be targeted.
    #[error("country {0} has been annihilated")]
    Annihilated(CountryId),

    /// A country tried to declare war on itself.
    #[error("country {0} cannot declare war on itself")]
    SelfWar(CountryId),

    /// A war record already exists for this pair.
    #[error("war between {attacker} and {defender} already exists")]
    WarExists {
        /// The would-be attacker.
        attacker: CountryId,
        /// The would-be defender.
        defender: CountryId,
    },

    /// One side of a war record is missing.
    #[error("no war recorded between {0} and {1}")]
    MissingWar(CountryId, CountryId),

    /// Funding amount was NaN or infinite.
    #[error("invalid funding amount: {0}")]
    InvalidAmount(f64),
}
