use crate::country::CountryId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating the country store.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested country ID does not exist in the store.
    #[error("country not found: {0}")]
    CountryNotFound(CountryId),

    /// A country with the same ID is already stored.
    #[error("country already exists: {0}")]
    DuplicateId(CountryId),

    /// A country with the same name already exists.
    #[error("country already exists: \"{0}\"")]
    DuplicateName(String),

    /// Generation was asked for zero countries.
    #[error("country count must be greater than 0")]
    EmptyGeneration,

    /// Both sides of a pairwise operation refer to the same country.
    #[error("country {0} cannot be paired with itself")]
    SamePair(CountryId),
}
