//! Error types for NFS evaluation.
//!
//! Every error aborts the evaluation before a catalog is returned, so callers
//! never see partial declarations.

use crate::validate::ValidationErrors;

/// Result type alias for NFS evaluation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while evaluating facts and parameters.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more parameters violate their type or content constraints.
    #[error("invalid parameters: {0}")]
    Validation(ValidationErrors),

    /// Server mode was requested on a family with no export mechanism.
    #[error("This platform is not configured to be an NFS server (osfamily {family})")]
    UnsupportedPlatform {
        /// Operating-system family from the facts.
        family: String,
    },

    /// A declaration needs a value the platform leaves undefined.
    #[error("{field} is undefined on {platform} and must be supplied explicitly")]
    MissingResolution {
        /// Parameter that has no default.
        field: &'static str,
        /// Platform description, e.g. "RedHat 5".
        platform: String,
    },

    /// Facts could not be interpreted.
    #[error("invalid fact {name}: {message}")]
    InvalidFact {
        /// Fact name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The assembled catalog is inconsistent.
    #[error(transparent)]
    Catalog(#[from] declarative::Error),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
