use thiserror::Error;

/// A value that violates an invariant of the type being constructed.
///
/// Raised by constructors, so it applies whether the value came from a
/// decoder or was built in memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("email entry must have a non-empty email")]
    EmptyEmail,

    #[error("email group must have a non-empty name")]
    EmptyGroupName,
}
