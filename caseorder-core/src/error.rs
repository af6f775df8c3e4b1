//! Error types shared across the core crate.

use std::io;
use std::path::PathBuf;

/// Errors raised by a [`KeyValueStore`](crate::store::KeyValueStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error reading or writing the backing file.
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),
    /// The backing document could not be decoded.
    #[error("Failed to load document {}: {}", .0.display(), .1)]
    Load(PathBuf, String),
    /// A value could not be written into the document.
    #[error("Failed to write key '{0}': {1}")]
    Write(String, String),
}

/// Reasons a block of text is not a share payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    #[error("expected a header and at least one dish, found {0} non-empty line(s)")]
    TooFewLines(usize),
    #[error("header line '{0}' is not a dish order header")]
    MissingHeader(String),
    #[error("cannot parse date '{0}'")]
    InvalidDate(String),
}

/// A date string that is not `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid date format '{0}'. Use YYYY-MM-DD.")]
pub struct DateKeyError(pub String);

/// Errors surfaced to the controller by [`Planner`](crate::planner::Planner) operations.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("Dish name cannot be empty")]
    EmptyDishName,
    #[error("Dish already exists: {0}")]
    DuplicateDish(String),
    #[error("Dish not found: {0}")]
    DishNotFound(String),
    #[error("Malformed share payload: {0}")]
    MalformedShare(#[from] ShareError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PlannerError {
    /// Returns true for rejected user input that left all state unchanged.
    ///
    /// Store failures are the only errors that are not warnings.
    pub fn is_warning(&self) -> bool {
        !matches!(self, PlannerError::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_includes_path() {
        let err = StoreError::Load(PathBuf::from("/tmp/data.automerge"), "bad header".into());
        let msg = err.to_string();
        assert!(msg.contains("/tmp/data.automerge"));
        assert!(msg.contains("bad header"));
    }

    #[test]
    fn test_planner_error_warning_kinds() {
        assert!(PlannerError::EmptyDishName.is_warning());
        assert!(PlannerError::DuplicateDish("水煮鱼".into()).is_warning());
        assert!(PlannerError::MalformedShare(ShareError::TooFewLines(1)).is_warning());

        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = PlannerError::from(StoreError::Io(PathBuf::from("x"), io));
        assert!(!err.is_warning());
    }

    #[test]
    fn test_share_error_converts_into_planner_error() {
        let err: PlannerError = ShareError::InvalidDate("Octember 1".into()).into();
        assert_eq!(
            err.to_string(),
            "Malformed share payload: cannot parse date 'Octember 1'"
        );
    }
}
