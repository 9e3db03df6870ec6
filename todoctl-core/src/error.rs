//! Structured error types for todoctl-core.
//!
//! Library consumers get `thiserror` enums; the CLI wraps them in `anyhow`.

use thiserror::Error;

/// Connection string rejected before it ever reaches the driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("connection string is not a valid URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("unsupported scheme '{scheme}' (expected postgres or postgresql)")]
    UnsupportedScheme { scheme: String },

    #[error("connection string has no host")]
    MissingHost,

    #[error("connection string has no database name")]
    MissingDatabase,

    #[error("connection string has a password but no user")]
    PasswordWithoutUser,
}

/// Configuration could not be resolved from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not set")]
    Missing { var: &'static str },

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("invalid DATABASE_URL: {0}")]
    Url(#[from] UrlError),
}

/// Input rejected by a domain type or request body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field}: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Body could not be decoded into the expected shape.
    #[error("invalid request body: {0}")]
    Body(String),
}

/// Database error type
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_names_the_variable() {
        let err = ConfigError::Missing {
            var: "DATABASE_URL",
        };
        assert_eq!(err.to_string(), "DATABASE_URL is not set");
    }

    #[test]
    fn validation_messages() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 255,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 255 characters"
        );
        assert_eq!(
            ValidationError::Body("missing field `title`".into()).to_string(),
            "invalid request body: missing field `title`"
        );
    }

    #[test]
    fn not_found_display() {
        let err = DbError::NotFound {
            resource: "task",
            id: "7".into(),
        };
        assert_eq!(err.to_string(), "not found: task '7'");
    }
}
