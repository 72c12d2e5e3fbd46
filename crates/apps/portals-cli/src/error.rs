//! CLI error types.

use portals_registry::RegistryError;
use portals_valid::ValidationError;
use portals_x402::X402Error;
use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client error from lookup or negotiation.
    #[error("{0}")]
    Client(#[from] X402Error),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Not found: 2
            Self::Client(X402Error::Registry(RegistryError::RecordNotFound { .. })) => 2,
            // Config errors: 3
            Self::Config(_) | Self::Toml(_) | Self::Client(X402Error::Config(_)) => 3,
            Self::Client(X402Error::Validation(
                ValidationError::InvalidBounds { .. } | ValidationError::InvalidTolerance { .. },
            )) => 3,
            // Balance errors: 4
            Self::Client(X402Error::InsufficientFunds { .. }) => 4,
            // Refused payment: 5
            Self::Client(X402Error::Validation(_)) => 5,
            // Failed after paying: 6
            Self::Client(e) if e.moves_funds() => 6,
            // Other client errors: 7
            Self::Client(_) => 7,
            // IO errors: 8
            Self::Io(_) => 8,
        }
    }

    /// Recovery hint for this error, if any.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Client(e) => Some(e.suggestion()),
            Self::Config(_) | Self::Toml(_) => Some("Check the config file and PORTALS_* variables"),
            _ => None,
        }
    }

    /// Returns true if the error came after a payment was sent.
    pub fn moves_funds(&self) -> bool {
        matches!(self, Self::Client(e) if e.moves_funds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portals_x402::{CallStage, TimedOperation};

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::config("x").exit_code(), 3);

        let not_found = CliError::from(X402Error::Registry(RegistryError::RecordNotFound {
            address: "abc".to_string(),
        }));
        assert_eq!(not_found.exit_code(), 2);

        let funds = CliError::from(X402Error::InsufficientFunds {
            required: 1.0,
            available: 0.5,
        });
        assert_eq!(funds.exit_code(), 4);

        let refused = CliError::from(X402Error::Validation(ValidationError::InvalidAmount {
            amount: 0.0,
        }));
        assert_eq!(refused.exit_code(), 5);
    }

    #[test]
    fn test_after_payment_errors() {
        let err = CliError::from(X402Error::UnexpectedStatus {
            status: 500,
            stage: CallStage::AfterPayment,
        });
        assert_eq!(err.exit_code(), 6);
        assert!(err.moves_funds());

        let err = CliError::from(X402Error::Timeout {
            operation: TimedOperation::InitialCall,
            limit_secs: 300,
        });
        assert_eq!(err.exit_code(), 7);
        assert!(!err.moves_funds());
    }

    #[test]
    fn test_suggestion() {
        let err = CliError::from(X402Error::InsufficientFunds {
            required: 1.0,
            available: 0.5,
        });
        assert!(err.suggestion().is_some());
        let io = CliError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(io.suggestion().is_none());
        assert_eq!(io.exit_code(), 8);
    }
}
