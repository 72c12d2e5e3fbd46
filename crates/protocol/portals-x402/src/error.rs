//! Error types for x402 negotiation.

use portals_registry::RegistryError;
use portals_valid::ValidationError;
use thiserror::Error;

/// Result type for x402 operations.
pub type X402Result<T> = Result<T, X402Error>;

/// Which call of a negotiation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStage {
    /// The first call, made without a payment proof.
    Initial,
    /// The single retry carrying a payment proof.
    AfterPayment,
}

impl std::fmt::Display for CallStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => f.write_str("API call failed"),
            Self::AfterPayment => f.write_str("API call failed after payment"),
        }
    }
}

/// Network round trip that can time out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedOperation {
    /// Fetching the API's OpenAPI document.
    SchemaFetch,
    /// The unpaid call.
    InitialCall,
    /// The retry carrying a payment proof.
    PaidCall,
}

impl std::fmt::Display for TimedOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SchemaFetch => f.write_str("schema fetch"),
            Self::InitialCall => f.write_str("API call"),
            Self::PaidCall => f.write_str("paid API call"),
        }
    }
}

/// Errors that can occur while calling a paid API.
#[derive(Debug, Error)]
pub enum X402Error {
    /// Registry lookup failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The payment challenge failed a price or destination check.
    #[error("payment rejected: {0}")]
    Validation(#[from] ValidationError),

    /// The wallet cannot cover the payment.
    #[error("insufficient funds: required {required} USDC, available {available} USDC")]
    InsufficientFunds {
        /// Amount the payment needs
        required: f64,
        /// Amount the wallet holds
        available: f64,
    },

    /// The payment builder could not produce a signed transaction.
    #[error("failed to build payment: {reason}")]
    PaymentBuild {
        /// Description of the failure
        reason: String,
    },

    /// A 402 response carried no usable payment details.
    #[error("invalid 402 response: {reason}")]
    MalformedChallenge {
        /// What is missing or wrong
        reason: String,
    },

    /// A round trip exceeded its time limit.
    #[error("{operation} timed out ({limit_secs}s limit)")]
    Timeout {
        /// Operation that timed out
        operation: TimedOperation,
        /// Limit that was exceeded
        limit_secs: u64,
    },

    /// The API answered with a status the flow cannot continue from.
    #[error("{stage}: status {status}")]
    UnexpectedStatus {
        /// HTTP status
        status: u16,
        /// Which call returned it
        stage: CallStage,
    },

    /// The OpenAPI document could not be fetched or parsed.
    #[error("failed to get API schema from {url}: {reason}")]
    SchemaUnavailable {
        /// Document URL
        url: String,
        /// Description of the failure
        reason: String,
    },

    /// HTTP transport failure on an API call.
    #[error("{stage}: {reason}")]
    Transport {
        /// Which call failed
        stage: CallStage,
        /// Underlying failure
        reason: String,
    },

    /// The payment proof could not be encoded or decoded.
    #[error("payment proof encoding error: {0}")]
    ProofEncoding(String),

    /// Client construction failed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl X402Error {
    /// Returns a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> &str {
        match self {
            Self::Registry(RegistryError::RecordNotFound { .. }) => {
                "Check the API id and that you are on the right network"
            }
            Self::Registry(RegistryError::InvalidAddress { .. }) => "API ids are base58 addresses",
            Self::Registry(_) => "Check connectivity to the RPC endpoint",
            Self::Validation(e) => e.suggestion(),
            Self::InsufficientFunds { .. } => "Fund the wallet with USDC and retry",
            Self::PaymentBuild { .. } => "Check that the signing service is reachable",
            Self::MalformedChallenge { .. } => "The API's 402 response is not x402 compliant",
            Self::Timeout { .. } => "Retry later or raise the timeout in your config",
            Self::UnexpectedStatus {
                stage: CallStage::AfterPayment,
                ..
            } => "Payment was sent; contact the provider with the transaction",
            Self::UnexpectedStatus { .. } => "Check the request parameters",
            Self::SchemaUnavailable { .. } => "Check that the API publishes openapi.json",
            Self::Transport { .. } => "Check network connectivity to the API",
            Self::ProofEncoding(_) => "This is an internal error; please report it",
            Self::Config(_) => "Check the client configuration",
        }
    }

    /// Returns true if this error is transient and the operation may succeed on retry.
    ///
    /// Errors that already moved funds are never transient.
    pub fn is_transient(&self) -> bool {
        if self.moves_funds() {
            return false;
        }
        match self {
            Self::Registry(e) => e.is_transient(),
            Self::Timeout { .. } | Self::Transport { .. } | Self::SchemaUnavailable { .. } => true,
            _ => false,
        }
    }

    /// Returns true if this error was raised after a payment was built.
    pub fn moves_funds(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedStatus {
                stage: CallStage::AfterPayment,
                ..
            } | Self::Transport {
                stage: CallStage::AfterPayment,
                ..
            } | Self::Timeout {
                operation: TimedOperation::PaidCall,
                ..
            }
        )
    }
}
