use thiserror::Error;

pub type SwapResult<T> = Result<T, SwapError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwapError {
    #[error("Invalid input: {0}")]
    InputInvalid(String),

    #[error("No route found for pair {input}/{output}")]
    NoRoute { input: String, output: String },

    #[error("Reserves unavailable: {0}")]
    ReservesUnavailable(String),

    #[error("Insufficient liquidity: available {available}, requested {requested}")]
    InsufficientLiquidity { available: u128, requested: u128 },

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Math overflow in calculation")]
    MathOverflow,

    #[error("Invalid slippage: {0}")]
    InvalidSlippage(String),

    #[error("Invalid pair: {0}")]
    InvalidPair(String),

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Invalid transition from {from} on {action}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl SwapError {
    /// Transient failures the user may retry without changing their input.
    pub fn is_retryable(&self) -> bool {
        match self {
            SwapError::ReservesUnavailable(_) | SwapError::NetworkError(_) => true,
            SwapError::SubmissionFailed(msg) | SwapError::PreconditionFailed(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("timeout") || msg.contains("network") || msg.contains("connection")
            }
            _ => false,
        }
    }
}

impl From<anyhow::Error> for SwapError {
    fn from(err: anyhow::Error) -> Self {
        SwapError::Other(err.to_string())
    }
}

impl From<reqwest::Error> for SwapError {
    fn from(err: reqwest::Error) -> Self {
        SwapError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        SwapError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        SwapError::Other(err.to_string())
    }
}
