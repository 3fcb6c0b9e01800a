use std::fmt;

/// Result type for Daedalus operations
pub type Result<T> = std::result::Result<T, DaedalusError>;

/// Main error type for the Daedalus library
#[derive(Debug, Clone)]
pub enum DaedalusError {
    /// State vector dimensionality does not match the network's input size
    InvalidStateShape {
        expected: usize,
        actual: usize,
    },

    /// Action index outside the discrete action range
    DegenerateAction {
        action: usize,
        num_actions: usize,
    },

    /// Sampling requested with fewer stored transitions than required
    InsufficientData {
        requested: usize,
        available: usize,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Numerical computation errors
    NumericalError(String),
}

impl fmt::Display for DaedalusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaedalusError::InvalidStateShape { expected, actual } => {
                write!(f, "Invalid state shape: expected {} dimensions, got {}", expected, actual)
            }
            DaedalusError::DegenerateAction { action, num_actions } => {
                write!(f, "Degenerate action {}: must be less than {}", action, num_actions)
            }
            DaedalusError::InsufficientData { requested, available } => {
                write!(f, "Insufficient data: requested {} transitions, only {} stored", requested, available)
            }
            DaedalusError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            DaedalusError::IoError(msg) => write!(f, "IO error: {}", msg),
            DaedalusError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            DaedalusError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for DaedalusError {}

impl From<std::io::Error> for DaedalusError {
    fn from(err: std::io::Error) -> Self {
        DaedalusError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for DaedalusError {
    fn from(err: bincode::Error) -> Self {
        DaedalusError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for DaedalusError {
    fn from(err: serde_json::Error) -> Self {
        DaedalusError::SerializationError(err.to_string())
    }
}

impl DaedalusError {
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        DaedalusError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
