use thiserror::Error;

/// Errors raised while building an RCS assembly.
///
/// Stepping never fails; every malformed input is caught here.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid thruster #{index}: {reason}")]
    InvalidThruster { index: usize, reason: String },
    #[error("Invalid parameter '{name}' with value '{value}'")]
    InvalidParameter { name: String, value: String },
    #[error("Invalid Isp curve: {0}")]
    InvalidIspCurve(String),
    #[error("Assembly has no thrusters")]
    NoThrusters,
}

impl ConfigError {
    pub(crate) fn parameter(name: &str, value: impl ToString) -> Self {
        ConfigError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}
