//! Error types.
//!
//! The library side (`fit`, `math`, `io`) reports [`ModelingError`]; the binary
//! wraps everything in [`AppError`], which also carries the process exit code:
//!
//! - `2` usage or input file problems
//! - `3` no usable data
//! - `4` modeling failure

use thiserror::Error;

/// Minimum number of observations accepted by the report builder.
pub const MIN_REPORT_POINTS: usize = 3;

/// Errors raised by the numerical core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelingError {
    #[error("insufficient data points: at least {required} are required for modeling, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("singular matrix: zero pivot in column {column}")]
    SingularMatrix { column: usize },

    #[error("non-finite value in field `{field}`")]
    NonFinite { field: &'static str },
}

/// Result type for the numerical core.
pub type Result<T> = std::result::Result<T, ModelingError>;

/// Application-level error with an exit code.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ModelingError> for AppError {
    fn from(err: ModelingError) -> Self {
        let exit_code = match err {
            ModelingError::InsufficientData { .. } => 3,
            _ => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}
