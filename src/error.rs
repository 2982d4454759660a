//! Error types.
//!
//! - `CurveError` is the library-level error returned by the numerical core.
//! - `AppError` carries a process exit code for the `pivot` binary.

use thiserror::Error;

/// Errors raised by curve construction, simulation and reversal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// Malformed curve, unknown pivot or non-finite parameter.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CurveError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CurveError::InvalidInput(message.into())
    }
}

#[derive(Clone)]
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

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_error_maps_to_exit_code_2() {
        let err: AppError = CurveError::invalid("pivot 4.5 not in curve").into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Invalid input: pivot 4.5 not in curve");
    }
}
