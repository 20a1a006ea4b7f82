//! Error type shared by the fitting core, the CLI and the web front-end.
//!
//! Every failure is reported as a human-readable message. The CLI turns the
//! kind into a process exit code, the web layer into an HTTP status; neither
//! treats an error as fatal to a running server.

use axum::http::StatusCode;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// Mismatched lengths, unparseable numbers, unsupported file type, bad degree.
    #[error("{0}")]
    InvalidInput(String),

    /// All y-values are equal, so SS_tot is zero and R² is undefined.
    #[error("All y-values are identical; R² is undefined for constant data.")]
    DegenerateFit,

    #[error("Failed to render plot: {0}")]
    Render(String),

    #[error("{0}")]
    Io(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::InvalidInput(_) | AppError::Config(_) => 2,
            AppError::DegenerateFit => 3,
            AppError::Render(_) | AppError::Io(_) => 4,
        }
    }

    /// Status used when the error surfaces at the HTTP boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::DegenerateFit => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Render(_) | AppError::Io(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}
