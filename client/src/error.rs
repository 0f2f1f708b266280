use services::error::AttendanceError;
use thiserror::Error;

/// Transport and protocol failures at the API edge, plus the domain errors
/// bubbled up from the in-memory core.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Domain(#[from] AttendanceError),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("report generation could not start: {0}")]
    ReportGeneration(String),

    #[error("report generation failed: {0}")]
    ReportFailed(String),

    #[error("gave up on report after {attempts} status checks")]
    PollLimitReached { attempts: u32 },

    #[error("report polling cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}
