use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the in-memory attendance core. Each one is terminal for
/// the single operation that raised it; none leaves the record map partially
/// mutated.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("no roster member matches code '{code}'")]
    UnresolvedScan { code: String },

    #[error("attendance session {session_id} is closed")]
    SessionClosed { session_id: Uuid },

    #[error("attendance session {session_id} has unsaved edits; save before closing")]
    UnsavedChanges { session_id: Uuid },

    #[error("roster member {member_id} is not enrolled in this course")]
    UnknownMember { member_id: Uuid },

    #[error("{0}")]
    Validation(String),
}
