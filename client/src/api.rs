//! Traits describing the remote platform API this console consumes. The
//! production implementation is [`crate::http::HttpAttendanceApi`]; tests
//! substitute scripted fakes.

use uuid::Uuid;

use crate::error::ClientError;
use crate::payload::{
    CreateSessionRequest, ReportRequest, ReportStatusResponse, ReportSubmitResponse,
    SessionDetailPayload, SessionPayload,
};
use models::attendance_record::{AttendanceRecord, AttendanceStatus};
use models::attendance_session::AttendanceSession;
use models::roster_member::RosterMember;

/// Session, roster, and record operations.
#[allow(async_fn_in_trait)]
pub trait AttendanceApi {
    async fn create_session(
        &self,
        req: &CreateSessionRequest,
    ) -> Result<AttendanceSession, ClientError>;

    async fn list_sessions(&self, course_id: Uuid) -> Result<Vec<SessionPayload>, ClientError>;

    async fn get_session(&self, session_id: Uuid) -> Result<SessionDetailPayload, ClientError>;

    async fn get_roster(&self, course_id: Uuid) -> Result<Vec<RosterMember>, ClientError>;

    /// Persist the full record set for a session. The server rejects this
    /// once the session is closed.
    async fn save_records(
        &self,
        session_id: Uuid,
        records: &[AttendanceRecord],
    ) -> Result<(), ClientError>;

    async fn submit_scan(
        &self,
        session_id: Uuid,
        code: &str,
        status: Option<AttendanceStatus>,
    ) -> Result<AttendanceRecord, ClientError>;

    async fn close_session(&self, session_id: Uuid) -> Result<AttendanceSession, ClientError>;

    /// Deletes the session and all of its records, whatever its status.
    async fn delete_session(&self, session_id: Uuid) -> Result<(), ClientError>;
}

/// Report generation: submit once, then poll by id.
#[allow(async_fn_in_trait)]
pub trait ReportApi {
    async fn submit_report(
        &self,
        req: &ReportRequest,
    ) -> Result<ReportSubmitResponse, ClientError>;

    async fn report_status(&self, report_id: &str) -> Result<ReportStatusResponse, ClientError>;
}
