//! Wire shapes for the platform API, with conversions into the domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::attendance_record::{AttendanceRecord, AttendanceStatus, RecordSource};
use models::attendance_session::{AttendanceSession, SessionMethod, SessionStatus};
use models::report_job::ReportJobStatus;
use models::roster_member::RosterMember;
use services::params::CreateSessionParams;

// ---------------------------
// Sessions and records
// ---------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub course_id: Uuid,
    pub session_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_title: Option<String>,
    pub method: SessionMethod,
}

impl From<CreateSessionParams> for CreateSessionRequest {
    fn from(p: CreateSessionParams) -> Self {
        Self {
            course_id: p.course_id,
            session_date: p.session_date,
            session_title: p.title,
            method: p.method,
        }
    }
}

/// A session as the API returns it, including the derived counters the
/// session list displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPayload {
    pub id: Uuid,
    pub course_id: Uuid,
    pub session_date: NaiveDate,
    #[serde(default)]
    pub session_title: Option<String>,
    pub method: SessionMethod,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub present_count: Option<u32>,
    #[serde(default)]
    pub absent_count: Option<u32>,
}

impl From<SessionPayload> for AttendanceSession {
    fn from(p: SessionPayload) -> Self {
        Self {
            id: p.id,
            course_id: p.course_id,
            session_date: p.session_date,
            title: p.session_title,
            method: p.method,
            status: p.status,
            created_at: p.created_at,
        }
    }
}

impl From<AttendanceSession> for SessionPayload {
    fn from(s: AttendanceSession) -> Self {
        Self {
            id: s.id,
            course_id: s.course_id,
            session_date: s.session_date,
            session_title: s.title,
            method: s.method,
            status: s.status,
            created_at: s.created_at,
            present_count: None,
            absent_count: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPayload {
    pub course_student_id: Uuid,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub note: Option<String>,
    pub source: RecordSource,
    pub marked_at: DateTime<Utc>,
}

impl RecordPayload {
    pub fn into_record(self, session_id: Uuid) -> AttendanceRecord {
        AttendanceRecord {
            session_id,
            roster_member_id: self.course_student_id,
            status: self.status,
            note: self.note,
            source: self.source,
            marked_at: self.marked_at,
        }
    }
}

impl From<&AttendanceRecord> for RecordPayload {
    fn from(r: &AttendanceRecord) -> Self {
        Self {
            course_student_id: r.roster_member_id,
            status: r.status,
            note: r.note.clone(),
            source: r.source,
            marked_at: r.marked_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionDetailPayload {
    #[serde(flatten)]
    pub session: SessionPayload,
    #[serde(default)]
    pub records: Vec<RecordPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMemberPayload {
    pub id: Uuid,
    pub full_name: String,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub admission_no: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
}

impl From<RosterMemberPayload> for RosterMember {
    fn from(p: RosterMemberPayload) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            father_name: p.father_name,
            admission_no: p.admission_no,
            card_number: p.card_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaveRecordsRequest {
    pub records: Vec<RecordPayload>,
}

#[derive(Debug, Serialize)]
pub struct ScanRequest<'a> {
    pub code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
}

/// Error body the API uses on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

// ---------------------------
// Reports
// ---------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportVariant {
    Totals,
    ClassWise,
    RoomWise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarPreference {
    Gregorian,
    Jalali,
    Qamari,
}

/// What the console actually submits for a report run: the document kind plus
/// the active filter panel.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    pub report_type: String,
    pub report_variant: ReportVariant,
    pub branding_id: Uuid,
    pub calendar_preference: CalendarPreference,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_year_id: Option<Uuid>,
}

/// Submission outcome: a synchronous result, an async job id, or neither.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub report_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportStatusResponse {
    pub success: bool,
    #[serde(default)]
    pub status: Option<ReportJobStatus>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
