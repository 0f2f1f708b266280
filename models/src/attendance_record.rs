use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
    Sick,
    Leave,
}

/// How a record came to exist: synthesized at reconciliation, edited by the
/// operator, or produced by a card scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RecordSource {
    ManualDefault,
    ManualEdit,
    Scan,
}

/// At most one record exists per (session, roster member) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub session_id: Uuid,
    pub roster_member_id: Uuid,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub source: RecordSource,
    pub marked_at: DateTime<Utc>,
}
