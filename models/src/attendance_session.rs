use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Lifecycle state of a session. One-way: `open` -> `closed`, never back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    Open,
    Closed,
}

/// How the operator intends to take attendance. Advisory only; it does not
/// restrict which entry path is usable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionMethod {
    Manual,
    Barcode,
    Mixed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSession {
    pub id: Uuid,
    pub course_id: Uuid,
    pub session_date: NaiveDate,
    pub title: Option<String>,
    pub method: SessionMethod,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

impl AttendanceSession {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }
}
