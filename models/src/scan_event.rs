use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attendance_record::AttendanceStatus;

/// Append-only audit row for a single scan. Unresolved scans are kept too,
/// with no member and no status, so operators can review failed reads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub code: String,
    pub scanned_at: DateTime<Utc>,
    pub roster_member_id: Option<Uuid>,
    pub status: Option<AttendanceStatus>,
}

impl ScanEvent {
    #[inline]
    pub fn resolved(&self) -> bool {
        self.roster_member_id.is_some()
    }
}
