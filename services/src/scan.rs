use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::AttendanceError;
use models::attendance_record::{AttendanceRecord, AttendanceStatus, RecordSource};
use models::attendance_session::AttendanceSession;
use models::roster_member::RosterMember;
use models::scan_event::ScanEvent;

/// The mutation a successful scan would apply, computed without applying it.
/// Callers can run a remote submit between resolution and application; a
/// failure in between leaves the record map untouched.
#[derive(Debug, Clone)]
pub struct ScanResolution {
    pub member_id: Uuid,
    pub record: AttendanceRecord,
    pub event: ScanEvent,
    /// True when a deliberate record (anything but the reconciliation
    /// default) already existed for this member: a re-affirmation rather
    /// than a new check-in.
    pub repeat: bool,
}

/// Resolve a raw scanned code against the roster and the current record map.
///
/// Lookup is an exact match on card or admission number. Unknown codes and
/// closed sessions both fail without producing a resolution; re-scans of an
/// already-marked member resolve normally (the audit trail grows, the record
/// does not multiply).
pub fn resolve(
    session: &AttendanceSession,
    roster: &[RosterMember],
    records: &BTreeMap<Uuid, AttendanceRecord>,
    code: &str,
    status: Option<AttendanceStatus>,
    now: DateTime<Utc>,
) -> Result<ScanResolution, AttendanceError> {
    let code = code.trim();

    let Some(member) = roster.iter().find(|m| m.matches_code(code)) else {
        return Err(AttendanceError::UnresolvedScan {
            code: code.to_owned(),
        });
    };

    if !session.is_open() {
        return Err(AttendanceError::SessionClosed {
            session_id: session.id,
        });
    }

    let status = status.unwrap_or(AttendanceStatus::Present);
    let repeat = records
        .get(&member.id)
        .is_some_and(|r| r.source != RecordSource::ManualDefault);

    let record = AttendanceRecord {
        session_id: session.id,
        roster_member_id: member.id,
        status,
        note: None,
        source: RecordSource::Scan,
        marked_at: now,
    };
    let event = ScanEvent {
        code: code.to_owned(),
        scanned_at: now,
        roster_member_id: Some(member.id),
        status: Some(status),
    };

    Ok(ScanResolution {
        member_id: member.id,
        record,
        event,
        repeat,
    })
}
