use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use models::attendance_record::{AttendanceRecord, AttendanceStatus, RecordSource};
use models::roster_member::RosterMember;

/// Merge a course roster with whatever records already exist for a session,
/// producing a total map with one entry per enrolled member.
///
/// Members with an existing record keep it untouched; the rest get an
/// absent-by-default record. Records for ids no longer on the roster are
/// dropped, so the output is always a subset of the roster.
pub fn reconcile(
    session_id: Uuid,
    roster: &[RosterMember],
    existing: Vec<AttendanceRecord>,
    now: DateTime<Utc>,
) -> BTreeMap<Uuid, AttendanceRecord> {
    let mut by_member: BTreeMap<Uuid, AttendanceRecord> = existing
        .into_iter()
        .map(|r| (r.roster_member_id, r))
        .collect();

    roster
        .iter()
        .map(|member| {
            let record = by_member.remove(&member.id).unwrap_or(AttendanceRecord {
                session_id,
                roster_member_id: member.id,
                status: AttendanceStatus::Absent,
                note: None,
                source: RecordSource::ManualDefault,
                marked_at: now,
            });
            (member.id, record)
        })
        .collect()
}

/// "Mark all" replacement map: every member gets the given status, prior
/// notes and statuses are discarded.
pub fn bulk_override(
    session_id: Uuid,
    roster: &[RosterMember],
    status: AttendanceStatus,
    now: DateTime<Utc>,
) -> BTreeMap<Uuid, AttendanceRecord> {
    roster
        .iter()
        .map(|member| {
            (
                member.id,
                AttendanceRecord {
                    session_id,
                    roster_member_id: member.id,
                    status,
                    note: None,
                    source: RecordSource::ManualEdit,
                    marked_at: now,
                },
            )
        })
        .collect()
}
