use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

use crate::error::AttendanceError;
use crate::roster;
use crate::scan::{self, ScanResolution};
use models::attendance_record::{AttendanceRecord, AttendanceStatus, RecordSource};
use models::attendance_session::{AttendanceSession, SessionStatus};
use models::roster_member::RosterMember;
use models::scan_event::ScanEvent;

/// Per-status tallies derived from the live record map. Never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub excused: usize,
    pub sick: usize,
    pub leave: usize,
}

/// The single mutable owner of one session's attendance state: the roster,
/// the total record map, and the scan audit trail.
///
/// Every mutating operation gates on the session being open and either fully
/// applies or fully rejects. Manual edits accumulate in memory until the
/// caller persists them and calls [`SessionWorkingSet::mark_saved`].
#[derive(Debug)]
pub struct SessionWorkingSet {
    session: AttendanceSession,
    roster: Vec<RosterMember>,
    records: BTreeMap<Uuid, AttendanceRecord>,
    scan_log: Vec<ScanEvent>,
    dirty: bool,
}

impl SessionWorkingSet {
    /// Reconcile the roster against whatever records the server already has
    /// and take ownership of the result. Records for members no longer
    /// enrolled are dropped.
    pub fn hydrate(
        session: AttendanceSession,
        roster: Vec<RosterMember>,
        existing: Vec<AttendanceRecord>,
        now: DateTime<Utc>,
    ) -> Self {
        let enrolled: HashSet<Uuid> = roster.iter().map(|m| m.id).collect();
        let orphans = existing
            .iter()
            .filter(|r| !enrolled.contains(&r.roster_member_id))
            .count();
        if orphans > 0 {
            log::warn!(
                "session {}: dropping {orphans} records for members no longer on the roster",
                session.id
            );
        }

        let records = roster::reconcile(session.id, &roster, existing, now);
        Self {
            session,
            roster,
            records,
            scan_log: Vec::new(),
            dirty: false,
        }
    }

    pub fn session(&self) -> &AttendanceSession {
        &self.session
    }

    pub fn roster(&self) -> &[RosterMember] {
        &self.roster
    }

    pub fn records(&self) -> &BTreeMap<Uuid, AttendanceRecord> {
        &self.records
    }

    pub fn record(&self, member_id: Uuid) -> Option<&AttendanceRecord> {
        self.records.get(&member_id)
    }

    pub fn scan_log(&self) -> &[ScanEvent] {
        &self.scan_log
    }

    /// Newest-first slice of the audit trail, for the recent-scans feed.
    pub fn recent_scans(&self, limit: usize) -> Vec<&ScanEvent> {
        self.scan_log.iter().rev().take(limit).collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn summary(&self) -> AttendanceSummary {
        let mut out = AttendanceSummary::default();
        for record in self.records.values() {
            match record.status {
                AttendanceStatus::Present => out.present += 1,
                AttendanceStatus::Absent => out.absent += 1,
                AttendanceStatus::Late => out.late += 1,
                AttendanceStatus::Excused => out.excused += 1,
                AttendanceStatus::Sick => out.sick += 1,
                AttendanceStatus::Leave => out.leave += 1,
            }
        }
        out
    }

    fn ensure_open(&self) -> Result<(), AttendanceError> {
        if self.session.is_open() {
            Ok(())
        } else {
            Err(AttendanceError::SessionClosed {
                session_id: self.session.id,
            })
        }
    }

    fn ensure_enrolled(&self, member_id: Uuid) -> Result<(), AttendanceError> {
        if self.records.contains_key(&member_id) {
            Ok(())
        } else {
            Err(AttendanceError::UnknownMember { member_id })
        }
    }

    /// Manually set one member's status. Replaces any prior note, exactly
    /// like picking a status from the roster table does.
    pub fn set_status(
        &mut self,
        member_id: Uuid,
        status: AttendanceStatus,
        now: DateTime<Utc>,
    ) -> Result<(), AttendanceError> {
        self.ensure_open()?;
        self.ensure_enrolled(member_id)?;
        self.records.insert(
            member_id,
            AttendanceRecord {
                session_id: self.session.id,
                roster_member_id: member_id,
                status,
                note: None,
                source: RecordSource::ManualEdit,
                marked_at: now,
            },
        );
        self.dirty = true;
        Ok(())
    }

    /// Attach or clear a free-text note on one member's record.
    pub fn set_note(
        &mut self,
        member_id: Uuid,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), AttendanceError> {
        self.ensure_open()?;
        let Some(record) = self.records.get_mut(&member_id) else {
            return Err(AttendanceError::UnknownMember { member_id });
        };
        record.note = note;
        record.source = RecordSource::ManualEdit;
        record.marked_at = now;
        self.dirty = true;
        Ok(())
    }

    /// Bulk override: every roster member gets `status`, prior statuses and
    /// notes are discarded. Total, never partial.
    pub fn mark_all(
        &mut self,
        status: AttendanceStatus,
        now: DateTime<Utc>,
    ) -> Result<(), AttendanceError> {
        self.ensure_open()?;
        self.records = roster::bulk_override(self.session.id, &self.roster, status, now);
        self.dirty = true;
        Ok(())
    }

    /// Resolve a scanned code without applying it. Unresolved codes are
    /// appended to the audit trail (null member) before the error returns;
    /// scans against a closed session are rejected without logging.
    pub fn resolve_scan(
        &mut self,
        code: &str,
        status: Option<AttendanceStatus>,
        now: DateTime<Utc>,
    ) -> Result<ScanResolution, AttendanceError> {
        match scan::resolve(&self.session, &self.roster, &self.records, code, status, now) {
            Ok(resolution) => Ok(resolution),
            Err(err @ AttendanceError::UnresolvedScan { .. }) => {
                if self.session.is_open() {
                    self.scan_log.push(ScanEvent {
                        code: code.trim().to_owned(),
                        scanned_at: now,
                        roster_member_id: None,
                        status: None,
                    });
                }
                log::warn!("session {}: {err}", self.session.id);
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Apply a resolution produced by [`SessionWorkingSet::resolve_scan`]
    /// after it has been persisted elsewhere. Upserts the one record and
    /// appends the audit event; does not mark the set dirty.
    pub fn apply_scan(&mut self, resolution: ScanResolution) {
        self.records
            .insert(resolution.member_id, resolution.record);
        self.scan_log.push(resolution.event);
    }

    /// Resolve and apply in one step, for purely local scan handling. The
    /// result still needs a save to persist, so this marks the set dirty.
    pub fn scan(
        &mut self,
        code: &str,
        status: Option<AttendanceStatus>,
        now: DateTime<Utc>,
    ) -> Result<ScanResolution, AttendanceError> {
        let resolution = self.resolve_scan(code, status, now)?;
        self.apply_scan(resolution.clone());
        self.dirty = true;
        Ok(resolution)
    }

    /// The full record set for persistence. Rejected once the session is
    /// closed, like every other mutation path.
    pub fn save_payload(&self) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        self.ensure_open()?;
        Ok(self.records.values().cloned().collect())
    }

    /// Acknowledge that the current record set has been persisted.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Closing is only legal from `open` with nothing pending; edits are
    /// neither flushed nor discarded on the caller's behalf.
    pub fn ensure_closeable(&self) -> Result<(), AttendanceError> {
        self.ensure_open()?;
        if self.dirty {
            return Err(AttendanceError::UnsavedChanges {
                session_id: self.session.id,
            });
        }
        Ok(())
    }

    /// Transition `open` -> `closed`. Terminal; there is no reopen.
    pub fn close(&mut self) -> Result<(), AttendanceError> {
        self.ensure_closeable()?;
        self.session.status = SessionStatus::Closed;
        log::info!("session {} closed", self.session.id);
        Ok(())
    }
}
