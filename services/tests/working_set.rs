#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    use models::attendance_record::{AttendanceRecord, AttendanceStatus, RecordSource};
    use models::attendance_session::{AttendanceSession, SessionMethod, SessionStatus};
    use models::roster_member::RosterMember;
    use services::error::AttendanceError;
    use services::session::SessionWorkingSet;

    // ---------------------------
    // Shared setup
    // ---------------------------

    fn ts(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 8, 10, 0, secs).unwrap()
    }

    fn member(name: &str, card: Option<&str>, admission: Option<&str>) -> RosterMember {
        RosterMember {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            father_name: None,
            admission_no: admission.map(str::to_owned),
            card_number: card.map(str::to_owned),
        }
    }

    fn open_session() -> AttendanceSession {
        AttendanceSession {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            session_date: ts(0).date_naive(),
            title: Some("Day 1".into()),
            method: SessionMethod::Mixed,
            status: SessionStatus::Open,
            created_at: ts(0),
        }
    }

    fn trio() -> Vec<RosterMember> {
        vec![
            member("Ahmad", Some("CARD-A"), Some("ADM-001")),
            member("Bilal", Some("CARD-B"), Some("ADM-002")),
            member("Celine", None, Some("ADM-003")),
        ]
    }

    fn hydrate(roster: &[RosterMember], existing: Vec<AttendanceRecord>) -> SessionWorkingSet {
        SessionWorkingSet::hydrate(open_session(), roster.to_vec(), existing, ts(0))
    }

    // ---------------------------
    // Reconciliation
    // ---------------------------

    #[test]
    fn hydrate_covers_every_member_with_absent_defaults() {
        let roster = trio();
        let ws = hydrate(&roster, vec![]);

        assert_eq!(ws.records().len(), 3);
        for m in &roster {
            let record = ws.record(m.id).expect("every member mapped");
            assert_eq!(record.status, AttendanceStatus::Absent);
            assert_eq!(record.source, RecordSource::ManualDefault);
            assert_eq!(record.note, None);
        }
        assert!(!ws.is_dirty());
    }

    #[test]
    fn hydrate_keeps_existing_records_untouched() {
        let roster = trio();
        let session = open_session();
        let existing = vec![AttendanceRecord {
            session_id: session.id,
            roster_member_id: roster[1].id,
            status: AttendanceStatus::Late,
            note: Some("arrived 10:20".into()),
            source: RecordSource::ManualEdit,
            marked_at: ts(5),
        }];
        let ws = SessionWorkingSet::hydrate(session, roster.clone(), existing, ts(9));

        let kept = ws.record(roster[1].id).unwrap();
        assert_eq!(kept.status, AttendanceStatus::Late);
        assert_eq!(kept.source, RecordSource::ManualEdit);
        assert_eq!(kept.note.as_deref(), Some("arrived 10:20"));
        assert_eq!(kept.marked_at, ts(5));
    }

    #[test]
    fn hydrate_drops_records_for_unenrolled_members() {
        let roster = trio();
        let session = open_session();
        let stray = AttendanceRecord {
            session_id: session.id,
            roster_member_id: Uuid::new_v4(),
            status: AttendanceStatus::Present,
            note: None,
            source: RecordSource::Scan,
            marked_at: ts(1),
        };
        let ws = SessionWorkingSet::hydrate(session, roster.clone(), vec![stray], ts(2));

        assert_eq!(ws.records().len(), 3);
        assert!(roster.iter().all(|m| ws.record(m.id).is_some()));
    }

    // ---------------------------
    // Manual edits and mark-all
    // ---------------------------

    #[test]
    fn mark_all_present_is_total() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);

        ws.set_status(roster[0].id, AttendanceStatus::Sick, ts(1)).unwrap();
        ws.set_note(roster[0].id, Some("flu".into()), ts(1)).unwrap();

        ws.mark_all(AttendanceStatus::Present, ts(2)).unwrap();
        assert_eq!(ws.records().len(), 3);
        for m in &roster {
            let record = ws.record(m.id).unwrap();
            assert_eq!(record.status, AttendanceStatus::Present);
            assert_eq!(record.source, RecordSource::ManualEdit);
            assert_eq!(record.note, None, "mark-all discards notes");
        }

        ws.mark_all(AttendanceStatus::Absent, ts(3)).unwrap();
        assert!(ws.records().values().all(|r| r.status == AttendanceStatus::Absent));
    }

    #[test]
    fn set_status_rejects_members_outside_the_roster() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);
        let err = ws
            .set_status(Uuid::new_v4(), AttendanceStatus::Present, ts(1))
            .unwrap_err();
        assert!(matches!(err, AttendanceError::UnknownMember { .. }));
    }

    #[test]
    fn summary_tracks_the_record_map() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);
        assert_eq!(ws.summary().absent, 3);

        ws.set_status(roster[0].id, AttendanceStatus::Present, ts(1)).unwrap();
        ws.set_status(roster[1].id, AttendanceStatus::Late, ts(1)).unwrap();

        let summary = ws.summary();
        assert_eq!(summary.present, 1);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.absent, 1);
    }

    // ---------------------------
    // Scanning
    // ---------------------------

    #[test]
    fn scan_checks_in_a_member() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);

        let resolution = ws.scan("CARD-B", None, ts(10)).unwrap();
        assert_eq!(resolution.member_id, roster[1].id);
        assert!(!resolution.repeat);

        let record = ws.record(roster[1].id).unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.source, RecordSource::Scan);
        assert_eq!(ws.scan_log().len(), 1);
        assert_eq!(ws.scan_log()[0].roster_member_id, Some(roster[1].id));
    }

    #[test]
    fn rescan_is_idempotent_but_still_audited() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);

        let first = ws.scan("CARD-B", None, ts(10)).unwrap();
        let second = ws.scan("CARD-B", None, ts(20)).unwrap();
        assert!(!first.repeat);
        assert!(second.repeat, "second pass re-affirms an existing check-in");

        // one record, two audit rows
        let present = ws
            .records()
            .values()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count();
        assert_eq!(present, 1);
        assert_eq!(ws.scan_log().len(), 2);
    }

    #[test]
    fn scan_resolves_admission_numbers_too() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);

        // Celine has no card, only an admission number; whitespace is trimmed.
        ws.scan("  ADM-003  ", None, ts(10)).unwrap();
        assert_eq!(
            ws.record(roster[2].id).unwrap().status,
            AttendanceStatus::Present
        );
        assert_eq!(ws.scan_log()[0].code, "ADM-003");
    }

    #[test]
    fn scan_can_carry_an_explicit_status() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);

        ws.scan("CARD-A", Some(AttendanceStatus::Late), ts(10)).unwrap();
        assert_eq!(ws.record(roster[0].id).unwrap().status, AttendanceStatus::Late);
        assert_eq!(ws.scan_log()[0].status, Some(AttendanceStatus::Late));
    }

    #[test]
    fn unknown_code_is_audited_but_creates_nothing() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);
        let before = ws.records().clone();

        let err = ws.scan("NO-SUCH-CARD", None, ts(10)).unwrap_err();
        assert!(matches!(err, AttendanceError::UnresolvedScan { .. }));

        assert_eq!(ws.records(), &before, "record map untouched");
        assert_eq!(ws.scan_log().len(), 1);
        assert_eq!(ws.scan_log()[0].roster_member_id, None);
        assert_eq!(ws.scan_log()[0].status, None);
    }

    #[test]
    fn recent_scans_lists_newest_first() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);

        ws.scan("CARD-A", None, ts(10)).unwrap();
        ws.scan("CARD-B", None, ts(20)).unwrap();
        ws.scan("ADM-003", None, ts(30)).unwrap();

        let recent = ws.recent_scans(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].code, "ADM-003");
        assert_eq!(recent[1].code, "CARD-B");
    }

    // ---------------------------
    // Lifecycle
    // ---------------------------

    #[test]
    fn close_requires_edits_to_be_saved_first() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);

        ws.set_status(roster[0].id, AttendanceStatus::Present, ts(1)).unwrap();
        let err = ws.close().unwrap_err();
        assert!(matches!(err, AttendanceError::UnsavedChanges { .. }));
        assert_eq!(ws.session().status, SessionStatus::Open);

        let payload = ws.save_payload().unwrap();
        assert_eq!(payload.len(), 3);
        ws.mark_saved();
        ws.close().unwrap();
        assert_eq!(ws.session().status, SessionStatus::Closed);
    }

    #[test]
    fn closed_session_rejects_every_mutation() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);
        ws.close().unwrap();
        let before = ws.records().clone();

        assert!(matches!(
            ws.scan("CARD-A", None, ts(10)).unwrap_err(),
            AttendanceError::SessionClosed { .. }
        ));
        assert!(matches!(
            ws.set_status(roster[0].id, AttendanceStatus::Present, ts(10)).unwrap_err(),
            AttendanceError::SessionClosed { .. }
        ));
        assert!(matches!(
            ws.mark_all(AttendanceStatus::Present, ts(10)).unwrap_err(),
            AttendanceError::SessionClosed { .. }
        ));
        assert!(matches!(
            ws.save_payload().unwrap_err(),
            AttendanceError::SessionClosed { .. }
        ));
        assert!(matches!(
            ws.close().unwrap_err(),
            AttendanceError::SessionClosed { .. }
        ));

        assert_eq!(ws.records(), &before);
        assert!(ws.scan_log().is_empty(), "rejected scans are not logged");
    }

    #[test]
    fn applied_scans_do_not_block_closing() {
        let roster = trio();
        let mut ws = hydrate(&roster, vec![]);

        // A scan that was persisted remotely arrives via resolve + apply and
        // leaves nothing pending.
        let resolution = ws.resolve_scan("CARD-B", None, ts(10)).unwrap();
        ws.apply_scan(resolution);
        assert!(!ws.is_dirty());
        ws.close().unwrap();
        assert_eq!(ws.session().status, SessionStatus::Closed);
    }

    // ---------------------------
    // Full scenario
    // ---------------------------

    #[test]
    fn full_session_flow() {
        let roster = trio();
        let (a, b, c) = (roster[0].id, roster[1].id, roster[2].id);
        let mut ws = hydrate(&roster, vec![]);

        // Reconcile: everyone starts absent.
        assert!(ws.records().values().all(|r| r.status == AttendanceStatus::Absent));

        // Scan B's card.
        ws.scan("CARD-B", None, ts(10)).unwrap();
        assert_eq!(ws.record(b).unwrap().status, AttendanceStatus::Present);
        assert_eq!(ws.scan_log().len(), 1);

        // Persist, then close.
        let saved = ws.save_payload().unwrap();
        assert_eq!(saved.len(), 3);
        ws.mark_saved();
        ws.close().unwrap();

        // A's scan bounces off the closed session; nothing moves.
        let err = ws.scan("CARD-A", None, ts(20)).unwrap_err();
        assert!(matches!(err, AttendanceError::SessionClosed { .. }));
        assert_eq!(ws.scan_log().len(), 1);

        assert_eq!(ws.record(a).unwrap().status, AttendanceStatus::Absent);
        assert_eq!(ws.record(b).unwrap().status, AttendanceStatus::Present);
        assert_eq!(ws.record(c).unwrap().status, AttendanceStatus::Absent);
    }
}
