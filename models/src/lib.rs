pub mod attendance_record;
pub mod attendance_session;
pub mod report_job;
pub mod roster_member;
pub mod scan_event;
