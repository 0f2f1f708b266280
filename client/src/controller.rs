use chrono::Utc;
use uuid::Uuid;

use crate::api::AttendanceApi;
use crate::error::ClientError;
use crate::payload::{CreateSessionRequest, SessionPayload};
use models::attendance_record::AttendanceStatus;
use models::attendance_session::AttendanceSession;
use services::params::CreateSessionParams;
use services::scan::ScanResolution;
use services::session::SessionWorkingSet;

/// Drives one operator's attendance flows against the remote API, owning the
/// ordering rules: resolve before submitting, persist before applying, save
/// before closing.
pub struct SessionController<A> {
    api: A,
}

impl<A: AttendanceApi> SessionController<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn open_session(
        &self,
        params: CreateSessionParams,
    ) -> Result<AttendanceSession, ClientError> {
        let params = params.validated()?;
        let session = self
            .api
            .create_session(&CreateSessionRequest::from(params))
            .await?;
        log::info!(
            "created attendance session {} for course {}",
            session.id,
            session.course_id
        );
        Ok(session)
    }

    pub async fn sessions(&self, course_id: Uuid) -> Result<Vec<SessionPayload>, ClientError> {
        self.api.list_sessions(course_id).await
    }

    /// Fetch the session with its records plus the course roster, and
    /// reconcile them into a working set.
    pub async fn load(&self, session_id: Uuid) -> Result<SessionWorkingSet, ClientError> {
        let detail = self.api.get_session(session_id).await?;
        let roster = self.api.get_roster(detail.session.course_id).await?;

        let session: AttendanceSession = detail.session.into();
        let records = detail
            .records
            .into_iter()
            .map(|r| r.into_record(session_id))
            .collect();

        Ok(SessionWorkingSet::hydrate(
            session,
            roster,
            records,
            Utc::now(),
        ))
    }

    /// One pass of the scan loop: resolve the code locally, persist the
    /// check-in, then apply it to the working set. Unknown codes never reach
    /// the network; a transport failure applies nothing.
    pub async fn scan(
        &self,
        ws: &mut SessionWorkingSet,
        code: &str,
        status: Option<AttendanceStatus>,
    ) -> Result<ScanResolution, ClientError> {
        let resolution = ws.resolve_scan(code, status, Utc::now())?;
        self.api
            .submit_scan(ws.session().id, code.trim(), status)
            .await?;
        ws.apply_scan(resolution.clone());
        Ok(resolution)
    }

    /// Persist the full record set and clear the dirty flag.
    pub async fn save(&self, ws: &mut SessionWorkingSet) -> Result<(), ClientError> {
        let payload = ws.save_payload()?;
        self.api.save_records(ws.session().id, &payload).await?;
        ws.mark_saved();
        log::info!(
            "saved {} attendance records for session {}",
            payload.len(),
            ws.session().id
        );
        Ok(())
    }

    /// Close the session. Pending edits must be saved first; the local
    /// transition happens only after the remote close succeeds.
    pub async fn close(&self, ws: &mut SessionWorkingSet) -> Result<(), ClientError> {
        ws.ensure_closeable()?;
        self.api.close_session(ws.session().id).await?;
        ws.close()?;
        Ok(())
    }

    /// Delete a session and everything in it, whatever its status.
    pub async fn delete(&self, session_id: Uuid) -> Result<(), ClientError> {
        self.api.delete_session(session_id).await?;
        log::info!("deleted attendance session {session_id}");
        Ok(())
    }
}
