use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::api::{AttendanceApi, ReportApi};
use crate::error::ClientError;
use crate::payload::{
    ApiErrorBody, CreateSessionRequest, RecordPayload, ReportRequest, ReportStatusResponse,
    ReportSubmitResponse, RosterMemberPayload, SaveRecordsRequest, ScanRequest,
    SessionDetailPayload, SessionPayload,
};
use common::config::Config;
use models::attendance_record::{AttendanceRecord, AttendanceStatus};
use models::attendance_session::AttendanceSession;
use models::roster_member::RosterMember;

/// `reqwest`-backed implementation of the platform API.
pub struct HttpAttendanceApi {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpAttendanceApi {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!("rollcall-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::Transport(format!("bad base url: {e}")))?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url,
            config.api_token.clone(),
            Duration::from_secs(config.http_timeout_seconds),
        )
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::Transport(format!("bad request path '{path}': {e}")))?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Decode a 2xx body, or map the API's `{"error": ...}` shape into
    /// [`ClientError::Api`].
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Like [`Self::decode`] but the body is irrelevant on success.
    async fn expect_ok(response: Response) -> Result<(), ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl AttendanceApi for HttpAttendanceApi {
    async fn create_session(
        &self,
        req: &CreateSessionRequest,
    ) -> Result<AttendanceSession, ClientError> {
        let response = self
            .request(Method::POST, "attendance/sessions")?
            .json(req)
            .send()
            .await?;
        let payload: SessionPayload = Self::decode(response).await?;
        Ok(payload.into())
    }

    async fn list_sessions(&self, course_id: Uuid) -> Result<Vec<SessionPayload>, ClientError> {
        let response = self
            .request(Method::GET, &format!("courses/{course_id}/attendance/sessions"))?
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_session(&self, session_id: Uuid) -> Result<SessionDetailPayload, ClientError> {
        let response = self
            .request(Method::GET, &format!("attendance/sessions/{session_id}"))?
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_roster(&self, course_id: Uuid) -> Result<Vec<RosterMember>, ClientError> {
        let response = self
            .request(Method::GET, &format!("courses/{course_id}/roster"))?
            .send()
            .await?;
        let members: Vec<RosterMemberPayload> = Self::decode(response).await?;
        Ok(members.into_iter().map(RosterMember::from).collect())
    }

    async fn save_records(
        &self,
        session_id: Uuid,
        records: &[AttendanceRecord],
    ) -> Result<(), ClientError> {
        let body = SaveRecordsRequest {
            records: records.iter().map(RecordPayload::from).collect(),
        };
        let response = self
            .request(
                Method::POST,
                &format!("attendance/sessions/{session_id}/records"),
            )?
            .json(&body)
            .send()
            .await?;
        Self::expect_ok(response).await
    }

    async fn submit_scan(
        &self,
        session_id: Uuid,
        code: &str,
        status: Option<AttendanceStatus>,
    ) -> Result<AttendanceRecord, ClientError> {
        let response = self
            .request(
                Method::POST,
                &format!("attendance/sessions/{session_id}/scan"),
            )?
            .json(&ScanRequest { code, status })
            .send()
            .await?;
        let payload: RecordPayload = Self::decode(response).await?;
        Ok(payload.into_record(session_id))
    }

    async fn close_session(&self, session_id: Uuid) -> Result<AttendanceSession, ClientError> {
        let response = self
            .request(
                Method::POST,
                &format!("attendance/sessions/{session_id}/close"),
            )?
            .send()
            .await?;
        let payload: SessionPayload = Self::decode(response).await?;
        Ok(payload.into())
    }

    async fn delete_session(&self, session_id: Uuid) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("attendance/sessions/{session_id}"))?
            .send()
            .await?;
        Self::expect_ok(response).await
    }
}

impl ReportApi for HttpAttendanceApi {
    async fn submit_report(
        &self,
        req: &ReportRequest,
    ) -> Result<ReportSubmitResponse, ClientError> {
        let response = self
            .request(Method::POST, "reports/generate")?
            .json(req)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn report_status(&self, report_id: &str) -> Result<ReportStatusResponse, ClientError> {
        let response = self
            .request(Method::GET, &format!("reports/{report_id}/status"))?
            .send()
            .await?;
        Self::decode(response).await
    }
}
