use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportJobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ReportJobStatus {
    /// Terminal states stop polling permanently.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportJobStatus::Completed | ReportJobStatus::Failed)
    }
}

/// Server-side report generation task, observed only through polling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportJob {
    pub report_id: String,
    pub status: ReportJobStatus,
    pub progress: u8,
    pub download_url: Option<String>,
    pub error_message: Option<String>,
}
