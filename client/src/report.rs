use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::api::ReportApi;
use crate::error::ClientError;
use crate::payload::ReportRequest;
use common::config::Config;
use models::report_job::ReportJobStatus;

#[derive(Debug, Clone, Copy)]
pub struct ReportPollerOptions {
    /// Delay between consecutive status checks.
    pub interval: Duration,
    /// Upper bound on status checks before giving up on a stuck job.
    pub max_attempts: u32,
}

impl Default for ReportPollerOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 300,
        }
    }
}

impl ReportPollerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: Duration::from_millis(config.report_poll_interval_ms),
            max_attempts: config.report_poll_max_attempts,
        }
    }
}

/// Snapshot published to the progress channel after every status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportProgress {
    pub status: ReportJobStatus,
    pub percent: u8,
}

/// Drives a report-generation request to a terminal state.
///
/// A submission that completes synchronously returns at once; otherwise the
/// job is polled strictly sequentially, one in-flight status request at a
/// time, until it completes, fails, errors, is cancelled, or exhausts the
/// attempt budget.
pub struct ReportPoller<A> {
    api: A,
    opts: ReportPollerOptions,
}

impl<A: ReportApi> ReportPoller<A> {
    pub fn new(api: A) -> Self {
        Self::with_options(api, ReportPollerOptions::default())
    }

    pub fn with_options(api: A, opts: ReportPollerOptions) -> Self {
        Self { api, opts }
    }

    /// Submit the request and wait for a download url.
    ///
    /// Observed progress is published through `progress` (monotonically
    /// non-decreasing; the channel may be dropped freely). Cancelling
    /// `cancel` stops the loop between awaits — no status request fires
    /// after cancellation.
    pub async fn generate(
        &self,
        request: &ReportRequest,
        progress: Option<&watch::Sender<ReportProgress>>,
        cancel: &CancellationToken,
    ) -> Result<String, ClientError> {
        let submitted = self.api.submit_report(request).await?;

        if submitted.success {
            if let Some(url) = submitted.download_url {
                // Completed synchronously; nothing to poll.
                return Ok(url);
            }
            if let Some(report_id) = submitted.report_id {
                log::info!("report {report_id} queued, polling for completion");
                return self.poll(&report_id, progress, cancel).await;
            }
        }

        Err(ClientError::ReportGeneration(
            submitted
                .error
                .unwrap_or_else(|| "response carried neither a result nor a job id".into()),
        ))
    }

    async fn poll(
        &self,
        report_id: &str,
        progress: Option<&watch::Sender<ReportProgress>>,
        cancel: &CancellationToken,
    ) -> Result<String, ClientError> {
        let mut observed: u8 = 0;

        for attempt in 1..=self.opts.max_attempts {
            if cancel.is_cancelled() {
                return Err(ClientError::Cancelled);
            }

            // Status fetch errors stop the loop; there is no retry policy.
            let status = self.api.report_status(report_id).await?;
            if !status.success {
                return Err(ClientError::ReportFailed(
                    status
                        .error
                        .unwrap_or_else(|| "status endpoint reported failure".into()),
                ));
            }
            let job_status = status.status.ok_or_else(|| {
                ClientError::ReportGeneration("status response carried no job state".into())
            })?;

            observed = observed.max(status.progress.unwrap_or(0).min(100));
            if let Some(tx) = progress {
                let _ = tx.send(ReportProgress {
                    status: job_status,
                    percent: observed,
                });
            }

            match job_status {
                ReportJobStatus::Completed => {
                    return status.download_url.ok_or_else(|| {
                        ClientError::ReportGeneration("completed report carried no download url".into())
                    });
                }
                ReportJobStatus::Failed => {
                    return Err(ClientError::ReportFailed(
                        status
                            .error_message
                            .unwrap_or_else(|| "report job failed".into()),
                    ));
                }
                ReportJobStatus::Pending | ReportJobStatus::Processing => {
                    log::debug!(
                        "report {report_id}: {job_status} at {observed}% (check {attempt}/{})",
                        self.opts.max_attempts
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                        _ = tokio::time::sleep(self.opts.interval) => {}
                    }
                }
            }
        }

        Err(ClientError::PollLimitReached {
            attempts: self.opts.max_attempts,
        })
    }
}
