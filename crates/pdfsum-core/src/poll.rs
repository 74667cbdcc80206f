//! Bounded wait for a submitted document to leave the `pending` state.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, SummaryApi};
use crate::model::{DocumentDetail, SummaryStatus};
use crate::normalize::normalize_detail;

/// Fixed-interval retry budget for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before every attempt, including the first.
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 30,
        }
    }
}

/// Progress reported to the caller while polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// About to wait before attempt `attempt`.
    Waiting { attempt: u32, max_attempts: u32 },
    /// Attempt `attempt` answered with `status`.
    Checked {
        attempt: u32,
        status: Option<SummaryStatus>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The summary left `pending`; `detail` is the response that said so.
    Resolved {
        detail: DocumentDetail,
        attempts: u32,
    },
    /// Every attempt answered `pending` (or no status).
    Exhausted { attempts: u32 },
    /// A non-OK or non-JSON response ended the loop early.
    Aborted { attempts: u32, reason: ApiError },
    Cancelled { attempts: u32 },
}

impl PollOutcome {
    /// Detail GETs issued before the loop ended.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Resolved { attempts, .. }
            | Self::Exhausted { attempts }
            | Self::Aborted { attempts, .. }
            | Self::Cancelled { attempts } => *attempts,
        }
    }

    pub fn into_detail(self) -> Option<DocumentDetail> {
        match self {
            Self::Resolved { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

/// Poll `GET /api/pdfs/{id}` until the summary status is present and not
/// `pending`.
///
/// Each attempt sleeps `interval` first. A bad status or a non-JSON body
/// stops the loop without error; a transport or decode failure is returned
/// as `Err`.
pub async fn poll_until_resolved(
    api: &dyn SummaryApi,
    id: &str,
    config: PollConfig,
    cancel: &CancellationToken,
    mut on_event: impl FnMut(PollEvent),
) -> Result<PollOutcome, ApiError> {
    for attempt in 1..=config.max_attempts {
        on_event(PollEvent::Waiting {
            attempt,
            max_attempts: config.max_attempts,
        });

        tokio::select! {
            _ = cancel.cancelled() => {
                return Ok(PollOutcome::Cancelled { attempts: attempt - 1 });
            }
            _ = tokio::time::sleep(config.interval) => {}
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Ok(PollOutcome::Cancelled { attempts: attempt });
            }
            r = api.get_document(id) => r,
        };

        match response {
            Ok(payload) => {
                let status = payload.status().cloned();
                tracing::debug!(id, attempt, status = ?status, "poll attempt");
                on_event(PollEvent::Checked {
                    attempt,
                    status: status.clone(),
                });
                if status.is_some_and(|s| !s.is_pending()) {
                    return Ok(PollOutcome::Resolved {
                        detail: normalize_detail(payload),
                        attempts: attempt,
                    });
                }
            }
            Err(reason @ (ApiError::Status { .. } | ApiError::NotJson { .. })) => {
                tracing::warn!(id, attempt, error = %reason, "poll stopped early");
                return Ok(PollOutcome::Aborted {
                    attempts: attempt,
                    reason,
                });
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(id, attempts = config.max_attempts, "poll budget exhausted");
    Ok(PollOutcome::Exhausted {
        attempts: config.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{MockApi, detail};

    #[tokio::test(start_paused = true)]
    async fn first_attempt_waits_one_interval() {
        let api = MockApi::new();
        let start = tokio::time::Instant::now();
        let outcome = poll_until_resolved(
            &api,
            "doc-1",
            PollConfig::default(),
            &CancellationToken::new(),
            |_| {},
        )
        .await
        .unwrap();
        assert_eq!(outcome.attempts(), 1);
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_status_keeps_polling() {
        let blank = crate::model::DetailPayload::Wrapped {
            file: Default::default(),
            summary: None,
        };
        let api = MockApi::new().with_detail_sequence(vec![
            Ok(blank),
            Ok(detail("doc-1", SummaryStatus::Failed)),
        ]);
        let outcome = poll_until_resolved(
            &api,
            "doc-1",
            PollConfig::default(),
            &CancellationToken::new(),
            |_| {},
        )
        .await
        .unwrap();
        assert_eq!(outcome.attempts(), 2);
        let detail = outcome.into_detail().unwrap();
        assert_eq!(detail.summary.status, Some(SummaryStatus::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_first_request() {
        let api = MockApi::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome =
            poll_until_resolved(&api, "doc-1", PollConfig::default(), &cancel, |_| {})
                .await
                .unwrap();
        assert_eq!(outcome, PollOutcome::Cancelled { attempts: 0 });
        assert_eq!(api.detail_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_error_is_returned() {
        let api = MockApi::new().with_detail(Err(ApiError::Transport("connection refused".into())));
        let err = poll_until_resolved(
            &api,
            "doc-1",
            PollConfig::default(),
            &CancellationToken::new(),
            |_| {},
        )
        .await
        .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(api.detail_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn events_report_each_attempt() {
        let api = MockApi::new().with_detail_sequence(vec![
            Ok(detail("doc-1", SummaryStatus::Pending)),
            Ok(detail("doc-1", SummaryStatus::Success)),
        ]);
        let mut events = Vec::new();
        poll_until_resolved(
            &api,
            "doc-1",
            PollConfig::default(),
            &CancellationToken::new(),
            |e| events.push(e),
        )
        .await
        .unwrap();
        assert_eq!(
            events,
            vec![
                PollEvent::Waiting {
                    attempt: 1,
                    max_attempts: 30
                },
                PollEvent::Checked {
                    attempt: 1,
                    status: Some(SummaryStatus::Pending)
                },
                PollEvent::Waiting {
                    attempt: 2,
                    max_attempts: 30
                },
                PollEvent::Checked {
                    attempt: 2,
                    status: Some(SummaryStatus::Success)
                },
            ]
        );
    }
}
