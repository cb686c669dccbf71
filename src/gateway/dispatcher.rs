// file: src/gateway/dispatcher.rs
// description: fire-and-forget worker pool for background index calls
// reference: https://docs.rs/tokio/latest/tokio/task/struct.JoinSet.html

use crate::config::{BackgroundConfig, FailurePolicy};
use crate::error::{GatewayError, Result};
use crate::mcp::McpClient;
use crate::utils::telemetry::background_span;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{Instrument, Level, debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexJob {
    pub request_id: Uuid,
    pub repo_url: String,
}

impl IndexJob {
    pub fn new(request_id: Uuid, repo_url: impl Into<String>) -> Self {
        Self {
            request_id,
            repo_url: repo_url.into(),
        }
    }
}

/// Sending half of the background queue. The worker task exits once every
/// clone has been dropped and the queued jobs have finished.
#[derive(Debug, Clone)]
pub struct BackgroundDispatcher {
    tx: mpsc::UnboundedSender<IndexJob>,
}

impl BackgroundDispatcher {
    /// `max_in_flight` caps concurrent outbound calls, not intake.
    pub fn spawn(client: Arc<McpClient>, config: &BackgroundConfig) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_dispatcher(
            client,
            rx,
            config.max_in_flight.max(1),
            config.failure_policy,
        ));
        (Self { tx }, handle)
    }

    /// Never waits; fails only once the worker task has stopped.
    pub fn submit(&self, job: IndexJob) -> Result<()> {
        self.tx.send(job).map_err(|mpsc::error::SendError(job)| {
            GatewayError::Dispatch(format!(
                "background worker has stopped, cannot index {}",
                job.repo_url
            ))
        })
    }
}

async fn run_dispatcher(
    client: Arc<McpClient>,
    mut rx: mpsc::UnboundedReceiver<IndexJob>,
    max_in_flight: usize,
    policy: FailurePolicy,
) {
    let semaphore = Arc::new(Semaphore::new(max_in_flight));
    let mut workers = JoinSet::new();

    while let Some(job) = rx.recv().await {
        let span = background_span(job.request_id, &job.repo_url);
        let worker_client = Arc::clone(&client);
        let worker_semaphore = Arc::clone(&semaphore);
        workers.spawn(
            async move {
                let Ok(_permit) = worker_semaphore.acquire_owned().await else {
                    return;
                };
                run_index_job(&worker_client, job, policy).await;
            }
            .instrument(span),
        );

        while let Some(result) = workers.try_join_next() {
            if let Err(e) = result {
                error!("background index worker crashed: {}", e);
            }
        }
    }

    debug!(in_flight = workers.len(), "background queue closed, draining");
    while let Some(result) = workers.join_next().await {
        if let Err(e) = result {
            error!("background index worker crashed: {}", e);
        }
    }
    info!("Background dispatcher stopped");
}

async fn run_index_job(client: &McpClient, job: IndexJob, policy: FailurePolicy) {
    match client.index_repository(&job.repo_url).await {
        Ok(_) => info!("Background indexing finished"),
        Err(e) => report_failure(policy, &e),
    }
}

fn report_failure(policy: FailurePolicy, err: &GatewayError) {
    let level = policy.level();
    if level == Level::ERROR {
        error!(error = %err, "Background indexing failed");
    } else if level == Level::WARN {
        warn!(error = %err, "Background indexing failed");
    } else {
        debug!(error = %err, "Background indexing failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::INDEX_REPOSITORY_PATH;
    use crate::utils::telemetry::capture::{CaptureLayer, Record};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn background(max_in_flight: usize, failure_policy: FailurePolicy) -> BackgroundConfig {
        BackgroundConfig {
            max_in_flight,
            failure_policy,
        }
    }

    fn unreachable_client() -> Arc<McpClient> {
        Arc::new(McpClient::with_base_url("http://127.0.0.1:1", Duration::from_secs(1)).unwrap())
    }

    /// Runs one failing job under `policy` and returns the captured failure events.
    async fn failure_events(policy: FailurePolicy) -> Vec<Record> {
        let capture = CaptureLayer::default();
        let _guard = capture.install();

        let (dispatcher, handle) =
            BackgroundDispatcher::spawn(unreachable_client(), &background(1, policy));
        let request_id = Uuid::new_v4();
        dispatcher
            .submit(IndexJob::new(request_id, "https://github.com/acme/widgets"))
            .unwrap();
        drop(dispatcher);
        tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .unwrap()
            .unwrap();

        let span = capture
            .spans()
            .into_iter()
            .find(|span| span.name == "background_index")
            .unwrap();
        assert_eq!(span.field("request_id"), Some(request_id.to_string().as_str()));

        capture
            .events()
            .into_iter()
            .filter(|event| event.field("message") == Some("Background indexing failed"))
            .collect()
    }

    #[tokio::test]
    async fn test_jobs_drain_after_dispatcher_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(INDEX_REPOSITORY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(3)
            .mount(&server)
            .await;

        let client = Arc::new(McpClient::with_base_url(server.uri(), Duration::from_secs(5)).unwrap());
        let (dispatcher, handle) =
            BackgroundDispatcher::spawn(client, &background(2, FailurePolicy::Log));

        for repo in ["a", "b", "c"] {
            dispatcher
                .submit(IndexJob::new(
                    Uuid::new_v4(),
                    format!("https://github.com/acme/{}", repo),
                ))
                .unwrap();
        }
        drop(dispatcher);

        tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_burst_beyond_max_in_flight_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(INDEX_REPOSITORY_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok"}))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(20)
            .mount(&server)
            .await;

        let client = Arc::new(McpClient::with_base_url(server.uri(), Duration::from_secs(5)).unwrap());
        let (dispatcher, handle) =
            BackgroundDispatcher::spawn(client, &background(1, FailurePolicy::Log));

        let started = Instant::now();
        for n in 0..20 {
            dispatcher
                .submit(IndexJob::new(
                    Uuid::new_v4(),
                    format!("https://github.com/acme/repo-{}", n),
                ))
                .unwrap();
        }
        assert!(started.elapsed() < Duration::from_millis(200));
        drop(dispatcher);

        tokio::time::timeout(Duration::from_secs(15), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_log_policy_reports_at_error_level() {
        let failures = failure_events(FailurePolicy::Log).await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].level, Level::ERROR);
        assert_eq!(failures[0].parent.as_deref(), Some("background_index"));
    }

    #[tokio::test]
    async fn test_warn_policy_reports_at_warn_level() {
        let failures = failure_events(FailurePolicy::Warn).await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].level, Level::WARN);
        assert!(failures[0].field("error").is_some());
    }

    #[tokio::test]
    async fn test_ignore_policy_reports_at_debug_level() {
        let failures = failure_events(FailurePolicy::Ignore).await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].level, Level::DEBUG);
    }

    #[tokio::test]
    async fn test_closed_queue_rejects_submit() {
        let (dispatcher, handle) =
            BackgroundDispatcher::spawn(unreachable_client(), &background(1, FailurePolicy::Log));
        handle.abort();
        let _ = handle.await;

        let err = dispatcher
            .submit(IndexJob::new(Uuid::new_v4(), "https://github.com/acme/widgets"))
            .unwrap_err();
        assert!(matches!(err, GatewayError::Dispatch(_)));
    }
}
