// file: src/utils/telemetry.rs
// description: timing helpers for outbound calls and background jobs
// reference: tracing spans and structured fields

use std::time::{Duration, Instant};
use tracing::{Span, debug, info_span, warn};
use uuid::Uuid;

/// Span wrapping one HTTP request; `route` names the endpoint.
pub fn request_span(route: &'static str, request_id: Uuid) -> Span {
    info_span!("request", %request_id, route)
}

/// Span wrapping one fire-and-forget index call.
pub fn background_span(request_id: Uuid, repo_url: &str) -> Span {
    info_span!("background_index", %request_id, repo_url)
}

/// Operation timer for outbound call latency
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        debug!(operation, "starting operation");
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        debug!(
            operation = %self.operation,
            elapsed_ms = elapsed.as_millis() as u64,
            "completed operation"
        );
        elapsed
    }

    pub fn warn_if_slow(&self, threshold: Duration) {
        let elapsed = self.elapsed();
        if elapsed > threshold {
            warn!(
                operation = %self.operation,
                elapsed_secs = elapsed.as_secs_f64(),
                threshold_secs = threshold.as_secs_f64(),
                "slow operation"
            );
        }
    }
}

/// Records spans and events so tests can assert on request correlation.
#[cfg(test)]
pub(crate) mod capture {
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id};
    use tracing::subscriber::DefaultGuard;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;

    #[derive(Debug, Clone)]
    pub struct Record {
        pub name: String,
        pub level: Level,
        pub parent: Option<String>,
        pub fields: Vec<(String, String)>,
    }

    impl Record {
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        }
    }

    #[derive(Debug, Clone, Default)]
    pub struct CaptureLayer {
        spans: Arc<Mutex<Vec<Record>>>,
        events: Arc<Mutex<Vec<Record>>>,
    }

    impl CaptureLayer {
        /// Thread-local: only covers tasks polled on the current-thread test runtime.
        pub fn install(&self) -> DefaultGuard {
            tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
        }

        pub fn spans(&self) -> Vec<Record> {
            self.spans.lock().unwrap().clone()
        }

        pub fn events(&self) -> Vec<Record> {
            self.events.lock().unwrap().clone()
        }
    }

    struct FieldVisitor<'a>(&'a mut Vec<(String, String)>);

    impl Visit for FieldVisitor<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.push((field.name().to_string(), value.to_string()));
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    impl<S> Layer<S> for CaptureLayer
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, ctx: Context<'_, S>) {
            let mut fields = Vec::new();
            attrs.record(&mut FieldVisitor(&mut fields));
            let parent = ctx.current_span().metadata().map(|meta| meta.name().to_string());
            self.spans.lock().unwrap().push(Record {
                name: attrs.metadata().name().to_string(),
                level: *attrs.metadata().level(),
                parent,
                fields,
            });
        }

        fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
            let mut fields = Vec::new();
            event.record(&mut FieldVisitor(&mut fields));
            let parent = ctx.event_span(event).map(|span| span.name().to_string());
            self.events.lock().unwrap().push(Record {
                name: event.metadata().name().to_string(),
                level: *event.metadata().level(),
                parent,
                fields,
            });
        }
    }
}
