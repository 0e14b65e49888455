use axum::extract::MatchedPath;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{
        DefaultOnBodyChunk, DefaultOnEos, MakeSpan, OnFailure, OnRequest, OnResponse, TraceLayer,
    },
};

pub fn layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    SpanCreator,
    EventBuilder,
    EventBuilder,
    DefaultOnBodyChunk,
    DefaultOnEos,
    EventBuilder,
> {
    TraceLayer::new_for_http()
        .make_span_with(SpanCreator)
        .on_request(EventBuilder)
        .on_response(EventBuilder)
        .on_failure(EventBuilder)
}

#[derive(Clone, Copy, Debug)]
pub struct SpanCreator;

impl<B> MakeSpan<B> for SpanCreator {
    fn make_span(&mut self, req: &http::Request<B>) -> tracing::Span {
        let uri = req.uri();
        // route template keeps span names low cardinality, /repos/{owner}/{repo}/releases/{release_id}
        let route = req
            .extensions()
            .get::<MatchedPath>()
            .map(|matched| matched.as_str().to_owned())
            .unwrap_or_else(|| uri.path().to_owned());
        let span_name = format!("{} {route}", req.method());
        let span = tracing::info_span!(
            parent: None,
            "http.server.request",
            "error.type" = tracing::field::Empty,
            "http.request.method" = %req.method(),
            "http.request.body.size" = tracing::field::Empty,
            "http.response.status_code" = tracing::field::Empty,
            "http.route" = %route,
            "otel.kind" = "server",
            "otel.name" = %span_name,
            "otel.status_code" = tracing::field::Empty,
            "url.path" = uri.path(),
            "url.query" = tracing::field::Empty,
        );
        if let Some(query) = uri.query() {
            span.record("url.query", query);
        }
        if let Some(length) = req
            .headers()
            .get(http::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
        {
            span.record("http.request.body.size", length);
        }
        span
    }
}

#[derive(Clone, Copy, Debug)]
pub struct EventBuilder;

impl<B> OnRequest<B> for EventBuilder {
    fn on_request(&mut self, _req: &http::Request<B>, _span: &tracing::Span) {
        tracing::debug!("request started");
    }
}

impl<B> OnResponse<B> for EventBuilder {
    fn on_response(
        self,
        res: &http::Response<B>,
        latency: std::time::Duration,
        span: &tracing::Span,
    ) {
        let status = res.status();
        span.record("http.response.status_code", status.as_str());
        if status.is_client_error() {
            span.record("error.type", "client");
            span.record("otel.status_code", "error");
        } else if !status.is_server_error() {
            span.record("otel.status_code", "ok");
        }

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "request processed"
        );
    }
}

impl<F> OnFailure<F> for EventBuilder
where
    F: std::fmt::Display,
{
    fn on_failure(
        &mut self,
        failure_classification: F,
        latency: std::time::Duration,
        span: &tracing::Span,
    ) {
        span.record("error.type", "server");
        span.record("otel.status_code", "error");

        tracing::warn!(
            error = %failure_classification,
            latency_ms = latency.as_millis() as u64,
            "request failed",
        );
    }
}

