use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use leadbot_slack::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use leadbot_slack::{
    parse_request, EventContext, EventDispatcher, InboundRequest, SignatureVerifier,
};
use serde_json::json;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Dispatch work still running after its request was acknowledged.
#[derive(Clone, Default)]
pub struct InFlight {
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl InFlight {
    fn lock(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.lock();
        while tasks.try_join_next().is_some() {}
        tasks.spawn(task);
    }

    /// Waits for every tracked task, including ones spawned while draining.
    pub async fn drain(&self) {
        loop {
            let mut tasks = std::mem::take(&mut *self.lock());
            if tasks.is_empty() {
                return;
            }
            info!(
                event_name = "ingress.slack.draining",
                pending = tasks.len(),
                "waiting for in-flight slack work"
            );
            while let Some(result) = tasks.join_next().await {
                if let Err(error) = result {
                    warn!(
                        event_name = "ingress.slack.task_failed",
                        error = %error,
                        "in-flight slack task did not complete"
                    );
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct SlackState {
    verifier: Arc<SignatureVerifier>,
    dispatcher: Arc<EventDispatcher>,
    in_flight: InFlight,
}

impl SlackState {
    pub fn new(verifier: SignatureVerifier, dispatcher: EventDispatcher) -> Self {
        Self {
            verifier: Arc::new(verifier),
            dispatcher: Arc::new(dispatcher),
            in_flight: InFlight::default(),
        }
    }

    pub fn in_flight(&self) -> InFlight {
        self.in_flight.clone()
    }
}

pub fn router(state: SlackState) -> Router {
    Router::new().route("/slack/events", post(slack_events)).with_state(state)
}

/// Verifies, decodes and acknowledges a Slack request. Handler work runs in
/// a tracked task so Slack gets its 200 within the three second window.
async fn slack_events(
    State(state): State<SlackState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

    let (Some(timestamp), Some(signature)) = (header(TIMESTAMP_HEADER), header(SIGNATURE_HEADER))
    else {
        warn!(event_name = "ingress.slack.unsigned", "slack request without signature headers");
        return StatusCode::UNAUTHORIZED.into_response();
    };
    if let Err(error) = state.verifier.verify(timestamp, &body, signature) {
        warn!(
            event_name = "ingress.slack.signature_rejected",
            error = %error,
            "slack request signature rejected"
        );
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let request = match parse_request(header(CONTENT_TYPE.as_str()), &body) {
        Ok(request) => request,
        Err(error) => {
            warn!(
                event_name = "ingress.slack.malformed",
                error = %error,
                "slack request body could not be decoded"
            );
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let envelope = match request {
        InboundRequest::UrlVerification { challenge } => {
            info!(event_name = "ingress.slack.url_verification", "answered url verification");
            return Json(json!({ "challenge": challenge })).into_response();
        }
        InboundRequest::Envelope(envelope) => envelope,
    };

    info!(
        event_name = "ingress.slack.envelope_received",
        envelope_id = %envelope.envelope_id,
        event_type = ?envelope.event.event_type(),
        correlation_id = %envelope.envelope_id,
        "received slack envelope"
    );

    let dispatcher = state.dispatcher.clone();
    state.in_flight.spawn(async move {
        let context = EventContext { correlation_id: envelope.envelope_id.clone() };
        match dispatcher.dispatch(&envelope, &context).await {
            Ok(result) => debug!(
                event_name = "ingress.slack.dispatched",
                correlation_id = %envelope.envelope_id,
                result = ?result,
                "slack envelope handled"
            ),
            Err(error) => warn!(
                event_name = "ingress.slack.dispatch_failed",
                correlation_id = %envelope.envelope_id,
                error = %error,
                "event dispatch failed"
            ),
        }
    });

    StatusCode::OK.into_response()
}
