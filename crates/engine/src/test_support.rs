use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use archer_api::{ContentTransport, TransportOutcome};
use archer_types::ArcherEndpoints;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Clone, Debug)]
pub(crate) struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Transport that replays scripted outcomes in order and records every call.
///
/// Mirrors the fake in `tests/common`; keep the recorded fields in step.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    outcomes: Mutex<VecDeque<TransportOutcome>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(outcomes: impl IntoIterator<Item = TransportOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(&self, request: RecordedRequest) -> TransportOutcome {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| TransportOutcome::TransportError("no scripted response".into()))
    }
}

#[async_trait]
impl ContentTransport for ScriptedTransport {
    async fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> TransportOutcome {
        self.respond(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            body: Some(body.clone()),
            timeout,
        })
    }

    async fn get_json(&self, url: &str, timeout: Duration) -> TransportOutcome {
        self.respond(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            body: None,
            timeout,
        })
    }
}

pub(crate) fn endpoints() -> ArcherEndpoints {
    ArcherEndpoints::new("https://grc.example.com/api/", "https://grc.example.com/contentapi/")
}

pub(crate) fn http_error(status: u16) -> TransportOutcome {
    TransportOutcome::HttpError {
        status,
        body_preview: String::new(),
    }
}
