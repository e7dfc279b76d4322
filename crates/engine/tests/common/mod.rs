#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use archer_api::{ContentTransport, TransportOutcome};
use archer_engine::{ApplicationMetadata, RecordSearcher, StaticMetadata};
use archer_types::{ArcherEndpoints, FieldCatalog, FieldType};
use async_trait::async_trait;
use serde_json::Value;

pub const APP: &str = "Incidents";
pub const SEARCH_URL: &str = "https://grc.example.com/api/core/content/record/search";
pub const CONTENT_BASE: &str = "https://grc.example.com/contentapi/";

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Replays scripted outcomes in call order and records each request.
///
/// Mirrors `ScriptedTransport` in the crate's unit-test support; keep the
/// recorded fields in step.
#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<TransportOutcome>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(outcomes: impl IntoIterator<Item = TransportOutcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|request| request.method == "POST").collect()
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

pub fn payload(value: Value) -> TransportOutcome {
    TransportOutcome::Payload(value)
}

pub fn http_error(status: u16) -> TransportOutcome {
    TransportOutcome::HttpError {
        status,
        body_preview: String::new(),
    }
}

pub fn endpoints() -> ArcherEndpoints {
    ArcherEndpoints::new("https://grc.example.com/api/", CONTENT_BASE)
}

/// `Incidents` (module 75) with a text field `Ticket Number` (10) and a
/// values-list field `Status` (20) whose `Open` entry is 999.
pub fn incidents_metadata() -> StaticMetadata {
    let catalog = FieldCatalog::new()
        .with_field("Ticket Number", 10, FieldType::Text)
        .with_field("Status", 20, FieldType::ValuesList);
    StaticMetadata::new().with_application(
        APP,
        ApplicationMetadata::new(75_i64, catalog).with_values_list_entry("Status", "Open", vec![999]),
    )
}

pub fn searcher(metadata: StaticMetadata, transport: &Arc<ScriptedTransport>) -> RecordSearcher {
    RecordSearcher::new(Arc::new(metadata), transport.clone(), endpoints())
}
