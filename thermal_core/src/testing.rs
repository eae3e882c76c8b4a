//! In-memory transport for tests: replays canned replies in order and
//! records every request it receives.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::errors::{ThermalError, ThermalResult};
use crate::protocol::HttpReply;
use crate::transport::Transport;

#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    replies: Mutex<VecDeque<ThermalResult<HttpReply>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        FakeTransport::default()
    }

    pub(crate) fn with_replies(replies: Vec<ThermalResult<HttpReply>>) -> Self {
        FakeTransport {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// (path, body) of every request so far
    pub(crate) fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    async fn post_json(&self, path: &str, body: &Value) -> ThermalResult<HttpReply> {
        self.requests.lock().unwrap().push((path.to_string(), body.clone()));
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(ThermalError::transport(format!("no canned reply for {}", path))))
    }
}
