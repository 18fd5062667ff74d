//! In-memory gateway for unit tests: scripted replies per route, every call
//! recorded.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::{DraftError, Result};
use crate::gateway::{Gateway, GatewayResponse, Method};

#[derive(Debug, Clone)]
enum Reply {
    Status(u16, String),
    Unreachable,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Replies are queued per `(method, path)`; the last queued reply repeats
/// forever. Unscripted routes answer 404.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn on(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(method, path, Reply::Status(status, body.to_string()));
    }

    pub fn on_json(&self, method: Method, path: &str, status: u16, body: Value) {
        self.on(method, path, status, &body.to_string());
    }

    pub fn unreachable(&self, method: Method, path: &str) {
        self.push(method, path, Reply::Unreachable);
    }

    /// Drop whatever is queued for a route.
    pub fn reset(&self, method: Method, path: &str) {
        self.routes
            .lock()
            .unwrap()
            .remove(&(method, path.to_string()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }
}

impl Gateway for ScriptedGateway {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<GatewayResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&(method, path.to_string())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Status(status, text)) => Ok(GatewayResponse::new(status, text)),
            Some(Reply::Unreachable) => Err(DraftError::Transport {
                method: method.as_str(),
                path: path.to_string(),
                reason: "connection refused".into(),
            }),
            None => Ok(GatewayResponse::new(404, "")),
        }
    }
}
