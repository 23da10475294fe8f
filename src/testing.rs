//! Test doubles shared by unit tests.

use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::Notify;

use crate::error::{FolioError, Result};
use crate::remote::{ApiRequest, ContentApi, Verb};

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Fail(u16, String),
}

/// In-memory `ContentApi` keyed by URL.
///
/// Unconfigured GETs answer 404 and unconfigured mutations answer
/// `{"ok": true}`. A gated URL holds its reply until the gate is opened.
#[derive(Default)]
pub struct FakeApi {
    replies: Mutex<HashMap<String, Reply>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    requests: Mutex<Vec<(Verb, String, Option<Value>)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, body: Value) {
        self.replies
            .lock()
            .insert(url.to_string(), Reply::Json(body));
    }

    pub fn fail(&self, url: &str, status: u16, message: &str) {
        self.replies
            .lock()
            .insert(url.to_string(), Reply::Fail(status, message.to_string()));
    }

    /// Hold replies for `url` until [`FakeApi::open`] is called.
    pub fn gate(&self, url: &str) {
        self.gates
            .lock()
            .insert(url.to_string(), Arc::new(Notify::new()));
    }

    /// Release one held request for `url`.
    pub fn open(&self, url: &str) {
        if let Some(gate) = self.gates.lock().get(url) {
            gate.notify_one();
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<(Verb, String, Option<Value>)> {
        self.requests.lock().clone()
    }

    /// Yield until at least `n` requests have been issued.
    pub async fn wait_for_requests(&self, n: usize) {
        for _ in 0..10_000 {
            if self.request_count() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {n} requests, saw {}", self.request_count());
    }

    async fn reply(&self, verb: Verb, url: &str, body: Option<Value>) -> Result<Value> {
        self.requests.lock().push((verb, url.to_string(), body));

        let gate = self.gates.lock().get(url).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let reply = self.replies.lock().get(url).cloned();
        match (reply, verb) {
            (Some(Reply::Json(body)), _) => Ok(body),
            (Some(Reply::Fail(status, message)), _) => {
                Err(FolioError::network(Some(status), message))
            }
            (None, Verb::Get) => Err(FolioError::network(Some(404), "HTTP 404 Not Found")),
            (None, _) => Ok(json!({"ok": true})),
        }
    }
}

impl ContentApi for FakeApi {
    async fn get_json(&self, url: &str) -> Result<Value> {
        self.reply(Verb::Get, url, None).await
    }

    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let body = self.reply(request.verb, &request.url, request.body).await?;
        crate::remote::reject_not_ok(body)
    }
}

/// Restores an environment variable on drop. Tests using it must be `#[serial]`.
pub struct EnvGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvGuard {
    /// # Safety
    /// Mutates process-global state; callers must run serially.
    pub unsafe fn set(key: &str, value: &str) -> Self {
        let guard = Self {
            key: key.to_string(),
            original: env::var_os(key),
        };
        unsafe { env::set_var(key, value) };
        guard
    }

    /// # Safety
    /// Mutates process-global state; callers must run serially.
    pub unsafe fn remove(key: &str) -> Self {
        let guard = Self {
            key: key.to_string(),
            original: env::var_os(key),
        };
        unsafe { env::remove_var(key) };
        guard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.original {
            Some(val) => unsafe { env::set_var(&self.key, val) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}
