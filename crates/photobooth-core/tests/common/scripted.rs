//! In-memory transport with scripted replies, recorded calls and gates.
//!
//! Uploads are keyed by payload file name. A gated call blocks (it runs on
//! tokio's blocking pool) until the test releases it, which lets tests pick
//! the completion order of concurrent uploads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use photobooth_core::error::{NetworkError, NetworkErrorKind};
use photobooth_core::transport::{HttpResponse, Transport};
use photobooth_core::Payload;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone)]
pub enum Reply {
    Http {
        status: u32,
        reason: &'static str,
        body: String,
    },
    Network(NetworkErrorKind),
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Reply::Http {
            status: 200,
            reason: "OK",
            body: body.to_string(),
        }
    }

    pub fn status(status: u32, reason: &'static str) -> Self {
        Reply::Http {
            status,
            reason,
            body: String::new(),
        }
    }

    fn into_result(self) -> Result<HttpResponse, NetworkError> {
        match self {
            Reply::Http {
                status,
                reason,
                body,
            } => Ok(HttpResponse::new(status, reason, body.into_bytes())),
            Reply::Network(kind) => Err(NetworkError::new(kind, "scripted network failure")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload {
        url: String,
        field: String,
        file_name: String,
    },
    Generate {
        url: String,
        body: serde_json::Value,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    UploadStarted(String),
    UploadFinished(String),
    GenerateStarted,
}

#[derive(Default)]
struct Script {
    uploads: HashMap<String, Reply>,
    upload_gates: HashMap<String, oneshot::Receiver<()>>,
    generate: Option<Reply>,
    generate_gate: Option<oneshot::Receiver<()>>,
}

pub struct ScriptedTransport {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
    events: mpsc::UnboundedSender<Event>,
}

impl ScriptedTransport {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let t = Self {
            script: Mutex::new(Script::default()),
            calls: Mutex::new(Vec::new()),
            events: tx,
        };
        (Arc::new(t), rx)
    }

    pub fn on_upload(&self, file_name: &str, reply: Reply) {
        self.script
            .lock()
            .unwrap()
            .uploads
            .insert(file_name.to_string(), reply);
    }

    /// Upload of `file_name` waits until the returned sender fires (or drops).
    pub fn gate_upload(&self, file_name: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script
            .lock()
            .unwrap()
            .upload_gates
            .insert(file_name.to_string(), rx);
        tx
    }

    pub fn on_generate(&self, reply: Reply) {
        self.script.lock().unwrap().generate = Some(reply);
    }

    pub fn gate_generate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().generate_gate = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Upload { .. }))
            .count()
    }

    pub fn generate_calls(&self) -> Vec<serde_json::Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Generate { body, .. } => Some(body),
                Call::Upload { .. } => None,
            })
            .collect()
    }
}

impl Transport for ScriptedTransport {
    fn post_multipart(
        &self,
        url: &str,
        field: &str,
        payload: &Payload,
    ) -> Result<HttpResponse, NetworkError> {
        let name = payload.file_name().to_string();
        self.calls.lock().unwrap().push(Call::Upload {
            url: url.to_string(),
            field: field.to_string(),
            file_name: name.clone(),
        });
        let _ = self.events.send(Event::UploadStarted(name.clone()));

        let (gate, reply) = {
            let mut script = self.script.lock().unwrap();
            (
                script.upload_gates.remove(&name),
                script
                    .uploads
                    .get(&name)
                    .cloned()
                    .unwrap_or(Reply::status(404, "Not Found")),
            )
        };
        if let Some(gate) = gate {
            let _ = gate.blocking_recv();
        }

        let _ = self.events.send(Event::UploadFinished(name));
        reply.into_result()
    }

    fn post_json(&self, url: &str, body: &[u8]) -> Result<HttpResponse, NetworkError> {
        let body: serde_json::Value = serde_json::from_slice(body).unwrap();
        self.calls.lock().unwrap().push(Call::Generate {
            url: url.to_string(),
            body,
        });
        let _ = self.events.send(Event::GenerateStarted);

        let (gate, reply) = {
            let mut script = self.script.lock().unwrap();
            (
                script.generate_gate.take(),
                script
                    .generate
                    .clone()
                    .unwrap_or(Reply::status(404, "Not Found")),
            )
        };
        if let Some(gate) = gate {
            let _ = gate.blocking_recv();
        }
        reply.into_result()
    }
}
