//! Test doubles for the gateway, console, operator, and sleeper seams, plus a
//! log capture for asserting on emitted tracing output.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing_subscriber::fmt::MakeWriter;

use crate::errors::AppError;
use crate::llm_client::{LlmError, ModelGateway, ModelRequest};
use crate::orchestrator::schedule::Sleeper;
use crate::output::{Operator, Reporter};

type Responder = Box<dyn Fn(&ModelRequest) -> Result<String, LlmError> + Send + Sync>;

/// Gateway whose answers come from a closure; every request is recorded.
pub struct ScriptedGateway {
    responder: Responder,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedGateway {
    pub fn new(
        responder: impl Fn(&ModelRequest) -> Result<String, LlmError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with the same text.
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls_for(&self, schema: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.schema_name() == Some(schema))
            .count()
    }

    /// User prompt of the most recent request declaring `schema`.
    pub fn last_prompt_for(&self, schema: &str) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.schema_name() == Some(schema))
            .and_then(|r| r.messages.last())
            .map(|m| m.content.clone())
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn complete(&self, request: &ModelRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}

/// Reporter that keeps everything in memory.
#[derive(Default)]
pub struct MemoryReporter {
    pub statuses: Mutex<Vec<String>>,
    pub lines: Mutex<Vec<String>>,
    pub documents: Mutex<Vec<(String, String)>>,
}

impl MemoryReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn documents(&self) -> Vec<(String, String)> {
        self.documents.lock().unwrap().clone()
    }
}

impl Reporter for MemoryReporter {
    fn status(&self, message: &str) {
        self.statuses.lock().unwrap().push(message.to_string());
    }

    fn line(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }

    fn document(&self, title: &str, body: &str) {
        self.documents
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}

/// Operator that types a fixed script, then closes input.
#[derive(Default)]
pub struct ScriptedOperator {
    inputs: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedOperator {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            prompts: Vec::new(),
        }
    }
}

#[async_trait]
impl Operator for ScriptedOperator {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        self.prompts.push(prompt.to_string());
        Ok(self.inputs.pop_front())
    }
}

/// Sleeper that records wake-up times and returns at once.
#[derive(Default)]
pub struct RecordingSleeper {
    wakeups: Mutex<Vec<DateTime<Utc>>>,
}

impl RecordingSleeper {
    pub fn wakeups(&self) -> Vec<DateTime<Utc>> {
        self.wakeups.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep_until(&self, at: DateTime<Utc>) {
        self.wakeups.lock().unwrap().push(at);
    }
}

/// Collects formatted tracing output in memory.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// A debug-level subscriber writing plain text into this buffer.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(self.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
