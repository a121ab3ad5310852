//! Application state for the TUI
//!
//! Owns the pure [`Model`] and runs the commands `update` returns. Advice
//! requests run on a worker thread each; finished requests come back over a
//! channel and are fed to `update` as [`Msg::AdviceReceived`].

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

use super::msg::Msg;
use super::update::{update, Cmd, Model};
use crate::llm::{advice_text, CompletionClient};

/// A finished request from a worker
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceResponse {
    pub request_id: u64,
    pub text: String,
}

/// Main application state
pub struct App {
    pub model: Model,

    /// Number of rules in the loaded decision tree
    pub rule_count: usize,
    /// Model name shown in the header
    pub model_name: String,
    /// When the current request started, for the elapsed-time indicator
    pub submitted_at: Option<Instant>,

    client: Arc<dyn CompletionClient>,
    response_tx: Sender<AdviceResponse>,
    response_rx: Receiver<AdviceResponse>,
}

impl App {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        rule_count: usize,
        model_name: impl Into<String>,
        max_concern_chars: usize,
    ) -> Self {
        let (response_tx, response_rx) = mpsc::channel();
        Self {
            model: Model {
                max_concern_chars,
                ..Model::default()
            },
            rule_count,
            model_name: model_name.into(),
            submitted_at: None,
            client,
            response_tx,
            response_rx,
        }
    }

    /// Run a message through `update` and execute the resulting command.
    /// Returns true if the app should quit.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        let model = std::mem::take(&mut self.model);
        let (model, cmd) = update(msg, model);
        self.model = model;

        if !self.model.is_submitting() {
            self.submitted_at = None;
        }

        match cmd {
            Cmd::None => false,
            Cmd::Quit => true,
            Cmd::RequestAdvice { request_id, prompt } => {
                self.spawn_request(request_id, prompt);
                false
            }
        }
    }

    /// Feed finished requests back into the model (non-blocking)
    pub fn poll_responses(&mut self) {
        while let Ok(response) = self.response_rx.try_recv() {
            self.handle_response(response);
        }
    }

    pub fn handle_response(&mut self, response: AdviceResponse) {
        self.dispatch(Msg::AdviceReceived {
            request_id: response.request_id,
            text: response.text,
        });
    }

    pub fn elapsed_secs(&self) -> Option<u64> {
        self.submitted_at.map(|t| t.elapsed().as_secs())
    }

    fn spawn_request(&mut self, request_id: u64, prompt: String) {
        self.submitted_at = Some(Instant::now());
        let client = Arc::clone(&self.client);
        let tx = self.response_tx.clone();
        std::thread::spawn(move || {
            let text = advice_text(client.complete(&prompt));
            // Receiver gone means the app quit; nothing to report to
            let _ = tx.send(AdviceResponse { request_id, text });
        });
    }
}
