//! TEA Update Function
//!
//! ```text
//! update : Msg -> Model -> (Model, Cmd)
//! ```
//!
//! Pure: no I/O, no threads. Requests to the model are described by
//! [`Cmd::RequestAdvice`] and executed by the runtime in `app.rs`.
//!
//! Submission state machine:
//!
//! ```text
//! Idle --Submit(valid)--> Submitting{id} --AdviceReceived{id}--> Idle
//!                         Submitting{id} --Submit | Cancel-----> Idle (id retired)
//! ```

use super::msg::Msg;
use crate::llm::build_prompt;

pub const GETTING_ADVICE: &str = "Getting advice...";
pub const CANCELLED: &str = "Request cancelled.";

/// Commands that need to be executed by the runtime (imperative shell)
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// No command
    None,
    /// Quit the application
    Quit,
    /// Send `prompt` to the completion service, tagged with `request_id`
    RequestAdvice { request_id: u64, prompt: String },
}

impl Cmd {
    /// Check if this is a quit command
    pub fn is_quit(&self) -> bool {
        matches!(self, Cmd::Quit)
    }
}

/// Whether the submit control is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting { request_id: u64 },
}

/// Why a concern was rejected before reaching the service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConcernError {
    #[error("Please enter a concern.")]
    Empty,
    #[error("Input too long. Please keep it under {max} characters.")]
    TooLong { max: usize },
}

/// Trim and bound-check the user's concern. Length is in characters.
pub fn validate_concern(raw: &str, max_chars: usize) -> Result<String, ConcernError> {
    let concern = raw.trim();
    if concern.is_empty() {
        return Err(ConcernError::Empty);
    }
    if concern.chars().count() > max_chars {
        return Err(ConcernError::TooLong { max: max_chars });
    }
    Ok(concern.to_string())
}

/// TUI model state
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub input: String,
    pub phase: Phase,
    /// Text of the advice panel: validation message, status or answer
    pub advice: String,
    pub advice_scroll: u16,
    pub next_request_id: u64,
    pub max_concern_chars: usize,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            input: String::new(),
            phase: Phase::Idle,
            advice: String::new(),
            advice_scroll: 0,
            next_request_id: 1,
            max_concern_chars: 500,
        }
    }
}

impl Model {
    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    fn show(self, advice: impl Into<String>) -> Self {
        Model {
            advice: advice.into(),
            advice_scroll: 0,
            ..self
        }
    }
}

/// The core update function - processes a message and returns new state + commands
pub fn update(msg: Msg, model: Model) -> (Model, Cmd) {
    match msg {
        // === Lifecycle ===
        Msg::Quit => (model, Cmd::Quit),
        Msg::Tick | Msg::Noop => (model, Cmd::None),

        // === Input field ===
        Msg::Input(c) => {
            let mut input = model.input;
            input.push(c);
            (Model { input, ..model }, Cmd::None)
        }
        Msg::Backspace => {
            let mut input = model.input;
            input.pop();
            (Model { input, ..model }, Cmd::None)
        }
        Msg::ClearInput => (
            Model {
                input: String::new(),
                ..model
            },
            Cmd::None,
        ),

        // === Submission ===
        Msg::Submit => match model.phase {
            // Second submit cancels the request in flight
            Phase::Submitting { .. } => (
                Model {
                    phase: Phase::Idle,
                    ..model
                }
                .show(CANCELLED),
                Cmd::None,
            ),
            Phase::Idle => match validate_concern(&model.input, model.max_concern_chars) {
                Err(e) => (model.show(e.to_string()), Cmd::None),
                Ok(concern) => {
                    let request_id = model.next_request_id;
                    (
                        Model {
                            phase: Phase::Submitting { request_id },
                            next_request_id: request_id + 1,
                            ..model
                        }
                        .show(GETTING_ADVICE),
                        Cmd::RequestAdvice {
                            request_id,
                            prompt: build_prompt(&concern),
                        },
                    )
                }
            },
        },

        Msg::Cancel => match model.phase {
            Phase::Submitting { .. } => (
                Model {
                    phase: Phase::Idle,
                    ..model
                }
                .show(CANCELLED),
                Cmd::None,
            ),
            Phase::Idle => (model, Cmd::None),
        },

        Msg::AdviceReceived { request_id, text } => {
            if model.phase == (Phase::Submitting { request_id }) {
                (
                    Model {
                        phase: Phase::Idle,
                        ..model
                    }
                    .show(text),
                    Cmd::None,
                )
            } else {
                // Stale: cancelled or superseded
                (model, Cmd::None)
            }
        }

        // === Advice panel ===
        Msg::ScrollUp => (
            Model {
                advice_scroll: model.advice_scroll.saturating_sub(1),
                ..model
            },
            Cmd::None,
        ),
        Msg::ScrollDown => (
            Model {
                advice_scroll: model.advice_scroll.saturating_add(1),
                ..model
            },
            Cmd::None,
        ),
    }
}
