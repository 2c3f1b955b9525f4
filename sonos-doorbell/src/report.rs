//! Per-device ring reports.

use serde::Serialize;

use crate::snapshot::{PlaybackSnapshot, PlaybackState};

/// The outcome of one restoration step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    /// The step's precondition did not hold
    Skipped,
    Failed(String),
}

/// What happened to one device during one `/ring`
///
/// `errors` only grows and `rang` never goes back to false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RingReport {
    pub name: String,
    pub rang: bool,
    /// Media URI before the chime
    pub uri: Option<String>,
    pub state: Option<PlaybackState>,
    pub volume: Option<u8>,
    pub errors: Vec<String>,
}

impl RingReport {
    /// A report with nothing captured yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rang: false,
            uri: None,
            state: None,
            volume: None,
            errors: Vec::new(),
        }
    }

    pub fn with_snapshot(mut self, snapshot: &PlaybackSnapshot) -> Self {
        self.uri = Some(snapshot.media.uri.clone());
        self.state = Some(snapshot.state.clone());
        self.volume = Some(snapshot.volume);
        self
    }

    pub fn mark_rang(&mut self) {
        self.rang = true;
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn record(&mut self, outcome: StepOutcome) {
        if let StepOutcome::Failed(message) = outcome {
            self.push_error(message);
        }
    }
}
