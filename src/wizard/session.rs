//! The wizard controller driving one signup session.
//!
//! A session owns the sequential step index, the accumulated answer map,
//! the conversation transcript, and the connector state. Operations are
//! processed one at a time to completion; the only suspension point is the
//! sink call inside [`WizardSession::finalize`].

use thiserror::Error;

use crate::domain::answers::{AnswerMap, AnswerValue};
use crate::domain::connector::ConnectorState;
use crate::domain::field::{FieldKind, FieldSpec, ValidationError};
use crate::domain::submission::{EnvContext, SubmissionRecord};
use crate::domain::transcript::{Speaker, TranscriptEntry};
use crate::sink::{self, SinkReceipt, SubmissionSink};

const SKIPPED_DISPLAY: &str = "(skipped)";

/// Controller failures. Validation errors are local and recoverable; the
/// rest guard the session lifecycle.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("{0}")]
    Validation(ValidationError),
    #[error("submission incomplete: `{first_missing}` still needs an answer")]
    Incomplete { first_missing: String },
    #[error("session already submitted")]
    AlreadySubmitted,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("step catalog is empty")]
    EmptyCatalog,
}

impl From<ValidationError> for WizardError {
    fn from(err: ValidationError) -> Self {
        WizardError::Validation(err)
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Collecting,
    Submitting,
    Submitted,
}

/// Result of a successful finalize. The record is always built; the
/// receipt tells whether the sink durably recorded it, logged it, or
/// failed (degraded confirmation).
#[derive(Debug)]
pub struct FinalizeOutcome {
    pub record: SubmissionRecord,
    pub receipt: sink::Result<SinkReceipt>,
}

pub struct WizardSession {
    steps: Vec<FieldSpec>,
    index: usize,
    answers: AnswerMap,
    transcript: Vec<TranscriptEntry>,
    connectors: ConnectorState,
    phase: Phase,
}

impl WizardSession {
    pub fn new(steps: Vec<FieldSpec>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::EmptyCatalog);
        }
        let transcript = vec![TranscriptEntry::prompt(steps[0].prompt)];
        Ok(Self {
            steps,
            index: 0,
            answers: AnswerMap::new(),
            transcript,
            connectors: ConnectorState::new(),
            phase: Phase::Collecting,
        })
    }

    pub fn with_connectors(mut self, connectors: ConnectorState) -> Self {
        self.connectors = connectors;
        self
    }

    // ---- Read surface for the presentation layer ----

    pub fn steps(&self) -> &[FieldSpec] {
        &self.steps
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_step(&self) -> &FieldSpec {
        &self.steps[self.index]
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn connectors(&self) -> &ConnectorState {
        &self.connectors
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == Phase::Submitted
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Whether the current step's required-field completeness allows an
    /// explicit advance.
    pub fn can_continue(&self) -> bool {
        let step = self.current_step();
        if !step.required {
            return true;
        }
        self.answers
            .get(step.id)
            .map(AnswerValue::is_filled)
            .unwrap_or(false)
    }

    /// True only at the terminal review step with every required field
    /// answered non-empty.
    pub fn is_complete(&self) -> bool {
        self.index == self.steps.len() - 1 && self.first_incomplete().is_none()
    }

    /// First required step lacking a non-empty answer, used to route the
    /// user back after an incomplete finalize.
    pub fn first_incomplete(&self) -> Option<&'static str> {
        self.steps
            .iter()
            .filter(|step| step.required && step.kind != FieldKind::Review)
            .find(|step| {
                !self
                    .answers
                    .get(step.id)
                    .map(AnswerValue::is_filled)
                    .unwrap_or(false)
            })
            .map(|step| step.id)
    }

    // ---- Mutating operations ----

    /// Pre-fills an answer collected outside the wizard, such as the email
    /// captured on the landing screen.
    pub fn seed_answer(&mut self, key: &str, value: impl Into<String>) {
        self.answers.insert(key.to_string(), AnswerValue::text(value));
    }

    /// Answers the current step with free-form text. Validation failures
    /// leave the index and answer map untouched. Empty input on an
    /// optional step records the skipped sentinel and advances.
    pub fn submit_answer(&mut self, raw: &str) -> Result<(), WizardError> {
        self.guard_forward()?;
        let step = self.current_step().clone();

        if raw.trim().is_empty() && !step.required {
            self.answers.insert(step.id.to_string(), AnswerValue::Skipped);
            self.push_response(SKIPPED_DISPLAY);
            self.advance_index();
            return Ok(());
        }

        let value = step.validate_text(raw)?;
        self.push_response(&value);
        self.answers
            .insert(step.id.to_string(), AnswerValue::text(value));
        self.advance_index();
        Ok(())
    }

    /// Selects an option on a choice step. Single-choice selection stores
    /// the option and advances without text validation; multi-choice
    /// selection toggles set membership and does not advance.
    pub fn choose_option(&mut self, option: &str) -> Result<(), WizardError> {
        self.guard_forward()?;
        let step = self.current_step().clone();
        match step.kind {
            FieldKind::SingleChoice => {
                self.push_response(option);
                self.answers
                    .insert(step.id.to_string(), AnswerValue::text(option));
                self.advance_index();
                Ok(())
            }
            FieldKind::MultiChoice => {
                let entry = self
                    .answers
                    .entry(step.id.to_string())
                    .or_insert_with(|| AnswerValue::Choices(Default::default()));
                let mut now_empty = false;
                if let AnswerValue::Choices(set) = entry {
                    if !set.remove(option) {
                        set.insert(option.to_string());
                    }
                    now_empty = set.is_empty();
                }
                if now_empty {
                    self.answers.remove(step.id);
                }
                Ok(())
            }
            _ => Err(ValidationError::new("This step does not take options").into()),
        }
    }

    /// Explicit step completion for steps that do not answer through
    /// [`WizardSession::submit_answer`] (multi-choice, connectors). No-op
    /// at the last step.
    pub fn advance(&mut self) -> Result<(), WizardError> {
        self.guard_forward()?;
        if self.index == self.steps.len() - 1 {
            return Ok(());
        }
        let step = self.current_step().clone();
        if step.required
            && !self
                .answers
                .get(step.id)
                .map(AnswerValue::is_filled)
                .unwrap_or(false)
        {
            return Err(ValidationError::new("This step is required").into());
        }

        let response = match step.kind {
            FieldKind::Connectors => {
                let connected = self.connectors.connected();
                if connected.is_empty() {
                    SKIPPED_DISPLAY.to_string()
                } else {
                    format!("Connected: {}", connected.join(", "))
                }
            }
            _ => self
                .answers
                .get(step.id)
                .map(AnswerValue::display_text)
                .unwrap_or_else(|| SKIPPED_DISPLAY.to_string()),
        };
        self.push_response(&response);
        self.advance_index();
        Ok(())
    }

    /// Steps back one field. Back erases forward progress: the answer of
    /// the step being returned to is cleared, the transcript loses the
    /// prompt of the step being left plus the latest response, and leaving
    /// the connectors step resets connector state.
    pub fn retreat(&mut self) -> Result<(), WizardError> {
        if self.phase == Phase::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.index == 0 {
            return Ok(());
        }
        let leaving = self.index;

        // Pop until one response bubble is gone, then drop the leaving
        // step's prompt if it still trails.
        while let Some(entry) = self.transcript.pop() {
            if entry.speaker == Speaker::Response {
                break;
            }
        }
        if self
            .transcript
            .last()
            .map(|entry| entry.speaker == Speaker::Prompt && entry.text == self.steps[leaving].prompt)
            .unwrap_or(false)
        {
            self.transcript.pop();
        }

        // The leaving step may hold an answer when the index was clamped
        // at the terminal step; both it and the landing step are erased so
        // no entry outlives the new index.
        self.answers.remove(self.steps[leaving].id);
        self.answers.remove(self.steps[leaving - 1].id);
        if self.steps[leaving].kind == FieldKind::Connectors {
            self.connectors.clear();
        }
        self.index = leaving - 1;
        Ok(())
    }

    // ---- Connector actions ----

    pub fn begin_connect(&mut self, key: &str) -> Result<(), WizardError> {
        self.guard_forward()?;
        self.connectors.begin_connect(key);
        Ok(())
    }

    pub fn disconnect(&mut self, key: &str) -> Result<(), WizardError> {
        self.guard_forward()?;
        self.connectors.disconnect(key);
        Ok(())
    }

    /// Completes elapsed connector handshakes. Safe in any phase.
    pub fn poll_connectors(&mut self, now: std::time::Instant) {
        self.connectors.poll(now);
    }

    // ---- Finalize ----

    /// Builds the submission record and hands it to the sink. The only
    /// operation that talks to the sink boundary; terminal on success. A
    /// failing sink still yields a Submitted session with a degraded
    /// receipt, never silent success.
    pub fn finalize(
        &mut self,
        sink: &dyn SubmissionSink,
        env: &EnvContext,
    ) -> Result<FinalizeOutcome, WizardError> {
        match self.phase {
            Phase::Submitted => return Err(WizardError::AlreadySubmitted),
            Phase::Submitting => return Err(WizardError::SubmissionInFlight),
            Phase::Collecting => {}
        }
        if !self.is_complete() {
            let first_missing = self
                .first_incomplete()
                .unwrap_or(self.current_step().id)
                .to_string();
            return Err(WizardError::Incomplete { first_missing });
        }

        let record = SubmissionRecord::build(&self.answers, self.connectors.connected(), env);
        self.phase = Phase::Submitting;
        let receipt = sink.record(&record);
        if let Err(err) = &receipt {
            tracing::warn!(target: "funnel_core::wizard", %err, "submission sink degraded");
        }
        self.phase = Phase::Submitted;
        Ok(FinalizeOutcome { record, receipt })
    }

    // ---- Internals ----

    fn guard_forward(&self) -> Result<(), WizardError> {
        match self.phase {
            Phase::Collecting => Ok(()),
            Phase::Submitting => Err(WizardError::SubmissionInFlight),
            Phase::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    fn push_response(&mut self, text: &str) {
        // Re-answering the clamped terminal step replaces its response
        // bubble so the transcript never exceeds two entries per step.
        if let Some(last) = self.transcript.last_mut() {
            if last.speaker == Speaker::Response {
                *last = TranscriptEntry::response(text);
                return;
            }
        }
        self.transcript.push(TranscriptEntry::response(text));
    }

    fn advance_index(&mut self) {
        if self.index + 1 < self.steps.len() {
            self.index += 1;
            self.transcript
                .push(TranscriptEntry::prompt(self.steps[self.index].prompt));
        }
    }
}
