//! Submission Sink boundary.
//!
//! `finalize` hands the finished record to exactly one sink. When a
//! submissions directory is configured the JSON backend stores one file
//! per record; otherwise the fallback emits a structured log line. There
//! is no read path for the funnel itself and no dedup: every accepted
//! record is an independent, unordered append.

pub mod json_backend;

pub use json_backend::JsonSink;

use thiserror::Error;

use crate::domain::SubmissionRecord;

pub type Result<T> = std::result::Result<T, SinkError>;

/// Failures surfaced by sink backends. Sink errors are reported to the
/// caller as values; the funnel still reaches a confirmation view with
/// degraded messaging.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The 400-equivalent: the record lacks the minimal identity fields.
    #[error("submission rejected: {0}")]
    MissingIdentity(String),
    /// The 500-equivalent: the backend could not durably record.
    #[error("submission sink unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self {
        SinkError::Unavailable(err.to_string())
    }
}

/// How an accepted record was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Durable,
    Logged,
}

/// Acknowledgement returned by a sink for an accepted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkReceipt {
    pub storage: StorageKind,
}

/// Abstraction over destinations capable of recording a finished signup.
pub trait SubmissionSink: Send + Sync {
    fn record(&self, record: &SubmissionRecord) -> Result<SinkReceipt>;
}

/// Rejects records without a name/email-equivalent identity.
pub(crate) fn check_identity(record: &SubmissionRecord) -> Result<()> {
    if record.email.trim().is_empty() && record.full_name.trim().is_empty() {
        return Err(SinkError::MissingIdentity(
            "a name or email is required".into(),
        ));
    }
    Ok(())
}

/// Fallback sink: one structured log line per record, never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl SubmissionSink for LogSink {
    fn record(&self, record: &SubmissionRecord) -> Result<SinkReceipt> {
        check_identity(record)?;
        let payload = serde_json::to_string(record)?;
        tracing::info!(target: "funnel_core::sink", %payload, "SIGNUP_RECORD");
        Ok(SinkReceipt {
            storage: StorageKind::Logged,
        })
    }
}

/// Picks the JSON backend when a submissions directory is configured,
/// otherwise the log fallback.
pub fn sink_from_config(config: &crate::config::Config) -> Result<Box<dyn SubmissionSink>> {
    match &config.submissions_dir {
        Some(dir) => Ok(Box::new(json_backend::JsonSink::new(
            dir.clone(),
            config.retention,
        )?)),
        None => Ok(Box::new(LogSink::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnswerMap, AnswerValue, EnvContext};

    fn record_with_email(email: &str) -> SubmissionRecord {
        let mut answers = AnswerMap::new();
        answers.insert(
            crate::domain::submission::keys::EMAIL.into(),
            AnswerValue::text(email),
        );
        SubmissionRecord::build(&answers, Vec::new(), &EnvContext::default())
    }

    #[test]
    fn log_sink_accepts_identified_records() {
        let receipt = LogSink::new()
            .record(&record_with_email("a@b.co"))
            .expect("log sink accepts");
        assert_eq!(receipt.storage, StorageKind::Logged);
    }

    #[test]
    fn anonymous_records_are_rejected() {
        let err = LogSink::new()
            .record(&record_with_email(""))
            .expect_err("identity required");
        assert!(matches!(err, SinkError::MissingIdentity(_)));
    }
}
