//! End-to-end flows against the library surface: wizard session plus a
//! real sink, no terminal involved.

use funnel_core::domain::{AnswerValue, EnvContext};
use funnel_core::sink::{JsonSink, LogSink, SinkError, StorageKind, SubmissionSink};
use funnel_core::wizard::{signup_steps, SessionOptions, WizardError, WizardSession};
use tempfile::TempDir;

fn full_session() -> WizardSession {
    WizardSession::new(signup_steps(&SessionOptions::default())).expect("session")
}

/// Walks a session through every step with Jane Doe's answers, stopping
/// at the review step.
fn answer_all(session: &mut WizardSession) {
    session.choose_option("Producer").expect("role");
    session.submit_answer("Jane Doe").expect("name");
    session.submit_answer("jane@label.com").expect("email");
    session.submit_answer("Doe Recordings").expect("org");
    session.submit_answer("").expect("skip primary artist");
    session.submit_answer("Lisbon, Portugal").expect("location");
    session.choose_option("Campaigns").expect("use case");
    session.advance().expect("leave use cases");
    session.advance().expect("skip connectors");
    session.choose_option("Yes").expect("consent");
}

#[test]
fn completed_flow_produces_a_durable_record() {
    let dir = TempDir::new().expect("tempdir");
    let sink = JsonSink::new(dir.path().join("submissions"), 10).expect("sink");

    let mut session = full_session();
    answer_all(&mut session);
    assert!(session.is_complete());

    let outcome = session
        .finalize(&sink, &EnvContext::default())
        .expect("finalize");
    assert_eq!(
        outcome.receipt.expect("receipt").storage,
        StorageKind::Durable
    );

    let stored = sink.list().expect("list");
    assert_eq!(stored.len(), 1);
    let raw = std::fs::read_to_string(sink.dir().join(&stored[0])).expect("read record");
    assert!(raw.contains("\"fullName\": \"Jane Doe\""));
    assert!(raw.contains("\"role\": \"Producer\""));
    assert!(raw.contains("\"marketingConsent\": true"));
    assert!(raw.contains("\"emailDomain\": \"label.com\""));
}

#[test]
fn log_sink_flow_reports_logged_storage() {
    let mut session = full_session();
    answer_all(&mut session);
    let outcome = session
        .finalize(&LogSink::new(), &EnvContext::default())
        .expect("finalize");
    assert_eq!(
        outcome.receipt.expect("receipt").storage,
        StorageKind::Logged
    );
}

#[test]
fn invalid_email_never_advances() {
    let mut session = full_session();
    session.choose_option("Artist").expect("role");
    session.submit_answer("Jane Doe").expect("name");

    for bad in ["a@b", "a b@c.com", "@b.com", "plainaddress"] {
        let err = session.submit_answer(bad).expect_err("must fail");
        assert!(matches!(err, WizardError::Validation(_)), "{bad} accepted");
        assert_eq!(session.current_step().id, "email");
    }
    session.submit_answer("a@b.co").expect("minimal valid email");
    assert_eq!(session.current_step().id, "org");
}

#[test]
fn retreat_erases_forward_progress() {
    let mut session = full_session();
    session.choose_option("Artist").expect("role");
    session.submit_answer("Jane Doe").expect("name");

    session.retreat().expect("retreat");
    assert_eq!(session.current_step().id, "full_name");
    assert!(!session.answers().contains_key("full_name"));
    // The role answer from the earlier step survives.
    assert_eq!(
        session.answers().get("role"),
        Some(&AnswerValue::Text("Artist".into()))
    );
}

#[test]
fn identity_hint_skips_email_and_lands_in_record() {
    let options = SessionOptions {
        identity_hint: Some("hint@label.com".into()),
    };
    let mut session = WizardSession::new(signup_steps(&options)).expect("session");
    session.seed_answer("email", "hint@label.com");

    session.choose_option("Manager").expect("role");
    session.submit_answer("Alex Chen").expect("name");
    assert_eq!(session.current_step().id, "org", "email step is absent");
    session.submit_answer("").expect("skip org");
    session.submit_answer("").expect("skip artist");
    session.submit_answer("").expect("skip location");
    session.advance().expect("skip use cases");
    session.advance().expect("skip connectors");
    session.choose_option("No").expect("consent");

    let outcome = session
        .finalize(&LogSink::new(), &EnvContext::default())
        .expect("finalize");
    assert_eq!(outcome.record.email, "hint@label.com");
    assert!(!outcome.record.marketing_consent);
}

#[test]
fn env_context_flows_into_the_record() {
    let env = EnvContext {
        referrer: Some("newsletter".into()),
        utm_source: Some("mailchimp".into()),
        utm_medium: Some("email".into()),
        utm_campaign: Some("spring-launch".into()),
    };
    let mut session = full_session();
    answer_all(&mut session);
    let outcome = session.finalize(&LogSink::new(), &env).expect("finalize");
    assert_eq!(outcome.record.utm_campaign.as_deref(), Some("spring-launch"));
    assert_eq!(outcome.record.referrer.as_deref(), Some("newsletter"));
}

#[test]
fn sink_rejection_surfaces_as_degraded_receipt() {
    struct RejectingSink;
    impl SubmissionSink for RejectingSink {
        fn record(
            &self,
            _record: &funnel_core::domain::SubmissionRecord,
        ) -> funnel_core::sink::Result<funnel_core::sink::SinkReceipt> {
            Err(SinkError::Unavailable("backend offline".into()))
        }
    }

    let mut session = full_session();
    answer_all(&mut session);
    let outcome = session
        .finalize(&RejectingSink, &EnvContext::default())
        .expect("finalize still completes");
    assert!(matches!(outcome.receipt, Err(SinkError::Unavailable(_))));
    assert!(session.is_submitted());
}
