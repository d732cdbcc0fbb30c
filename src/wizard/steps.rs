//! The signup step catalog.

use crate::domain::field::{FieldKind, FieldSpec, Validator};
use crate::domain::submission::keys;

pub const ROLE_OPTIONS: [&str; 5] = ["Artist", "Producer", "Manager", "Label", "Other"];

pub const USE_CASE_OPTIONS: [&str; 6] = [
    "Campaigns",
    "A&R Discovery",
    "Release Planning",
    "Creator Marketing",
    "Reporting/Analytics",
    "Rights/IP",
];

pub const CONSENT_OPTIONS: [&str; 2] = ["Yes", "No"];

/// Per-session tweaks applied before the catalog is built.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Email captured on the landing screen. When present the email step
    /// is dropped and the hint is seeded as the email answer.
    pub identity_hint: Option<String>,
}

/// Builds the ordered step catalog for one signup session.
pub fn signup_steps(options: &SessionOptions) -> Vec<FieldSpec> {
    let mut steps = vec![FieldSpec::new(
        keys::ROLE,
        "What best describes you?",
        FieldKind::SingleChoice,
    )
    .with_options(ROLE_OPTIONS)];

    steps.push(FieldSpec::new(
        keys::FULL_NAME,
        "What's your name?",
        FieldKind::Text,
    ));

    if options.identity_hint.is_none() {
        steps.push(
            FieldSpec::new(keys::EMAIL, "Where can we reach you?", FieldKind::Text)
                .with_placeholder("you@label.com")
                .with_validator(Validator::Email),
        );
    }

    steps.push(
        FieldSpec::new(keys::ORG, "Which label, agency, or team are you with?", FieldKind::Text)
            .optional()
            .with_placeholder("Independent is fine too"),
    );
    steps.push(
        FieldSpec::new(
            keys::PRIMARY_ARTIST,
            "Which artist or project is front of mind?",
            FieldKind::Text,
        )
        .optional()
        .with_placeholder("Artist or project name"),
    );
    steps.push(
        FieldSpec::new(keys::LOCATION, "Where are you based?", FieldKind::Text)
            .optional()
            .with_placeholder("City, Country"),
    );
    steps.push(
        FieldSpec::new(
            keys::USE_CASES,
            "What would you like to use it for?",
            FieldKind::MultiChoice,
        )
        .optional()
        .with_options(USE_CASE_OPTIONS)
        .with_other(),
    );
    steps.push(
        FieldSpec::new(
            keys::CONNECTORS,
            "Want to link your platforms now?",
            FieldKind::Connectors,
        )
        .optional(),
    );
    steps.push(
        FieldSpec::new(
            keys::CONSENT,
            "Can we send you product updates?",
            FieldKind::SingleChoice,
        )
        .with_options(CONSENT_OPTIONS),
    );
    steps.push(
        FieldSpec::new(keys::REVIEW, "Everything look right?", FieldKind::Review).optional(),
    );
    steps
}
