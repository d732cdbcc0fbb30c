//! The write-once record handed to the submission sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::answers::{AnswerMap, AnswerValue};

/// Well-known field ids shared by the step catalog and the record builder.
pub mod keys {
    pub const ROLE: &str = "role";
    pub const FULL_NAME: &str = "full_name";
    pub const EMAIL: &str = "email";
    pub const ORG: &str = "org";
    pub const PRIMARY_ARTIST: &str = "primary_artist";
    pub const LOCATION: &str = "location";
    pub const USE_CASES: &str = "use_cases";
    pub const CONNECTORS: &str = "connectors";
    pub const CONSENT: &str = "consent";
    pub const REVIEW: &str = "review";
}

/// Profile categories a signup collapses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Artist,
    Producer,
    Manager,
    Label,
    Other,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Artist => "Artist",
            Role::Producer => "Producer",
            Role::Manager => "Manager",
            Role::Label => "Label",
            Role::Other => "Other",
        }
    }
}

/// Collapses free-form role text into a canonical category by
/// case-insensitive prefix matching.
pub fn normalize_role(input: &str) -> Role {
    let lowered = input.trim().to_lowercase();
    if lowered.starts_with("art") {
        Role::Artist
    } else if lowered.starts_with("prod") {
        Role::Producer
    } else if lowered.starts_with("man") {
        Role::Manager
    } else if lowered.starts_with("lab") {
        Role::Label
    } else {
        Role::Other
    }
}

/// Environmental context captured outside the wizard: the referring page
/// and campaign tags. Injected rather than read from ambient global state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvContext {
    pub referrer: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

impl EnvContext {
    /// Reads campaign tags from the process environment.
    pub fn from_env() -> Self {
        Self {
            referrer: read_env("FUNNEL_REFERRER"),
            utm_source: read_env("FUNNEL_UTM_SOURCE"),
            utm_medium: read_env("FUNNEL_UTM_MEDIUM"),
            utm_campaign: read_env("FUNNEL_UTM_CAMPAIGN"),
        }
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Flat, JSON-serializable signup record. Constructed once at finalize and
/// never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub role: String,
    pub full_name: String,
    pub email: String,
    pub org: String,
    pub primary_artist: String,
    pub location: String,
    pub use_cases: Vec<String>,
    pub marketing_consent: bool,
    pub connectors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    pub subject_slug: String,
    pub email_domain: String,
    pub created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Merges the answer map, the connected sources, and the environmental
    /// context into a flat record.
    pub fn build(answers: &AnswerMap, connected: Vec<String>, env: &EnvContext) -> Self {
        let full_name = text_answer(answers, keys::FULL_NAME);
        let email = text_answer(answers, keys::EMAIL);
        let primary_artist = text_answer(answers, keys::PRIMARY_ARTIST);
        let role_raw = text_answer(answers, keys::ROLE);

        let subject = if primary_artist.is_empty() {
            full_name.as_str()
        } else {
            primary_artist.as_str()
        };

        Self {
            id: Uuid::new_v4(),
            role: normalize_role(&role_raw).as_str().to_string(),
            subject_slug: slug(subject),
            email_domain: email_domain(&email),
            full_name,
            email,
            org: text_answer(answers, keys::ORG),
            primary_artist,
            location: text_answer(answers, keys::LOCATION),
            use_cases: choice_answers(answers, keys::USE_CASES),
            marketing_consent: consent_answer(answers),
            connectors: connected,
            referrer: env.referrer.clone(),
            utm_source: env.utm_source.clone(),
            utm_medium: env.utm_medium.clone(),
            utm_campaign: env.utm_campaign.clone(),
            created_at: Utc::now(),
        }
    }
}

fn text_answer(answers: &AnswerMap, key: &str) -> String {
    match answers.get(key) {
        Some(AnswerValue::Text(value)) => value.clone(),
        Some(AnswerValue::Flag(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn choice_answers(answers: &AnswerMap, key: &str) -> Vec<String> {
    answers
        .get(key)
        .and_then(|answer| answer.as_choices())
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default()
}

fn consent_answer(answers: &AnswerMap) -> bool {
    match answers.get(keys::CONSENT) {
        Some(AnswerValue::Flag(flag)) => *flag,
        Some(AnswerValue::Text(value)) => {
            matches!(
                value.trim().to_lowercase().as_str(),
                "y" | "yes" | "true" | "1"
            )
        }
        _ => false,
    }
}

/// Lowercases and dash-separates a display name for use as a stable key.
pub fn slug(input: &str) -> String {
    let mut out = String::new();
    let mut last_dash = false;
    for ch in input.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_dash = false;
        } else if !out.is_empty() && !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

fn email_domain(email: &str) -> String {
    email
        .split_once('@')
        .map(|(_, domain)| domain.to_lowercase())
        .unwrap_or_default()
}
