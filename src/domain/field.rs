//! Declarative description of wizard steps.
//!
//! Each step of the signup assistant is a [`FieldSpec`]: a prompt, an input
//! kind, a required/optional flag, and an optional validation rule. The
//! ordering of specs defines the step sequence for a session.

use std::fmt;
use std::sync::Arc;

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Supported input kinds for wizard steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form text answered through the composer.
    Text,
    /// Exactly one option; answering advances the step.
    SingleChoice,
    /// Any number of options; advancing is explicit.
    MultiChoice,
    /// Third-party account-linking toggles (simulated handshakes).
    Connectors,
    /// Terminal summary step preceding submission.
    Review,
}

type ValidatorCallback = dyn Fn(&str) -> Result<String, String> + Send + Sync;
type SharedValidatorCallback = Arc<ValidatorCallback>;

/// Built-in validation helpers.
#[derive(Clone)]
pub enum Validator {
    None,
    NonEmpty,
    Email,
    Custom(SharedValidatorCallback),
}

impl Validator {
    pub fn validate(&self, input: &str) -> Result<String, ValidationError> {
        match self {
            Validator::None => Ok(input.trim().to_string()),
            Validator::NonEmpty => {
                if input.trim().is_empty() {
                    Err(ValidationError::new("Value cannot be empty"))
                } else {
                    Ok(input.trim().to_string())
                }
            }
            Validator::Email => {
                let trimmed = input.trim();
                if is_valid_email(trimmed) {
                    Ok(trimmed.to_string())
                } else {
                    Err(ValidationError::new(
                        "Enter a valid email address (e.g., you@company.com)",
                    ))
                }
            }
            Validator::Custom(func) => func(input).map_err(ValidationError::new),
        }
    }
}

/// Email shape check: `localpart@domain.tld` with at least one dot after
/// the `@` and no whitespace anywhere.
pub fn is_valid_email(input: &str) -> bool {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

/// Declarative description of a single wizard step.
#[derive(Clone)]
pub struct FieldSpec {
    pub id: &'static str,
    pub prompt: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub options: Vec<String>,
    pub placeholder: Option<&'static str>,
    /// Whether choice steps accept a free-form "Other" answer.
    pub include_other: bool,
    pub validator: Validator,
}

impl FieldSpec {
    pub fn new(id: &'static str, prompt: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            prompt,
            kind,
            required: true,
            options: Vec::new(),
            placeholder: None,
            include_other: false,
            validator: Validator::None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn with_other(mut self) -> Self {
        self.include_other = true;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Effective validator for text input: required fields without an
    /// explicit rule still reject empty values.
    pub fn validate_text(&self, raw: &str) -> Result<String, ValidationError> {
        match (&self.validator, self.required) {
            (Validator::None, true) => Validator::NonEmpty.validate(raw),
            (validator, _) => validator.validate(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validator_truth_table() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("jane@label.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
    }

    #[test]
    fn required_text_rejects_empty() {
        let field = FieldSpec::new("full_name", "What's your name?", FieldKind::Text);
        assert!(field.validate_text("   ").is_err());
        assert_eq!(field.validate_text(" Jane ").unwrap(), "Jane");
    }

    #[test]
    fn optional_text_accepts_empty() {
        let field = FieldSpec::new("org", "Which org?", FieldKind::Text).optional();
        assert_eq!(field.validate_text("").unwrap(), "");
    }

    #[test]
    fn custom_validator_reports_message() {
        let validator = Validator::Custom(Arc::new(|input| {
            if input.len() > 3 {
                Err("too long".into())
            } else {
                Ok(input.to_string())
            }
        }));
        assert_eq!(
            validator.validate("long input").unwrap_err().message,
            "too long"
        );
    }
}
