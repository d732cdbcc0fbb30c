//! Conversation transcript shown alongside the assistant wizard.

use crate::domain::answers::AnswerMap;
use crate::domain::field::FieldSpec;

/// Who produced a transcript bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Prompt,
    Response,
}

/// One displayed bubble in the assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl TranscriptEntry {
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Prompt,
            text: text.into(),
        }
    }

    pub fn response(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Response,
            text: text.into(),
        }
    }
}

/// Pure projection of a transcript from session state. Each step up to the
/// current index contributes its prompt; completed steps additionally
/// contribute the recorded answer (or the skipped sentinel). Keeps the
/// transcript shape reproducible without any view-layer dependency.
pub fn render_transcript(
    steps: &[FieldSpec],
    answers: &AnswerMap,
    current_index: usize,
) -> Vec<TranscriptEntry> {
    let mut entries = Vec::new();
    for (index, step) in steps.iter().enumerate().take(current_index + 1) {
        entries.push(TranscriptEntry::prompt(step.prompt));
        if index < current_index {
            let text = answers
                .get(step.id)
                .map(|answer| answer.display_text())
                .unwrap_or_else(|| "(skipped)".to_string());
            entries.push(TranscriptEntry::response(text));
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::answers::AnswerValue;
    use crate::domain::field::FieldKind;

    fn sample_steps() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("role", "What best describes you?", FieldKind::SingleChoice),
            FieldSpec::new("full_name", "What's your name?", FieldKind::Text),
            FieldSpec::new("review", "Review and submit?", FieldKind::Review),
        ]
    }

    #[test]
    fn projection_ends_with_current_prompt() {
        let steps = sample_steps();
        let mut answers = AnswerMap::new();
        answers.insert("role".into(), AnswerValue::text("Artist"));

        let entries = render_transcript(&steps, &answers, 1);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], TranscriptEntry::prompt("What best describes you?"));
        assert_eq!(entries[1], TranscriptEntry::response("Artist"));
        assert_eq!(entries[2], TranscriptEntry::prompt("What's your name?"));
    }

    #[test]
    fn projection_length_is_bounded() {
        let steps = sample_steps();
        let answers = AnswerMap::new();
        for index in 0..steps.len() {
            let entries = render_transcript(&steps, &answers, index);
            assert!(entries.len() <= 2 * (index + 1));
        }
    }

    #[test]
    fn missing_answer_renders_skipped() {
        let steps = sample_steps();
        let answers = AnswerMap::new();
        let entries = render_transcript(&steps, &answers, 1);
        assert_eq!(entries[1], TranscriptEntry::response("(skipped)"));
    }
}
