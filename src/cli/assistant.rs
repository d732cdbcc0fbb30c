//! The signup assistant loop: one prompt per wizard step, with back and
//! cancel available everywhere.

use std::time::Instant;

use crate::cli::core::CliError;
use crate::cli::io::{Prompter, BACK_TOKEN, CANCEL_TOKEN};
use crate::cli::output;
use crate::domain::connector::{connector_catalog, ConnectorStatus};
use crate::domain::field::{FieldKind, FieldSpec};
use crate::domain::submission::EnvContext;
use crate::sink::{StorageKind, SubmissionSink};
use crate::wizard::{FinalizeOutcome, WizardError, WizardSession};

const OTHER_LABEL: &str = "Other…";
const BACK_LABEL: &str = "⟵ Back";
const CANCEL_LABEL: &str = "Cancel signup";
const CONTINUE_LABEL: &str = "Continue";
const SUBMIT_LABEL: &str = "Submit";

/// Drives the session to submission or cancellation. Returns `None` when
/// the user cancels.
pub fn run_assistant(
    session: &mut WizardSession,
    sink: &dyn SubmissionSink,
    env: &EnvContext,
    prompter: &Prompter,
) -> Result<Option<FinalizeOutcome>, CliError> {
    output::section("Tell us about you");

    loop {
        let step = session.current_step().clone();
        let control = match step.kind {
            FieldKind::Text => text_step(session, &step, prompter)?,
            FieldKind::SingleChoice => single_choice_step(session, &step, prompter)?,
            FieldKind::MultiChoice => multi_choice_step(session, &step, prompter)?,
            FieldKind::Connectors => connectors_step(session, &step, prompter)?,
            FieldKind::Review => review_step(session, sink, env, prompter)?,
        };
        match control {
            Control::Stay => {}
            Control::Cancelled => return Ok(None),
            Control::Done(outcome) => {
                print_confirmation(&outcome);
                return Ok(Some(outcome));
            }
        }
    }
}

enum Control {
    Stay,
    Cancelled,
    Done(FinalizeOutcome),
}

fn text_step(
    session: &mut WizardSession,
    step: &FieldSpec,
    prompter: &Prompter,
) -> Result<Control, CliError> {
    let prompt = match step.placeholder {
        Some(hint) => format!("{} ({hint})", step.prompt),
        None => step.prompt.to_string(),
    };
    let input = prompter.text(&prompt)?;
    match input.trim() {
        BACK_TOKEN => {
            session.retreat()?;
            Ok(Control::Stay)
        }
        CANCEL_TOKEN => Ok(Control::Cancelled),
        _ => match session.submit_answer(&input) {
            Ok(()) => Ok(Control::Stay),
            Err(WizardError::Validation(err)) => {
                output::warning(err.to_string());
                Ok(Control::Stay)
            }
            Err(other) => Err(other.into()),
        },
    }
}

fn single_choice_step(
    session: &mut WizardSession,
    step: &FieldSpec,
    prompter: &Prompter,
) -> Result<Control, CliError> {
    let mut items = step.options.clone();
    if step.include_other && !items.iter().any(|item| item == OTHER_LABEL) {
        items.push(OTHER_LABEL.to_string());
    }
    items.push(BACK_LABEL.to_string());
    items.push(CANCEL_LABEL.to_string());

    let picked = &items[prompter.select(step.prompt, &items)?];
    match picked.as_str() {
        BACK_LABEL => {
            session.retreat()?;
            Ok(Control::Stay)
        }
        CANCEL_LABEL => Ok(Control::Cancelled),
        OTHER_LABEL => {
            let custom = prompter.text("Tell us in your own words")?;
            if custom.trim().is_empty() {
                output::warning("Nothing entered; pick an option instead.");
            } else {
                session.choose_option(custom.trim())?;
            }
            Ok(Control::Stay)
        }
        option => {
            session.choose_option(option)?;
            Ok(Control::Stay)
        }
    }
}

fn multi_choice_step(
    session: &mut WizardSession,
    step: &FieldSpec,
    prompter: &Prompter,
) -> Result<Control, CliError> {
    let mut items = step.options.clone();
    if step.include_other {
        items.push(OTHER_LABEL.to_string());
    }
    items.push(BACK_LABEL.to_string());

    let picks = prompter.multi_select(step.prompt, &items)?;
    if picks.iter().any(|&index| items[index] == BACK_LABEL) {
        session.retreat()?;
        return Ok(Control::Stay);
    }
    for &index in &picks {
        let label = &items[index];
        if label == OTHER_LABEL {
            let custom = prompter.text("Anything else?")?;
            if !custom.trim().is_empty() {
                session.choose_option(custom.trim())?;
            }
        } else {
            session.choose_option(label)?;
        }
    }
    match session.advance() {
        Ok(()) => Ok(Control::Stay),
        Err(WizardError::Validation(err)) => {
            output::warning(err.to_string());
            Ok(Control::Stay)
        }
        Err(other) => Err(other.into()),
    }
}

fn connectors_step(
    session: &mut WizardSession,
    step: &FieldSpec,
    prompter: &Prompter,
) -> Result<Control, CliError> {
    loop {
        // Handshakes run on the clock, not on the prompt: pending ones
        // complete whenever the loop observes them next.
        session.poll_connectors(Instant::now());

        let mut items: Vec<String> = connector_catalog()
            .iter()
            .map(|connector| {
                let marker = match session.connectors().status(connector.key) {
                    ConnectorStatus::On => "[on] ",
                    ConnectorStatus::Connecting { .. } => "[…] ",
                    ConnectorStatus::Off => "",
                };
                format!("{marker}{}", connector.label)
            })
            .collect();
        items.push(CONTINUE_LABEL.to_string());
        items.push(BACK_LABEL.to_string());

        let picked = prompter.select(step.prompt, &items)?;
        if items[picked] == CONTINUE_LABEL {
            session.poll_connectors(Instant::now());
            session.advance()?;
            return Ok(Control::Stay);
        }
        if items[picked] == BACK_LABEL {
            session.retreat()?;
            return Ok(Control::Stay);
        }

        let connector = &connector_catalog()[picked];
        match session.connectors().status(connector.key) {
            ConnectorStatus::On => {
                session.disconnect(connector.key)?;
                output::info(format!("Disconnected {}.", connector.label));
            }
            ConnectorStatus::Connecting { .. } => {
                output::info(format!("{} is still linking.", connector.label));
            }
            ConnectorStatus::Off => {
                session.begin_connect(connector.key)?;
                output::info(format!("Linking {}…", connector.label));
            }
        }
    }
}

fn review_step(
    session: &mut WizardSession,
    sink: &dyn SubmissionSink,
    env: &EnvContext,
    prompter: &Prompter,
) -> Result<Control, CliError> {
    session.poll_connectors(Instant::now());
    output::section("Review");
    for step in session.steps() {
        if step.kind == FieldKind::Review {
            continue;
        }
        let shown = match step.kind {
            FieldKind::Connectors => {
                let connected = session.connectors().connected();
                if connected.is_empty() {
                    "(skipped)".to_string()
                } else {
                    connected.join(", ")
                }
            }
            _ => session
                .answers()
                .get(step.id)
                .map(|answer| answer.display_text())
                .unwrap_or_else(|| "(skipped)".to_string()),
        };
        output::info(format!("{} {}", step.prompt, shown));
    }

    let items = vec![
        SUBMIT_LABEL.to_string(),
        BACK_LABEL.to_string(),
        CANCEL_LABEL.to_string(),
    ];
    let picked = &items[prompter.select("Everything look right?", &items)?];
    match picked.as_str() {
        BACK_LABEL => {
            session.retreat()?;
            Ok(Control::Stay)
        }
        CANCEL_LABEL => Ok(Control::Cancelled),
        _ => match session.finalize(sink, env) {
            Ok(outcome) => Ok(Control::Done(outcome)),
            Err(WizardError::Incomplete { first_missing }) => {
                output::warning(format!("One more thing: `{first_missing}` is still empty."));
                while session.index() > 0 && session.current_step().id != first_missing {
                    session.retreat()?;
                }
                Ok(Control::Stay)
            }
            Err(other) => Err(other.into()),
        },
    }
}

fn print_confirmation(outcome: &FinalizeOutcome) {
    output::section("You're on the list");
    let record = &outcome.record;
    let name = if record.full_name.is_empty() {
        "there"
    } else {
        record.full_name.as_str()
    };
    match &outcome.receipt {
        Ok(receipt) => {
            let note = match receipt.storage {
                StorageKind::Durable => "Your details are saved.",
                StorageKind::Logged => "Your details were recorded.",
            };
            output::success(format!("Thanks, {name}! {note}"));
        }
        Err(_) => {
            output::warning(format!(
                "Thanks, {name}! We hit a snag saving your details, but your signup went through."
            ));
        }
    }
    if !record.email.is_empty() {
        output::info(format!("We'll reach out at {}.", record.email));
    }
}
