//! CLI wiring: mode detection, error surface, and the top-level run loop.

use std::{env, io};

use crate::config::ConfigManager;
use crate::domain::submission::{keys, EnvContext};
use crate::errors::FunnelError;
use crate::sink::{sink_from_config, SinkError};
use crate::wizard::{signup_steps, SessionOptions, WizardError, WizardSession};

use super::{assistant, io as cli_io, portal};

/// Set to any non-empty value to drive the CLI from piped stdin lines
/// instead of interactive prompts.
pub const SCRIPT_MODE_ENV: &str = "FUNNEL_CORE_CLI_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub fn cli_mode() -> CliMode {
    match env::var(SCRIPT_MODE_ENV) {
        Ok(value) if !value.is_empty() => CliMode::Script,
        _ => CliMode::Interactive,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("input stream closed")]
    InputClosed,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] FunnelError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

/// Runs the signup funnel end to end: landing portal, assistant wizard,
/// then the confirmation screen.
pub fn run_cli() -> Result<(), CliError> {
    let config = ConfigManager::new()?.load()?;
    let sink = sink_from_config(&config)?;

    let mut env_context = EnvContext::from_env();
    if env_context.utm_campaign.is_none() {
        env_context.utm_campaign = config.campaign.clone();
    }

    let prompter = cli_io::Prompter::new(cli_mode());
    let identity_hint = portal::run_portal(&prompter)?;

    let options = SessionOptions {
        identity_hint: identity_hint.clone(),
    };
    let mut session = WizardSession::new(signup_steps(&options))?;
    if let Some(email) = identity_hint {
        session.seed_answer(keys::EMAIL, email);
    }

    match assistant::run_assistant(&mut session, sink.as_ref(), &env_context, &prompter)? {
        Some(_outcome) => Ok(()),
        None => {
            cli_io::print_info("No problem. Come back any time.");
            Ok(())
        }
    }
}
