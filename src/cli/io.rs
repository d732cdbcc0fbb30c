//! Prompting for both terminal modes.
//!
//! Interactive mode goes through dialoguer; script mode consumes one stdin
//! line per prompt so flows can be piped in tests and automation.

use std::io::{self, BufRead};

use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Password, Select};

use crate::cli::core::{CliError, CliMode};
use crate::cli::output;

/// Token a user types to step back one field.
pub const BACK_TOKEN: &str = ":back";
/// Token a user types to abandon the flow.
pub const CANCEL_TOKEN: &str = ":cancel";

pub struct Prompter {
    mode: CliMode,
    theme: ColorfulTheme,
}

impl Prompter {
    pub fn new(mode: CliMode) -> Self {
        Self {
            mode,
            theme: ColorfulTheme::default(),
        }
    }

    /// Free-form text. Empty input is allowed; the caller decides what an
    /// empty answer means for the step at hand.
    pub fn text(&self, prompt: &str) -> Result<String, CliError> {
        match self.mode {
            CliMode::Interactive => Ok(Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?),
            CliMode::Script => self.script_line(),
        }
    }

    /// Password-style input. Interactive mode hides the echo.
    pub fn secret(&self, prompt: &str) -> Result<String, CliError> {
        match self.mode {
            CliMode::Interactive => Ok(Password::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()?),
            CliMode::Script => self.script_line(),
        }
    }

    /// Single selection from a list. Script mode accepts a 1-based index
    /// or a case-insensitive label.
    pub fn select(&self, prompt: &str, items: &[String]) -> Result<usize, CliError> {
        match self.mode {
            CliMode::Interactive => Ok(Select::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(items)
                .default(0)
                .interact()?),
            CliMode::Script => {
                let line = self.script_line()?;
                resolve_item(&line, items)
                    .ok_or_else(|| CliError::InvalidInput(format!("Unknown option `{line}`")))
            }
        }
    }

    /// Multiple selection. Script mode takes a comma-separated list of
    /// indices or labels; an empty line selects nothing.
    pub fn multi_select(&self, prompt: &str, items: &[String]) -> Result<Vec<usize>, CliError> {
        match self.mode {
            CliMode::Interactive => Ok(MultiSelect::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(items)
                .interact()?),
            CliMode::Script => {
                let line = self.script_line()?;
                if line.trim().is_empty() {
                    return Ok(Vec::new());
                }
                let mut picked = Vec::new();
                for token in line.split(',') {
                    let index = resolve_item(token, items).ok_or_else(|| {
                        CliError::InvalidInput(format!("Unknown option `{}`", token.trim()))
                    })?;
                    if !picked.contains(&index) {
                        picked.push(index);
                    }
                }
                Ok(picked)
            }
        }
    }

    fn script_line(&self) -> Result<String, CliError> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(CliError::InputClosed);
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

fn resolve_item(token: &str, items: &[String]) -> Option<usize> {
    let token = token.trim();
    if let Ok(number) = token.parse::<usize>() {
        if (1..=items.len()).contains(&number) {
            return Some(number - 1);
        }
    }
    items
        .iter()
        .position(|item| item.eq_ignore_ascii_case(token))
}

pub fn print_info(message: impl std::fmt::Display) {
    output::info(message);
}
