//! Decorative landing screen shown before the signup assistant.
//!
//! The portal looks like a sign-in form but accounts do not exist yet:
//! the password is read and discarded, and a well-formed email is kept
//! only as an identity hint for the wizard.

use crate::cli::core::CliError;
use crate::cli::io::Prompter;
use crate::cli::output;
use crate::domain::field::is_valid_email;

pub fn run_portal(prompter: &Prompter) -> Result<Option<String>, CliError> {
    output::section("Welcome");
    output::info("Sign in, or press Enter twice to start fresh.");

    let email = prompter.text("Email")?;
    let _password = prompter.secret("Password")?;

    let email = email.trim();
    if email.is_empty() {
        return Ok(None);
    }
    if !is_valid_email(email) {
        output::warning("That email doesn't look right, so we'll ask again later.");
        return Ok(None);
    }

    output::info(format!("Good to see you, {email}. Let's get you set up."));
    Ok(Some(email.to_string()))
}
