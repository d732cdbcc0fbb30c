//! Signup wizard: the step catalog and the session state machine.

pub mod session;
pub mod steps;

pub use session::{FinalizeOutcome, WizardError, WizardSession};
pub use steps::{signup_steps, SessionOptions};
