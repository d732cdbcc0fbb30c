#![doc(test(attr(deny(warnings))))]

//! Funnel Core implements a marketing-site signup funnel: a decorative
//! landing portal, a multi-step assistant wizard, and a submission sink
//! that stores or logs the finished record.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod sink;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Funnel Core tracing initialized.");
    });
}
