#![doc(test(attr(deny(warnings))))]

//! Club Ledger tracks a club's member roster, monthly dues and attendance,
//! and derives the per-member and club-wide totals used for reporting.

pub mod attendance;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod export;
pub mod fixtures;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Club Ledger tracing initialized.");
    });
}
