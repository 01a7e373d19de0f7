#![doc(test(attr(deny(warnings))))]

//! MoneyDesk Core keeps a personal-finance ledger (accounts, categories,
//! transactions and budgets) in step with a per-user document store and
//! derives balances, budget progress and report series from it on demand.

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod query;
pub mod storage;
pub mod utils;

pub use crate::core::services::SummaryService;
pub use crate::core::{LedgerManager, Session};
pub use crate::errors::{CollaboratorError, LedgerError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("MoneyDesk core tracing initialized.");
    });
}
