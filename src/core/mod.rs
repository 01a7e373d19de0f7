pub mod integrity;
pub mod ledger_manager;
pub mod services;
pub mod session;
pub mod utils;

pub use ledger_manager::{ChangeAction, LedgerChange, LedgerManager, LedgerResult, LoadReport};
pub use session::Session;
