pub mod account;
pub mod budget;
pub mod category;
pub mod common;
pub mod defaults;
pub mod ledger;
pub mod period;
pub mod transaction;

pub use account::{Account, AccountDraft, AccountKind, AccountPatch};
pub use budget::{Budget, BudgetStatus};
pub use category::{Category, CategoryPatch};
pub use common::{EntryKind, Identifiable, UNKNOWN_LABEL};
pub use ledger::Ledger;
pub use period::{PeriodPreset, ReportingPeriod};
pub use transaction::{Frequency, Recurrence, Transaction, TransactionDraft, TransactionPatch};
