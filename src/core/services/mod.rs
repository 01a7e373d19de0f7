pub mod account_service;
pub mod budget_service;
pub mod category_service;
pub mod summary_service;
pub mod transaction_service;

pub use account_service::AccountService;
pub use budget_service::BudgetService;
pub use category_service::CategoryService;
pub use summary_service::{
    AccountBalance, BudgetProgress, CategoryTotal, DashboardOptions, DashboardSummary,
    MonthlyPoint, PercentChange, PeriodTotals, SummaryService,
};
pub use transaction_service::TransactionService;

use crate::errors::LedgerError;

/// Services report the same taxonomy the store does, so `?` flows straight through.
pub type ServiceResult<T> = Result<T, LedgerError>;

pub(crate) fn require_name(label: &str, name: &str, min_chars: usize) -> ServiceResult<()> {
    let trimmed = name.trim();
    if trimmed.chars().count() < min_chars.max(1) {
        return Err(LedgerError::validation(if min_chars <= 1 {
            format!("{label} name must not be empty")
        } else {
            format!("{label} name must be at least {min_chars} characters")
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
