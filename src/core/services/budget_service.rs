use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::budget::Budget;
use crate::domain::common::EntryKind;
use crate::domain::Ledger;
use crate::errors::{EntityKind, LedgerError};

use super::ServiceResult;

/// Validated CRUD for per-category spending limits.
pub struct BudgetService;

impl BudgetService {
    /// A budget needs a positive limit and an existing, not yet budgeted, expense category.
    pub fn prepare_create(
        ledger: &Ledger,
        category_id: Uuid,
        limit: Decimal,
    ) -> ServiceResult<Budget> {
        Self::validate_limit(limit)?;
        let category = ledger.category(category_id).ok_or_else(|| {
            LedgerError::validation(format!("Category {} does not exist", category_id))
        })?;
        if category.kind != EntryKind::Expense {
            return Err(LedgerError::validation(format!(
                "Budgets apply to expense categories; `{}` is {}",
                category.name,
                category.kind.keyword()
            )));
        }
        if ledger.budget_for_category(category_id).is_some() {
            return Err(LedgerError::validation(format!(
                "A budget for `{}` already exists",
                category.name
            )));
        }
        Ok(Budget::new(category_id, limit))
    }

    /// Only the limit of an existing budget can change.
    pub fn prepare_update(ledger: &Ledger, id: Uuid, limit: Decimal) -> ServiceResult<Budget> {
        Self::validate_limit(limit)?;
        let existing = ledger
            .budget(id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::Budget, id))?;
        let mut updated = existing.clone();
        updated.limit = limit;
        Ok(updated)
    }

    pub fn ensure_exists(ledger: &Ledger, id: Uuid) -> ServiceResult<()> {
        ledger
            .budget(id)
            .map(|_| ())
            .ok_or_else(|| LedgerError::not_found(EntityKind::Budget, id))
    }

    fn validate_limit(limit: Decimal) -> ServiceResult<()> {
        if limit <= Decimal::ZERO {
            return Err(LedgerError::validation(format!(
                "Budget limit must be positive, got {}",
                limit
            )));
        }
        Ok(())
    }
}
