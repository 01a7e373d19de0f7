//! Business logic helpers for managing transactions.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::transaction::{Transaction, TransactionDraft, TransactionPatch};
use crate::domain::Ledger;
use crate::errors::{EntityKind, LedgerError};

use super::{require_name, ServiceResult};

/// Minimum trimmed length of a transaction name.
pub const MIN_NAME_CHARS: usize = 2;

/// Validation and ordering helpers for ledger transactions.
pub struct TransactionService;

impl TransactionService {
    /// Validates a draft and builds the transaction it describes without touching the ledger.
    pub fn prepare_create(ledger: &Ledger, draft: TransactionDraft) -> ServiceResult<Transaction> {
        let transaction = draft.into_transaction();
        Self::validate(ledger, &transaction)?;
        Ok(transaction)
    }

    /// Merges `patch` into the stored transaction and re-validates the result.
    pub fn prepare_update(
        ledger: &Ledger,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> ServiceResult<Transaction> {
        let existing = ledger
            .transaction(id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::Transaction, id))?;
        let merged = patch.apply_to(existing);
        Self::validate(ledger, &merged)?;
        Ok(merged)
    }

    pub fn ensure_exists(ledger: &Ledger, id: Uuid) -> ServiceResult<()> {
        ledger
            .transaction(id)
            .map(|_| ())
            .ok_or_else(|| LedgerError::not_found(EntityKind::Transaction, id))
    }

    /// Checks amount, name and references of a fully-formed transaction.
    pub fn validate(ledger: &Ledger, transaction: &Transaction) -> ServiceResult<()> {
        if transaction.amount <= Decimal::ZERO {
            return Err(LedgerError::validation(format!(
                "Transaction amount must be positive, got {}",
                transaction.amount
            )));
        }
        require_name("Transaction", &transaction.name, MIN_NAME_CHARS)?;
        if ledger.account(transaction.account_id).is_none() {
            return Err(LedgerError::validation(format!(
                "Account {} does not exist",
                transaction.account_id
            )));
        }
        let category = ledger.category(transaction.category_id).ok_or_else(|| {
            LedgerError::validation(format!(
                "Category {} does not exist",
                transaction.category_id
            ))
        })?;
        if category.kind != transaction.kind {
            return Err(LedgerError::validation(format!(
                "Category `{}` is {} but the transaction is {}",
                category.name,
                category.kind.keyword(),
                transaction.kind.keyword()
            )));
        }
        Ok(())
    }

    /// Most recent first; same-day entries ordered by name.
    pub fn recent(ledger: &Ledger, limit: usize) -> Vec<&Transaction> {
        let mut sorted: Vec<&Transaction> = ledger.transactions.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.name.cmp(&b.name)));
        sorted.truncate(limit);
        sorted
    }
}
