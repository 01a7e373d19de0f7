use uuid::Uuid;

use crate::domain::account::{Account, AccountDraft, AccountPatch};
use crate::domain::common::normalized_name;
use crate::domain::Ledger;
use crate::errors::{EntityKind, LedgerError};

use super::{require_name, ServiceResult};

pub struct AccountService;

impl AccountService {
    /// Validates a draft against the ledger and builds the account it describes.
    pub fn prepare_create(ledger: &Ledger, draft: AccountDraft) -> ServiceResult<Account> {
        require_name("Account", &draft.name, 1)?;
        Self::validate_name(ledger, None, &draft.name)?;
        Ok(draft.into_account())
    }

    /// Returns the merged account that `patch` would produce.
    pub fn prepare_update(ledger: &Ledger, id: Uuid, patch: &AccountPatch) -> ServiceResult<Account> {
        let existing = ledger
            .account(id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::Account, id))?;
        let merged = patch.apply_to(existing);
        require_name("Account", &merged.name, 1)?;
        Self::validate_name(ledger, Some(id), &merged.name)?;
        Ok(merged)
    }

    /// Deleting never cascades; referencing transactions keep a dangling id.
    pub fn ensure_exists(ledger: &Ledger, id: Uuid) -> ServiceResult<()> {
        ledger
            .account(id)
            .map(|_| ())
            .ok_or_else(|| LedgerError::not_found(EntityKind::Account, id))
    }

    fn validate_name(ledger: &Ledger, exclude: Option<Uuid>, candidate: &str) -> ServiceResult<()> {
        let normalized = normalized_name(candidate);
        let duplicate = ledger.accounts.iter().any(|account| {
            normalized_name(&account.name) == normalized && exclude.map_or(true, |id| account.id != id)
        });
        if duplicate {
            Err(LedgerError::validation(format!(
                "Account `{}` already exists",
                candidate.trim()
            )))
        } else {
            Ok(())
        }
    }
}
