use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::integrity::{self, IntegrityReport};
use crate::core::services::{
    AccountService, BudgetService, CategoryService, TransactionService,
};
use crate::domain::{
    Account, AccountDraft, AccountPatch, Budget, Category, CategoryPatch, EntryKind,
    Identifiable, Ledger, Transaction, TransactionDraft, TransactionPatch,
};
use crate::errors::{EntityKind, LedgerError};
use crate::storage::{Collection, Document, StorageBackend, UserId};

pub type LedgerResult<T> = Result<T, LedgerError>;

/// What happened to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeAction::Created => "created",
            ChangeAction::Updated => "updated",
            ChangeAction::Deleted => "deleted",
        };
        f.write_str(label)
    }
}

/// Delivered to subscribers after a mutation has been persisted and applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerChange {
    pub entity: EntityKind,
    pub id: Uuid,
    pub action: ChangeAction,
    pub revision: u64,
}

/// Outcome of a refresh from the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub warnings: Vec<String>,
    pub skipped: usize,
    pub revision: u64,
}

type Observer = Box<dyn FnMut(&LedgerChange) + Send>;

/// Facade that keeps a local snapshot of one user's ledger in step with a remote store.
///
/// Every mutation is validated against the snapshot, written to the backend, and only
/// then applied locally. A failed write leaves the snapshot exactly as it was.
pub struct LedgerManager {
    user: UserId,
    ledger: Ledger,
    storage: Arc<dyn StorageBackend>,
    observers: Vec<Observer>,
}

impl LedgerManager {
    pub fn new(user: UserId, storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            user,
            ledger: Ledger::new(),
            storage,
            observers: Vec::new(),
        }
    }

    /// Creates a manager and performs the initial read.
    pub fn open(user: UserId, storage: Arc<dyn StorageBackend>) -> LedgerResult<(Self, LoadReport)> {
        let mut manager = Self::new(user, storage);
        let report = manager.refresh()?;
        Ok((manager, report))
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn snapshot(&self) -> &Ledger {
        &self.ledger
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&LedgerChange) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn integrity_report(&self) -> IntegrityReport {
        integrity::check(&self.ledger)
    }

    // ----- transactions -----

    pub fn create_transaction(&mut self, draft: TransactionDraft) -> LedgerResult<Transaction> {
        let transaction = TransactionService::prepare_create(&self.ledger, draft)?;
        self.write(Collection::Transactions, &transaction, ChangeAction::Created)?;
        self.ledger.add_transaction(transaction.clone());
        self.record(EntityKind::Transaction, transaction.id, ChangeAction::Created);
        Ok(transaction)
    }

    pub fn update_transaction(
        &mut self,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> LedgerResult<Transaction> {
        let merged = TransactionService::prepare_update(&self.ledger, id, patch)?;
        self.write(Collection::Transactions, &merged, ChangeAction::Updated)?;
        self.ledger.replace_transaction(merged.clone());
        self.record(EntityKind::Transaction, id, ChangeAction::Updated);
        Ok(merged)
    }

    pub fn delete_transaction(&mut self, id: Uuid) -> LedgerResult<()> {
        TransactionService::ensure_exists(&self.ledger, id)?;
        self.erase(Collection::Transactions, id)?;
        self.ledger.remove_transaction(id);
        self.record(EntityKind::Transaction, id, ChangeAction::Deleted);
        Ok(())
    }

    // ----- accounts -----

    pub fn create_account(&mut self, draft: AccountDraft) -> LedgerResult<Account> {
        let account = AccountService::prepare_create(&self.ledger, draft)?;
        self.write(Collection::Accounts, &account, ChangeAction::Created)?;
        self.ledger.add_account(account.clone());
        self.record(EntityKind::Account, account.id, ChangeAction::Created);
        Ok(account)
    }

    pub fn update_account(&mut self, id: Uuid, patch: &AccountPatch) -> LedgerResult<Account> {
        let merged = AccountService::prepare_update(&self.ledger, id, patch)?;
        self.write(Collection::Accounts, &merged, ChangeAction::Updated)?;
        self.ledger.replace_account(merged.clone());
        self.record(EntityKind::Account, id, ChangeAction::Updated);
        Ok(merged)
    }

    /// Transactions referencing the account are left in place.
    pub fn delete_account(&mut self, id: Uuid) -> LedgerResult<()> {
        AccountService::ensure_exists(&self.ledger, id)?;
        self.erase(Collection::Accounts, id)?;
        self.ledger.remove_account(id);
        self.record(EntityKind::Account, id, ChangeAction::Deleted);
        Ok(())
    }

    // ----- categories -----

    pub fn create_category(&mut self, name: &str, kind: EntryKind) -> LedgerResult<Category> {
        let category = CategoryService::prepare_create(&self.ledger, name, kind)?;
        self.write(Collection::Categories, &category, ChangeAction::Created)?;
        self.ledger.add_category(category.clone());
        self.record(EntityKind::Category, category.id, ChangeAction::Created);
        Ok(category)
    }

    pub fn update_category(&mut self, id: Uuid, patch: &CategoryPatch) -> LedgerResult<Category> {
        let merged = CategoryService::prepare_update(&self.ledger, id, patch)?;
        self.write(Collection::Categories, &merged, ChangeAction::Updated)?;
        self.ledger.replace_category(merged.clone());
        self.record(EntityKind::Category, id, ChangeAction::Updated);
        Ok(merged)
    }

    /// Transactions and budgets referencing the category are left in place.
    pub fn delete_category(&mut self, id: Uuid) -> LedgerResult<()> {
        CategoryService::ensure_exists(&self.ledger, id)?;
        self.erase(Collection::Categories, id)?;
        self.ledger.remove_category(id);
        self.record(EntityKind::Category, id, ChangeAction::Deleted);
        Ok(())
    }

    /// Inserts the default categories when the user has none, or finishes a seed that
    /// stopped partway. Returns how many were added.
    pub fn seed_defaults(&mut self) -> LedgerResult<usize> {
        let candidates = CategoryService::seed_candidates(&self.ledger);
        let mut inserted = 0;
        for category in candidates {
            self.write(Collection::Categories, &category, ChangeAction::Created)?;
            let id = self.ledger.add_category(category);
            self.record(EntityKind::Category, id, ChangeAction::Created);
            inserted += 1;
        }
        if inserted > 0 {
            info!(user = %self.user, inserted, "default categories seeded");
        }
        Ok(inserted)
    }

    // ----- budgets -----

    pub fn create_budget(&mut self, category_id: Uuid, limit: Decimal) -> LedgerResult<Budget> {
        let budget = BudgetService::prepare_create(&self.ledger, category_id, limit)?;
        self.write(Collection::Budgets, &budget, ChangeAction::Created)?;
        self.ledger.add_budget(budget.clone());
        self.record(EntityKind::Budget, budget.id, ChangeAction::Created);
        Ok(budget)
    }

    pub fn update_budget(&mut self, id: Uuid, limit: Decimal) -> LedgerResult<Budget> {
        let updated = BudgetService::prepare_update(&self.ledger, id, limit)?;
        self.write(Collection::Budgets, &updated, ChangeAction::Updated)?;
        self.ledger.replace_budget(updated.clone());
        self.record(EntityKind::Budget, id, ChangeAction::Updated);
        Ok(updated)
    }

    pub fn delete_budget(&mut self, id: Uuid) -> LedgerResult<()> {
        BudgetService::ensure_exists(&self.ledger, id)?;
        self.erase(Collection::Budgets, id)?;
        self.ledger.remove_budget(id);
        self.record(EntityKind::Budget, id, ChangeAction::Deleted);
        Ok(())
    }

    // ----- synchronisation -----

    /// Replaces the snapshot with the backend's current contents.
    ///
    /// Documents that fail to decode are skipped and reported. If any collection cannot be
    /// read, the previous snapshot is kept.
    pub fn refresh(&mut self) -> LedgerResult<LoadReport> {
        let mut raw = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            match self.storage.read_all(&self.user, collection) {
                Ok(docs) => raw.push(docs),
                Err(err) => {
                    warn!(user = %self.user, collection = %collection, error = %err, "refresh failed; keeping last snapshot");
                    return Err(err.into());
                }
            }
        }

        let mut warnings = Vec::new();
        let mut next = Ledger::new();
        let mut docs = raw.into_iter();
        next.accounts = decode_all(docs.next().unwrap_or_default(), Collection::Accounts, &mut warnings);
        next.categories =
            decode_all(docs.next().unwrap_or_default(), Collection::Categories, &mut warnings);
        next.budgets = decode_all(docs.next().unwrap_or_default(), Collection::Budgets, &mut warnings);
        next.transactions =
            decode_all(docs.next().unwrap_or_default(), Collection::Transactions, &mut warnings);
        next.revision = self.ledger.revision;
        next.touch();

        self.ledger = next;
        for issue in integrity::check(&self.ledger).issues {
            warn!(user = %self.user, "{}", issue);
        }
        let report = LoadReport {
            skipped: warnings.len(),
            warnings,
            revision: self.ledger.revision,
        };
        info!(
            user = %self.user,
            accounts = self.ledger.accounts.len(),
            categories = self.ledger.categories.len(),
            budgets = self.ledger.budgets.len(),
            transactions = self.ledger.transactions.len(),
            skipped = report.skipped,
            revision = report.revision,
            "ledger refreshed"
        );
        Ok(report)
    }

    fn write<T>(&self, collection: Collection, entity: &T, action: ChangeAction) -> LedgerResult<()>
    where
        T: serde::Serialize + Identifiable,
    {
        let document = Document::encode(entity)?;
        let result = match action {
            ChangeAction::Created => self.storage.create(&self.user, collection, document),
            ChangeAction::Updated => self.storage.update(&self.user, collection, document),
            ChangeAction::Deleted => return self.erase(collection, entity.id()),
        };
        result.map_err(|err| {
            warn!(user = %self.user, collection = %collection, id = %entity.id(), error = %err, "storage write failed");
            LedgerError::from(err)
        })
    }

    fn erase(&self, collection: Collection, id: Uuid) -> LedgerResult<()> {
        self.storage
            .delete(&self.user, collection, id)
            .map_err(|err| {
                warn!(user = %self.user, collection = %collection, id = %id, error = %err, "storage delete failed");
                LedgerError::from(err)
            })
    }

    fn record(&mut self, entity: EntityKind, id: Uuid, action: ChangeAction) {
        let change = LedgerChange {
            entity,
            id,
            action,
            revision: self.ledger.revision,
        };
        debug!(user = %self.user, entity = %entity, id = %id, action = %action, revision = change.revision, "ledger change applied");
        for observer in self.observers.iter_mut() {
            observer(&change);
        }
    }
}

fn decode_all<T>(docs: Vec<Document>, collection: Collection, warnings: &mut Vec<String>) -> Vec<T>
where
    T: DeserializeOwned + Identifiable,
{
    let mut decoded = Vec::with_capacity(docs.len());
    for doc in docs {
        match doc.decode::<T>() {
            Ok(entity) if entity.id() == doc.id => decoded.push(entity),
            Ok(entity) => {
                let message = format!(
                    "{} document {} carries mismatched id {}",
                    collection,
                    doc.id,
                    entity.id()
                );
                warn!(collection = %collection, id = %doc.id, "{}", message);
                warnings.push(message);
            }
            Err(err) => {
                let message = format!("{} document {} skipped: {}", collection, doc.id, err);
                warn!(collection = %collection, id = %doc.id, error = %err, "undecodable document skipped");
                warnings.push(message);
            }
        }
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Mutex;

    fn manager() -> (LedgerManager, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let manager = LedgerManager::new(UserId::new("tester"), storage.clone());
        (manager, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn failed_write_leaves_snapshot_untouched() {
        let (mut manager, storage) = manager();
        let account = manager
            .create_account(AccountDraft::new("Cash", crate::domain::AccountKind::Cash, dec!(0)))
            .unwrap();
        let revision = manager.snapshot().revision;

        storage.set_offline(true);
        let err = manager.delete_account(account.id).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(manager.snapshot().accounts.len(), 1);
        assert_eq!(manager.snapshot().revision, revision);
    }

    #[test]
    fn validation_happens_before_any_write() {
        let (mut manager, storage) = manager();
        let err = manager.create_category("  ", EntryKind::Expense).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(
            storage.document_count(manager.user(), Collection::Categories),
            0
        );
    }

    #[test]
    fn refresh_skips_undecodable_documents() {
        let (mut manager, storage) = manager();
        let user = manager.user().clone();
        manager.create_category("Food", EntryKind::Expense).unwrap();
        storage
            .create(
                &user,
                Collection::Categories,
                Document {
                    id: Uuid::new_v4(),
                    body: json!({"name": 42}),
                },
            )
            .unwrap();

        let report = manager.refresh().unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(manager.snapshot().categories.len(), 1);
    }

    #[test]
    fn refresh_failure_keeps_last_snapshot() {
        let (mut manager, storage) = manager();
        manager.create_category("Food", EntryKind::Expense).unwrap();
        storage.set_offline(true);
        assert!(manager.refresh().is_err());
        assert_eq!(manager.snapshot().categories.len(), 1);
    }

    #[test]
    fn subscribers_see_each_applied_change() {
        let (mut manager, _storage) = manager();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        manager.subscribe(move |change| sink.lock().unwrap().push(change.clone()));

        let food = manager.create_category("Food", EntryKind::Expense).unwrap();
        let cash = manager
            .create_account(AccountDraft::new("Cash", crate::domain::AccountKind::Cash, dec!(0)))
            .unwrap();
        let txn = manager
            .create_transaction(TransactionDraft {
                account_id: cash.id,
                category_id: food.id,
                name: "Lunch".into(),
                amount: dec!(9),
                kind: EntryKind::Expense,
                date: date(2024, 7, 1),
                recurrence: None,
            })
            .unwrap();
        manager.delete_transaction(txn.id).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[3].action, ChangeAction::Deleted);
        assert_eq!(seen[3].entity, EntityKind::Transaction);
        assert_eq!(seen[3].revision, manager.snapshot().revision);
    }

    #[test]
    fn seeding_is_a_no_op_once_categories_exist() {
        let (mut manager, _storage) = manager();
        assert_eq!(manager.seed_defaults().unwrap(), 12);
        assert_eq!(manager.seed_defaults().unwrap(), 0);
        assert_eq!(manager.snapshot().categories.len(), 12);
    }

    #[test]
    fn interrupted_seeding_resumes_with_the_missing_defaults() {
        let (mut manager, storage) = manager();
        manager.create_category("Food", EntryKind::Expense).unwrap();
        manager.create_category("Salary", EntryKind::Income).unwrap();

        storage.set_offline(true);
        assert!(manager.seed_defaults().is_err());
        assert_eq!(manager.snapshot().categories.len(), 2);

        storage.set_offline(false);
        assert_eq!(manager.seed_defaults().unwrap(), 10);
        assert_eq!(
            storage.document_count(manager.user(), Collection::Categories),
            12
        );
        assert_eq!(manager.seed_defaults().unwrap(), 0);
    }

    #[test]
    fn seeding_leaves_customised_category_lists_alone() {
        let (mut manager, _storage) = manager();
        manager.create_category("Pets", EntryKind::Expense).unwrap();
        assert_eq!(manager.seed_defaults().unwrap(), 0);
    }
}
