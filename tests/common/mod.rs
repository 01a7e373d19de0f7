#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use moneydesk_core::{
    config::ConfigManager,
    core::ledger_manager::LedgerManager,
    domain::{AccountDraft, AccountKind, EntryKind, TransactionDraft},
    storage::{JsonStorage, MemoryStorage, UserId},
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env(user: &str) -> (LedgerManager, ConfigManager, Arc<JsonStorage>) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage =
        Arc::new(JsonStorage::new(Some(base.join("data"))).expect("create json storage backend"));
    let ledger_manager = LedgerManager::new(UserId::new(user), storage.clone());
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");

    (ledger_manager, config_manager, storage)
}

pub fn memory_manager(user: &str) -> (LedgerManager, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (LedgerManager::new(UserId::new(user), storage.clone()), storage)
}

/// Ids of the entities created by [`seed_household`].
pub struct Household {
    pub checking: Uuid,
    pub wallet: Uuid,
    pub food: Uuid,
    pub rent: Uuid,
    pub salary: Uuid,
}

pub fn seed_household(manager: &mut LedgerManager) -> Household {
    let checking = manager
        .create_account(AccountDraft::new("Checking", AccountKind::Bank, Decimal::new(50000, 2)))
        .expect("checking");
    let wallet = manager
        .create_account(AccountDraft::new("Wallet", AccountKind::Cash, Decimal::ZERO))
        .expect("wallet");
    let food = manager
        .create_category("Food", EntryKind::Expense)
        .expect("food");
    let rent = manager
        .create_category("Rent", EntryKind::Expense)
        .expect("rent");
    let salary = manager
        .create_category("Salary", EntryKind::Income)
        .expect("salary");
    Household {
        checking: checking.id,
        wallet: wallet.id,
        food: food.id,
        rent: rent.id,
        salary: salary.id,
    }
}

pub fn draft(
    account_id: Uuid,
    category_id: Uuid,
    name: &str,
    amount: Decimal,
    kind: EntryKind,
    on: NaiveDate,
) -> TransactionDraft {
    TransactionDraft {
        account_id,
        category_id,
        name: name.to_string(),
        amount,
        kind,
        date: on,
        recurrence: None,
    }
}
