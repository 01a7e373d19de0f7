
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    Account, AccountKind, Category, EntryKind, Ledger, Transaction, TransactionDraft,
};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A ledger with one account, one expense and one income category.
pub(super) struct Fixture {
    pub ledger: Ledger,
    pub checking: Uuid,
    pub food: Uuid,
    pub salary: Uuid,
}

pub(super) fn fixture() -> Fixture {
    let mut ledger = Ledger::new();
    let checking = ledger.add_account(Account::new("Checking", AccountKind::Bank));
    let food = ledger.add_category(Category::new("Food", EntryKind::Expense));
    let salary = ledger.add_category(Category::new("Salary", EntryKind::Income));
    Fixture {
        ledger,
        checking,
        food,
        salary,
    }
}

pub(super) fn draft(
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

pub(super) fn txn(
    account_id: Uuid,
    category_id: Uuid,
    amount: Decimal,
    kind: EntryKind,
    on: NaiveDate,
) -> Transaction {
    Transaction::new(account_id, category_id, "Entry", amount, kind, on)
}
