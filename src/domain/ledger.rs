use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{account::Account, budget::Budget, category::Category, transaction::Transaction};

/// In-memory snapshot of one user's collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
            categories: Vec::new(),
            budgets: Vec::new(),
            transactions: Vec::new(),
            revision: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn add_account(&mut self, account: Account) -> Uuid {
        let id = account.id;
        self.accounts.push(account);
        self.touch();
        id
    }

    pub fn add_category(&mut self, category: Category) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        self.touch();
        id
    }

    pub fn add_budget(&mut self, budget: Budget) -> Uuid {
        let id = budget.id;
        self.budgets.push(budget);
        self.touch();
        id
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn budget_for_category(&self, category_id: Uuid) -> Option<&Budget> {
        self.budgets
            .iter()
            .find(|budget| budget.category_id == category_id)
    }

    pub fn transactions_for_account(&self, account_id: Uuid) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |txn| txn.account_id == account_id)
    }

    pub fn transactions_for_category(
        &self,
        category_id: Uuid,
    ) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |txn| txn.category_id == category_id)
    }

    pub fn replace_account(&mut self, account: Account) -> bool {
        replace_by_id(&mut self.accounts, account, |a| a.id) && self.touched()
    }

    pub fn replace_category(&mut self, category: Category) -> bool {
        replace_by_id(&mut self.categories, category, |c| c.id) && self.touched()
    }

    pub fn replace_budget(&mut self, budget: Budget) -> bool {
        replace_by_id(&mut self.budgets, budget, |b| b.id) && self.touched()
    }

    pub fn replace_transaction(&mut self, transaction: Transaction) -> bool {
        replace_by_id(&mut self.transactions, transaction, |t| t.id) && self.touched()
    }

    pub fn remove_account(&mut self, id: Uuid) -> Option<Account> {
        let removed = remove_by_id(&mut self.accounts, id, |a| a.id);
        self.touch_if(removed.is_some());
        removed
    }

    pub fn remove_category(&mut self, id: Uuid) -> Option<Category> {
        let removed = remove_by_id(&mut self.categories, id, |c| c.id);
        self.touch_if(removed.is_some());
        removed
    }

    pub fn remove_budget(&mut self, id: Uuid) -> Option<Budget> {
        let removed = remove_by_id(&mut self.budgets, id, |b| b.id);
        self.touch_if(removed.is_some());
        removed
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let removed = remove_by_id(&mut self.transactions, id, |t| t.id);
        self.touch_if(removed.is_some());
        removed
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
            && self.categories.is_empty()
            && self.budgets.is_empty()
            && self.transactions.is_empty()
    }

    /// Bumps the revision and timestamp after any applied change.
    pub fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = Utc::now();
    }

    fn touched(&mut self) -> bool {
        self.touch();
        true
    }

    fn touch_if(&mut self, changed: bool) {
        if changed {
            self.touch();
        }
    }
}

fn replace_by_id<T>(items: &mut [T], item: T, id_of: impl Fn(&T) -> Uuid) -> bool {
    let id = id_of(&item);
    match items.iter_mut().find(|existing| id_of(existing) == id) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, id: Uuid, id_of: impl Fn(&T) -> Uuid) -> Option<T> {
    let index = items.iter().position(|item| id_of(item) == id)?;
    Some(items.remove(index))
}
