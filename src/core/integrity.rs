//! Consistency checks over a ledger snapshot.
//!
//! Problems are reported, never repaired: deletes do not cascade and stored
//! data may predate a category edit, so the snapshot can legitimately contain
//! dangling references.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::domain::{Category, EntryKind, Ledger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    DanglingAccount {
        transaction_id: Uuid,
        account_id: Uuid,
    },
    DanglingCategory {
        transaction_id: Uuid,
        category_id: Uuid,
    },
    CategoryKindMismatch {
        transaction_id: Uuid,
        category_id: Uuid,
        transaction_kind: EntryKind,
        category_kind: EntryKind,
    },
    BudgetForMissingCategory {
        budget_id: Uuid,
        category_id: Uuid,
    },
    BudgetOnIncomeCategory {
        budget_id: Uuid,
        category_id: Uuid,
    },
    DuplicateBudget {
        budget_id: Uuid,
        category_id: Uuid,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::DanglingAccount {
                transaction_id,
                account_id,
            } => write!(
                f,
                "transaction {} references unknown account {}",
                transaction_id, account_id
            ),
            IntegrityIssue::DanglingCategory {
                transaction_id,
                category_id,
            } => write!(
                f,
                "transaction {} references missing category {}",
                transaction_id, category_id
            ),
            IntegrityIssue::CategoryKindMismatch {
                transaction_id,
                category_id,
                transaction_kind,
                category_kind,
            } => write!(
                f,
                "transaction {} is {} but category {} is {}",
                transaction_id,
                transaction_kind.keyword(),
                category_id,
                category_kind.keyword()
            ),
            IntegrityIssue::BudgetForMissingCategory {
                budget_id,
                category_id,
            } => write!(
                f,
                "budget {} targets missing category {}",
                budget_id, category_id
            ),
            IntegrityIssue::BudgetOnIncomeCategory {
                budget_id,
                category_id,
            } => write!(
                f,
                "budget {} targets income category {}",
                budget_id, category_id
            ),
            IntegrityIssue::DuplicateBudget {
                budget_id,
                category_id,
            } => write!(
                f,
                "budget {} duplicates another budget for category {}",
                budget_id, category_id
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

pub fn check(ledger: &Ledger) -> IntegrityReport {
    let account_ids: std::collections::HashSet<Uuid> =
        ledger.accounts.iter().map(|a| a.id).collect();
    let categories: HashMap<Uuid, &Category> =
        ledger.categories.iter().map(|c| (c.id, c)).collect();
    let mut issues = Vec::new();

    for txn in &ledger.transactions {
        if !account_ids.contains(&txn.account_id) {
            issues.push(IntegrityIssue::DanglingAccount {
                transaction_id: txn.id,
                account_id: txn.account_id,
            });
        }
        match categories.get(&txn.category_id) {
            None => issues.push(IntegrityIssue::DanglingCategory {
                transaction_id: txn.id,
                category_id: txn.category_id,
            }),
            Some(category) if category.kind != txn.kind => {
                issues.push(IntegrityIssue::CategoryKindMismatch {
                    transaction_id: txn.id,
                    category_id: category.id,
                    transaction_kind: txn.kind,
                    category_kind: category.kind,
                })
            }
            Some(_) => {}
        }
    }

    let mut budgeted: HashMap<Uuid, Uuid> = HashMap::new();
    for budget in &ledger.budgets {
        match categories.get(&budget.category_id) {
            None => issues.push(IntegrityIssue::BudgetForMissingCategory {
                budget_id: budget.id,
                category_id: budget.category_id,
            }),
            Some(category) if category.kind == EntryKind::Income => {
                issues.push(IntegrityIssue::BudgetOnIncomeCategory {
                    budget_id: budget.id,
                    category_id: category.id,
                })
            }
            Some(_) => {}
        }
        if budgeted.insert(budget.category_id, budget.id).is_some() {
            issues.push(IntegrityIssue::DuplicateBudget {
                budget_id: budget.id,
                category_id: budget.category_id,
            });
        }
    }

    IntegrityReport { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, AccountKind, Budget, Transaction};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn clean_ledger_has_no_issues() {
        let mut ledger = Ledger::new();
        let account = ledger.add_account(Account::new("Cash", AccountKind::Cash));
        let food = ledger.add_category(Category::new("Food", EntryKind::Expense));
        ledger.add_budget(Budget::new(food, dec!(50)));
        ledger.add_transaction(Transaction::new(
            account,
            food,
            "Lunch",
            dec!(8),
            EntryKind::Expense,
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        ));
        assert!(check(&ledger).is_clean());
    }

    #[test]
    fn reports_dangling_references_and_mismatches() {
        let mut ledger = Ledger::new();
        let salary = ledger.add_category(Category::new("Salary", EntryKind::Income));
        let gone_account = Uuid::new_v4();
        ledger.add_transaction(Transaction::new(
            gone_account,
            salary,
            "Refund",
            dec!(8),
            EntryKind::Expense,
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        ));
        ledger.add_budget(Budget::new(Uuid::new_v4(), dec!(10)));
        ledger.add_budget(Budget::new(salary, dec!(10)));

        let report = check(&ledger);
        assert_eq!(report.issues.len(), 4);
        assert!(matches!(
            report.issues[0],
            IntegrityIssue::DanglingAccount { account_id, .. } if account_id == gone_account
        ));
        assert!(matches!(
            report.issues[1],
            IntegrityIssue::CategoryKindMismatch { .. }
        ));
        assert!(report.warnings()[3].contains("income category"));
    }
}
