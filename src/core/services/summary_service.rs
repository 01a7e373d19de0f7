//! Aggregation helpers for balances, budget progress and reporting projections.
//!
//! Every function here is a pure fold over borrowed ledger data. Nothing is
//! cached and nothing is mutated; callers recompute whenever the snapshot or
//! the selected period changes.

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::services::TransactionService;
use crate::domain::budget::{Budget, BudgetStatus};
use crate::domain::common::{EntryKind, UNKNOWN_LABEL};
use crate::domain::period::{in_period, ReportingPeriod};
use crate::domain::{Account, Category, Ledger, Transaction};
use crate::utils::dates::{month_label, months_between};
use crate::utils::money::{percent_of, round_display, sum};

/// Derived balance row for the accounts listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountBalance {
    pub account_id: Uuid,
    pub name: String,
    pub kind_label: String,
    pub balance: Decimal,
}

/// Spending against a single budget within a period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetProgress {
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Relative change between two period totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentChange {
    /// The previous value was zero, so no ratio exists.
    NoBaseline { grew: bool },
    /// Percentage rounded to one decimal place.
    Relative(Decimal),
}

impl PercentChange {
    pub fn value(&self) -> Decimal {
        match self {
            PercentChange::NoBaseline { grew: true } => Decimal::ONE_HUNDRED,
            PercentChange::NoBaseline { grew: false } => Decimal::ZERO,
            PercentChange::Relative(value) => *value,
        }
    }

    pub fn is_increase(&self) -> bool {
        self.value() > Decimal::ZERO
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentChange::NoBaseline { grew: true } => f.write_str("+100%"),
            PercentChange::NoBaseline { grew: false } => f.write_str("0%"),
            PercentChange::Relative(value) => {
                let sign = if *value > Decimal::ZERO { "+" } else { "" };
                write!(f, "{}{:.1}%", sign, value)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyPoint {
    pub month_start: NaiveDate,
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub name: String,
    pub total: Decimal,
    pub share: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub budget_limit: usize,
    pub recent_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            budget_limit: 4,
            recent_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub total_balance: Decimal,
    pub period: PeriodTotals,
    pub last_month: PeriodTotals,
    #[serde(serialize_with = "serialize_change")]
    pub income_change: PercentChange,
    #[serde(serialize_with = "serialize_change")]
    pub expense_change: PercentChange,
    pub budgets: Vec<BudgetProgress>,
    pub recent_transactions: Vec<Transaction>,
}

fn serialize_change<S>(change: &PercentChange, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(change)
}

/// Aggregates ledger data for the dashboard, budgets, accounts and report views.
pub struct SummaryService;

impl SummaryService {
    /// `initial_balance` plus every signed amount booked against the account, over all history.
    pub fn account_balance(account: &Account, transactions: &[Transaction]) -> Decimal {
        let booked = sum(transactions
            .iter()
            .filter(|txn| txn.account_id == account.id)
            .map(Transaction::signed_amount));
        account.initial_balance.saturating_add(booked)
    }

    pub fn account_balances(ledger: &Ledger) -> Vec<AccountBalance> {
        ledger
            .accounts
            .iter()
            .map(|account| AccountBalance {
                account_id: account.id,
                name: account.name.clone(),
                kind_label: account.kind.label().to_string(),
                balance: Self::account_balance(account, &ledger.transactions),
            })
            .collect()
    }

    /// `None` when the id no longer resolves to an account.
    pub fn balance_for_account_id(ledger: &Ledger, account_id: Uuid) -> Option<Decimal> {
        ledger
            .account(account_id)
            .map(|account| Self::account_balance(account, &ledger.transactions))
    }

    pub fn budget_progress(
        budget: &Budget,
        category: Option<&Category>,
        transactions: &[Transaction],
        period: Option<&ReportingPeriod>,
    ) -> BudgetProgress {
        let spent = sum(transactions
            .iter()
            .filter(|txn| {
                txn.kind == EntryKind::Expense
                    && txn.category_id == budget.category_id
                    && in_period(period, txn.date)
            })
            .map(|txn| txn.amount));
        BudgetProgress {
            budget_id: budget.id,
            category_id: budget.category_id,
            category_name: category
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            limit: budget.limit,
            spent,
            remaining: budget.limit.saturating_sub(spent),
            percentage: percent_of(spent, budget.limit),
            status: BudgetStatus::from_amounts(spent, budget.limit),
        }
    }

    /// Progress for the first `limit` budgets in ledger order.
    pub fn budget_overview(
        ledger: &Ledger,
        period: Option<&ReportingPeriod>,
        limit: usize,
    ) -> Vec<BudgetProgress> {
        ledger
            .budgets
            .iter()
            .take(limit)
            .map(|budget| {
                Self::budget_progress(
                    budget,
                    ledger.category(budget.category_id),
                    &ledger.transactions,
                    period,
                )
            })
            .collect()
    }

    pub fn period_totals(
        transactions: &[Transaction],
        period: Option<&ReportingPeriod>,
    ) -> PeriodTotals {
        let mut totals = PeriodTotals::default();
        for txn in transactions.iter().filter(|txn| in_period(period, txn.date)) {
            match txn.kind {
                EntryKind::Income => totals.income = totals.income.saturating_add(txn.amount),
                EntryKind::Expense => totals.expense = totals.expense.saturating_add(txn.amount),
            }
        }
        totals.net = totals.income.saturating_sub(totals.expense);
        totals
    }

    /// Relative change from `previous` to `current`; changes too large to represent
    /// saturate to `Decimal::MAX`/`Decimal::MIN`.
    pub fn percentage_change(current: Decimal, previous: Decimal) -> PercentChange {
        if previous.is_zero() {
            return PercentChange::NoBaseline {
                grew: current > Decimal::ZERO,
            };
        }
        let ratio = percent_of(current.saturating_sub(previous), previous);
        let rounded = round_display(ratio, 1);
        // Tiny negative ratios round to a signed zero; report it unsigned.
        if rounded.is_zero() {
            return PercentChange::Relative(Decimal::ZERO.round_dp(1));
        }
        PercentChange::Relative(rounded)
    }

    /// One point per calendar month overlapping the period, oldest first.
    ///
    /// Without a period the span runs from the earliest to the latest transaction date.
    pub fn monthly_series(
        transactions: &[Transaction],
        period: Option<&ReportingPeriod>,
    ) -> Vec<MonthlyPoint> {
        let span = match period {
            Some(period) => Some((period.from(), period.to())),
            None => {
                let earliest = transactions.iter().map(|txn| txn.date).min();
                let latest = transactions.iter().map(|txn| txn.date).max();
                earliest.zip(latest)
            }
        };
        let Some((from, to)) = span else {
            return Vec::new();
        };

        let mut points: Vec<MonthlyPoint> = months_between(from, to)
            .into_iter()
            .map(|month_start| MonthlyPoint {
                month_start,
                label: month_label(month_start.month()).to_string(),
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
            })
            .collect();
        let index: HashMap<(i32, u32), usize> = points
            .iter()
            .enumerate()
            .map(|(i, point)| ((point.month_start.year(), point.month_start.month()), i))
            .collect();

        for txn in transactions {
            if txn.date < from || txn.date > to {
                continue;
            }
            if let Some(&slot) = index.get(&(txn.date.year(), txn.date.month())) {
                let point = &mut points[slot];
                match txn.kind {
                    EntryKind::Income => point.income = point.income.saturating_add(txn.amount),
                    EntryKind::Expense => point.expense = point.expense.saturating_add(txn.amount),
                }
            }
        }
        points
    }

    /// Totals per category for `kind`, largest first, with each row's share of the grand total.
    pub fn category_breakdown(
        transactions: &[Transaction],
        categories: &[Category],
        period: Option<&ReportingPeriod>,
        kind: EntryKind,
    ) -> Vec<CategoryTotal> {
        let mut totals: HashMap<Uuid, Decimal> = HashMap::new();
        for txn in transactions
            .iter()
            .filter(|txn| txn.kind == kind && in_period(period, txn.date))
        {
            let total = totals.entry(txn.category_id).or_insert(Decimal::ZERO);
            *total = total.saturating_add(txn.amount);
        }
        let grand_total = sum(totals.values().copied());

        let mut rows: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category_id, total)| CategoryTotal {
                category_id,
                name: categories
                    .iter()
                    .find(|category| category.id == category_id)
                    .map(|category| category.name.clone())
                    .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                total,
                share: round_display(percent_of(total, grand_total), 1),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.category_id.cmp(&b.category_id))
        });
        rows
    }

    /// Net worth across existing accounts: opening balances plus every signed amount on record.
    pub fn total_balance(ledger: &Ledger) -> Decimal {
        sum(ledger.accounts.iter().map(|account| account.initial_balance))
            .saturating_add(sum(ledger.transactions.iter().map(Transaction::signed_amount)))
    }

    /// Dashboard projection. The income/expense changes compare the selected period's
    /// totals with the calendar month before the one containing `today`.
    pub fn dashboard(
        ledger: &Ledger,
        period: Option<&ReportingPeriod>,
        today: NaiveDate,
        options: DashboardOptions,
    ) -> DashboardSummary {
        let last_month = ReportingPeriod::previous_month(today);
        let period_totals = Self::period_totals(&ledger.transactions, period);
        let last_totals = Self::period_totals(&ledger.transactions, Some(&last_month));

        DashboardSummary {
            total_balance: Self::total_balance(ledger),
            period: period_totals,
            last_month: last_totals,
            income_change: Self::percentage_change(period_totals.income, last_totals.income),
            expense_change: Self::percentage_change(period_totals.expense, last_totals.expense),
            budgets: Self::budget_overview(ledger, period, options.budget_limit),
            recent_transactions: TransactionService::recent(ledger, options.recent_limit)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}
