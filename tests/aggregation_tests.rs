mod common;

use common::{date, draft, memory_manager, seed_household};
use moneydesk_core::{
    core::services::{DashboardOptions, SummaryService},
    domain::{BudgetStatus, EntryKind, ReportingPeriod},
    query::{filter_by_period, TransactionFilter},
};
use rust_decimal_macros::dec;

#[test]
fn month_of_activity_rolls_up_consistently() {
    let (mut manager, _storage) = memory_manager("dana");
    let household = seed_household(&mut manager);
    let entries = [
        (household.checking, household.salary, "Paycheck", dec!(1000), EntryKind::Income, date(2024, 7, 1)),
        (household.checking, household.rent, "Rent", dec!(250), EntryKind::Expense, date(2024, 7, 2)),
        (household.wallet, household.food, "Tacos", dec!(30), EntryKind::Expense, date(2024, 7, 15)),
        (household.checking, household.food, "Groceries", dec!(20), EntryKind::Expense, date(2024, 7, 31)),
        (household.checking, household.food, "Brunch", dec!(45), EntryKind::Expense, date(2024, 8, 1)),
    ];
    for (account, category, name, amount, kind, on) in entries {
        manager
            .create_transaction(draft(account, category, name, amount, kind, on))
            .unwrap();
    }
    manager.create_budget(household.food, dec!(50)).unwrap();

    let ledger = manager.snapshot();
    let july = ReportingPeriod::new(date(2024, 7, 1), date(2024, 7, 31)).unwrap();

    let totals = SummaryService::period_totals(&ledger.transactions, Some(&july));
    assert_eq!(totals.income, dec!(1000));
    assert_eq!(totals.expense, dec!(300));
    assert_eq!(totals.net, dec!(700));

    let series = SummaryService::monthly_series(&ledger.transactions, Some(&july));
    assert_eq!(series.len(), 1);
    assert_eq!((series[0].income, series[0].expense), (dec!(1000), dec!(300)));

    let overview = SummaryService::budget_overview(ledger, Some(&july), 4);
    assert_eq!(overview[0].spent, dec!(50));
    assert_eq!(overview[0].status, BudgetStatus::AtLimit);
    assert_eq!(overview[0].percentage, dec!(100));

    let balances = SummaryService::account_balances(ledger);
    let checking = balances
        .iter()
        .find(|row| row.account_id == household.checking)
        .unwrap();
    assert_eq!(checking.balance, dec!(500) + dec!(1000) - dec!(250) - dec!(20) - dec!(45));
    assert_eq!(checking.kind_label, "Bank Account");

    let sum_of_balances: rust_decimal::Decimal = balances.iter().map(|row| row.balance).sum();
    assert_eq!(SummaryService::total_balance(ledger), sum_of_balances);

    let in_july = filter_by_period(&ledger.transactions, Some(&july));
    assert_eq!(in_july.len(), 4);
    let wallet_food = TransactionFilter::new()
        .account(household.wallet)
        .category(household.food)
        .apply(&ledger.transactions);
    assert_eq!(wallet_food.len(), 1);
}

#[test]
fn dashboard_survives_dangling_references() {
    let (mut manager, _storage) = memory_manager("erin");
    let household = seed_household(&mut manager);
    manager.create_budget(household.rent, dec!(900)).unwrap();
    manager
        .create_transaction(draft(
            household.wallet,
            household.rent,
            "Rent share",
            dec!(400),
            EntryKind::Expense,
            date(2024, 6, 28),
        ))
        .unwrap();
    manager.delete_category(household.rent).unwrap();
    manager.delete_account(household.wallet).unwrap();

    let summary = SummaryService::dashboard(
        manager.snapshot(),
        None,
        date(2024, 7, 10),
        DashboardOptions::default(),
    );
    assert_eq!(summary.budgets.len(), 1);
    assert_eq!(summary.budgets[0].category_name, "Unknown");
    assert_eq!(summary.budgets[0].spent, dec!(400));
    assert_eq!(summary.total_balance, dec!(500) - dec!(400));
    assert_eq!(summary.last_month.expense, dec!(400));
    assert_eq!(summary.expense_change.to_string(), "0.0%");
    assert_eq!(summary.income_change.to_string(), "0%");
    assert_eq!(summary.recent_transactions.len(), 1);

    let issues = manager.integrity_report().warnings();
    assert_eq!(issues.len(), 3);
}
