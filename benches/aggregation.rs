use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use moneydesk_core::{
    core::services::{DashboardOptions, SummaryService},
    domain::{
        Account, AccountDraft, AccountKind, Budget, Category, EntryKind, Ledger, ReportingPeriod,
        Transaction, TransactionDraft,
    },
    query::{search_transactions, FuzzySearch},
    storage::{JsonStorage, UserId},
    LedgerManager,
};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn build_sample_ledger(txn_count: usize) -> Ledger {
    let mut ledger = Ledger::new();

    let checking = ledger.add_account(Account::new("Checking", AccountKind::Bank));
    let card = ledger.add_account(Account::new("Card", AccountKind::CreditCard));
    let groceries = ledger.add_category(Category::new("Groceries", EntryKind::Expense));
    let salary = ledger.add_category(Category::new("Salary", EntryKind::Income));
    ledger.add_budget(Budget::new(groceries, Decimal::new(40_000, 2)));

    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    for idx in 0..txn_count {
        let on = start_date + Duration::days((idx % 365) as i64);
        let txn = if idx % 10 == 0 {
            Transaction::new(
                checking,
                salary,
                format!("Paycheck {idx}"),
                Decimal::new(250_000, 2),
                EntryKind::Income,
                on,
            )
        } else {
            Transaction::new(
                if idx % 2 == 0 { checking } else { card },
                groceries,
                format!("Market run {idx}"),
                Decimal::new(5_000 + (idx % 100) as i64 * 25, 2),
                EntryKind::Expense,
                on,
            )
        };
        ledger.add_transaction(txn);
    }
    ledger
}

fn bench_aggregations(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let year = ReportingPeriod::year_of(today);

    c.bench_function("dashboard_10k", |b| {
        b.iter(|| {
            let summary =
                SummaryService::dashboard(&ledger, Some(&year), today, DashboardOptions::default());
            black_box(summary);
        })
    });

    c.bench_function("monthly_series_all_history_10k", |b| {
        b.iter(|| black_box(SummaryService::monthly_series(&ledger.transactions, None)))
    });

    c.bench_function("account_balances_10k", |b| {
        b.iter(|| black_box(SummaryService::account_balances(&ledger)))
    });

    let provider = FuzzySearch::default();
    c.bench_function("fuzzy_search_10k", |b| {
        b.iter(|| {
            let hits = search_transactions(
                "market",
                &ledger.transactions,
                &provider,
                std::time::Duration::from_secs(3),
            );
            black_box(hits.len());
        })
    });
}

fn bench_store_refresh(c: &mut Criterion) {
    let dir = tempdir().expect("tempdir");
    let storage = Arc::new(JsonStorage::new(Some(dir.path().to_path_buf())).expect("storage"));
    let mut manager = LedgerManager::new(UserId::new("bench"), storage);
    let sample = build_sample_ledger(2_000);
    let account = manager
        .create_account(AccountDraft::new(
            "Checking",
            AccountKind::Bank,
            Decimal::ZERO,
        ))
        .expect("account");
    let category = manager
        .create_category("Groceries", EntryKind::Expense)
        .expect("category");
    for txn in sample.transactions.iter().filter(|txn| txn.is_expense()) {
        manager
            .create_transaction(TransactionDraft {
                account_id: account.id,
                category_id: category.id,
                name: txn.name.clone(),
                amount: txn.amount,
                kind: EntryKind::Expense,
                date: txn.date,
                recurrence: None,
            })
            .expect("seed transaction");
    }

    c.bench_function("refresh_from_json_store", |b| {
        b.iter(|| {
            manager.refresh().expect("refresh");
            black_box(manager.snapshot().transaction_count());
        })
    });
}

criterion_group!(benches, bench_aggregations, bench_store_refresh);
criterion_main!(benches);
