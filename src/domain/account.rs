use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Represents a financial account tracked within the ledger.
///
/// Accounts carry no `balance` field; balances are derived from
/// the transaction log by the summary service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    #[serde(default)]
    pub initial_balance: Decimal,
}

impl Account {
    /// Creates a new account with the provided kind and a zero opening balance.
    pub fn new(name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            initial_balance: Decimal::ZERO,
        }
    }

    pub fn with_initial_balance(mut self, initial_balance: Decimal) -> Self {
        self.initial_balance = initial_balance;
        self
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Enumerates the supported account classifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AccountKind {
    Bank,
    Cash,
    CreditCard,
    DebitCard,
    #[serde(rename = "paypal")]
    PayPal,
    Zelle,
    CashApp,
    Custom,
}

impl AccountKind {
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Bank => "Bank Account",
            AccountKind::Cash => "Cash",
            AccountKind::CreditCard => "Credit Card",
            AccountKind::DebitCard => "Debit Card",
            AccountKind::PayPal => "PayPal",
            AccountKind::Zelle => "Zelle",
            AccountKind::CashApp => "Cash App",
            AccountKind::Custom => "Custom",
        }
    }
}

/// Fields accepted when creating an account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDraft {
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: Decimal,
}

impl AccountDraft {
    pub fn new(name: impl Into<String>, kind: AccountKind, initial_balance: Decimal) -> Self {
        Self {
            name: name.into(),
            kind,
            initial_balance,
        }
    }

    pub fn into_account(self) -> Account {
        Account::new(self.name.trim(), self.kind).with_initial_balance(self.initial_balance)
    }
}

/// Partial update for an account; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub initial_balance: Option<Decimal>,
}

impl AccountPatch {
    pub fn apply_to(&self, account: &Account) -> Account {
        let mut merged = account.clone();
        if let Some(name) = &self.name {
            merged.name = name.trim().to_string();
        }
        if let Some(kind) = self.kind {
            merged.kind = kind;
        }
        if let Some(initial_balance) = self.initial_balance {
            merged.initial_balance = initial_balance;
        }
        merged
    }
}
