use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Identifiable;

/// Spending cap for a single expense category. `spent` is never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub limit: Decimal,
}

impl Budget {
    pub fn new(category_id: Uuid, limit: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            limit,
        }
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Where derived spending sits relative to a budget limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetStatus {
    UnderBudget,
    AtLimit,
    OverBudget,
}

impl BudgetStatus {
    pub fn from_amounts(spent: Decimal, limit: Decimal) -> Self {
        match spent.cmp(&limit) {
            std::cmp::Ordering::Less => BudgetStatus::UnderBudget,
            std::cmp::Ordering::Equal => BudgetStatus::AtLimit,
            std::cmp::Ordering::Greater => BudgetStatus::OverBudget,
        }
    }
}
