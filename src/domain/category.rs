//! Domain types representing budget categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Categorises ledger activity for budgeting and reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: EntryKind,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
        }
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Partial update for a category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub kind: Option<EntryKind>,
}

impl CategoryPatch {
    pub fn apply_to(&self, category: &Category) -> Category {
        let mut merged = category.clone();
        if let Some(name) = &self.name {
            merged.name = name.trim().to_string();
        }
        if let Some(kind) = self.kind {
            merged.kind = kind;
        }
        merged
    }
}
