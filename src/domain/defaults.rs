use crate::domain::{category::Category, common::EntryKind};

/// Categories offered to a user whose category list is still empty.
pub const DEFAULT_CATEGORIES: [(&str, EntryKind); 12] = [
    ("Food", EntryKind::Expense),
    ("Shopping", EntryKind::Expense),
    ("Transport", EntryKind::Expense),
    ("Entertainment", EntryKind::Expense),
    ("Salary", EntryKind::Income),
    ("Freelance", EntryKind::Income),
    ("Groceries", EntryKind::Expense),
    ("Utilities", EntryKind::Expense),
    ("Housing", EntryKind::Expense),
    ("Health", EntryKind::Expense),
    ("Investment", EntryKind::Income),
    ("Gifts", EntryKind::Expense),
];

pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, kind)| Category::new(*name, *kind))
        .collect()
}
