use uuid::Uuid;

use crate::domain::category::{Category, CategoryPatch};
use crate::domain::common::{normalized_name, EntryKind};
use crate::domain::defaults::{default_categories, DEFAULT_CATEGORIES};
use crate::domain::Ledger;
use crate::errors::{EntityKind, LedgerError};

use super::{require_name, ServiceResult};

pub struct CategoryService;

impl CategoryService {
    pub fn prepare_create(ledger: &Ledger, name: &str, kind: EntryKind) -> ServiceResult<Category> {
        require_name("Category", name, 1)?;
        Self::validate_name(ledger, None, name)?;
        Ok(Category::new(name.trim(), kind))
    }

    /// Rejects kind changes that would contradict transactions already filed under the category.
    pub fn prepare_update(
        ledger: &Ledger,
        id: Uuid,
        patch: &CategoryPatch,
    ) -> ServiceResult<Category> {
        let existing = ledger
            .category(id)
            .ok_or_else(|| LedgerError::not_found(EntityKind::Category, id))?;
        let merged = patch.apply_to(existing);
        require_name("Category", &merged.name, 1)?;
        Self::validate_name(ledger, Some(id), &merged.name)?;
        if merged.kind != existing.kind {
            let conflicting = ledger
                .transactions_for_category(id)
                .filter(|txn| txn.kind != merged.kind)
                .count();
            if conflicting > 0 {
                return Err(LedgerError::validation(format!(
                    "Category `{}` cannot become {}: {} transaction(s) would mismatch",
                    merged.name,
                    merged.kind.keyword(),
                    conflicting
                )));
            }
        }
        Ok(merged)
    }

    /// Deleting never cascades to transactions or budgets.
    pub fn ensure_exists(ledger: &Ledger, id: Uuid) -> ServiceResult<()> {
        ledger
            .category(id)
            .map(|_| ())
            .ok_or_else(|| LedgerError::not_found(EntityKind::Category, id))
    }

    /// Default categories to insert, or an empty list when the user already has categories.
    /// Defaults still missing from a ledger that holds nothing but defaults.
    ///
    /// An empty ledger gets all of them and a partly seeded one gets the rest. Once any
    /// category outside the default set exists, nothing is offered.
    pub fn seed_candidates(ledger: &Ledger) -> Vec<Category> {
        let only_defaults = ledger.categories.iter().all(|category| {
            DEFAULT_CATEGORIES.iter().any(|(name, kind)| {
                *kind == category.kind && normalized_name(name) == normalized_name(&category.name)
            })
        });
        if !only_defaults {
            return Vec::new();
        }
        default_categories()
            .into_iter()
            .filter(|candidate| {
                let wanted = normalized_name(&candidate.name);
                !ledger
                    .categories
                    .iter()
                    .any(|existing| normalized_name(&existing.name) == wanted)
            })
            .collect()
    }

    fn validate_name(ledger: &Ledger, exclude: Option<Uuid>, candidate: &str) -> ServiceResult<()> {
        let normalized = normalized_name(candidate);
        let duplicate = ledger.categories.iter().any(|category| {
            normalized_name(&category.name) == normalized
                && exclude.map_or(true, |id| category.id != id)
        });
        if duplicate {
            Err(LedgerError::validation(format!(
                "Category `{}` already exists",
                candidate.trim()
            )))
        } else {
            Ok(())
        }
    }
}
