//! Per-store cost category settings.
//!
//! Each expense category carries one flag: whether it counts as cost of
//! goods sold. The set is seeded on first read and merged against the
//! defaults on every load, so a category added in a newer release shows up
//! with its default flag even under state persisted by an older one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::expense::ExpenseCategory;

/// One category's COGS flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCategorySetting {
    pub expense_category: ExpenseCategory,
    pub is_cogs: bool,
}

impl CostCategorySetting {
    /// The seeded default: food and drink are COGS, nothing else is.
    pub fn default_for(category: ExpenseCategory) -> Self {
        Self {
            expense_category: category,
            is_cogs: matches!(category, ExpenseCategory::Food | ExpenseCategory::Drink),
        }
    }
}

/// The full default set, one entry per category in declaration order.
pub fn default_settings() -> Vec<CostCategorySetting> {
    ExpenseCategory::ALL
        .iter()
        .map(|category| CostCategorySetting::default_for(*category))
        .collect()
}

/// Merge a persisted set against the defaults.
///
/// Categories present in `current` keep their persisted flag; categories
/// missing from it are re-seeded with their default. The result always
/// covers every category, in declaration order.
pub fn merge_with_defaults(current: Vec<CostCategorySetting>) -> Vec<CostCategorySetting> {
    let by_category: HashMap<ExpenseCategory, CostCategorySetting> = current
        .into_iter()
        .map(|setting| (setting.expense_category, setting))
        .collect();

    ExpenseCategory::ALL
        .iter()
        .map(|category| {
            by_category
                .get(category)
                .copied()
                .unwrap_or_else(|| CostCategorySetting::default_for(*category))
        })
        .collect()
}

/// Read/write access to a store's cost category settings.
///
/// `load_settings` implements the seed-and-merge lifecycle above; callers
/// always receive a complete set.
pub trait CostCategorySettingsStore: Send + Sync {
    fn load_settings(&self, store_id: &str) -> Vec<CostCategorySetting>;
    fn save_settings(&self, store_id: &str, settings: &[CostCategorySetting]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mark_food_and_drink_as_cogs() {
        let defaults = default_settings();
        assert_eq!(defaults.len(), ExpenseCategory::ALL.len());
        for setting in defaults {
            let expected = matches!(
                setting.expense_category,
                ExpenseCategory::Food | ExpenseCategory::Drink
            );
            assert_eq!(setting.is_cogs, expected);
        }
    }

    #[test]
    fn merge_keeps_persisted_flags() {
        let persisted = vec![CostCategorySetting {
            expense_category: ExpenseCategory::Food,
            is_cogs: false,
        }];
        let merged = merge_with_defaults(persisted);
        let food = merged
            .iter()
            .find(|s| s.expense_category == ExpenseCategory::Food)
            .unwrap();
        assert!(!food.is_cogs);
    }

    #[test]
    fn merge_reseeds_missing_categories() {
        let merged = merge_with_defaults(vec![]);
        assert_eq!(merged, default_settings());

        // A partial set gets the missing categories back, in order.
        let partial = vec![CostCategorySetting {
            expense_category: ExpenseCategory::Utility,
            is_cogs: true,
        }];
        let merged = merge_with_defaults(partial);
        assert_eq!(merged.len(), ExpenseCategory::ALL.len());
        assert!(
            merged
                .iter()
                .find(|s| s.expense_category == ExpenseCategory::Utility)
                .unwrap()
                .is_cogs
        );
        assert!(
            merged
                .iter()
                .find(|s| s.expense_category == ExpenseCategory::Drink)
                .unwrap()
                .is_cogs
        );
    }
}
