use std::collections::HashMap;
use thiserror::Error;

use crate::model::{Category, CategoryId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("duplicate category id: {0}")]
    DuplicateCategory(CategoryId),
}

/// Read-only catalog of categories, keyed by category id.
///
/// Categories keep the order they were registered in so listings are stable.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    categories: Vec<Category>,
    index: HashMap<CategoryId, usize>,
}

impl QuestionBank {
    /// Build a bank from a list of categories.
    ///
    /// # Errors
    ///
    /// Returns `BankError::DuplicateCategory` if two categories share an id.
    pub fn new(categories: Vec<Category>) -> Result<Self, BankError> {
        let mut index = HashMap::with_capacity(categories.len());
        for (pos, category) in categories.iter().enumerate() {
            if index.insert(category.id().clone(), pos).is_some() {
                return Err(BankError::DuplicateCategory(category.id().clone()));
            }
        }
        Ok(Self { categories, index })
    }

    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.index.get(id).and_then(|pos| self.categories.get(*pos))
    }

    #[must_use]
    pub fn contains(&self, id: &CategoryId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of questions across all categories.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.categories.iter().map(Category::question_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    fn category(id: &str) -> Category {
        Category::new(
            CategoryId::new(id),
            id,
            "",
            Difficulty::Beginner,
            5,
            Vec::new(),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn bank_looks_up_categories_by_id() {
        let bank = QuestionBank::new(vec![category("stats"), category("python")]).unwrap();
        assert_eq!(bank.len(), 2);
        assert!(bank.contains(&CategoryId::new("python")));
        assert_eq!(
            bank.category(&CategoryId::new("stats")).map(Category::title),
            Some("stats")
        );
        assert!(bank.category(&CategoryId::new("missing")).is_none());
    }

    #[test]
    fn bank_rejects_duplicate_categories() {
        let err = QuestionBank::new(vec![category("stats"), category("stats")]).unwrap_err();
        assert_eq!(err, BankError::DuplicateCategory(CategoryId::new("stats")));
    }
}
