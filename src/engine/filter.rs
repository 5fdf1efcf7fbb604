use std::collections::BTreeSet;

use crate::bank::question::Question;

pub struct CategoryFilter<'a> {
    pub allowed: &'a BTreeSet<String>,
}

impl<'a> CategoryFilter<'a> {
    pub fn new(allowed: &'a BTreeSet<String>) -> Self {
        Self { allowed }
    }

    /// An empty filter admits every category.
    pub fn is_allowed(&self, category: &str) -> bool {
        self.allowed.is_empty() || self.allowed.contains(category)
    }

    pub fn apply<'q>(&self, pool: &'q [Question]) -> Vec<&'q Question> {
        pool.iter().filter(|q| self.is_allowed(&q.category)).collect()
    }

    pub fn count(&self, pool: &[Question]) -> usize {
        pool.iter().filter(|q| self.is_allowed(&q.category)).count()
    }
}
