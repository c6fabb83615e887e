use crate::storage::{RowOutcome, Storage};
use crate::types::RowIndex;
use dashmap::DashMap;
use std::sync::Arc;

pub struct VerdictStorage {
    results: Arc<DashMap<RowIndex, RowOutcome>>
}

impl VerdictStorage {
    pub fn new() -> Self {
        Self {
            results: Arc::new(DashMap::new())
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// All stored outcomes ordered by their input row.
    pub fn sorted(&self) -> Vec<(RowIndex, RowOutcome)> {
        let mut outcomes: Vec<_> = self.results.iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        outcomes.sort_by_key(|(index, _)| *index);
        outcomes
    }
}

impl Storage for VerdictStorage {
    fn load(&self, index: RowIndex) -> Option<RowOutcome> {
        self.results.get(&index).map(|entry| entry.value().clone())
    }

    fn save(&self, index: RowIndex, outcome: RowOutcome) {
        self.results.insert(index, outcome);
    }
}
