mod verdict_storage;

use crate::models::Verdict;
use crate::types::RowIndex;

pub use verdict_storage::VerdictStorage;

/// The verdict reached for one input row.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RowOutcome {
    pub transaction_id: String,
    pub verdict: Verdict
}

pub trait Storage: Send + Sync + 'static {
    fn load(&self, index: RowIndex) -> Option<RowOutcome>;
    fn save(&self, index: RowIndex, outcome: RowOutcome);
}
