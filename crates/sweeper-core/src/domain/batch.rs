use serde::Serialize;

use super::verdict::ClassificationResult;

/// A non-empty group of qualifying entries handed to the sink together.
///
/// Only the batcher builds batches, so an empty `Batch` cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    members: Vec<ClassificationResult>,
}

impl Batch {
    /// Returns `None` for an empty accumulator.
    pub(crate) fn from_members(members: Vec<ClassificationResult>) -> Option<Self> {
        if members.is_empty() {
            None
        } else {
            Some(Self { members })
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[ClassificationResult] {
        &self.members
    }

    pub fn keys(&self) -> Vec<String> {
        self.members.iter().map(|m| m.key.clone()).collect()
    }

    /// How many members qualified without content verification.
    pub fn approximate_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_approximate()).count()
    }
}
