//! Verdict model: the binary outcome of classifying one entry.
//!
//! This module is pipeline-agnostic: it does not assume workers, channels or a
//! storage provider. It only defines the "shape" of a classification so that the
//! dispatcher can count it and the sink can report it.

use serde::{Deserialize, Serialize};

use super::errors::FetchError;

/// Why an entry qualified.
///
/// Serialized as SCREAMING_SNAKE_CASE for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Evidence {
    /// The key's extension already names the target format.
    Extension,

    /// Content was fetched and decoded as the target format.
    ContentVerified,

    /// Dry-run only: the extension was ambiguous and content was not fetched.
    /// The entry is reported optimistically, so the report is approximate.
    Assumed,
}

/// A qualifying entry, reduced to what the sink needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub key: String,
    pub evidence: Evidence,
}

impl ClassificationResult {
    pub fn new(key: impl Into<String>, evidence: Evidence) -> Self {
        Self {
            key: key.into(),
            evidence,
        }
    }

    pub fn is_approximate(&self) -> bool {
        self.evidence == Evidence::Assumed
    }
}

/// Why an entry was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Extension is on the exclusion list (checked before anything else).
    ExcludedExtension,

    /// Not strictly older than `now - max_age`.
    TooRecent,

    /// Content was fetched but does not decode as the target format.
    NotTargetContent,

    /// Content could not be fetched; never delete on uncertainty.
    FetchFailed(FetchError),

    /// The classification task itself crashed.
    InternalFault(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Qualify(ClassificationResult),
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_qualify(&self) -> bool {
        matches!(self, Self::Qualify(_))
    }
}
