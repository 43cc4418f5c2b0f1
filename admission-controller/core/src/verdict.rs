use crate::WorkloadKind;

/// The outcome of a single admission review.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub allowed: bool,
    pub message: String,
}

/// Scoring configuration for a single workload kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub kind: WorkloadKind,
    pub minimum_score: i64,
}

// === impl Verdict ===

impl Verdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            message: String::new(),
        }
    }

    pub fn deny(message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            message: message.into(),
        }
    }
}
