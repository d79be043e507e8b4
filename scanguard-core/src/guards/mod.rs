//! Guardrail validators.
//!
//! Pure, fail-fast checks for ordering, warmup blankness, cross-table
//! alignment and forward-looking expression text, plus the canonical T+1
//! execution policy. Success is silence; a violation is returned as an
//! error and never repaired.

pub mod alignment;
pub mod exec_policy;
pub mod future_refs;
pub mod index;
pub mod warmup;

pub use alignment::verify_alignment;
pub use exec_policy::{enforce_t_plus_one, ExecConfig};
pub use future_refs::{
    detect_future_refs, detect_future_refs_with, ExprNode, ExpressionSource, FutureRefPattern,
    FutureRefScanner,
};
pub use index::assert_monotonic_index;
pub use warmup::{check_warmup, check_warmup_values};

use serde::{Deserialize, Serialize};

/// Names a single guardrail so a caller can suppress exactly that one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardCheck {
    MonotonicIndex,
    Warmup,
    Alignment,
    FutureRefs,
}

impl std::fmt::Display for GuardCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuardCheck::MonotonicIndex => write!(f, "monotonic_index"),
            GuardCheck::Warmup => write!(f, "warmup"),
            GuardCheck::Alignment => write!(f, "alignment"),
            GuardCheck::FutureRefs => write!(f, "future_refs"),
        }
    }
}
