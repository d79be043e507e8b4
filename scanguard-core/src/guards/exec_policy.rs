//! Canonical T+1 execution policy.
//!
//! A signal computed from data through day t is tradable from day t+1.
//! [`enforce_t_plus_one`] is the only place that states the delay; every
//! consumer asks it instead of hard-coding the shift.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Price used when the caller does not name one.
pub const DEFAULT_EXECUTION_PRICE: &str = "open";

/// Execution settings handed between the scanner and its consumers.
///
/// Keys this crate does not interpret are carried in `extra` and survive
/// canonicalisation untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecConfig {
    #[serde(default)]
    pub delay: u32,
    #[serde(default)]
    pub t_plus_one: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_price: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ExecConfig {
    /// Execution price, falling back to the default.
    pub fn price(&self) -> &str {
        self.execution_price
            .as_deref()
            .unwrap_or(DEFAULT_EXECUTION_PRICE)
    }
}

/// Canonicalise an execution config to the T+1 policy.
///
/// Sets `delay = 1` and `t_plus_one = true`, fills `execution_price` with
/// `"open"` when absent, and keeps everything else the caller supplied.
pub fn enforce_t_plus_one(config: Option<ExecConfig>) -> ExecConfig {
    let mut config = config.unwrap_or_default();
    config.delay = 1;
    config.t_plus_one = true;
    if config.execution_price.is_none() {
        config.execution_price = Some(DEFAULT_EXECUTION_PRICE.to_owned());
    }
    config
}
