//! Guardrail configuration, loaded from TOML.
//!
//! ```toml
//! index_column = "date"
//! suppress = ["warmup"]
//! extra_future_patterns = ['\btomorrow_']
//! verify_indicator_warmup = true
//!
//! [execution]
//! execution_price = "close"
//! ```

use crate::error::{ConfigError, TableError};
use crate::guards::exec_policy::{enforce_t_plus_one, ExecConfig};
use crate::guards::future_refs::FutureRefScanner;
use crate::guards::GuardCheck;
use crate::table::{TimeTable, DEFAULT_INDEX_COLUMN};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub index_column: String,
    /// Checks to skip. Each skip is logged every time the check would run.
    pub suppress: Vec<GuardCheck>,
    /// Regexes added to the built-in forward-reference patterns.
    pub extra_future_patterns: Vec<String>,
    /// Check the warmup window of every indicator column a filter uses.
    pub verify_indicator_warmup: bool,
    pub execution: Option<ExecConfig>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            index_column: DEFAULT_INDEX_COLUMN.to_owned(),
            suppress: Vec::new(),
            extra_future_patterns: Vec::new(),
            verify_indicator_warmup: true,
            execution: None,
        }
    }
}

impl GuardConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.scanner()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn is_suppressed(&self, check: GuardCheck) -> bool {
        self.suppress.contains(&check)
    }

    /// Forward-reference scanner: built-in patterns plus the configured extras.
    pub fn scanner(&self) -> Result<FutureRefScanner, ConfigError> {
        FutureRefScanner::with_extra_patterns(&self.extra_future_patterns)
    }

    /// Configured execution settings under the T+1 policy.
    pub fn execution(&self) -> ExecConfig {
        enforce_t_plus_one(self.execution.clone())
    }

    /// Wrap a frame using the configured index column.
    pub fn wrap_frame(&self, frame: DataFrame) -> Result<TimeTable, TableError> {
        TimeTable::from_frame(frame, self.index_column.as_str())
    }
}
