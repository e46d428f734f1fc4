use serde::{Deserialize, Serialize};

/// Settings for [`match_argv_with_config`](crate::match_argv_with_config).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum number of pattern nodes visited per call; unlimited when `None`.
    pub step_budget: Option<usize>,
}

impl MatchConfig {
    /// Creates a config that stops the search after `budget` steps.
    pub fn with_step_budget(budget: usize) -> Self {
        Self {
            step_budget: Some(budget),
        }
    }
}
