//! YAML configuration for the `usage-match` binary.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use usage_grammar_compiler::CompileConfig;
use usage_grammar_matcher::MatchConfig;

/// Settings read from `--config`; every field is optional.
///
/// ```yaml
/// compile:
///   max_synonyms: 6
///   strict_options: true
/// matching:
///   step_budget: 100000
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub compile: CompileConfig,
    pub matching: MatchConfig,
}

impl CliConfig {
    /// Loads the config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read config '{}': {err}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|err| format!("Failed to parse config '{}': {err}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: CliConfig = serde_yaml::from_str("matching:\n  step_budget: 50\n").unwrap();
        assert_eq!(config.matching.step_budget, Some(50));
        assert_eq!(config.compile, CompileConfig::default());
    }

    #[test]
    fn test_empty_mapping_is_default() {
        let config: CliConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_load_without_path() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }
}
