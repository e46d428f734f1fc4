//! Compilation settings.

use serde::{Deserialize, Serialize};

/// Upper bound on synonyms per option line unless configured otherwise.
pub const DEFAULT_MAX_SYNONYMS: usize = 4;

/// Settings for [`compile_help_with_config`](crate::compile_help_with_config).
///
/// # Examples
///
/// ```
/// use usage_grammar_compiler::CompileConfig;
///
/// let config: CompileConfig = serde_json::from_str(r#"{"strict_options": true}"#).unwrap();
/// assert!(config.strict_options);
/// assert_eq!(config.max_synonyms, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Maximum number of flag spellings one option line may declare.
    pub max_synonyms: usize,
    /// Require every usage option to be declared in an `Options:` section.
    ///
    /// When `false` and the help text has no `Options:` header, options
    /// written in usage lines are declared implicitly.
    pub strict_options: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            max_synonyms: DEFAULT_MAX_SYNONYMS,
            strict_options: false,
        }
    }
}
