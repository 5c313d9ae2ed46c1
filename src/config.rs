//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/comeback/comeback.toml`
//! 3. Local config: `<project_dir>/.comeback.toml`
//! 4. Environment variables: `COMEBACK_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::{
    EngineLimits, DEFAULT_COMBINATION_CEILING, DEFAULT_POWERSET_CEILING,
};
use crate::application::ApplicationError;
use crate::domain::bank::{DEFAULT_CLAUSE_LABELS, DEFAULT_WRAPPER_LABELS};
use crate::domain::compat::{DEFAULT_HEAD_CHECKED_LABELS, DEFAULT_RESTRICTED_WORDS};
use crate::domain::CompatibilityPolicy;

/// Explosion ceilings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest power set of template positions that is enumerated
    pub powerset_ceiling: u64,
    /// Largest number of combinations tried for one antichain
    pub combination_ceiling: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            powerset_ceiling: DEFAULT_POWERSET_CEILING,
            combination_ceiling: DEFAULT_COMBINATION_CEILING,
        }
    }
}

/// Compatibility rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Words that disqualify a slot or candidate (matched case-sensitively)
    pub restricted_words: Vec<String>,
    /// Labels whose first child must match as well
    pub head_checked_labels: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            restricted_words: DEFAULT_RESTRICTED_WORDS.map(String::from).to_vec(),
            head_checked_labels: DEFAULT_HEAD_CHECKED_LABELS.map(String::from).to_vec(),
        }
    }
}

/// Substitution bank construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BankConfig {
    /// Labels stripped from the top of each corpus sentence
    pub wrapper_labels: Vec<String>,
    /// Labels whose immediate children are banked individually
    pub clause_labels: Vec<String>,
    /// Corpus file or directory
    pub corpus: Option<PathBuf>,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            wrapper_labels: DEFAULT_WRAPPER_LABELS.map(String::from).to_vec(),
            clause_labels: DEFAULT_CLAUSE_LABELS.map(String::from).to_vec(),
            corpus: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one result file per input; stdout when unset
    pub dir: Option<PathBuf>,
}

/// Raw sections for intermediate parsing (everything optional to detect
/// "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawEngineConfig {
    pub powerset_ceiling: Option<u64>,
    pub combination_ceiling: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPolicyConfig {
    pub restricted_words: Option<Vec<String>>,
    pub head_checked_labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawBankConfig {
    pub wrapper_labels: Option<Vec<String>>,
    pub clause_labels: Option<Vec<String>>,
    pub corpus: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputConfig {
    pub dir: Option<PathBuf>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub engine: RawEngineConfig,
    pub policy: RawPolicyConfig,
    pub bank: RawBankConfig,
    pub output: RawOutputConfig,
}

/// Merge arrays with union semantics and negation support.
///
/// - Items from overlay are added to base
/// - Items prefixed with `!` remove the corresponding item from the result
/// - Duplicates are de-duplicated
///
/// # Examples
/// ```ignore
/// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
/// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
/// ```
pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: HashSet<String> = base.iter().cloned().collect();

    for pattern in overlay {
        if let Some(negated) = pattern.strip_prefix('!') {
            result.remove(negated);
        } else {
            result.insert(pattern.clone());
        }
    }

    // Convert to sorted Vec for deterministic output
    let mut vec: Vec<String> = result.into_iter().collect();
    vec.sort();
    vec
}

fn merge_opt_array(base: &[String], overlay: Option<&Vec<String>>) -> Vec<String> {
    overlay
        .map(|o| merge_array(base, o))
        .unwrap_or_else(|| base.to_vec())
}

fn replace_opt_array(base: &[String], overlay: Option<&Vec<String>>) -> Vec<String> {
    overlay.cloned().unwrap_or_else(|| base.to_vec())
}

/// Unified configuration for comeback.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineConfig,
    pub policy: PolicyConfig,
    pub bank: BankConfig,
    pub output: OutputConfig,
}

/// Get the XDG config directory for comeback.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "comeback").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("comeback.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".comeback.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

impl Settings {
    /// Ceilings as handed to the generator.
    pub fn limits(&self) -> EngineLimits {
        EngineLimits {
            powerset_ceiling: self.engine.powerset_ceiling,
            combination_ceiling: self.engine.combination_ceiling,
        }
    }

    /// Compatibility policy built from the configured word and label sets.
    pub fn policy(&self) -> CompatibilityPolicy {
        CompatibilityPolicy::new(
            &self.policy.head_checked_labels,
            &self.policy.restricted_words,
        )
    }

    /// Expand shell variables and tilde in path-like fields.
    ///
    /// Handles `~`, `$VAR`, and `${VAR}` syntax.
    fn expand_paths(&mut self) {
        self.bank.corpus = self.bank.corpus.as_deref().map(expand_path);
        self.output.dir = self.output.dir.as_deref().map(expand_path);
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Arrays: union merge with negation support
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            engine: EngineConfig {
                powerset_ceiling: overlay
                    .engine
                    .powerset_ceiling
                    .unwrap_or(self.engine.powerset_ceiling),
                combination_ceiling: overlay
                    .engine
                    .combination_ceiling
                    .unwrap_or(self.engine.combination_ceiling),
            },
            policy: PolicyConfig {
                restricted_words: merge_opt_array(
                    &self.policy.restricted_words,
                    overlay.policy.restricted_words.as_ref(),
                ),
                head_checked_labels: merge_opt_array(
                    &self.policy.head_checked_labels,
                    overlay.policy.head_checked_labels.as_ref(),
                ),
            },
            bank: BankConfig {
                wrapper_labels: merge_opt_array(
                    &self.bank.wrapper_labels,
                    overlay.bank.wrapper_labels.as_ref(),
                ),
                clause_labels: merge_opt_array(
                    &self.bank.clause_labels,
                    overlay.bank.clause_labels.as_ref(),
                ),
                corpus: overlay
                    .bank
                    .corpus
                    .clone()
                    .or_else(|| self.bank.corpus.clone()),
            },
            output: OutputConfig {
                dir: overlay
                    .output
                    .dir
                    .clone()
                    .or_else(|| self.output.dir.clone()),
            },
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    ///
    /// Defaults are a starting point; the global file defines the real
    /// baseline for the user.
    fn apply_global(&self, global: &RawSettings) -> Self {
        let mut merged = self.merge_with(global);
        merged.policy.restricted_words = replace_opt_array(
            &self.policy.restricted_words,
            global.policy.restricted_words.as_ref(),
        );
        merged.policy.head_checked_labels = replace_opt_array(
            &self.policy.head_checked_labels,
            global.policy.head_checked_labels.as_ref(),
        );
        merged.bank.wrapper_labels = replace_opt_array(
            &self.bank.wrapper_labels,
            global.bank.wrapper_labels.as_ref(),
        );
        merged.bank.clause_labels = replace_opt_array(
            &self.bank.clause_labels,
            global.bank.clause_labels.as_ref(),
        );
        merged
    }

    /// Load settings with layered precedence.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/comeback/comeback.toml` (arrays REPLACE defaults)
    /// 3. Local config: `<project_dir>/.comeback.toml` (arrays UNION with global)
    /// 4. Environment variables: `COMEBACK_*` prefix (REPLACES)
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        Self::load_from(global.as_deref(), project_dir)
    }

    /// Same as [`Settings::load`] with an explicit global file.
    pub fn load_from(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = global_path {
            let raw = load_raw_settings(path)?;
            current = current.apply_global(&raw);
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    /// Apply COMEBACK_* environment variables as explicit overrides.
    ///
    /// Env vars replace values (not merge). Lists are comma separated:
    /// `COMEBACK_POLICY__RESTRICTED_WORDS=you,your`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("COMEBACK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("policy.restricted_words")
                .with_list_parse_key("policy.head_checked_labels")
                .with_list_parse_key("bank.wrapper_labels")
                .with_list_parse_key("bank.clause_labels"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get::<u64>("engine.powerset_ceiling") {
            settings.engine.powerset_ceiling = val;
        }
        if let Ok(val) = config.get::<u64>("engine.combination_ceiling") {
            settings.engine.combination_ceiling = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("policy.restricted_words") {
            settings.policy.restricted_words = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("policy.head_checked_labels") {
            settings.policy.head_checked_labels = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("bank.wrapper_labels") {
            settings.bank.wrapper_labels = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("bank.clause_labels") {
            settings.bank.clause_labels = val;
        }
        if let Ok(val) = config.get_string("bank.corpus") {
            settings.bank.corpus = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("output.dir") {
            settings.output.dir = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.engine.powerset_ceiling == 0 || self.engine.combination_ceiling == 0 {
            return Err(ApplicationError::Config {
                message: "engine ceilings must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# comeback configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/comeback/comeback.toml  (defines your baseline)
#   Local:  <project_dir>/.comeback.toml      (project-specific additions)
#   Env:    COMEBACK_* environment variables  (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!item" in local config to REMOVE an inherited item:
#     restricted_words = ["me", "!I"]  # adds me, removes I

[engine]
# Skip a template when 2^(number of tree nodes) exceeds this
# powerset_ceiling = 10000000

# Skip one antichain when its number of combinations exceeds this
# combination_ceiling = 60000

[policy]
# Words that disqualify a substitution (case-sensitive)
# restricted_words = ["You", "you", "Your", "your", "I", "my"]

# Labels whose first child must match as well
# head_checked_labels = ["NP", "VP"]

[bank]
# Corpus file or directory, one bracketed tree per line
# corpus = "~/corpus/insults.mrg"

# Labels stripped from the top of each corpus sentence
# wrapper_labels = ["ROOT", "FRAG"]

# Clause labels whose children are banked individually
# clause_labels = ["S"]

[output]
# One result file per input is written here; stdout when unset
# dir = "~/comebacks"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
