//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/curtree/curtree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `CURTREE_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, SeedShape};
use crate::domain::{DeletePolicy, ValidationRules};

/// Unified configuration for curtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Whether the last program may be deleted
    pub delete_policy: DeletePolicy,
    /// Structural limits checked by validation
    pub rules: ValidationRules,
    /// Shape of the forest produced by `curtree seed`
    pub seed: SeedShape,
}

/// Raw rules for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRules {
    pub min_phases_per_program: Option<usize>,
    pub min_blocks_per_phase: Option<usize>,
    pub max_blocks_per_phase: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSeed {
    pub program_name: Option<String>,
    pub phases: Option<usize>,
    pub blocks_per_phase: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub delete_policy: Option<DeletePolicy>,
    pub rules: RawRules,
    pub seed: RawSeed,
}

/// Get the XDG config directory for curtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "curtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("curtree.toml"))
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

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let rules = &overlay.rules;
        let seed = &overlay.seed;
        Self {
            delete_policy: overlay.delete_policy.unwrap_or(self.delete_policy),
            rules: ValidationRules {
                min_phases_per_program: rules
                    .min_phases_per_program
                    .unwrap_or(self.rules.min_phases_per_program),
                min_blocks_per_phase: rules
                    .min_blocks_per_phase
                    .unwrap_or(self.rules.min_blocks_per_phase),
                max_blocks_per_phase: rules
                    .max_blocks_per_phase
                    .unwrap_or(self.rules.max_blocks_per_phase),
            },
            seed: SeedShape {
                program_name: seed
                    .program_name
                    .clone()
                    .unwrap_or_else(|| self.seed.program_name.clone()),
                phases: seed.phases.unwrap_or(self.seed.phases),
                blocks_per_phase: seed.blocks_per_phase.unwrap_or(self.seed.blocks_per_phase),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = explicit {
            debug!("explicit config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.check()?;
        Ok(current)
    }

    /// Load from a single TOML file on top of defaults, without global
    /// config or environment.
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        let settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.check()?;
        Ok(settings)
    }

    /// Apply CURTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CURTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(&config, "rules.min_phases_per_program")? {
            settings.rules.min_phases_per_program = val;
        }
        if let Some(val) = env_value(&config, "rules.min_blocks_per_phase")? {
            settings.rules.min_blocks_per_phase = val;
        }
        if let Some(val) = env_value(&config, "rules.max_blocks_per_phase")? {
            settings.rules.max_blocks_per_phase = val;
        }
        if let Some(val) = env_value(&config, "seed.phases")? {
            settings.seed.phases = val;
        }
        if let Some(val) = env_value(&config, "seed.blocks_per_phase")? {
            settings.seed.blocks_per_phase = val;
        }
        if let Some(val) = env_value::<String>(&config, "seed.program_name")? {
            settings.seed.program_name = val;
        }
        if let Some(val) = env_value::<String>(&config, "delete_policy")? {
            settings.delete_policy = parse_policy(&val)?;
        }

        Ok(settings)
    }

    /// Reject limits that no forest could satisfy.
    fn check(&self) -> Result<(), ApplicationError> {
        if self.rules.min_blocks_per_phase > self.rules.max_blocks_per_phase {
            return Err(ApplicationError::Config {
                message: format!(
                    "min_blocks_per_phase ({}) exceeds max_blocks_per_phase ({})",
                    self.rules.min_blocks_per_phase, self.rules.max_blocks_per_phase
                ),
            });
        }
        Ok(())
    }

    /// Effective settings as TOML, for `curtree config`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn parse_policy(value: &str) -> Result<DeletePolicy, ApplicationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "permissive" => Ok(DeletePolicy::Permissive),
        "keep-last-program" => Ok(DeletePolicy::KeepLastProgram),
        other => Err(ApplicationError::Config {
            message: format!(
                "unknown delete_policy '{}' (expected permissive or keep-last-program)",
                other
            ),
        }),
    }
}

/// Absent keys are `None`; a present value of the wrong type is an error.
fn env_value<T: DeserializeOwned>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("env override {}: {}", key, e),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_inspecting_then_standard_limits() {
        let settings = Settings::default();
        assert_eq!(settings.rules.max_blocks_per_phase, 20);
        assert_eq!(settings.rules.min_phases_per_program, 1);
        assert_eq!(settings.seed, SeedShape::default());
        assert_eq!(settings.delete_policy, DeletePolicy::Permissive);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_kept() {
        let raw: RawSettings = toml::from_str(
            r#"
delete_policy = "keep-last-program"

[rules]
max_blocks_per_phase = 12
"#,
        )
        .unwrap();
        let merged = Settings::default().merge_with(&raw);
        assert_eq!(merged.rules.max_blocks_per_phase, 12);
        assert_eq!(merged.rules.min_blocks_per_phase, 1);
        assert_eq!(merged.seed.phases, 2);
        assert_eq!(merged.delete_policy, DeletePolicy::KeepLastProgram);
    }

    #[test]
    fn given_policy_strings_when_parsing_then_known_values_accepted() {
        assert_eq!(parse_policy("Permissive").unwrap(), DeletePolicy::Permissive);
        assert_eq!(
            parse_policy("keep-last-program").unwrap(),
            DeletePolicy::KeepLastProgram
        );
        assert!(parse_policy("never").is_err());
    }

    #[test]
    fn given_settings_when_rendering_toml_then_sections_present() {
        let text = Settings::default().to_toml().unwrap();
        assert!(text.contains("[rules]"));
        assert!(text.contains("max_blocks_per_phase = 20"));
        assert!(text.contains("delete_policy = \"permissive\""));
    }
}
