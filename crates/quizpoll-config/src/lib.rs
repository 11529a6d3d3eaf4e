use quizpoll_engine::{LimitProfile, TruncatableField};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PROFILE: &str = "lenient";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unknown limit profile '{0}'")]
    UnknownProfile(String),

    #[error("Invalid limit profile '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },
}

/// A named profile as written in the config file. Unset fields come from the
/// preset, or from the built-in profile of the same name, or from the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub preset: Option<String>,
    pub stem_max_len: Option<usize>,
    pub stem_min_len: Option<usize>,
    pub option_max_len: Option<usize>,
    pub option_min_len: Option<usize>,
    pub explanation_max_len: Option<usize>,
    pub min_options: Option<usize>,
    pub max_options: Option<usize>,
    pub truncatable_fields: Option<BTreeSet<TruncatableField>>,
}

impl ProfileConfig {
    fn resolve(&self, name: &str) -> Result<LimitProfile, ConfigError> {
        let base = match &self.preset {
            Some(preset) => {
                LimitProfile::preset(preset).ok_or_else(|| ConfigError::InvalidProfile {
                    name: name.to_string(),
                    reason: format!("unknown preset '{preset}'"),
                })?
            }
            None => LimitProfile::preset(name).unwrap_or_default(),
        };

        let profile = LimitProfile {
            stem_max_len: self.stem_max_len.unwrap_or(base.stem_max_len),
            stem_min_len: self.stem_min_len.unwrap_or(base.stem_min_len),
            option_max_len: self.option_max_len.unwrap_or(base.option_max_len),
            option_min_len: self.option_min_len.unwrap_or(base.option_min_len),
            explanation_max_len: self.explanation_max_len.unwrap_or(base.explanation_max_len),
            min_options: self.min_options.unwrap_or(base.min_options),
            max_options: self.max_options.unwrap_or(base.max_options),
            truncatable_fields: self
                .truncatable_fields
                .clone()
                .unwrap_or(base.truncatable_fields),
        };
        check_profile(name, &profile)?;
        Ok(profile)
    }
}

fn check_profile(name: &str, profile: &LimitProfile) -> Result<(), ConfigError> {
    let reason = if profile.min_options < 2 {
        Some(format!(
            "min_options must be at least 2, got {}",
            profile.min_options
        ))
    } else if profile.min_options > profile.max_options {
        Some(format!(
            "min_options ({}) is greater than max_options ({})",
            profile.min_options, profile.max_options
        ))
    } else if profile.stem_max_len == 0
        || profile.option_max_len == 0
        || profile.explanation_max_len == 0
    {
        Some("maximum lengths must be greater than zero".to_string())
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidProfile {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn default_profile_name() -> String {
    DEFAULT_PROFILE.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_profile_name")]
    pub default_profile: String,
    /// Files or directories processed when none are given on the command line.
    #[serde(default)]
    pub question_paths: Vec<PathBuf>,
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: default_profile_name(),
            question_paths: Vec::new(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the configured question paths
        config.question_paths = config
            .question_paths
            .into_iter()
            .map(|path| Self::expand_path(&path).unwrap_or(path))
            .collect();

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/quizpoll");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// A config with both built-in presets spelled out, as a starting point
    /// for editing.
    pub fn with_builtin_profiles() -> Self {
        let spelled_out = |preset: &str, profile: LimitProfile| ProfileConfig {
            preset: Some(preset.to_string()),
            stem_max_len: Some(profile.stem_max_len),
            stem_min_len: Some(profile.stem_min_len),
            option_max_len: Some(profile.option_max_len),
            option_min_len: Some(profile.option_min_len),
            explanation_max_len: Some(profile.explanation_max_len),
            min_options: Some(profile.min_options),
            max_options: Some(profile.max_options),
            truncatable_fields: Some(profile.truncatable_fields),
        };
        Self {
            profiles: BTreeMap::from([
                (
                    "lenient".to_string(),
                    spelled_out("lenient", LimitProfile::lenient()),
                ),
                (
                    "permissive".to_string(),
                    spelled_out("permissive", LimitProfile::permissive()),
                ),
            ]),
            ..Self::default()
        }
    }

    /// Resolves a profile by name. `lenient` and `permissive` resolve even
    /// when the file does not define them.
    pub fn profile(&self, name: &str) -> Result<LimitProfile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => profile.resolve(name),
            None => LimitProfile::preset(name)
                .ok_or_else(|| ConfigError::UnknownProfile(name.to_string())),
        }
    }

    pub fn default_limit_profile(&self) -> Result<LimitProfile, ConfigError> {
        self.profile(&self.default_profile)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
