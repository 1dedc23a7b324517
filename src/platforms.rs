//! # Platforms
//!
//! Which environments each simulation platform offers, split by the kind of
//! action space an algorithm needs. A plan may only pair an algorithm with
//! an environment its platform lists for that action space.

use {
    crate::{
        configs::SourceFormat,
        error::{
            Result,
            SchemaError,
            StudioError,
        },
    },
    serde::{
        Serialize,
        Deserialize,
    },
    std::collections::{
        BTreeMap,
        HashSet,
    },
    strum::{
        Display,
        EnumIter,
        EnumString,
    },
};


/// The simulation platforms runs can be launched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter, EnumString)]
pub enum Platform {
    Gymnasium,
    MuJoCo,
    #[strum(serialize = "DMCS")]
    #[serde(rename = "DMCS")]
    Dmcs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActionSpace {
    Continuous,
    Discrete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    #[serde(default)]
    pub environments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discrete_environments: Vec<String>,
}
impl PlatformEntry {
    pub fn environments(
        &self,
        action_space: ActionSpace,
    ) -> &[String] {
        match action_space {
            ActionSpace::Continuous => &self.environments,
            ActionSpace::Discrete => &self.discrete_environments,
        }
    }

    fn action_space_of(
        &self,
        environment: &str,
    ) -> Option<ActionSpace> {
        if self.environments.iter().any(|env| env == environment) {
            Some(ActionSpace::Continuous)
        } else if self.discrete_environments.iter().any(|env| env == environment) {
            Some(ActionSpace::Discrete)
        } else {
            None
        }
    }
}

/// The environments of every platform, as read from
/// `config/config_platform.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCatalog {
    #[serde(default)]
    discrete_algorithms: Vec<String>,
    platforms: BTreeMap<Platform, PlatformEntry>,
}
impl PlatformCatalog {
    pub fn parse(
        text: &str,
        format: SourceFormat,
    ) -> std::result::Result<Self, SchemaError> {
        let parsed: std::result::Result<Self, _> = match format {
            SourceFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            SourceFormat::Ron => ron::from_str(text).map_err(|e| e.to_string()),
        };
        let catalog = parsed.map_err(|message| SchemaError::Parse { format, message })?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> std::result::Result<(), SchemaError> {
        for (platform, entry) in &self.platforms {
            if entry.environments.is_empty() && entry.discrete_environments.is_empty() {
                return Err(SchemaError::NoEnvironments(*platform));
            }
            let mut seen = HashSet::new();
            for environment in entry.environments.iter().chain(&entry.discrete_environments) {
                if !seen.insert(environment) {
                    return Err(SchemaError::DuplicateEnvironment {
                        platform: *platform,
                        environment: environment.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Platforms with at least one environment, in declaration order of
    /// [`Platform`].
    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.platforms.keys().copied()
    }

    /// The action space `algorithm` trains in.
    pub fn action_space(
        &self,
        algorithm: &str,
    ) -> ActionSpace {
        if self.discrete_algorithms.iter().any(|name| name == algorithm) {
            ActionSpace::Discrete
        } else {
            ActionSpace::Continuous
        }
    }

    /// The environments `algorithm` may use on `platform`.
    pub fn environments(
        &self,
        platform: Platform,
        algorithm: &str,
    ) -> &[String] {
        self.platforms
            .get(&platform)
            .map(|entry| entry.environments(self.action_space(algorithm)))
            .unwrap_or_default()
    }

    /// Check that `environment` exists on `platform` and suits `algorithm`.
    pub fn check(
        &self,
        platform: Platform,
        environment: &str,
        algorithm: &str,
    ) -> Result<()> {
        let found = self
            .platforms
            .get(&platform)
            .and_then(|entry| entry.action_space_of(environment))
            .ok_or_else(|| StudioError::UnknownEnvironment {
                platform,
                environment: environment.to_string(),
            })?;

        let expected = self.action_space(algorithm);
        if found != expected {
            return Err(StudioError::IncompatibleEnvironment {
                algorithm: algorithm.to_string(),
                environment: environment.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }
}
