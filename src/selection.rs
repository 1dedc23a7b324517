//! # Selections
//!
//! A studio session compares one or more algorithms on a single
//! environment. Each [`AlgorithmSelection`] either keeps the algorithm's
//! default hyperparameters or carries custom overrides; a [`TrainingPlan`]
//! resolves all of them up front and checks the environment against every
//! algorithm, so a plan only exists if every run in it is valid.

use {
    crate::{
        configs::TrainingSettings,
        error::{
            Result,
            StudioError,
        },
        launcher::{
            RunContext,
            SessionLauncher,
        },
        platforms::{
            Platform,
            PlatformCatalog,
        },
        resolver::{
            ConfigResolver,
            Overrides,
            ResolvedConfiguration,
        },
    },
    serde::{
        Serialize,
        Deserialize,
    },
    tracing::{
        error,
        info,
    },
};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmSelection {
    pub algorithm: String,
    /// `None` keeps the declared defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperparameters: Option<Overrides>,
}
impl AlgorithmSelection {
    pub fn defaults(algorithm: &str) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            hyperparameters: None,
        }
    }

    pub fn custom(
        algorithm: &str,
        overrides: Overrides,
    ) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            hyperparameters: Some(overrides),
        }
    }

    pub fn uses_defaults(&self) -> bool {
        self.hyperparameters.is_none()
    }

    pub fn resolve(
        &self,
        resolver: &ConfigResolver<'_>,
    ) -> Result<ResolvedConfiguration> {
        match &self.hyperparameters {
            Some(overrides) => resolver.resolve(&self.algorithm, overrides),
            None => resolver.resolve_defaults(&self.algorithm),
        }
    }
}

/// Resolve every selection, in order, or none of them.
pub fn resolve_selections(
    resolver: &ConfigResolver<'_>,
    selections: &[AlgorithmSelection],
) -> Result<Vec<ResolvedConfiguration>> {
    if selections.is_empty() {
        return Err(StudioError::EmptySelection);
    }
    selections
        .iter()
        .map(|selection| selection.resolve(resolver))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingPlan {
    platform: Platform,
    environment: String,
    seed: u64,
    settings: TrainingSettings,
    runs: Vec<ResolvedConfiguration>,
}
impl TrainingPlan {
    /// Resolve `selections` and check that every selected algorithm can
    /// train on `environment`.
    pub fn build(
        resolver: &ConfigResolver<'_>,
        platforms: &PlatformCatalog,
        selections: &[AlgorithmSelection],
        platform: Platform,
        environment: &str,
        seed: u64,
        settings: TrainingSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let runs = resolve_selections(resolver, selections)?;
        for config in &runs {
            platforms.check(platform, environment, config.algorithm())?;
        }

        info!("Planned {} run(s) on {platform} {environment} with seed {seed}", runs.len());
        Ok(Self {
            platform,
            environment: environment.to_string(),
            seed,
            settings,
            runs,
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn evaluation_seed(&self) -> u64 {
        self.seed.wrapping_add(1)
    }

    pub fn settings(&self) -> &TrainingSettings {
        &self.settings
    }

    pub fn runs(&self) -> &[ResolvedConfiguration] {
        &self.runs
    }

    pub fn context(&self) -> RunContext<'_> {
        RunContext {
            platform: self.platform,
            environment: &self.environment,
            seed: self.seed,
            evaluation_seed: self.evaluation_seed(),
            settings: self.settings,
        }
    }

    /// Hand every run to `launcher` in selection order, stopping at the
    /// first launch that fails.
    pub fn launch_all<L: SessionLauncher>(
        &self,
        launcher: &mut L,
    ) -> anyhow::Result<Vec<L::Session>> {
        let context = self.context();
        self.runs
            .iter()
            .enumerate()
            .map(|(n, config)| {
                let n = n + 1;
                info!("Launching run {n}/{}: {}", self.runs.len(), config.algorithm());
                launcher.launch(&context, config).map_err(|e| {
                    error!("Run {n} ({}) failed to launch: {e}", config.algorithm());
                    e
                })
            })
            .collect()
    }
}
