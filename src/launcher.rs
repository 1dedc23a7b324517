//! The boundary to whatever actually trains: a [`SessionLauncher`] receives
//! fully resolved configurations and is free to use them however it likes,
//! as long as it accepts every declared hyperparameter.

use {
    crate::{
        configs::TrainingSettings,
        platforms::Platform,
        resolver::ResolvedConfiguration,
    },
    anyhow::Result,
};


/// Where and how a run is executed, shared by every run of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext<'a> {
    pub platform: Platform,
    pub environment: &'a str,
    pub seed: u64,
    /// The evaluation environment is seeded apart from the training one.
    pub evaluation_seed: u64,
    pub settings: TrainingSettings,
}

pub trait SessionLauncher {
    type Session;

    fn launch(
        &mut self,
        context: &RunContext<'_>,
        config: &ResolvedConfiguration,
    ) -> Result<Self::Session>;
}
