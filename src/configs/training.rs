use {
    crate::error::{
        Result,
        StudioError,
    },
    serde::{
        Serialize,
        Deserialize,
    },
};


/// Training loop settings shared by every run of a plan.
#[derive(clap::Args, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    /// Environment steps per run.
    #[arg(long, default_value_t = 1_000_000)]
    pub training_steps: u64,
    /// Steps between two evaluations.
    #[arg(long, default_value_t = 1000)]
    pub evaluation_interval: u64,
    /// Steps between two log records.
    #[arg(long, default_value_t = 1000)]
    pub log_interval: u64,
    /// Episodes per evaluation.
    #[arg(long, default_value_t = 10)]
    pub evaluation_episodes: u64,
    /// Gradient updates per environment step.
    #[arg(long, default_value_t = 1)]
    pub g_value: u64,
    /// Samples per gradient update.
    #[arg(long, default_value_t = 32)]
    pub batch_size: u64,
    /// Random actions taken before the policy acts.
    #[arg(long, default_value_t = 1000)]
    pub exploration_steps: u64,
}
impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            training_steps: 1_000_000,
            evaluation_interval: 1000,
            log_interval: 1000,
            evaluation_episodes: 10,
            g_value: 1,
            batch_size: 32,
            exploration_steps: 1000,
        }
    }
}
impl TrainingSettings {
    fn fields(&self) -> [(&'static str, u64); 7] {
        [
            ("training_steps", self.training_steps),
            ("evaluation_interval", self.evaluation_interval),
            ("log_interval", self.log_interval),
            ("evaluation_episodes", self.evaluation_episodes),
            ("g_value", self.g_value),
            ("batch_size", self.batch_size),
            ("exploration_steps", self.exploration_steps),
        ]
    }

    /// Every setting counts steps, episodes or samples and must be at
    /// least 1.
    pub fn validate(&self) -> Result<()> {
        match self.fields().into_iter().find(|(_, value)| *value == 0) {
            Some((setting, value)) => Err(StudioError::InvalidTrainingSetting { setting, value }),
            None => Ok(()),
        }
    }
}
