use {
    crate::{
        catalog::canonical_platforms,
        configs::{
            AlgorithmDescriptor,
            HyperValue,
            SourceFormat,
            TrainingSettings,
        },
        platforms::Platform,
        registry::AlgorithmRegistry,
        resolver::{
            ConfigResolver,
            Overrides,
        },
        selection::{
            AlgorithmSelection,
            TrainingPlan,
        },
        util::{
            to_ron,
            write_config,
        },
    },
    anyhow::{
        bail,
        Result,
    },
    clap::{
        Parser,
        Subcommand,
        ValueEnum,
    },
    std::{
        collections::BTreeMap,
        io::Write,
        path::PathBuf,
        str::FromStr,
    },
    tracing::Level,
};


#[derive(ValueEnum, Debug, Clone)]
pub enum Loglevel {
    Error, // runs that fail to launch
    Warn,  // rejected overrides
    Info,  // catalog loads and plans
    Debug, // every resolved value
    None,  // don't log anything
}
impl Loglevel {
    pub fn level(&self) -> Option<Level> {
        match self {
            Loglevel::Error => Some(Level::ERROR),
            Loglevel::Warn => Some(Level::WARN),
            Loglevel::Info => Some(Level::INFO),
            Loglevel::Debug => Some(Level::DEBUG),
            Loglevel::None => None,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Format {
    Yaml,
    Ron,
}
impl From<Format> for SourceFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => SourceFormat::Yaml,
            Format::Ron => SourceFormat::Ron,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Algorithm catalog to load (.yaml, .yml or .ron). Uses the built-in
    /// catalog when omitted.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Setup logging
    #[arg(long, value_enum, default_value_t=Loglevel::None, global = true)]
    pub log: Loglevel,

    /// File to write the log to.
    #[arg(long, default_value = "debug.log", global = true)]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the available algorithms.
    List,

    /// Show the hyperparameters of an algorithm.
    Show {
        algorithm: String,
    },

    /// Resolve the hyperparameters of an algorithm.
    Resolve {
        algorithm: String,

        /// Override a hyperparameter, e.g. `--set gamma=0.95` or
        /// `--set log_std_bounds=[-10,2]`.
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
        overrides: Vec<(String, HyperValue)>,

        /// File to write the resolved configuration to (RON).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the environments of a platform.
    Environments {
        #[arg(value_parser = Platform::from_str)]
        platform: Platform,

        /// Only list environments this algorithm can train on.
        #[arg(long)]
        algorithm: Option<String>,
    },

    /// Print the loaded catalog.
    Export {
        #[arg(long, value_enum, default_value_t=Format::Yaml)]
        format: Format,
    },

    /// Resolve a comparison of several algorithms on one environment.
    Plan {
        #[arg(required = true)]
        algorithms: Vec<String>,

        /// Override a hyperparameter of one selected algorithm, e.g.
        /// `--set SAC.gamma=0.95`.
        #[arg(long = "set", value_name = "ALGORITHM.KEY=VALUE", value_parser = parse_qualified_override)]
        overrides: Vec<(String, String, HyperValue)>,

        #[arg(long, value_parser = Platform::from_str, default_value = "Gymnasium")]
        platform: Platform,

        #[arg(long)]
        environment: String,

        #[arg(long, default_value_t = 571)]
        seed: u64,

        #[command(flatten)]
        settings: TrainingSettings,

        /// File to write the plan to (RON).
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Parse `KEY=VALUE`, reading the value as YAML (`0.3`, `100`, `[-20, 2]`,
/// `relu`).
pub fn parse_override(s: &str) -> Result<(String, HyperValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing hyperparameter name in `{s}`"));
    }
    let value = serde_yaml::from_str::<HyperValue>(value.trim())
        .map_err(|_| format!("`{}` is not a number, string or bound pair", value.trim()))?;
    Ok((key.to_string(), value))
}

/// Parse `ALGORITHM.KEY=VALUE`.
pub fn parse_qualified_override(s: &str) -> Result<(String, String, HyperValue), String> {
    let (key, value) = parse_override(s)?;
    match key.split_once('.') {
        Some((algorithm, name)) if !algorithm.is_empty() && !name.is_empty() => {
            Ok((algorithm.to_string(), name.to_string(), value))
        }
        _ => Err(format!("expected ALGORITHM.KEY=VALUE, got `{s}`")),
    }
}

fn write_descriptor(
    out: &mut dyn Write,
    descriptor: &AlgorithmDescriptor,
) -> Result<()> {
    writeln!(out, "{}", descriptor.name())?;
    for schema in descriptor.schemas() {
        let constraint = schema
            .constraint()
            .map(ToString::to_string)
            .unwrap_or_default();
        writeln!(
            out,
            "  {:<24}{:<12}{:<12}{}",
            schema.name(),
            schema.value_type().to_string(),
            schema.default().to_string(),
            constraint,
        )?;
    }
    Ok(())
}

fn plan_selections(
    algorithms: &[String],
    overrides: Vec<(String, String, HyperValue)>,
) -> Result<Vec<AlgorithmSelection>> {
    let mut custom: BTreeMap<String, Overrides> = BTreeMap::new();
    for (algorithm, name, value) in overrides {
        if !algorithms.contains(&algorithm) {
            bail!("--set {algorithm}.{name} names an algorithm that is not selected");
        }
        custom.entry(algorithm).or_default().insert(name, value);
    }

    Ok(algorithms
        .iter()
        .map(|algorithm| match custom.get(algorithm) {
            Some(overrides) => AlgorithmSelection::custom(algorithm, overrides.clone()),
            None => AlgorithmSelection::defaults(algorithm),
        })
        .collect())
}

/// Load the catalog and execute one command, printing results to `out`.
pub fn run(
    args: Args,
    out: &mut dyn Write,
) -> Result<()> {
    let registry = AlgorithmRegistry::new();
    match &args.catalog {
        Some(path) => registry.load_file(path)?,
        None => registry.load_canonical()?,
    }
    let resolver = ConfigResolver::new(&registry);

    match args.command {
        Command::List => {
            for name in registry.list_names()? {
                writeln!(out, "{name}")?;
            }
        }

        Command::Show { algorithm } => {
            write_descriptor(out, registry.get(&algorithm)?)?;
        }

        Command::Resolve { algorithm, overrides, output } => {
            let overrides: Overrides = overrides.into_iter().collect();
            let config = resolver.resolve(&algorithm, &overrides)?;
            match output {
                Some(path) => write_config(&config, &path)?,
                None => writeln!(out, "{}", to_ron(&config)?)?,
            }
        }

        Command::Export { format } => {
            write!(out, "{}", registry.to_document()?.render(format.into())?)?;
        }

        Command::Environments { platform, algorithm } => {
            let platforms = canonical_platforms()?;
            let algorithms = match algorithm {
                Some(algorithm) => vec![registry.get(&algorithm)?.name().to_string()],
                None => registry.list_names()?.into_iter().map(str::to_string).collect(),
            };
            let mut listed = Vec::new();
            for algorithm in &algorithms {
                for environment in platforms.environments(platform, algorithm) {
                    if !listed.contains(environment) {
                        listed.push(environment.clone());
                    }
                }
            }
            for environment in listed {
                writeln!(out, "{environment}")?;
            }
        }

        Command::Plan { algorithms, overrides, platform, environment, seed, settings, output } => {
            let selections = plan_selections(&algorithms, overrides)?;
            let platforms = canonical_platforms()?;
            let plan = TrainingPlan::build(
                &resolver,
                &platforms,
                &selections,
                platform,
                &environment,
                seed,
                settings,
            )?;
            match output {
                Some(path) => write_config(&plan, &path)?,
                None => writeln!(out, "{}", to_ron(&plan)?)?,
            }
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::error::StudioError,
    };

    fn run_with(argv: &[&str]) -> Result<String> {
        let args = Args::try_parse_from(std::iter::once("rl_studio").chain(argv.iter().copied()))?;
        let mut out = Vec::new();
        run(args, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn parses_overrides() {
        assert_eq!(parse_override("gamma=0.3"), Ok(("gamma".to_string(), HyperValue::from(0.3))));
        assert_eq!(
            parse_override("log_std_bounds = [2, -20]"),
            Ok(("log_std_bounds".to_string(), HyperValue::from((2, -20)))),
        );
        assert_eq!(parse_override("buffer_size=100"), Ok(("buffer_size".to_string(), HyperValue::Int(100))));
        assert!(parse_override("gamma").is_err());
        assert!(parse_override("=0.3").is_err());

        assert_eq!(
            parse_qualified_override("SAC.tau=0.01"),
            Ok(("SAC".to_string(), "tau".to_string(), HyperValue::from(0.01))),
        );
        assert!(parse_qualified_override("tau=0.01").is_err());
    }

    #[test]
    fn list_prints_names_in_order() {
        let out = run_with(&["list"]).unwrap();
        assert_eq!(out.lines().collect::<Vec<_>>(), vec!["CTD4", "DDPG", "DQN", "PPO", "SAC", "TD3", "TQC"]);
    }

    #[test]
    fn show_prints_every_hyperparameter() {
        let out = run_with(&["show", "SAC"]).unwrap();
        assert!(out.starts_with("SAC\n"));
        assert!(out.contains("log_std_bounds"));
        assert!(out.contains("ordered pair"));
        assert_eq!(out.lines().count(), 8);
    }

    #[test]
    fn resolve_applies_overrides() {
        let out = run_with(&["resolve", "PPO", "--set", "eps_clip=0.3"]).unwrap();
        assert!(out.contains("\"eps_clip\": 0.3"));
    }

    #[test]
    fn resolve_surfaces_typed_errors() {
        let err = run_with(&["resolve", "PPO", "--set", "buffer_size=100"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StudioError>(),
            Some(StudioError::UnknownHyperparameter { .. }),
        ));

        let err = run_with(&["resolve", "SAC", "--set", "log_std_bounds=[2, -20]"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StudioError>(),
            Some(StudioError::InvalidHyperparameter { .. }),
        ));
    }

    #[test]
    fn plan_rejects_overrides_for_unselected_algorithms() {
        let result = run_with(&["plan", "DDPG", "--environment", "Pendulum-v1", "--set", "SAC.tau=0.01"]);
        assert!(result.is_err());

        let out = run_with(&[
            "plan", "DDPG", "SAC",
            "--platform", "MuJoCo",
            "--environment", "Hopper-v4",
            "--set", "SAC.tau=0.01",
        ])
        .unwrap();
        assert!(out.contains("MuJoCo"));
        assert!(out.contains("\"tau\": 0.01"));
        assert!(out.contains("batch_size: 32"));
    }

    #[test]
    fn plan_takes_training_settings() {
        let args = Args::try_parse_from([
            "rl_studio", "plan", "TD3",
            "--environment", "Pendulum-v1",
            "--batch-size", "256",
            "--training-steps", "5000",
        ])
        .unwrap();
        match args.command {
            Command::Plan { settings, .. } => assert_eq!(
                settings,
                TrainingSettings {
                    batch_size: 256,
                    training_steps: 5000,
                    ..Default::default()
                },
            ),
            other => panic!("expected a plan, got {other:?}"),
        }

        let args = Args::try_parse_from(["rl_studio", "plan", "TD3", "--environment", "Pendulum-v1"]).unwrap();
        assert!(matches!(args.command, Command::Plan { settings, .. } if settings == TrainingSettings::default()));

        let err = run_with(&["plan", "TD3", "--environment", "Pendulum-v1", "--g-value", "0"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StudioError>(),
            Some(StudioError::InvalidTrainingSetting { setting: "g_value", .. }),
        ));
    }

    #[test]
    fn plan_checks_the_environment() {
        let err = run_with(&["plan", "DQN", "--platform", "DMCS", "--environment", "anything"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StudioError>(),
            Some(StudioError::UnknownEnvironment { .. }),
        ));

        let err = run_with(&["plan", "DQN", "--environment", "Pendulum-v1"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StudioError>(),
            Some(StudioError::IncompatibleEnvironment { .. }),
        ));
    }

    #[test]
    fn environments_follow_the_algorithm() {
        let out = run_with(&["environments", "Gymnasium", "--algorithm", "DQN"]).unwrap();
        assert!(out.lines().any(|env| env == "CartPole-v1"));
        assert!(!out.lines().any(|env| env == "Pendulum-v1"));

        let out = run_with(&["environments", "MuJoCo"]).unwrap();
        assert!(out.lines().any(|env| env == "Hopper-v4"));

        assert!(run_with(&["environments", "DMCS", "--algorithm", "DQN"]).unwrap().is_empty());
    }

    #[test]
    fn export_round_trips() {
        let out = run_with(&["export"]).unwrap();
        let registry = AlgorithmRegistry::new();
        registry.load_str(&out, SourceFormat::Yaml).unwrap();
        assert_eq!(
            registry.to_document().unwrap(),
            AlgorithmRegistry::canonical().unwrap().to_document().unwrap(),
        );
    }
}
