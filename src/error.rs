//! # Errors
//!
//! Everything that can go wrong while loading the algorithm catalog or
//! resolving a hyperparameter configuration. Loading failures are collected
//! under [`SchemaError`]; the remaining variants of [`StudioError`] are the
//! query and resolution failures surfaced to the caller.

use {
    crate::{
        configs::{
            HyperValue,
            Number,
            SourceFormat,
            ValueType,
        },
        platforms::{
            ActionSpace,
            Platform,
        },
    },
    std::fmt::Display,
    thiserror::Error,
};


/// The ways a single value can fail to satisfy a hyperparameter schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("expected a value of type {expected}, got {found}")]
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
    },

    #[error("{value} is not a finite number")]
    NotFinite {
        value: HyperValue,
    },

    #[error("{value} is outside the range [{min}, {max}]")]
    OutOfRange {
        value: HyperValue,
        min: Number,
        max: Number,
    },

    #[error("{value} is not one of [{}]", join(.choices))]
    NotOneOf {
        value: HyperValue,
        choices: Vec<HyperValue>,
    },

    #[error("bound pair [{lower}, {upper}] is not ordered (lower bound must not exceed upper bound)")]
    UnorderedPair {
        lower: Number,
        upper: Number,
    },
}

/// Failures while turning a declarative source into a catalog. Any of these
/// leaves the registry unloaded.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("algorithm `{0}` is declared more than once")]
    DuplicateAlgorithm(String),

    #[error("algorithm `{0}` declares no hyperparameters")]
    EmptyHyperparameters(String),

    #[error("hyperparameter `{hyperparameter}` is declared more than once for `{algorithm}`")]
    DuplicateHyperparameter {
        algorithm: String,
        hyperparameter: String,
    },

    #[error("default of `{hyperparameter}` for `{algorithm}` is invalid: {violation}")]
    InvalidDefault {
        algorithm: String,
        hyperparameter: String,
        violation: Violation,
    },

    #[error("constraint on `{hyperparameter}` for `{algorithm}` is unsupported: {reason}")]
    UnsupportedConstraint {
        algorithm: String,
        hyperparameter: String,
        reason: String,
    },

    #[error("failed to parse {format} catalog: {message}")]
    Parse {
        format: SourceFormat,
        message: String,
    },

    #[error("failed to write {format} catalog: {message}")]
    Serialize {
        format: SourceFormat,
        message: String,
    },

    #[error("failed to read catalog at {path}: {message}")]
    Io {
        path: String,
        message: String,
    },

    #[error("unsupported catalog format for {0} (expected .yaml, .yml or .ron)")]
    UnsupportedFormat(String),

    #[error("platform {0} lists no environments")]
    NoEnvironments(Platform),

    #[error("environment `{environment}` is listed more than once for {platform}")]
    DuplicateEnvironment {
        platform: Platform,
        environment: String,
    },
}

#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("the algorithm registry has not been loaded")]
    RegistryNotInitialized,

    #[error("the algorithm registry is already loaded")]
    RegistryAlreadyLoaded,

    #[error("unsupported algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("`{hyperparameter}` is not a hyperparameter of {algorithm}")]
    UnknownHyperparameter {
        algorithm: String,
        hyperparameter: String,
    },

    #[error("invalid value for `{hyperparameter}` of {algorithm}: {violation}")]
    InvalidHyperparameter {
        algorithm: String,
        hyperparameter: String,
        violation: Violation,
    },

    #[error("please select at least one algorithm")]
    EmptySelection,

    #[error("`{environment}` is not a {platform} environment")]
    UnknownEnvironment {
        platform: Platform,
        environment: String,
    },

    #[error("{algorithm} needs a {expected} environment, but `{environment}` is {found}")]
    IncompatibleEnvironment {
        algorithm: String,
        environment: String,
        expected: ActionSpace,
        found: ActionSpace,
    },

    #[error("training setting `{setting}` must be at least 1, got {value}")]
    InvalidTrainingSetting {
        setting: &'static str,
        value: u64,
    },
}

pub type Result<T> = std::result::Result<T, StudioError>;

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
