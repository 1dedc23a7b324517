//! # Configs
//!
//! The data model behind every algorithm the studio knows about.
//!
//! A [`HyperparameterSchema`] describes one named parameter: its
//! [`ValueType`], default [`HyperValue`] and an optional [`Constraint`]. An
//! [`AlgorithmDescriptor`] binds an ordered list of schemas to an algorithm
//! name. Algorithms differ only in data, never in code: ensemble sizes,
//! quantile counts and `log_std_bounds`-style bound pairs are all just
//! schemas.
//!
//! The [`CatalogDocument`] is the declarative form these are loaded from
//! (YAML or RON, see [`SourceFormat`]). [`TrainingSettings`] holds the
//! loop settings that apply to every algorithm alike.

mod descriptor;
mod schema;
mod source;
mod training;
mod value;

pub use descriptor::AlgorithmDescriptor;
pub use schema::{
    Constraint,
    HyperparameterSchema,
};
pub use source::{
    AlgorithmEntry,
    CatalogDocument,
    DetailedEntry,
    ParameterEntry,
    SourceFormat,
};
pub use training::TrainingSettings;
pub use value::{
    HyperValue,
    Number,
    ValueType,
};
