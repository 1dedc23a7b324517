//! Algorithm catalog and hyperparameter contracts for the RL studio.
//!
//! Load a catalog into an [`registry::AlgorithmRegistry`], resolve
//! overrides against it with a [`resolver::ConfigResolver`], and hand the
//! resulting [`resolver::ResolvedConfiguration`]s to a
//! [`launcher::SessionLauncher`].

pub mod logging;
pub mod error;

pub mod configs;
pub mod catalog;
pub mod registry;
pub mod resolver;

pub mod platforms;
pub mod selection;
pub mod launcher;

pub mod cli;
pub mod util;
