//! # Configuration resolver
//!
//! Turns an algorithm name plus a (possibly empty) set of user overrides
//! into a [`ResolvedConfiguration`]: one validated value for every declared
//! hyperparameter, overrides where given and defaults everywhere else.

use {
    crate::{
        configs::HyperValue,
        error::{
            Result,
            StudioError,
        },
        registry::AlgorithmRegistry,
    },
    serde::{
        ser::{
            SerializeMap,
            SerializeStruct,
        },
        Serialize,
        Serializer,
    },
    std::collections::BTreeMap,
    tracing::{
        debug,
        warn,
    },
};


/// User supplied hyperparameter values, keyed by hyperparameter name.
pub type Overrides = BTreeMap<String, HyperValue>;

/// The complete hyperparameter assignment for one training run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    algorithm: String,
    values: Vec<(String, HyperValue)>,
}
impl ResolvedConfiguration {
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Name/value pairs in the algorithm's declared order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &HyperValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get(
        &self,
        hyperparameter: &str,
    ) -> Option<&HyperValue> {
        self.values
            .iter()
            .find(|(name, _)| name == hyperparameter)
            .map(|(_, value)| value)
    }

    pub fn float(
        &self,
        hyperparameter: &str,
    ) -> Option<f64> {
        self.get(hyperparameter).and_then(HyperValue::as_f64)
    }

    pub fn int(
        &self,
        hyperparameter: &str,
    ) -> Option<i64> {
        self.get(hyperparameter).and_then(HyperValue::as_i64)
    }

    pub fn string(
        &self,
        hyperparameter: &str,
    ) -> Option<&str> {
        self.get(hyperparameter).and_then(HyperValue::as_str)
    }

    pub fn pair(
        &self,
        hyperparameter: &str,
    ) -> Option<(f64, f64)> {
        self.get(hyperparameter).and_then(HyperValue::as_pair)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// Serialized as `(algorithm: "SAC", hyperparameters: {"gamma": 0.99, ...})`,
// keeping the declared order of the hyperparameters.
impl Serialize for ResolvedConfiguration {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        struct Ordered<'a>(&'a [(String, HyperValue)]);

        impl Serialize for Ordered<'_> {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (name, value) in self.0 {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }

        let mut state = serializer.serialize_struct("ResolvedConfiguration", 2)?;
        state.serialize_field("algorithm", &self.algorithm)?;
        state.serialize_field("hyperparameters", &Ordered(&self.values))?;
        state.end()
    }
}

/// Validates and merges overrides against a loaded [`AlgorithmRegistry`].
///
/// Holds nothing but a shared reference, so resolvers are cheap to create
/// and any number of them can run in parallel.
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<'r> {
    registry: &'r AlgorithmRegistry,
}
impl<'r> ConfigResolver<'r> {
    pub fn new(registry: &'r AlgorithmRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r AlgorithmRegistry {
        self.registry
    }

    /// Resolve `overrides` for `algorithm`.
    ///
    /// Every override key has to be a declared hyperparameter of the
    /// algorithm; unknown keys are rejected before any value is checked.
    /// Values are then validated in declared order and the first violation
    /// aborts the resolution.
    pub fn resolve(
        &self,
        algorithm: &str,
        overrides: &Overrides,
    ) -> Result<ResolvedConfiguration> {
        let descriptor = self.registry.get(algorithm)?;

        if let Some(unknown) = overrides.keys().find(|name| descriptor.schema(name).is_none()) {
            warn!("Rejected unknown hyperparameter {unknown} for {algorithm}");
            return Err(StudioError::UnknownHyperparameter {
                algorithm: algorithm.to_string(),
                hyperparameter: unknown.clone(),
            });
        }

        let values = descriptor
            .schemas()
            .iter()
            .map(|schema| -> Result<(String, HyperValue)> {
                let value = match overrides.get(schema.name()) {
                    Some(value) => schema.check(value).map_err(|violation| {
                        warn!("Rejected {} = {value} for {algorithm}: {violation}", schema.name());
                        StudioError::InvalidHyperparameter {
                            algorithm: algorithm.to_string(),
                            hyperparameter: schema.name().to_string(),
                            violation,
                        }
                    })?,
                    None => schema.default().clone(),
                };
                debug!("{algorithm}.{} = {value}", schema.name());
                Ok((schema.name().to_string(), value))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedConfiguration {
            algorithm: descriptor.name().to_string(),
            values,
        })
    }

    pub fn resolve_defaults(
        &self,
        algorithm: &str,
    ) -> Result<ResolvedConfiguration> {
        self.resolve(algorithm, &Overrides::new())
    }
}
