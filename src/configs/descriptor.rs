use {
    super::{
        schema::HyperparameterSchema,
        value::HyperValue,
    },
    crate::error::SchemaError,
    std::collections::HashSet,
};


/// A named algorithm and its hyperparameters, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmDescriptor {
    name: String,
    schemas: Vec<HyperparameterSchema>,
}
impl AlgorithmDescriptor {
    /// Bind `schemas` to an algorithm name.
    ///
    /// The schema list has to be non-empty, its names unique, and every
    /// default has to satisfy its own constraint.
    pub fn new(
        name: &str,
        schemas: Vec<HyperparameterSchema>,
    ) -> Result<Self, SchemaError> {
        if schemas.is_empty() {
            return Err(SchemaError::EmptyHyperparameters(name.to_string()));
        }

        let mut seen = HashSet::with_capacity(schemas.len());
        for schema in &schemas {
            if !seen.insert(schema.name()) {
                return Err(SchemaError::DuplicateHyperparameter {
                    algorithm: name.to_string(),
                    hyperparameter: schema.name().to_string(),
                });
            }
            schema.validate_default().map_err(|violation| SchemaError::InvalidDefault {
                algorithm: name.to_string(),
                hyperparameter: schema.name().to_string(),
                violation,
            })?;
        }

        Ok(Self {
            name: name.to_string(),
            schemas,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schemas(&self) -> &[HyperparameterSchema] {
        &self.schemas
    }

    pub fn schema(
        &self,
        hyperparameter: &str,
    ) -> Option<&HyperparameterSchema> {
        self.schemas.iter().find(|schema| schema.name() == hyperparameter)
    }

    /// Hyperparameter names in declared order.
    pub fn hyperparameter_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(HyperparameterSchema::name)
    }

    pub fn defaults(&self) -> impl Iterator<Item = (&str, &HyperValue)> {
        self.schemas.iter().map(|schema| (schema.name(), schema.default()))
    }
}


#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::configs::{
            Constraint,
            Number,
        },
    };

    #[test]
    fn keeps_declared_order() {
        let descriptor = AlgorithmDescriptor::new(
            "DQN",
            vec![
                HyperparameterSchema::new("lr", HyperValue::from(1e-3)),
                HyperparameterSchema::new("gamma", HyperValue::from(0.99)),
                HyperparameterSchema::new("buffer_size", HyperValue::Int(1_000_000)),
            ],
        )
        .unwrap();
        assert_eq!(
            descriptor.hyperparameter_names().collect::<Vec<_>>(),
            vec!["lr", "gamma", "buffer_size"],
        );
        assert_eq!(descriptor.schema("gamma").map(|s| s.default()), Some(&HyperValue::from(0.99)));
        assert!(descriptor.schema("Gamma").is_none());
    }

    #[test]
    fn rejects_empty_and_duplicate_hyperparameters() {
        assert!(matches!(
            AlgorithmDescriptor::new("DDPG", vec![]),
            Err(SchemaError::EmptyHyperparameters(name)) if name == "DDPG",
        ));

        let result = AlgorithmDescriptor::new(
            "DDPG",
            vec![
                HyperparameterSchema::new("tau", HyperValue::from(0.005)),
                HyperparameterSchema::new("tau", HyperValue::from(0.01)),
            ],
        );
        assert!(matches!(
            result,
            Err(SchemaError::DuplicateHyperparameter { hyperparameter, .. }) if hyperparameter == "tau",
        ));
    }

    #[test]
    fn rejects_invalid_defaults() {
        let result = AlgorithmDescriptor::new(
            "SAC",
            vec![HyperparameterSchema::new("log_std_bounds", HyperValue::from((2, -20)))],
        );
        assert!(matches!(result, Err(SchemaError::InvalidDefault { .. })));

        let result = AlgorithmDescriptor::new(
            "PPO",
            vec![HyperparameterSchema::new("eps_clip", HyperValue::from(1.5))
                .with_constraint(Constraint::Range {
                    min: Number::from(0.0),
                    max: Number::from(1.0),
                })
                .unwrap()],
        );
        assert!(matches!(result, Err(SchemaError::InvalidDefault { .. })));
    }
}
