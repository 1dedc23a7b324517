use {
    super::value::{
        HyperValue,
        Number,
        ValueType,
    },
    crate::error::Violation,
    std::fmt::Display,
};


/// An optional restriction on the values a hyperparameter accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Inclusive numeric range, for `float` and `int` hyperparameters.
    Range {
        min: Number,
        max: Number,
    },
    /// An enumerated set of allowed values.
    OneOf(Vec<HyperValue>),
    /// The two elements of a bound pair must be ordered (lower <= upper).
    OrderedPair,
}

impl Display for Constraint {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Constraint::Range { min, max } => write!(f, "range [{min}, {max}]"),
            Constraint::OneOf(choices) => {
                let choices = choices.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "one of [{}]", choices.join(", "))
            }
            Constraint::OrderedPair => write!(f, "ordered pair"),
        }
    }
}

/// One named hyperparameter of an algorithm: its type, default and the
/// constraint (if any) every value has to satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperparameterSchema {
    name: String,
    value_type: ValueType,
    default: HyperValue,
    constraint: Option<Constraint>,
}
impl HyperparameterSchema {
    /// Build a schema whose type is inferred from `default`.
    ///
    /// Bound pairs always carry [`Constraint::OrderedPair`]. The default is
    /// not checked here, see [`HyperparameterSchema::validate_default`].
    pub fn new(
        name: &str,
        default: HyperValue,
    ) -> Self {
        let value_type = default.value_type();
        let constraint = match value_type {
            ValueType::BoundPair => Some(Constraint::OrderedPair),
            _ => None,
        };
        Self {
            name: name.to_string(),
            value_type,
            default,
            constraint,
        }
    }

    /// Restrict the schema with an explicit constraint.
    ///
    /// Fails with a human readable reason when the constraint does not fit
    /// the schema's type.
    pub fn with_constraint(
        mut self,
        constraint: Constraint,
    ) -> Result<Self, String> {
        let constraint = match (self.value_type, constraint) {
            (ValueType::Float | ValueType::Int, Constraint::Range { min, max }) => {
                if !(min.as_f64().is_finite() && max.as_f64().is_finite()) {
                    return Err(format!("range [{min}, {max}] is not finite"));
                }
                if min.as_f64() > max.as_f64() {
                    return Err(format!("range lower bound {min} exceeds upper bound {max}"));
                }
                Constraint::Range { min, max }
            }
            (ValueType::BoundPair, Constraint::Range { .. }) => {
                return Err("a range does not apply to a bound pair".to_string())
            }
            (ValueType::String, Constraint::Range { .. }) => {
                return Err("a range does not apply to a string".to_string())
            }
            (ValueType::BoundPair, Constraint::OneOf(_)) => {
                return Err("choices do not apply to a bound pair".to_string())
            }
            (value_type, Constraint::OneOf(choices)) => {
                if choices.is_empty() {
                    return Err("choices must not be empty".to_string());
                }
                let choices = choices
                    .iter()
                    .map(|choice| value_type.coerce(choice))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|violation| format!("invalid choice: {violation}"))?;
                Constraint::OneOf(choices)
            }
            (ValueType::BoundPair, Constraint::OrderedPair) => Constraint::OrderedPair,
            (value_type, Constraint::OrderedPair) => {
                return Err(format!("an ordered pair constraint does not apply to a {value_type}"))
            }
        };
        self.constraint = Some(constraint);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn default(&self) -> &HyperValue {
        &self.default
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    /// The declared default must pass its own schema.
    pub fn validate_default(&self) -> Result<(), Violation> {
        self.check(&self.default).map(|_| ())
    }

    /// Validate `value` against this schema and return it in canonical form.
    pub fn check(
        &self,
        value: &HyperValue,
    ) -> Result<HyperValue, Violation> {
        let value = self.value_type.coerce(value)?;

        match &self.constraint {
            None => (),
            Some(Constraint::Range { min, max }) => {
                // coerce() only lets numbers through for numeric types
                let v = value.as_f64().unwrap_or(f64::NAN);
                if !(min.as_f64() <= v && v <= max.as_f64()) {
                    return Err(Violation::OutOfRange {
                        value,
                        min: *min,
                        max: *max,
                    });
                }
            }
            Some(Constraint::OneOf(choices)) => {
                if !choices.contains(&value) {
                    return Err(Violation::NotOneOf {
                        value,
                        choices: choices.clone(),
                    });
                }
            }
            Some(Constraint::OrderedPair) => {
                if let HyperValue::Pair(lower, upper) = &value {
                    if lower.as_f64() > upper.as_f64() {
                        return Err(Violation::UnorderedPair {
                            lower: *lower,
                            upper: *upper,
                        });
                    }
                }
            }
        }
        Ok(value)
    }
}
