use {
    crate::error::Violation,
    ordered_float::OrderedFloat,
    serde::{
        Serialize,
        Deserialize,
    },
    std::fmt::Display,
    strum::{
        Display as StrumDisplay,
        EnumString,
    },
};


/// The type of a hyperparameter, inferred from its declared default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValueType {
    Float,
    Int,
    BoundPair,
    String,
}

/// A single numeric element, used for range limits and bound pair elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(OrderedFloat<f64>),
}
impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(v) => *v as f64,
            Number::Float(v) => v.into_inner(),
        }
    }
}
impl Display for Number {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}
impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}
impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Int(value.into())
    }
}
impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(OrderedFloat(value))
    }
}

/// A concrete hyperparameter value.
///
/// Serialized untagged, so a document reads `gamma: 0.99`,
/// `buffer_size: 1000000`, `log_std_bounds: [-20, 2]` or `activation: relu`.
/// Integers are tried before floats, which keeps `1000000` an `Int` and
/// `0.99` a `Float`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperValue {
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
    Pair(Number, Number),
}
impl HyperValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            HyperValue::Int(_) => ValueType::Int,
            HyperValue::Float(_) => ValueType::Float,
            HyperValue::Str(_) => ValueType::String,
            HyperValue::Pair(..) => ValueType::BoundPair,
        }
    }

    /// The value as a float, widening integers. `None` for strings and pairs.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HyperValue::Int(v) => Some(*v as f64),
            HyperValue::Float(v) => Some(v.into_inner()),
            HyperValue::Str(_) | HyperValue::Pair(..) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HyperValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HyperValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(f64, f64)> {
        match self {
            HyperValue::Pair(lower, upper) => Some((lower.as_f64(), upper.as_f64())),
            _ => None,
        }
    }
}
impl Display for HyperValue {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            HyperValue::Int(v) => write!(f, "{v}"),
            HyperValue::Float(v) => write!(f, "{v}"),
            HyperValue::Str(s) => write!(f, "{s}"),
            HyperValue::Pair(lower, upper) => write!(f, "[{lower}, {upper}]"),
        }
    }
}
impl From<i64> for HyperValue {
    fn from(value: i64) -> Self {
        HyperValue::Int(value)
    }
}
impl From<f64> for HyperValue {
    fn from(value: f64) -> Self {
        HyperValue::Float(OrderedFloat(value))
    }
}
impl From<&str> for HyperValue {
    fn from(value: &str) -> Self {
        HyperValue::Str(value.to_string())
    }
}
impl<L: Into<Number>, U: Into<Number>> From<(L, U)> for HyperValue {
    fn from((lower, upper): (L, U)) -> Self {
        HyperValue::Pair(lower.into(), upper.into())
    }
}

impl ValueType {
    /// Check that `value` has this type, returning it in canonical form.
    ///
    /// An `Int` is widened when a `Float` is expected; nothing is ever
    /// narrowed. Floats (including those inside a pair) must be finite.
    pub fn coerce(
        self,
        value: &HyperValue,
    ) -> Result<HyperValue, Violation> {
        let coerced = match (self, value) {
            (ValueType::Float, HyperValue::Int(v)) => HyperValue::Float(OrderedFloat(*v as f64)),
            (ValueType::Float, HyperValue::Float(_))
            | (ValueType::Int, HyperValue::Int(_))
            | (ValueType::String, HyperValue::Str(_))
            | (ValueType::BoundPair, HyperValue::Pair(..)) => value.clone(),
            _ => {
                return Err(Violation::TypeMismatch {
                    expected: self,
                    found: value.value_type(),
                })
            }
        };

        let finite = match &coerced {
            HyperValue::Float(v) => v.is_finite(),
            HyperValue::Pair(lower, upper) => lower.as_f64().is_finite() && upper.as_f64().is_finite(),
            _ => true,
        };
        if !finite {
            return Err(Violation::NotFinite { value: coerced });
        }
        Ok(coerced)
    }
}
