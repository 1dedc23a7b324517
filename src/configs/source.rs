use {
    super::{
        descriptor::AlgorithmDescriptor,
        schema::{
            Constraint,
            HyperparameterSchema,
        },
        value::{
            HyperValue,
            Number,
        },
    },
    crate::error::SchemaError,
    serde::{
        Serialize,
        Deserialize,
    },
    std::{
        collections::HashSet,
        path::Path,
    },
    strum::Display,
};


/// The text formats a catalog can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SourceFormat {
    #[strum(serialize = "YAML")]
    Yaml,
    #[strum(serialize = "RON")]
    Ron,
}
impl SourceFormat {
    /// Pick the format from a file extension (`.yaml`, `.yml` or `.ron`).
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(SourceFormat::Yaml),
            Some("ron") => Ok(SourceFormat::Ron),
            _ => Err(SchemaError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// The declarative catalog as it appears on disk.
///
/// ```yaml
/// algorithms:
///   - name: SAC
///     hyperparameters:
///       gamma: { default: 0.99, range: [0.0, 1.0] }
///       buffer_size: 1000000
///       log_std_bounds: [-20, 2]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub algorithms: Vec<AlgorithmEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmEntry {
    pub name: String,
    // kept as a list so duplicate keys survive parsing and can be reported
    #[serde(with = "entries")]
    pub hyperparameters: Vec<(String, ParameterEntry)>,
}

/// One hyperparameter declaration: either a bare default or a default with
/// an explicit constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterEntry {
    Plain(HyperValue),
    Detailed(DetailedEntry),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedEntry {
    pub default: HyperValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(Number, Number)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<HyperValue>>,
}

impl CatalogDocument {
    pub fn parse(
        text: &str,
        format: SourceFormat,
    ) -> Result<Self, SchemaError> {
        let parsed = match format {
            SourceFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            SourceFormat::Ron => ron::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| SchemaError::Parse { format, message })
    }

    pub fn render(
        &self,
        format: SourceFormat,
    ) -> Result<String, SchemaError> {
        let rendered = match format {
            SourceFormat::Yaml => serde_yaml::to_string(self).map_err(|e| e.to_string()),
            SourceFormat::Ron => ron::ser::to_string_pretty(
                self,
                ron::ser::PrettyConfig::default(),
            ).map_err(|e| e.to_string()),
        };
        rendered.map_err(|message| SchemaError::Serialize { format, message })
    }

    /// Validate the whole document and build its descriptors, in document
    /// order. Nothing is returned unless every entry is valid.
    pub fn into_descriptors(self) -> Result<Vec<AlgorithmDescriptor>, SchemaError> {
        let mut seen = HashSet::with_capacity(self.algorithms.len());
        let mut descriptors = Vec::with_capacity(self.algorithms.len());

        for algorithm in self.algorithms {
            if !seen.insert(algorithm.name.clone()) {
                return Err(SchemaError::DuplicateAlgorithm(algorithm.name));
            }
            descriptors.push(algorithm.into_descriptor()?);
        }
        Ok(descriptors)
    }

    /// Rebuild a document from loaded descriptors.
    pub fn from_descriptors<'a>(
        descriptors: impl IntoIterator<Item = &'a AlgorithmDescriptor>,
    ) -> Self {
        Self {
            algorithms: descriptors
                .into_iter()
                .map(AlgorithmEntry::from_descriptor)
                .collect(),
        }
    }
}

impl AlgorithmEntry {
    fn into_descriptor(self) -> Result<AlgorithmDescriptor, SchemaError> {
        let schemas = self
            .hyperparameters
            .into_iter()
            .map(|(name, entry)| entry.into_schema(&self.name, &name))
            .collect::<Result<Vec<_>, _>>()?;
        AlgorithmDescriptor::new(&self.name, schemas)
    }

    fn from_descriptor(descriptor: &AlgorithmDescriptor) -> Self {
        Self {
            name: descriptor.name().to_string(),
            hyperparameters: descriptor
                .schemas()
                .iter()
                .map(|schema| (schema.name().to_string(), ParameterEntry::from_schema(schema)))
                .collect(),
        }
    }
}

impl ParameterEntry {
    fn into_schema(
        self,
        algorithm: &str,
        name: &str,
    ) -> Result<HyperparameterSchema, SchemaError> {
        let unsupported = |reason: String| SchemaError::UnsupportedConstraint {
            algorithm: algorithm.to_string(),
            hyperparameter: name.to_string(),
            reason,
        };

        match self {
            ParameterEntry::Plain(default) => Ok(HyperparameterSchema::new(name, default)),
            ParameterEntry::Detailed(DetailedEntry { default, range, choices }) => {
                let schema = HyperparameterSchema::new(name, default);
                match (range, choices) {
                    (None, None) => Ok(schema),
                    (Some((min, max)), None) => schema
                        .with_constraint(Constraint::Range { min, max })
                        .map_err(unsupported),
                    (None, Some(choices)) => schema
                        .with_constraint(Constraint::OneOf(choices))
                        .map_err(unsupported),
                    (Some(_), Some(_)) => Err(unsupported(
                        "a range and choices cannot be combined".to_string(),
                    )),
                }
            }
        }
    }

    fn from_schema(schema: &HyperparameterSchema) -> Self {
        let default = schema.default().clone();
        match schema.constraint() {
            None | Some(Constraint::OrderedPair) => ParameterEntry::Plain(default),
            Some(Constraint::Range { min, max }) => ParameterEntry::Detailed(DetailedEntry {
                default,
                range: Some((*min, *max)),
                choices: None,
            }),
            Some(Constraint::OneOf(choices)) => ParameterEntry::Detailed(DetailedEntry {
                default,
                range: None,
                choices: Some(choices.clone()),
            }),
        }
    }
}

/// (De)serialize a mapping as an ordered list of entries.
mod entries {
    use {
        super::ParameterEntry,
        serde::{
            de::{
                MapAccess,
                Visitor,
            },
            ser::SerializeMap,
            Deserializer,
            Serializer,
        },
        std::fmt,
    };

    pub fn serialize<S: Serializer>(
        entries: &[(String, ParameterEntry)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, entry) in entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, ParameterEntry)>, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Vec<(String, ParameterEntry)>;

            fn expecting(
                &self,
                f: &mut fmt::Formatter,
            ) -> fmt::Result {
                f.write_str("a mapping from hyperparameter names to defaults")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry()? {
                    entries.push(entry);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
