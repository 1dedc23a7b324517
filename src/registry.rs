//! # Algorithm registry
//!
//! The catalog of every algorithm the studio can train. A registry starts
//! out unloaded and becomes loaded exactly once; after that it never
//! changes, so any number of threads can read it without locking.
//!
//! ```
//! use rl_studio::registry::AlgorithmRegistry;
//!
//! let registry = AlgorithmRegistry::canonical().unwrap();
//! assert_eq!(registry.list_names().unwrap()[0], "CTD4");
//! ```

use {
    crate::{
        catalog::canonical_document,
        configs::{
            AlgorithmDescriptor,
            CatalogDocument,
            SourceFormat,
        },
        error::{
            Result,
            SchemaError,
            StudioError,
        },
    },
    std::{
        collections::HashMap,
        fs,
        path::Path,
        sync::OnceLock,
    },
    tracing::{
        debug,
        info,
    },
};


#[derive(Debug)]
struct Catalog {
    descriptors: Vec<AlgorithmDescriptor>,
    index: HashMap<String, usize>,
}
impl Catalog {
    fn new(descriptors: Vec<AlgorithmDescriptor>) -> Self {
        let index = descriptors
            .iter()
            .enumerate()
            .map(|(i, descriptor)| (descriptor.name().to_string(), i))
            .collect();
        Self {
            descriptors,
            index,
        }
    }
}

/// Process-wide, read-only catalog of algorithm descriptors.
#[derive(Debug, Default)]
pub struct AlgorithmRegistry {
    catalog: OnceLock<Catalog>,
}
impl AlgorithmRegistry {
    /// An unloaded registry. Every query fails until [`load`](Self::load)
    /// succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry loaded with the built-in catalog.
    pub fn canonical() -> Result<Self> {
        let registry = Self::new();
        registry.load_canonical()?;
        Ok(registry)
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.get().is_some()
    }

    /// Validate `document` and, if every entry is valid, make it the
    /// registry's catalog.
    ///
    /// Loading is all-or-nothing: on error the registry stays unloaded.
    /// Concurrent calls are serialized; exactly one can succeed and the
    /// others fail with [`StudioError::RegistryAlreadyLoaded`].
    pub fn load(
        &self,
        document: CatalogDocument,
    ) -> Result<()> {
        if self.is_loaded() {
            return Err(StudioError::RegistryAlreadyLoaded);
        }

        let catalog = Catalog::new(document.into_descriptors()?);
        let count = catalog.descriptors.len();

        self.catalog
            .set(catalog)
            .map_err(|_| StudioError::RegistryAlreadyLoaded)?;
        info!(algorithms = count, "Algorithm catalog loaded");
        Ok(())
    }

    pub fn load_str(
        &self,
        text: &str,
        format: SourceFormat,
    ) -> Result<()> {
        self.load(CatalogDocument::parse(text, format)?)
    }

    /// Load a catalog file, picking the format from its extension.
    pub fn load_file(
        &self,
        path: &dyn AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        let format = SourceFormat::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("Read {format} catalog from {}", path.display());
        self.load_str(&text, format)
    }

    pub fn load_canonical(&self) -> Result<()> {
        self.load(canonical_document()?)
    }

    fn catalog(&self) -> Result<&Catalog> {
        self.catalog.get().ok_or(StudioError::RegistryNotInitialized)
    }

    /// Look up an algorithm by its exact, case-sensitive name.
    pub fn get(
        &self,
        algorithm: &str,
    ) -> Result<&AlgorithmDescriptor> {
        let catalog = self.catalog()?;
        catalog
            .index
            .get(algorithm)
            .map(|&i| &catalog.descriptors[i])
            .ok_or_else(|| StudioError::UnknownAlgorithm(algorithm.to_string()))
    }

    /// Algorithm names in source order, for populating a selection list.
    pub fn list_names(&self) -> Result<Vec<&str>> {
        Ok(self
            .catalog()?
            .descriptors
            .iter()
            .map(AlgorithmDescriptor::name)
            .collect())
    }

    pub fn descriptors(&self) -> Result<&[AlgorithmDescriptor]> {
        Ok(&self.catalog()?.descriptors)
    }

    /// Re-serialize the loaded catalog to its declarative form.
    pub fn to_document(&self) -> Result<CatalogDocument> {
        Ok(CatalogDocument::from_descriptors(self.descriptors()?))
    }
}


#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::catalog::CANONICAL_ALGORITHMS,
        std::{
            sync::Arc,
            thread,
        },
    };

    #[test]
    fn queries_fail_until_loaded() {
        let registry = AlgorithmRegistry::new();
        assert!(!registry.is_loaded());
        assert!(matches!(registry.get("SAC"), Err(StudioError::RegistryNotInitialized)));
        assert!(matches!(registry.list_names(), Err(StudioError::RegistryNotInitialized)));
        assert!(matches!(registry.to_document(), Err(StudioError::RegistryNotInitialized)));

        registry.load_canonical().unwrap();
        assert!(registry.is_loaded());
        assert_eq!(registry.get("SAC").unwrap().name(), "SAC");
    }

    #[test]
    fn lists_names_in_source_order() {
        let registry = AlgorithmRegistry::canonical().unwrap();
        assert_eq!(registry.list_names().unwrap(), CANONICAL_ALGORITHMS);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = AlgorithmRegistry::canonical().unwrap();
        assert!(matches!(
            registry.get("sac"),
            Err(StudioError::UnknownAlgorithm(name)) if name == "sac",
        ));
    }

    #[test]
    fn failed_load_leaves_registry_unloaded() {
        let registry = AlgorithmRegistry::new();
        let text = "
algorithms:
  - name: DDPG
    hyperparameters: { tau: 0.005 }
  - name: PPO
    hyperparameters: {}
";
        let result = registry.load_str(text, SourceFormat::Yaml);
        assert!(matches!(
            result,
            Err(StudioError::Schema(SchemaError::EmptyHyperparameters(name))) if name == "PPO",
        ));
        assert!(!registry.is_loaded());
        assert!(matches!(registry.get("DDPG"), Err(StudioError::RegistryNotInitialized)));

        // a later, valid load still goes through
        registry.load_canonical().unwrap();
        assert_eq!(registry.descriptors().unwrap().len(), 7);
    }

    #[test]
    fn loads_only_once() {
        let registry = AlgorithmRegistry::canonical().unwrap();
        assert!(matches!(registry.load_canonical(), Err(StudioError::RegistryAlreadyLoaded)));
    }

    #[test]
    fn concurrent_loads_admit_exactly_one() {
        let registry = Arc::new(AlgorithmRegistry::new());
        let handles = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.load_canonical().is_ok())
            })
            .collect::<Vec<_>>();
        let successes = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(registry.list_names().unwrap().len(), 7);
    }
}
