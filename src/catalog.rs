//! The studio's built-in algorithm and platform catalogs, compiled into the
//! binary.

use crate::{
    configs::{
        CatalogDocument,
        SourceFormat,
    },
    error::SchemaError,
    platforms::PlatformCatalog,
};


pub const CANONICAL_CATALOG: &str = include_str!("../config/config_algorithm.yaml");

/// Names in the built-in catalog, in presentation order.
pub const CANONICAL_ALGORITHMS: [&str; 7] = ["CTD4", "DDPG", "DQN", "PPO", "SAC", "TD3", "TQC"];

pub const CANONICAL_PLATFORMS: &str = include_str!("../config/config_platform.yaml");

pub fn canonical_document() -> Result<CatalogDocument, SchemaError> {
    CatalogDocument::parse(CANONICAL_CATALOG, SourceFormat::Yaml)
}

pub fn canonical_platforms() -> Result<PlatformCatalog, SchemaError> {
    PlatformCatalog::parse(CANONICAL_PLATFORMS, SourceFormat::Yaml)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_lists_every_algorithm_in_order() {
        let document = canonical_document().unwrap();
        let names = document
            .algorithms
            .iter()
            .map(|algorithm| algorithm.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, CANONICAL_ALGORITHMS);
    }

    #[test]
    fn bundled_catalog_is_valid() {
        assert!(canonical_document().unwrap().into_descriptors().is_ok());
    }

    #[test]
    fn bundled_platforms_cover_every_platform() {
        use {
            crate::platforms::Platform,
            strum::IntoEnumIterator,
        };

        let platforms = canonical_platforms().unwrap();
        assert!(platforms.platforms().eq(Platform::iter()));
    }
}
