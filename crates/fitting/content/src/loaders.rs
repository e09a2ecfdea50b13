//! Catalog loaders for reading effect tables from TOML files.
//!
//! File format:
//!
//! ```toml
//! [[effects]]
//! id = 11
//! category = "active"
//!
//! [[types]]
//! id = 590
//! effects = [11, 12]
//! ```
//!
//! Categories use the snake_case names of
//! [`EffectCategory`](fitting_core::EffectCategory).

use std::path::Path;

use fitting_core::{EffectCategory, EffectDef, EffectId, ItemTypeId};

use crate::catalog::StaticCatalog;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

#[derive(Debug, serde::Deserialize)]
struct CatalogFile {
    #[serde(default)]
    effects: Vec<EffectRow>,
    #[serde(default)]
    types: Vec<TypeRow>,
}

#[derive(Debug, serde::Deserialize)]
struct EffectRow {
    id: u32,
    category: String,
}

#[derive(Debug, serde::Deserialize)]
struct TypeRow {
    id: u32,
    effects: Vec<u32>,
}

/// Loader for static effect catalogs.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a TOML file.
    pub fn load(path: &Path) -> LoadResult<StaticCatalog> {
        Self::parse(&read_file(path)?)
    }

    /// Parse a catalog from TOML text.
    pub fn parse(content: &str) -> LoadResult<StaticCatalog> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog TOML: {}", e))?;

        let mut catalog = StaticCatalog::new();
        for row in file.effects {
            let category: EffectCategory = row
                .category
                .parse()
                .map_err(|_| anyhow::anyhow!("Unknown effect category '{}'", row.category))?;
            catalog.insert_effect(EffectDef::new(EffectId(row.id), category));
        }
        for row in file.types {
            for effect in row.effects {
                catalog.grant_effect(ItemTypeId(row.id), EffectId(effect));
            }
        }
        Ok(catalog)
    }
}
