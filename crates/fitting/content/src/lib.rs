//! Static content for the fitting engine.
//!
//! This crate houses the in-memory effect catalog (the reference
//! [`EffectOracle`](fitting_core::EffectOracle) implementation), a TOML
//! loader for catalog files, and canned fixtures used by the integration
//! tests. Content is consumed by the engine through oracle traits and never
//! appears inside engine state.

pub mod catalog;
pub mod fixtures;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::StaticCatalog;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, LoadResult};
