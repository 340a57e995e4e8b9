//! Data-driven combat content and loaders.
//!
//! This crate houses the static content a round reads and the loaders for
//! its RON/TOML data files:
//! - Tuning parameters (`config.toml`)
//! - Difficulty tiers and the fallback drop table (`tables.toml`)
//! - Monster catalog (`monsters.ron`)
//! - Hunting grounds (`maps.ron`)
//! - Skill catalog (`skills.ron`)
//!
//! Content is consumed by runtime oracles and never appears in session state.
//! A ready-made data set ships in this crate's `data/` directory.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentCatalog, ContentFactory, ContentTables, MapLoader, MonsterLoader,
    SkillLoader, TablesLoader,
};

/// Directory of the data set bundled with this crate.
pub fn bundled_data_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
