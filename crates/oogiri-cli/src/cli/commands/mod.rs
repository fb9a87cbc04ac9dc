pub mod dispatch;
pub mod evaluate;
pub mod exemplars;
pub mod generate;
pub mod init;

pub use dispatch::dispatch;

use anyhow::Context;
use oogiri_core::{OogiriConfig, SqliteExemplarStore};
use std::path::Path;

pub(crate) fn load_config(path: &Path) -> anyhow::Result<OogiriConfig> {
    oogiri_core::load_config(path).with_context(|| format!("config error ({})", path.display()))
}

/// Opens the configured database, creating tables on first use.
pub(crate) fn open_store(cfg: &OogiriConfig) -> anyhow::Result<SqliteExemplarStore> {
    let store = SqliteExemplarStore::open(&cfg.exemplars.database)?;
    store.init_schema()?;
    Ok(store)
}
