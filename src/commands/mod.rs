pub mod agents;
pub mod chat;
pub mod completions;
pub mod config;
pub mod custom;
pub mod profile;
pub mod theme;

use eyre::Result;

use crate::catalog::Catalog;
use crate::catalog::loader::AgentLoader;
use crate::config::Config;
use crate::preferences::{PreferenceStore, Theme};

/// Built-in agents plus whatever custom agents are on disk
pub fn load_catalog(config: &Config) -> Result<Catalog> {
    let loader = AgentLoader::new(config.agents_dir());
    let custom = loader.load_all()?;
    log::debug!("Loaded {} custom agents from {}", custom.len(), loader.agents_dir().display());
    Ok(Catalog::with_extra(custom))
}

pub fn current_theme(config: &Config) -> Theme {
    PreferenceStore::load(&config.preferences_path()).theme()
}
