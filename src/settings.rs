//! Layered settings: built-in defaults, then an optional file, then
//! `RDFLIST__SECTION__KEY` environment variables.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// Upper bound on branches walked while expanding one head.
    pub max_branches: usize,
}
impl Default for ReaderSettings {
    fn default() -> Self {
        Self { max_branches: 1024 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderSettings {
    pub blank_node_prefix: String,
}
impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            blank_node_prefix: "list".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub reader: ReaderSettings,
    pub builder: BuilderSettings,
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Settings::default())?);
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("RDFLIST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        let settings: Settings = builder.build()?.try_deserialize()?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }
}
