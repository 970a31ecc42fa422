//! Graph configuration.
//!
//! Values are layered with `figment`: built-in defaults, then an optional
//! TOML file, then `OPTIGRAPH_`-prefixed environment variables.
//!
//! ```toml
//! reclamation = "exclusive"
//! ```

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::ReclamationPolicy;

/// Prefix of the environment variables read by [`GraphConfig::load`].
pub const ENV_PREFIX: &str = "OPTIGRAPH_";

/// Construction-time settings for a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// When logically deleted nodes may be physically unlinked.
    pub reclamation: ReclamationPolicy,
}

impl GraphConfig {
    /// Loads the configuration from defaults, `path` (if given) and the
    /// environment, later sources overriding earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `path` does not exist and
    /// [`Error::Config`] if a source holds a value of the wrong shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Ok(layered(Self::default(), path)?.extract()?)
    }
}

/// Builds the figment shared by every configuration type in the workspace:
/// `defaults`, then the TOML file at `path`, then the environment.
///
/// Nested keys are separated by `__` in variable names, so
/// `OPTIGRAPH_GRAPH__RECLAMATION` sets `graph.reclamation`.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if `path` is given but does not exist.
pub fn layered<T: Serialize>(defaults: T, path: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(defaults));
    if let Some(path) = path {
        if !path.is_file() {
            return Err(Error::InvalidConfig(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        figment = figment.merge(Toml::file(path));
    }
    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}
