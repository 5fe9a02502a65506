pub mod schema;

use crate::{ThisError, log, log::Topic};
use schema::{ConfigSchemaError, Validate};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use schema::ConfigModel;

//
// CONFIG
//
// Installed once per process. Held as Arc so readers can keep a consistent
// view while a test resets and reinstalls it.
//

static CONFIG: Mutex<Option<Arc<ConfigModel>>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Arc<ConfigModel>>> {
    CONFIG.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Errors related to configuration lifecycle and parsing.
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config has already been initialized")]
    AlreadyInitialized,

    #[error("config has not been initialized")]
    NotInitialized,

    /// TOML could not be parsed into the expected structure.
    #[error("toml error: {0}")]
    CannotParseToml(String),

    /// Wrapper for data schema-level errors.
    #[error(transparent)]
    ConfigSchema(#[from] ConfigSchemaError),
}

///
/// Config
///

pub struct Config {}

impl Config {
    pub fn get() -> Result<Arc<ConfigModel>, ConfigError> {
        Self::try_get().ok_or(ConfigError::NotInitialized)
    }

    #[must_use]
    pub fn try_get() -> Option<Arc<ConfigModel>> {
        slot().clone()
    }

    /// Parse and validate a TOML document without installing it.
    pub fn parse_toml(config_str: &str) -> Result<ConfigModel, ConfigError> {
        let config: ConfigModel =
            toml::from_str(config_str).map_err(|e| ConfigError::CannotParseToml(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Initialize the global configuration from a TOML string.
    pub fn init_from_toml(config_str: &str) -> Result<Arc<ConfigModel>, ConfigError> {
        let config = Self::parse_toml(config_str)?;

        Self::install(config)
    }

    /// Initialize the global configuration from an in-memory model.
    pub fn init_from_model(config: ConfigModel) -> Result<Arc<ConfigModel>, ConfigError> {
        config.validate()?;

        Self::install(config)
    }

    fn install(config: ConfigModel) -> Result<Arc<ConfigModel>, ConfigError> {
        let arc = {
            let mut slot = slot();
            if slot.is_some() {
                return Err(ConfigError::AlreadyInitialized);
            }

            let arc = Arc::new(config);
            *slot = Some(Arc::clone(&arc));
            arc
        };

        log!(
            Topic::Config,
            Info,
            "config installed with {} facet(s)",
            arc.facets.len()
        );

        Ok(arc)
    }

    /// Return the current config as a TOML string.
    pub fn to_toml() -> Result<String, ConfigError> {
        let cfg = Self::get()?;

        toml::to_string_pretty(&*cfg).map_err(|e| ConfigError::CannotParseToml(e.to_string()))
    }

    /// Drop the installed config so a fresh one can be installed.
    pub fn reset() {
        *slot() = None;
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::seams;

    const TOML: &str = r#"
        [log]
        max_entries = 500
        echo = false

        [facets.ERC20Facet]
        signatures = ["init(bytes)", "transfer(address,uint256)", "balanceOf(address)"]

        [facets.OwnershipFacet]
        signatures = ["owner()", "transferOwnership(address)"]
    "#;

    #[test]
    fn init_get_reset_cycle() {
        let _guard = seams::lock();
        Config::reset();

        assert!(matches!(Config::get(), Err(ConfigError::NotInitialized)));

        let cfg = Config::init_from_toml(TOML).unwrap();
        assert_eq!(cfg.log.max_entries, 500);
        assert_eq!(cfg.facets.len(), 2);

        assert!(matches!(
            Config::init_from_toml(TOML),
            Err(ConfigError::AlreadyInitialized)
        ));

        let rendered = Config::to_toml().unwrap();
        let reparsed = Config::parse_toml(&rendered).unwrap();
        assert_eq!(reparsed.facets, cfg.facets);

        Config::reset();
        assert!(Config::try_get().is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::parse_toml("[log]\nmax_entires = 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::CannotParseToml(_)));
    }

    #[test]
    fn schema_errors_surface_through_parse() {
        let err = Config::parse_toml("[facets.Broken]\nsignatures = [\"foo(\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigSchema(_)));
    }
}
