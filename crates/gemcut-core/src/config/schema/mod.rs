mod facet;
mod log;

pub use facet::*;
pub use log::*;

use crate::{
    ThisError,
    domain::selector::FacetAbi,
    ids::{FunctionSignature, Selector},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// ConfigSchemaError
///

#[derive(Debug, ThisError)]
pub enum ConfigSchemaError {
    #[error("validation error: {0}")]
    ValidationError(String),
}

pub const NAME_MAX_BYTES: usize = 40;

///
/// Validate
///

pub trait Validate {
    fn validate(&self) -> Result<(), ConfigSchemaError>;
}

///
/// ConfigModel
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigModel {
    #[serde(default)]
    pub log: LogConfig,

    // keyed by facet name; BTreeMap keeps the rendered TOML stable
    #[serde(default)]
    pub facets: BTreeMap<String, FacetConfig>,
}

impl ConfigModel {
    /// Configured facets as ABIs ready for selector derivation.
    #[must_use]
    pub fn facet_abis(&self) -> Vec<FacetAbi> {
        self.facets
            .iter()
            .map(|(name, facet)| FacetAbi::new(name.clone(), facet.signatures.iter().cloned()))
            .collect()
    }

    #[must_use]
    pub fn facet_abi(&self, name: &str) -> Option<FacetAbi> {
        self.facets
            .get(name)
            .map(|facet| FacetAbi::new(name, facet.signatures.iter().cloned()))
    }
}

impl Validate for ConfigModel {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        self.log.validate()?;

        // no selector may be claimed by two facets; the initializer is
        // excluded from routing so every facet may declare it
        let mut claimed: BTreeMap<Selector, (&str, FunctionSignature)> = BTreeMap::new();

        for (name, facet) in &self.facets {
            if name.len() > NAME_MAX_BYTES {
                return Err(ConfigSchemaError::ValidationError(format!(
                    "facet '{name}' exceeds {NAME_MAX_BYTES} bytes",
                )));
            }

            for signature in facet.parsed_signatures(name)? {
                if signature.is_initializer() {
                    continue;
                }

                let selector = signature.selector();
                if let Some((other, other_sig)) = claimed.get(&selector) {
                    return Err(ConfigSchemaError::ValidationError(format!(
                        "selector {selector} of '{signature}' in facet '{name}' collides with \
                         '{other_sig}' in facet '{other}'",
                    )));
                }
                claimed.insert(selector, (name.as_str(), signature));
            }
        }

        Ok(())
    }
}

///
/// TESTS
///
