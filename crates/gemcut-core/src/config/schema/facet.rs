use super::{ConfigSchemaError, Validate};
use crate::ids::FunctionSignature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

///
/// FacetConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FacetConfig {
    // declaration order is kept; it is the order selectors get added in
    #[serde(default)]
    pub signatures: Vec<String>,
}

impl FacetConfig {
    pub(crate) fn parsed_signatures(
        &self,
        facet: &str,
    ) -> Result<Vec<FunctionSignature>, ConfigSchemaError> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(self.signatures.len());

        for raw in &self.signatures {
            let signature = FunctionSignature::parse(raw).map_err(|e| {
                ConfigSchemaError::ValidationError(format!("facet '{facet}': {e}"))
            })?;

            if !seen.insert(signature.selector()) {
                return Err(ConfigSchemaError::ValidationError(format!(
                    "facet '{facet}' declares '{signature}' twice"
                )));
            }
            out.push(signature);
        }

        Ok(out)
    }
}

impl Validate for FacetConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        self.parsed_signatures("<unnamed>").map(|_| ())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn facet(sigs: &[&str]) -> FacetConfig {
        FacetConfig {
            signatures: sigs.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn accepts_well_formed_signatures() {
        facet(&["init(bytes)", "facets()", "facetAddress(bytes4)"])
            .validate()
            .unwrap();
    }

    #[test]
    fn rejects_malformed_signature() {
        assert!(facet(&["facets("]).validate().is_err());
    }

    #[test]
    fn rejects_signature_declared_twice() {
        let err = facet(&["owner()", "owner( )"]).validate().unwrap_err();
        assert!(err.to_string().contains("twice"));
    }
}
