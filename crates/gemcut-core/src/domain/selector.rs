//! Selector sets derived from a facet's exposed functions.
//!
//! Invariants:
//! - A `SelectorSet` never contains the same selector twice.
//! - A derived set never contains the `init(bytes)` initializer.
//! - Filtering preserves the relative order of retained selectors.

use crate::{
    Error, ThisError,
    domain::facet::Facet,
    ids::{Address, FunctionSignature, Selector},
    log,
    log::Topic,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

///
/// SelectorError
///

#[derive(Debug, ThisError)]
pub enum SelectorError {
    #[error("selector {selector} derived twice for facet {facet} ('{signature}')")]
    DuplicateSelector {
        facet: Address,
        selector: Selector,
        signature: String,
    },
}

///
/// FacetInterface
///
/// Anything that can enumerate the function signatures a facet exposes,
/// in declaration order.
///

pub trait FacetInterface {
    fn signatures(&self) -> Vec<String>;
}

///
/// FacetAbi
///
/// Named list of raw signatures; the shape facets take in config files.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FacetAbi {
    pub name: String,
    pub signatures: Vec<String>,
}

impl FacetAbi {
    pub fn new<I, S>(name: impl Into<String>, signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            signatures: signatures.into_iter().map(Into::into).collect(),
        }
    }
}

impl FacetInterface for FacetAbi {
    fn signatures(&self) -> Vec<String> {
        self.signatures.clone()
    }
}

///
/// SelectorSet
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectorSet {
    facet: Address,
    selectors: Vec<Selector>,
}

impl SelectorSet {
    /// Derive the selector set of `interface`, skipping the initializer.
    pub fn derive_from<F>(facet: Address, interface: &F) -> Result<Self, Error>
    where
        F: FacetInterface + ?Sized,
    {
        let mut selectors = Vec::new();
        let mut seen = BTreeSet::new();

        for raw in interface.signatures() {
            let signature = FunctionSignature::parse(&raw)?;
            if signature.is_initializer() {
                continue;
            }

            let selector = signature.selector();
            if !seen.insert(selector) {
                return Err(SelectorError::DuplicateSelector {
                    facet,
                    selector,
                    signature: signature.into(),
                }
                .into());
            }
            selectors.push(selector);
        }

        log!(
            Topic::Selector,
            Debug,
            "derived {} selectors for facet {facet}",
            selectors.len()
        );

        Ok(Self { facet, selectors })
    }

    /// Build a set from already-computed selectors, rejecting duplicates.
    pub fn from_selectors<I>(facet: Address, selectors: I) -> Result<Self, SelectorError>
    where
        I: IntoIterator<Item = Selector>,
    {
        let mut out = Vec::new();
        let mut seen = BTreeSet::new();

        for selector in selectors {
            if !seen.insert(selector) {
                return Err(SelectorError::DuplicateSelector {
                    facet,
                    selector,
                    signature: String::new(),
                });
            }
            out.push(selector);
        }

        Ok(Self {
            facet,
            selectors: out,
        })
    }

    #[must_use]
    pub const fn facet(&self) -> Address {
        self.facet
    }

    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    #[must_use]
    pub fn into_selectors(self) -> Vec<Selector> {
        self.selectors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    #[must_use]
    pub fn contains(&self, selector: Selector) -> bool {
        self.selectors.contains(&selector)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.selectors.iter()
    }

    /// Same selectors, tagged with a different facet (e.g. after redeploy).
    #[must_use]
    pub fn with_facet(self, facet: Address) -> Self {
        Self { facet, ..self }
    }

    /// Every selector whose signature is *not* listed.
    pub fn filter_excluding<I, S>(&self, signatures: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let listed = selectors_of(signatures)?;

        Ok(self.retain(|s| !listed.contains(s)))
    }

    /// Only the selectors whose signature is listed.
    pub fn filter_including<I, S>(&self, signatures: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let listed = selectors_of(signatures)?;

        Ok(self.retain(|s| listed.contains(s)))
    }

    fn retain(&self, keep: impl Fn(&Selector) -> bool) -> Self {
        Self {
            facet: self.facet,
            selectors: self.selectors.iter().copied().filter(|s| keep(s)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SelectorSet {
    type Item = &'a Selector;
    type IntoIter = std::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.selectors.iter()
    }
}

/// Drop from `selectors` every selector derived from one of `signatures`.
pub fn remove_selectors<I, S>(selectors: &[Selector], signatures: I) -> Result<Vec<Selector>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let listed = selectors_of(signatures)?;

    Ok(selectors
        .iter()
        .copied()
        .filter(|s| !listed.contains(s))
        .collect())
}

/// Position and address of the facet routing `selector`, if any.
/// An unrouted selector is a valid outcome, not an error.
#[must_use]
pub fn find_facet_for_selector(selector: Selector, facets: &[Facet]) -> Option<(usize, Address)> {
    facets
        .iter()
        .position(|facet| facet.selectors.contains(&selector))
        .map(|i| (i, facets[i].facet_address))
}

/// Position of `facet_address` within a loupe listing.
#[must_use]
pub fn find_facet_position(facet_address: Address, facets: &[Facet]) -> Option<usize> {
    facets
        .iter()
        .position(|facet| facet.facet_address == facet_address)
}

fn selectors_of<I, S>(signatures: I) -> Result<BTreeSet<Selector>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    signatures
        .into_iter()
        .map(|s| Selector::of(s.as_ref()).map_err(Error::from))
        .collect()
}

///
/// TESTS
///
