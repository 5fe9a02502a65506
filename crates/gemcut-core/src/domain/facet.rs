use crate::{
    domain::selector::SelectorSet,
    ids::{Address, Selector},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// FacetCutAction
///
/// The only mutations a cut may perform. Discriminants match the proxy ABI
/// (`enum FacetCutAction { Add, Replace, Remove }`).
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[repr(u8)]
pub enum FacetCutAction {
    Add = 0,
    Replace = 1,
    Remove = 2,
}

impl TryFrom<u8> for FacetCutAction {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Add),
            1 => Ok(Self::Replace),
            2 => Ok(Self::Remove),
            other => Err(other),
        }
    }
}

impl From<FacetCutAction> for u8 {
    fn from(action: FacetCutAction) -> Self {
        action as Self
    }
}

///
/// FacetCut
///

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct FacetCut {
    pub facet_address: Address,
    pub action: FacetCutAction,
    pub selectors: Vec<Selector>,
}

impl FacetCut {
    #[must_use]
    pub const fn new(
        facet_address: Address,
        action: FacetCutAction,
        selectors: Vec<Selector>,
    ) -> Self {
        Self {
            facet_address,
            action,
            selectors,
        }
    }

    /// Add every selector of `set` to its own facet.
    #[must_use]
    pub fn add(set: &SelectorSet) -> Self {
        Self::new(set.facet(), FacetCutAction::Add, set.selectors().to_vec())
    }

    /// Route every selector of `set` to its own facet, taking them from
    /// whichever facet owns them today.
    #[must_use]
    pub fn replace(set: &SelectorSet) -> Self {
        Self::new(set.facet(), FacetCutAction::Replace, set.selectors().to_vec())
    }

    /// Unroute `selectors`; remove cuts always target the zero address.
    #[must_use]
    pub const fn remove(selectors: Vec<Selector>) -> Self {
        Self::new(Address::ZERO, FacetCutAction::Remove, selectors)
    }
}

///
/// Facet
/// Loupe view of one facet and the selectors it currently routes.
///

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Facet {
    pub facet_address: Address,
    pub selectors: Vec<Selector>,
}

///
/// TESTS
///
