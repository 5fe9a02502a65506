//! FacetRegistry
//!
//! Authoritative routing table of a diamond: which facet serves which
//! selector.
//!
//! Invariants:
//! - A selector is owned by at most one facet.
//! - The forward map (facet → selectors) and reverse map (selector → facet)
//!   always agree; both live in one `FacetTable` behind one lock.
//! - A cut is validated in full before anything is applied; a rejected cut
//!   leaves the table untouched.
//! - A facet left with no selectors is dropped from the table.

use crate::{
    Error, ThisError,
    domain::facet::{Facet, FacetCut, FacetCutAction},
    domain::selector::SelectorSet,
    error::ErrorCode,
    ids::{Address, Selector},
    log,
    log::Topic,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, MutexGuard, PoisonError},
};

///
/// CutError
///

#[derive(Debug, ThisError)]
pub enum CutError {
    #[error("{action} cut has no selectors")]
    EmptyCut { action: FacetCutAction },

    #[error("selector {0} appears more than once in the cut")]
    DuplicateSelector(Selector),

    #[error("{action} cut cannot target the zero address")]
    ZeroFacetAddress { action: FacetCutAction },

    #[error("remove cut must target the zero address, got {0}")]
    RemoveFacetAddressNotZero(Address),

    #[error("selector {selector} is already routed to facet {facet}")]
    SelectorAlreadyExists { selector: Selector, facet: Address },

    #[error("selector {selector} is already routed to facet {facet}; replace would be a no-op")]
    NoOpReplace { selector: Selector, facet: Address },

    #[error("selector {0} is not routed")]
    SelectorNotFound(Selector),
}

impl CutError {
    pub(crate) const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyCut { .. }
            | Self::ZeroFacetAddress { .. }
            | Self::RemoveFacetAddressNotZero(_) => ErrorCode::InvalidInput,
            Self::DuplicateSelector(_)
            | Self::SelectorAlreadyExists { .. }
            | Self::NoOpReplace { .. } => ErrorCode::Conflict,
            Self::SelectorNotFound(_) => ErrorCode::NotFound,
        }
    }
}

///
/// RegistrySnapshot
/// Loupe-ordered copy of the whole table (for export / tests).
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RegistrySnapshot {
    pub facets: Vec<Facet>,
}

///
/// FacetTable
///
/// The single aggregate both routing maps live in. `cut` is the only
/// mutator and it checks the whole batch before touching either map.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct FacetTable {
    facets: IndexMap<Address, Vec<Selector>>,
    owners: BTreeMap<Selector, Address>,
}

impl FacetTable {
    pub(crate) fn owner(&self, selector: Selector) -> Option<Address> {
        self.owners.get(&selector).copied()
    }

    pub(crate) fn cut(&mut self, cut: &FacetCut) -> Result<(), CutError> {
        self.validate(cut)?;
        self.apply(cut);

        Ok(())
    }

    fn validate(&self, cut: &FacetCut) -> Result<(), CutError> {
        let FacetCut {
            facet_address,
            action,
            selectors,
        } = cut;
        let (facet_address, action) = (*facet_address, *action);

        if selectors.is_empty() {
            return Err(CutError::EmptyCut { action });
        }

        let mut seen = BTreeSet::new();
        if let Some(dup) = selectors.iter().find(|s| !seen.insert(**s)) {
            return Err(CutError::DuplicateSelector(*dup));
        }

        match action {
            FacetCutAction::Add | FacetCutAction::Replace if facet_address.is_zero() => {
                return Err(CutError::ZeroFacetAddress { action });
            }
            FacetCutAction::Remove if !facet_address.is_zero() => {
                return Err(CutError::RemoveFacetAddressNotZero(facet_address));
            }
            _ => {}
        }

        for &selector in selectors {
            match (action, self.owner(selector)) {
                (FacetCutAction::Add, Some(facet)) => {
                    return Err(CutError::SelectorAlreadyExists { selector, facet });
                }
                (FacetCutAction::Replace, Some(facet)) if facet == facet_address => {
                    return Err(CutError::NoOpReplace { selector, facet });
                }
                (FacetCutAction::Replace | FacetCutAction::Remove, None) => {
                    return Err(CutError::SelectorNotFound(selector));
                }
                _ => {}
            }
        }

        Ok(())
    }

    // Only called after `validate` accepted the same cut.
    fn apply(&mut self, cut: &FacetCut) {
        for &selector in &cut.selectors {
            if let Some(previous) = self.owners.remove(&selector) {
                self.detach(previous, selector);
            }

            if cut.action != FacetCutAction::Remove {
                self.owners.insert(selector, cut.facet_address);
                self.facets
                    .entry(cut.facet_address)
                    .or_default()
                    .push(selector);
            }
        }
    }

    fn detach(&mut self, facet: Address, selector: Selector) {
        let emptied = self.facets.get_mut(&facet).is_some_and(|list| {
            list.retain(|s| *s != selector);
            list.is_empty()
        });

        if emptied {
            self.facets.shift_remove(&facet);
        }
    }

    pub(crate) fn selectors_of(&self, facet: Address) -> Vec<Selector> {
        self.facets.get(&facet).cloned().unwrap_or_default()
    }

    pub(crate) fn facet_addresses(&self) -> Vec<Address> {
        self.facets.keys().copied().collect()
    }

    pub(crate) fn facets(&self) -> Vec<Facet> {
        self.facets
            .iter()
            .map(|(facet_address, selectors)| Facet {
                facet_address: *facet_address,
                selectors: selectors.clone(),
            })
            .collect()
    }

    pub(crate) fn selector_count(&self) -> usize {
        self.owners.len()
    }

    /// Rebuild a table from a snapshot by replaying it as add cuts, so the
    /// same checks apply.
    pub(crate) fn from_snapshot(snapshot: &RegistrySnapshot) -> Result<Self, CutError> {
        let mut table = Self::default();
        for facet in &snapshot.facets {
            table.cut(&FacetCut::new(
                facet.facet_address,
                FacetCutAction::Add,
                facet.selectors.clone(),
            ))?;
        }

        Ok(table)
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let forward: usize = self.facets.values().map(Vec::len).sum();

        forward == self.owners.len()
            && self.facets.values().all(|list| !list.is_empty())
            && self.facets.iter().all(|(facet, list)| {
                list.iter().all(|s| self.owners.get(s) == Some(facet))
            })
    }
}

///
/// FacetRegistry
///
/// Thread-safe facade over a `FacetTable`. Every public call takes the lock
/// exactly once, so concurrent cuts serialize and no reader can observe a
/// selector present in one map but not the other.
///

#[derive(Debug, Default)]
pub struct FacetRegistry {
    table: Mutex<FacetTable>,
}

impl FacetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Cuts validate before they mutate, so a table behind a poisoned lock is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, FacetTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    //
    // Cuts
    //

    /// Apply one cut. All-or-nothing over `selectors`.
    pub fn cut(
        &self,
        action: FacetCutAction,
        facet_address: Address,
        selectors: &[Selector],
    ) -> Result<(), Error> {
        self.cut_batch(&[FacetCut::new(facet_address, action, selectors.to_vec())])
    }

    /// Apply several cuts as one transaction. Later cuts see the effects of
    /// earlier ones; if any cut is rejected none of them take effect.
    pub fn cut_batch(&self, cuts: &[FacetCut]) -> Result<(), Error> {
        let mut table = self.lock();

        let result = if let [single] = cuts {
            table.cut(single)
        } else {
            let mut working = table.clone();
            cuts.iter()
                .try_for_each(|cut| working.cut(cut))
                .map(|()| *table = working)
        };
        drop(table);

        match result {
            Ok(()) => {
                for cut in cuts {
                    log!(
                        Topic::Cut,
                        Ok,
                        "{} {} selector(s) on facet {}",
                        cut.action,
                        cut.selectors.len(),
                        cut.facet_address
                    );
                }
                Ok(())
            }
            Err(err) => {
                log!(Topic::Cut, Warn, "cut rejected: {err}");
                Err(err.into())
            }
        }
    }

    /// Add every selector of a derived set to its facet.
    pub fn install(&self, set: &SelectorSet) -> Result<(), Error> {
        self.cut_batch(&[FacetCut::add(set)])
    }

    //
    // Loupe
    //

    /// Facet currently routing `selector`; `None` means unrouted.
    #[must_use]
    pub fn facet_address(&self, selector: Selector) -> Option<Address> {
        self.lock().owner(selector)
    }

    /// Selectors routed to `facet`, in the order they were added.
    #[must_use]
    pub fn facet_selectors(&self, facet: Address) -> Vec<Selector> {
        self.lock().selectors_of(facet)
    }

    /// Facet addresses in first-registration order.
    #[must_use]
    pub fn facet_addresses(&self) -> Vec<Address> {
        self.lock().facet_addresses()
    }

    #[must_use]
    pub fn facets(&self) -> Vec<Facet> {
        self.lock().facets()
    }

    #[must_use]
    pub fn selector_count(&self) -> usize {
        self.lock().selector_count()
    }

    //
    // Export / import
    //

    #[must_use]
    pub fn export(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            facets: self.facets(),
        }
    }

    /// Replace the whole table with `snapshot`. The snapshot must satisfy the
    /// same rules as a sequence of add cuts, otherwise nothing changes.
    pub fn import(&self, snapshot: &RegistrySnapshot) -> Result<(), Error> {
        let table = FacetTable::from_snapshot(snapshot)?;
        *self.lock() = table;

        log!(
            Topic::Registry,
            Info,
            "imported {} facet(s)",
            snapshot.facets.len()
        );

        Ok(())
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        self.lock().is_consistent()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn a(n: u64) -> Address {
        Address::from_account_num(n)
    }

    fn sel(sig: &str) -> Selector {
        Selector::of(sig).unwrap()
    }

    fn seeded() -> FacetRegistry {
        let registry = FacetRegistry::new();
        registry
            .cut(FacetCutAction::Add, a(1), &[sel("s1()"), sel("s2()")])
            .unwrap();
        registry
    }

    #[test]
    fn add_routes_selectors_in_order() {
        let registry = seeded();

        assert_eq!(registry.facet_address(sel("s1()")), Some(a(1)));
        assert_eq!(registry.facet_selectors(a(1)), vec![sel("s1()"), sel("s2()")]);
        assert_eq!(registry.facet_addresses(), vec![a(1)]);
        assert!(registry.is_consistent());
    }

    #[test]
    fn add_of_routed_selector_fails_without_change() {
        let registry = seeded();
        let before = registry.export();

        let err = registry
            .cut(FacetCutAction::Add, a(1), &[sel("s1()")])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Cut(CutError::SelectorAlreadyExists { facet, .. }) if facet == a(1)
        ));
        assert_eq!(registry.export(), before);
    }

    #[test]
    fn partially_valid_add_changes_nothing() {
        let registry = seeded();
        let before = registry.export();

        // s3 is new, s2 is taken: the whole call must fail
        assert!(
            registry
                .cut(FacetCutAction::Add, a(2), &[sel("s3()"), sel("s2()")])
                .is_err()
        );
        assert_eq!(registry.export(), before);
        assert_eq!(registry.facet_address(sel("s3()")), None);
    }

    #[test]
    fn replace_moves_selector_between_facets() {
        let registry = seeded();
        registry
            .cut(FacetCutAction::Replace, a(2), &[sel("s1()")])
            .unwrap();

        assert_eq!(registry.facet_address(sel("s1()")), Some(a(2)));
        assert_eq!(registry.facet_selectors(a(1)), vec![sel("s2()")]);
        assert_eq!(registry.facet_selectors(a(2)), vec![sel("s1()")]);
        assert!(registry.is_consistent());
    }

    #[test]
    fn replace_onto_same_facet_is_rejected() {
        let registry = seeded();
        let err = registry
            .cut(FacetCutAction::Replace, a(1), &[sel("s1()")])
            .unwrap_err();

        assert!(matches!(err, Error::Cut(CutError::NoOpReplace { .. })));
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[test]
    fn replace_of_unrouted_selector_is_not_found() {
        let registry = seeded();
        let err = registry
            .cut(FacetCutAction::Replace, a(2), &[sel("nope()")])
            .unwrap_err();

        assert!(matches!(err, Error::Cut(CutError::SelectorNotFound(_))));
    }

    #[test]
    fn replace_appends_in_destination_order() {
        let registry = seeded();
        registry
            .cut(FacetCutAction::Add, a(2), &[sel("s3()")])
            .unwrap();
        registry
            .cut(FacetCutAction::Replace, a(2), &[sel("s2()"), sel("s1()")])
            .unwrap();

        assert_eq!(
            registry.facet_selectors(a(2)),
            vec![sel("s3()"), sel("s2()"), sel("s1()")]
        );
        // a(1) lost its last selector and is gone from the loupe
        assert_eq!(registry.facet_addresses(), vec![a(2)]);
        assert!(registry.is_consistent());
    }

    #[test]
    fn remove_twice_fails_second_time() {
        let registry = seeded();
        registry
            .cut(FacetCutAction::Remove, Address::ZERO, &[sel("s1()")])
            .unwrap();

        assert_eq!(registry.facet_address(sel("s1()")), None);
        assert_eq!(registry.facet_selectors(a(1)), vec![sel("s2()")]);

        let err = registry
            .cut(FacetCutAction::Remove, Address::ZERO, &[sel("s1()")])
            .unwrap_err();
        assert!(matches!(err, Error::Cut(CutError::SelectorNotFound(s)) if s == sel("s1()")));
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn remove_requires_zero_address() {
        let registry = seeded();
        let err = registry
            .cut(FacetCutAction::Remove, a(1), &[sel("s1()")])
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Cut(CutError::RemoveFacetAddressNotZero(addr)) if addr == a(1)
        ));
        assert_eq!(registry.facet_address(sel("s1()")), Some(a(1)));
    }

    #[test]
    fn add_and_replace_reject_zero_address() {
        let registry = FacetRegistry::new();
        for action in [FacetCutAction::Add, FacetCutAction::Replace] {
            let err = registry
                .cut(action, Address::ZERO, &[sel("s1()")])
                .unwrap_err();
            assert!(matches!(err, Error::Cut(CutError::ZeroFacetAddress { .. })));
        }
    }

    #[test]
    fn empty_and_self_duplicated_cuts_are_rejected() {
        let registry = FacetRegistry::new();

        assert!(matches!(
            registry.cut(FacetCutAction::Add, a(1), &[]),
            Err(Error::Cut(CutError::EmptyCut { .. }))
        ));
        assert!(matches!(
            registry.cut(FacetCutAction::Add, a(1), &[sel("s1()"), sel("s1()")]),
            Err(Error::Cut(CutError::DuplicateSelector(_)))
        ));
        assert_eq!(registry.selector_count(), 0);
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let registry = seeded();
        let before = registry.export();

        let cuts = [
            FacetCut::new(a(2), FacetCutAction::Add, vec![sel("s3()")]),
            FacetCut::new(a(2), FacetCutAction::Replace, vec![sel("s1()")]),
            // s9 was never added
            FacetCut::remove(vec![sel("s9()")]),
        ];
        assert!(registry.cut_batch(&cuts).is_err());
        assert_eq!(registry.export(), before);
    }

    #[test]
    fn batch_later_cuts_see_earlier_ones() {
        let registry = FacetRegistry::new();
        let cuts = [
            FacetCut::new(a(1), FacetCutAction::Add, vec![sel("s1()"), sel("s2()")]),
            FacetCut::new(a(2), FacetCutAction::Replace, vec![sel("s2()")]),
            FacetCut::remove(vec![sel("s1()")]),
        ];
        registry.cut_batch(&cuts).unwrap();

        assert_eq!(registry.facet_addresses(), vec![a(2)]);
        assert_eq!(registry.facet_selectors(a(2)), vec![sel("s2()")]);
        assert!(registry.is_consistent());
    }

    #[test]
    fn import_rejects_overlapping_snapshot() {
        let registry = seeded();
        let before = registry.export();

        let bad = RegistrySnapshot {
            facets: vec![
                Facet {
                    facet_address: a(5),
                    selectors: vec![sel("x()")],
                },
                Facet {
                    facet_address: a(6),
                    selectors: vec![sel("x()")],
                },
            ],
        };
        assert!(registry.import(&bad).is_err());
        assert_eq!(registry.export(), before);
    }

    #[test]
    fn export_import_round_trip() {
        let registry = seeded();
        registry
            .cut(FacetCutAction::Add, a(2), &[sel("s3()")])
            .unwrap();
        let snapshot = registry.export();

        let copy = FacetRegistry::new();
        copy.import(&snapshot).unwrap();
        assert_eq!(copy.export(), snapshot);
        assert!(copy.is_consistent());
    }

    #[test]
    fn concurrent_cuts_keep_ownership_exclusive() {
        use std::{sync::Arc, thread};

        let registry = Arc::new(FacetRegistry::new());
        let shared: Vec<Selector> = (0..32).map(|i| sel(&format!("f{i}()"))).collect();

        let handles: Vec<_> = (1..=8u64)
            .map(|n| {
                let registry = Arc::clone(&registry);
                let shared = shared.clone();
                thread::spawn(move || {
                    for s in &shared {
                        let _ = registry.cut(FacetCutAction::Add, a(n), &[*s]);
                        let _ = registry.cut(FacetCutAction::Replace, a(n), &[*s]);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(registry.selector_count(), shared.len());
        assert!(registry.is_consistent());
    }
}
