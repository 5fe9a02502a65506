//! Test utilities and fixtures for exercising gemcut.
//!
//! This crate is intended for host-side tests. It provides stable dummy
//! addresses, fresh registry fixtures and an in-memory token-service runtime
//! ([`mock::MockTokenService`]) that honours the all-or-nothing contract of
//! the real precompile.

pub mod mock;

pub use mock::{FIRST_CREATED_TOKEN_NUM, LedgerState, MockTokenService, TokenKind, TokenState};

use gemcut_core::{
    domain::selector::{FacetAbi, SelectorSet},
    ids::Address,
    model::registry::FacetRegistry,
};

///
/// Deterministic dummy-value generator for tests.
///
/// Produces stable addresses derived from a numeric seed, which makes tests
/// reproducible without hardcoding raw byte arrays.
///

pub struct Fake;

impl Fake {
    ///
    /// Deterministically derive a contract-style [`Address`] from `seed`.
    /// Never the zero address.
    ///
    #[must_use]
    pub fn address(seed: u32) -> Address {
        let mut buf = [0u8; 20];
        buf[0] = 0xfa;
        buf[16..].copy_from_slice(&seed.to_be_bytes());

        Address::new(buf)
    }

    ///
    /// Deterministically derive a long-zero account [`Address`] (`0.0.n`).
    /// Seeds start at 1001 so they never collide with system accounts.
    ///
    #[must_use]
    pub fn account(seed: u32) -> Address {
        Address::from_account_num(1_001 + u64::from(seed))
    }

    ///
    /// Deterministically derive a long-zero token [`Address`].
    ///
    #[must_use]
    pub fn token(seed: u32) -> Address {
        Address::from_account_num(500_000 + u64::from(seed))
    }
}

///
/// Fixtures
///

/// A registry with nothing installed. Each test builds its own.
#[must_use]
pub fn fresh_registry() -> FacetRegistry {
    FacetRegistry::new()
}

/// Derive and install one facet per `(address seed, abi)` pair.
pub fn registry_with(facets: &[(u32, FacetAbi)]) -> Result<FacetRegistry, gemcut_core::Error> {
    let registry = FacetRegistry::new();
    for (seed, abi) in facets {
        let set = SelectorSet::derive_from(Fake::address(*seed), abi)?;
        registry.install(&set)?;
    }

    Ok(registry)
}

///
/// TESTS
///
