//! Core gemcut library: diamond facet-selector routing and safe calls into
//! the token-service precompile.
//!
//! ## Layering
//!
//! - `ids/` holds the value types everything else is keyed by (addresses,
//!   signatures, selectors).
//! - `domain/` owns pure rules: selector-set derivation, cut actions,
//!   response codes and the transfer conservation checks.
//! - `model/` owns in-process state: the facet registry and the log buffer.
//! - `ops/` performs calls against the token service.
//! - `config/` loads and validates the TOML config.
//!
//! The default flow is: config → domain → model, and domain → ops for
//! anything that leaves the process.

pub mod config;
pub mod domain;
pub mod dto;
pub mod error;
pub mod ids;
pub mod log;
pub mod model;
pub mod ops;
#[cfg(test)]
pub mod test;

pub use ::gemcut_utils as utils;

pub use error::{Error, ErrorCode};

pub(crate) use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error, ErrorCode,
        domain::{
            facet::{Facet, FacetCut, FacetCutAction},
            response::{PrecompileError, ResponseCode, ResponseGate},
            selector::{FacetAbi, FacetInterface, SelectorSet},
            token::{FungibleTokenInfo, NonFungibleTokenInfo, TokenDefinition, TokenInfo},
            transfer::{
                AccountAmount, NftTransfer, TokenTransferList, TransferInstruction, TransferList,
            },
        },
        ids::{Address, FunctionSignature, Selector},
        model::registry::FacetRegistry,
        ops::{SafeTokenOps, TokenService, TransferBuilder, TransferComposer},
    };
}

///
/// Crate Version
///

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse, validate and install the process-wide config.
pub fn init_config(toml: &str) -> Result<std::sync::Arc<config::ConfigModel>, Error> {
    config::Config::init_from_toml(toml).map_err(Error::from)
}
