use crate::{
    ThisError,
    config::ConfigError,
    domain::{
        response::PrecompileError, selector::SelectorError, transfer::TransferError,
    },
    ids::IdError,
    model::registry::CutError,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Error
///
/// Crate-wide error. Every variant except `Precompile` is a local validation
/// failure raised before any state is touched; the caller fixes its input and
/// retries. `Precompile` carries the external runtime's code verbatim and is
/// never retried here.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cut(#[from] CutError),

    #[error(transparent)]
    Id(#[from] IdError),

    #[error(transparent)]
    Precompile(#[from] PrecompileError),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl Error {
    /// Coarse classification for callers that map errors onto their own
    /// envelope (HTTP status, RPC code, revert reason).
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Config(ConfigError::AlreadyInitialized) => ErrorCode::Conflict,
            Self::Config(ConfigError::NotInitialized) => ErrorCode::NotFound,
            Self::Config(_) | Self::Id(_) => ErrorCode::InvalidInput,
            Self::Cut(err) => err.code(),
            Self::Precompile(_) => ErrorCode::Precompile,
            Self::Selector(SelectorError::DuplicateSelector { .. }) => ErrorCode::Conflict,
            Self::Transfer(err) => err.code(),
        }
    }

    /// Response code reported by the token service, if this is a precompile failure.
    #[must_use]
    pub const fn response_code(&self) -> Option<i64> {
        match self {
            Self::Precompile(err) => Some(err.code.get()),
            _ => None,
        }
    }
}

///
/// ErrorCode
///

#[derive(Clone, Copy, Debug, Display, Deserialize, Eq, PartialEq, Serialize)]
#[non_exhaustive]
#[remain::sorted]
pub enum ErrorCode {
    Conflict,
    InvalidInput,
    NotFound,
    Precompile,
}

///
/// TESTS
///
