//! Token-service response codes and the gate that turns them into results.
//!
//! The gate only distinguishes SUCCESS from everything else. Every other code
//! is surfaced verbatim; mapping codes to remedies (retry, re-associate, top
//! up) is the caller's call.

use crate::ThisError;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ResponseCode
///

#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ResponseCode(i64);

impl ResponseCode {
    pub const SUCCESS: Self = Self(22);

    pub const INVALID_ACCOUNT_ID: Self = Self(15);
    pub const INSUFFICIENT_ACCOUNT_BALANCE: Self = Self(28);
    pub const INVALID_ACCOUNT_AMOUNTS: Self = Self(48);
    pub const INVALID_TOKEN_ID: Self = Self(167);
    pub const INVALID_TOKEN_DECIMALS: Self = Self(168);
    pub const INVALID_TOKEN_INITIAL_SUPPLY: Self = Self(169);
    pub const INVALID_TREASURY_ACCOUNT_FOR_TOKEN: Self = Self(170);
    pub const MISSING_TOKEN_SYMBOL: Self = Self(174);
    pub const ACCOUNT_KYC_NOT_GRANTED_FOR_TOKEN: Self = Self(176);
    pub const INSUFFICIENT_TOKEN_BALANCE: Self = Self(178);
    pub const TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN: Self = Self(173);
    pub const TOKEN_HAS_NO_KYC_KEY: Self = Self(177);
    pub const INVALID_TOKEN_MINT_AMOUNT: Self = Self(182);
    pub const TOKEN_NOT_ASSOCIATED_TO_ACCOUNT: Self = Self(184);
    pub const TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT: Self = Self(194);
    pub const INVALID_NFT_ID: Self = Self(226);
    pub const SENDER_DOES_NOT_OWN_NFT_SERIAL_NO: Self = Self(237);

    #[must_use]
    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Symbolic name for the codes this crate knows about; for log output only.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            15 => "INVALID_ACCOUNT_ID",
            22 => "SUCCESS",
            28 => "INSUFFICIENT_ACCOUNT_BALANCE",
            48 => "INVALID_ACCOUNT_AMOUNTS",
            167 => "INVALID_TOKEN_ID",
            168 => "INVALID_TOKEN_DECIMALS",
            169 => "INVALID_TOKEN_INITIAL_SUPPLY",
            170 => "INVALID_TREASURY_ACCOUNT_FOR_TOKEN",
            173 => "TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN",
            174 => "MISSING_TOKEN_SYMBOL",
            176 => "ACCOUNT_KYC_NOT_GRANTED_FOR_TOKEN",
            177 => "TOKEN_HAS_NO_KYC_KEY",
            178 => "INSUFFICIENT_TOKEN_BALANCE",
            182 => "INVALID_TOKEN_MINT_AMOUNT",
            184 => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
            194 => "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT",
            226 => "INVALID_NFT_ID",
            237 => "SENDER_DOES_NOT_OWN_NFT_SERIAL_NO",
            _ => return None,
        };

        Some(name)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({name})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

impl fmt::Debug for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResponseCode({self})")
    }
}

impl From<i64> for ResponseCode {
    fn from(code: i64) -> Self {
        Self(code)
    }
}

impl From<i32> for ResponseCode {
    fn from(code: i32) -> Self {
        Self(i64::from(code))
    }
}

///
/// PrecompileError
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error("token service call failed with response code {code}")]
pub struct PrecompileError {
    pub code: ResponseCode,
}

///
/// ResponseGate
///

pub struct ResponseGate;

impl ResponseGate {
    pub const SUCCESS_SENTINEL: ResponseCode = ResponseCode::SUCCESS;

    /// `Ok(())` on the success sentinel, otherwise the code as an error.
    pub const fn interpret(code: ResponseCode) -> Result<(), PrecompileError> {
        if code.is_success() {
            Ok(())
        } else {
            Err(PrecompileError { code })
        }
    }
}

///
/// TESTS
///
