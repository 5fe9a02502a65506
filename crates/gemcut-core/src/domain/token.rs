//! Token metadata as the token service reports it.

use crate::ids::Address;
use serde::{Deserialize, Serialize};

///
/// TokenDefinition
/// What a caller supplies when creating a token.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TokenDefinition {
    pub name: String,
    pub symbol: String,
    pub treasury: Address,
    pub memo: String,

    // holders need an explicit KYC grant before they can receive
    pub kyc_required: bool,
}

impl TokenDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, treasury: Address) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            treasury,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    #[must_use]
    pub const fn with_kyc(mut self) -> Self {
        self.kyc_required = true;
        self
    }
}

///
/// TokenInfo
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TokenInfo {
    pub token: TokenDefinition,
    pub total_supply: i64,
}

///
/// FungibleTokenInfo
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct FungibleTokenInfo {
    pub token_info: TokenInfo,
    pub decimals: i32,
}

///
/// NonFungibleTokenInfo
/// One serial of an nft collection. `owner` is a long-zero account address.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NonFungibleTokenInfo {
    pub token_info: TokenInfo,
    pub serial_number: i64,
    pub owner: Address,
    pub metadata: Vec<u8>,
}

///
/// TESTS
///
