//! Transfer instruction types and the checks a composed instruction must pass.
//!
//! Invariants enforced before anything leaves the process:
//! - native amounts sum to zero
//! - each token's fungible amounts sum to zero
//! - a `(token, serial)` pair moves at most once per instruction

use crate::{ThisError, error::ErrorCode, ids::Address};
use std::collections::BTreeSet;

///
/// TransferError
///

#[derive(Debug, ThisError)]
pub enum TransferError {
    #[error("amount {amount} has no opposite leg (must be greater than i64::MIN)")]
    InvalidAmount { amount: i64 },

    #[error("{} transfers do not balance (net {imbalance})", asset_label(.token))]
    UnbalancedTransfer {
        token: Option<Address>,
        imbalance: i128,
    },

    #[error("nft {token} serial {serial_number} is moved more than once")]
    DuplicateAssetMove { token: Address, serial_number: i64 },
}

impl TransferError {
    pub(crate) const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidAmount { .. } | Self::UnbalancedTransfer { .. } => ErrorCode::InvalidInput,
            Self::DuplicateAssetMove { .. } => ErrorCode::Conflict,
        }
    }
}

fn asset_label(token: &Option<Address>) -> String {
    token.map_or_else(|| "native".to_string(), |t| format!("token {t}"))
}

///
/// AccountAmount
/// Signed amount credited to (positive) or debited from (negative) an account.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AccountAmount {
    pub account: Address,
    pub amount: i64,
}

impl AccountAmount {
    #[must_use]
    pub const fn new(account: Address, amount: i64) -> Self {
        Self { account, amount }
    }
}

///
/// TransferList
/// Native-currency leg of an instruction.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TransferList {
    pub transfers: Vec<AccountAmount>,
}

impl TransferList {
    #[must_use]
    pub const fn new(transfers: Vec<AccountAmount>) -> Self {
        Self { transfers }
    }
}

///
/// NftTransfer
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NftTransfer {
    pub sender: Address,
    pub receiver: Address,
    pub serial_number: i64,
}

///
/// TokenTransferList
/// All movements of one token: fungible amounts and/or nft serials.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenTransferList {
    pub token: Address,
    pub transfers: Vec<AccountAmount>,
    pub nft_transfers: Vec<NftTransfer>,
}

impl TokenTransferList {
    #[must_use]
    pub const fn new(token: Address) -> Self {
        Self {
            token,
            transfers: Vec::new(),
            nft_transfers: Vec::new(),
        }
    }
}

///
/// TransferInstruction
///
/// A validated, single-use request. Only the composer can build one and
/// submitting consumes it, so the same instruction cannot be sent twice.
///

#[derive(Debug, Eq, PartialEq)]
pub struct TransferInstruction {
    native: TransferList,
    tokens: Vec<TokenTransferList>,
}

impl TransferInstruction {
    pub(crate) const fn new(native: TransferList, tokens: Vec<TokenTransferList>) -> Self {
        Self { native, tokens }
    }

    #[must_use]
    pub const fn native(&self) -> &TransferList {
        &self.native
    }

    #[must_use]
    pub fn tokens(&self) -> &[TokenTransferList] {
        &self.tokens
    }

    #[must_use]
    pub fn nft_move_count(&self) -> usize {
        self.tokens.iter().map(|t| t.nft_transfers.len()).sum()
    }

    #[must_use]
    pub fn fungible_move_count(&self) -> usize {
        self.tokens.iter().map(|t| t.transfers.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.native.transfers.is_empty()
            && self
                .tokens
                .iter()
                .all(|t| t.transfers.is_empty() && t.nft_transfers.is_empty())
    }
}

//
// Checks
//

pub(crate) fn check_balanced(
    token: Option<Address>,
    transfers: &[AccountAmount],
) -> Result<(), TransferError> {
    let imbalance: i128 = transfers.iter().map(|t| i128::from(t.amount)).sum();

    if imbalance == 0 {
        Ok(())
    } else {
        Err(TransferError::UnbalancedTransfer { token, imbalance })
    }
}

pub(crate) fn check_unique_nft_moves(tokens: &[TokenTransferList]) -> Result<(), TransferError> {
    let mut seen = BTreeSet::new();

    for list in tokens {
        for nft in &list.nft_transfers {
            if !seen.insert((list.token, nft.serial_number)) {
                return Err(TransferError::DuplicateAssetMove {
                    token: list.token,
                    serial_number: nft.serial_number,
                });
            }
        }
    }

    Ok(())
}

///
/// TESTS
///
