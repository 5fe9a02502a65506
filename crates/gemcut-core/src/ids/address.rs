use crate::{ids::IdError, utils::format};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// Address
///
/// A 20-byte account or contract address.
///
/// `Address::ZERO` doubles as the "null" facet address required by remove
/// cuts. Accounts on the token-service network also have a "long-zero" form
/// where the account number occupies the trailing eight bytes.
///

#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    pub const LEN: usize = 20;
    pub const ZERO: Self = Self([0; 20]);

    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Long-zero address for shard 0, realm 0 account `num` (`0.0.num`).
    #[must_use]
    pub const fn from_account_num(num: u64) -> Self {
        let num = num.to_be_bytes();
        let mut bytes = [0u8; 20];
        let mut i = 0;
        while i < 8 {
            bytes[12 + i] = num[i];
            i += 1;
        }

        Self(bytes)
    }

    /// Returns the account number if this is a long-zero address.
    #[must_use]
    pub fn account_num(&self) -> Option<u64> {
        let (prefix, tail) = self.0.split_at(12);
        if prefix.iter().any(|b| *b != 0) {
            return None;
        }

        let mut num = [0u8; 8];
        num.copy_from_slice(tail);

        Some(u64::from_be_bytes(num))
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::hex_prefixed(&self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        format::decode_hex_fixed::<20>(s)
            .map(Self)
            .map_err(|_| IdError::InvalidAddress(s.to_string()))
    }
}

impl TryFrom<String> for Address {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

///
/// TESTS
///
