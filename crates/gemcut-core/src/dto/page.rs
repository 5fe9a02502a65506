use serde::{Deserialize, Serialize};

///
/// Page
/// Generic pagination envelope
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub total: u64,
}

///
/// PageRequest
/// Pagination envelope to avoid passing raw integers around
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
}

impl PageRequest {
    pub const MAX_LIMIT: u64 = 1_000;
    pub const DEFAULT: Self = Self {
        limit: 50,
        offset: 0,
    };

    #[must_use]
    pub const fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.min(Self::MAX_LIMIT),
            offset: self.offset,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::DEFAULT
    }
}

///
/// TESTS
///
