use crate::{
    ids::IdError,
    utils::{format, hash},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// FunctionSignature
///
/// Canonical `name(type,type,...)` form of a function: no parameter names,
/// no whitespace. Whitespace next to parentheses and commas is dropped while
/// parsing; anything else (e.g. `transfer(address to)`) is rejected.
///

#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct FunctionSignature(String);

impl FunctionSignature {
    /// Reserved initializer; never part of a derived selector set.
    pub const INITIALIZER: &'static str = "init(bytes)";

    pub fn parse(s: &str) -> Result<Self, IdError> {
        let canonical = canonicalize(s).map_err(|reason| IdError::InvalidSignature {
            signature: s.to_string(),
            reason,
        })?;

        Ok(Self(canonical))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Function name without the parameter list.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.split_once('(').map_or(self.0.as_str(), |(name, _)| name)
    }

    #[must_use]
    pub fn is_initializer(&self) -> bool {
        self.0 == Self::INITIALIZER
    }

    #[must_use]
    pub fn selector(&self) -> Selector {
        Selector::from_signature(self)
    }
}

impl FromStr for FunctionSignature {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FunctionSignature {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<FunctionSignature> for String {
    fn from(sig: FunctionSignature) -> Self {
        sig.0
    }
}

impl AsRef<str> for FunctionSignature {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

///
/// Selector
///
/// First four bytes of keccak-256 over a canonical function signature; the
/// dispatch key a diamond proxy routes on.
///

#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector([u8; 4]);

impl Selector {
    pub const LEN: usize = 4;

    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn from_signature(signature: &FunctionSignature) -> Self {
        Self(hash::keccak256_prefix4(signature.as_str().as_bytes()))
    }

    /// Parse `signature` and derive its selector in one step.
    pub fn of(signature: &str) -> Result<Self, IdError> {
        FunctionSignature::parse(signature).map(|sig| Self::from_signature(&sig))
    }

    /// Parse a raw 4-byte selector, `0x` prefix optional.
    pub fn from_hex(s: &str) -> Result<Self, IdError> {
        s.parse()
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::hex_prefixed(&self.0))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({self})")
    }
}

impl FromStr for Selector {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        format::decode_hex_fixed::<4>(s)
            .map(Self)
            .map_err(|_| IdError::InvalidSelector(s.to_string()))
    }
}

impl TryFrom<String> for Selector {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

impl From<[u8; 4]> for Selector {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

//
// Canonicalization
//

fn canonicalize(raw: &str) -> Result<String, &'static str> {
    let raw = raw.trim();
    let mut out = String::with_capacity(raw.len());
    let mut gap = false;

    // a whitespace run may only sit after '(' / ',' or before '(' / ')' / ','
    for c in raw.chars() {
        if c.is_whitespace() {
            gap = true;
            continue;
        }

        if gap {
            let after_separator = matches!(out.chars().next_back(), Some('(' | ','));
            if !after_separator && !matches!(c, '(' | ')' | ',') {
                return Err("parameter names and inner whitespace are not allowed");
            }
            gap = false;
        }
        out.push(c);
    }

    validate_shape(&out)?;

    Ok(out)
}

fn validate_shape(sig: &str) -> Result<(), &'static str> {
    let open = sig.find('(').ok_or("missing '('")?;
    let (name, params) = sig.split_at(open);

    if !is_identifier(name) {
        return Err("function name is not a valid identifier");
    }
    if !params.ends_with(')') || params.len() < 2 {
        return Err("missing closing ')'");
    }

    let inner = &params[1..params.len() - 1];
    if !inner
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '[' | ']' | '(' | ')' | ','))
    {
        return Err("unexpected character in parameter list");
    }

    let mut depth = 0usize;
    let mut prev = '(';
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or("unbalanced parentheses")?,
            ',' if matches!(prev, '(' | ',') => return Err("empty parameter slot"),
            _ => {}
        }
        if c == ')' && prev == ',' {
            return Err("empty parameter slot");
        }
        prev = c;
    }

    if depth != 0 {
        return Err("unbalanced parentheses");
    }
    if prev == ',' {
        return Err("empty parameter slot");
    }

    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

///
/// TESTS
///
