//! Operations over the domain types: composing and submitting atomic
//! transfers, and the safe wrappers around single token-service calls.

pub mod token;
pub mod transfer;

pub use token::{
    CreateTokenResponse, InfoResponse, MintReceipt, MintResponse, SafeTokenOps,
    TOKEN_SERVICE_ADDRESS, TokenService,
};
pub use transfer::{TransferBuilder, TransferComposer};
