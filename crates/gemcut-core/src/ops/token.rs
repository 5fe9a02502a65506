//! The token-service collaborator and the safe wrappers around it.
//!
//! Every wrapper makes exactly one call and runs the returned code through
//! the response gate. Nothing here retries.

use crate::{
    Error,
    domain::{
        response::{ResponseCode, ResponseGate},
        token::{FungibleTokenInfo, NonFungibleTokenInfo, TokenDefinition, TokenInfo},
        transfer::TransferInstruction,
    },
    ids::Address,
    log,
    log::Topic,
    ops::transfer::TransferComposer,
};
use async_trait::async_trait;

/// System contract address of the token-service precompile (0.0.359).
pub const TOKEN_SERVICE_ADDRESS: Address = Address::from_account_num(0x167);

///
/// MintResponse
/// Raw mint result as the runtime reports it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintResponse {
    pub response_code: ResponseCode,
    pub new_total_supply: i64,
    pub serial_numbers: Vec<i64>,
}

impl MintResponse {
    #[must_use]
    pub const fn failed(response_code: ResponseCode) -> Self {
        Self {
            response_code,
            new_total_supply: 0,
            serial_numbers: Vec::new(),
        }
    }
}

///
/// MintReceipt
/// Mint payload once the response code has passed the gate.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintReceipt {
    pub new_total_supply: i64,
    pub serial_numbers: Vec<i64>,
}

///
/// CreateTokenResponse
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateTokenResponse {
    pub response_code: ResponseCode,
    pub token_address: Address,
}

impl CreateTokenResponse {
    #[must_use]
    pub const fn failed(response_code: ResponseCode) -> Self {
        Self {
            response_code,
            token_address: Address::ZERO,
        }
    }
}

///
/// InfoResponse
/// Raw info-query result; `info` is only meaningful on success.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InfoResponse<T> {
    pub response_code: ResponseCode,
    pub info: T,
}

impl<T: Default> InfoResponse<T> {
    #[must_use]
    pub fn failed(response_code: ResponseCode) -> Self {
        Self {
            response_code,
            info: T::default(),
        }
    }
}

///
/// TokenService
///
/// One method per precompile call. Implementations report the runtime's
/// response code verbatim and must not interpret it.
///

#[async_trait]
pub trait TokenService: Send + Sync {
    /// Apply every move of `instruction` or none of them.
    async fn crypto_transfer(&self, instruction: &TransferInstruction) -> ResponseCode;

    async fn transfer_token(
        &self,
        token: Address,
        sender: Address,
        receiver: Address,
        amount: i64,
    ) -> ResponseCode;

    async fn transfer_nft(
        &self,
        token: Address,
        sender: Address,
        receiver: Address,
        serial_number: i64,
    ) -> ResponseCode;

    /// Fungible tokens mint `amount`; nft mints create one serial per
    /// metadata entry and ignore `amount`.
    async fn mint_token(
        &self,
        token: Address,
        amount: i64,
        metadata: &[Vec<u8>],
    ) -> MintResponse;

    async fn associate_token(&self, account: Address, token: Address) -> ResponseCode;

    async fn grant_token_kyc(&self, token: Address, account: Address) -> ResponseCode;

    /// The treasury receives `initial_supply` and is associated with the
    /// new token.
    async fn create_fungible_token(
        &self,
        token: &TokenDefinition,
        initial_supply: i64,
        decimals: i32,
    ) -> CreateTokenResponse;

    async fn create_non_fungible_token(&self, token: &TokenDefinition) -> CreateTokenResponse;

    async fn get_token_info(&self, token: Address) -> InfoResponse<TokenInfo>;

    async fn get_fungible_token_info(&self, token: Address) -> InfoResponse<FungibleTokenInfo>;

    async fn get_non_fungible_token_info(
        &self,
        token: Address,
        serial_number: i64,
    ) -> InfoResponse<NonFungibleTokenInfo>;
}

///
/// SafeTokenOps
///

pub struct SafeTokenOps;

impl SafeTokenOps {
    pub async fn crypto_transfer<S>(
        service: &S,
        instruction: TransferInstruction,
    ) -> Result<(), Error>
    where
        S: TokenService + ?Sized,
    {
        TransferComposer::submit(service, instruction).await
    }

    pub async fn transfer_token<S>(
        service: &S,
        token: Address,
        sender: Address,
        receiver: Address,
        amount: i64,
    ) -> Result<(), Error>
    where
        S: TokenService + ?Sized,
    {
        let code = service
            .transfer_token(token, sender, receiver, amount)
            .await;

        gate("transfer_token", code)
    }

    pub async fn transfer_nft<S>(
        service: &S,
        token: Address,
        sender: Address,
        receiver: Address,
        serial_number: i64,
    ) -> Result<(), Error>
    where
        S: TokenService + ?Sized,
    {
        let code = service
            .transfer_nft(token, sender, receiver, serial_number)
            .await;

        gate("transfer_nft", code)
    }

    pub async fn mint_token<S>(
        service: &S,
        token: Address,
        amount: i64,
        metadata: &[Vec<u8>],
    ) -> Result<MintReceipt, Error>
    where
        S: TokenService + ?Sized,
    {
        let response = service.mint_token(token, amount, metadata).await;
        gate("mint_token", response.response_code)?;

        Ok(MintReceipt {
            new_total_supply: response.new_total_supply,
            serial_numbers: response.serial_numbers,
        })
    }

    pub async fn associate_token<S>(
        service: &S,
        account: Address,
        token: Address,
    ) -> Result<(), Error>
    where
        S: TokenService + ?Sized,
    {
        let code = service.associate_token(account, token).await;

        gate("associate_token", code)
    }

    pub async fn grant_token_kyc<S>(
        service: &S,
        token: Address,
        account: Address,
    ) -> Result<(), Error>
    where
        S: TokenService + ?Sized,
    {
        let code = service.grant_token_kyc(token, account).await;

        gate("grant_token_kyc", code)
    }

    /// Returns the address of the new token.
    pub async fn create_fungible_token<S>(
        service: &S,
        token: &TokenDefinition,
        initial_supply: i64,
        decimals: i32,
    ) -> Result<Address, Error>
    where
        S: TokenService + ?Sized,
    {
        let response = service
            .create_fungible_token(token, initial_supply, decimals)
            .await;
        gate("create_fungible_token", response.response_code)?;

        Ok(response.token_address)
    }

    pub async fn create_non_fungible_token<S>(
        service: &S,
        token: &TokenDefinition,
    ) -> Result<Address, Error>
    where
        S: TokenService + ?Sized,
    {
        let response = service.create_non_fungible_token(token).await;
        gate("create_non_fungible_token", response.response_code)?;

        Ok(response.token_address)
    }

    pub async fn get_token_info<S>(service: &S, token: Address) -> Result<TokenInfo, Error>
    where
        S: TokenService + ?Sized,
    {
        let response = service.get_token_info(token).await;
        gate("get_token_info", response.response_code)?;

        Ok(response.info)
    }

    pub async fn get_fungible_token_info<S>(
        service: &S,
        token: Address,
    ) -> Result<FungibleTokenInfo, Error>
    where
        S: TokenService + ?Sized,
    {
        let response = service.get_fungible_token_info(token).await;
        gate("get_fungible_token_info", response.response_code)?;

        Ok(response.info)
    }

    pub async fn get_non_fungible_token_info<S>(
        service: &S,
        token: Address,
        serial_number: i64,
    ) -> Result<NonFungibleTokenInfo, Error>
    where
        S: TokenService + ?Sized,
    {
        let response = service
            .get_non_fungible_token_info(token, serial_number)
            .await;
        gate("get_non_fungible_token_info", response.response_code)?;

        Ok(response.info)
    }
}

fn gate(call: &str, code: ResponseCode) -> Result<(), Error> {
    ResponseGate::interpret(code).map_err(|err| {
        log!(Topic::TokenService, Warn, "{call} failed: {code}");
        Error::from(err)
    })?;

    log!(Topic::TokenService, Ok, "{call}: {code}");

    Ok(())
}

///
/// TESTS
///
