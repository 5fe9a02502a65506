//! In-memory token-service runtime.
//!
//! Mirrors the precompile closely enough for host tests: token creation and
//! info queries, balances, associations, KYC grants, nft ownership, a flat
//! network fee and all-or-nothing application of multi-asset transfers.
//! Failures report the same response codes the real runtime uses.

use async_trait::async_trait;
use gemcut_core::{
    domain::{
        response::ResponseCode,
        token::{FungibleTokenInfo, NonFungibleTokenInfo, TokenDefinition, TokenInfo},
        transfer::{AccountAmount, NftTransfer, TransferInstruction},
    },
    ids::Address,
    ops::token::{CreateTokenResponse, InfoResponse, MintResponse, TokenService},
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, MutexGuard, PoisonError},
};

type Outcome = Result<(), ResponseCode>;

/// Tokens created through the service are numbered from here (`0.0.600000`).
pub const FIRST_CREATED_TOKEN_NUM: u64 = 600_000;

///
/// TokenKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    Fungible,
    NonFungible,
}

///
/// TokenState
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenState {
    pub kind: TokenKind,
    pub definition: TokenDefinition,
    pub decimals: i32,
    pub total_supply: i64,
    next_serial: i64,
}

impl TokenState {
    fn new(kind: TokenKind, definition: TokenDefinition, supply: i64, decimals: i32) -> Self {
        Self {
            kind,
            definition,
            decimals,
            total_supply: supply,
            next_serial: 1,
        }
    }

    #[must_use]
    pub const fn treasury(&self) -> Address {
        self.definition.treasury
    }

    fn info(&self) -> TokenInfo {
        TokenInfo {
            token: self.definition.clone(),
            total_supply: self.total_supply,
        }
    }
}

///
/// LedgerState
///
/// Everything the runtime knows. Cloned freely; tests compare snapshots
/// taken before and after a failed call.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LedgerState {
    pub native: BTreeMap<Address, i64>,
    pub tokens: BTreeMap<Address, TokenState>,
    // (token, account) -> balance
    pub fungible: BTreeMap<(Address, Address), i64>,
    // (token, serial) -> owner
    pub nft_owners: BTreeMap<(Address, i64), Address>,
    // (token, serial) -> metadata
    pub nft_metadata: BTreeMap<(Address, i64), Vec<u8>>,
    // (token, account)
    pub associations: BTreeSet<(Address, Address)>,
    // (token, account)
    pub kyc_grants: BTreeSet<(Address, Address)>,
    created: u64,
}

impl LedgerState {
    #[must_use]
    pub fn native_balance(&self, account: Address) -> i64 {
        self.native.get(&account).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn token_balance(&self, token: Address, account: Address) -> i64 {
        self.fungible
            .get(&(token, account))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn nft_owner(&self, token: Address, serial_number: i64) -> Option<Address> {
        self.nft_owners.get(&(token, serial_number)).copied()
    }

    fn token(&self, token: Address) -> Result<&TokenState, ResponseCode> {
        self.tokens.get(&token).ok_or(ResponseCode::INVALID_TOKEN_ID)
    }

    fn token_of_kind(&self, token: Address, kind: TokenKind) -> Result<&TokenState, ResponseCode> {
        let state = self.token(token)?;
        if state.kind != kind {
            return Err(ResponseCode::INVALID_TOKEN_ID);
        }

        Ok(state)
    }

    // the treasury is associated and KYC-granted with its own token
    fn install(&mut self, token: Address, state: TokenState) {
        let treasury = state.treasury();
        if state.kind == TokenKind::Fungible {
            self.fungible.insert((token, treasury), state.total_supply);
        }

        self.tokens.insert(token, state);
        self.associations.insert((token, treasury));
        self.kyc_grants.insert((token, treasury));
    }

    fn create_token(
        &mut self,
        kind: TokenKind,
        definition: &TokenDefinition,
        initial_supply: i64,
        decimals: i32,
    ) -> Result<Address, ResponseCode> {
        if definition.treasury.is_zero() {
            return Err(ResponseCode::INVALID_TREASURY_ACCOUNT_FOR_TOKEN);
        }
        if definition.symbol.is_empty() {
            return Err(ResponseCode::MISSING_TOKEN_SYMBOL);
        }
        if initial_supply < 0 {
            return Err(ResponseCode::INVALID_TOKEN_INITIAL_SUPPLY);
        }
        if decimals < 0 {
            return Err(ResponseCode::INVALID_TOKEN_DECIMALS);
        }

        // skip numbers already taken by directly installed tokens
        let token = loop {
            let candidate = Address::from_account_num(FIRST_CREATED_TOKEN_NUM + self.created);
            self.created += 1;
            if !self.tokens.contains_key(&candidate) {
                break candidate;
            }
        };

        let state = TokenState::new(kind, definition.clone(), initial_supply, decimals);
        self.install(token, state);

        Ok(token)
    }

    fn fungible_info(&self, token: Address) -> Result<FungibleTokenInfo, ResponseCode> {
        let state = self.token_of_kind(token, TokenKind::Fungible)?;

        Ok(FungibleTokenInfo {
            token_info: state.info(),
            decimals: state.decimals,
        })
    }

    fn nft_info(&self, token: Address, serial: i64) -> Result<NonFungibleTokenInfo, ResponseCode> {
        let state = self.token_of_kind(token, TokenKind::NonFungible)?;
        let owner = self
            .nft_owner(token, serial)
            .ok_or(ResponseCode::INVALID_NFT_ID)?;

        Ok(NonFungibleTokenInfo {
            token_info: state.info(),
            serial_number: serial,
            owner,
            metadata: self
                .nft_metadata
                .get(&(token, serial))
                .cloned()
                .unwrap_or_default(),
        })
    }

    // association first, then KYC when the token demands it
    fn check_holder(&self, token: Address, account: Address) -> Outcome {
        let state = self.token(token)?;

        if !self.associations.contains(&(token, account)) {
            return Err(ResponseCode::TOKEN_NOT_ASSOCIATED_TO_ACCOUNT);
        }
        if state.definition.kyc_required && !self.kyc_grants.contains(&(token, account)) {
            return Err(ResponseCode::ACCOUNT_KYC_NOT_GRANTED_FOR_TOKEN);
        }

        Ok(())
    }

    fn apply_native(&mut self, transfers: &[AccountAmount], fee: i64) -> Outcome {
        let mut net: BTreeMap<Address, i128> = BTreeMap::new();
        for t in transfers {
            *net.entry(t.account).or_default() += i128::from(t.amount);
        }

        // the first debited account pays the fee
        if fee > 0
            && let Some(payer) = transfers.iter().find(|t| t.amount < 0)
        {
            *net.entry(payer.account).or_default() -= i128::from(fee);
        }

        let mut updated = Vec::with_capacity(net.len());
        for (account, delta) in net {
            let balance = i128::from(self.native_balance(account)) + delta;
            let balance =
                i64::try_from(balance).map_err(|_| ResponseCode::INSUFFICIENT_ACCOUNT_BALANCE)?;
            if balance < 0 {
                return Err(ResponseCode::INSUFFICIENT_ACCOUNT_BALANCE);
            }
            updated.push((account, balance));
        }

        self.native.extend(updated);

        Ok(())
    }

    fn apply_fungible(&mut self, token: Address, transfers: &[AccountAmount]) -> Outcome {
        if transfers.is_empty() {
            return Ok(());
        }
        self.token_of_kind(token, TokenKind::Fungible)?;

        let sum: i128 = transfers.iter().map(|t| i128::from(t.amount)).sum();
        if sum != 0 {
            return Err(ResponseCode::TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN);
        }

        let mut net: BTreeMap<Address, i128> = BTreeMap::new();
        for t in transfers {
            self.check_holder(token, t.account)?;
            *net.entry(t.account).or_default() += i128::from(t.amount);
        }

        let mut updated = Vec::with_capacity(net.len());
        for (account, delta) in net {
            let balance = i128::from(self.token_balance(token, account)) + delta;
            let balance =
                i64::try_from(balance).map_err(|_| ResponseCode::INSUFFICIENT_TOKEN_BALANCE)?;
            if balance < 0 {
                return Err(ResponseCode::INSUFFICIENT_TOKEN_BALANCE);
            }
            updated.push(((token, account), balance));
        }

        self.fungible.extend(updated);

        Ok(())
    }

    fn apply_nft(&mut self, token: Address, nft: &NftTransfer) -> Outcome {
        self.token_of_kind(token, TokenKind::NonFungible)?;

        let owner = self
            .nft_owner(token, nft.serial_number)
            .ok_or(ResponseCode::INVALID_NFT_ID)?;
        if owner != nft.sender {
            return Err(ResponseCode::SENDER_DOES_NOT_OWN_NFT_SERIAL_NO);
        }

        self.check_holder(token, nft.sender)?;
        self.check_holder(token, nft.receiver)?;
        self.nft_owners
            .insert((token, nft.serial_number), nft.receiver);

        Ok(())
    }

    fn apply_instruction(&mut self, instruction: &TransferInstruction, fee: i64) -> Outcome {
        self.apply_native(&instruction.native().transfers, fee)?;

        for list in instruction.tokens() {
            self.apply_fungible(list.token, &list.transfers)?;
            for nft in &list.nft_transfers {
                self.apply_nft(list.token, nft)?;
            }
        }

        Ok(())
    }

    fn mint(
        &mut self,
        token: Address,
        amount: i64,
        metadata: &[Vec<u8>],
    ) -> Result<MintResponse, ResponseCode> {
        let state = self
            .tokens
            .get_mut(&token)
            .ok_or(ResponseCode::INVALID_TOKEN_ID)?;
        let treasury = state.treasury();

        let serial_numbers = match state.kind {
            TokenKind::Fungible => {
                if amount <= 0 || !metadata.is_empty() {
                    return Err(ResponseCode::INVALID_TOKEN_MINT_AMOUNT);
                }
                state.total_supply = state
                    .total_supply
                    .checked_add(amount)
                    .ok_or(ResponseCode::INVALID_TOKEN_MINT_AMOUNT)?;
                Vec::new()
            }
            TokenKind::NonFungible => {
                if metadata.is_empty() {
                    return Err(ResponseCode::INVALID_TOKEN_MINT_AMOUNT);
                }
                let first = state.next_serial;
                let count = i64::try_from(metadata.len())
                    .map_err(|_| ResponseCode::INVALID_TOKEN_MINT_AMOUNT)?;
                state.next_serial += count;
                state.total_supply += count;
                (first..first + count).collect()
            }
        };
        let new_total_supply = state.total_supply;

        if serial_numbers.is_empty() {
            *self.fungible.entry((token, treasury)).or_default() += amount;
        } else {
            for (serial, bytes) in serial_numbers.iter().zip(metadata) {
                self.nft_owners.insert((token, *serial), treasury);
                self.nft_metadata.insert((token, *serial), bytes.clone());
            }
        }

        Ok(MintResponse {
            response_code: ResponseCode::SUCCESS,
            new_total_supply,
            serial_numbers,
        })
    }
}

///
/// MockTokenService
///

#[derive(Debug, Default)]
pub struct MockTokenService {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    ledger: LedgerState,
    fee: i64,
    forced: Option<ResponseCode>,
    calls: u64,
}

impl MockTokenService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge a flat native fee on every crypto transfer that has a native
    /// debit.
    #[must_use]
    pub fn with_fee(self, fee: i64) -> Self {
        self.lock().fee = fee;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ---- setup ------------------------------------------------------------

    pub fn fund_native(&self, account: Address, amount: i64) {
        *self.lock().ledger.native.entry(account).or_default() += amount;
    }

    /// Install a fungible token at `token` whose whole initial supply sits
    /// in `treasury`. Skips validation and does not count as a call.
    pub fn create_fungible(
        &self,
        token: Address,
        treasury: Address,
        supply: i64,
        kyc_required: bool,
    ) {
        let state = TokenState::new(
            TokenKind::Fungible,
            Self::definition(treasury, kyc_required),
            supply,
            0,
        );
        self.lock().ledger.install(token, state);
    }

    pub fn create_nft(&self, token: Address, treasury: Address, kyc_required: bool) {
        let state = TokenState::new(
            TokenKind::NonFungible,
            Self::definition(treasury, kyc_required),
            0,
            0,
        );
        self.lock().ledger.install(token, state);
    }

    fn definition(treasury: Address, kyc_required: bool) -> TokenDefinition {
        let definition = TokenDefinition::new("", "", treasury);
        if kyc_required {
            definition.with_kyc()
        } else {
            definition
        }
    }

    /// Associate without going through the service call.
    pub fn associate(&self, account: Address, token: Address) {
        self.lock().ledger.associations.insert((token, account));
    }

    pub fn grant_kyc(&self, token: Address, account: Address) {
        self.lock().ledger.kyc_grants.insert((token, account));
    }

    /// Answer every subsequent call with `code` without touching state.
    pub fn force_response(&self, code: Option<ResponseCode>) {
        self.lock().forced = code;
    }

    // ---- inspection -------------------------------------------------------

    #[must_use]
    pub fn snapshot(&self) -> LedgerState {
        self.lock().ledger.clone()
    }

    #[must_use]
    pub fn native_balance(&self, account: Address) -> i64 {
        self.lock().ledger.native_balance(account)
    }

    #[must_use]
    pub fn token_balance(&self, token: Address, account: Address) -> i64 {
        self.lock().ledger.token_balance(token, account)
    }

    #[must_use]
    pub fn nft_owner(&self, token: Address, serial_number: i64) -> Option<Address> {
        self.lock().ledger.nft_owner(token, serial_number)
    }

    /// Number of service calls made so far.
    #[must_use]
    pub fn call_count(&self) -> u64 {
        self.lock().calls
    }

    // Runs `f` against a working copy and commits only on success.
    fn transact_with<T>(
        &self,
        f: impl FnOnce(&mut LedgerState, i64) -> Result<T, ResponseCode>,
    ) -> Result<T, ResponseCode> {
        let mut inner = self.lock();
        inner.calls += 1;

        if let Some(code) = inner.forced {
            return Err(code);
        }

        let mut working = inner.ledger.clone();
        let value = f(&mut working, inner.fee)?;
        inner.ledger = working;

        Ok(value)
    }

    fn transact(&self, f: impl FnOnce(&mut LedgerState, i64) -> Outcome) -> ResponseCode {
        match self.transact_with(f) {
            Ok(()) => ResponseCode::SUCCESS,
            Err(code) => code,
        }
    }

    fn create_with(
        &self,
        kind: TokenKind,
        token: &TokenDefinition,
        initial_supply: i64,
        decimals: i32,
    ) -> CreateTokenResponse {
        let created = self.transact_with(|ledger, _| {
            ledger.create_token(kind, token, initial_supply, decimals)
        });

        match created {
            Ok(token_address) => CreateTokenResponse {
                response_code: ResponseCode::SUCCESS,
                token_address,
            },
            Err(code) => CreateTokenResponse::failed(code),
        }
    }

    fn query<T: Default>(
        &self,
        f: impl FnOnce(&LedgerState) -> Result<T, ResponseCode>,
    ) -> InfoResponse<T> {
        match self.transact_with(|ledger, _| f(ledger)) {
            Ok(info) => InfoResponse {
                response_code: ResponseCode::SUCCESS,
                info,
            },
            Err(code) => InfoResponse::failed(code),
        }
    }
}

#[async_trait]
impl TokenService for MockTokenService {
    async fn crypto_transfer(&self, instruction: &TransferInstruction) -> ResponseCode {
        self.transact(|ledger, fee| ledger.apply_instruction(instruction, fee))
    }

    async fn transfer_token(
        &self,
        token: Address,
        sender: Address,
        receiver: Address,
        amount: i64,
    ) -> ResponseCode {
        self.transact(|ledger, _| {
            let debit = amount
                .checked_neg()
                .ok_or(ResponseCode::INVALID_ACCOUNT_AMOUNTS)?;
            let legs = [
                AccountAmount::new(sender, debit),
                AccountAmount::new(receiver, amount),
            ];

            ledger.apply_fungible(token, &legs)
        })
    }

    async fn transfer_nft(
        &self,
        token: Address,
        sender: Address,
        receiver: Address,
        serial_number: i64,
    ) -> ResponseCode {
        let nft = NftTransfer {
            sender,
            receiver,
            serial_number,
        };

        self.transact(|ledger, _| ledger.apply_nft(token, &nft))
    }

    async fn mint_token(&self, token: Address, amount: i64, metadata: &[Vec<u8>]) -> MintResponse {
        self.transact_with(|ledger, _| ledger.mint(token, amount, metadata))
            .unwrap_or_else(MintResponse::failed)
    }

    async fn associate_token(&self, account: Address, token: Address) -> ResponseCode {
        self.transact(|ledger, _| {
            ledger.token(token)?;
            if ledger.associations.insert((token, account)) {
                Ok(())
            } else {
                Err(ResponseCode::TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT)
            }
        })
    }

    async fn grant_token_kyc(&self, token: Address, account: Address) -> ResponseCode {
        self.transact(|ledger, _| {
            if !ledger.token(token)?.definition.kyc_required {
                return Err(ResponseCode::TOKEN_HAS_NO_KYC_KEY);
            }
            if !ledger.associations.contains(&(token, account)) {
                return Err(ResponseCode::TOKEN_NOT_ASSOCIATED_TO_ACCOUNT);
            }
            ledger.kyc_grants.insert((token, account));

            Ok(())
        })
    }

    async fn create_fungible_token(
        &self,
        token: &TokenDefinition,
        initial_supply: i64,
        decimals: i32,
    ) -> CreateTokenResponse {
        self.create_with(TokenKind::Fungible, token, initial_supply, decimals)
    }

    async fn create_non_fungible_token(&self, token: &TokenDefinition) -> CreateTokenResponse {
        self.create_with(TokenKind::NonFungible, token, 0, 0)
    }

    async fn get_token_info(&self, token: Address) -> InfoResponse<TokenInfo> {
        self.query(|ledger| ledger.token(token).map(TokenState::info))
    }

    async fn get_fungible_token_info(&self, token: Address) -> InfoResponse<FungibleTokenInfo> {
        self.query(|ledger| ledger.fungible_info(token))
    }

    async fn get_non_fungible_token_info(
        &self,
        token: Address,
        serial_number: i64,
    ) -> InfoResponse<NonFungibleTokenInfo> {
        self.query(|ledger| ledger.nft_info(token, serial_number))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fake;
    use futures::executor::block_on;

    fn setup() -> (MockTokenService, Address, Address, Address) {
        let svc = MockTokenService::new();
        let (alice, bob) = (Fake::account(0), Fake::account(1));
        let token = Fake::token(0);

        svc.fund_native(alice, 1_000);
        svc.create_fungible(token, alice, 500, false);
        svc.associate(bob, token);

        (svc, alice, bob, token)
    }

    #[test]
    fn token_transfer_moves_balance() {
        let (svc, alice, bob, token) = setup();

        let code = block_on(svc.transfer_token(token, alice, bob, 200));
        assert_eq!(code, ResponseCode::SUCCESS);
        assert_eq!(svc.token_balance(token, alice), 300);
        assert_eq!(svc.token_balance(token, bob), 200);
    }

    #[test]
    fn insufficient_balance_leaves_state_untouched() {
        let (svc, alice, bob, token) = setup();
        let before = svc.snapshot();

        let code = block_on(svc.transfer_token(token, alice, bob, 501));
        assert_eq!(code, ResponseCode::INSUFFICIENT_TOKEN_BALANCE);
        assert_eq!(svc.snapshot(), before);
    }

    #[test]
    fn unassociated_receiver_is_rejected() {
        let (svc, alice, _, token) = setup();

        let code = block_on(svc.transfer_token(token, alice, Fake::account(9), 1));
        assert_eq!(code, ResponseCode::TOKEN_NOT_ASSOCIATED_TO_ACCOUNT);
    }

    #[test]
    fn kyc_is_enforced_only_when_required() {
        let svc = MockTokenService::new();
        let (alice, bob) = (Fake::account(0), Fake::account(1));
        let token = Fake::token(1);
        svc.create_fungible(token, alice, 10, true);
        svc.associate(bob, token);

        assert_eq!(
            block_on(svc.transfer_token(token, alice, bob, 1)),
            ResponseCode::ACCOUNT_KYC_NOT_GRANTED_FOR_TOKEN
        );
        assert_eq!(block_on(svc.grant_token_kyc(token, bob)), ResponseCode::SUCCESS);
        assert_eq!(block_on(svc.transfer_token(token, alice, bob, 1)), ResponseCode::SUCCESS);

        let plain = Fake::token(2);
        svc.create_fungible(plain, alice, 10, false);
        assert_eq!(
            block_on(svc.grant_token_kyc(plain, alice)),
            ResponseCode::TOKEN_HAS_NO_KYC_KEY
        );
    }

    #[test]
    fn nft_mint_assigns_serials_to_treasury() {
        let svc = MockTokenService::new();
        let (alice, bob) = (Fake::account(0), Fake::account(1));
        let nft = Fake::token(3);
        svc.create_nft(nft, alice, false);

        let minted = block_on(svc.mint_token(nft, 0, &[vec![1], vec![2]]));
        assert_eq!(minted.response_code, ResponseCode::SUCCESS);
        assert_eq!(minted.serial_numbers, vec![1, 2]);
        assert_eq!(minted.new_total_supply, 2);
        assert_eq!(svc.nft_owner(nft, 2), Some(alice));

        // bob never owned serial 1
        svc.associate(bob, nft);
        assert_eq!(
            block_on(svc.transfer_nft(nft, bob, alice, 1)),
            ResponseCode::SENDER_DOES_NOT_OWN_NFT_SERIAL_NO
        );
        assert_eq!(
            block_on(svc.transfer_nft(nft, alice, bob, 7)),
            ResponseCode::INVALID_NFT_ID
        );
    }

    #[test]
    fn failed_mint_reports_code_and_no_payload() {
        let (svc, _, _, token) = setup();

        let minted = block_on(svc.mint_token(token, -5, &[]));
        assert_eq!(minted, MintResponse::failed(ResponseCode::INVALID_TOKEN_MINT_AMOUNT));

        let minted = block_on(svc.mint_token(Fake::token(77), 5, &[]));
        assert_eq!(minted.response_code, ResponseCode::INVALID_TOKEN_ID);
    }

    #[test]
    fn double_association_is_rejected() {
        let (svc, _, bob, token) = setup();
        assert_eq!(
            block_on(svc.associate_token(bob, token)),
            ResponseCode::TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT
        );
    }

    #[test]
    fn forced_code_skips_state_and_counts_call() {
        let (svc, alice, bob, token) = setup();
        let before = svc.snapshot();

        svc.force_response(Some(ResponseCode::new(21)));
        assert_eq!(block_on(svc.transfer_token(token, alice, bob, 1)).get(), 21);
        assert_eq!(svc.snapshot(), before);
        assert_eq!(svc.call_count(), 1);

        svc.force_response(None);
        assert_eq!(block_on(svc.transfer_token(token, alice, bob, 1)), ResponseCode::SUCCESS);
    }

    #[test]
    fn unnegatable_amount_is_rejected_without_state_change() {
        let (svc, alice, bob, token) = setup();
        let before = svc.snapshot();

        assert_eq!(
            block_on(svc.transfer_token(token, alice, bob, i64::MIN)),
            ResponseCode::INVALID_ACCOUNT_AMOUNTS
        );
        assert_eq!(svc.snapshot(), before);
        assert_eq!(svc.call_count(), 1);
    }

    #[test]
    fn created_fungible_token_reports_its_definition() {
        let svc = MockTokenService::new();
        let treasury = Fake::account(0);
        let def = TokenDefinition::new("tokenName", "tokenSymbol", treasury).with_memo("memo");

        let created = block_on(svc.create_fungible_token(&def, 200, 8));
        assert_eq!(created.response_code, ResponseCode::SUCCESS);
        assert_eq!(
            created.token_address,
            Address::from_account_num(FIRST_CREATED_TOKEN_NUM)
        );

        let token = created.token_address;
        assert_eq!(svc.token_balance(token, treasury), 200);

        let info = block_on(svc.get_fungible_token_info(token));
        assert_eq!(info.response_code, ResponseCode::SUCCESS);
        assert_eq!(info.info.token_info.token, def);
        assert_eq!(info.info.token_info.total_supply, 200);
        assert_eq!(info.info.decimals, 8);

        // wrong kind for the nft query
        let nft = block_on(svc.get_non_fungible_token_info(token, 1));
        assert_eq!(nft.response_code, ResponseCode::INVALID_TOKEN_ID);
        assert_eq!(nft.info, NonFungibleTokenInfo::default());
    }

    #[test]
    fn creation_skips_installed_addresses() {
        let svc = MockTokenService::new();
        let treasury = Fake::account(0);
        svc.create_nft(Address::from_account_num(FIRST_CREATED_TOKEN_NUM), treasury, false);

        let created = block_on(
            svc.create_non_fungible_token(&TokenDefinition::new("n", "N", treasury)),
        );
        assert_eq!(
            created.token_address,
            Address::from_account_num(FIRST_CREATED_TOKEN_NUM + 1)
        );
    }

    #[test]
    fn invalid_definitions_are_rejected() {
        let svc = MockTokenService::new();
        let treasury = Fake::account(0);
        let good = TokenDefinition::new("tokenName", "tokenSymbol", treasury);
        let before = svc.snapshot();

        let cases = [
            (
                TokenDefinition::new("tokenName", "tokenSymbol", Address::ZERO),
                10,
                0,
                ResponseCode::INVALID_TREASURY_ACCOUNT_FOR_TOKEN,
            ),
            (
                TokenDefinition::new("tokenName", "", treasury),
                10,
                0,
                ResponseCode::MISSING_TOKEN_SYMBOL,
            ),
            (good.clone(), -1, 0, ResponseCode::INVALID_TOKEN_INITIAL_SUPPLY),
            (good, 10, -1, ResponseCode::INVALID_TOKEN_DECIMALS),
        ];

        for (def, supply, decimals, code) in cases {
            let created = block_on(svc.create_fungible_token(&def, supply, decimals));
            assert_eq!(created, CreateTokenResponse::failed(code));
        }
        assert_eq!(svc.snapshot(), before);
    }

    #[test]
    fn nft_info_tracks_owner_and_metadata() {
        let svc = MockTokenService::new();
        let (alice, bob) = (Fake::account(0), Fake::account(1));
        let def = TokenDefinition::new("nftName", "NFT", alice);

        let nft = block_on(svc.create_non_fungible_token(&def)).token_address;
        block_on(svc.mint_token(nft, 0, &[b"first".to_vec()]));
        svc.associate(bob, nft);
        assert_eq!(block_on(svc.transfer_nft(nft, alice, bob, 1)), ResponseCode::SUCCESS);

        let info = block_on(svc.get_non_fungible_token_info(nft, 1));
        assert_eq!(info.response_code, ResponseCode::SUCCESS);
        assert_eq!(info.info.serial_number, 1);
        assert_eq!(info.info.owner, bob);
        assert_eq!(info.info.metadata, b"first".to_vec());
        assert_eq!(info.info.token_info.total_supply, 1);

        assert_eq!(
            block_on(svc.get_non_fungible_token_info(nft, 2)).response_code,
            ResponseCode::INVALID_NFT_ID
        );
        assert_eq!(
            block_on(svc.get_token_info(Fake::token(42))).response_code,
            ResponseCode::INVALID_TOKEN_ID
        );
    }
}
