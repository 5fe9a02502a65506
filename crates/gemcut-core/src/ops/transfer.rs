use crate::{
    Error,
    domain::{
        response::ResponseGate,
        transfer::{
            AccountAmount, NftTransfer, TokenTransferList, TransferError, TransferInstruction,
            TransferList, check_balanced, check_unique_nft_moves,
        },
    },
    ids::Address,
    log,
    log::Topic,
    ops::token::TokenService,
};
use indexmap::IndexMap;

///
/// TransferComposer
///
/// Validates a multi-asset transfer and submits it as one all-or-nothing
/// token-service call.
///

pub struct TransferComposer;

impl TransferComposer {
    /// Check conservation and nft uniqueness, producing an instruction that
    /// can be submitted exactly once.
    pub fn compose(
        native: TransferList,
        tokens: Vec<TokenTransferList>,
    ) -> Result<TransferInstruction, Error> {
        check_balanced(None, &native.transfers)?;
        for list in &tokens {
            check_balanced(Some(list.token), &list.transfers)?;
        }
        check_unique_nft_moves(&tokens)?;

        let instruction = TransferInstruction::new(native, tokens);
        log!(
            Topic::Transfer,
            Debug,
            "composed: {} native, {} fungible, {} nft move(s)",
            instruction.native().transfers.len(),
            instruction.fungible_move_count(),
            instruction.nft_move_count(),
        );

        Ok(instruction)
    }

    /// Submit a composed instruction. One call, no retry: any code other than
    /// SUCCESS comes back as a precompile error and nothing has moved.
    pub async fn submit<S>(service: &S, instruction: TransferInstruction) -> Result<(), Error>
    where
        S: TokenService + ?Sized,
    {
        let code = service.crypto_transfer(&instruction).await;

        match ResponseGate::interpret(code) {
            Ok(()) => {
                log!(Topic::Transfer, Ok, "atomic transfer applied");
                Ok(())
            }
            Err(err) => {
                log!(Topic::Transfer, Warn, "atomic transfer rejected: {err}");
                Err(err.into())
            }
        }
    }
}

///
/// TransferBuilder
///
/// Collects moves one at a time, grouping token movements per token in the
/// order tokens are first mentioned.
///

#[derive(Debug, Default)]
pub struct TransferBuilder {
    native: Vec<AccountAmount>,
    tokens: IndexMap<Address, TokenTransferList>,
    // first paired amount that cannot be negated; reported by `compose`
    invalid: Option<i64>,
}

impl TransferBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `amount` of the native currency from `from` to `to`.
    #[must_use]
    pub fn hbar(mut self, from: Address, to: Address, amount: i64) -> Self {
        let Some(debit) = self.debit(amount) else {
            return self;
        };
        self.native.push(AccountAmount::new(from, debit));
        self.native.push(AccountAmount::new(to, amount));
        self
    }

    /// Raw native leg, for uneven splits (one payer, several payees).
    #[must_use]
    pub fn native(mut self, account: Address, amount: i64) -> Self {
        self.native.push(AccountAmount::new(account, amount));
        self
    }

    #[must_use]
    pub fn token(mut self, token: Address, from: Address, to: Address, amount: i64) -> Self {
        let Some(debit) = self.debit(amount) else {
            return self;
        };
        let list = self.list(token);
        list.transfers.push(AccountAmount::new(from, debit));
        list.transfers.push(AccountAmount::new(to, amount));
        self
    }

    /// Raw fungible leg for `token`.
    #[must_use]
    pub fn token_amount(mut self, token: Address, account: Address, amount: i64) -> Self {
        self.list(token)
            .transfers
            .push(AccountAmount::new(account, amount));
        self
    }

    #[must_use]
    pub fn nft(mut self, token: Address, from: Address, to: Address, serial_number: i64) -> Self {
        self.list(token).nft_transfers.push(NftTransfer {
            sender: from,
            receiver: to,
            serial_number,
        });
        self
    }

    pub fn compose(self) -> Result<TransferInstruction, Error> {
        if let Some(amount) = self.invalid {
            return Err(TransferError::InvalidAmount { amount }.into());
        }

        TransferComposer::compose(
            TransferList::new(self.native),
            self.tokens.into_values().collect(),
        )
    }

    fn debit(&mut self, amount: i64) -> Option<i64> {
        let debit = amount.checked_neg();
        if debit.is_none() {
            self.invalid.get_or_insert(amount);
        }

        debit
    }

    fn list(&mut self, token: Address) -> &mut TokenTransferList {
        self.tokens
            .entry(token)
            .or_insert_with(|| TokenTransferList::new(token))
    }
}

///
/// TESTS
///
