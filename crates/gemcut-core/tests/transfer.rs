use futures::executor::block_on;
use gemcut_core::{
    Error, ErrorCode,
    domain::{response::ResponseCode, transfer::TransferError},
    ids::Address,
    ops::{SafeTokenOps, TransferBuilder, TransferComposer},
};
use gemcut_testkit::{Fake, MockTokenService};

const FEE: i64 = 7;

///
/// World
/// Two funded accounts, one fungible token and one nft serial owned by the
/// sender, everything associated. Built fresh per test.
///

struct World {
    svc: MockTokenService,
    sender: Address,
    receiver: Address,
    token: Address,
    nft: Address,
    serial: i64,
}

fn world() -> World {
    let svc = MockTokenService::new().with_fee(FEE);
    let (sender, receiver) = (Fake::account(0), Fake::account(1));
    let (token, nft) = (Fake::token(0), Fake::token(1));

    svc.fund_native(sender, 100_000);
    svc.fund_native(receiver, 100_000);
    svc.create_fungible(token, sender, 1_000, true);
    svc.create_nft(nft, sender, true);

    block_on(async {
        for t in [token, nft] {
            SafeTokenOps::associate_token(&svc, receiver, t).await.unwrap();
            SafeTokenOps::grant_token_kyc(&svc, t, receiver).await.unwrap();
        }
    });

    let minted = block_on(SafeTokenOps::mint_token(&svc, nft, 0, &[b"gem".to_vec()])).unwrap();

    World {
        svc,
        sender,
        receiver,
        token,
        nft,
        serial: minted.serial_numbers[0],
    }
}

#[test]
fn native_token_and_nft_move_together() {
    let w = world();

    let instruction = TransferBuilder::new()
        .hbar(w.sender, w.receiver, 10_000)
        .token(w.token, w.sender, w.receiver, 100)
        .nft(w.nft, w.sender, w.receiver, w.serial)
        .compose()
        .unwrap();
    block_on(TransferComposer::submit(&w.svc, instruction)).unwrap();

    // fee model belongs to the runtime; only the direction is asserted
    assert!(w.svc.native_balance(w.sender) < 90_000);
    assert_eq!(w.svc.native_balance(w.receiver), 110_000);
    assert_eq!(w.svc.token_balance(w.token, w.receiver), 100);
    assert_eq!(w.svc.token_balance(w.token, w.sender), 900);
    assert_eq!(w.svc.nft_owner(w.nft, w.serial), Some(w.receiver));
}

#[test]
fn failing_leg_rolls_back_every_leg() {
    let w = world();
    let before = w.svc.snapshot();

    // receiver does not own the serial, so the nft leg fails
    let instruction = TransferBuilder::new()
        .hbar(w.sender, w.receiver, 10_000)
        .token(w.token, w.sender, w.receiver, 100)
        .nft(w.nft, w.receiver, w.sender, w.serial)
        .compose()
        .unwrap();
    let err = block_on(TransferComposer::submit(&w.svc, instruction)).unwrap_err();

    assert_eq!(err.code(), ErrorCode::Precompile);
    assert_eq!(
        err.response_code(),
        Some(ResponseCode::SENDER_DOES_NOT_OWN_NFT_SERIAL_NO.get())
    );
    assert_eq!(w.svc.snapshot(), before);
}

#[test]
fn injected_failure_code_is_surfaced_and_state_unchanged() {
    let w = world();
    let before = w.svc.snapshot();
    let calls = w.svc.call_count();

    w.svc.force_response(Some(ResponseCode::new(21)));
    let instruction = TransferBuilder::new()
        .hbar(w.sender, w.receiver, 1)
        .compose()
        .unwrap();
    let err = block_on(SafeTokenOps::crypto_transfer(&w.svc, instruction)).unwrap_err();

    assert!(matches!(err, Error::Precompile(e) if e.code.get() == 21));
    assert_eq!(w.svc.call_count(), calls + 1, "no retry");
    assert_eq!(w.svc.snapshot(), before);
}

#[test]
fn overdrawn_token_balance_is_reported() {
    let w = world();
    let before = w.svc.snapshot();

    let instruction = TransferBuilder::new()
        .token(w.token, w.sender, w.receiver, 1_001)
        .compose()
        .unwrap();
    let err = block_on(TransferComposer::submit(&w.svc, instruction)).unwrap_err();

    assert_eq!(err.response_code(), Some(178));
    assert_eq!(w.svc.snapshot(), before);
}

#[test]
fn invalid_instruction_never_reaches_the_service() {
    let w = world();
    let calls = w.svc.call_count();

    let err = TransferBuilder::new()
        .nft(w.nft, w.sender, w.receiver, w.serial)
        .nft(w.nft, w.sender, w.receiver, w.serial)
        .compose()
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Transfer(TransferError::DuplicateAssetMove { token, .. }) if token == w.nft
    ));
    assert_eq!(w.svc.call_count(), calls);
}

#[test]
fn missing_kyc_blocks_single_transfer() {
    let w = world();
    let stranger = Fake::account(7);

    block_on(SafeTokenOps::associate_token(&w.svc, stranger, w.token)).unwrap();
    let err = block_on(SafeTokenOps::transfer_token(
        &w.svc, w.token, w.sender, stranger, 5,
    ))
    .unwrap_err();

    assert_eq!(
        err.response_code(),
        Some(ResponseCode::ACCOUNT_KYC_NOT_GRANTED_FOR_TOKEN.get())
    );

    block_on(SafeTokenOps::grant_token_kyc(&w.svc, w.token, stranger)).unwrap();
    block_on(SafeTokenOps::transfer_token(&w.svc, w.token, w.sender, stranger, 5)).unwrap();
    assert_eq!(w.svc.token_balance(w.token, stranger), 5);
}

#[test]
fn nft_round_trip_through_single_calls() {
    let w = world();

    block_on(SafeTokenOps::transfer_nft(&w.svc, w.nft, w.sender, w.receiver, w.serial)).unwrap();
    let err = block_on(SafeTokenOps::transfer_nft(&w.svc, w.nft, w.sender, w.receiver, w.serial))
        .unwrap_err();
    assert_eq!(
        err.response_code(),
        Some(ResponseCode::SENDER_DOES_NOT_OWN_NFT_SERIAL_NO.get())
    );

    block_on(SafeTokenOps::transfer_nft(&w.svc, w.nft, w.receiver, w.sender, w.serial)).unwrap();
    assert_eq!(w.svc.nft_owner(w.nft, w.serial), Some(w.sender));
}
