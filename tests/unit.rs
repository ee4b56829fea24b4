//! Unit tests for stability-prog
//!
//! These tests drive the program wrapper end to end through
//! `process_instruction`: account validation, market and asset setup, and the
//! token-moving settlement paths (interest repay and interest liquidation).

use solana_program::{
    account_info::AccountInfo, clock::Clock, program_error::ProgramError, program_pack::Pack,
    pubkey::Pubkey,
};
use spl_token::state::{Account as TokenAccount, AccountState};

use stability_prog::{
    amm,
    constants::SLAB_LEN,
    engine::SECONDS_PER_YEAR,
    error::StabilityError,
    ledger::{LEDGER_LEN, LEDGER_MAGIC},
    processor::process_instruction,
    ray::{RAY, WAD},
    zc,
};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct TestAccount {
    key: Pubkey,
    owner: Pubkey,
    lamports: u64,
    data: Vec<u8>,
    is_signer: bool,
    is_writable: bool,
}

impl TestAccount {
    fn new(key: Pubkey, owner: Pubkey, data: Vec<u8>) -> Self {
        Self {
            key,
            owner,
            lamports: 0,
            data,
            is_signer: false,
            is_writable: false,
        }
    }
    fn signer(mut self) -> Self {
        self.is_signer = true;
        self
    }
    fn writable(mut self) -> Self {
        self.is_writable = true;
        self
    }

    fn to_info<'a>(&'a mut self) -> AccountInfo<'a> {
        AccountInfo::new(
            &self.key,
            self.is_signer,
            self.is_writable,
            &mut self.lamports,
            &mut self.data,
            &self.owner,
            false,
            0,
        )
    }

    fn token_amount(&self) -> u64 {
        TokenAccount::unpack(&self.data).unwrap().amount
    }
}

fn make_token_account(mint: Pubkey, owner: Pubkey, amount: u64) -> Vec<u8> {
    let mut data = vec![0u8; TokenAccount::LEN];
    let mut account = TokenAccount::default();
    account.mint = mint;
    account.owner = owner;
    account.amount = amount;
    account.state = AccountState::Initialized;
    TokenAccount::pack(account, &mut data).unwrap();
    data
}

fn make_pyth(price: i64, expo: i32, conf: u64, pub_slot: u64) -> Vec<u8> {
    let mut data = vec![0u8; 208];
    data[20..24].copy_from_slice(&expo.to_le_bytes());
    data[176..184].copy_from_slice(&price.to_le_bytes());
    data[184..192].copy_from_slice(&conf.to_le_bytes());
    data[200..208].copy_from_slice(&pub_slot.to_le_bytes());
    data
}

fn make_pool(base_reserve: u64, quote_reserve: u64, twap_e6: u64, pub_slot: u64) -> Vec<u8> {
    let mut data = vec![0u8; amm::POOL_LEN];
    data[0..8].copy_from_slice(&amm::POOL_MAGIC.to_le_bytes());
    data[8..16].copy_from_slice(&base_reserve.to_le_bytes());
    data[16..24].copy_from_slice(&quote_reserve.to_le_bytes());
    data[24..32].copy_from_slice(&twap_e6.to_le_bytes());
    data[32..40].copy_from_slice(&pub_slot.to_le_bytes());
    data
}

fn make_clock(slot: u64, unix_timestamp: i64) -> Vec<u8> {
    let clock = Clock {
        slot,
        unix_timestamp,
        ..Clock::default()
    };
    bincode::serialize(&clock).unwrap()
}

fn make_ledger(
    owner: &Pubkey,
    liquidatable: bool,
    deposit_asset: usize,
    deposit_wad: u128,
    incentive_ray: u128,
) -> Vec<u8> {
    let mut data = vec![0u8; LEDGER_LEN];
    data[0..8].copy_from_slice(&LEDGER_MAGIC.to_le_bytes());
    data[8..40].copy_from_slice(owner.as_ref());
    data[40] = liquidatable as u8;
    let off = 48 + deposit_asset * 32;
    data[off..off + 16].copy_from_slice(&deposit_wad.to_le_bytes());
    data[off + 16..off + 32].copy_from_slice(&incentive_ray.to_le_bytes());
    data
}

// ---------------------------------------------------------------------------
// Instruction encoders
// ---------------------------------------------------------------------------

fn encode_init_market(
    stable_mint: &Pubkey,
    max_staleness_slots: u64,
    conf_filter_bps: u16,
    stable_decimals: u8,
    dust_wad: u128,
) -> Vec<u8> {
    let mut data = vec![0u8];
    data.extend_from_slice(stable_mint.as_ref());
    data.extend_from_slice(&max_staleness_slots.to_le_bytes());
    data.extend_from_slice(&conf_filter_bps.to_le_bytes());
    data.push(stable_decimals);
    data.extend_from_slice(&dust_wad.to_le_bytes());
    data
}

#[allow(clippy::too_many_arguments)]
fn encode_init_asset(
    asset: u8,
    amm_pool: &Pubkey,
    oracle: &Pubkey,
    collateral_mint: &Pubkey,
    collateral_vault: &Pubkey,
    asset_decimals: u8,
    base: u128,
    optimal: u128,
    delta: u128,
    slope1: u128,
    slope2: u128,
) -> Vec<u8> {
    let mut data = vec![1u8, asset];
    data.extend_from_slice(amm_pool.as_ref());
    data.extend_from_slice(oracle.as_ref());
    data.extend_from_slice(collateral_mint.as_ref());
    data.extend_from_slice(collateral_vault.as_ref());
    data.push(asset_decimals);
    for v in [base, optimal, delta, slope1, slope2] {
        data.extend_from_slice(&v.to_le_bytes());
    }
    data
}

fn encode_refresh(asset: u8) -> Vec<u8> {
    vec![2u8, asset]
}

fn encode_mint(asset: u8, amount: u64) -> Vec<u8> {
    let mut data = vec![3u8, asset];
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

fn encode_repay_interest(asset: u8, payment: u64) -> Vec<u8> {
    let mut data = vec![5u8, asset];
    data.extend_from_slice(&payment.to_le_bytes());
    data
}

fn encode_liquidate(
    target: &Pubkey,
    repay_asset: u8,
    collateral_asset: u8,
    max_payment: u64,
) -> Vec<u8> {
    let mut data = vec![6u8];
    data.extend_from_slice(target.as_ref());
    data.push(repay_asset);
    data.push(collateral_asset);
    data.extend_from_slice(&max_payment.to_le_bytes());
    data
}

fn encode_batch_liquidate(target: &Pubkey, collateral_asset: u8, max_payment: u64) -> Vec<u8> {
    let mut data = vec![7u8];
    data.extend_from_slice(target.as_ref());
    data.push(collateral_asset);
    data.extend_from_slice(&max_payment.to_le_bytes());
    data
}

// ---------------------------------------------------------------------------
// Fixture: market with a debt asset (0) and a collateral asset (1)
// ---------------------------------------------------------------------------

const T0: i64 = 1_000;

struct Fixture {
    program_id: Pubkey,
    admin: TestAccount,
    slab: TestAccount,
    mint: TestAccount,
    stable_vault: TestAccount,
    token_prog: TestAccount,
    clock: TestAccount,
    vault_pda: TestAccount,
    oracle0: TestAccount,
    pool0: TestAccount,
    oracle1: TestAccount,
    pool1: TestAccount,
    collateral_mint: Pubkey,
    collateral_vault: TestAccount,
    borrower: TestAccount,
}

fn setup() -> Fixture {
    let program_id = Pubkey::new_unique();
    let slab_key = Pubkey::new_unique();
    let (vault_pda_key, _) =
        Pubkey::find_program_address(&[b"vault", slab_key.as_ref()], &program_id);
    let mint_key = Pubkey::new_unique();
    let collateral_mint = Pubkey::new_unique();
    let system = solana_program::system_program::id();

    Fixture {
        program_id,
        admin: TestAccount::new(Pubkey::new_unique(), system, vec![]).signer(),
        slab: TestAccount::new(slab_key, program_id, vec![0u8; SLAB_LEN]).writable(),
        mint: TestAccount::new(mint_key, system, vec![]),
        stable_vault: TestAccount::new(
            Pubkey::new_unique(),
            spl_token::ID,
            make_token_account(mint_key, vault_pda_key, 0),
        )
        .writable(),
        token_prog: TestAccount::new(spl_token::ID, Pubkey::default(), vec![]),
        clock: TestAccount::new(
            solana_program::sysvar::clock::id(),
            solana_program::sysvar::id(),
            make_clock(100, T0),
        ),
        vault_pda: TestAccount::new(vault_pda_key, system, vec![]),
        oracle0: TestAccount::new(
            Pubkey::new_unique(),
            Pubkey::default(),
            make_pyth(1_000_000, -6, 1, 100),
        ),
        pool0: TestAccount::new(
            Pubkey::new_unique(),
            Pubkey::default(),
            make_pool(1_000, 1_000, 1_000_000, 100),
        ),
        oracle1: TestAccount::new(
            Pubkey::new_unique(),
            Pubkey::default(),
            make_pyth(1_000_000, -6, 1, 100),
        ),
        pool1: TestAccount::new(
            Pubkey::new_unique(),
            Pubkey::default(),
            make_pool(1_000, 1_000, 1_000_000, 100),
        ),
        collateral_mint,
        collateral_vault: TestAccount::new(
            Pubkey::new_unique(),
            spl_token::ID,
            make_token_account(collateral_mint, vault_pda_key, 1_000_000_000),
        )
        .writable(),
        borrower: TestAccount::new(Pubkey::new_unique(), system, vec![]).signer(),
    }
}

fn init_market(f: &mut Fixture) {
    let data = encode_init_market(&f.mint.key, 1_000, 500, 6, 1_000);
    let accs = vec![
        f.admin.to_info(),
        f.slab.to_info(),
        f.mint.to_info(),
        f.stable_vault.to_info(),
    ];
    process_instruction(&f.program_id, &accs, &data).unwrap();
}

fn init_assets(f: &mut Fixture) {
    // Asset 0: the debt asset, zero base, 5% slope1.
    let data = encode_init_asset(
        0,
        &f.pool0.key,
        &f.oracle0.key,
        &f.collateral_mint,
        &f.collateral_vault.key,
        6,
        0,
        RAY,
        RAY / 10,
        RAY / 20,
        RAY / 2,
    );
    let accs = vec![f.admin.to_info(), f.slab.to_info(), f.clock.to_info()];
    process_instruction(&f.program_id, &accs, &data).unwrap();

    // Asset 1: the collateral asset.
    let data = encode_init_asset(
        1,
        &f.pool1.key,
        &f.oracle1.key,
        &f.collateral_mint,
        &f.collateral_vault.key,
        6,
        0,
        RAY,
        RAY / 10,
        RAY / 20,
        RAY / 2,
    );
    let accs = vec![f.admin.to_info(), f.slab.to_info(), f.clock.to_info()];
    process_instruction(&f.program_id, &accs, &data).unwrap();
}

/// Prime the asset-0 rate at 5%, mint 100 tokens of debt for the borrower,
/// then advance the clock one year so ~5 tokens of interest accrue.
fn seasoned_market(f: &mut Fixture) {
    init_market(f);
    init_assets(f);

    f.clock.data = make_clock(100, T0 + 1);
    {
        let accs = vec![
            f.slab.to_info(),
            f.clock.to_info(),
            f.oracle0.to_info(),
            f.pool0.to_info(),
        ];
        process_instruction(&f.program_id, &accs, &encode_refresh(0)).unwrap();
    }
    {
        let accs = vec![
            f.borrower.to_info(),
            f.slab.to_info(),
            f.clock.to_info(),
            f.oracle0.to_info(),
            f.pool0.to_info(),
        ];
        process_instruction(&f.program_id, &accs, &encode_mint(0, 100_000_000)).unwrap();
    }
    f.clock.data = make_clock(100, T0 + 1 + SECONDS_PER_YEAR as i64);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn unknown_tag_is_rejected() {
    let mut f = setup();
    let accs = vec![f.slab.to_info()];
    assert_eq!(
        process_instruction(&f.program_id, &accs, &[99u8]),
        Err(ProgramError::InvalidInstructionData)
    );
}

#[test]
fn truncated_instruction_is_rejected() {
    let mut f = setup();
    let accs = vec![f.slab.to_info()];
    // MintDebt with a half-written amount.
    assert_eq!(
        process_instruction(&f.program_id, &accs, &[3u8, 0, 1, 2]),
        Err(ProgramError::InvalidInstructionData)
    );
}

#[test]
fn slab_must_be_program_owned() {
    let mut f = setup();
    f.slab.owner = Pubkey::new_unique();
    let data = encode_init_market(&f.mint.key, 1_000, 500, 6, 0);
    let accs = vec![
        f.admin.to_info(),
        f.slab.to_info(),
        f.mint.to_info(),
        f.stable_vault.to_info(),
    ];
    assert_eq!(
        process_instruction(&f.program_id, &accs, &data),
        Err(ProgramError::IllegalOwner)
    );
}

#[test]
fn slab_must_be_exactly_sized() {
    let mut f = setup();
    f.slab.data = vec![0u8; SLAB_LEN - 1];
    let data = encode_init_market(&f.mint.key, 1_000, 500, 6, 0);
    let accs = vec![
        f.admin.to_info(),
        f.slab.to_info(),
        f.mint.to_info(),
        f.stable_vault.to_info(),
    ];
    assert_eq!(
        process_instruction(&f.program_id, &accs, &data),
        Err(StabilityError::InvalidSlabLen.into())
    );
}

#[test]
fn refresh_requires_writable_slab() {
    let mut f = setup();
    init_market(&mut f);
    init_assets(&mut f);
    f.slab.is_writable = false;
    let accs = vec![
        f.slab.to_info(),
        f.clock.to_info(),
        f.oracle0.to_info(),
        f.pool0.to_info(),
    ];
    assert_eq!(
        process_instruction(&f.program_id, &accs, &encode_refresh(0)),
        Err(StabilityError::ExpectedWritable.into())
    );
}

#[test]
fn ops_before_init_fail() {
    let mut f = setup();
    let accs = vec![
        f.slab.to_info(),
        f.clock.to_info(),
        f.oracle0.to_info(),
        f.pool0.to_info(),
    ];
    assert_eq!(
        process_instruction(&f.program_id, &accs, &encode_refresh(0)),
        Err(StabilityError::NotInitialized.into())
    );
}

#[test]
fn oracle_confidence_filter_applies() {
    let mut f = setup();
    init_market(&mut f);
    init_assets(&mut f);
    // conf 10% of price against a 5% filter
    f.oracle0.data = make_pyth(1_000_000, -6, 100_000, 100);
    f.clock.data = make_clock(100, T0 + 1);
    let accs = vec![
        f.slab.to_info(),
        f.clock.to_info(),
        f.oracle0.to_info(),
        f.pool0.to_info(),
    ];
    assert_eq!(
        process_instruction(&f.program_id, &accs, &encode_refresh(0)),
        Err(StabilityError::OracleConfTooWide.into())
    );
}

#[test]
fn pool_snapshot_magic_is_checked() {
    let mut f = setup();
    init_market(&mut f);
    init_assets(&mut f);
    f.pool0.data[0] = 0;
    let accs = vec![
        f.slab.to_info(),
        f.clock.to_info(),
        f.oracle0.to_info(),
        f.pool0.to_info(),
    ];
    assert_eq!(
        process_instruction(&f.program_id, &accs, &encode_refresh(0)),
        Err(StabilityError::AmmInvalid.into())
    );
}

// ---------------------------------------------------------------------------
// Settlement flows
// ---------------------------------------------------------------------------

#[test]
fn repay_interest_moves_stable_into_the_vault() {
    let mut f = setup();
    seasoned_market(&mut f);

    let mut payer_ata = TestAccount::new(
        Pubkey::new_unique(),
        spl_token::ID,
        make_token_account(f.mint.key, f.borrower.key, 50_000_000),
    )
    .writable();

    // $2 against ~$5 of accrued interest.
    let accs = vec![
        f.borrower.to_info(),
        f.slab.to_info(),
        payer_ata.to_info(),
        f.stable_vault.to_info(),
        f.token_prog.to_info(),
        f.clock.to_info(),
        f.oracle0.to_info(),
        f.pool0.to_info(),
    ];
    process_instruction(&f.program_id, &accs, &encode_repay_interest(0, 2_000_000)).unwrap();
    drop(accs);

    assert_eq!(payer_ata.token_amount(), 48_000_000);
    assert_eq!(f.stable_vault.token_amount(), 2_000_000);

    // Scaled debt shrank; principal untouched.
    let engine = zc::engine_ref(&f.slab.data).unwrap();
    let idx = engine.find_position(&f.borrower.key.to_bytes()).unwrap();
    assert_eq!(engine.positions[idx as usize].principal_debt[0].get(), 100 * WAD);
}

#[test]
fn overpaying_interest_is_rejected() {
    let mut f = setup();
    seasoned_market(&mut f);

    let mut payer_ata = TestAccount::new(
        Pubkey::new_unique(),
        spl_token::ID,
        make_token_account(f.mint.key, f.borrower.key, 50_000_000),
    )
    .writable();

    // $10 against ~$5 of accrued interest.
    let accs = vec![
        f.borrower.to_info(),
        f.slab.to_info(),
        payer_ata.to_info(),
        f.stable_vault.to_info(),
        f.token_prog.to_info(),
        f.clock.to_info(),
        f.oracle0.to_info(),
        f.pool0.to_info(),
    ];
    assert_eq!(
        process_instruction(&f.program_id, &accs, &encode_repay_interest(0, 10_000_000)),
        Err(StabilityError::EngineInterestRepayNotPartial.into())
    );
}

#[test]
fn liquidation_settles_and_moves_both_legs() {
    let mut f = setup();
    seasoned_market(&mut f);

    let borrower_key = f.borrower.key;
    let mut ledger = TestAccount::new(
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        make_ledger(&borrower_key, true, 1, 1_000 * WAD, RAY + RAY / 10),
    );
    let liquidator_key = Pubkey::new_unique();
    let mut liquidator = TestAccount::new(
        liquidator_key,
        solana_program::system_program::id(),
        vec![],
    )
    .signer();
    let mut liq_stable_ata = TestAccount::new(
        Pubkey::new_unique(),
        spl_token::ID,
        make_token_account(f.mint.key, liquidator_key, 100_000_000),
    )
    .writable();
    let mut liq_collateral_ata = TestAccount::new(
        Pubkey::new_unique(),
        spl_token::ID,
        make_token_account(f.collateral_mint, liquidator_key, 0),
    )
    .writable();

    let data = encode_liquidate(&borrower_key, 0, 1, 100_000_000);
    let accs = vec![
        liquidator.to_info(),
        f.slab.to_info(),
        ledger.to_info(),
        liq_stable_ata.to_info(),
        f.stable_vault.to_info(),
        f.collateral_vault.to_info(),
        liq_collateral_ata.to_info(),
        f.vault_pda.to_info(),
        f.token_prog.to_info(),
        f.clock.to_info(),
        f.oracle0.to_info(),
        f.pool0.to_info(),
        f.oracle1.to_info(),
    ];
    process_instruction(&f.program_id, &accs, &data).unwrap();
    drop(accs);

    // ~$5 of interest collected from the liquidator, rounded up to base units.
    let paid = 100_000_000 - liq_stable_ata.token_amount();
    assert!((4_999_999..=5_000_001).contains(&paid));
    assert_eq!(f.stable_vault.token_amount(), paid);

    // Seized collateral carries the 10% incentive, floored to base units.
    let seized = liq_collateral_ata.token_amount();
    assert!((5_499_998..=5_500_001).contains(&seized));
    assert_eq!(f.collateral_vault.token_amount(), 1_000_000_000 - seized);

    // Interest burned off the position, principal intact.
    let engine = zc::engine_ref(&f.slab.data).unwrap();
    let idx = engine.find_position(&borrower_key.to_bytes()).unwrap();
    let (left, _) = engine
        .accrued_interest_at_index(idx, 0, 1_000_000)
        .unwrap();
    assert!(left.get() <= 2);
    assert_eq!(engine.positions[idx as usize].principal_debt[0].get(), 100 * WAD);
}

#[test]
fn liquidation_of_healthy_target_fails() {
    let mut f = setup();
    seasoned_market(&mut f);

    let borrower_key = f.borrower.key;
    let mut ledger = TestAccount::new(
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        make_ledger(&borrower_key, false, 1, 1_000 * WAD, RAY),
    );
    let mut liquidator =
        TestAccount::new(Pubkey::new_unique(), solana_program::system_program::id(), vec![])
            .signer();
    let liquidator_key = liquidator.key;
    let mut liq_stable_ata = TestAccount::new(
        Pubkey::new_unique(),
        spl_token::ID,
        make_token_account(f.mint.key, liquidator_key, 100_000_000),
    )
    .writable();
    let mut liq_collateral_ata = TestAccount::new(
        Pubkey::new_unique(),
        spl_token::ID,
        make_token_account(f.collateral_mint, liquidator_key, 0),
    )
    .writable();

    let data = encode_liquidate(&borrower_key, 0, 1, 100_000_000);
    let accs = vec![
        liquidator.to_info(),
        f.slab.to_info(),
        ledger.to_info(),
        liq_stable_ata.to_info(),
        f.stable_vault.to_info(),
        f.collateral_vault.to_info(),
        liq_collateral_ata.to_info(),
        f.vault_pda.to_info(),
        f.token_prog.to_info(),
        f.clock.to_info(),
        f.oracle0.to_info(),
        f.pool0.to_info(),
        f.oracle1.to_info(),
    ];
    assert_eq!(
        process_instruction(&f.program_id, &accs, &data),
        Err(StabilityError::EngineNotLiquidatable.into())
    );
}

#[test]
fn ledger_snapshot_must_match_the_target() {
    let mut f = setup();
    seasoned_market(&mut f);

    let borrower_key = f.borrower.key;
    // Snapshot describes some other borrower.
    let mut ledger = TestAccount::new(
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        make_ledger(&Pubkey::new_unique(), true, 1, 1_000 * WAD, RAY),
    );
    let mut liquidator =
        TestAccount::new(Pubkey::new_unique(), solana_program::system_program::id(), vec![])
            .signer();
    let liquidator_key = liquidator.key;
    let mut liq_stable_ata = TestAccount::new(
        Pubkey::new_unique(),
        spl_token::ID,
        make_token_account(f.mint.key, liquidator_key, 100_000_000),
    )
    .writable();
    let mut liq_collateral_ata = TestAccount::new(
        Pubkey::new_unique(),
        spl_token::ID,
        make_token_account(f.collateral_mint, liquidator_key, 0),
    )
    .writable();

    let data = encode_liquidate(&borrower_key, 0, 1, 100_000_000);
    let accs = vec![
        liquidator.to_info(),
        f.slab.to_info(),
        ledger.to_info(),
        liq_stable_ata.to_info(),
        f.stable_vault.to_info(),
        f.collateral_vault.to_info(),
        liq_collateral_ata.to_info(),
        f.vault_pda.to_info(),
        f.token_prog.to_info(),
        f.clock.to_info(),
        f.oracle0.to_info(),
        f.pool0.to_info(),
        f.oracle1.to_info(),
    ];
    assert_eq!(
        process_instruction(&f.program_id, &accs, &data),
        Err(StabilityError::InvalidLedgerSnapshot.into())
    );
}

#[test]
fn batch_liquidation_settles_via_the_account_tail() {
    let mut f = setup();
    seasoned_market(&mut f);

    let borrower_key = f.borrower.key;
    let mut ledger = TestAccount::new(
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        make_ledger(&borrower_key, true, 1, 1_000 * WAD, RAY),
    );
    let mut liquidator =
        TestAccount::new(Pubkey::new_unique(), solana_program::system_program::id(), vec![])
            .signer();
    let liquidator_key = liquidator.key;
    let mut liq_stable_ata = TestAccount::new(
        Pubkey::new_unique(),
        spl_token::ID,
        make_token_account(f.mint.key, liquidator_key, 100_000_000),
    )
    .writable();
    let mut liq_collateral_ata = TestAccount::new(
        Pubkey::new_unique(),
        spl_token::ID,
        make_token_account(f.collateral_mint, liquidator_key, 0),
    )
    .writable();

    // Tail: (oracle, pool) for asset 0, then asset 1, ascending.
    let data = encode_batch_liquidate(&borrower_key, 1, 100_000_000);
    let oracle1_info = f.oracle1.to_info();
    let accs = vec![
        liquidator.to_info(),
        f.slab.to_info(),
        ledger.to_info(),
        liq_stable_ata.to_info(),
        f.stable_vault.to_info(),
        f.collateral_vault.to_info(),
        liq_collateral_ata.to_info(),
        f.vault_pda.to_info(),
        f.token_prog.to_info(),
        f.clock.to_info(),
        oracle1_info.clone(),
        f.oracle0.to_info(),
        f.pool0.to_info(),
        oracle1_info,
        f.pool1.to_info(),
    ];
    process_instruction(&f.program_id, &accs, &data).unwrap();
    drop(accs);

    // Only asset 0 bears debt; its ~$5 of interest settles in one pass.
    let paid = 100_000_000 - liq_stable_ata.token_amount();
    assert!((4_999_999..=5_000_001).contains(&paid));
    assert_eq!(liq_collateral_ata.token_amount(), paid);

    let engine = zc::engine_ref(&f.slab.data).unwrap();
    let idx = engine.find_position(&borrower_key.to_bytes()).unwrap();
    let (left, _) = engine
        .accrued_interest_at_index(idx, 0, 1_000_000)
        .unwrap();
    assert!(left.get() <= 2);
}
