//! Stability: Single-file Solana program with an embedded stability-rate debt engine.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod engine;
pub mod ray;

// 1. mod constants
pub mod constants {
    use crate::engine::StabilityEngine;
    use crate::state::MarketConfig;
    use core::mem::{align_of, size_of};

    pub const MAGIC: u64 = 0x5354414252415445; // "STABRATE"
    pub const VERSION: u32 = 1;

    pub const HEADER_LEN: usize = 64;
    pub const CONFIG_LEN: usize = size_of::<MarketConfig>();
    pub const ENGINE_ALIGN: usize = align_of::<StabilityEngine>();

    pub const fn align_up(x: usize, a: usize) -> usize {
        (x + (a - 1)) & !(a - 1)
    }

    pub const ENGINE_OFF: usize = align_up(HEADER_LEN + CONFIG_LEN, ENGINE_ALIGN);
    pub const ENGINE_LEN: usize = size_of::<StabilityEngine>();
    pub const SLAB_LEN: usize = ENGINE_OFF + ENGINE_LEN;
}

// 2. mod zc (Zero-Copy unsafe island)
#[allow(unsafe_code)]
pub mod zc {
    use crate::constants::{ENGINE_ALIGN, ENGINE_LEN, ENGINE_OFF};
    use crate::engine::StabilityEngine;
    use solana_program::program_error::ProgramError;

    #[inline]
    pub fn engine_ref<'a>(data: &'a [u8]) -> Result<&'a StabilityEngine, ProgramError> {
        if data.len() < ENGINE_OFF + ENGINE_LEN {
            return Err(ProgramError::InvalidAccountData);
        }
        let ptr = unsafe { data.as_ptr().add(ENGINE_OFF) };
        if (ptr as usize) % ENGINE_ALIGN != 0 {
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(unsafe { &*(ptr as *const StabilityEngine) })
    }

    #[inline]
    pub fn engine_mut<'a>(data: &'a mut [u8]) -> Result<&'a mut StabilityEngine, ProgramError> {
        if data.len() < ENGINE_OFF + ENGINE_LEN {
            return Err(ProgramError::InvalidAccountData);
        }
        let ptr = unsafe { data.as_mut_ptr().add(ENGINE_OFF) };
        if (ptr as usize) % ENGINE_ALIGN != 0 {
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(unsafe { &mut *(ptr as *mut StabilityEngine) })
    }
}

// 3. mod error
pub mod error {
    use crate::engine::RateError;
    use solana_program::program_error::ProgramError;

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum StabilityError {
        InvalidMagic,
        InvalidVersion,
        AlreadyInitialized,
        NotInitialized,
        InvalidSlabLen,
        InvalidOracleKey,
        OracleStale,
        OracleConfTooWide,
        OracleInvalid,
        AmmInvalid,
        AmmNoLiquidity,
        InvalidVaultAta,
        InvalidMint,
        InvalidLedgerSnapshot,
        ExpectedSigner,
        ExpectedWritable,
        Unauthorized,
        AmountOverflow,
        // Engine errors mapped:
        EngineAlreadyInitialized,
        EngineNotInitialized,
        EngineInvalidOptimalRate,
        EngineInvalidPriceRateDelta,
        EngineInvalidPrice,
        EngineRateOverflow,
        EngineStabilityRateOverflow,
        EngineDebtIndexOverflow,
        EngineClockRegression,
        EngineZeroMint,
        EngineZeroRepay,
        EngineBurnAmountOverflow,
        EngineInterestIsZero,
        EngineInterestRepayNotPartial,
        EngineNotLiquidatable,
        EngineSeizedCollateralUnderflow,
        EnginePositionNotFound,
        EngineSlabFull,
        EngineAssetOutOfRange,
    }

    impl From<StabilityError> for ProgramError {
        fn from(e: StabilityError) -> Self {
            ProgramError::Custom(e as u32)
        }
    }

    pub fn map_rate_error(e: RateError) -> ProgramError {
        let err = match e {
            RateError::AlreadyInitialized => StabilityError::EngineAlreadyInitialized,
            RateError::NotInitialized => StabilityError::EngineNotInitialized,
            RateError::InvalidOptimalRate => StabilityError::EngineInvalidOptimalRate,
            RateError::InvalidPriceRateDelta => StabilityError::EngineInvalidPriceRateDelta,
            RateError::InvalidPrice => StabilityError::EngineInvalidPrice,
            RateError::RateOverflow => StabilityError::EngineRateOverflow,
            RateError::StabilityRateOverflow => StabilityError::EngineStabilityRateOverflow,
            RateError::DebtIndexOverflow => StabilityError::EngineDebtIndexOverflow,
            RateError::ClockRegression => StabilityError::EngineClockRegression,
            RateError::ZeroMint => StabilityError::EngineZeroMint,
            RateError::ZeroRepay => StabilityError::EngineZeroRepay,
            RateError::BurnAmountOverflow => StabilityError::EngineBurnAmountOverflow,
            RateError::InterestIsZero => StabilityError::EngineInterestIsZero,
            RateError::InterestRepayNotPartial => StabilityError::EngineInterestRepayNotPartial,
            RateError::NotLiquidatable => StabilityError::EngineNotLiquidatable,
            RateError::SeizedCollateralUnderflow => StabilityError::EngineSeizedCollateralUnderflow,
            RateError::PositionNotFound => StabilityError::EnginePositionNotFound,
            RateError::SlabFull => StabilityError::EngineSlabFull,
            RateError::AssetOutOfRange => StabilityError::EngineAssetOutOfRange,
        };
        ProgramError::Custom(err as u32)
    }
}

// 4. mod ix
pub mod ix {
    use crate::engine::RateConfig;
    use crate::ray::Ray;
    use solana_program::{program_error::ProgramError, pubkey::Pubkey};

    #[derive(Debug)]
    pub enum Instruction {
        InitMarket {
            stable_mint: Pubkey,
            max_staleness_slots: u64,
            conf_filter_bps: u16,
            stable_decimals: u8,
            dust_wad: u128,
        },
        InitAsset {
            asset: u8,
            amm_pool: Pubkey,
            oracle: Pubkey,
            collateral_mint: Pubkey,
            collateral_vault: Pubkey,
            asset_decimals: u8,
            config: RateConfig,
        },
        RefreshRate {
            asset: u8,
        },
        MintDebt {
            asset: u8,
            amount: u64,
        },
        RepayDebt {
            asset: u8,
            amount: u64,
        },
        RepayInterest {
            asset: u8,
            payment: u64,
        },
        LiquidateInterest {
            target: Pubkey,
            repay_asset: u8,
            collateral_asset: u8,
            max_payment: u64,
        },
        BatchLiquidateInterest {
            target: Pubkey,
            collateral_asset: u8,
            max_payment: u64,
        },
    }

    impl Instruction {
        pub fn decode(input: &[u8]) -> Result<Self, ProgramError> {
            let (&tag, mut rest) = input
                .split_first()
                .ok_or(ProgramError::InvalidInstructionData)?;

            match tag {
                0 => {
                    // InitMarket
                    let stable_mint = read_pubkey(&mut rest)?;
                    let max_staleness_slots = read_u64(&mut rest)?;
                    let conf_filter_bps = read_u16(&mut rest)?;
                    let stable_decimals = read_u8(&mut rest)?;
                    let dust_wad = read_u128(&mut rest)?;
                    Ok(Instruction::InitMarket {
                        stable_mint,
                        max_staleness_slots,
                        conf_filter_bps,
                        stable_decimals,
                        dust_wad,
                    })
                }
                1 => {
                    // InitAsset
                    let asset = read_u8(&mut rest)?;
                    let amm_pool = read_pubkey(&mut rest)?;
                    let oracle = read_pubkey(&mut rest)?;
                    let collateral_mint = read_pubkey(&mut rest)?;
                    let collateral_vault = read_pubkey(&mut rest)?;
                    let asset_decimals = read_u8(&mut rest)?;
                    let config = read_rate_config(&mut rest)?;
                    Ok(Instruction::InitAsset {
                        asset,
                        amm_pool,
                        oracle,
                        collateral_mint,
                        collateral_vault,
                        asset_decimals,
                        config,
                    })
                }
                2 => {
                    // RefreshRate
                    let asset = read_u8(&mut rest)?;
                    Ok(Instruction::RefreshRate { asset })
                }
                3 => {
                    // MintDebt
                    let asset = read_u8(&mut rest)?;
                    let amount = read_u64(&mut rest)?;
                    Ok(Instruction::MintDebt { asset, amount })
                }
                4 => {
                    // RepayDebt
                    let asset = read_u8(&mut rest)?;
                    let amount = read_u64(&mut rest)?;
                    Ok(Instruction::RepayDebt { asset, amount })
                }
                5 => {
                    // RepayInterest
                    let asset = read_u8(&mut rest)?;
                    let payment = read_u64(&mut rest)?;
                    Ok(Instruction::RepayInterest { asset, payment })
                }
                6 => {
                    // LiquidateInterest
                    let target = read_pubkey(&mut rest)?;
                    let repay_asset = read_u8(&mut rest)?;
                    let collateral_asset = read_u8(&mut rest)?;
                    let max_payment = read_u64(&mut rest)?;
                    Ok(Instruction::LiquidateInterest {
                        target,
                        repay_asset,
                        collateral_asset,
                        max_payment,
                    })
                }
                7 => {
                    // BatchLiquidateInterest
                    let target = read_pubkey(&mut rest)?;
                    let collateral_asset = read_u8(&mut rest)?;
                    let max_payment = read_u64(&mut rest)?;
                    Ok(Instruction::BatchLiquidateInterest {
                        target,
                        collateral_asset,
                        max_payment,
                    })
                }
                _ => Err(ProgramError::InvalidInstructionData),
            }
        }
    }

    fn read_u8(input: &mut &[u8]) -> Result<u8, ProgramError> {
        let (&val, rest) = input
            .split_first()
            .ok_or(ProgramError::InvalidInstructionData)?;
        *input = rest;
        Ok(val)
    }

    fn read_u16(input: &mut &[u8]) -> Result<u16, ProgramError> {
        if input.len() < 2 {
            return Err(ProgramError::InvalidInstructionData);
        }
        let (bytes, rest) = input.split_at(2);
        *input = rest;
        bytes
            .try_into()
            .map(u16::from_le_bytes)
            .map_err(|_| ProgramError::InvalidInstructionData)
    }

    fn read_u64(input: &mut &[u8]) -> Result<u64, ProgramError> {
        if input.len() < 8 {
            return Err(ProgramError::InvalidInstructionData);
        }
        let (bytes, rest) = input.split_at(8);
        *input = rest;
        bytes
            .try_into()
            .map(u64::from_le_bytes)
            .map_err(|_| ProgramError::InvalidInstructionData)
    }

    fn read_u128(input: &mut &[u8]) -> Result<u128, ProgramError> {
        if input.len() < 16 {
            return Err(ProgramError::InvalidInstructionData);
        }
        let (bytes, rest) = input.split_at(16);
        *input = rest;
        bytes
            .try_into()
            .map(u128::from_le_bytes)
            .map_err(|_| ProgramError::InvalidInstructionData)
    }

    fn read_pubkey(input: &mut &[u8]) -> Result<Pubkey, ProgramError> {
        if input.len() < 32 {
            return Err(ProgramError::InvalidInstructionData);
        }
        let (bytes, rest) = input.split_at(32);
        *input = rest;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ProgramError::InvalidInstructionData)?;
        Ok(Pubkey::new_from_array(arr))
    }

    fn read_rate_config(input: &mut &[u8]) -> Result<RateConfig, ProgramError> {
        Ok(RateConfig {
            debt_rate_base: Ray::new(read_u128(input)?),
            optimal_price_rate: Ray::new(read_u128(input)?),
            excess_price_rate_delta: Ray::new(read_u128(input)?),
            rate_slope1: Ray::new(read_u128(input)?),
            rate_slope2: Ray::new(read_u128(input)?),
        })
    }
}

// 5. mod accounts
pub mod accounts {
    use crate::error::StabilityError;
    use solana_program::{account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey};

    pub fn expect_len(accounts: &[AccountInfo], n: usize) -> Result<(), ProgramError> {
        if accounts.len() < n {
            return Err(ProgramError::NotEnoughAccountKeys);
        }
        Ok(())
    }

    pub fn expect_signer(ai: &AccountInfo) -> Result<(), ProgramError> {
        if !ai.is_signer {
            return Err(StabilityError::ExpectedSigner.into());
        }
        Ok(())
    }

    pub fn expect_writable(ai: &AccountInfo) -> Result<(), ProgramError> {
        if !ai.is_writable {
            return Err(StabilityError::ExpectedWritable.into());
        }
        Ok(())
    }

    pub fn expect_owner(ai: &AccountInfo, owner: &Pubkey) -> Result<(), ProgramError> {
        if ai.owner != owner {
            return Err(ProgramError::IllegalOwner);
        }
        Ok(())
    }

    pub fn expect_key(ai: &AccountInfo, expected: &Pubkey) -> Result<(), ProgramError> {
        if ai.key != expected {
            return Err(ProgramError::InvalidArgument);
        }
        Ok(())
    }

    pub fn derive_vault_authority(program_id: &Pubkey, slab_key: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[b"vault", slab_key.as_ref()], program_id)
    }
}

// 6. mod state
pub mod state {
    use crate::constants::{CONFIG_LEN, HEADER_LEN};
    use crate::engine::MAX_ASSETS;
    use bytemuck::{Pod, Zeroable};
    use core::cell::RefMut;
    use solana_program::account_info::AccountInfo;
    use solana_program::program_error::ProgramError;

    #[repr(C)]
    #[derive(Clone, Copy, Pod, Zeroable)]
    pub struct SlabHeader {
        pub magic: u64,
        pub version: u32,
        pub bump: u8,
        pub _padding: [u8; 3],
        pub admin: [u8; 32],
        pub _reserved: [u8; 16],
    }

    /// Oracle and vault bindings for one synthetic asset slot.
    #[repr(C)]
    #[derive(Clone, Copy, Pod, Zeroable)]
    pub struct AssetBinding {
        pub amm_pool: [u8; 32],
        pub oracle: [u8; 32],
        pub collateral_mint: [u8; 32],
        pub collateral_vault: [u8; 32],
        pub asset_decimals: u8,
        pub bound: u8,
        pub _padding: [u8; 6],
    }

    #[repr(C)]
    #[derive(Clone, Copy, Pod, Zeroable)]
    pub struct MarketConfig {
        pub stable_mint: [u8; 32],
        pub stable_vault: [u8; 32],
        pub max_staleness_slots: u64,
        pub conf_filter_bps: u16,
        pub vault_authority_bump: u8,
        pub stable_decimals: u8,
        pub _padding: [u8; 4],
        pub assets: [AssetBinding; MAX_ASSETS],
    }

    pub fn slab_data_mut<'a, 'b>(
        ai: &'b AccountInfo<'a>,
    ) -> Result<RefMut<'b, &'a mut [u8]>, ProgramError> {
        Ok(ai.try_borrow_mut_data()?)
    }

    pub fn read_header(data: &[u8]) -> SlabHeader {
        let mut h = SlabHeader::zeroed();
        let src = &data[..HEADER_LEN];
        let dst = bytemuck::bytes_of_mut(&mut h);
        dst.copy_from_slice(src);
        h
    }

    pub fn write_header(data: &mut [u8], h: &SlabHeader) {
        let src = bytemuck::bytes_of(h);
        let dst = &mut data[..HEADER_LEN];
        dst.copy_from_slice(src);
    }

    pub fn read_config(data: &[u8]) -> MarketConfig {
        let mut c = MarketConfig::zeroed();
        let src = &data[HEADER_LEN..HEADER_LEN + CONFIG_LEN];
        let dst = bytemuck::bytes_of_mut(&mut c);
        dst.copy_from_slice(src);
        c
    }

    pub fn write_config(data: &mut [u8], c: &MarketConfig) {
        let src = bytemuck::bytes_of(c);
        let dst = &mut data[HEADER_LEN..HEADER_LEN + CONFIG_LEN];
        dst.copy_from_slice(src);
    }
}

// 7. mod units
pub mod units {
    /// Token base units to wad (18 decimals). None if decimals > 18 or the
    /// scaled amount overflows.
    pub fn amount_to_wad(amount: u64, decimals: u8) -> Option<u128> {
        if decimals > 18 {
            return None;
        }
        let factor = 10u128.checked_pow((18 - decimals) as u32)?;
        (amount as u128).checked_mul(factor)
    }

    /// Wad to token base units, rounding down. Returns the amount and the
    /// sub-unit dust left behind.
    pub fn wad_to_amount_floor(wad: u128, decimals: u8) -> Option<(u64, u128)> {
        if decimals > 18 {
            return None;
        }
        let factor = 10u128.checked_pow((18 - decimals) as u32)?;
        let amount = wad / factor;
        if amount > u64::MAX as u128 {
            return None;
        }
        Some((amount as u64, wad % factor))
    }

    /// Wad to token base units, rounding up. Vault-bound payments round in
    /// the vault's favor.
    pub fn wad_to_amount_ceil(wad: u128, decimals: u8) -> Option<u64> {
        if decimals > 18 {
            return None;
        }
        let factor = 10u128.checked_pow((18 - decimals) as u32)?;
        let amount = wad.checked_add(factor - 1)? / factor;
        if amount > u64::MAX as u128 {
            return None;
        }
        Some(amount as u64)
    }
}

// 8. mod oracle
pub mod oracle {
    use crate::error::StabilityError;
    use arrayref::array_ref;
    use solana_program::{account_info::AccountInfo, program_error::ProgramError};

    pub fn read_pyth_price_e6(
        price_ai: &AccountInfo,
        now_slot: u64,
        max_staleness: u64,
        conf_bps: u16,
    ) -> Result<u64, ProgramError> {
        let data = price_ai.try_borrow_data()?;
        if data.len() < 208 {
            return Err(ProgramError::InvalidAccountData);
        }

        let expo = i32::from_le_bytes(*array_ref![data, 20, 4]);
        let price = i64::from_le_bytes(*array_ref![data, 176, 8]);
        let conf = u64::from_le_bytes(*array_ref![data, 184, 8]);
        let pub_slot = u64::from_le_bytes(*array_ref![data, 200, 8]);

        if price <= 0 {
            return Err(StabilityError::OracleInvalid.into());
        }

        let age = now_slot.saturating_sub(pub_slot);
        if age > max_staleness {
            return Err(StabilityError::OracleStale.into());
        }

        let price_u = price as u128;
        let lhs = (conf as u128) * 10_000;
        let rhs = price_u * (conf_bps as u128);
        if lhs > rhs {
            return Err(StabilityError::OracleConfTooWide.into());
        }

        let scale = expo + 6;
        let final_price_u128 = if scale >= 0 {
            let mul = 10u128.pow(scale as u32);
            price_u
                .checked_mul(mul)
                .ok_or(StabilityError::AmountOverflow)?
        } else {
            let div = 10u128.pow((-scale) as u32);
            price_u / div
        };

        if final_price_u128 == 0 {
            return Err(StabilityError::OracleInvalid.into());
        }
        if final_price_u128 > u64::MAX as u128 {
            return Err(StabilityError::AmountOverflow.into());
        }

        Ok(final_price_u128 as u64)
    }
}

// 9. mod amm
pub mod amm {
    use crate::error::StabilityError;
    use arrayref::array_ref;
    use solana_program::{account_info::AccountInfo, program_error::ProgramError};

    pub const POOL_MAGIC: u64 = 0x53544142504f4f4c; // "STABPOOL"
    pub const POOL_LEN: usize = 40;

    // Pool snapshot account, published by the AMM:
    //   [0..8]   magic
    //   [8..16]  base_reserve
    //   [16..24] quote_reserve
    //   [24..32] twap_price_e6
    //   [32..40] last_update_slot
    pub fn read_pool_twap_e6(
        pool_ai: &AccountInfo,
        now_slot: u64,
        max_staleness: u64,
    ) -> Result<u64, ProgramError> {
        let data = pool_ai.try_borrow_data()?;
        if data.len() < POOL_LEN {
            return Err(StabilityError::AmmInvalid.into());
        }

        let magic = u64::from_le_bytes(*array_ref![data, 0, 8]);
        if magic != POOL_MAGIC {
            return Err(StabilityError::AmmInvalid.into());
        }

        let base_reserve = u64::from_le_bytes(*array_ref![data, 8, 8]);
        let quote_reserve = u64::from_le_bytes(*array_ref![data, 16, 8]);
        if base_reserve == 0 || quote_reserve == 0 {
            return Err(StabilityError::AmmNoLiquidity.into());
        }

        let twap = u64::from_le_bytes(*array_ref![data, 24, 8]);
        if twap == 0 {
            return Err(StabilityError::AmmInvalid.into());
        }

        let pub_slot = u64::from_le_bytes(*array_ref![data, 32, 8]);
        let age = now_slot.saturating_sub(pub_slot);
        if age > max_staleness {
            return Err(StabilityError::OracleStale.into());
        }

        Ok(twap)
    }
}

// 10. mod ledger
pub mod ledger {
    use crate::engine::{CollateralLedger, MAX_ASSETS};
    use crate::error::StabilityError;
    use crate::ray::{Ray, Wad};
    use arrayref::array_ref;
    use solana_program::{account_info::AccountInfo, program_error::ProgramError};

    pub const LEDGER_MAGIC: u64 = 0x535441424c454447; // "STABLEDG"

    // Snapshot account published by the collateral program:
    //   [0..8]   magic
    //   [8..40]  owner
    //   [40]     liquidatable flag
    //   [41..48] reserved
    //   then per asset: deposit_wad u128, incentive_ray u128
    pub const LEDGER_LEN: usize = 48 + MAX_ASSETS * 32;

    /// Parsed collateral-side view of one borrower.
    pub struct LedgerView {
        pub liquidatable: bool,
        pub deposits: [u128; MAX_ASSETS],
        pub incentives: [u128; MAX_ASSETS],
    }

    impl CollateralLedger for LedgerView {
        fn collateral_deposit(&self, _owner: &[u8; 32], collateral_asset: u8) -> Wad {
            match self.deposits.get(collateral_asset as usize) {
                Some(&d) => Wad::new(d),
                None => Wad::ZERO,
            }
        }
        fn is_liquidatable(&self, _owner: &[u8; 32]) -> bool {
            self.liquidatable
        }
        fn liquidation_incentive(&self, collateral_asset: u8) -> Ray {
            match self.incentives.get(collateral_asset as usize) {
                Some(&i) => Ray::new(i),
                None => Ray::ZERO,
            }
        }
    }

    pub fn read_ledger_snapshot(
        ai: &AccountInfo,
        expected_owner: &[u8; 32],
    ) -> Result<LedgerView, ProgramError> {
        let data = ai.try_borrow_data()?;
        if data.len() < LEDGER_LEN {
            return Err(StabilityError::InvalidLedgerSnapshot.into());
        }

        let magic = u64::from_le_bytes(*array_ref![data, 0, 8]);
        if magic != LEDGER_MAGIC {
            return Err(StabilityError::InvalidLedgerSnapshot.into());
        }
        if array_ref![data, 8, 32] != expected_owner {
            return Err(StabilityError::InvalidLedgerSnapshot.into());
        }

        let liquidatable = data[40] != 0;
        let mut deposits = [0u128; MAX_ASSETS];
        let mut incentives = [0u128; MAX_ASSETS];
        for a in 0..MAX_ASSETS {
            let off = 48 + a * 32;
            deposits[a] = u128::from_le_bytes(*array_ref![data, off, 16]);
            incentives[a] = u128::from_le_bytes(*array_ref![data, off + 16, 16]);
        }

        Ok(LedgerView {
            liquidatable,
            deposits,
            incentives,
        })
    }
}

// 11. mod collateral
pub mod collateral {
    use solana_program::{account_info::AccountInfo, program_error::ProgramError};

    #[cfg(target_os = "solana")]
    use solana_program::program::{invoke, invoke_signed};

    #[cfg(not(target_os = "solana"))]
    use solana_program::program_pack::Pack;
    #[cfg(not(target_os = "solana"))]
    use spl_token::state::Account as TokenAccount;

    /// Pull a stable payment from the payer into the vault. Off-chain builds
    /// mutate the token accounts directly so the harness can run without a
    /// runtime.
    pub fn collect_payment<'a>(
        _token_program: &AccountInfo<'a>,
        source: &AccountInfo<'a>,
        dest: &AccountInfo<'a>,
        _authority: &AccountInfo<'a>,
        amount: u64,
    ) -> Result<(), ProgramError> {
        #[cfg(target_os = "solana")]
        {
            let ix = spl_token::instruction::transfer(
                _token_program.key,
                source.key,
                dest.key,
                _authority.key,
                &[],
                amount,
            )?;
            invoke(
                &ix,
                &[
                    source.clone(),
                    dest.clone(),
                    _authority.clone(),
                    _token_program.clone(),
                ],
            )
        }
        #[cfg(not(target_os = "solana"))]
        {
            let mut src_data = source.try_borrow_mut_data()?;
            let mut src_state = TokenAccount::unpack(&src_data)?;
            src_state.amount = src_state
                .amount
                .checked_sub(amount)
                .ok_or(ProgramError::InsufficientFunds)?;
            TokenAccount::pack(src_state, &mut src_data)?;

            let mut dst_data = dest.try_borrow_mut_data()?;
            let mut dst_state = TokenAccount::unpack(&dst_data)?;
            dst_state.amount = dst_state
                .amount
                .checked_add(amount)
                .ok_or(ProgramError::InvalidAccountData)?;
            TokenAccount::pack(dst_state, &mut dst_data)?;
            Ok(())
        }
    }

    /// Pay seized collateral out of a PDA-owned vault.
    pub fn release_collateral<'a>(
        _token_program: &AccountInfo<'a>,
        source: &AccountInfo<'a>,
        dest: &AccountInfo<'a>,
        _authority: &AccountInfo<'a>,
        amount: u64,
        _signer_seeds: &[&[&[u8]]],
    ) -> Result<(), ProgramError> {
        #[cfg(target_os = "solana")]
        {
            let ix = spl_token::instruction::transfer(
                _token_program.key,
                source.key,
                dest.key,
                _authority.key,
                &[],
                amount,
            )?;
            invoke_signed(
                &ix,
                &[
                    source.clone(),
                    dest.clone(),
                    _authority.clone(),
                    _token_program.clone(),
                ],
                _signer_seeds,
            )
        }
        #[cfg(not(target_os = "solana"))]
        {
            let mut src_data = source.try_borrow_mut_data()?;
            let mut src_state = TokenAccount::unpack(&src_data)?;
            src_state.amount = src_state
                .amount
                .checked_sub(amount)
                .ok_or(ProgramError::InsufficientFunds)?;
            TokenAccount::pack(src_state, &mut src_data)?;

            let mut dst_data = dest.try_borrow_mut_data()?;
            let mut dst_state = TokenAccount::unpack(&dst_data)?;
            dst_state.amount = dst_state
                .amount
                .checked_add(amount)
                .ok_or(ProgramError::InvalidAccountData)?;
            TokenAccount::pack(dst_state, &mut dst_data)?;
            Ok(())
        }
    }
}

// 12. mod processor
pub mod processor {
    use crate::{
        accounts, amm, collateral,
        constants::{MAGIC, SLAB_LEN, VERSION},
        engine::{EngineParams, PriceSnapshot, MAX_ASSETS},
        error::{map_rate_error, StabilityError},
        ix::Instruction,
        ledger, oracle,
        ray::Wad,
        state::{self, AssetBinding, MarketConfig, SlabHeader},
        units, zc,
    };
    use bytemuck::Zeroable;
    use solana_program::{
        account_info::AccountInfo,
        entrypoint::ProgramResult,
        msg,
        program_error::ProgramError,
        program_pack::Pack,
        pubkey::Pubkey,
        sysvar::{clock::Clock, Sysvar},
    };

    fn slab_guard(program_id: &Pubkey, slab: &AccountInfo, data: &[u8]) -> Result<(), ProgramError> {
        accounts::expect_owner(slab, program_id)?;
        if data.len() != SLAB_LEN {
            return Err(StabilityError::InvalidSlabLen.into());
        }
        Ok(())
    }

    fn require_initialized(data: &[u8]) -> Result<(), ProgramError> {
        let h = state::read_header(data);
        if h.magic != MAGIC {
            return Err(StabilityError::NotInitialized.into());
        }
        if h.version != VERSION {
            return Err(StabilityError::InvalidVersion.into());
        }
        Ok(())
    }

    fn verify_vault(
        a_vault: &AccountInfo,
        expected_owner: &Pubkey,
        expected_mint: &Pubkey,
        expected_pubkey: &Pubkey,
    ) -> Result<(), ProgramError> {
        if a_vault.key != expected_pubkey {
            return Err(StabilityError::InvalidVaultAta.into());
        }
        if a_vault.owner != &spl_token::ID {
            return Err(StabilityError::InvalidVaultAta.into());
        }
        if a_vault.data_len() != spl_token::state::Account::LEN {
            return Err(StabilityError::InvalidVaultAta.into());
        }

        let data = a_vault.try_borrow_data()?;
        let tok = spl_token::state::Account::unpack(&data)?;
        if tok.mint != *expected_mint {
            return Err(StabilityError::InvalidMint.into());
        }
        if tok.owner != *expected_owner {
            return Err(StabilityError::InvalidVaultAta.into());
        }
        Ok(())
    }

    fn unix_now(clock: &Clock) -> Result<u64, ProgramError> {
        u64::try_from(clock.unix_timestamp)
            .map_err(|_| StabilityError::EngineClockRegression.into())
    }

    fn bound_binding(config: &MarketConfig, asset: u8) -> Result<AssetBinding, ProgramError> {
        let binding = config
            .assets
            .get(asset as usize)
            .ok_or::<ProgramError>(StabilityError::EngineAssetOutOfRange.into())?;
        if binding.bound == 0 {
            return Err(StabilityError::EngineNotInitialized.into());
        }
        Ok(*binding)
    }

    /// Read the AMM and oracle legs for one asset against its bindings.
    fn read_price_pair(
        binding: &AssetBinding,
        a_oracle: &AccountInfo,
        a_amm: &AccountInfo,
        clock: &Clock,
        config: &MarketConfig,
    ) -> Result<(u64, u64), ProgramError> {
        if a_oracle.key != &Pubkey::new_from_array(binding.oracle) {
            return Err(StabilityError::InvalidOracleKey.into());
        }
        accounts::expect_key(a_amm, &Pubkey::new_from_array(binding.amm_pool))?;
        let oracle_price = oracle::read_pyth_price_e6(
            a_oracle,
            clock.slot,
            config.max_staleness_slots,
            config.conf_filter_bps,
        )?;
        let amm_price = amm::read_pool_twap_e6(a_amm, clock.slot, config.max_staleness_slots)?;
        Ok((amm_price, oracle_price))
    }

    fn vault_signer_seeds(slab_key: &Pubkey, bump: u8) -> ([u8; 1], Pubkey) {
        ([bump], *slab_key)
    }

    pub fn process_instruction<'a, 'b>(
        program_id: &Pubkey,
        accounts: &'b [AccountInfo<'a>],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = Instruction::decode(instruction_data)?;

        match instruction {
            Instruction::InitMarket {
                stable_mint,
                max_staleness_slots,
                conf_filter_bps,
                stable_decimals,
                dust_wad,
            } => {
                accounts::expect_len(accounts, 4)?;
                let a_admin = &accounts[0];
                let a_slab = &accounts[1];
                let a_mint = &accounts[2];
                let a_vault = &accounts[3];

                accounts::expect_signer(a_admin)?;
                accounts::expect_writable(a_slab)?;
                accounts::expect_key(a_mint, &stable_mint)?;
                if stable_decimals > 18 {
                    return Err(StabilityError::AmountOverflow.into());
                }

                let mut data = state::slab_data_mut(a_slab)?;
                slab_guard(program_id, a_slab, &data)?;

                let header = state::read_header(&data);
                if header.magic == MAGIC {
                    return Err(StabilityError::AlreadyInitialized.into());
                }

                let (auth, bump) = accounts::derive_vault_authority(program_id, a_slab.key);
                verify_vault(a_vault, &auth, a_mint.key, a_vault.key)?;

                for b in data.iter_mut() {
                    *b = 0;
                }

                let engine = zc::engine_mut(&mut data)?;
                engine.init_in_place(EngineParams {
                    dust_wad: Wad::new(dust_wad),
                });

                let config = MarketConfig {
                    stable_mint: a_mint.key.to_bytes(),
                    stable_vault: a_vault.key.to_bytes(),
                    max_staleness_slots,
                    conf_filter_bps,
                    vault_authority_bump: bump,
                    stable_decimals,
                    _padding: [0; 4],
                    assets: [AssetBinding::zeroed(); MAX_ASSETS],
                };
                state::write_config(&mut data, &config);

                let new_header = SlabHeader {
                    magic: MAGIC,
                    version: VERSION,
                    bump,
                    _padding: [0; 3],
                    admin: a_admin.key.to_bytes(),
                    _reserved: [0; 16],
                };
                state::write_header(&mut data, &new_header);
                msg!("stability: market initialized");
            }
            Instruction::InitAsset {
                asset,
                amm_pool,
                oracle,
                collateral_mint,
                collateral_vault,
                asset_decimals,
                config: rate_config,
            } => {
                accounts::expect_len(accounts, 3)?;
                let a_admin = &accounts[0];
                let a_slab = &accounts[1];
                let a_clock = &accounts[2];

                accounts::expect_signer(a_admin)?;
                accounts::expect_writable(a_slab)?;
                if asset_decimals > 18 {
                    return Err(StabilityError::AmountOverflow.into());
                }

                let mut data = state::slab_data_mut(a_slab)?;
                slab_guard(program_id, a_slab, &data)?;
                require_initialized(&data)?;

                let header = state::read_header(&data);
                if header.admin != a_admin.key.to_bytes() {
                    return Err(StabilityError::Unauthorized.into());
                }

                let mut config = state::read_config(&data);
                let slot = config
                    .assets
                    .get_mut(asset as usize)
                    .ok_or::<ProgramError>(StabilityError::EngineAssetOutOfRange.into())?;
                if slot.bound != 0 {
                    return Err(StabilityError::AlreadyInitialized.into());
                }

                let clock = Clock::from_account_info(a_clock)?;
                let now = unix_now(&clock)?;

                let engine = zc::engine_mut(&mut data)?;
                engine
                    .init_asset(asset, rate_config, now)
                    .map_err(map_rate_error)?;

                *slot = AssetBinding {
                    amm_pool: amm_pool.to_bytes(),
                    oracle: oracle.to_bytes(),
                    collateral_mint: collateral_mint.to_bytes(),
                    collateral_vault: collateral_vault.to_bytes(),
                    asset_decimals,
                    bound: 1,
                    _padding: [0; 6],
                };
                state::write_config(&mut data, &config);
                msg!("stability: asset bound");
            }
            Instruction::RefreshRate { asset } => {
                accounts::expect_len(accounts, 4)?;
                let a_slab = &accounts[0];
                let a_clock = &accounts[1];
                let a_oracle = &accounts[2];
                let a_amm = &accounts[3];

                accounts::expect_writable(a_slab)?;

                let mut data = state::slab_data_mut(a_slab)?;
                slab_guard(program_id, a_slab, &data)?;
                require_initialized(&data)?;
                let config = state::read_config(&data);
                let binding = bound_binding(&config, asset)?;

                let clock = Clock::from_account_info(a_clock)?;
                let (amm_price, oracle_price) =
                    read_price_pair(&binding, a_oracle, a_amm, &clock, &config)?;
                let now = unix_now(&clock)?;

                let engine = zc::engine_mut(&mut data)?;
                engine
                    .update_index(asset, amm_price, oracle_price, now)
                    .map_err(map_rate_error)?;
                msg!("stability: rate refreshed");
            }
            Instruction::MintDebt { asset, amount } => {
                accounts::expect_len(accounts, 5)?;
                let a_borrower = &accounts[0];
                let a_slab = &accounts[1];
                let a_clock = &accounts[2];
                let a_oracle = &accounts[3];
                let a_amm = &accounts[4];

                accounts::expect_signer(a_borrower)?;
                accounts::expect_writable(a_slab)?;

                let mut data = state::slab_data_mut(a_slab)?;
                slab_guard(program_id, a_slab, &data)?;
                require_initialized(&data)?;
                let config = state::read_config(&data);
                let binding = bound_binding(&config, asset)?;

                let clock = Clock::from_account_info(a_clock)?;
                let (amm_price, oracle_price) =
                    read_price_pair(&binding, a_oracle, a_amm, &clock, &config)?;
                let now = unix_now(&clock)?;

                let amount_wad = units::amount_to_wad(amount, binding.asset_decimals)
                    .ok_or::<ProgramError>(StabilityError::AmountOverflow.into())?;

                let engine = zc::engine_mut(&mut data)?;
                engine
                    .mint_debt(
                        &a_borrower.key.to_bytes(),
                        asset,
                        Wad::new(amount_wad),
                        amm_price,
                        oracle_price,
                        now,
                    )
                    .map_err(map_rate_error)?;
                msg!("stability: debt minted");
            }
            Instruction::RepayDebt { asset, amount } => {
                accounts::expect_len(accounts, 5)?;
                let a_borrower = &accounts[0];
                let a_slab = &accounts[1];
                let a_clock = &accounts[2];
                let a_oracle = &accounts[3];
                let a_amm = &accounts[4];

                accounts::expect_signer(a_borrower)?;
                accounts::expect_writable(a_slab)?;

                let mut data = state::slab_data_mut(a_slab)?;
                slab_guard(program_id, a_slab, &data)?;
                require_initialized(&data)?;
                let config = state::read_config(&data);
                let binding = bound_binding(&config, asset)?;

                let clock = Clock::from_account_info(a_clock)?;
                let (amm_price, oracle_price) =
                    read_price_pair(&binding, a_oracle, a_amm, &clock, &config)?;
                let now = unix_now(&clock)?;

                let amount_wad = units::amount_to_wad(amount, binding.asset_decimals)
                    .ok_or::<ProgramError>(StabilityError::AmountOverflow.into())?;

                let engine = zc::engine_mut(&mut data)?;
                engine
                    .repay_debt(
                        &a_borrower.key.to_bytes(),
                        asset,
                        Wad::new(amount_wad),
                        amm_price,
                        oracle_price,
                        now,
                    )
                    .map_err(map_rate_error)?;
                msg!("stability: debt repaid");
            }
            Instruction::RepayInterest { asset, payment } => {
                accounts::expect_len(accounts, 8)?;
                let a_payer = &accounts[0];
                let a_slab = &accounts[1];
                let a_payer_ata = &accounts[2];
                let a_vault = &accounts[3];
                let a_token = &accounts[4];
                let a_clock = &accounts[5];
                let a_oracle = &accounts[6];
                let a_amm = &accounts[7];

                accounts::expect_signer(a_payer)?;
                accounts::expect_writable(a_slab)?;

                let mut data = state::slab_data_mut(a_slab)?;
                slab_guard(program_id, a_slab, &data)?;
                require_initialized(&data)?;
                let config = state::read_config(&data);
                let binding = bound_binding(&config, asset)?;

                let (auth, _) = accounts::derive_vault_authority(program_id, a_slab.key);
                verify_vault(
                    a_vault,
                    &auth,
                    &Pubkey::new_from_array(config.stable_mint),
                    &Pubkey::new_from_array(config.stable_vault),
                )?;

                let clock = Clock::from_account_info(a_clock)?;
                let (amm_price, oracle_price) =
                    read_price_pair(&binding, a_oracle, a_amm, &clock, &config)?;
                let now = unix_now(&clock)?;

                let payment_value = units::amount_to_wad(payment, config.stable_decimals)
                    .ok_or::<ProgramError>(StabilityError::AmountOverflow.into())?;

                collateral::collect_payment(a_token, a_payer_ata, a_vault, a_payer, payment)?;

                let engine = zc::engine_mut(&mut data)?;
                engine
                    .repay_interest(
                        &a_payer.key.to_bytes(),
                        asset,
                        payment_value,
                        amm_price,
                        oracle_price,
                        now,
                    )
                    .map_err(map_rate_error)?;
                msg!("stability: interest repaid");
            }
            Instruction::LiquidateInterest {
                target,
                repay_asset,
                collateral_asset,
                max_payment,
            } => {
                accounts::expect_len(accounts, 13)?;
                let a_liquidator = &accounts[0];
                let a_slab = &accounts[1];
                let a_ledger = &accounts[2];
                let a_liq_stable_ata = &accounts[3];
                let a_stable_vault = &accounts[4];
                let a_collateral_vault = &accounts[5];
                let a_liq_collateral_ata = &accounts[6];
                let a_vault_pda = &accounts[7];
                let a_token = &accounts[8];
                let a_clock = &accounts[9];
                let a_repay_oracle = &accounts[10];
                let a_repay_amm = &accounts[11];
                let a_collateral_oracle = &accounts[12];

                accounts::expect_signer(a_liquidator)?;
                accounts::expect_writable(a_slab)?;

                let mut data = state::slab_data_mut(a_slab)?;
                slab_guard(program_id, a_slab, &data)?;
                require_initialized(&data)?;
                let config = state::read_config(&data);
                let repay_binding = bound_binding(&config, repay_asset)?;
                let collateral_binding = bound_binding(&config, collateral_asset)?;

                let (auth, _) = accounts::derive_vault_authority(program_id, a_slab.key);
                accounts::expect_key(a_vault_pda, &auth)?;
                verify_vault(
                    a_stable_vault,
                    &auth,
                    &Pubkey::new_from_array(config.stable_mint),
                    &Pubkey::new_from_array(config.stable_vault),
                )?;
                verify_vault(
                    a_collateral_vault,
                    &auth,
                    &Pubkey::new_from_array(collateral_binding.collateral_mint),
                    &Pubkey::new_from_array(collateral_binding.collateral_vault),
                )?;

                let clock = Clock::from_account_info(a_clock)?;
                let (amm_price, repay_oracle_price) =
                    read_price_pair(&repay_binding, a_repay_oracle, a_repay_amm, &clock, &config)?;
                if a_collateral_oracle.key != &Pubkey::new_from_array(collateral_binding.oracle) {
                    return Err(StabilityError::InvalidOracleKey.into());
                }
                let collateral_oracle_price = oracle::read_pyth_price_e6(
                    a_collateral_oracle,
                    clock.slot,
                    config.max_staleness_slots,
                    config.conf_filter_bps,
                )?;
                let now = unix_now(&clock)?;

                let target_bytes = target.to_bytes();
                let view = ledger::read_ledger_snapshot(a_ledger, &target_bytes)?;

                let max_payment_value = units::amount_to_wad(max_payment, config.stable_decimals)
                    .ok_or::<ProgramError>(StabilityError::AmountOverflow.into())?;

                let engine = zc::engine_mut(&mut data)?;
                let quote = engine
                    .liquidate_interest(
                        &view,
                        &target_bytes,
                        repay_asset,
                        collateral_asset,
                        max_payment_value,
                        amm_price,
                        repay_oracle_price,
                        collateral_oracle_price,
                        now,
                    )
                    .map_err(map_rate_error)?;

                let pay_amount = units::wad_to_amount_ceil(quote.repay_value, config.stable_decimals)
                    .ok_or::<ProgramError>(StabilityError::AmountOverflow.into())?;
                collateral::collect_payment(
                    a_token,
                    a_liq_stable_ata,
                    a_stable_vault,
                    a_liquidator,
                    pay_amount,
                )?;

                let (seize_amount, _dust) = units::wad_to_amount_floor(
                    quote.seize_amount.get(),
                    collateral_binding.asset_decimals,
                )
                .ok_or::<ProgramError>(StabilityError::AmountOverflow.into())?;

                let (bump_arr, slab_key) =
                    vault_signer_seeds(a_slab.key, config.vault_authority_bump);
                let seed1: &[u8] = b"vault";
                let seed2: &[u8] = slab_key.as_ref();
                let seed3: &[u8] = &bump_arr;
                let seeds: [&[u8]; 3] = [seed1, seed2, seed3];
                let signer_seeds: [&[&[u8]]; 1] = [&seeds];

                collateral::release_collateral(
                    a_token,
                    a_collateral_vault,
                    a_liq_collateral_ata,
                    a_vault_pda,
                    seize_amount,
                    &signer_seeds,
                )?;
                msg!("stability: interest liquidated");
            }
            Instruction::BatchLiquidateInterest {
                target,
                collateral_asset,
                max_payment,
            } => {
                accounts::expect_len(accounts, 11)?;
                let a_liquidator = &accounts[0];
                let a_slab = &accounts[1];
                let a_ledger = &accounts[2];
                let a_liq_stable_ata = &accounts[3];
                let a_stable_vault = &accounts[4];
                let a_collateral_vault = &accounts[5];
                let a_liq_collateral_ata = &accounts[6];
                let a_vault_pda = &accounts[7];
                let a_token = &accounts[8];
                let a_clock = &accounts[9];
                let a_collateral_oracle = &accounts[10];

                accounts::expect_signer(a_liquidator)?;
                accounts::expect_writable(a_slab)?;

                let mut data = state::slab_data_mut(a_slab)?;
                slab_guard(program_id, a_slab, &data)?;
                require_initialized(&data)?;
                let config = state::read_config(&data);
                let collateral_binding = bound_binding(&config, collateral_asset)?;

                let (auth, _) = accounts::derive_vault_authority(program_id, a_slab.key);
                accounts::expect_key(a_vault_pda, &auth)?;
                verify_vault(
                    a_stable_vault,
                    &auth,
                    &Pubkey::new_from_array(config.stable_mint),
                    &Pubkey::new_from_array(config.stable_vault),
                )?;
                verify_vault(
                    a_collateral_vault,
                    &auth,
                    &Pubkey::new_from_array(collateral_binding.collateral_mint),
                    &Pubkey::new_from_array(collateral_binding.collateral_vault),
                )?;

                let clock = Clock::from_account_info(a_clock)?;
                if a_collateral_oracle.key != &Pubkey::new_from_array(collateral_binding.oracle) {
                    return Err(StabilityError::InvalidOracleKey.into());
                }
                let collateral_oracle_price = oracle::read_pyth_price_e6(
                    a_collateral_oracle,
                    clock.slot,
                    config.max_staleness_slots,
                    config.conf_filter_bps,
                )?;
                let now = unix_now(&clock)?;

                // The account tail carries an (oracle, amm) pair per bound
                // asset, in ascending asset order.
                let mut prices = [PriceSnapshot::default(); MAX_ASSETS];
                let mut cursor = 11usize;
                for asset in 0..MAX_ASSETS as u8 {
                    let binding = &config.assets[asset as usize];
                    if binding.bound == 0 {
                        continue;
                    }
                    accounts::expect_len(accounts, cursor + 2)?;
                    let a_oracle = &accounts[cursor];
                    let a_amm = &accounts[cursor + 1];
                    cursor += 2;
                    let (amm_price, oracle_price) =
                        read_price_pair(binding, a_oracle, a_amm, &clock, &config)?;
                    prices[asset as usize] = PriceSnapshot {
                        amm_price_e6: amm_price,
                        oracle_price_e6: oracle_price,
                    };
                }

                let target_bytes = target.to_bytes();
                let view = ledger::read_ledger_snapshot(a_ledger, &target_bytes)?;

                let max_payment_value = units::amount_to_wad(max_payment, config.stable_decimals)
                    .ok_or::<ProgramError>(StabilityError::AmountOverflow.into())?;

                let engine = zc::engine_mut(&mut data)?;
                let outcome = engine
                    .batch_liquidate_interest(
                        &view,
                        &target_bytes,
                        collateral_asset,
                        max_payment_value,
                        &prices,
                        collateral_oracle_price,
                        now,
                    )
                    .map_err(map_rate_error)?;

                let pay_amount =
                    units::wad_to_amount_ceil(outcome.total_repay_value, config.stable_decimals)
                        .ok_or::<ProgramError>(StabilityError::AmountOverflow.into())?;
                collateral::collect_payment(
                    a_token,
                    a_liq_stable_ata,
                    a_stable_vault,
                    a_liquidator,
                    pay_amount,
                )?;

                let (seize_amount, _dust) = units::wad_to_amount_floor(
                    outcome.total_seize_amount.get(),
                    collateral_binding.asset_decimals,
                )
                .ok_or::<ProgramError>(StabilityError::AmountOverflow.into())?;

                let (bump_arr, slab_key) =
                    vault_signer_seeds(a_slab.key, config.vault_authority_bump);
                let seed1: &[u8] = b"vault";
                let seed2: &[u8] = slab_key.as_ref();
                let seed3: &[u8] = &bump_arr;
                let seeds: [&[u8]; 3] = [seed1, seed2, seed3];
                let signer_seeds: [&[&[u8]]; 1] = [&seeds];

                collateral::release_collateral(
                    a_token,
                    a_collateral_vault,
                    a_liq_collateral_ata,
                    a_vault_pda,
                    seize_amount,
                    &signer_seeds,
                )?;
                msg!("stability: batch interest liquidated");
            }
        }
        Ok(())
    }
}

// 13. mod entrypoint
pub mod entrypoint {
    use crate::processor;
    use solana_program::{
        account_info::AccountInfo, entrypoint, entrypoint::ProgramResult, pubkey::Pubkey,
    };

    entrypoint!(process_instruction);

    fn process_instruction<'a>(
        program_id: &Pubkey,
        accounts: &'a [AccountInfo<'a>],
        instruction_data: &[u8],
    ) -> ProgramResult {
        processor::process_instruction(program_id, accounts, instruction_data)
    }
}
