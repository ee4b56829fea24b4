//! Stability-Rate Debt Engine for Synthetic Asset Positions
//!
//! Accrues interest on minted synthetic-asset debt at a rate driven by the
//! spread between each asset's AMM price and its oracle price:
//!
//! 1. Price rate = AMM price / oracle price, in ray (27 decimals)
//! 2. A 3-region curve maps the price rate to an annualized stability rate
//!    (premium dampens the base rate, discount steepens it)
//! 3. A per-asset debt index compounds lazily on access; positions store
//!    index-scaled debt so accrual costs O(1) regardless of borrower count
//! 4. Accrued interest (live debt minus principal) is repayable in stable
//!    value and seizable from under-collateralized borrowers
//!
//! All data structures are laid out in a single contiguous memory chunk,
//! suitable for a single Solana account.

#![allow(clippy::needless_range_loop)]

use crate::ray::{mul_div, Ray, Wad, RAY};

// ============================================================================
// Constants
// ============================================================================

// MAX_POSITIONS is feature-configured, not target-configured, so x86 and SBF
// builds use the same slab size for a given feature set.
#[cfg(feature = "test")]
pub const MAX_POSITIONS: usize = 64;

#[cfg(not(feature = "test"))]
pub const MAX_POSITIONS: usize = 1024;

pub const BITMAP_WORDS: usize = (MAX_POSITIONS + 63) / 64;

/// Synthetic assets a single market slab can carry.
pub const MAX_ASSETS: usize = 8;

/// Rate denominator: 365 days, matching the annualized rate convention.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Premium-region dampener applied to the base rate: base / (price_rate * 125%).
pub const BASE_RATE_DAMPENER_BPS: u64 = 12_500;

/// Hard bound on the computed annualized rate: 1000% in ray.
pub const MAX_STABILITY_RATE: u128 = 10 * RAY;

/// Longest interval a single index refresh will compound over. Idle time
/// beyond this is forgiven rather than accrued; accepting arbitrarily large
/// gaps would let the linear factor overflow.
pub const MAX_ACCRUAL_GAP: u64 = 10 * SECONDS_PER_YEAR;

/// Oracle and AMM prices are e6 fixed point and must stay well below the
/// range where ray conversion could overflow.
pub const MAX_PRICE_E6: u64 = 1_000_000_000_000_000; // $1B with e6 scale

/// e6 price scale.
pub const PRICE_SCALE_E6: u128 = 1_000_000;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateError {
    /// Asset slot already carries a rate config
    AlreadyInitialized,
    /// Rate operation on an uninitialized asset slot
    NotInitialized,
    /// Rate config with optimal_price_rate == 0
    InvalidOptimalRate,
    /// Rate config with excess_price_rate_delta == 0
    InvalidPriceRateDelta,
    /// Zero or out-of-range price input
    InvalidPrice,
    /// Arithmetic overflow in the rate curve
    RateOverflow,
    /// Computed rate exceeds MAX_STABILITY_RATE
    StabilityRateOverflow,
    /// Arithmetic overflow compounding the debt index
    DebtIndexOverflow,
    /// Timestamp earlier than the last recorded update
    ClockRegression,
    /// Mint of zero debt
    ZeroMint,
    /// Repay of zero debt
    ZeroRepay,
    /// Repay amount exceeds live debt
    BurnAmountOverflow,
    /// Interest-only operation on a position with no accrued interest
    InterestIsZero,
    /// Interest payment exceeds the interest outstanding
    InterestRepayNotPartial,
    /// Liquidation of a healthy position
    NotLiquidatable,
    /// Seizure exceeds the deposited collateral balance
    SeizedCollateralUnderflow,
    /// No position for this owner
    PositionNotFound,
    /// Position slab is full
    SlabFull,
    /// Asset id at or above MAX_ASSETS
    AssetOutOfRange,
}

pub type Result<T> = core::result::Result<T, RateError>;

// ============================================================================
// Data structures
// ============================================================================

/// Per-asset rate curve parameters, all in ray.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateConfig {
    /// Rate floor at exact parity.
    pub debt_rate_base: Ray,
    /// Price rate at which the curve switches regions (typically 1.0 ray).
    pub optimal_price_rate: Ray,
    /// Discount-region normalizer for the slope2 term.
    pub excess_price_rate_delta: Ray,
    /// First-order slope, applied in every region.
    pub rate_slope1: Ray,
    /// Second-order slope, discount region only.
    pub rate_slope2: Ray,
}

impl RateConfig {
    pub const ZERO: Self = Self {
        debt_rate_base: Ray::ZERO,
        optimal_price_rate: Ray::ZERO,
        excess_price_rate_delta: Ray::ZERO,
        rate_slope1: Ray::ZERO,
        rate_slope2: Ray::ZERO,
    };
}

/// Per-asset rate state. The index starts at 1.0 ray and only grows.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AssetSlot {
    pub config: RateConfig,
    /// Cumulative debt index in ray, monotone non-decreasing.
    pub debt_index: Ray,
    /// Annualized rate computed at the last refresh; applies to the interval
    /// that ends at the next refresh.
    pub current_rate: Ray,
    /// Sum of all positions' scaled debt in this asset.
    pub total_scaled_debt: Wad,
    /// Unix timestamp of the last index refresh.
    pub last_update_ts: u64,
    pub initialized: u8,
    pub _padding: [u8; 7],
}

impl AssetSlot {
    pub const ZERO: Self = Self {
        config: RateConfig::ZERO,
        debt_index: Ray::ZERO,
        current_rate: Ray::ZERO,
        total_scaled_debt: Wad::ZERO,
        last_update_ts: 0,
        initialized: 0,
        _padding: [0; 7],
    };
}

/// Per-borrower debt position. `scaled_debt * debt_index` is the live debt;
/// `principal_debt` is what was minted net of repayments, so the difference
/// is accrued interest.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub owner: [u8; 32],
    pub scaled_debt: [Wad; MAX_ASSETS],
    pub principal_debt: [Wad; MAX_ASSETS],
}

impl Position {
    pub const ZERO: Self = Self {
        owner: [0; 32],
        scaled_debt: [Wad::ZERO; MAX_ASSETS],
        principal_debt: [Wad::ZERO; MAX_ASSETS],
    };

    pub fn is_empty(&self) -> bool {
        self.scaled_debt.iter().all(|d| d.is_zero())
            && self.principal_debt.iter().all(|d| d.is_zero())
    }
}

/// Engine-wide parameters, fixed at market init.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    /// Live-debt remainders at or below this are forgiven on repay.
    pub dust_wad: Wad,
}

/// Current AMM and oracle price for one asset, both e6.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceSnapshot {
    pub amm_price_e6: u64,
    pub oracle_price_e6: u64,
}

/// Result of a settled (or quoted) interest liquidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeizureQuote {
    /// Interest repaid, in debt-asset wad.
    pub repay_amount: Wad,
    /// Stable value of the repaid interest, in wad.
    pub repay_value: u128,
    /// Collateral seized (incentive included), in collateral-asset wad.
    pub seize_amount: Wad,
}

/// Outcome of a batch interest liquidation across all of one borrower's
/// debt-bearing assets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Total stable value repaid, in wad.
    pub total_repay_value: u128,
    /// Total collateral seized, in collateral-asset wad.
    pub total_seize_amount: Wad,
    /// Number of assets settled.
    pub settled: u8,
}

// ============================================================================
// External collaborator seam
// ============================================================================

/// View of the collateral side of the protocol. The engine never holds
/// collateral; it asks this trait whether a borrower crossed the liquidation
/// threshold and how much of each collateral asset backs them.
pub trait CollateralLedger {
    /// Deposited balance of `collateral_asset` for `owner`, in wad.
    fn collateral_deposit(&self, owner: &[u8; 32], collateral_asset: u8) -> Wad;
    /// Whether `owner` is below the health threshold.
    fn is_liquidatable(&self, owner: &[u8; 32]) -> bool;
    /// Liquidation incentive multiplier for `collateral_asset`, in ray
    /// (1.0 ray = no bonus).
    fn liquidation_incentive(&self, collateral_asset: u8) -> Ray;
}

/// Fixed-answer ledger for standalone use and tests.
pub struct FixedLedger {
    pub deposit: Wad,
    pub liquidatable: bool,
    pub incentive: Ray,
}

impl CollateralLedger for FixedLedger {
    fn collateral_deposit(&self, _owner: &[u8; 32], _collateral_asset: u8) -> Wad {
        self.deposit
    }
    fn is_liquidatable(&self, _owner: &[u8; 32]) -> bool {
        self.liquidatable
    }
    fn liquidation_incentive(&self, _collateral_asset: u8) -> Ray {
        self.incentive
    }
}

// ============================================================================
// Pure rate math
// ============================================================================

#[inline]
fn ray_mul(a: u128, b: u128) -> Result<u128> {
    mul_div(a, b, RAY).ok_or(RateError::RateOverflow)
}

#[inline]
fn ray_div(a: u128, b: u128) -> Result<u128> {
    mul_div(a, RAY, b).ok_or(RateError::RateOverflow)
}

/// AMM price over oracle price, in ray. 1.0 ray is exact parity.
pub fn price_rate(amm_price_e6: u64, oracle_price_e6: u64) -> Result<Ray> {
    if amm_price_e6 == 0
        || oracle_price_e6 == 0
        || amm_price_e6 > MAX_PRICE_E6
        || oracle_price_e6 > MAX_PRICE_E6
    {
        return Err(RateError::InvalidPrice);
    }
    let ratio = mul_div(amm_price_e6 as u128, RAY, oracle_price_e6 as u128)
        .ok_or(RateError::RateOverflow)?;
    Ok(Ray::new(ratio))
}

/// 3-region stability rate curve.
///
/// - Parity (price_rate == optimal): base + price_rate * slope1
/// - Premium (price_rate > optimal): the base rate is dampened by dividing
///   through 125% of the price rate, and the slope1 term is anchored at
///   optimal - excess (saturating at zero), so deeper premium means a
///   cheaper rate and more minting pressure toward parity
/// - Discount (price_rate < optimal): base + slope1 plus a second-order
///   term that grows with the shortfall, discouraging further minting
pub fn stability_rate(config: &RateConfig, price_rate: Ray) -> Result<Ray> {
    let base = config.debt_rate_base.get();
    let optimal = config.optimal_price_rate.get();
    let delta = config.excess_price_rate_delta.get();
    let slope1 = config.rate_slope1.get();
    let slope2 = config.rate_slope2.get();
    let pr = price_rate.get();

    if optimal == 0 {
        return Err(RateError::InvalidOptimalRate);
    }
    if delta == 0 {
        return Err(RateError::InvalidPriceRateDelta);
    }

    let rate = if pr == optimal {
        base.checked_add(ray_mul(pr, slope1)?)
            .ok_or(RateError::RateOverflow)?
    } else if pr > optimal {
        let excess = pr - optimal;
        let dampener = mul_div(pr, BASE_RATE_DAMPENER_BPS as u128, 10_000)
            .ok_or(RateError::RateOverflow)?;
        let damped_base = ray_div(base, dampener)?;
        let anchor = optimal.saturating_sub(excess);
        damped_base
            .checked_add(ray_mul(anchor, slope1)?)
            .ok_or(RateError::RateOverflow)?
    } else {
        let shortfall_ratio = ray_div(optimal - pr, delta)?;
        let second_order = ray_mul(ray_mul(optimal, shortfall_ratio)?, slope2)?;
        base.checked_add(slope1)
            .and_then(|r| r.checked_add(second_order))
            .ok_or(RateError::RateOverflow)?
    };

    if rate > MAX_STABILITY_RATE {
        return Err(RateError::StabilityRateOverflow);
    }
    Ok(Ray::new(rate))
}

// ============================================================================
// Engine
// ============================================================================

#[repr(C)]
pub struct StabilityEngine {
    pub params: EngineParams,

    /// Per-asset rate config and index state.
    pub assets: [AssetSlot; MAX_ASSETS],

    /// Occupancy bitmap over position slots.
    pub used: [u64; BITMAP_WORDS],

    /// Number of occupied position slots.
    pub num_positions: u16,

    /// Head of the free list; u16::MAX means full.
    pub free_head: u16,

    pub _padding: [u8; 4],

    /// Free-list links, valid only for unoccupied slots.
    pub next_free: [u16; MAX_POSITIONS],

    pub positions: [Position; MAX_POSITIONS],
}

impl StabilityEngine {
    pub fn new(params: EngineParams) -> Self {
        let mut engine = Self {
            params,
            assets: [AssetSlot::ZERO; MAX_ASSETS],
            used: [0; BITMAP_WORDS],
            num_positions: 0,
            free_head: 0,
            _padding: [0; 4],
            next_free: [0; MAX_POSITIONS],
            positions: [Position::ZERO; MAX_POSITIONS],
        };
        for i in 0..MAX_POSITIONS {
            engine.next_free[i] = (i + 1) as u16;
        }
        engine.next_free[MAX_POSITIONS - 1] = u16::MAX; // Sentinel
        engine
    }

    /// Initialize over zeroed slab memory without constructing on the stack.
    pub fn init_in_place(&mut self, params: EngineParams) {
        self.params = params;
        // Zeroed memory already gives: empty bitmap, zero positions,
        // num_positions = 0, free_head = 0 (first free slot is 0).
        for i in 0..MAX_POSITIONS {
            self.next_free[i] = (i + 1) as u16;
        }
        self.next_free[MAX_POSITIONS - 1] = u16::MAX; // Sentinel
    }

    // ------------------------------------------------------------------
    // Slot management
    // ------------------------------------------------------------------

    pub fn is_used(&self, idx: usize) -> bool {
        if idx >= MAX_POSITIONS {
            return false;
        }
        (self.used[idx / 64] >> (idx % 64)) & 1 == 1
    }

    fn set_used(&mut self, idx: usize) {
        self.used[idx / 64] |= 1 << (idx % 64);
    }

    fn clear_used(&mut self, idx: usize) {
        self.used[idx / 64] &= !(1 << (idx % 64));
    }

    fn alloc_slot(&mut self) -> Result<u16> {
        if self.free_head == u16::MAX {
            return Err(RateError::SlabFull);
        }
        let idx = self.free_head;
        self.free_head = self.next_free[idx as usize];
        self.set_used(idx as usize);
        self.num_positions += 1;
        Ok(idx)
    }

    fn free_slot(&mut self, idx: u16) {
        self.clear_used(idx as usize);
        self.next_free[idx as usize] = self.free_head;
        self.free_head = idx;
        self.num_positions -= 1;
        self.positions[idx as usize] = Position::ZERO;
    }

    pub fn find_position(&self, owner: &[u8; 32]) -> Option<u16> {
        for word in 0..BITMAP_WORDS {
            let mut bits = self.used[word];
            while bits != 0 {
                let bit = bits.trailing_zeros() as usize;
                let idx = word * 64 + bit;
                if &self.positions[idx].owner == owner {
                    return Some(idx as u16);
                }
                bits &= bits - 1;
            }
        }
        None
    }

    fn find_or_create_position(&mut self, owner: &[u8; 32]) -> Result<u16> {
        if let Some(idx) = self.find_position(owner) {
            return Ok(idx);
        }
        let idx = self.alloc_slot()?;
        self.positions[idx as usize] = Position::ZERO;
        self.positions[idx as usize].owner = *owner;
        Ok(idx)
    }

    fn release_if_empty(&mut self, idx: u16) {
        if self.positions[idx as usize].is_empty() {
            self.free_slot(idx);
        }
    }

    fn asset_checked(&self, asset: u8) -> Result<&AssetSlot> {
        let slot = self
            .assets
            .get(asset as usize)
            .ok_or(RateError::AssetOutOfRange)?;
        if slot.initialized == 0 {
            return Err(RateError::NotInitialized);
        }
        Ok(slot)
    }

    // ------------------------------------------------------------------
    // Asset lifecycle
    // ------------------------------------------------------------------

    /// Bind a rate config to an asset slot. The debt index starts at 1.0 ray
    /// and the rate at zero; the first refresh prices the first interval.
    pub fn init_asset(&mut self, asset: u8, config: RateConfig, now: u64) -> Result<()> {
        let slot = self
            .assets
            .get_mut(asset as usize)
            .ok_or(RateError::AssetOutOfRange)?;
        if slot.initialized != 0 {
            return Err(RateError::AlreadyInitialized);
        }
        if config.optimal_price_rate.is_zero() {
            return Err(RateError::InvalidOptimalRate);
        }
        if config.excess_price_rate_delta.is_zero() {
            return Err(RateError::InvalidPriceRateDelta);
        }
        slot.config = config;
        slot.debt_index = Ray::ONE;
        slot.current_rate = Ray::ZERO;
        slot.total_scaled_debt = Wad::ZERO;
        slot.last_update_ts = now;
        slot.initialized = 1;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Index accrual
    // ------------------------------------------------------------------

    /// Compound the debt index over the elapsed interval and reprice the
    /// rate for the next one.
    ///
    /// The rate stored at the previous refresh is the one applied to the
    /// interval that just ended; the freshly computed rate only affects
    /// time after `now`. This keeps a rate change from retroactively
    /// repricing already-elapsed time.
    pub fn update_index(
        &mut self,
        asset: u8,
        amm_price_e6: u64,
        oracle_price_e6: u64,
        now: u64,
    ) -> Result<Ray> {
        let slot = self.asset_checked(asset)?;
        let last = slot.last_update_ts;
        if now < last {
            return Err(RateError::ClockRegression);
        }
        let elapsed = now - last;
        if elapsed == 0 {
            return Ok(slot.debt_index);
        }
        // An asset idle past the ceiling compounds only the capped interval;
        // the excess is forgiven so repayment stays possible.
        let elapsed = elapsed.min(MAX_ACCRUAL_GAP);

        let prior_rate = slot.current_rate.get();
        let index = slot.debt_index.get();

        // index *= 1 + rate * elapsed / SECONDS_PER_YEAR (linear within the
        // interval; exact at the one-year boundary)
        let linear = mul_div(prior_rate, elapsed as u128, SECONDS_PER_YEAR as u128)
            .ok_or(RateError::DebtIndexOverflow)?;
        let factor = RAY
            .checked_add(linear)
            .ok_or(RateError::DebtIndexOverflow)?;
        let new_index = mul_div(index, factor, RAY).ok_or(RateError::DebtIndexOverflow)?;

        let pr = price_rate(amm_price_e6, oracle_price_e6)?;
        let config = slot.config;
        let new_rate = stability_rate(&config, pr)?;

        let slot = &mut self.assets[asset as usize];
        slot.debt_index = Ray::new(new_index);
        slot.current_rate = new_rate;
        slot.last_update_ts = now;
        Ok(slot.debt_index)
    }

    // ------------------------------------------------------------------
    // Debt ledger
    // ------------------------------------------------------------------

    /// Record newly minted debt: scale the amount down by the current index
    /// and credit both scaled and principal balances.
    pub fn mint_debt(
        &mut self,
        owner: &[u8; 32],
        asset: u8,
        amount: Wad,
        amm_price_e6: u64,
        oracle_price_e6: u64,
        now: u64,
    ) -> Result<u16> {
        if amount.is_zero() {
            return Err(RateError::ZeroMint);
        }
        let index = self.update_index(asset, amm_price_e6, oracle_price_e6, now)?;
        let scaled = amount.ray_div(index).ok_or(RateError::DebtIndexOverflow)?;

        // All three sums are checked before any balance is written; an
        // overflow leaves the ledger untouched.
        let a = asset as usize;
        let (cur_scaled, cur_principal) = match self.find_position(owner) {
            Some(idx) => {
                let pos = &self.positions[idx as usize];
                (pos.scaled_debt[a], pos.principal_debt[a])
            }
            None => (Wad::ZERO, Wad::ZERO),
        };
        let new_scaled = cur_scaled
            .checked_add(scaled)
            .ok_or(RateError::DebtIndexOverflow)?;
        let new_principal = cur_principal
            .checked_add(amount)
            .ok_or(RateError::DebtIndexOverflow)?;
        let new_total = self.assets[a]
            .total_scaled_debt
            .checked_add(scaled)
            .ok_or(RateError::DebtIndexOverflow)?;

        let idx = self.find_or_create_position(owner)?;
        let pos = &mut self.positions[idx as usize];
        pos.scaled_debt[a] = new_scaled;
        pos.principal_debt[a] = new_principal;
        self.assets[a].total_scaled_debt = new_total;
        Ok(idx)
    }

    /// Live debt at the stored index, without refreshing.
    pub fn live_debt(&self, idx: u16, asset: u8) -> Result<Wad> {
        let slot = self.asset_checked(asset)?;
        let pos = &self.positions[idx as usize];
        pos.scaled_debt[asset as usize]
            .ray_mul(slot.debt_index)
            .ok_or(RateError::DebtIndexOverflow)
    }

    /// Refresh the index, then report the owner's live debt.
    pub fn debt_amount(
        &mut self,
        owner: &[u8; 32],
        asset: u8,
        amm_price_e6: u64,
        oracle_price_e6: u64,
        now: u64,
    ) -> Result<Wad> {
        self.update_index(asset, amm_price_e6, oracle_price_e6, now)?;
        match self.find_position(owner) {
            Some(idx) => self.live_debt(idx, asset),
            None => Ok(Wad::ZERO),
        }
    }

    /// Burn repaid debt. Interest is serviced before principal so that
    /// principal never exceeds live debt. A live remainder at or below the
    /// dust threshold is forgiven.
    pub fn repay_debt(
        &mut self,
        owner: &[u8; 32],
        asset: u8,
        amount: Wad,
        amm_price_e6: u64,
        oracle_price_e6: u64,
        now: u64,
    ) -> Result<Wad> {
        if amount.is_zero() {
            return Err(RateError::ZeroRepay);
        }
        let index = self.update_index(asset, amm_price_e6, oracle_price_e6, now)?;
        let idx = self
            .find_position(owner)
            .ok_or(RateError::PositionNotFound)?;
        let a = asset as usize;

        let scaled = self.positions[idx as usize].scaled_debt[a];
        let live = scaled.ray_mul(index).ok_or(RateError::DebtIndexOverflow)?;
        if amount > live {
            return Err(RateError::BurnAmountOverflow);
        }

        let scaled_repaid = amount.ray_div(index).ok_or(RateError::DebtIndexOverflow)?;
        let mut new_scaled = scaled.saturating_sub(scaled_repaid);

        let remainder = new_scaled
            .ray_mul(index)
            .ok_or(RateError::DebtIndexOverflow)?;
        if remainder <= self.params.dust_wad {
            new_scaled = Wad::ZERO;
        }

        let principal = self.positions[idx as usize].principal_debt[a];
        let interest = live.saturating_sub(principal);
        // Interest first: only the excess over accrued interest reduces principal.
        let new_principal = if amount > interest {
            principal.saturating_sub(amount.saturating_sub(interest))
        } else {
            principal
        };
        let new_principal = if new_scaled.is_zero() {
            Wad::ZERO
        } else {
            new_principal
        };

        let burned = scaled.saturating_sub(new_scaled);
        let pos = &mut self.positions[idx as usize];
        pos.scaled_debt[a] = new_scaled;
        pos.principal_debt[a] = new_principal;

        let slot = &mut self.assets[a];
        slot.total_scaled_debt = slot.total_scaled_debt.saturating_sub(burned);

        self.release_if_empty(idx);
        Ok(amount)
    }

    /// Accrued interest at the stored index: live debt minus principal, plus
    /// its stable value at the oracle price.
    pub fn accrued_interest_at_index(
        &self,
        idx: u16,
        asset: u8,
        oracle_price_e6: u64,
    ) -> Result<(Wad, u128)> {
        let slot = self.asset_checked(asset)?;
        let a = asset as usize;
        let pos = &self.positions[idx as usize];
        let live = pos.scaled_debt[a]
            .ray_mul(slot.debt_index)
            .ok_or(RateError::DebtIndexOverflow)?;
        let interest = live.saturating_sub(pos.principal_debt[a]);
        let value = mul_div(interest.get(), oracle_price_e6 as u128, PRICE_SCALE_E6)
            .ok_or(RateError::RateOverflow)?;
        Ok((interest, value))
    }

    /// Refresh the index, then report the owner's accrued interest as an
    /// asset amount and its stable value.
    pub fn accrued_interest(
        &mut self,
        owner: &[u8; 32],
        asset: u8,
        amm_price_e6: u64,
        oracle_price_e6: u64,
        now: u64,
    ) -> Result<(Wad, u128)> {
        self.update_index(asset, amm_price_e6, oracle_price_e6, now)?;
        let idx = self
            .find_position(owner)
            .ok_or(RateError::PositionNotFound)?;
        self.accrued_interest_at_index(idx, asset, oracle_price_e6)
    }

    /// Repay accrued interest (only) with a stable payment. The payment must
    /// not exceed the interest outstanding; principal is untouched. Returns
    /// the asset amount credited.
    pub fn repay_interest(
        &mut self,
        owner: &[u8; 32],
        asset: u8,
        payment_value: u128,
        amm_price_e6: u64,
        oracle_price_e6: u64,
        now: u64,
    ) -> Result<Wad> {
        if payment_value == 0 {
            return Err(RateError::ZeroRepay);
        }
        let index = self.update_index(asset, amm_price_e6, oracle_price_e6, now)?;
        let idx = self
            .find_position(owner)
            .ok_or(RateError::PositionNotFound)?;
        let (interest, interest_value) =
            self.accrued_interest_at_index(idx, asset, oracle_price_e6)?;
        if interest.is_zero() || interest_value == 0 {
            return Err(RateError::InterestIsZero);
        }
        if payment_value > interest_value {
            return Err(RateError::InterestRepayNotPartial);
        }

        let mut credited = Wad::new(
            mul_div(payment_value, PRICE_SCALE_E6, oracle_price_e6 as u128)
                .ok_or(RateError::RateOverflow)?,
        );
        if credited > interest {
            credited = interest;
        }
        self.reduce_scaled(idx, asset, credited, index)?;
        Ok(credited)
    }

    /// Reduce a position's scaled debt by an interest amount at the given
    /// index, leaving principal untouched.
    fn reduce_scaled(&mut self, idx: u16, asset: u8, amount: Wad, index: Ray) -> Result<()> {
        let a = asset as usize;
        let scaled_repaid = amount.ray_div(index).ok_or(RateError::DebtIndexOverflow)?;
        let pos = &mut self.positions[idx as usize];
        let burned = if scaled_repaid > pos.scaled_debt[a] {
            let all = pos.scaled_debt[a];
            pos.scaled_debt[a] = Wad::ZERO;
            all
        } else {
            pos.scaled_debt[a] = pos.scaled_debt[a].saturating_sub(scaled_repaid);
            scaled_repaid
        };
        let slot = &mut self.assets[a];
        slot.total_scaled_debt = slot.total_scaled_debt.saturating_sub(burned);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Interest liquidation
    // ------------------------------------------------------------------

    /// Quote an interest seizure without mutating. The repay value is the
    /// accrued-interest value capped at the liquidator's offer; the seizure
    /// converts that value through the collateral oracle price and applies
    /// the ledger's incentive. A seizure above the deposited balance fails,
    /// never clamps.
    pub fn compute_seizure<L: CollateralLedger>(
        &self,
        ledger: &L,
        idx: u16,
        repay_asset: u8,
        collateral_asset: u8,
        max_payment_value: u128,
        repay_oracle_e6: u64,
        collateral_oracle_e6: u64,
    ) -> Result<SeizureQuote> {
        if collateral_oracle_e6 == 0 || collateral_oracle_e6 > MAX_PRICE_E6 {
            return Err(RateError::InvalidPrice);
        }
        let (interest, interest_value) =
            self.accrued_interest_at_index(idx, repay_asset, repay_oracle_e6)?;
        if interest.is_zero() || interest_value == 0 {
            return Err(RateError::InterestIsZero);
        }

        let repay_value = interest_value.min(max_payment_value);
        let mut repay_amount = Wad::new(
            mul_div(repay_value, PRICE_SCALE_E6, repay_oracle_e6 as u128)
                .ok_or(RateError::RateOverflow)?,
        );
        if repay_amount > interest {
            repay_amount = interest;
        }

        let seize_base = Wad::new(
            mul_div(repay_value, PRICE_SCALE_E6, collateral_oracle_e6 as u128)
                .ok_or(RateError::RateOverflow)?,
        );
        let incentive = ledger.liquidation_incentive(collateral_asset);
        let seize_amount = seize_base
            .ray_mul(incentive)
            .ok_or(RateError::RateOverflow)?;

        let owner = self.positions[idx as usize].owner;
        let deposit = ledger.collateral_deposit(&owner, collateral_asset);
        if seize_amount > deposit {
            return Err(RateError::SeizedCollateralUnderflow);
        }

        Ok(SeizureQuote {
            repay_amount,
            repay_value,
            seize_amount,
        })
    }

    /// Settle one repay-asset/collateral-asset pair: refresh the index,
    /// check the health precondition, quote, then burn the interest.
    #[allow(clippy::too_many_arguments)]
    pub fn liquidate_interest<L: CollateralLedger>(
        &mut self,
        ledger: &L,
        owner: &[u8; 32],
        repay_asset: u8,
        collateral_asset: u8,
        max_payment_value: u128,
        amm_price_e6: u64,
        repay_oracle_e6: u64,
        collateral_oracle_e6: u64,
        now: u64,
    ) -> Result<SeizureQuote> {
        let index = self.update_index(repay_asset, amm_price_e6, repay_oracle_e6, now)?;
        let idx = self
            .find_position(owner)
            .ok_or(RateError::PositionNotFound)?;
        if !ledger.is_liquidatable(owner) {
            return Err(RateError::NotLiquidatable);
        }
        let quote = self.compute_seizure(
            ledger,
            idx,
            repay_asset,
            collateral_asset,
            max_payment_value,
            repay_oracle_e6,
            collateral_oracle_e6,
        )?;
        self.reduce_scaled(idx, repay_asset, quote.repay_amount, index)?;
        Ok(quote)
    }

    /// Settle interest across every debt-bearing asset of one borrower,
    /// all seized from a single collateral asset. Every per-asset seizure is
    /// computed before any is committed; one failure fails the whole batch.
    ///
    /// `prices[asset]` must hold valid AMM/oracle prices for every asset the
    /// borrower owes in; other entries are ignored.
    pub fn batch_liquidate_interest<L: CollateralLedger>(
        &mut self,
        ledger: &L,
        owner: &[u8; 32],
        collateral_asset: u8,
        max_payment_value: u128,
        prices: &[PriceSnapshot; MAX_ASSETS],
        collateral_oracle_e6: u64,
        now: u64,
    ) -> Result<BatchOutcome> {
        if collateral_oracle_e6 == 0 || collateral_oracle_e6 > MAX_PRICE_E6 {
            return Err(RateError::InvalidPrice);
        }
        let idx = self
            .find_position(owner)
            .ok_or(RateError::PositionNotFound)?;
        if !ledger.is_liquidatable(owner) {
            return Err(RateError::NotLiquidatable);
        }

        // Refresh every index the borrower owes in before quoting anything.
        for asset in 0..MAX_ASSETS as u8 {
            if self.positions[idx as usize].scaled_debt[asset as usize].is_zero() {
                continue;
            }
            let snap = prices[asset as usize];
            self.update_index(asset, snap.amm_price_e6, snap.oracle_price_e6, now)?;
        }

        // Quote pass: no mutation, aggregate seizure checked against the
        // deposit as it grows.
        let deposit = ledger.collateral_deposit(owner, collateral_asset);
        let mut quotes: [Option<SeizureQuote>; MAX_ASSETS] = [None; MAX_ASSETS];
        let mut remaining_value = max_payment_value;
        let mut total_seize = Wad::ZERO;
        let mut total_value: u128 = 0;
        let mut settled: u8 = 0;

        for asset in 0..MAX_ASSETS as u8 {
            let a = asset as usize;
            if self.positions[idx as usize].scaled_debt[a].is_zero() {
                continue;
            }
            if remaining_value == 0 {
                break;
            }
            let snap = prices[a];
            let quote = match self.compute_seizure(
                ledger,
                idx,
                asset,
                collateral_asset,
                remaining_value,
                snap.oracle_price_e6,
                collateral_oracle_e6,
            ) {
                Ok(q) => q,
                Err(RateError::InterestIsZero) => continue,
                Err(e) => return Err(e),
            };
            total_seize = total_seize
                .checked_add(quote.seize_amount)
                .ok_or(RateError::RateOverflow)?;
            if total_seize > deposit {
                return Err(RateError::SeizedCollateralUnderflow);
            }
            total_value = total_value
                .checked_add(quote.repay_value)
                .ok_or(RateError::RateOverflow)?;
            remaining_value -= quote.repay_value;
            quotes[a] = Some(quote);
            settled += 1;
        }

        if settled == 0 {
            return Err(RateError::InterestIsZero);
        }

        // Commit pass.
        for asset in 0..MAX_ASSETS as u8 {
            let a = asset as usize;
            if let Some(quote) = quotes[a] {
                let index = self.assets[a].debt_index;
                self.reduce_scaled(idx, asset, quote.repay_amount, index)?;
            }
        }

        Ok(BatchOutcome {
            total_repay_value: total_value,
            total_seize_amount: total_seize,
            settled,
        })
    }

    // ------------------------------------------------------------------
    // Aggregates
    // ------------------------------------------------------------------

    /// Aggregate live debt in one asset at the stored index.
    pub fn total_live_debt(&self, asset: u8) -> Result<Wad> {
        let slot = self.asset_checked(asset)?;
        slot.total_scaled_debt
            .ray_mul(slot.debt_index)
            .ok_or(RateError::DebtIndexOverflow)
    }
}

// ============================================================================
// Tests
// ============================================================================
