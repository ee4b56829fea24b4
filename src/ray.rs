// ============================================================================
// BPF-Safe Fixed-Point Types (Ray / Wad)
// ============================================================================
//
// CRITICAL: Rust 1.77/1.78 changed i128/u128 alignment from 8 to 16 bytes on
// x86_64, but BPF/SBF still uses 8-byte alignment. Storing raw u128 in the
// slab would produce different struct layouts on-chain vs. off-chain.
//
// Ray (27 decimals, rates and indices) and Wad (18 decimals, token amounts)
// wrap [u64; 2] in little-endian limb order so the slab layout is identical
// on every target. Arithmetic widens through U256 so a full-precision
// 27-decimal multiply can never silently truncate.

use uint::construct_uint;

construct_uint! {
    /// 256-bit intermediate for ray/wad multiply-divide.
    pub struct U256(4);
}

/// 1.0 in ray precision (27 decimals).
pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;

/// 1.0 in wad precision (18 decimals).
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Percentage factor: 100.00% expressed in basis points.
pub const PERCENT_FACTOR: u128 = 10_000;

/// floor(a * b / denom) with a 256-bit intermediate.
/// Returns None on division by zero or if the quotient exceeds u128.
#[inline]
pub fn mul_div(a: u128, b: u128, denom: u128) -> Option<u128> {
    if denom == 0 {
        return None;
    }
    let num = U256::from(a) * U256::from(b);
    let q = num / U256::from(denom);
    if q > U256::from(u128::MAX) {
        return None;
    }
    Some(q.as_u128())
}

// ============================================================================
// Ray - 27-decimal fixed point (rates, indices, price ratios)
// ============================================================================

/// BPF-safe ray value using [u64; 2] for consistent 8-byte alignment.
/// Layout: [lo, hi] in little-endian order.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ray([u64; 2]);

impl Ray {
    pub const ZERO: Self = Self([0, 0]);
    /// 1.0 ray (exact parity / index origin).
    pub const ONE: Self = Self::new(RAY);

    #[inline]
    pub const fn new(val: u128) -> Self {
        Self([val as u64, (val >> 64) as u64])
    }

    #[inline]
    pub const fn get(self) -> u128 {
        ((self.0[1] as u128) << 64) | (self.0[0] as u128)
    }

    #[inline]
    pub fn set(&mut self, val: u128) {
        self.0[0] = val as u64;
        self.0[1] = (val >> 64) as u64;
    }

    #[inline]
    pub const fn to_limbs(self) -> [u64; 2] {
        self.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0[0] == 0 && self.0[1] == 0
    }

    #[inline]
    pub fn checked_add(self, rhs: Ray) -> Option<Self> {
        self.get().checked_add(rhs.get()).map(Self::new)
    }

    #[inline]
    pub fn checked_sub(self, rhs: Ray) -> Option<Self> {
        self.get().checked_sub(rhs.get()).map(Self::new)
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Ray) -> Self {
        Self::new(self.get().saturating_sub(rhs.get()))
    }

    /// floor(self * rhs / RAY)
    #[inline]
    pub fn ray_mul(self, rhs: Ray) -> Option<Self> {
        mul_div(self.get(), rhs.get(), RAY).map(Self::new)
    }

    /// floor(self * RAY / rhs)
    #[inline]
    pub fn ray_div(self, rhs: Ray) -> Option<Self> {
        mul_div(self.get(), RAY, rhs.get()).map(Self::new)
    }

    /// floor(self * bps / PERCENT_FACTOR)
    #[inline]
    pub fn percent_mul(self, bps: u64) -> Option<Self> {
        mul_div(self.get(), bps as u128, PERCENT_FACTOR).map(Self::new)
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::ZERO
    }
}

impl core::fmt::Debug for Ray {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Ray({})", self.get())
    }
}

impl core::fmt::Display for Ray {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl From<u128> for Ray {
    fn from(val: u128) -> Self {
        Self::new(val)
    }
}

impl PartialOrd for Ray {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ray {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.get().cmp(&other.get())
    }
}

// ============================================================================
// Wad - 18-decimal fixed point (token amounts, debt balances)
// ============================================================================

/// BPF-safe wad value using [u64; 2] for consistent 8-byte alignment.
/// Layout: [lo, hi] in little-endian order.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Wad([u64; 2]);

impl Wad {
    pub const ZERO: Self = Self([0, 0]);
    /// 1.0 wad (one whole token).
    pub const ONE: Self = Self::new(WAD);

    #[inline]
    pub const fn new(val: u128) -> Self {
        Self([val as u64, (val >> 64) as u64])
    }

    #[inline]
    pub const fn get(self) -> u128 {
        ((self.0[1] as u128) << 64) | (self.0[0] as u128)
    }

    #[inline]
    pub fn set(&mut self, val: u128) {
        self.0[0] = val as u64;
        self.0[1] = (val >> 64) as u64;
    }

    #[inline]
    pub const fn to_limbs(self) -> [u64; 2] {
        self.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0[0] == 0 && self.0[1] == 0
    }

    #[inline]
    pub fn checked_add(self, rhs: Wad) -> Option<Self> {
        self.get().checked_add(rhs.get()).map(Self::new)
    }

    #[inline]
    pub fn checked_sub(self, rhs: Wad) -> Option<Self> {
        self.get().checked_sub(rhs.get()).map(Self::new)
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Wad) -> Self {
        Self::new(self.get().saturating_sub(rhs.get()))
    }

    /// Scale a wad amount up by a ray index: floor(self * index / RAY).
    #[inline]
    pub fn ray_mul(self, index: Ray) -> Option<Self> {
        mul_div(self.get(), index.get(), RAY).map(Self::new)
    }

    /// Scale a wad amount down by a ray index: floor(self * RAY / index).
    #[inline]
    pub fn ray_div(self, index: Ray) -> Option<Self> {
        mul_div(self.get(), RAY, index.get()).map(Self::new)
    }
}

impl Default for Wad {
    fn default() -> Self {
        Self::ZERO
    }
}

impl core::fmt::Debug for Wad {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Wad({})", self.get())
    }
}

impl core::fmt::Display for Wad {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl From<u128> for Wad {
    fn from(val: u128) -> Self {
        Self::new(val)
    }
}

impl PartialOrd for Wad {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Wad {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.get().cmp(&other.get())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    #[test]
    fn limb_round_trip() {
        let vals: [u128; 6] = [
            0,
            1,
            u128::MAX,
            RAY,
            (1u128 << 64) + 42,
            0x0102_0304_0506_0708_090A_0B0C_0D0E_0F10,
        ];
        for &v in &vals {
            assert_eq!(Ray::new(v).get(), v);
            assert_eq!(Wad::new(v).get(), v);
        }
        assert_eq!(Ray::new((1u128 << 64) + 42).to_limbs(), [42, 1]);
    }

    #[test]
    fn mul_div_golden() {
        // Full-precision product that overflows u128 before division.
        assert_eq!(mul_div(RAY, RAY, RAY), Some(RAY));
        assert_eq!(mul_div(2 * RAY, 3 * RAY, RAY), Some(6 * RAY));
        // Truncation toward zero.
        assert_eq!(mul_div(1, 1, 2), Some(0));
        assert_eq!(mul_div(7, 3, 2), Some(10));
        // Division by zero and quotient overflow.
        assert_eq!(mul_div(1, 1, 0), None);
        assert_eq!(mul_div(u128::MAX, 2, 1), None);
    }

    #[test]
    fn ray_mul_identity() {
        let half = Ray::new(RAY / 2);
        assert_eq!(half.ray_mul(Ray::ONE), Some(half));
        assert_eq!(half.ray_div(Ray::ONE), Some(half));
        assert_eq!(Ray::ONE.ray_mul(Ray::ONE), Some(Ray::ONE));
    }

    #[test]
    fn percent_mul_dampener() {
        // 125.00% of 1.0 ray = 1.25 ray
        let damped = Ray::ONE.percent_mul(12_500).unwrap();
        assert_eq!(damped.get(), RAY / 4 * 5);
    }

    #[test]
    fn wad_scaling_round_trip() {
        let amount = Wad::new(100 * WAD);
        let index = Ray::new(RAY + RAY / 20); // 1.05
        let scaled = amount.ray_div(index).unwrap();
        let back = scaled.ray_mul(index).unwrap();
        // One ulp of truncation is acceptable; never above the input.
        assert!(back <= amount);
        assert!(amount.get() - back.get() <= 1);
    }
}
