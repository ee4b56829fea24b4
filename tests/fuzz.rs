use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use stability_prog::engine::{
    EngineParams, FixedLedger, RateConfig, StabilityEngine, MAX_POSITIONS, SECONDS_PER_YEAR,
};
use stability_prog::ray::{Ray, Wad, RAY, WAD};

const E6: u64 = 1_000_000;

fn default_config() -> RateConfig {
    RateConfig {
        debt_rate_base: Ray::new(RAY / 100),
        optimal_price_rate: Ray::ONE,
        excess_price_rate_delta: Ray::new(RAY / 10),
        rate_slope1: Ray::new(RAY / 20),
        rate_slope2: Ray::new(RAY / 2),
    }
}

/// Sum of all occupied positions' scaled debt must equal the per-asset
/// aggregate the engine maintains incrementally.
fn check_conservation(engine: &StabilityEngine, asset: u8) -> bool {
    let mut sum = Wad::ZERO;
    for idx in 0..MAX_POSITIONS {
        if engine.is_used(idx) {
            sum = match sum.checked_add(engine.positions[idx].scaled_debt[asset as usize]) {
                Some(s) => s,
                None => return false,
            };
        }
    }
    sum == engine.assets[asset as usize].total_scaled_debt
}

#[test]
fn deterministic_fuzz_simulation() {
    let seed = [0xabu8; 16];
    let mut rng = XorShiftRng::from_seed(seed);
    let mut engine = StabilityEngine::new(EngineParams {
        dust_wad: Wad::new(1_000),
    });
    engine.init_asset(0, default_config(), 0).unwrap();

    let mut owners: Vec<[u8; 32]> = Vec::new();
    let mut now: u64 = 0;
    let mut last_index = Ray::ONE;

    for i in 0..2_000 {
        let op: u8 = rng.gen_range(0..5);
        // Prices drift around parity: 1.00 +/- 0.10
        let amm = E6 - 100_000 + rng.gen_range(0..200_000);
        let oracle = E6;
        now += rng.gen_range(0..SECONDS_PER_YEAR / 100);

        match op {
            0 => {
                // Mint for a fresh or existing owner
                let mut owner = [0u8; 32];
                owner[..8].copy_from_slice(&rng.gen_range(0u64..40).to_le_bytes());
                owner[31] = 1;
                let amount = Wad::new(rng.gen_range(1..1_000) * WAD);
                if engine.mint_debt(&owner, 0, amount, amm, oracle, now).is_ok() {
                    if !owners.contains(&owner) {
                        owners.push(owner);
                    }
                }
            }
            1 => {
                // Repay part of the live debt
                if !owners.is_empty() {
                    let owner = owners[rng.gen_range(0..owners.len())];
                    if let Ok(live) = engine.debt_amount(&owner, 0, amm, oracle, now) {
                        if !live.is_zero() {
                            let amount = Wad::new(1 + rng.gen_range(0..live.get()));
                            let _ = engine.repay_debt(&owner, 0, amount, amm, oracle, now);
                        }
                    }
                }
            }
            2 => {
                // Crank the index
                let _ = engine.update_index(0, amm, oracle, now);
            }
            3 => {
                // Interest-only repay
                if !owners.is_empty() {
                    let owner = owners[rng.gen_range(0..owners.len())];
                    if let Ok((_, value)) = engine.accrued_interest(&owner, 0, amm, oracle, now) {
                        if value > 0 {
                            let payment = 1 + rng.gen_range(0..value);
                            let _ = engine.repay_interest(&owner, 0, payment, amm, oracle, now);
                        }
                    }
                }
            }
            4 => {
                // Interest liquidation against a generous ledger
                if !owners.is_empty() {
                    let owner = owners[rng.gen_range(0..owners.len())];
                    let ledger = FixedLedger {
                        deposit: Wad::new(1_000_000 * WAD),
                        liquidatable: true,
                        incentive: Ray::new(RAY + RAY / 20),
                    };
                    let _ = engine
                        .liquidate_interest(&ledger, &owner, 0, 1, u128::MAX, amm, oracle, E6, now);
                }
            }
            _ => {}
        }

        let index = engine.assets[0].debt_index;
        assert!(index >= last_index, "index regressed at step {}", i);
        last_index = index;
        assert!(check_conservation(&engine, 0), "conservation violated at step {}", i);
        assert!(engine.assets[0].last_update_ts <= now);
    }
}
