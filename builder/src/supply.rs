//! Rebase arithmetic over observed supply.
//!
//! The rebase formula scales a holder's pre-rebase amount by the ratio of the
//! expected supply (`max_supply * 10^decimal`) to the supply actually minted.
//! The intermediate product needs up to 384 bits, so the computation widens
//! to `U512` and narrows back with an explicit overflow check.

use ckb_inscription_types::{unit_factor, Error, LiveCell};
use numext_fixed_uint::prelude::UintConvert;
use numext_fixed_uint::{U256, U512};

fn u256_from_u128(value: u128) -> U256 {
    let mut limbs = [0u64; 4];
    limbs[0] = value as u64;
    limbs[1] = (value >> 64) as u64;
    U256(limbs)
}

fn u512_from_u128(value: u128) -> U512 {
    let (wide, _): (U512, bool) = u256_from_u128(value).convert_into();
    wide
}

fn u128_from_u512(value: &U512) -> Result<u128, Error> {
    if value.0[2..].iter().any(|limb| *limb != 0) {
        return Err(Error::Overflow("rebase amount"));
    }
    Ok(((value.0[1] as u128) << 64) | value.0[0] as u128)
}

/// `floor(pre_amount * max_supply * 10^decimal / actual_supply)`, integer
/// truncation, no rounding.
pub fn rebase_amount(
    pre_amount: u128,
    max_supply: u128,
    decimal: u8,
    actual_supply: u128,
) -> Result<u128, Error> {
    if actual_supply == 0 {
        return Err(Error::Overflow("rebase over zero supply"));
    }
    let scaled = u512_from_u128(pre_amount)
        * u512_from_u128(max_supply)
        * u512_from_u128(unit_factor(decimal)?)
        / u512_from_u128(actual_supply);
    u128_from_u512(&scaled)
}

/// Sum of the token amounts carried by `cells`.
pub fn total_supply(cells: &[LiveCell]) -> Result<u128, Error> {
    let mut total: u128 = 0;
    for cell in cells {
        total = total
            .checked_add(cell.token_amount()?)
            .ok_or(Error::Overflow("total supply"))?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn truncates_toward_zero() {
        // 30 * 1 * 1 / 7 = 4.28..
        assert_eq!(rebase_amount(30, 1, 0, 7), Ok(4));
    }

    #[test]
    fn doubles_when_half_the_expected_supply_was_minted() {
        let expected = 21_000_000u128 * 100_000_000;
        assert_eq!(
            rebase_amount(1_000 * 100_000_000, 21_000_000, 8, expected / 2),
            Ok(2 * 1_000 * 100_000_000)
        );
    }

    #[test]
    fn boundary_values_survive_the_widening() {
        assert_eq!(rebase_amount(u128::MAX, 1, 0, 1), Ok(u128::MAX));
        assert_eq!(rebase_amount(1, u128::MAX, 0, u128::MAX), Ok(1));
    }

    #[test]
    fn overflowing_result_is_an_error() {
        assert_eq!(
            rebase_amount(u128::MAX, 2, 0, 1),
            Err(Error::Overflow("rebase amount"))
        );
    }

    #[test]
    fn zero_observed_supply_is_an_error() {
        assert_eq!(
            rebase_amount(1, 1, 0, 0),
            Err(Error::Overflow("rebase over zero supply"))
        );
    }

    proptest! {
        #[test]
        fn identity_when_actual_matches_expected(
            pre in 0u128..=u64::MAX as u128,
            max_supply in 1u128..=u64::MAX as u128,
            decimal in 0u8..=18,
        ) {
            let expected = max_supply * 10u128.pow(u32::from(decimal));
            prop_assert_eq!(rebase_amount(pre, max_supply, decimal, expected), Ok(pre));
        }
    }
}
