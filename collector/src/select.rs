use ckb_inscription_types::{Error, LiveCell};
use ckb_types::{core::Capacity, packed::CellInput};
use ckb_logger::trace;

/// Inputs selected to cover a capacity target.
#[derive(Clone, Debug)]
pub struct CollectedCapacity {
    pub inputs: Vec<CellInput>,
    /// Total capacity carried by `inputs`.
    pub capacity: Capacity,
}

/// Inputs selected to cover a token amount.
#[derive(Clone, Debug)]
pub struct CollectedTokens {
    pub inputs: Vec<CellInput>,
    /// Total capacity carried by `inputs`.
    pub capacity: Capacity,
    /// Total token amount carried by `inputs`.
    pub amount: u128,
}

/// Greedy first-fit capacity selection over `cells` in source order.
///
/// Accumulates cells until the running total covers `target` plus `fee` and
/// the leftover is either zero or at least `min_change`, so the caller can
/// always emit a well-formed change output or none at all. A leftover stuck
/// strictly between zero and `min_change` keeps the scan going; running out
/// of cells in that state is an insufficiency, reported with the extra
/// `min_change` folded into the requirement.
pub fn collect_inputs(
    cells: &[LiveCell],
    target: Capacity,
    min_change: Capacity,
    fee: Capacity,
) -> Result<CollectedCapacity, Error> {
    let needed = target.safe_add(fee)?;
    let mut inputs = Vec::new();
    let mut total = Capacity::zero();
    for cell in cells {
        inputs.push(cell.input());
        total = total.safe_add(cell.capacity())?;
        if total == needed {
            return Ok(CollectedCapacity { inputs, capacity: total });
        }
        if total > needed {
            let leftover = total.safe_sub(needed)?;
            if leftover >= min_change {
                trace!(
                    "selected {} inputs carrying {} for target {}",
                    inputs.len(),
                    total,
                    needed
                );
                return Ok(CollectedCapacity { inputs, capacity: total });
            }
        }
    }
    let required = if total < needed {
        needed
    } else {
        needed.safe_add(min_change)?
    };
    Err(Error::InsufficientCapacity {
        required: required.as_u64(),
        available: total.as_u64(),
    })
}

/// Every cell in `cells` as an input, with the summed capacity.
pub fn collect_all_inputs(cells: &[LiveCell]) -> Result<CollectedCapacity, Error> {
    let mut inputs = Vec::with_capacity(cells.len());
    let mut total = Capacity::zero();
    for cell in cells {
        inputs.push(cell.input());
        total = total.safe_add(cell.capacity())?;
    }
    Ok(CollectedCapacity { inputs, capacity: total })
}

/// Greedy first-fit token selection over `cells` in source order.
///
/// Stops as soon as the accumulated token amount reaches `amount`; the
/// capacity the selected cells carry rides along for the caller's balance
/// arithmetic. Exhausting the cells first is an insufficiency in token
/// units, not capacity.
pub fn collect_token_inputs(cells: &[LiveCell], amount: u128) -> Result<CollectedTokens, Error> {
    let mut inputs = Vec::new();
    let mut total_capacity = Capacity::zero();
    let mut total_amount: u128 = 0;
    for cell in cells {
        inputs.push(cell.input());
        total_capacity = total_capacity.safe_add(cell.capacity())?;
        total_amount = total_amount
            .checked_add(cell.token_amount()?)
            .ok_or(Error::Overflow("token amount"))?;
        if total_amount >= amount {
            trace!(
                "selected {} token inputs carrying {} units for target {}",
                inputs.len(),
                total_amount,
                amount
            );
            return Ok(CollectedTokens {
                inputs,
                capacity: total_capacity,
                amount: total_amount,
            });
        }
    }
    Err(Error::InsufficientTokenAmount {
        required: amount,
        available: total_amount,
    })
}

/// Every token cell in `cells` as an input, with summed capacity and amount.
pub fn collect_all_token_inputs(cells: &[LiveCell]) -> Result<CollectedTokens, Error> {
    let mut inputs = Vec::with_capacity(cells.len());
    let mut total_capacity = Capacity::zero();
    let mut total_amount: u128 = 0;
    for cell in cells {
        inputs.push(cell.input());
        total_capacity = total_capacity.safe_add(cell.capacity())?;
        total_amount = total_amount
            .checked_add(cell.token_amount()?)
            .ok_or(Error::Overflow("token amount"))?;
    }
    Ok(CollectedTokens {
        inputs,
        capacity: total_capacity,
        amount: total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckb_inscription_types::encode_token_amount;
    use ckb_types::{bytes::Bytes, h256, packed, prelude::*};
    use proptest::prelude::*;

    fn bare_cell(index: u32, shannons: u64) -> LiveCell {
        LiveCell {
            out_point: packed::OutPoint::new(
                h256!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
                    .pack(),
                index,
            ),
            output: packed::CellOutput::new_builder()
                .capacity(Capacity::shannons(shannons).pack())
                .build(),
            output_data: Bytes::new(),
        }
    }

    fn token_cell(index: u32, shannons: u64, amount: u128) -> LiveCell {
        LiveCell {
            output_data: encode_token_amount(amount),
            ..bare_cell(index, shannons)
        }
    }

    #[test]
    fn exact_fit_stops_without_change_headroom() {
        let cells = vec![bare_cell(0, 100), bare_cell(1, 200), bare_cell(2, 999)];
        let collected = collect_inputs(
            &cells,
            Capacity::shannons(250),
            Capacity::shannons(61),
            Capacity::shannons(50),
        )
        .unwrap();
        assert_eq!(collected.inputs.len(), 2);
        assert_eq!(collected.capacity, Capacity::shannons(300));
    }

    #[test]
    fn sub_minimum_leftover_keeps_scanning() {
        let cells = vec![bare_cell(0, 100), bare_cell(1, 50)];
        let collected = collect_inputs(
            &cells,
            Capacity::shannons(90),
            Capacity::shannons(60),
            Capacity::zero(),
        )
        .unwrap();
        assert_eq!(collected.inputs.len(), 2);
        assert_eq!(collected.capacity, Capacity::shannons(150));
    }

    #[test]
    fn exhaustion_below_target_reports_target() {
        let cells = vec![bare_cell(0, 100)];
        let err = collect_inputs(
            &cells,
            Capacity::shannons(900),
            Capacity::shannons(61),
            Capacity::shannons(100),
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientCapacity {
                required: 1000,
                available: 100,
            }
        );
    }

    #[test]
    fn exhaustion_inside_change_gap_folds_in_minimum() {
        let cells = vec![bare_cell(0, 100)];
        let err = collect_inputs(
            &cells,
            Capacity::shannons(90),
            Capacity::shannons(60),
            Capacity::zero(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientCapacity {
                required: 150,
                available: 100,
            }
        );
    }

    #[test]
    fn token_selection_takes_a_prefix() {
        let cells: Vec<_> = [10u128, 20, 30, 40, 50]
            .iter()
            .enumerate()
            .map(|(i, amount)| token_cell(i as u32, 145_0000_0000, *amount))
            .collect();
        let collected = collect_token_inputs(&cells, 25).unwrap();
        assert_eq!(collected.inputs.len(), 2);
        assert_eq!(collected.amount, 30);

        let all = collect_all_token_inputs(&cells).unwrap();
        assert_eq!(all.inputs.len(), 5);
        assert_eq!(all.amount, 150);
        assert_eq!(all.capacity, Capacity::shannons(5 * 145_0000_0000));
    }

    #[test]
    fn token_shortfall_reports_both_sides() {
        let cells = vec![token_cell(0, 145_0000_0000, 40)];
        let err = collect_token_inputs(&cells, 100).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientTokenAmount {
                required: 100,
                available: 40,
            }
        );
    }

    proptest! {
        #[test]
        fn selection_is_a_minimal_prefix(
            shannons in proptest::collection::vec(1u64..10_000, 1..20),
            target in 1u64..20_000,
        ) {
            let cells: Vec<_> = shannons
                .iter()
                .enumerate()
                .map(|(i, c)| bare_cell(i as u32, *c))
                .collect();
            let min_change = Capacity::shannons(61);
            match collect_inputs(&cells, Capacity::shannons(target), min_change, Capacity::zero()) {
                Ok(collected) => {
                    let k = collected.inputs.len();
                    let sum: u64 = shannons[..k].iter().sum();
                    prop_assert_eq!(collected.capacity.as_u64(), sum);
                    prop_assert!(sum == target || sum >= target + 61);
                    if k > 1 {
                        let prev: u64 = shannons[..k - 1].iter().sum();
                        prop_assert!(prev < target || (prev > target && prev < target + 61));
                    }
                }
                Err(Error::InsufficientCapacity { available, .. }) => {
                    let sum: u64 = shannons.iter().sum();
                    prop_assert_eq!(available, sum);
                    prop_assert!(sum < target || (sum > target && sum < target + 61));
                }
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }
    }
}
