//! Minimum capacity formulas for the cell shapes the engine produces.

use ckb_inscription_types::{Error, InscriptionInfo};
use ckb_types::{core::Capacity, packed, prelude::*};

/// Occupied capacity of a bare change cell under `lock`: the smallest
/// output the engine ever emits, and the minimum-change threshold.
pub fn min_change_capacity(lock: &packed::Script) -> Result<Capacity, Error> {
    let output = packed::CellOutput::new_builder().lock(lock.clone()).build();
    Ok(output.occupied_capacity(Capacity::zero())?)
}

/// Occupied capacity of a token cell: lock, token type script and the
/// 16-byte amount payload.
pub fn token_cell_capacity(
    lock: &packed::Script,
    token_type: &packed::Script,
) -> Result<Capacity, Error> {
    let output = packed::CellOutput::new_builder()
        .lock(lock.clone())
        .type_(Some(token_type.clone()).pack())
        .build();
    Ok(output.occupied_capacity(Capacity::bytes(16)?)?)
}

/// Occupied capacity of an info cell, provisioned for the rebase hash the
/// rebase-info mutation will stamp later.
pub fn info_cell_capacity(
    lock: &packed::Script,
    info_type: &packed::Script,
    info: &InscriptionInfo,
) -> Result<Capacity, Error> {
    let output = packed::CellOutput::new_builder()
        .lock(lock.clone())
        .type_(Some(info_type.clone()).pack())
        .build();
    Ok(output.occupied_capacity(Capacity::bytes(info.provisioned_size())?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckb_types::{bytes::Bytes, h256};

    fn script(args_len: usize) -> packed::Script {
        packed::Script::new_builder()
            .code_hash(
                h256!("0x0101010101010101010101010101010101010101010101010101010101010101").pack(),
            )
            .args(Bytes::from(vec![0u8; args_len]).pack())
            .build()
    }

    #[test]
    fn bare_cell_under_standard_lock_occupies_61_bytes() {
        // 8 capacity + 32 code hash + 1 hash type + 20 args
        let min = min_change_capacity(&script(20)).unwrap();
        assert_eq!(min, Capacity::bytes(61).unwrap());
    }

    #[test]
    fn token_cell_adds_type_script_and_amount_payload() {
        // 61 + (32 + 1 + 32) type script + 16 amount
        let capacity = token_cell_capacity(&script(20), &script(32)).unwrap();
        assert_eq!(capacity, Capacity::bytes(142).unwrap());
    }
}
