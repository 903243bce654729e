use ckb_types::{bytes::Bytes, core::Capacity, packed, prelude::*};

use crate::error::Error;

/// A live (unspent) cell as reported by a cell source.
///
/// Cells are immutable and consumed atomically as inputs; the engine never
/// spends a cell partially.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveCell {
    /// Where the cell sits on chain.
    pub out_point: packed::OutPoint,
    /// Capacity, lock and optional type script.
    pub output: packed::CellOutput,
    /// The cell's data payload.
    pub output_data: Bytes,
}

impl LiveCell {
    /// The cell's capacity in shannons.
    pub fn capacity(&self) -> Capacity {
        let shannons: u64 = self.output.capacity().unpack();
        Capacity::shannons(shannons)
    }

    /// The token amount carried in the leading 16 bytes of the cell data,
    /// little endian.
    pub fn token_amount(&self) -> Result<u128, Error> {
        if self.output_data.len() < 16 {
            return Err(Error::MalformedCellData("token amount requires 16 bytes"));
        }
        let mut le = [0u8; 16];
        le.copy_from_slice(&self.output_data[..16]);
        Ok(u128::from_le_bytes(le))
    }

    /// Whether the cell is a bare capacity cell: no type script, no data.
    /// Only bare cells are eligible to pay fees.
    pub fn is_bare(&self) -> bool {
        self.output.type_().is_none() && self.output_data.is_empty()
    }

    /// An input consuming this cell, with an unconstrained `since`.
    pub fn input(&self) -> packed::CellInput {
        packed::CellInput::new(self.out_point.clone(), 0)
    }
}

/// Encodes a token amount the way token cells carry it: u128 little endian.
pub fn encode_token_amount(amount: u128) -> Bytes {
    Bytes::from(amount.to_le_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckb_types::packed::{Byte32, CellOutput, OutPoint};

    fn cell_with_data(data: Bytes) -> LiveCell {
        LiveCell {
            out_point: OutPoint::new(Byte32::zero(), 0),
            output: CellOutput::new_builder()
                .capacity(Capacity::bytes(61).unwrap().pack())
                .build(),
            output_data: data,
        }
    }

    #[test]
    fn token_amount_round_trips() {
        let cell = cell_with_data(encode_token_amount(21_000_000u128 * 100_000_000));
        assert_eq!(cell.token_amount(), Ok(21_000_000u128 * 100_000_000));
    }

    #[test]
    fn token_amount_rejects_short_data() {
        let cell = cell_with_data(Bytes::from(vec![0u8; 15]));
        assert_eq!(
            cell.token_amount(),
            Err(Error::MalformedCellData("token amount requires 16 bytes"))
        );
    }

    #[test]
    fn bare_cell_has_no_type_and_no_data() {
        assert!(cell_with_data(Bytes::new()).is_bare());
        assert!(!cell_with_data(Bytes::from(vec![0u8; 16])).is_bare());
    }
}
