//! Fee estimation from a provisional draft.

use ckb_types::core::{Capacity, FeeRate, TransactionView};

/// Default fee rate in shannons per kilobyte of block-serialized size.
pub const DEFAULT_FEE_RATE: FeeRate = FeeRate::from_u64(1_500);

/// Fixed margin added to the serialized size before rating, covering the
/// signature the external signer appends to the first witness.
pub const WITNESS_SIZE_MARGIN: u64 = 200;

/// Absolute fee for `tx` at `fee_rate`.
///
/// The draft passed in is provisional: it carries every known output (change
/// as a zero-capacity placeholder) and whatever inputs are already fixed.
/// Inputs pulled afterwards to cover the fee do not change the estimate; the
/// witness margin absorbs the difference.
pub fn estimate_fee(tx: &TransactionView, fee_rate: FeeRate) -> Capacity {
    let size = tx.data().serialized_size_in_block() as u64 + WITNESS_SIZE_MARGIN;
    fee_rate.fee(size)
}
