use ckb_inscription_collector::{collect_all_inputs, collect_inputs, CellSource};
use ckb_inscription_types::Error;
use ckb_logger::debug;
use ckb_types::{
    core::{Capacity, TransactionBuilder, TransactionView},
    packed,
    prelude::*,
};

use crate::capacity::min_change_capacity;
use crate::fee::estimate_fee;
use crate::witness::WitnessSet;

use super::TxAssembler;

/// A native capacity transfer draft.
#[derive(Debug)]
pub struct CapacityTransferOutcome {
    pub tx: TransactionView,
    /// Capacity moved to the recipient.
    pub amount: Capacity,
    pub fee: Capacity,
}

impl<'a, S: CellSource> TxAssembler<'a, S> {
    /// Builds a plain capacity transfer of `amount` to `to_lock`.
    pub fn transfer_capacity(
        &self,
        to_lock: packed::Script,
        amount: Capacity,
    ) -> Result<CapacityTransferOutcome, Error> {
        let recipient_min = min_change_capacity(&to_lock)?;
        if amount < recipient_min {
            return Err(Error::InsufficientCapacity {
                required: recipient_min.as_u64(),
                available: amount.as_u64(),
            });
        }
        let recipient_output = packed::CellOutput::new_builder()
            .capacity(amount.pack())
            .lock(to_lock)
            .build();

        let (lock_proof, delegate_dep) = self.resolve_unlock()?;
        let cell_deps = self.assemble_deps(Vec::new(), delegate_dep);

        let provisional = TransactionBuilder::default()
            .output(self.change_placeholder())
            .output_data(Default::default())
            .output(recipient_output.clone())
            .output_data(Default::default())
            .cell_deps(cell_deps.clone())
            .witness(lock_proof.as_bytes().pack())
            .build();
        let fee = estimate_fee(&provisional, self.fee_rate);

        let cells = self.fee_cells()?;
        let collected = collect_inputs(&cells, amount, self.min_change()?, fee)?;
        let leftover = collected.capacity.safe_sub(amount)?.safe_sub(fee)?;
        let change = self.change_output(leftover)?;
        let witnesses = WitnessSet::new(lock_proof)
            .pad_to(collected.inputs.len())
            .into_witnesses();

        let mut builder = TransactionBuilder::default().inputs(collected.inputs);
        if let Some(change) = change {
            builder = builder.output(change).output_data(Default::default());
        }
        let tx = builder
            .output(recipient_output)
            .output_data(Default::default())
            .cell_deps(cell_deps)
            .witnesses(witnesses)
            .build();
        debug!("transferred {} capacity at fee {}", amount, fee);
        Ok(CapacityTransferOutcome { tx, amount, fee })
    }

    /// Builds a sweep: every bare cell consumed, everything but the fee
    /// handed to `to_lock` in a single output.
    pub fn transfer_all_capacity(
        &self,
        to_lock: packed::Script,
    ) -> Result<CapacityTransferOutcome, Error> {
        let cells = self.fee_cells()?;
        let collected = collect_all_inputs(&cells)?;

        let (lock_proof, delegate_dep) = self.resolve_unlock()?;
        let cell_deps = self.assemble_deps(Vec::new(), delegate_dep);
        let witnesses = WitnessSet::new(lock_proof)
            .pad_to(collected.inputs.len())
            .into_witnesses();

        let recipient_output = packed::CellOutput::new_builder()
            .capacity(collected.capacity.pack())
            .lock(to_lock.clone())
            .build();
        let provisional = TransactionBuilder::default()
            .inputs(collected.inputs.clone())
            .output(recipient_output)
            .output_data(Default::default())
            .cell_deps(cell_deps.clone())
            .witnesses(witnesses.clone())
            .build();
        let fee = estimate_fee(&provisional, self.fee_rate);

        let amount = collected.capacity.safe_sub(fee)?;
        let recipient_min = min_change_capacity(&to_lock)?;
        if amount < recipient_min {
            return Err(Error::InsufficientCapacity {
                required: recipient_min.safe_add(fee)?.as_u64(),
                available: collected.capacity.as_u64(),
            });
        }
        let tx = TransactionBuilder::default()
            .inputs(collected.inputs)
            .output(
                packed::CellOutput::new_builder()
                    .capacity(amount.pack())
                    .lock(to_lock)
                    .build(),
            )
            .output_data(Default::default())
            .cell_deps(cell_deps)
            .witnesses(witnesses)
            .build();
        debug!("swept {} capacity at fee {}", amount, fee);
        Ok(CapacityTransferOutcome { tx, amount, fee })
    }
}
