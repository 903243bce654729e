use ckb_inscription_collector::{collect_token_inputs, CellSource};
use ckb_inscription_types::{encode_token_amount, Error};
use ckb_logger::debug;
use ckb_types::{
    core::{Capacity, TransactionBuilder, TransactionView},
    packed,
    prelude::*,
    H256,
};

use crate::capacity::token_cell_capacity;
use crate::fee::estimate_fee;
use crate::script;
use crate::witness::WitnessSet;

use super::TxAssembler;

/// A transfer draft.
#[derive(Debug)]
pub struct TransferOutcome {
    pub tx: TransactionView,
    /// Token units moved to the recipient.
    pub amount: u128,
    /// Capacity packaged into the recipient's token cell.
    pub packaged_capacity: Capacity,
    pub fee: Capacity,
}

impl<'a, S: CellSource> TxAssembler<'a, S> {
    /// Builds a transfer of `amount` token units to `to_lock`.
    ///
    /// Selected cells are consumed whole; any token surplus comes back in a
    /// leftover cell under the owner lock, so the token amount is conserved
    /// exactly.
    pub fn transfer(
        &self,
        inscription_id: &H256,
        to_lock: packed::Script,
        amount: u128,
    ) -> Result<TransferOutcome, Error> {
        let info_type = script::info_type_script(self.network, inscription_id);
        let token_type = script::token_type_script(self.kind, self.network, &info_type);
        let cells = self.owned_token_cells(&token_type)?;
        let collected = collect_token_inputs(&cells, amount)?;
        let token_leftover = collected.amount - amount;

        let packaged_capacity = token_cell_capacity(&to_lock, &token_type)?;
        let recipient_output = packed::CellOutput::new_builder()
            .capacity(packaged_capacity.pack())
            .lock(to_lock)
            .type_(Some(token_type.clone()).pack())
            .build();
        let recipient_data = encode_token_amount(amount);

        let leftover_cell = if token_leftover > 0 {
            let capacity = token_cell_capacity(&self.lock, &token_type)?;
            let output = packed::CellOutput::new_builder()
                .capacity(capacity.pack())
                .lock(self.lock.clone())
                .type_(Some(token_type).pack())
                .build();
            Some((output, encode_token_amount(token_leftover), capacity))
        } else {
            None
        };

        let (lock_proof, delegate_dep) = self.resolve_unlock()?;
        let cell_deps =
            self.assemble_deps(vec![self.kind.cell_dep(self.network)], delegate_dep);
        let witnesses = WitnessSet::new(lock_proof).into_witnesses();

        let mut fixed_capacity = packaged_capacity;
        let mut provisional = TransactionBuilder::default()
            .inputs(collected.inputs.clone())
            .output(self.change_placeholder())
            .output_data(Default::default());
        if let Some((output, data, capacity)) = &leftover_cell {
            fixed_capacity = fixed_capacity.safe_add(*capacity)?;
            provisional = provisional
                .output(output.clone())
                .output_data(data.clone().pack());
        }
        let provisional = provisional
            .output(recipient_output.clone())
            .output_data(recipient_data.pack())
            .cell_deps(cell_deps.clone())
            .witnesses(witnesses.clone())
            .build();
        let fee = estimate_fee(&provisional, self.fee_rate);

        let required = fixed_capacity.safe_add(fee)?;
        let (extra_inputs, total_in) = self.top_up(collected.capacity, required)?;
        let leftover = total_in.safe_sub(required)?;
        let change = self.change_output(leftover)?;

        let mut builder = TransactionBuilder::default()
            .inputs(collected.inputs)
            .inputs(extra_inputs);
        if let Some(change) = change {
            builder = builder.output(change).output_data(Default::default());
        }
        if let Some((output, data, _)) = leftover_cell {
            builder = builder.output(output).output_data(data.pack());
        }
        let tx = builder
            .output(recipient_output)
            .output_data(recipient_data.pack())
            .cell_deps(cell_deps)
            .witnesses(witnesses)
            .build();
        debug!(
            "transferred {} units of {:#x} at fee {}",
            amount, inscription_id, fee
        );
        Ok(TransferOutcome {
            tx,
            amount,
            packaged_capacity,
            fee,
        })
    }
}
