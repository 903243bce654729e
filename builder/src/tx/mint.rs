use ckb_inscription_collector::{collect_inputs, CellSource};
use ckb_inscription_constant::inscription_dep;
use ckb_inscription_types::{encode_token_amount, Error, MintStatus};
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

use super::{cell_as_dep, TxAssembler};

/// A mint draft and the token cell it produces.
#[derive(Debug)]
pub struct MintOutcome {
    pub tx: TransactionView,
    pub token_type: packed::Script,
    /// Token units minted, `mint_limit * 10^decimal` from the info payload.
    pub amount: u128,
    pub fee: Capacity,
}

impl<'a, S: CellSource> TxAssembler<'a, S> {
    /// Builds a mint: one new token cell at the deployment's per-mint limit.
    ///
    /// The info cell is referenced as a dep, never consumed, and its type
    /// script rides in the annotation witness so the validator can recompute
    /// the limit.
    pub fn mint(&self, inscription_id: &H256) -> Result<MintOutcome, Error> {
        let ctx = self.info_context(inscription_id)?;
        if ctx.info.mint_status != MintStatus::Open {
            return Err(Error::InvalidStateTransition("minting is closed"));
        }
        let amount = ctx.info.mint_amount()?;
        let token_type = script::token_type_script(self.kind, self.network, &ctx.info_type);
        let token_capacity = token_cell_capacity(&self.lock, &token_type)?;
        let token_output = packed::CellOutput::new_builder()
            .capacity(token_capacity.pack())
            .lock(self.lock.clone())
            .type_(Some(token_type.clone()).pack())
            .build();
        let token_data = encode_token_amount(amount);

        let (lock_proof, delegate_dep) = self.resolve_unlock()?;
        let cell_deps = self.assemble_deps(
            vec![
                inscription_dep(self.network),
                self.kind.cell_dep(self.network),
                cell_as_dep(&ctx.cell),
            ],
            delegate_dep,
        );
        let witnesses = WitnessSet::new(lock_proof)
            .annotate(ctx.info_type.as_bytes())
            .into_witnesses();

        let provisional = TransactionBuilder::default()
            .output(self.change_placeholder())
            .output_data(Default::default())
            .output(token_output.clone())
            .output_data(token_data.pack())
            .cell_deps(cell_deps.clone())
            .witnesses(witnesses.clone())
            .build();
        let fee = estimate_fee(&provisional, self.fee_rate);

        let cells = self.fee_cells()?;
        let collected = collect_inputs(&cells, token_capacity, self.min_change()?, fee)?;
        let leftover = collected
            .capacity
            .safe_sub(token_capacity)?
            .safe_sub(fee)?;
        let change = self.change_output(leftover)?;

        let mut builder = TransactionBuilder::default().inputs(collected.inputs);
        if let Some(change) = change {
            builder = builder.output(change).output_data(Default::default());
        }
        let tx = builder
            .output(token_output)
            .output_data(token_data.pack())
            .cell_deps(cell_deps)
            .witnesses(witnesses)
            .build();
        debug!(
            "minted {} units of {:#x} at fee {}",
            amount, inscription_id, fee
        );
        Ok(MintOutcome {
            tx,
            token_type,
            amount,
            fee,
        })
    }
}
