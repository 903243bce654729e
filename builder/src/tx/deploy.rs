use ckb_inscription_collector::{collect_inputs, CellSource};
use ckb_inscription_constant::inscription_info_dep;
use ckb_inscription_types::{Error, InscriptionInfo, MintStatus};
use ckb_logger::debug;
use ckb_types::{
    core::{Capacity, TransactionBuilder, TransactionView},
    packed,
    prelude::*,
    H256,
};

use crate::capacity::info_cell_capacity;
use crate::fee::estimate_fee;
use crate::script;
use crate::witness::WitnessSet;

use super::TxAssembler;

/// Parameters of a new deployment. Supply figures count whole tokens; token
/// cells carry amounts scaled by `10^decimal`.
#[derive(Clone, Debug)]
pub struct DeployParams {
    pub decimal: u8,
    pub name: String,
    pub symbol: String,
    pub max_supply: u128,
    pub mint_limit: u128,
}

/// A deploy draft together with the identities it created.
pub struct DeployOutcome {
    pub tx: TransactionView,
    pub inscription_id: H256,
    /// Hash of the pre-mint token type script, also embedded in the info
    /// payload.
    pub token_hash: H256,
    pub fee: Capacity,
}

impl<'a, S: CellSource> TxAssembler<'a, S> {
    /// Builds the transaction creating a deployment's info cell.
    ///
    /// The deployment id hashes the first selected input, so the payload is
    /// completed after input selection; the capacity and fee arithmetic does
    /// not depend on the id's value, only on its fixed width.
    pub fn deploy(&self, params: &DeployParams) -> Result<DeployOutcome, Error> {
        let mut info = InscriptionInfo {
            decimal: params.decimal,
            name: params.name.clone(),
            symbol: params.symbol.clone(),
            token_hash: H256([0u8; 32]),
            max_supply: params.max_supply,
            mint_limit: params.mint_limit,
            mint_status: MintStatus::Open,
            rebase_hash: None,
        };
        // Rejects oversized names before anything is selected.
        let placeholder_data = info.to_bytes()?;

        let placeholder_type = script::info_type_script(self.network, &H256([0u8; 32]));
        let info_capacity = info_cell_capacity(&self.lock, &placeholder_type, &info)?;

        let (lock_proof, delegate_dep) = self.resolve_unlock()?;
        let cell_deps =
            self.assemble_deps(vec![inscription_info_dep(self.network)], delegate_dep);
        let witnesses = WitnessSet::new(lock_proof).annotate_empty().into_witnesses();

        let info_output = |info_type: packed::Script| {
            packed::CellOutput::new_builder()
                .capacity(info_capacity.pack())
                .lock(self.lock.clone())
                .type_(Some(info_type).pack())
                .build()
        };

        let provisional = TransactionBuilder::default()
            .output(info_output(placeholder_type))
            .output_data(placeholder_data.pack())
            .output(self.change_placeholder())
            .output_data(Default::default())
            .cell_deps(cell_deps.clone())
            .witnesses(witnesses.clone())
            .build();
        let fee = estimate_fee(&provisional, self.fee_rate);

        let cells = self.fee_cells()?;
        let collected = collect_inputs(&cells, info_capacity, self.min_change()?, fee)?;

        let inscription_id = script::inscription_id(&collected.inputs[0], 0);
        let info_type = script::info_type_script(self.network, &inscription_id);
        let token_type = script::token_type_script(self.kind, self.network, &info_type);
        let token_hash: H256 = token_type.calc_script_hash().unpack();
        info.token_hash = token_hash.clone();
        let info_data = info.to_bytes()?;

        let leftover = collected
            .capacity
            .safe_sub(info_capacity)?
            .safe_sub(fee)?;
        let change = self.change_output(leftover)?;

        let mut builder = TransactionBuilder::default()
            .inputs(collected.inputs)
            .output(info_output(info_type))
            .output_data(info_data.pack());
        if let Some(change) = change {
            builder = builder.output(change).output_data(Default::default());
        }
        let tx = builder.cell_deps(cell_deps).witnesses(witnesses).build();
        debug!(
            "deployed {} with id {:#x} at fee {}",
            info.symbol, inscription_id, fee
        );
        Ok(DeployOutcome {
            tx,
            inscription_id,
            token_hash,
            fee,
        })
    }
}
