//! Live-cell querying and input selection.
//!
//! The [`CellSource`] trait is the engine's read-only window onto the ledger;
//! an indexer-backed implementation lives with the caller. Selection is
//! greedy and first-fit in source order: the source's stable ordering is the
//! only tie-break, so the same snapshot always yields the same inputs.

mod select;
mod source;

pub use select::{
    collect_all_inputs, collect_all_token_inputs, collect_inputs, collect_token_inputs,
    CollectedCapacity, CollectedTokens,
};
pub use source::{require_cells, CellQuery, CellSource};
