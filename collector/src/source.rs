use ckb_inscription_types::{Error, LiveCell};
use ckb_types::{packed::Script, prelude::*};

/// Read-only query of live cells.
///
/// Implementations must return a stable order for a given ledger state; the
/// engine treats that order as the selection tie-break and never reorders
/// collected cells.
pub trait CellSource {
    /// All live cells matching `query`, in the source's stable order.
    fn live_cells(&self, query: &CellQuery) -> Result<Vec<LiveCell>, Error>;
}

/// Filter for [`CellSource::live_cells`]; fields are optional and combine
/// conjunctively.
#[derive(Clone, Debug, Default)]
pub struct CellQuery {
    /// Match cells with exactly this lock script.
    pub lock: Option<Script>,
    /// Match cells with exactly this type script.
    pub type_script: Option<Script>,
}

impl CellQuery {
    /// Cells owned by `lock`, regardless of type.
    pub fn by_lock(lock: Script) -> Self {
        CellQuery {
            lock: Some(lock),
            type_script: None,
        }
    }

    /// Cells carrying `type_script`, regardless of owner.
    pub fn by_type(type_script: Script) -> Self {
        CellQuery {
            lock: None,
            type_script: Some(type_script),
        }
    }

    /// Cells owned by `lock` and carrying `type_script`.
    pub fn by_lock_and_type(lock: Script, type_script: Script) -> Self {
        CellQuery {
            lock: Some(lock),
            type_script: Some(type_script),
        }
    }

    /// Whether `cell` satisfies the filter. In-memory sources and tests use
    /// this; indexer-backed sources filter server side.
    pub fn matches(&self, cell: &LiveCell) -> bool {
        if let Some(lock) = &self.lock {
            if cell.output.lock().as_slice() != lock.as_slice() {
                return false;
            }
        }
        if let Some(type_script) = &self.type_script {
            match cell.output.type_().to_opt() {
                Some(actual) => {
                    if actual.as_slice() != type_script.as_slice() {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }
}

/// Shared guard for the cells-must-exist contract: every query site checks
/// emptiness exactly once and maps it to its own error.
pub fn require_cells(cells: Vec<LiveCell>, empty_err: Error) -> Result<Vec<LiveCell>, Error> {
    if cells.is_empty() {
        Err(empty_err)
    } else {
        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckb_types::{bytes::Bytes, core::Capacity, h256, packed};

    fn script(args: &[u8]) -> Script {
        Script::new_builder()
            .code_hash(
                h256!("0x0101010101010101010101010101010101010101010101010101010101010101").pack(),
            )
            .args(Bytes::from(args.to_vec()).pack())
            .build()
    }

    fn cell(lock: Script, type_script: Option<Script>) -> LiveCell {
        LiveCell {
            out_point: packed::OutPoint::new(packed::Byte32::zero(), 0),
            output: packed::CellOutput::new_builder()
                .capacity(Capacity::bytes(61).unwrap().pack())
                .lock(lock)
                .type_(
                    packed::ScriptOpt::new_builder()
                        .set(type_script)
                        .build(),
                )
                .build(),
            output_data: Bytes::new(),
        }
    }

    #[test]
    fn query_filters_combine() {
        let owner = script(b"owner");
        let token = script(b"token");
        let owned_token = cell(owner.clone(), Some(token.clone()));
        let owned_bare = cell(owner.clone(), None);
        let foreign = cell(script(b"other"), Some(token.clone()));

        let by_lock = CellQuery::by_lock(owner.clone());
        assert!(by_lock.matches(&owned_token));
        assert!(by_lock.matches(&owned_bare));
        assert!(!by_lock.matches(&foreign));

        let by_both = CellQuery::by_lock_and_type(owner, token);
        assert!(by_both.matches(&owned_token));
        assert!(!by_both.matches(&owned_bare));
        assert!(!by_both.matches(&foreign));
    }

    #[test]
    fn guard_maps_empty_to_the_site_error() {
        assert_eq!(
            require_cells(Vec::new(), Error::NoTokenCells),
            Err(Error::NoTokenCells)
        );
    }
}
