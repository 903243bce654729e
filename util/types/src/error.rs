use thiserror::Error;

/// A list specifying the ways a transaction build can fail.
///
/// Every failure aborts the build before a draft is returned; the engine
/// never hands out a partially assembled transaction. There is no local
/// recovery: callers decide whether to retry with different parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The owner has no bare live cells to pay capacity and fee with.
    #[error("the address has no live cells")]
    NoLiveCell,
    /// The available cells cannot cover the required capacity plus fee, or
    /// a change output would fall below the minimum change threshold.
    #[error("capacity not enough, required {required} available {available}")]
    InsufficientCapacity {
        /// Shannons needed to satisfy the build.
        required: u64,
        /// Shannons actually accumulated.
        available: u64,
    },
    /// No inscription info cell matches the given inscription id.
    #[error("no inscription info cell matches the given inscription id")]
    MissingInfoCell,
    /// The owner holds no token cells of the requested kind.
    #[error("the address has no inscription token cells")]
    NoTokenCells,
    /// A sub-key unlock was requested but the owner has no live delegate
    /// registry cell to reference.
    #[error("delegate registry cell does not exist")]
    NoDelegateCell,
    /// The token cells held do not carry the requested amount.
    #[error("token amount not enough, required {required} available {available}")]
    InsufficientTokenAmount {
        /// Token units requested.
        required: u128,
        /// Token units actually accumulated.
        available: u128,
    },
    /// A one-way info transition (close, rebase stamp) was re-applied.
    #[error("invalid inscription state transition: {0}")]
    InvalidStateTransition(&'static str),
    /// Cell data could not be decoded as the expected payload.
    #[error("malformed cell data: {0}")]
    MalformedCellData(&'static str),
    /// Arithmetic left the representable range.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
    /// An external collaborator (cell source, proof service) failed.
    #[error("external service error: {0}")]
    Service(String),
}

impl From<ckb_occupied_capacity::Error> for Error {
    fn from(_: ckb_occupied_capacity::Error) -> Error {
        Error::Overflow("capacity")
    }
}
