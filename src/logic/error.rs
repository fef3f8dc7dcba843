use thiserror::Error;

use crate::model::{Id, StageState, Station};

/// Hard failures of the order operations. Most lookup misses are silent
/// no-ops by contract; these are the exceptions.
#[derive(Debug, Error)]
pub enum OpError {
    /// There is nothing to attach the revision (or intent) to.
    #[error("order '{0}' not found")]
    OrderNotFound(Id),
    /// The requested stage change is not in the transition table. Raised by
    /// the intent layer before any change request is created.
    #[error("stage transition {from} -> {to} is not allowed for {station}")]
    IllegalStageTransition {
        station: Station,
        from: StageState,
        to: StageState,
    },
}
