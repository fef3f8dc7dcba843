pub mod branch;
pub mod change_request;
pub mod commit;
pub mod common;
pub mod order;
pub mod revision;
pub mod stages;

pub use branch::Branch;
pub use change_request::{ChangeRequest, ChangeRequestStatus, NewChangeRequest};
pub use commit::{ChangeSet, Commit, NewCommit};
pub use common::{generate_id, now_iso, Id};
pub use order::{Badge, Field, FileKind, FileRef, NewOrder, Order};
pub use revision::Revision;
pub use stages::{
    blank_stages, ReworkReason, StageCycle, StageMap, StageState, Station, STATIONS,
};
