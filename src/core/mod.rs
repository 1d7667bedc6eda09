pub mod backend;
pub mod remote;
pub mod repository;
pub mod summary;

pub use backend::SyncMode;
pub use remote::{Anonymous, DeleteTarget, Identity, RemoteError, RemoteResult, SessionFlag, ShiftService};
pub use repository::{FetchReport, ShiftRepository};
pub use summary::{PeriodSummary, summarize};
