// victor-core: Polling coordination between victor-api and host consumers.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod snapshot;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_UPDATE_INTERVAL_MINUTES, PollerConfig, ResourceCategory};
pub use coordinator::{Coordinator, CoordinatorEvent, CoordinatorState};
pub use error::{CoreError, UpdateError};
pub use snapshot::TrapSnapshot;

// Re-export the resource types consumers read out of snapshots.
pub use victor_api::{Trap, TrapStatistics};
