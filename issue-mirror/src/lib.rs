#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod attribution;
pub mod comments;
pub mod gateway;
pub mod mapping;
pub mod rate_limit;
pub mod runner;
pub mod summary;
pub mod verify;

pub use attribution::{clean_attribution, strip_attribution};
pub use comments::{
    marker_scope, migrate_comments, migration_marker, render_replay_body, MigrationLog,
    PairOutcome, MARKER_PREFIX,
};
pub use gateway::{Comment, GatewayError, RepoId, Ticket, TicketState};
pub use mapping::{MappingDocument, MappingEntry, MappingError, MappingStore, NewRef, OldRef};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use runner::{
    Mode, Runner, RunnerConfig, RunnerError, DEFAULT_AUTHOR, DEFAULT_EXCLUDED_TICKET,
    DEFAULT_LOG_PATH, DEFAULT_MAPPING_PATH,
};
pub use summary::RunOutcome;
pub use verify::{
    compare_fields, count_migrated, normalize_body, verify_parity, Finding, VerificationReport,
};
