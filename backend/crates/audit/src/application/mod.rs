//! Application Layer

pub mod list_logs;
pub mod recorder;

pub use list_logs::{AuditLogView, LOG_LIST_LIMIT, ListAuditLogsUseCase};
pub use recorder::AuditRecorder;
