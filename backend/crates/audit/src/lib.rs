//! Audit Log Backend Module
//!
//! Append-only record of privileged mutations.
//!
//! - `domain/` - entry model, repository and actor directory ports
//! - `application/` - fire-and-forget recorder, recent-entries listing
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - `GET /logs` handler and router (guarding is done by the caller)
//!
//! A failed write is logged and dropped; it never fails the operation that
//! triggered it.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::{AuditRecorder, ListAuditLogsUseCase};
pub use domain::entry::{AuditEntry, NewAuditEntry, TargetType, actions};
pub use domain::repository::{ActorDirectory, ActorSummary, AuditRepository};
pub use error::{AuditError, AuditResult};
pub use infra::{memory::MemoryAuditRepository, postgres::PgAuditRepository};
pub use presentation::router::audit_router;
