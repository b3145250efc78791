//! Domain Layer

pub mod entry;
pub mod repository;

pub use entry::{AuditEntry, NewAuditEntry, TargetType};
pub use repository::{ActorDirectory, ActorSummary, AuditRepository};
