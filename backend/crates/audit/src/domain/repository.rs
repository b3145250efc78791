//! Repository Traits

use std::collections::HashMap;

use kernel::id::AccountId;
use serde::Serialize;

use crate::domain::entry::AuditEntry;
use crate::error::AuditResult;

/// Audit entry store. Append-only: there is no update or delete.
#[trait_variant::make(AuditRepository: Send)]
pub trait LocalAuditRepository {
    async fn append(&self, entry: &AuditEntry) -> AuditResult<()>;

    /// Newest first, at most `limit` entries
    async fn recent(&self, limit: usize) -> AuditResult<Vec<AuditEntry>>;
}

/// Public view of the account that performed an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorSummary {
    #[serde(rename = "_id")]
    pub id: AccountId,
    pub username: String,
    pub role: String,
}

/// Resolves actor ids to summaries
///
/// Implemented by the account store; ids with no account are simply absent
/// from the result.
#[trait_variant::make(ActorDirectory: Send)]
pub trait LocalActorDirectory {
    async fn find_actors(&self, ids: &[AccountId]) -> AuditResult<HashMap<AccountId, ActorSummary>>;
}
