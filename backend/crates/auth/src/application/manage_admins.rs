//! Staff Management Use Cases
//!
//! Listing and creation are open to staff; update and delete are owner-only
//! (enforced by the router). Every mutation leaves an audit entry.

use std::sync::Arc;

use audit::{AuditRecorder, NewAuditEntry, TargetType, actions};
use kernel::id::AccountId;

use crate::application::config::AuthConfig;
use crate::application::profile::{AccountChanges, apply_changes};
use crate::application::register::{NewAccountInput, create_account};
use crate::domain::entity::{Account, CurrentAccount};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::account_role::AccountRole;
use crate::error::{AuthError, AuthResult};

pub struct ManageAdminsUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    audit: AuditRecorder,
}

impl<R> ManageAdminsUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, audit: AuditRecorder) -> Self {
        Self {
            repo,
            config,
            audit,
        }
    }

    pub async fn list(&self) -> AuthResult<Vec<Account>> {
        self.repo.list_staff().await
    }

    pub async fn create(&self, actor: &CurrentAccount, input: NewAccountInput) -> AuthResult<Account> {
        let admin =
            create_account(self.repo.as_ref(), &self.config, input, AccountRole::Admin).await?;

        tracing::info!(actor_id = %actor.id, admin_id = %admin.id, "Admin account created");
        self.audit.record(
            NewAuditEntry::new(actor.id, actions::CREATED_ADMIN, TargetType::Admin)
                .target(admin.id.into_uuid(), admin.username.as_str())
                .details(format!("{} added {} as admin", actor.username, admin.username)),
        );

        Ok(admin)
    }

    pub async fn update(
        &self,
        actor: &CurrentAccount,
        id: AccountId,
        changes: AccountChanges,
    ) -> AuthResult<Account> {
        let mut admin = self.find_modifiable(id, AuthError::OwnerNotModifiable).await?;

        let changes = changes.normalized();
        if changes.is_empty() {
            return Err(AuthError::Validation(
                "Provide at least one field to update".to_string(),
            ));
        }

        apply_changes(self.repo.as_ref(), &self.config, &mut admin, changes).await?;
        self.repo.update(&admin).await?;

        tracing::info!(actor_id = %actor.id, admin_id = %admin.id, "Admin account updated");
        self.audit.record(
            NewAuditEntry::new(actor.id, actions::UPDATED_ADMIN, TargetType::Admin)
                .target(admin.id.into_uuid(), admin.username.as_str())
                .details(format!("{} updated admin {}", actor.username, admin.username)),
        );

        Ok(admin)
    }

    pub async fn delete(&self, actor: &CurrentAccount, id: AccountId) -> AuthResult<()> {
        let admin = self.find_modifiable(id, AuthError::OwnerNotDeletable).await?;

        if !self.repo.delete(admin.id).await? {
            return Err(AuthError::AdminNotFound);
        }

        tracing::info!(actor_id = %actor.id, admin_id = %admin.id, "Admin account deleted");
        self.audit.record(
            NewAuditEntry::new(actor.id, actions::DELETED_ADMIN, TargetType::Admin)
                .target(admin.id.into_uuid(), admin.username.as_str())
                .details(format!("{} deleted admin {}", actor.username, admin.username)),
        );

        Ok(())
    }

    /// Staff account that is not the owner
    async fn find_modifiable(&self, id: AccountId, owner_error: AuthError) -> AuthResult<Account> {
        let account = self
            .repo
            .find_by_id(id)
            .await?
            .filter(|a| a.role.is_staff())
            .ok_or(AuthError::AdminNotFound)?;

        if account.role.is_owner() {
            return Err(owner_error);
        }
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit::MemoryAuditRepository;

    use crate::infra::memory::MemoryAccountRepository;

    struct Fixture {
        repo: Arc<MemoryAccountRepository>,
        audit_repo: Arc<MemoryAuditRepository>,
        uc: ManageAdminsUseCase<MemoryAccountRepository>,
        owner: CurrentAccount,
    }

    async fn fixture() -> Fixture {
        let repo = Arc::new(MemoryAccountRepository::new());
        let audit_repo = Arc::new(MemoryAuditRepository::new());
        let config = Arc::new(AuthConfig::with_random_secret());
        let owner = create_account(
            repo.as_ref(),
            &config,
            input("boss", "boss@x.com"),
            AccountRole::Owner,
        )
        .await
        .unwrap()
        .current();
        let uc = ManageAdminsUseCase::new(
            repo.clone(),
            config,
            AuditRecorder::new(audit_repo.clone()),
        );
        Fixture {
            repo,
            audit_repo,
            uc,
            owner,
        }
    }

    fn input(username: &str, email: &str) -> NewAccountInput {
        NewAccountInput {
            username: Some(username.into()),
            email: Some(email.into()),
            password: Some("password1".into()),
        }
    }

    #[tokio::test]
    async fn test_create_admin_is_audited() {
        let f = fixture().await;
        let admin = f.uc.create(&f.owner, input("mia", "mia@x.com")).await.unwrap();
        assert_eq!(admin.role, AccountRole::Admin);

        let logs = f.audit_repo.settled(1).await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, actions::CREATED_ADMIN);
        assert_eq!(logs[0].details, "boss added mia as admin");
        assert_eq!(logs[0].target_id, Some(admin.id.into_uuid()));
    }

    #[tokio::test]
    async fn test_list_puts_admins_first() {
        let f = fixture().await;
        f.uc.create(&f.owner, input("mia", "mia@x.com")).await.unwrap();

        let staff = f.uc.list().await.unwrap();
        let roles: Vec<_> = staff.iter().map(|a| a.role).collect();
        assert_eq!(roles, vec![AccountRole::Admin, AccountRole::Owner]);
    }

    #[tokio::test]
    async fn test_owner_is_protected() {
        let f = fixture().await;

        let err = f
            .uc
            .update(
                &f.owner,
                f.owner.id,
                AccountChanges {
                    username: Some("bigboss".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::OwnerNotModifiable));

        let err = f.uc.delete(&f.owner, f.owner.id).await.unwrap_err();
        assert!(matches!(err, AuthError::OwnerNotDeletable));
    }

    #[tokio::test]
    async fn test_plain_user_is_not_an_admin() {
        let f = fixture().await;
        let config = AuthConfig::with_random_secret();
        let user = create_account(
            f.repo.as_ref(),
            &config,
            input("joe", "joe@x.com"),
            AccountRole::User,
        )
        .await
        .unwrap();

        let err = f.uc.delete(&f.owner, user.id).await.unwrap_err();
        assert!(matches!(err, AuthError::AdminNotFound));
        let err = f.uc.delete(&f.owner, AccountId::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::AdminNotFound));
    }

    #[tokio::test]
    async fn test_update_and_delete_admin() {
        let f = fixture().await;
        let admin = f.uc.create(&f.owner, input("mia", "mia@x.com")).await.unwrap();

        let err = f
            .uc
            .update(&f.owner, admin.id, AccountChanges::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Provide at least one field to update");

        let updated = f
            .uc
            .update(
                &f.owner,
                admin.id,
                AccountChanges {
                    email: Some("MIA2@x.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email.as_str(), "mia2@x.com");

        f.uc.delete(&f.owner, admin.id).await.unwrap();
        assert!(f.repo.find_by_id(admin.id).await.unwrap().is_none());

        let actions_seen: Vec<_> = f
            .audit_repo
            .settled(3)
            .await
            .into_iter()
            .map(|e| e.action)
            .collect();
        assert!(actions_seen.contains(&actions::DELETED_ADMIN.to_string()));
        assert!(actions_seen.contains(&actions::UPDATED_ADMIN.to_string()));
    }
}
