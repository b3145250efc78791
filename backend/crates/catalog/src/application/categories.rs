//! Category Use Cases

use std::sync::Arc;

use audit::{AuditRecorder, NewAuditEntry, TargetType, actions};
use auth::CurrentAccount;
use kernel::id::CategoryId;

use crate::domain::category::{Category, CategoryName};
use crate::domain::repository::CategoryRepository;
use crate::error::{CatalogError, CatalogResult};

pub struct ManageCategoriesUseCase<R>
where
    R: CategoryRepository,
{
    repo: Arc<R>,
    audit: AuditRecorder,
}

impl<R> ManageCategoriesUseCase<R>
where
    R: CategoryRepository,
{
    pub fn new(repo: Arc<R>, audit: AuditRecorder) -> Self {
        Self { repo, audit }
    }

    /// Admin listing, newest first
    pub async fn list(&self) -> CatalogResult<Vec<Category>> {
        self.repo.list_categories_newest().await
    }

    pub async fn create(&self, actor: &CurrentAccount, name: Option<&str>) -> CatalogResult<Category> {
        let name = CategoryName::new(name)?;
        if self.repo.category_name_taken(&name, None).await? {
            return Err(CatalogError::CategoryExists);
        }

        let category = Category::new(name);
        self.repo.create_category(&category).await?;

        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        self.audit.record(
            NewAuditEntry::new(actor.id, actions::CREATED_CATEGORY, TargetType::Category)
                .target(category.id.into_uuid(), category.name.as_str())
                .details(format!("{} created category {}", actor.username, category.name)),
        );

        Ok(category)
    }

    pub async fn rename(
        &self,
        actor: &CurrentAccount,
        id: CategoryId,
        name: Option<&str>,
    ) -> CatalogResult<Category> {
        let name = CategoryName::new(name)?;
        if self.repo.category_name_taken(&name, Some(id)).await? {
            return Err(CatalogError::CategoryNameTaken);
        }

        let mut category = self
            .repo
            .find_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)?;
        category.name = name;
        self.repo
            .update_category(&category)
            .await
            .map_err(|e| match e {
                CatalogError::CategoryExists => CatalogError::CategoryNameTaken,
                other => other,
            })?;

        tracing::info!(category_id = %category.id, name = %category.name, "Category renamed");
        self.audit.record(
            NewAuditEntry::new(actor.id, actions::UPDATED_CATEGORY, TargetType::Category)
                .target(category.id.into_uuid(), category.name.as_str())
                .details(format!("{} updated category {}", actor.username, category.name)),
        );

        Ok(category)
    }

    pub async fn delete(&self, actor: &CurrentAccount, id: CategoryId) -> CatalogResult<()> {
        let category = self
            .repo
            .find_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)?;

        if !self.repo.delete_category(id).await? {
            return Err(CatalogError::CategoryNotFound);
        }

        tracing::info!(category_id = %category.id, "Category deleted");
        self.audit.record(
            NewAuditEntry::new(actor.id, actions::DELETED_CATEGORY, TargetType::Category)
                .target(category.id.into_uuid(), category.name.as_str())
                .details(format!("{} deleted category {}", actor.username, category.name)),
        );

        Ok(())
    }
}
