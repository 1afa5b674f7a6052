//! Ownership-scoped CRUD shared by every resource table
//!
//! Owned rows (cats, toilet usage, washes) are only ever read or written
//! through a [`Scope::Owner`] filter built from the verified caller.
//! A row that exists but belongs to someone else looks exactly like a row
//! that does not exist.

use crate::auth::AuthenticatedIdentity;
use crate::error::ApiError;
use crate::repositories::{Entity, Repository, Scope};
use chrono::Utc;
use meowapi_shared::validation::validate_row_id;
use tracing::{error, info};

fn store_error<E: Entity>(err: anyhow::Error) -> ApiError {
    error!(resource = E::LABEL, "Store operation failed: {:?}", err);
    ApiError::Internal(err)
}

fn not_found<E: Entity>() -> ApiError {
    ApiError::NotFound(format!("{} not found", E::LABEL))
}

/// CRUD over any [`Entity`]
pub struct ResourceService;

impl ResourceService {
    /// Scope the caller may see for `E`
    ///
    /// Owned entities need an identity; shared ones are always global.
    pub fn scope<E: Entity>(identity: Option<&AuthenticatedIdentity>) -> Result<Scope, ApiError> {
        match E::OWNER_COLUMN {
            Some(_) => identity
                .map(|identity| Scope::Owner(identity.user_id))
                .ok_or(ApiError::IdentityNotPresent),
            None => Ok(Scope::Global),
        }
    }

    pub async fn list<E: Entity>(repo: &dyn Repository<E>, scope: Scope) -> Result<Vec<E>, ApiError> {
        repo.list(scope).await.map_err(store_error::<E>)
    }

    /// Rows logged against one litter box
    pub async fn list_by_toilet<E: Entity>(
        repo: &dyn Repository<E>,
        toilet_id: i64,
        scope: Scope,
    ) -> Result<Vec<E>, ApiError> {
        repo.list_by("toiletid", toilet_id, scope)
            .await
            .map_err(store_error::<E>)
    }

    pub async fn get<E: Entity>(
        repo: &dyn Repository<E>,
        id: i64,
        scope: Scope,
    ) -> Result<E, ApiError> {
        repo.get(id, scope)
            .await
            .map_err(store_error::<E>)?
            .ok_or_else(not_found::<E>)
    }

    /// Insert a row
    ///
    /// Any id, owner or timestamps in the body are replaced.
    pub async fn create<E: Entity>(
        repo: &dyn Repository<E>,
        mut row: E,
        scope: Scope,
    ) -> Result<E, ApiError> {
        row.set_id(0);
        if let Scope::Owner(uid) = scope {
            row.set_owner(uid);
        }
        row.before_insert(Utc::now());

        let row = repo.insert(row).await.map_err(store_error::<E>)?;
        info!(resource = E::LABEL, id = row.id(), "Created");
        Ok(row)
    }

    /// Apply the client-mutable fields of `patch` to the stored row
    /// named by `patch`'s id
    pub async fn update<E: Entity>(
        repo: &dyn Repository<E>,
        patch: E,
        scope: Scope,
    ) -> Result<E, ApiError> {
        let id = patch.id();
        validate_row_id(id, E::LABEL).map_err(ApiError::Validation)?;

        let mut row = Self::get(repo, id, scope).await?;
        row.apply_patch(patch);
        row.before_update(Utc::now());

        repo.update(&row).await.map_err(store_error::<E>)?;
        info!(resource = E::LABEL, id, "Updated");
        Ok(row)
    }

    /// Delete the stored row named by `target`'s id
    pub async fn delete<E: Entity>(
        repo: &dyn Repository<E>,
        target: E,
        scope: Scope,
    ) -> Result<(), ApiError> {
        let id = target.id();
        validate_row_id(id, E::LABEL).map_err(ApiError::Validation)?;

        let row = Self::get(repo, id, scope).await?;
        if !repo.delete(&row).await.map_err(store_error::<E>)? {
            // Removed between the fetch and the delete
            return Err(not_found::<E>());
        }

        info!(resource = E::LABEL, id, "Deleted");
        Ok(())
    }
}
