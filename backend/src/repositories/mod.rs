//! Database repositories
//!
//! One generic [`Repository`] trait covers every resource table; each
//! backend implements it once for any [`Entity`]. The credential store has
//! its own small [`UserRepository`] trait.

pub mod memory;
pub mod postgres;
pub mod records;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::{FromRow, Postgres};
use std::sync::Arc;
use thiserror::Error;

pub use memory::{MemoryRepository, MemoryUserRepository};
pub use postgres::{PgRepository, PgUserRepository};
pub use records::{Cat, Item, Toilet, UseToilet, UserRecord, Wash};

/// Query type the entities bind their columns into
pub type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// A table-backed resource row
///
/// Implementors describe their table layout; the repositories build every
/// statement from it.
pub trait Entity:
    Clone
    + Send
    + Sync
    + Unpin
    + Serialize
    + DeserializeOwned
    + for<'r> FromRow<'r, PgRow>
    + 'static
{
    /// Table name
    const TABLE: &'static str;
    /// Name used in log lines and error messages
    const LABEL: &'static str;
    /// Every column except `id`, in the order `bind_columns` binds them
    const COLUMNS: &'static [&'static str];
    /// Column holding the owning user's id, if rows are owner-scoped
    const OWNER_COLUMN: Option<&'static str> = None;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn created(&self) -> DateTime<Utc>;

    fn owner(&self) -> Option<i64> {
        None
    }

    fn set_owner(&mut self, _uid: i64) {}

    /// Value of an integer column, for filtered listing
    fn int_column(&self, _column: &str) -> Option<i64> {
        None
    }

    /// Copy the client-mutable fields from `patch`. Ids, owner and
    /// timestamps are left alone.
    fn apply_patch(&mut self, patch: Self);

    fn before_insert(&mut self, now: DateTime<Utc>);
    fn before_update(&mut self, now: DateTime<Utc>);

    /// Bind every value in `COLUMNS` order
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

/// Which rows an operation may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only rows owned by this user id
    Owner(i64),
    /// Every row in the table
    Global,
}

/// Resolve a scope into an owner column filter for `E`
pub(crate) fn owner_filter<E: Entity>(scope: Scope) -> Result<Option<(&'static str, i64)>> {
    match (scope, E::OWNER_COLUMN) {
        (Scope::Global, _) => Ok(None),
        (Scope::Owner(uid), Some(column)) => Ok(Some((column, uid))),
        (Scope::Owner(_), None) => anyhow::bail!("{} rows have no owner column", E::LABEL),
    }
}

/// The store refused a write because a unique column already holds the value
#[derive(Debug, Error)]
#[error("unique constraint violated")]
pub struct UniqueViolation;

/// Row access for one resource table
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// All visible rows, oldest first
    async fn list(&self, scope: Scope) -> Result<Vec<E>>;

    /// Visible rows whose integer `column` equals `value`, oldest first
    async fn list_by(&self, column: &'static str, value: i64, scope: Scope) -> Result<Vec<E>>;

    async fn get(&self, id: i64, scope: Scope) -> Result<Option<E>>;

    /// Insert and return the row with its assigned id
    async fn insert(&self, row: E) -> Result<E>;

    async fn update(&self, row: &E) -> Result<()>;

    /// Delete by id. Returns whether a row was removed.
    async fn delete(&self, row: &E) -> Result<bool>;
}

/// Credential store
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>>;

    /// Insert a user. A taken name fails with [`UniqueViolation`].
    async fn insert(&self, user: UserRecord) -> Result<UserRecord>;

    async fn delete(&self, user: &UserRecord) -> Result<bool>;
}

/// Every repository the API serves from
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub cats: Arc<dyn Repository<Cat>>,
    pub toilets: Arc<dyn Repository<Toilet>>,
    pub use_toilets: Arc<dyn Repository<UseToilet>>,
    pub washes: Arc<dyn Repository<Wash>>,
    pub items: Arc<dyn Repository<Item>>,
    pool: Option<PgPool>,
}

impl Store {
    /// Store backed by PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            cats: Arc::new(PgRepository::<Cat>::new(pool.clone())),
            toilets: Arc::new(PgRepository::<Toilet>::new(pool.clone())),
            use_toilets: Arc::new(PgRepository::<UseToilet>::new(pool.clone())),
            washes: Arc::new(PgRepository::<Wash>::new(pool.clone())),
            items: Arc::new(PgRepository::<Item>::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Empty in-process store; contents are lost on restart
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::default()),
            cats: Arc::new(MemoryRepository::<Cat>::default()),
            toilets: Arc::new(MemoryRepository::<Toilet>::default()),
            use_toilets: Arc::new(MemoryRepository::<UseToilet>::default()),
            washes: Arc::new(MemoryRepository::<Wash>::default()),
            items: Arc::new(MemoryRepository::<Item>::default()),
            pool: None,
        }
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Check the backing database, if there is one
    pub async fn health_check(&self) -> Result<()> {
        match &self.pool {
            Some(pool) => crate::db::health_check(pool).await,
            None => Ok(()),
        }
    }
}

/// Entities that have a repository in [`Store`]
pub trait Collection: Entity {
    fn repository(store: &Store) -> &dyn Repository<Self>;
}

impl Collection for Cat {
    fn repository(store: &Store) -> &dyn Repository<Self> {
        store.cats.as_ref()
    }
}

impl Collection for Toilet {
    fn repository(store: &Store) -> &dyn Repository<Self> {
        store.toilets.as_ref()
    }
}

impl Collection for UseToilet {
    fn repository(store: &Store) -> &dyn Repository<Self> {
        store.use_toilets.as_ref()
    }
}

impl Collection for Wash {
    fn repository(store: &Store) -> &dyn Repository<Self> {
        store.washes.as_ref()
    }
}

impl Collection for Item {
    fn repository(store: &Store) -> &dyn Repository<Self> {
        store.items.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_filter_for_scoped_entity() {
        assert_eq!(
            owner_filter::<Cat>(Scope::Owner(4)).unwrap(),
            Some(("uid", 4))
        );
        assert_eq!(owner_filter::<Cat>(Scope::Global).unwrap(), None);
    }

    #[test]
    fn test_owner_filter_refuses_unowned_entity() {
        assert!(owner_filter::<Toilet>(Scope::Owner(4)).is_err());
        assert_eq!(owner_filter::<Item>(Scope::Global).unwrap(), None);
    }

    #[tokio::test]
    async fn test_in_memory_store_is_healthy() {
        let store = Store::in_memory();
        assert!(store.pool().is_none());
        assert!(store.health_check().await.is_ok());
    }
}
