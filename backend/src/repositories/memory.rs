//! In-process repositories
//!
//! Same semantics as the PostgreSQL ones: autoincrement ids starting at 1,
//! owner filtering, oldest-first listing, unique user names. Used by the
//! test suite and by `database.url = "memory://"`.

use super::{owner_filter, Entity, Repository, Scope, UniqueViolation, UserRecord, UserRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// In-memory table for any [`Entity`]
pub struct MemoryRepository<E> {
    rows: RwLock<BTreeMap<i64, E>>,
    next_id: AtomicI64,
}

impl<E> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl<E: Entity> MemoryRepository<E> {
    async fn select<F>(&self, scope: Scope, matches: F) -> Result<Vec<E>>
    where
        F: Fn(&E) -> bool + Send,
    {
        let owner = owner_filter::<E>(scope)?.map(|(_, uid)| uid);
        let rows = self.rows.read().await;

        let mut found: Vec<E> = rows
            .values()
            .filter(|row| owner.map_or(true, |uid| row.owner() == Some(uid)))
            .filter(|row| matches(row))
            .cloned()
            .collect();
        found.sort_by_key(|row| (row.created(), row.id()));

        Ok(found)
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn list(&self, scope: Scope) -> Result<Vec<E>> {
        self.select(scope, |_| true).await
    }

    async fn list_by(&self, column: &'static str, value: i64, scope: Scope) -> Result<Vec<E>> {
        self.select(scope, move |row| row.int_column(column) == Some(value))
            .await
    }

    async fn get(&self, id: i64, scope: Scope) -> Result<Option<E>> {
        Ok(self
            .select(scope, move |row| row.id() == id)
            .await?
            .into_iter()
            .next())
    }

    async fn insert(&self, mut row: E) -> Result<E> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        row.set_id(id);
        self.rows.write().await.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, row: &E) -> Result<()> {
        let mut rows = self.rows.write().await;
        // Like an UPDATE matching no rows: not an error
        if let Some(stored) = rows.get_mut(&row.id()) {
            *stored = row.clone();
        }
        Ok(())
    }

    async fn delete(&self, row: &E) -> Result<bool> {
        Ok(self.rows.write().await.remove(&row.id()).is_some())
    }
}

/// In-memory credential store
pub struct MemoryUserRepository {
    users: RwLock<BTreeMap<i64, UserRecord>>,
    next_id: AtomicI64,
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.name == name).cloned())
    }

    async fn insert(&self, mut user: UserRecord) -> Result<UserRecord> {
        // Check and insert under one write lock so concurrent signups race fairly
        let mut users = self.users.write().await;
        if users.values().any(|u| u.name == user.name) {
            return Err(UniqueViolation.into());
        }

        user.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, user: &UserRecord) -> Result<bool> {
        Ok(self.users.write().await.remove(&user.id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{Cat, Toilet, Wash};
    use chrono::{Duration, Utc};

    fn cat(uid: i64, name: &str, offset_secs: i64) -> Cat {
        let at = Utc::now() + Duration::seconds(offset_secs);
        Cat {
            uid,
            name: name.to_string(),
            created: at,
            updated: at,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = MemoryRepository::<Cat>::default();
        let a = repo.insert(cat(1, "Tama", 0)).await.unwrap();
        let b = repo.insert(cat(1, "Tora", 1)).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_list_filters_by_owner_and_orders_by_created() {
        let repo = MemoryRepository::<Cat>::default();
        repo.insert(cat(1, "Later", 10)).await.unwrap();
        repo.insert(cat(2, "Other", 0)).await.unwrap();
        repo.insert(cat(1, "Earlier", 0)).await.unwrap();

        let names: Vec<String> = repo
            .list(Scope::Owner(1))
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Earlier", "Later"]);

        assert_eq!(repo.list(Scope::Global).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_respects_owner() {
        let repo = MemoryRepository::<Cat>::default();
        let row = repo.insert(cat(1, "Tama", 0)).await.unwrap();

        assert!(repo.get(row.id, Scope::Owner(1)).await.unwrap().is_some());
        assert!(repo.get(row.id, Scope::Owner(2)).await.unwrap().is_none());
        assert!(repo.get(999, Scope::Owner(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_owner_scope_on_unowned_table_is_error() {
        let repo = MemoryRepository::<Toilet>::default();
        assert!(repo.list(Scope::Owner(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_list_by_column() {
        let repo = MemoryRepository::<Wash>::default();
        for (uid, toiletid) in [(1, 10), (1, 11), (2, 10)] {
            repo.insert(Wash {
                uid,
                toiletid,
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let found = repo.list_by("toiletid", 10, Scope::Owner(1)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].toiletid, 10);
        assert_eq!(found[0].uid, 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = MemoryRepository::<Cat>::default();
        let mut row = repo.insert(cat(1, "Tama", 0)).await.unwrap();

        row.name = "Tamako".to_string();
        repo.update(&row).await.unwrap();
        let stored = repo.get(row.id, Scope::Global).await.unwrap().unwrap();
        assert_eq!(stored.name, "Tamako");

        assert!(repo.delete(&row).await.unwrap());
        assert!(!repo.delete(&row).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_names_are_unique() {
        let repo = MemoryUserRepository::default();
        let user = UserRecord {
            name: "mike".to_string(),
            password: "hash".to_string(),
            ..Default::default()
        };

        let stored = repo.insert(user.clone()).await.unwrap();
        assert_eq!(stored.id, 1);

        let err = repo.insert(user).await.unwrap_err();
        assert!(err.is::<UniqueViolation>());

        assert_eq!(
            repo.find_by_name("mike").await.unwrap().map(|u| u.id),
            Some(1)
        );
        assert!(repo.delete(&stored).await.unwrap());
        assert!(repo.find_by_name("mike").await.unwrap().is_none());
    }
}
