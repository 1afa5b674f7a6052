//! PostgreSQL implementations of the repository traits

use super::{owner_filter, Entity, Repository, Scope, UniqueViolation, UserRecord, UserRepository};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::marker::PhantomData;

/// Quote an identifier. Needed for `"user"` and `"type"`.
fn quoted(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

fn column_list(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `SELECT` for `E` filtered by `column = $n` conditions, oldest first
fn select_sql<E: Entity>(conditions: &[&str]) -> String {
    let mut columns = vec!["id"];
    columns.extend_from_slice(E::COLUMNS);

    let mut sql = format!(
        "SELECT {} FROM {}",
        column_list(&columns),
        quoted(E::TABLE)
    );
    for (i, column) in conditions.iter().enumerate() {
        let keyword = if i == 0 { "WHERE" } else { "AND" };
        sql.push_str(&format!(" {} {} = ${}", keyword, quoted(column), i + 1));
    }
    sql.push_str(" ORDER BY \"created\", \"id\"");
    sql
}

fn insert_sql<E: Entity>() -> String {
    let placeholders = (1..=E::COLUMNS.len())
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING \"id\"",
        quoted(E::TABLE),
        column_list(E::COLUMNS),
        placeholders
    )
}

fn update_sql<E: Entity>() -> String {
    let assignments = E::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ${}", quoted(c), i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE \"id\" = ${}",
        quoted(E::TABLE),
        assignments,
        E::COLUMNS.len() + 1
    )
}

/// Turn unique-key violations into [`UniqueViolation`]
fn map_write_error(err: sqlx::Error) -> anyhow::Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            anyhow::Error::new(UniqueViolation)
        }
        _ => err.into(),
    }
}

/// Repository for any [`Entity`] over a PostgreSQL pool
pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    async fn fetch_where(&self, conditions: Vec<(&'static str, i64)>) -> Result<Vec<E>> {
        let columns: Vec<&str> = conditions.iter().map(|(column, _)| *column).collect();
        let sql = select_sql::<E>(&columns);

        let mut query = sqlx::query_as::<_, E>(&sql);
        for (_, value) in conditions {
            query = query.bind(value);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for PgRepository<E> {
    async fn list(&self, scope: Scope) -> Result<Vec<E>> {
        let conditions = owner_filter::<E>(scope)?.into_iter().collect();
        self.fetch_where(conditions).await
    }

    async fn list_by(&self, column: &'static str, value: i64, scope: Scope) -> Result<Vec<E>> {
        let mut conditions = vec![(column, value)];
        conditions.extend(owner_filter::<E>(scope)?);
        self.fetch_where(conditions).await
    }

    async fn get(&self, id: i64, scope: Scope) -> Result<Option<E>> {
        let mut conditions = vec![("id", id)];
        conditions.extend(owner_filter::<E>(scope)?);
        Ok(self.fetch_where(conditions).await?.into_iter().next())
    }

    async fn insert(&self, mut row: E) -> Result<E> {
        let sql = insert_sql::<E>();
        let inserted = row
            .bind_columns(sqlx::query(&sql))
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        let id: i64 = inserted.try_get("id")?;
        row.set_id(id);
        Ok(row)
    }

    async fn update(&self, row: &E) -> Result<()> {
        let sql = update_sql::<E>();
        row.bind_columns(sqlx::query(&sql))
            .bind(row.id())
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn delete(&self, row: &E) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE \"id\" = $1", quoted(E::TABLE));
        let result = sqlx::query(&sql)
            .bind(row.id())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Credential store over the `"user"` table
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, password, created, updated
            FROM "user"
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, mut user: UserRecord) -> Result<UserRecord> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO "user" (name, password, created, updated)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.password)
        .bind(user.created)
        .bind(user.updated)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        user.id = id;
        Ok(user)
    }

    async fn delete(&self, user: &UserRecord) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM "user" WHERE id = $1"#)
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
