//! Row types for every table
//!
//! Request bodies bind straight into these; fields a client leaves out
//! take their zero value.

use super::{Entity, PgQuery};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record from database
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    /// bcrypt hash once stored. Cleared before the record is returned to a client.
    pub password: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl UserRecord {
    pub fn before_insert(&mut self, now: DateTime<Utc>) {
        self.created = now;
        self.updated = now;
    }

    /// Copy safe to serialize into a response
    pub fn without_password(mut self) -> Self {
        self.password.clear();
        self
    }
}

/// A cat, owned by the user who registered it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Cat {
    pub id: i64,
    pub uid: i64,
    pub name: String,
    pub breed: String,
    pub gender: String,
    pub age: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Entity for Cat {
    const TABLE: &'static str = "cat";
    const LABEL: &'static str = "Cat";
    const COLUMNS: &'static [&'static str] =
        &["uid", "name", "breed", "gender", "age", "created", "updated"];
    const OWNER_COLUMN: Option<&'static str> = Some("uid");

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn owner(&self) -> Option<i64> {
        Some(self.uid)
    }

    fn set_owner(&mut self, uid: i64) {
        self.uid = uid;
    }

    fn apply_patch(&mut self, patch: Self) {
        self.name = patch.name;
        self.breed = patch.breed;
        self.gender = patch.gender;
        self.age = patch.age;
    }

    fn before_insert(&mut self, now: DateTime<Utc>) {
        self.created = now;
        self.updated = now;
    }

    fn before_update(&mut self, now: DateTime<Utc>) {
        self.updated = now;
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.uid)
            .bind(&self.name)
            .bind(&self.breed)
            .bind(&self.gender)
            .bind(self.age)
            .bind(self.created)
            .bind(self.updated)
    }
}

/// A litter box. Shared by every user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Toilet {
    pub id: i64,
    pub name: String,
    pub comment: String,
    pub sandstate: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Entity for Toilet {
    const TABLE: &'static str = "toilet";
    const LABEL: &'static str = "Toilet";
    const COLUMNS: &'static [&'static str] =
        &["name", "comment", "sandstate", "created", "updated"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn apply_patch(&mut self, patch: Self) {
        self.name = patch.name;
        self.comment = patch.comment;
        self.sandstate = patch.sandstate;
    }

    fn before_insert(&mut self, now: DateTime<Utc>) {
        self.created = now;
        self.updated = now;
    }

    fn before_update(&mut self, now: DateTime<Utc>) {
        self.updated = now;
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.name)
            .bind(&self.comment)
            .bind(&self.sandstate)
            .bind(self.created)
            .bind(self.updated)
    }
}

/// One visit of a cat to a litter box
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct UseToilet {
    pub id: i64,
    pub uid: i64,
    pub toiletid: i64,
    pub catid: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Entity for UseToilet {
    const TABLE: &'static str = "usetoilet";
    const LABEL: &'static str = "UseToilet";
    const COLUMNS: &'static [&'static str] =
        &["uid", "toiletid", "catid", "type", "created", "updated"];
    const OWNER_COLUMN: Option<&'static str> = Some("uid");

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn owner(&self) -> Option<i64> {
        Some(self.uid)
    }

    fn set_owner(&mut self, uid: i64) {
        self.uid = uid;
    }

    fn int_column(&self, column: &str) -> Option<i64> {
        match column {
            "toiletid" => Some(self.toiletid),
            "catid" => Some(self.catid),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: Self) {
        self.toiletid = patch.toiletid;
        self.catid = patch.catid;
        self.kind = patch.kind;
    }

    fn before_insert(&mut self, now: DateTime<Utc>) {
        self.created = now;
        self.updated = now;
    }

    fn before_update(&mut self, now: DateTime<Utc>) {
        self.updated = now;
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.uid)
            .bind(self.toiletid)
            .bind(self.catid)
            .bind(self.kind)
            .bind(self.created)
            .bind(self.updated)
    }
}

/// A litter box washing, logged by a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Wash {
    pub id: i64,
    pub uid: i64,
    pub toiletid: i64,
    pub comment: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Entity for Wash {
    const TABLE: &'static str = "wash";
    const LABEL: &'static str = "Wash";
    const COLUMNS: &'static [&'static str] = &["uid", "toiletid", "comment", "created", "updated"];
    const OWNER_COLUMN: Option<&'static str> = Some("uid");

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn owner(&self) -> Option<i64> {
        Some(self.uid)
    }

    fn set_owner(&mut self, uid: i64) {
        self.uid = uid;
    }

    fn int_column(&self, column: &str) -> Option<i64> {
        match column {
            "toiletid" => Some(self.toiletid),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: Self) {
        self.toiletid = patch.toiletid;
        self.comment = patch.comment;
    }

    fn before_insert(&mut self, now: DateTime<Utc>) {
        self.created = now;
        self.updated = now;
    }

    fn before_update(&mut self, now: DateTime<Utc>) {
        self.updated = now;
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.uid)
            .bind(self.toiletid)
            .bind(&self.comment)
            .bind(self.created)
            .bind(self.updated)
    }
}

/// Free-form note, not tied to any user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub text: String,
    /// `updated` as it was before the latest update
    pub preupdated: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Entity for Item {
    const TABLE: &'static str = "items";
    const LABEL: &'static str = "Item";
    const COLUMNS: &'static [&'static str] = &["name", "text", "preupdated", "created", "updated"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn apply_patch(&mut self, patch: Self) {
        self.name = patch.name;
        self.text = patch.text;
    }

    fn before_insert(&mut self, now: DateTime<Utc>) {
        self.created = now;
        self.updated = now;
        self.preupdated = now;
    }

    fn before_update(&mut self, now: DateTime<Utc>) {
        self.preupdated = self.updated;
        self.updated = now;
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.name)
            .bind(&self.text)
            .bind(self.preupdated)
            .bind(self.created)
            .bind(self.updated)
    }
}
