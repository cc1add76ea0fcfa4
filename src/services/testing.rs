use std::io;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{Role, User};
use crate::database::queries::{profiles, users};
use crate::storage::FileStorage;

/// Stored in place of a real hash where a test never logs in.
pub const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo";

pub fn fixture_user(id: i64, role: Role) -> User {
    User {
        id,
        name: format!("user{id}"),
        email: format!("user{id}@empresa.com"),
        password_hash: DUMMY_HASH.to_string(),
        role,
        job_title: None,
        created_at: Utc::now(),
    }
}

pub async fn insert_user(pool: &SqlitePool, name: &str, email: &str, role: Role) -> User {
    let id = users::insert(
        pool,
        &users::NewUser {
            name,
            email,
            password_hash: DUMMY_HASH,
            role,
            job_title: None,
        },
        Utc::now(),
    )
    .await
    .unwrap();
    profiles::ensure(pool, id).await.unwrap();

    users::find_by_id(pool, id).await.unwrap().unwrap()
}

/// Storage whose writes always fail.
pub struct FailingStorage;

#[async_trait]
impl FileStorage for FailingStorage {
    async fn save(&self, _key: &str, _data: &[u8]) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }

    async fn load(&self, key: &str) -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::NotFound, key.to_string()))
    }

    async fn delete(&self, _key: &str) -> io::Result<()> {
        Ok(())
    }
}
