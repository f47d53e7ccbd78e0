use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::store::{ListStore, Table};

/// User record in `users.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,    // trimmed and lower-cased
    pub password: String, // plaintext (legacy) or Argon2 PHC string (secure)
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

fn email_of(row: &Value) -> Option<&str> {
    row.get("email").and_then(Value::as_str)
}

impl User {
    /// Find a user by (already case-folded) email.
    pub async fn find_by_email(store: &dyn ListStore, email: &str) -> Option<User> {
        store
            .load(Table::Users)
            .await
            .into_iter()
            .find(|row| email_of(row) == Some(email))
            .and_then(|row| match serde_json::from_value::<User>(row) {
                Ok(u) => Some(u),
                Err(e) => {
                    warn!(error = %e, email, "skipping malformed user row");
                    None
                }
            })
    }

    /// Append `self` unless its email is already taken. Returns whether it
    /// was inserted; the check and the write happen under one table lock.
    pub async fn insert_unique(&self, store: &dyn ListStore) -> anyhow::Result<bool> {
        let row = serde_json::to_value(self)?;
        let email = self.email.as_str();
        store
            .update(
                Table::Users,
                Box::new(move |rows: &mut Vec<Value>| {
                    if rows.iter().any(|r| email_of(r) == Some(email)) {
                        return false;
                    }
                    rows.push(row);
                    true
                }),
            )
            .await
    }
}

#[cfg(test)]
mod repo_tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: email.into(),
            password: "pw".into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn insert_unique_rejects_taken_email() {
        let store = MemoryStore::new();
        assert!(user("a@x.io").insert_unique(&store).await.unwrap());
        assert!(!user("a@x.io").insert_unique(&store).await.unwrap());
        assert!(user("b@x.io").insert_unique(&store).await.unwrap());
        assert_eq!(store.load(Table::Users).await.len(), 2);
    }

    #[tokio::test]
    async fn find_by_email_round_trips_stored_row() {
        let store = MemoryStore::new();
        let u = user("a@x.io");
        u.insert_unique(&store).await.unwrap();

        let found = User::find_by_email(&store, "a@x.io").await.expect("found");
        assert_eq!(found.id, u.id);
        assert_eq!(found.name, "Alice");
        assert!(User::find_by_email(&store, "nobody@x.io").await.is_none());
    }

    #[tokio::test]
    async fn stored_row_carries_rfc3339_timestamp() {
        let store = MemoryStore::new();
        user("a@x.io").insert_unique(&store).await.unwrap();
        let rows = store.load(Table::Users).await;
        let created = rows[0]["created_at"].as_str().unwrap();
        assert!(OffsetDateTime::parse(created, &time::format_description::well_known::Rfc3339).is_ok());
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped() {
        let store = MemoryStore::new();
        store.append(Table::Users, json!({"email": "a@x.io"})).await.unwrap();
        assert!(User::find_by_email(&store, "a@x.io").await.is_none());
    }
}
