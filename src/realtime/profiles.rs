use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::store::{ListStore, Table};

/// Project profile in `profiles.json`. The API key is kept and returned in
/// plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub project_name: Option<String>,
    pub api_key: Option<String>,
    pub users: Vec<Value>,
}

impl Profile {
    pub async fn create(
        store: &dyn ListStore,
        project_name: Option<String>,
        api_key: Option<String>,
        users: Vec<Value>,
    ) -> anyhow::Result<Profile> {
        let profile = Profile {
            id: Uuid::new_v4(),
            project_name,
            api_key,
            users,
        };
        store
            .append(Table::Profiles, serde_json::to_value(&profile)?)
            .await?;
        Ok(profile)
    }

    /// Every stored row, as stored.
    pub async fn list(store: &dyn ListStore) -> Vec<Value> {
        store.load(Table::Profiles).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn create_appends_and_list_returns_everything() {
        let store = MemoryStore::new();
        let users = vec![json!({"name": "Alice", "email": "alice@example.com"}), json!("odd")];
        let p = Profile::create(&store, Some("Ridge".into()), Some("k-1".into()), users.clone())
            .await
            .unwrap();
        Profile::create(&store, None, None, Vec::new()).await.unwrap();

        let rows = Profile::list(&store).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], p.id.to_string());
        assert_eq!(rows[0]["api_key"], "k-1");
        assert_eq!(rows[0]["users"], json!(users));
        assert_eq!(rows[1]["project_name"], Value::Null);
    }
}
