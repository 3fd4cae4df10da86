/// User persistence on top of the datastore client
///
/// Every operation is scoped to the configured record kind, so entities of
/// other kinds in the same project are never visible here.

use crate::{
    datastore::{DatastoreClient, Key},
    user::types::{User, UserProperties},
};
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct UserStorage {
    client: DatastoreClient,
    kind: String,
}

impl UserStorage {
    pub fn new(client: DatastoreClient, kind: impl Into<String>) -> Self {
        Self {
            client,
            kind: kind.into(),
        }
    }

    fn key(&self, id: i64) -> Key {
        Key::id_key(self.kind.as_str(), id)
    }

    /// List every user with its key assigned back onto `id`
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let entities = self.client.get_all::<UserProperties>(&self.kind).await?;
        Ok(entities
            .into_iter()
            .map(|(key, properties)| User::from_entity(&key, properties))
            .collect())
    }

    /// Store a new user under a store-assigned key
    pub async fn create_user(&self, properties: &UserProperties) -> Result<Key> {
        self.client.put_new(&self.kind, properties).await
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let key = self.key(id);
        let properties = self.client.get::<UserProperties>(&key).await?;
        Ok(properties.map(|p| User::from_entity(&key, p)))
    }

    /// Read-modify-write inside one transaction
    ///
    /// All three fields are overwritten. Returns `None` when no user exists
    /// under `id`; the transaction is then dropped and rolled back.
    pub async fn update_user(&self, id: i64, properties: UserProperties) -> Result<Option<User>> {
        let key = self.key(id);
        let mut tx = self.client.begin().await?;

        let Some(mut stored) = tx.get::<UserProperties>(&key).await? else {
            return Ok(None);
        };

        stored.first_name = properties.first_name;
        stored.last_name = properties.last_name;
        stored.email = properties.email;

        tx.put(&key, &stored).await?;
        tx.commit().await?;

        Ok(Some(User::from_entity(&key, stored)))
    }

    /// Returns whether a user existed under `id`
    pub async fn delete_user(&self, id: i64) -> Result<bool> {
        self.client.delete(&self.key(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(first: &str, last: &str, email: &str) -> UserProperties {
        UserProperties {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
        }
    }

    async fn storage() -> UserStorage {
        let client = DatastoreClient::in_memory("test").await.unwrap();
        UserStorage::new(client, "User")
    }

    #[tokio::test]
    async fn created_user_is_listed_exactly_once() {
        let storage = storage().await;
        let key = storage
            .create_user(&props("Ada", "Lovelace", "ada@example.com"))
            .await
            .unwrap();

        let users = storage.list_users().await.unwrap();
        let matching: Vec<&User> = users.iter().filter(|u| u.id == key.encoded_id()).collect();
        assert_eq!(users.len(), 1);
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].first_name, "Ada");
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_keeps_id() {
        let storage = storage().await;
        let key = storage
            .create_user(&props("Ada", "Lovelace", "ada@example.com"))
            .await
            .unwrap();

        let updated = storage
            .update_user(key.id, props("Grace", "Hopper", "grace@example.com"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            updated,
            User {
                id: key.encoded_id(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "grace@example.com".to_string(),
            }
        );
        assert_eq!(storage.get_user(key.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_of_missing_user_returns_none() {
        let storage = storage().await;
        let result = storage
            .update_user(12, props("Grace", "Hopper", "grace@example.com"))
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(storage.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_from_listing() {
        let storage = storage().await;
        let keep = storage.create_user(&props("Ada", "Lovelace", "ada@example.com")).await.unwrap();
        let gone = storage.create_user(&props("Alan", "Turing", "alan@example.com")).await.unwrap();

        assert!(storage.delete_user(gone.id).await.unwrap());
        assert!(!storage.delete_user(gone.id).await.unwrap());

        let ids: Vec<String> = storage
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![keep.encoded_id()]);
        assert_eq!(storage.get_user(gone.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn other_kinds_are_invisible() {
        let client = DatastoreClient::in_memory("test").await.unwrap();
        let legacy = UserStorage::new(client.clone(), "Task");
        let current = UserStorage::new(client, "User");

        let key = legacy
            .create_user(&props("Ada", "Lovelace", "ada@example.com"))
            .await
            .unwrap();

        assert!(current.list_users().await.unwrap().is_empty());
        assert_eq!(current.get_user(key.id).await.unwrap(), None);
        assert!(!current.delete_user(key.id).await.unwrap());
        assert_eq!(legacy.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_on_one_user_all_succeed() {
        let data_dir =
            std::env::temp_dir().join(format!("usersvc-concurrent-{}", std::process::id()));
        let config = crate::config::DatastoreConfig {
            data_dir: data_dir.to_string_lossy().into_owned(),
            project: "contention".to_string(),
            kind: "User".to_string(),
            max_connections: 5,
        };
        let client = DatastoreClient::connect(&config).await.unwrap();
        let storage = UserStorage::new(client, "User");
        let key = storage
            .create_user(&props("Ada", "Lovelace", "ada@example.com"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..40 {
            let storage = storage.clone();
            let email = format!("ada{i}@example.com");
            handles.push(tokio::spawn(async move {
                storage.update_user(key.id, props("Ada", "Lovelace", &email)).await
            }));
        }

        let mut failures = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(Some(_)) => {}
                Ok(None) => failures.push("user vanished".to_string()),
                Err(e) => failures.push(e.to_string()),
            }
        }
        assert!(failures.is_empty(), "failed updates: {failures:?}");

        let user = storage.get_user(key.id).await.unwrap().unwrap();
        assert_eq!(user.id, key.encoded_id());
        assert!(user.email.starts_with("ada") && user.email.ends_with("@example.com"));

        let _ = std::fs::remove_dir_all(&data_dir);
    }
}
