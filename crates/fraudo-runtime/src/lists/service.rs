//! List service clients

use super::finder::composite_key;
use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::RwLock;

/// Membership checks against named lists
#[async_trait]
pub trait ListService: Send + Sync {
    /// Whether `key` is on list `list_id`
    ///
    /// Failing to reach the service is an error, never a "not found".
    async fn is_member(&self, list_id: &str, key: &str) -> Result<bool>;
}

/// List service kept in process memory
///
/// Entries are stored normalized, the same way lookups build their keys.
#[derive(Debug, Default)]
pub struct MemoryListService {
    lists: RwLock<HashMap<String, HashSet<String>>>,
}

impl MemoryListService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(list_id, values)` pairs
    pub fn from_lists<I, V>(lists: I) -> Self
    where
        I: IntoIterator<Item = (String, V)>,
        V: IntoIterator<Item = String>,
    {
        let lists = lists
            .into_iter()
            .map(|(id, values)| {
                let values: HashSet<String> = values.into_iter().map(|v| normalize(&v)).collect();
                (id, values)
            })
            .collect();
        Self {
            lists: RwLock::new(lists),
        }
    }

    pub async fn add(&self, list_id: &str, key: impl Into<String>) {
        let key: String = key.into();
        self.lists
            .write()
            .await
            .entry(list_id.to_string())
            .or_default()
            .insert(normalize(&key));
    }

    pub async fn remove(&self, list_id: &str, key: &str) {
        if let Some(list) = self.lists.write().await.get_mut(list_id) {
            list.remove(&normalize(key));
        }
    }
}

fn normalize(key: &str) -> String {
    composite_key([key])
}

#[async_trait]
impl ListService for MemoryListService {
    async fn is_member(&self, list_id: &str, key: &str) -> Result<bool> {
        let lists = self.lists.read().await;
        Ok(lists.get(list_id).is_some_and(|list| list.contains(key)))
    }
}

/// List service reached over HTTP
///
/// `GET {base_url}/lists/{list_id}/members/{key}` answers 200 for members
/// and 404 otherwise.
#[derive(Debug, Clone)]
pub struct HttpListService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpListService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                RuntimeError::ListServiceUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn member_url(&self, list_id: &str, key: &str) -> String {
        format!(
            "{}/lists/{}/members/{}",
            self.base_url,
            urlencoding::encode(list_id),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl ListService for HttpListService {
    async fn is_member(&self, list_id: &str, key: &str) -> Result<bool> {
        let url = self.member_url(list_id, key);
        tracing::debug!("Calling list service: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RuntimeError::ListServiceUnavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            reqwest::StatusCode::NOT_FOUND => Ok(false),
            status => Err(RuntimeError::ListServiceUnavailable(format!(
                "HTTP {} for list '{}'",
                status, list_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_list_membership() {
        let service = MemoryListService::from_lists(vec![(
            "black".to_string(),
            vec!["a@x.com".to_string()],
        )]);

        assert!(service.is_member("black", "a@x.com").await.unwrap());
        assert!(!service.is_member("black", "b@x.com").await.unwrap());
        assert!(!service.is_member("white", "a@x.com").await.unwrap());

        service.add("white", "b@x.com").await;
        assert!(service.is_member("white", "b@x.com").await.unwrap());

        service.remove("black", "a@x.com").await;
        assert!(!service.is_member("black", "a@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_entries_are_stored_normalized() {
        let service = MemoryListService::new();
        service.add("black", " Card-T2 ").await;

        assert!(service.is_member("black", "card-t2").await.unwrap());
        assert!(!service.is_member("black", " Card-T2 ").await.unwrap());

        service.remove("black", "CARD-T2").await;
        assert!(!service.is_member("black", "card-t2").await.unwrap());
    }

    #[test]
    fn test_member_url_is_encoded() {
        let service = HttpListService::new("http://lists:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            service.member_url("black", "a b|c"),
            "http://lists:8080/lists/black/members/a%20b%7Cc"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        // Nothing listens on port 9 (discard) in the test environment
        let service = HttpListService::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        assert!(matches!(
            service.is_member("black", "a@x.com").await,
            Err(RuntimeError::ListServiceUnavailable(_))
        ));
    }
}
