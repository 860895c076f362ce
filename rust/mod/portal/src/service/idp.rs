use std::sync::RwLock;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::model::Application;

/// Outbound request timeout for the identity provider.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ClientsResponse {
    #[serde(default)]
    applications: Vec<serde_json::Value>,
}

/// Applications registered as clients at the identity provider.
///
/// Best effort: when the provider cannot be reached, the last list fetched
/// successfully is served instead.
pub struct IdpClientRegistry {
    url: String,
    client: reqwest::Client,
    last: RwLock<Vec<Application>>,
}

impl IdpClientRegistry {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            url: url.into(),
            client,
            last: RwLock::new(Vec::new()),
        })
    }

    /// Fetch the current client list, falling back to the cached one.
    pub async fn applications(&self) -> Vec<Application> {
        match self.fetch().await {
            Ok(apps) => {
                debug!("Loaded {} applications from identity provider", apps.len());
                *self.last.write().unwrap() = apps.clone();
                apps
            }
            Err(e) => {
                warn!("Identity provider clients unavailable at {}: {}", self.url, e);
                self.cached()
            }
        }
    }

    /// Last successfully fetched list.
    pub fn cached(&self) -> Vec<Application> {
        self.last.read().unwrap().clone()
    }

    async fn fetch(&self) -> Result<Vec<Application>, reqwest::Error> {
        let resp: ClientsResponse = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(decode_applications(resp.applications))
    }
}

/// Keep the records that decode into valid applications.
fn decode_applications(records: Vec<serde_json::Value>) -> Vec<Application> {
    let total = records.len();
    let apps: Vec<Application> = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Application>(record) {
            Ok(app) if app.missing_field().is_none() => Some(app),
            Ok(app) => {
                debug!("Skipping identity provider client {:?}: incomplete", app.id);
                None
            }
            Err(e) => {
                debug!("Skipping identity provider client: {}", e);
                None
            }
        })
        .collect();
    if apps.len() < total {
        info!(
            "Ignored {} of {} identity provider clients",
            total - apps.len(),
            total
        );
    }
    apps
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_skips_invalid_records() {
        let apps = decode_applications(vec![
            json!({"id": "a", "name": "A", "url": "https://a"}),
            json!({"id": "b", "name": "B"}),
            json!({"id": 3}),
            json!("nope"),
        ]);
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, "a");
    }

    #[test]
    fn test_response_shape() {
        let resp: ClientsResponse = serde_json::from_value(json!({
            "applications": [{"id": "a", "name": "A", "url": "https://a"}],
            "realm": "corp"
        }))
        .unwrap();
        assert_eq!(decode_applications(resp.applications).len(), 1);

        let empty: ClientsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.applications.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_provider_keeps_cached_list() {
        // Port 9 on loopback: connection refused without network access.
        let registry = IdpClientRegistry::new("http://127.0.0.1:9/clients").unwrap();
        *registry.last.write().unwrap() = vec![serde_json::from_value(
            json!({"id": "kept", "name": "Kept", "url": "https://kept"}),
        )
        .unwrap()];

        let apps = registry.applications().await;
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, "kept");
    }
}
