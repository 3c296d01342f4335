//! Remote key-value store adapter over a Firebase-RTDB-style REST API.
//!
//! The store is addressed by hierarchical string keys: `<collection>/<id>`
//! for whole records and `<collection>/<id>/<field>` for single fields, with
//! `GET`/`PUT`/`DELETE` on `<base>/<path>.json`. A `GET` of an absent key
//! returns JSON `null`, not an HTTP error. No multi-key write exists, which
//! is exactly why the lifecycle engine's ordering discipline matters.

use crate::prayer::Prayer;
use crate::store::{PrayerStore, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const SCHEDULED: &str = "scheduledPrayers";
const ARCHIVED: &str = "archivedPrayers";
const COUNT_FIELD: &str = "prayerCount";

/// Connection settings for the remote store.
///
/// Serializable so the host application can persist it alongside its own
/// configuration; this crate never writes it to disk itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtdbConfig {
    /// Database root, e.g. `https://example.firebaseio.com/`.
    pub base_url: Url,
    /// Bearer/database token appended as the `auth` query parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Per-request timeout. Timeouts surface as [`StoreError::Transient`].
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl RtdbConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            auth_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// [`PrayerStore`] backed by the remote REST key-value store.
pub struct RtdbStore {
    config: RtdbConfig,
    client: reqwest::Client,
}

impl RtdbStore {
    pub fn new(config: RtdbConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::transient(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self, segments: &[&str]) -> StoreResult<Url> {
        let path = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let mut url = self
            .config
            .base_url
            .join(&format!("{path}.json"))
            .map_err(|e| StoreError::transient(format!("bad store path: {e}")))?;
        if let Some(token) = &self.config.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    async fn read_value(&self, segments: &[&str]) -> StoreResult<serde_json::Value> {
        let url = self.endpoint(segments)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::transient(e.to_string()))?;
        if !response.status().is_success() {
            return Err(StoreError::transient(format!(
                "read {} returned {}",
                segments.join("/"),
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| StoreError::transient(e.to_string()))
    }

    async fn write_value(
        &self,
        segments: &[&str],
        value: &serde_json::Value,
    ) -> StoreResult<()> {
        let url = self.endpoint(segments)?;
        let response = self
            .client
            .put(url)
            .json(value)
            .send()
            .await
            .map_err(|e| StoreError::transient(e.to_string()))?;
        if !response.status().is_success() {
            return Err(StoreError::transient(format!(
                "write {} returned {}",
                segments.join("/"),
                response.status()
            )));
        }
        tracing::debug!(path = %segments.join("/"), "store write ok");
        Ok(())
    }

    async fn delete_value(&self, segments: &[&str]) -> StoreResult<()> {
        let url = self.endpoint(segments)?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| StoreError::transient(e.to_string()))?;
        // Deleting an absent key is success by contract; some backends signal
        // it with 404 instead of a 200 null body.
        if response.status().is_success() || response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(path = %segments.join("/"), "store delete ok");
            Ok(())
        } else {
            Err(StoreError::transient(format!(
                "delete {} returned {}",
                segments.join("/"),
                response.status()
            )))
        }
    }

    async fn read_record(&self, collection: &str, id: &str) -> StoreResult<Option<Prayer>> {
        let value = self.read_value(&[collection, id]).await?;
        if value.is_null() {
            return Ok(None);
        }
        let mut prayer: Prayer = serde_json::from_value(value)
            .map_err(|e| StoreError::transient(format!("undecodable record {id}: {e}")))?;
        if prayer.id.is_empty() {
            prayer.id = id.to_string();
        }
        Ok(Some(prayer))
    }

    async fn read_collection(&self, collection: &str) -> StoreResult<Vec<Prayer>> {
        let value = self.read_value(&[collection]).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        let entries: HashMap<String, Prayer> = serde_json::from_value(value)
            .map_err(|e| StoreError::transient(format!("undecodable collection: {e}")))?;
        Ok(entries
            .into_iter()
            .map(|(key, mut prayer)| {
                if prayer.id.is_empty() {
                    prayer.id = key;
                }
                prayer
            })
            .collect())
    }
}

impl PrayerStore for RtdbStore {
    async fn get_scheduled(&self, id: &str) -> StoreResult<Option<Prayer>> {
        self.read_record(SCHEDULED, id).await
    }

    async fn list_scheduled(&self) -> StoreResult<Vec<Prayer>> {
        self.read_collection(SCHEDULED).await
    }

    async fn get_archived(&self, id: &str) -> StoreResult<Option<Prayer>> {
        self.read_record(ARCHIVED, id).await
    }

    async fn list_archived(&self) -> StoreResult<Vec<Prayer>> {
        self.read_collection(ARCHIVED).await
    }

    async fn set_scheduled_count(&self, id: &str, new_count: u32) -> StoreResult<()> {
        // A field PUT on this API creates the parent record if it is absent,
        // which would resurrect a concurrently deleted prayer as a bare
        // counter. Check presence first and report NotFound instead.
        if self.read_record(SCHEDULED, id).await?.is_none() {
            return Err(StoreError::NotFound);
        }
        self.write_value(&[SCHEDULED, id, COUNT_FIELD], &serde_json::json!(new_count))
            .await
    }

    async fn copy_to_archive(&self, id: &str, snapshot: &Prayer) -> StoreResult<()> {
        let value = serde_json::to_value(snapshot)
            .map_err(|e| StoreError::transient(e.to_string()))?;
        // PUT replaces the whole record: retrying an interrupted fulfill
        // overwrites the previous copy instead of failing.
        self.write_value(&[ARCHIVED, id], &value).await
    }

    async fn remove_scheduled(&self, id: &str) -> StoreResult<()> {
        self.delete_value(&[SCHEDULED, id]).await
    }

    async fn remove_archived(&self, id: &str) -> StoreResult<()> {
        self.delete_value(&[ARCHIVED, id]).await
    }
}
