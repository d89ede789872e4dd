//! Remote REST-backed store (Supabase-style API). Each collection lives in
//! an `app_settings` row keyed by a fixed id and is replaced wholesale on
//! save, so a failed request never leaves the remote half-written.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::models::{DepositLedger, Settings, TradeRecord};
use crate::storage::StorageBackend;

const TRADES_ROW: &str = "trades";
const DEPOSITS_ROW: &str = "monthly_deposits";
const SETTINGS_ROW: &str = "main";

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
}

pub struct RemoteStore {
    client: reqwest::Client,
    config: RemoteConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct SettingsRow<T> {
    id: String,
    settings: T,
}

impl RemoteStore {
    pub fn new(config: RemoteConfig) -> Self {
        RemoteStore {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn rest_url(&self) -> String {
        format!(
            "{}/rest/v1/app_settings",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(StorageError::Response { status, message })
    }

    async fn fetch<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>, StorageError> {
        let request = self
            .client
            .get(self.rest_url())
            .query(&[("id", format!("eq.{}", id)), ("select", "settings".to_string())]);
        let response = Self::check(self.authed(request).send().await?).await?;

        let mut rows: Vec<SettingsRow<T>> = response.json().await?;
        Ok(rows.pop().map(|row| row.settings))
    }

    async fn upsert<T: Serialize>(&self, id: &str, value: &T) -> Result<(), StorageError> {
        let body = vec![SettingsRow {
            id: id.to_string(),
            settings: value,
        }];
        let request = self
            .client
            .post(self.rest_url())
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(&body);
        Self::check(self.authed(request).send().await?).await?;
        log::info!("Saved `{}` to remote store", id);
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for RemoteStore {
    async fn load_trades(&self) -> Result<Vec<TradeRecord>, StorageError> {
        Ok(self.fetch(TRADES_ROW).await?.unwrap_or_default())
    }

    async fn save_trades(&self, trades: &[TradeRecord]) -> Result<(), StorageError> {
        self.upsert(TRADES_ROW, &trades).await
    }

    async fn load_deposits(&self) -> Result<DepositLedger, StorageError> {
        Ok(self.fetch(DEPOSITS_ROW).await?.unwrap_or_default())
    }

    async fn save_deposits(&self, deposits: &DepositLedger) -> Result<(), StorageError> {
        self.upsert(DEPOSITS_ROW, deposits).await
    }

    async fn load_settings(&self) -> Result<Option<Settings>, StorageError> {
        self.fetch(SETTINGS_ROW).await
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        self.upsert(SETTINGS_ROW, settings).await
    }
}
