use std::time::Duration;

use async_trait::async_trait;
use neuromatrix_api::prelude::*;
use reqwest::StatusCode;
use serde_json::json;

/// The three operations the gateway needs from the counter/task store.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Fetch the singleton global counter row.
    async fn counter(&self) -> GatewayResult<GlobalCounter>;

    /// Read-then-write increment of the attempt counter. Best-effort:
    /// concurrent callers can read the same pre-increment value and lose
    /// updates. The counter is a marketing tally, not a ledger.
    async fn increment(&self) -> GatewayResult<GlobalCounter>;

    /// Fetch the most recently created task row.
    async fn latest_task(&self) -> GatewayResult<Task>;
}

/// PostgREST `Accept` value that unwraps a single-row result and turns
/// zero-or-many rows into a 406.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Supabase-backed store speaking PostgREST over HTTPS.
pub struct SupabaseStore {
    client: reqwest::Client,
    rest_url: String,
    anon_key: String,
}

impl SupabaseStore {
    pub fn new(supabase_url: &str, anon_key: &str) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Store(e.to_string()))?;
        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        })
    }

    fn get(&self, path_and_query: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/{}", self.rest_url, path_and_query))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
    }

    async fn fetch_single<T: serde::de::DeserializeOwned>(
        &self,
        path_and_query: &str,
        entity: &'static str,
    ) -> GatewayResult<T> {
        let response = self
            .get(path_and_query)
            .send()
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_ACCEPTABLE => Err(GatewayError::NotFound(entity)),
            status if status.is_success() => response
                .json()
                .await
                .map_err(|e| GatewayError::Store(e.to_string())),
            status => Err(GatewayError::Store(format!(
                "{entity} query returned {status}"
            ))),
        }
    }
}

#[async_trait]
impl CounterStore for SupabaseStore {
    async fn counter(&self) -> GatewayResult<GlobalCounter> {
        self.fetch_single(
            &format!("global_counter?id=eq.{COUNTER_ID}&select=*"),
            "global counter",
        )
        .await
    }

    async fn increment(&self) -> GatewayResult<GlobalCounter> {
        let current = self.counter().await?;

        let response = self
            .client
            .patch(format!(
                "{}/global_counter?id=eq.{}",
                self.rest_url, current.id
            ))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .json(&json!({ "attempts": current.attempts + 1 }))
            .send()
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_ACCEPTABLE => Err(GatewayError::NotFound("global counter")),
            status if status.is_success() => response
                .json()
                .await
                .map_err(|e| GatewayError::Store(e.to_string())),
            status => Err(GatewayError::Store(format!(
                "counter update returned {status}"
            ))),
        }
    }

    async fn latest_task(&self) -> GatewayResult<Task> {
        self.fetch_single(
            "tasks?select=*&order=created_at.desc&limit=1",
            "latest task",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_row_deserializes_from_postgrest_shape() {
        let row: GlobalCounter = serde_json::from_str(
            r#"{"id":"global","attempts":41,"updated_at":"2026-08-24T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(row.id, COUNTER_ID);
        assert_eq!(row.attempts, 41);
    }

    #[test]
    fn task_row_deserializes_from_postgrest_shape() {
        let row: Task = serde_json::from_str(
            r#"{"id":"7c3f","content":"Find the pill","created_at":"2026-08-24T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(row.content, "Find the pill");
    }
}
