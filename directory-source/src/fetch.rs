use directory_core::{ChoiceSource, DirectoryConfig, DirectoryError, DoctorRecord};
use serde_json::Value;

use crate::load_doctors_value;

/// HTTP client for the doctor list endpoint. Works natively and on wasm32.
#[derive(Debug, Clone)]
pub struct DoctorClient {
    endpoint: String,
    client: reqwest::Client,
}

impl DoctorClient {
    pub fn new(config: &DirectoryConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Reuse a caller-built client, e.g. one with a timeout or custom headers.
    pub fn with_client(config: &DirectoryConfig, client: reqwest::Client) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Single GET. Network errors and non-2xx statuses are fetch failures.
    pub async fn fetch_raw(&self) -> Result<Value, DirectoryError> {
        tracing::debug!(endpoint = %self.endpoint, "fetching doctor list");

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|err| DirectoryError::Fetch(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Fetch(format!(
                "{} returned HTTP {status}",
                self.endpoint
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| DirectoryError::Parse(err.to_string()))
    }

    /// Fetch, map and enhance the full doctor list.
    pub async fn fetch_doctors(
        &self,
        choices: &mut dyn ChoiceSource,
    ) -> Result<Vec<DoctorRecord>, DirectoryError> {
        let payload = self.fetch_raw().await?;
        load_doctors_value(&payload, choices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injected_client_uses_configured_endpoint() {
        let config = DirectoryConfig {
            endpoint: "http://127.0.0.1:9/doctors.json".into(),
            ..DirectoryConfig::default()
        };
        let client = reqwest::Client::builder()
            .user_agent("directory-test")
            .build()
            .unwrap();

        let doctors = DoctorClient::with_client(&config, client);
        assert_eq!(doctors.endpoint(), "http://127.0.0.1:9/doctors.json");
    }

    #[test]
    fn default_client_targets_default_endpoint() {
        let doctors = DoctorClient::new(&DirectoryConfig::default());
        assert_eq!(doctors.endpoint(), directory_core::DEFAULT_ENDPOINT);
    }
}
