//! HTTP client for another deployment's directory endpoint

use std::time::Duration;

use crate::errors::{AppError, Result};

use super::record::UniversityRecord;

/// Reads the full record array from a `GET` endpoint returning JSON
#[derive(Clone)]
pub struct RemoteCatalog {
    client: reqwest::Client,
    url: String,
}

impl RemoteCatalog {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("unipath/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch every record. Accepts either a bare array or the gateway's
    /// `{ "results": [...] }` listing envelope.
    pub async fn fetch_all(&self) -> Result<Vec<UniversityRecord>> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                message: format!("{} returned {}", self.url, status),
            });
        }

        let body: serde_json::Value = response.json().await?;
        let records = decode_listing(body)?;

        tracing::info!(url = %self.url, records = records.len(), "Fetched remote catalog");
        Ok(records)
    }
}

fn decode_listing(body: serde_json::Value) -> Result<Vec<UniversityRecord>> {
    let array = match body {
        serde_json::Value::Object(mut map) => map
            .remove("results")
            .ok_or_else(|| AppError::InvalidFormat {
                message: "expected a record array or an object with `results`".into(),
            })?,
        other => other,
    };

    Ok(serde_json::from_value(array)?)
}
