//! # Descriptor Service Client
//!
//! Wraps a `reqwest::Client` with the service base URL. Endpoints are
//! resolved relative to the base, so a service mounted under a path prefix
//! (`https://forms.example.com/signup/`) works the same as one at the root.
//!
//! Each request uses a per-request timeout (default 30s). Retries are not
//! built in; a failed fetch is reported once.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use dform_core::{DescriptorSet, FormValues};

use crate::error::FetchError;

/// Descriptor list endpoint, relative to the base URL.
pub const FORM_STRUCTURE_PATH: &str = "api/form-structure";
/// Submission endpoint, relative to the base URL.
pub const FORM_SUBMIT_PATH: &str = "api/form-submit";

/// Configuration for [`DescriptorClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service (e.g. `http://localhost:3000`).
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }
}

/// Server verdict on a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResponse {
    Accepted {
        data: FormValues,
        submission_id: String,
        received_at: String,
    },
    /// One message per failing field.
    Rejected { errors: BTreeMap<String, String> },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcceptedBody {
    data: FormValues,
    submission_id: String,
    received_at: String,
}

#[derive(Deserialize)]
struct RejectedBody {
    errors: BTreeMap<String, String>,
}

/// HTTP client for the descriptor service.
#[derive(Debug, Clone)]
pub struct DescriptorClient {
    client: reqwest::Client,
    base_url: Url,
}

impl DescriptorClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| FetchError::Http {
                endpoint: base_url.to_string(),
                source,
            })?;
        Ok(Self { client, base_url })
    }

    /// Client with default configuration for `base_url`.
    pub fn from_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::new(ClientConfig::new(base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|source| FetchError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                source,
            })
    }

    /// GET the descriptor list.
    ///
    /// Malformed entries are repaired by [`DescriptorSet`] and reported in
    /// its issues; only a body that is not a JSON array is a
    /// [`FetchError::Decode`].
    pub async fn fetch_descriptors(&self) -> Result<DescriptorSet, FetchError> {
        let endpoint = self.endpoint(FORM_STRUCTURE_PATH)?;
        tracing::debug!(%endpoint, "fetching form descriptors");

        let resp = self
            .client
            .get(endpoint.clone())
            .send()
            .await
            .map_err(|source| FetchError::Http {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await.map_err(|source| FetchError::Http {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let descriptors =
            DescriptorSet::from_json_str(&body).map_err(|source| FetchError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })?;

        tracing::info!(
            fields = descriptors.len(),
            issues = descriptors.issues().len(),
            "form descriptors fetched"
        );
        Ok(descriptors)
    }

    /// POST values to the submission endpoint.
    ///
    /// A 422 carrying field errors is a [`SubmitResponse::Rejected`], not an
    /// error. Any other non-success status is [`FetchError::Status`].
    pub async fn submit(&self, values: &FormValues) -> Result<SubmitResponse, FetchError> {
        let endpoint = self.endpoint(FORM_SUBMIT_PATH)?;
        tracing::debug!(%endpoint, fields = values.len(), "submitting form values");

        let resp = self
            .client
            .post(endpoint.clone())
            .json(values)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = resp.status();
        if status.is_success() {
            let body: AcceptedBody =
                resp.json()
                    .await
                    .map_err(|source| FetchError::Deserialization {
                        endpoint: endpoint.to_string(),
                        source,
                    })?;
            return Ok(SubmitResponse::Accepted {
                data: body.data,
                submission_id: body.submission_id,
                received_at: body.received_at,
            });
        }

        let body = resp.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            if let Ok(rejected) = serde_json::from_str::<RejectedBody>(&body) {
                return Ok(SubmitResponse::Rejected {
                    errors: rejected.errors,
                });
            }
        }
        Err(FetchError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

/// Parse the base URL, making sure its path ends in `/` so endpoint paths
/// join under it rather than replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| FetchError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_under_root() {
        let client = DescriptorClient::from_base_url("http://localhost:3000").unwrap();
        assert_eq!(
            client.endpoint(FORM_STRUCTURE_PATH).unwrap().as_str(),
            "http://localhost:3000/api/form-structure"
        );
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let client = DescriptorClient::from_base_url("https://forms.example.com/signup").unwrap();
        assert_eq!(
            client.endpoint(FORM_SUBMIT_PATH).unwrap().as_str(),
            "https://forms.example.com/signup/api/form-submit"
        );
    }

    #[test]
    fn rejects_relative_base_url() {
        let err = DescriptorClient::from_base_url("/forms").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn default_timeout() {
        assert_eq!(ClientConfig::new("http://x").timeout_secs, 30);
    }
}
