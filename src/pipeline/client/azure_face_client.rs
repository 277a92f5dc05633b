use std::time::Duration;
use anyhow::{bail, Error};
use async_trait::async_trait;
use bytes::Bytes;
use http::header;
use log::debug;
use reqwest::Url;
use serde::de::DeserializeOwned;
use crate::config::settings::FaceApi;
use crate::error::errors::UpstreamError;
use crate::pipeline::client::face_api_client::{DetectedFace, FaceApiClient, IdentifyRequest, IdentifyResult, PersonProfile, SUBSCRIPTION_KEY_HEADER};
use crate::pipeline::model_config::config::FaceDetectionConfig;

const DEFAULT_REQUEST_TIMEOUT: u64 = 10;
const API_PREFIX: [&str; 2] = ["face", "v1.0"];

/// Azure Face REST client (`/face/v1.0`).
#[derive(Clone)]
pub struct AzureFaceClient {
    client: reqwest::Client,
    endpoint: Url,
    subscription_key: String,
}

impl AzureFaceClient {
    pub fn new(settings: &FaceApi) -> Result<Self, Error> {
        let timeout = Duration::from_secs(settings.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        let endpoint = Url::parse(&settings.endpoint)?;
        if endpoint.cannot_be_a_base() {
            bail!("face api endpoint {} cannot carry a path", settings.endpoint);
        }

        Ok(AzureFaceClient {
            client,
            endpoint,
            subscription_key: settings.subscription_key.clone(),
        })
    }

    /// `{endpoint}/face/v1.0/{segments...}`, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        url
    }

    fn transport_error(url: &Url, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout { url: url.to_string(), message: e.to_string() }
        } else {
            UpstreamError::Network { url: url.to_string(), message: e.to_string() }
        }
    }

    async fn read_json<T: DeserializeOwned>(url: &Url, response: reqwest::Response) -> Result<T, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                Self::transport_error(url, e)
            } else {
                UpstreamError::Decode { url: url.to_string(), message: e.to_string() }
            }
        })
    }
}

#[async_trait]
impl FaceApiClient for AzureFaceClient {
    async fn detect(&self, image: Bytes, config: &FaceDetectionConfig) -> Result<Vec<DetectedFace>, UpstreamError> {
        let url = self.url(&["detect"]);
        debug!("calling detect with {} bytes", image.len());

        let response = self.client
            .post(url.clone())
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .header(header::CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())
            .query(&config.query())
            .body(image)
            .send()
            .await
            .map_err(|e| Self::transport_error(&url, e))?;

        Self::read_json(&url, response).await
    }

    async fn identify(&self, request: &IdentifyRequest) -> Result<Vec<IdentifyResult>, UpstreamError> {
        let url = self.url(&["identify"]);
        debug!("calling identify against group {}", request.large_person_group_id);

        let response = self.client
            .post(url.clone())
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Self::transport_error(&url, e))?;

        Self::read_json(&url, response).await
    }

    async fn get_person(&self, large_person_group_id: &str, person_id: &str) -> Result<PersonProfile, UpstreamError> {
        let url = self.url(&["largepersongroups", large_person_group_id, "persons", person_id]);
        debug!("fetching person {person_id}");

        let response = self.client
            .get(url.clone())
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .send()
            .await
            .map_err(|e| Self::transport_error(&url, e))?;

        Self::read_json(&url, response).await
    }
}
