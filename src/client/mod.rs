mod auth;
pub mod decode;
mod tables;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub use auth::{Credentials, TokenResponse};
pub use tables::{Filter, InsertRequest, QueryRequest};

/// Timeout applied to every request that carries a bearer token.
///
/// Sign-up and login are sent without one.
pub const AUTHORIZED_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed token response: {0}")]
    MalformedToken(#[source] serde_json::Error),
}

/// Status and body of a response, read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The five endpoints of the table service.
///
/// Every call hands back whatever status the server answered with; only
/// transport failures are errors here.
#[allow(async_fn_in_trait)]
pub trait TableApi {
    async fn sign_up(&self, credentials: &Credentials) -> Result<RawResponse, ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<RawResponse, ApiError>;

    async fn insert(&self, token: &str, request: &InsertRequest)
        -> Result<RawResponse, ApiError>;

    async fn select(&self, token: &str, request: &QueryRequest) -> Result<RawResponse, ApiError>;

    async fn delete(&self, token: &str, request: &QueryRequest) -> Result<RawResponse, ApiError>;
}

pub struct TableClient {
    client: Client,
    base_url: String,
}

impl TableClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    fn build_authorized(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.build_request(method, path)
            .bearer_auth(token)
            .timeout(AUTHORIZED_TIMEOUT)
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        request: RequestBuilder,
        payload: &T,
    ) -> Result<RawResponse, ApiError> {
        let request = request.json(payload).build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending request");

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%method, %url, error = %err, "request failed");
                return Err(err.into());
            }
        };

        let status = response.status();
        let body = response.text().await?;
        debug!(%method, %url, %status, bytes = body.len(), "received response");

        Ok(RawResponse::new(status, body))
    }
}

impl TableApi for TableClient {
    async fn sign_up(&self, credentials: &Credentials) -> Result<RawResponse, ApiError> {
        self.send(self.build_request(Method::POST, "/sign-up"), credentials)
            .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<RawResponse, ApiError> {
        self.send(self.build_request(Method::POST, "/login"), credentials)
            .await
    }

    async fn insert(
        &self,
        token: &str,
        request: &InsertRequest,
    ) -> Result<RawResponse, ApiError> {
        self.send(self.build_authorized(Method::POST, "/create", token), request)
            .await
    }

    // The server reads the query from the body of the GET.
    async fn select(&self, token: &str, request: &QueryRequest) -> Result<RawResponse, ApiError> {
        self.send(self.build_authorized(Method::GET, "/get", token), request)
            .await
    }

    async fn delete(&self, token: &str, request: &QueryRequest) -> Result<RawResponse, ApiError> {
        self.send(self.build_authorized(Method::DELETE, "/delete", token), request)
            .await
    }
}
