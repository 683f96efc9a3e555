//! Azure Blob Storage backend over the REST API.
//!
//! Existence checks use `HEAD` (Get Blob Properties); downloads and streamed
//! reads use `GET` (Get Blob). Requests are authorized with Shared Key, a SAS
//! query string, or not at all for public containers.

pub mod auth;

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use hlsgate_common::token::{percent_encode, percent_encode_path};
use reqwest::{Client, Method, Response, StatusCode};

use crate::error::{Result, StorageError};
use crate::{ObjectStore, ObjectStream};

/// How requests are authorized.
#[derive(Clone)]
pub enum Credential {
    SharedKey { account: String, key: Vec<u8> },
    Sas(String),
    Anonymous,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SharedKey { account, .. } => f
                .debug_struct("SharedKey")
                .field("account", account)
                .finish_non_exhaustive(),
            Self::Sas(_) => f.write_str("Sas(..)"),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Blob service endpoint plus credential.
#[derive(Debug, Clone)]
pub struct AzureAccount {
    /// Endpoint URL without a trailing slash, e.g. `https://media.blob.core.windows.net`.
    pub endpoint: String,
    pub credential: Credential,
}

/// [`ObjectStore`] backed by one Azure Blob container.
pub struct AzureBlobStore {
    client: Client,
    account: AzureAccount,
    container: String,
    /// Path component of the endpoint (`/devstoreaccount1` for the emulator).
    endpoint_path: String,
    request_timeout: Option<Duration>,
}

impl AzureBlobStore {
    pub fn new(
        account: AzureAccount,
        container: &str,
        request_timeout: Option<Duration>,
    ) -> Result<Self> {
        let endpoint = reqwest::Url::parse(&account.endpoint).map_err(|e| {
            StorageError::config(format!("invalid blob endpoint '{}': {e}", account.endpoint))
        })?;
        let endpoint_path = endpoint.path().trim_end_matches('/').to_string();

        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            account,
            container: container.to_string(),
            endpoint_path,
            request_timeout,
        })
    }

    /// URL path (below the host) of a blob, percent-encoded.
    fn blob_path(&self, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint_path,
            percent_encode(&self.container),
            percent_encode_path(name)
        )
    }

    fn blob_url(&self, name: &str) -> String {
        let path = self.blob_path(name);
        let base = self
            .account
            .endpoint
            .strip_suffix(self.endpoint_path.as_str())
            .unwrap_or(&self.account.endpoint);
        match &self.account.credential {
            Credential::Sas(sas) => format!("{base}{path}?{sas}"),
            _ => format!("{base}{path}"),
        }
    }

    async fn send(&self, method: Method, name: &str) -> Result<Response> {
        let date = auth::rfc1123_now();
        let mut request = self
            .client
            .request(method.clone(), self.blob_url(name))
            .header("x-ms-date", &date)
            .header("x-ms-version", auth::API_VERSION);

        if let Credential::SharedKey { account, key } = &self.account.credential {
            let authorization = auth::authorization(
                account,
                key,
                method.as_str(),
                &[("x-ms-date", date.as_str()), ("x-ms-version", auth::API_VERSION)],
                &self.blob_path(name),
            )?;
            request = request.header(reqwest::header::AUTHORIZATION, authorization);
        }

        tracing::trace!(%method, container = %self.container, name, "Blob request");

        match self.request_timeout {
            Some(timeout) => tokio::time::timeout(timeout, request.send())
                .await
                .map_err(|_| StorageError::Timeout(name.to_string()))?
                .map_err(StorageError::from),
            None => Ok(request.send().await?),
        }
    }

    /// Issue a GET and fail unless the blob came back.
    async fn get_blob(&self, name: &str) -> Result<Response> {
        let response = self.send(Method::GET, name).await?;
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(StorageError::NotFound(name.to_string())),
            status => Err(StorageError::Status {
                status: status.as_u16(),
                name: name.to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for AzureBlobStore {
    fn container(&self) -> &str {
        &self.container
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let response = self.send(Method::HEAD, name).await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StorageError::Status {
                status: status.as_u16(),
                name: name.to_string(),
            }),
        }
    }

    async fn download(&self, name: &str) -> Result<Bytes> {
        let response = self.get_blob(name).await?;
        Ok(response.bytes().await?)
    }

    async fn open_read(&self, name: &str) -> Result<ObjectStream> {
        let response = self.get_blob(name).await?;
        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other))
            .boxed();
        Ok(ObjectStream {
            content_length,
            body,
        })
    }
}
