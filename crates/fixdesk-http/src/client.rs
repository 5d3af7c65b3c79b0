// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared request plumbing and error mapping.

use std::time::Duration;

use fixdesk_core::FixdeskError;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::wire::ApiErrorBody;

type Source = Option<Box<dyn std::error::Error + Send + Sync>>;

/// Which collaborator a client talks to; selects the error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Service {
    Backend,
    Assistant,
}

impl Service {
    pub(crate) fn error(self, message: String, source: Source) -> FixdeskError {
        match self {
            Service::Backend => FixdeskError::Backend { message, source },
            Service::Assistant => FixdeskError::Assistant { message, source },
        }
    }
}

/// The record a request is about, used for error messages and 404 mapping.
pub(crate) struct Target<'a> {
    pub resource: &'a str,
    pub id: Option<String>,
}

impl<'a> Target<'a> {
    pub(crate) fn record(resource: &'a str, id: impl ToString) -> Self {
        Self {
            resource,
            id: Some(id.to_string()),
        }
    }

    pub(crate) fn collection(resource: &'a str) -> Self {
        Self { resource, id: None }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    service: Service,
}

impl ApiClient {
    pub(crate) fn new(
        base_url: &str,
        timeout_secs: u64,
        service: Service,
    ) -> Result<Self, FixdeskError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                service.error(
                    format!("failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service,
        })
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub(crate) fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a request and maps transport failures and non-2xx statuses.
    ///
    /// A 404 on a single record becomes [`FixdeskError::NotFound`].
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        target: Target<'_>,
    ) -> Result<Response, FixdeskError> {
        let response = request.send().await.map_err(|e| {
            self.service.error(
                format!("{} request failed: {e}", target.resource),
                Some(Box::new(e)),
            )
        })?;

        let status = response.status();
        debug!(status = %status, resource = target.resource, "response received");
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND
            && let Some(id) = target.id
        {
            return Err(FixdeskError::NotFound {
                resource: target.resource.to_string(),
                id,
            });
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiErrorBody>(&body)
            .map(ApiErrorBody::into_message)
            .unwrap_or(body);
        Err(self.service.error(
            format!("{} request returned {status}: {detail}", target.resource),
            None,
        ))
    }

    /// Sends a request and decodes the JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        target: Target<'_>,
    ) -> Result<T, FixdeskError> {
        let resource = target.resource;
        let response = self.send(request, target).await?;
        response.json::<T>().await.map_err(|e| {
            self.service.error(
                format!("failed to decode {resource} response: {e}"),
                Some(Box::new(e)),
            )
        })
    }
}
