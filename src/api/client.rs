//! HTTP client for the academy REST backend
//!
//! Wraps `reqwest` with the backend conventions: JSON bodies, the
//! `{success, data, ...}` envelope, and the error taxonomy of
//! [`AcademyError`].

use std::time::{Duration, Instant};

use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::models::ApiEnvelope;
use crate::utils::errors::{AcademyError, Result, TransportError};
use crate::utils::logging::log_request_timing;

/// Query string pairs
pub type Query = [(String, String)];

/// Thin JSON client bound to one backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Create a new ApiClient instance
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let parsed = url::Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(AcademyError::Http)?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, query: &Query) -> Result<ApiEnvelope> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiEnvelope> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<ApiEnvelope> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<ApiEnvelope> {
        self.request(Method::PATCH, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiEnvelope> {
        self.request(Method::DELETE, path, &[], None).await
    }

    /// Issue a request and normalise the response envelope
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<ApiEnvelope> {
        let started = Instant::now();
        let response = self.send(method.clone(), path, query, body).await?;
        let status = response.status();
        log_request_timing(
            method.as_str(),
            path,
            started.elapsed().as_millis() as u64,
            Some(status.as_u16()),
        );

        let text = response.text().await.map_err(|e| {
            AcademyError::Transport(TransportError::RequestFailed(e.to_string()))
        })?;

        if !status.is_success() {
            debug!(path = %path, status = status.as_u16(), "Backend returned error status");
            if let Ok(value) = serde_json::from_str::<Value>(&text) {
                let envelope = ApiEnvelope::from_value(value);
                if !envelope.details.is_empty() {
                    return Err(AcademyError::Validation(envelope.field_errors()));
                }
            }
            return Err(AcademyError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope = if text.trim().is_empty() {
            ApiEnvelope::from_value(Value::Null)
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => ApiEnvelope::from_value(value),
                Err(_) => {
                    warn!(path = %path, "Backend returned a non-JSON body");
                    ApiEnvelope::from_value(Value::String(text))
                }
            }
        };

        if !envelope.success {
            if !envelope.details.is_empty() {
                return Err(AcademyError::Validation(envelope.field_errors()));
            }
            return Err(AcademyError::Api {
                message: envelope.failure_message(),
            });
        }

        Ok(envelope)
    }

    /// Probe a path and report the HTTP status without interpreting the body
    pub async fn probe(&self, path: &str) -> Result<u16> {
        let response = self.send(Method::GET, path, &[], None).await?;
        Ok(response.status().as_u16())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<Response> {
        let url = self.url(path);
        debug!(method = %method, url = %url, "API request");

        let mut request = self
            .client
            .request(method, &url)
            .header(reqwest::header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                AcademyError::Transport(TransportError::Timeout)
            } else if e.is_connect() {
                AcademyError::Transport(TransportError::ServiceUnavailable)
            } else {
                AcademyError::Transport(TransportError::RequestFailed(e.to_string()))
            }
        })
    }
}
