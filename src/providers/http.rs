// ABOUTME: HTTP client for the production plan-generation service
// ABOUTME: Posts generation and copy requests and maps service errors to typed codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use super::errors::{PlanServiceError, PlanServiceErrorCode};
use super::{CopyPlanRequest, GenerationRequest, PlanProvider, PlanServiceResponse};
use crate::config::PlanServiceConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Error body the service sends on non-success responses
///
/// Newer service versions include `code`; older ones send only `message`.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    code: Option<PlanServiceErrorCode>,
    message: Option<String>,
}

/// HTTP implementation of the plan-generation service contract
pub struct HttpPlanProvider {
    client: Client,
    config: PlanServiceConfig,
}

impl HttpPlanProvider {
    /// Create a provider for the configured service endpoint
    #[must_use]
    pub fn new(config: PlanServiceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn post_json<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<PlanServiceResponse, PlanServiceError> {
        let url = format!("{}{path}", self.config.base_url);
        debug!("Calling plan service: {url}");

        let mut request = self.client.post(&url).json(body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PlanServiceError::unreachable(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<PlanServiceResponse>().await.map_err(|e| {
                PlanServiceError::new(
                    PlanServiceErrorCode::Internal,
                    format!("malformed plan service response: {e}"),
                )
            });
        }

        let body_text = response.text().await.unwrap_or_else(|e| {
            warn!("Failed to read plan service error body: {e}");
            String::new()
        });

        // Structured body preferred, bare text tolerated
        match serde_json::from_str::<ServiceErrorBody>(&body_text) {
            Ok(parsed) => Err(PlanServiceError {
                code: parsed.code,
                message: parsed
                    .message
                    .unwrap_or_else(|| format!("plan service returned {status}")),
            }),
            Err(_) => Err(PlanServiceError::from_message(if body_text.is_empty() {
                format!("plan service returned {status}")
            } else {
                body_text
            })),
        }
    }
}

#[async_trait]
impl PlanProvider for HttpPlanProvider {
    async fn generate_plan(
        &self,
        request: &GenerationRequest,
    ) -> Result<PlanServiceResponse, PlanServiceError> {
        self.post_json("/plans/generate", request).await
    }

    async fn copy_plans(
        &self,
        request: &CopyPlanRequest,
    ) -> Result<PlanServiceResponse, PlanServiceError> {
        self.post_json("/plans/copy", request).await
    }

    fn provider_name(&self) -> &'static str {
        "http"
    }
}
