use hermod_core::{Email, SendOutcome};
use hermod_provider::{Pacing, Provider};
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::ResendConfig;
use crate::types::{ResendErrorResponse, ResendSendRequest, ResendSendResponse, ResendTag};

/// Resend provider that delivers mail via the Resend HTTP API.
///
/// One `POST /emails` call per message; delivery failures of any kind come
/// back as failed [`SendOutcome`]s rather than errors.
pub struct ResendProvider {
    config: ResendConfig,
    client: Client,
    pacing: Pacing,
}

impl ResendProvider {
    /// Create a new Resend provider with the given configuration.
    ///
    /// Uses a default `reqwest::Client` with reasonable timeouts.
    pub fn new(config: ResendConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self::with_client(config, client)
    }

    /// Create a new Resend provider with a custom HTTP client.
    ///
    /// Useful for testing or for sharing a connection pool across providers.
    pub fn with_client(config: ResendConfig, client: Client) -> Self {
        Self {
            config,
            client,
            pacing: Pacing::default(),
        }
    }

    /// Override the bulk dispatch pacing (zero in tests).
    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    fn build_request(&self, email: &Email) -> ResendSendRequest {
        ResendSendRequest {
            from: email
                .from
                .clone()
                .unwrap_or_else(|| self.config.default_from.clone()),
            to: email.to.clone(),
            subject: email.subject.clone(),
            html: email.html.clone(),
            text: email.text.clone(),
            reply_to: email.reply_to.clone(),
            tags: if email.tags.is_empty() {
                None
            } else {
                Some(
                    email
                        .tags
                        .iter()
                        .map(|tag| ResendTag {
                            name: tag.clone(),
                            value: "true".to_owned(),
                        })
                        .collect(),
                )
            },
        }
    }
}

impl Provider for ResendProvider {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "resend"
    }

    #[instrument(skip(self, email), fields(provider = "resend", subject = %email.subject))]
    async fn send(&self, email: &Email) -> SendOutcome {
        let url = format!("{}/emails", self.config.api_base_url);
        let request = self.build_request(email);

        debug!(to = ?email.to, "submitting email to Resend");

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return SendOutcome::failed(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                warn!("Resend API rate limit hit");
            }
            let error = match response.json::<ResendErrorResponse>().await {
                Ok(body) => body
                    .message
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
                Err(_) => format!("HTTP {}", status.as_u16()),
            };
            return SendOutcome::failed(error);
        }

        match response.json::<ResendSendResponse>().await {
            Ok(body) => SendOutcome::sent(body.id),
            Err(e) => SendOutcome::failed(format!("failed to parse Resend response: {e}")),
        }
    }

    fn pacing(&self) -> Pacing {
        self.pacing
    }

    #[instrument(skip(self), fields(provider = "resend"))]
    async fn verify(&self) -> bool {
        let url = format!("{}/domains", self.config.api_base_url);

        debug!("verifying Resend credentials via the domain list");

        match self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
