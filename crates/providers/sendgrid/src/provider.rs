use hermod_core::{Email, SendOutcome};
use hermod_provider::{Pacing, Provider};
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::SendGridConfig;
use crate::types::{
    SendGridAddress, SendGridContent, SendGridErrorResponse, SendGridPersonalization,
    SendGridSendRequest,
};

/// SendGrid provider that delivers mail via the v3 mail send API.
///
/// SendGrid acknowledges accepted mail with `202 Accepted` and an empty body;
/// the assigned message id travels in the `X-Message-Id` response header and
/// may be absent, which still counts as success.
pub struct SendGridProvider {
    config: SendGridConfig,
    client: Client,
    pacing: Pacing,
}

impl SendGridProvider {
    /// Create a new SendGrid provider with the given configuration.
    ///
    /// Uses a default `reqwest::Client` with reasonable timeouts.
    pub fn new(config: SendGridConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self::with_client(config, client)
    }

    /// Create a new SendGrid provider with a custom HTTP client.
    ///
    /// Useful for testing or for sharing a connection pool across providers.
    pub fn with_client(config: SendGridConfig, client: Client) -> Self {
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

    fn build_request(&self, email: &Email) -> SendGridSendRequest {
        let mut content = Vec::new();
        if let Some(text) = &email.text {
            content.push(SendGridContent {
                content_type: "text/plain".to_owned(),
                value: text.clone(),
            });
        }
        if let Some(html) = &email.html {
            content.push(SendGridContent {
                content_type: "text/html".to_owned(),
                value: html.clone(),
            });
        }

        SendGridSendRequest {
            personalizations: vec![SendGridPersonalization {
                to: email
                    .to
                    .iter()
                    .map(|to| SendGridAddress::new(to.clone()))
                    .collect(),
            }],
            from: SendGridAddress::new(
                email
                    .from
                    .clone()
                    .unwrap_or_else(|| self.config.default_from.clone()),
            ),
            subject: email.subject.clone(),
            content,
            reply_to: email.reply_to.clone().map(SendGridAddress::new),
            categories: if email.tags.is_empty() {
                None
            } else {
                Some(email.tags.clone())
            },
        }
    }
}

impl Provider for SendGridProvider {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "sendgrid"
    }

    #[instrument(skip(self, email), fields(provider = "sendgrid", subject = %email.subject))]
    async fn send(&self, email: &Email) -> SendOutcome {
        let url = format!("{}/v3/mail/send", self.config.api_base_url);
        let request = self.build_request(email);

        debug!(to = ?email.to, "submitting email to SendGrid");

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
                warn!("SendGrid API rate limit hit");
            }
            let error = match response.json::<SendGridErrorResponse>().await {
                Ok(body) => body
                    .errors
                    .into_iter()
                    .next()
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
                Err(_) => format!("HTTP {}", status.as_u16()),
            };
            return SendOutcome::failed(error);
        }

        match response
            .headers()
            .get("X-Message-Id")
            .and_then(|value| value.to_str().ok())
        {
            Some(id) => SendOutcome::sent(id),
            None => SendOutcome::sent_without_id(),
        }
    }

    fn pacing(&self) -> Pacing {
        self.pacing
    }

    #[instrument(skip(self), fields(provider = "sendgrid"))]
    async fn verify(&self) -> bool {
        // No ping endpoint in the v3 API; listing the key's scopes exercises
        // authentication without side effects.
        let url = format!("{}/v3/scopes", self.config.api_base_url);

        debug!("verifying SendGrid credentials via the scope list");

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
