// API client module: a small blocking HTTP client that talks to the
// workflow webhooks. It is synchronous on purpose: every menu action
// waits for its single request to finish.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Status code and raw text body of a webhook reply. Any status counts
/// as a reply; deciding what a status means is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookReply {
    pub status: u16,
    pub body: String,
}

impl WebhookReply {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Transport used by the relay. `Err` means the request never produced a
/// reply (DNS, refused connection, timeout, unreadable body).
pub trait Webhook {
    fn get(&self, url: &str) -> Result<WebhookReply>;
    fn post_json(&self, url: &str, body: &Value) -> Result<WebhookReply>;
}

/// Holds a reqwest blocking client configured with the request timeout.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient { client })
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: Client) -> Self {
        ApiClient { client }
    }

    fn read_reply(res: reqwest::blocking::Response) -> Result<WebhookReply> {
        let status = res.status().as_u16();
        let body = res.text().context("Failed to read webhook response body")?;
        debug!(status, bytes = body.len(), "webhook replied");
        Ok(WebhookReply { status, body })
    }
}

impl Webhook for ApiClient {
    fn get(&self, url: &str) -> Result<WebhookReply> {
        debug!(url, "GET webhook");
        let res = self
            .client
            .get(url)
            .send()
            .context("Failed to send request")?;
        Self::read_reply(res)
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<WebhookReply> {
        debug!(url, "POST webhook");
        let res = self
            .client
            .post(url)
            .json(body)
            .send()
            .context("Failed to send request")?;
        Self::read_reply(res)
    }
}
