//! HTTP client for the Node-RED endpoint.
//!
//! One GET per render cycle, no retries. Failures are classified into
//! [`Error`] variants whose messages are suitable for showing to the user.

use std::time::Duration;

use serde_json::Value;

use crate::config::PluginConfig;
use crate::error::Error;
use crate::page::{build_page, Dimensions, PageContext};
use crate::settings::Settings;

/// Number of body characters included in debug logs.
const PREVIEW_CHARS: usize = 500;

/// Result of one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// HTML mode: the response body, to be rendered as-is
    Html(String),
    /// JSON mode: template parameters built from the payload
    Page(PageContext),
}

/// Node-RED client for one plugin configuration.
///
/// # Example
///
/// ```rust,no_run
/// use nodered_display::{Client, Dimensions, Output, Settings};
///
/// # async fn example() -> Result<(), nodered_display::Error> {
/// let settings = Settings::from_form(
///     "nodeRedUrl=http://localhost:1880&division_0_type%5B%5D=dataoutput&division_0_value%5B%5D=temp",
/// );
/// let client = Client::from_settings(&settings)?;
///
/// match client.generate(&settings, Dimensions::default()).await? {
///     Output::Html(html) => println!("{} bytes of HTML", html.len()),
///     Output::Page(page) => println!("{} divisions", page.divisions.len()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: PluginConfig,
}

impl Client {
    /// Create a client with the configured timeout.
    pub fn new(config: PluginConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { http, config }
    }

    /// Read the configuration from settings and create a client.
    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        Ok(Self::new(PluginConfig::from_settings(settings)?))
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// GET the endpoint and return the response body.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if the request exceeds the configured timeout
    /// - [`Error::Connection`] if Node-RED cannot be reached
    /// - [`Error::Http`] for a non-success status
    /// - [`Error::Request`] for any other transport failure
    pub async fn fetch(&self) -> Result<String, Error> {
        let url = self.config.full_url();
        tracing::info!("Fetching data from Node-RED: {}", url);
        tracing::debug!(
            "Making HTTP GET request to {} with timeout {}s",
            url,
            self.config.timeout_secs
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        tracing::info!("HTTP Status Code: {}", status.as_u16());
        tracing::debug!("Response Headers: {:?}", response.headers());

        if !status.is_success() {
            tracing::error!("HTTP error from Node-RED: {}", status);
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    /// GET the endpoint and parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Everything [`fetch`](Self::fetch) returns, plus [`Error::InvalidJson`].
    pub async fn fetch_json(&self) -> Result<Value, Error> {
        let body = self.fetch().await?;
        match serde_json::from_str(&body) {
            Ok(data) => {
                tracing::info!("Successfully fetched JSON data from Node-RED");
                Ok(data)
            }
            Err(e) => {
                tracing::error!("Invalid JSON response: {}", e);
                tracing::debug!("Response content: {}", preview(&body));
                Err(Error::InvalidJson(e.to_string()))
            }
        }
    }

    /// Run one render cycle.
    ///
    /// In HTML mode the body is returned untouched. Otherwise the body is
    /// parsed as JSON and combined with the division layout in `settings`.
    pub async fn generate(
        &self,
        settings: &Settings,
        dimensions: Dimensions,
    ) -> Result<Output, Error> {
        if self.config.html_mode {
            tracing::info!("HTML mode enabled, passing Node-RED HTML through");
            let html = self.fetch().await?;
            tracing::debug!("HTML content length: {} characters", html.len());
            tracing::debug!("HTML content preview: {}", preview(&html));
            return Ok(Output::Html(html));
        }

        tracing::info!("JSON mode enabled, applying layout configuration");
        let data = self.fetch_json().await?;
        Ok(Output::Page(build_page(
            settings,
            &self.config,
            &data,
            dimensions,
        )))
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            tracing::error!(
                "Request to {} timed out after {}s",
                self.config.full_url(),
                self.config.timeout_secs
            );
            Error::Timeout {
                secs: self.config.timeout_secs,
            }
        } else {
            tracing::error!("Request to {} failed: {}", self.config.full_url(), err);
            Error::from(err)
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}
