//! Page-level plugin configuration read from the settings mapping.

use crate::settings::Settings;
use crate::{DEFAULT_ENDPOINT_PATH, DEFAULT_NODE_RED_URL, DEFAULT_TIMEOUT_SECS};
use crate::Error;

/// Connection and page settings for one render cycle.
///
/// # Example
///
/// ```
/// use nodered_display::{PluginConfig, Settings};
///
/// let settings = Settings::new()
///     .with("nodeRedUrl", "http://192.168.1.20:1880/")
///     .with("endpointPath", "/dashboard");
///
/// let config = PluginConfig::from_settings(&settings).unwrap();
/// assert_eq!(config.full_url(), "http://192.168.1.20:1880/dashboard");
/// assert_eq!(config.timeout_secs, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Node-RED base URL, without trailing slash (`nodeRedUrl`)
    pub node_red_url: String,

    /// Path of the HTTP-in node (`endpointPath`)
    pub endpoint_path: String,

    /// Request timeout in seconds (`timeout`)
    pub timeout_secs: u64,

    /// Render the response body as HTML instead of parsing JSON (`htmlMode`)
    pub html_mode: bool,

    /// Title shown above the divisions (`pageTitle`)
    pub page_title: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            node_red_url: DEFAULT_NODE_RED_URL.to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            html_mode: false,
            page_title: String::new(),
        }
    }
}

impl PluginConfig {
    /// Read the configuration from submitted settings.
    ///
    /// Missing keys fall back to defaults. A URL or endpoint path that is
    /// present but blank is an error, as is a non-numeric timeout.
    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        let node_red_url = settings
            .get_str("nodeRedUrl")
            .unwrap_or(DEFAULT_NODE_RED_URL)
            .trim()
            .trim_end_matches('/')
            .to_string();
        let endpoint_path = settings
            .get_str("endpointPath")
            .unwrap_or(DEFAULT_ENDPOINT_PATH)
            .trim()
            .to_string();

        let timeout_secs = match settings.get_str("timeout") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                tracing::error!("Invalid timeout setting: {:?}", raw);
                Error::Config("Timeout must be a whole number of seconds.".to_string())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        if node_red_url.is_empty() {
            tracing::error!("Node-RED URL is required");
            return Err(Error::Config("Node-RED URL is required.".to_string()));
        }

        if endpoint_path.is_empty() {
            tracing::error!("Endpoint path is required");
            return Err(Error::Config("Endpoint path is required.".to_string()));
        }

        Ok(Self {
            node_red_url,
            endpoint_path,
            timeout_secs,
            html_mode: settings.get_str("htmlMode") == Some("true"),
            page_title: settings
                .get_str("pageTitle")
                .unwrap_or_default()
                .trim()
                .to_string(),
        })
    }

    /// Full endpoint URL (base URL followed by endpoint path).
    pub fn full_url(&self) -> String {
        format!("{}{}", self.node_red_url, self.endpoint_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PluginConfig::from_settings(&Settings::new()).unwrap();
        assert_eq!(config, PluginConfig::default());
        assert_eq!(config.full_url(), "http://localhost:1880/inkypi/data");
        assert!(!config.html_mode);
    }

    #[test]
    fn test_trims_and_strips_trailing_slashes() {
        let settings = Settings::new()
            .with("nodeRedUrl", "  http://nodered.local:1880// ")
            .with("endpointPath", " /sensors ")
            .with("timeout", " 3 ")
            .with("pageTitle", "  Greenhouse ");

        let config = PluginConfig::from_settings(&settings).unwrap();
        assert_eq!(config.full_url(), "http://nodered.local:1880/sensors");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.page_title, "Greenhouse");
    }

    #[test]
    fn test_html_mode_requires_exact_true() {
        let on = Settings::new().with("htmlMode", "true");
        let off = Settings::new().with("htmlMode", "True");

        assert!(PluginConfig::from_settings(&on).unwrap().html_mode);
        assert!(!PluginConfig::from_settings(&off).unwrap().html_mode);
    }

    #[test]
    fn test_blank_url_is_config_error() {
        let settings = Settings::new().with("nodeRedUrl", "  / ");
        let err = PluginConfig::from_settings(&settings).unwrap_err();
        assert_eq!(err.to_string(), "Node-RED URL is required.");
    }

    #[test]
    fn test_blank_endpoint_is_config_error() {
        let settings = Settings::new().with("endpointPath", "");
        let err = PluginConfig::from_settings(&settings).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Endpoint path is required.");
    }

    #[test]
    fn test_bad_timeout_is_config_error() {
        let settings = Settings::new().with("timeout", "soon");
        assert!(matches!(
            PluginConfig::from_settings(&settings),
            Err(Error::Config(_))
        ));
    }
}
