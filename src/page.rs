//! Page assembly: everything the host template needs for one render.

use serde::Serialize;
use serde_json::Value;

use crate::config::PluginConfig;
use crate::layout::parse_divisions;
use crate::line::{render_divisions, DisplayDivision};
use crate::settings::Settings;
use crate::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Dimensions {
    /// Create dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Swap width and height for a vertically mounted display.
    #[must_use]
    pub fn oriented(self, vertical: bool) -> Self {
        if vertical {
            Self {
                width: self.height,
                height: self.width,
            }
        } else {
            self
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

/// Template parameters for the host renderer.
///
/// Divisions are fully resolved. When the settings configure no divisions,
/// `divisions` is empty and `json_fallback` holds the pretty-printed payload
/// so the page still shows something useful.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContext {
    /// Title above the divisions (may be empty)
    pub page_title: String,

    /// Resolved divisions, in order
    pub divisions: Vec<DisplayDivision>,

    /// Raw JSON shown when no divisions are configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_fallback: Option<String>,

    /// Endpoint the data was fetched from
    pub endpoint_url: String,

    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Submitted settings, passed through untouched
    pub plugin_settings: Settings,
}

/// Build the page context from settings and fetched JSON.
///
/// # Example
///
/// ```
/// use nodered_display::{build_page, Dimensions, PluginConfig, Settings};
/// use serde_json::json;
///
/// let settings = Settings::new()
///     .with("pageTitle", "Garden")
///     .with("division_0_type[]", vec!["dataoutput"])
///     .with("division_0_value[]", vec!["soil.moisture"])
///     .with("division_0_format[]", vec!["Soil: {value}%"]);
/// let config = PluginConfig::from_settings(&settings).unwrap();
///
/// let page = build_page(
///     &settings,
///     &config,
///     &json!({"soil": {"moisture": 37}}),
///     Dimensions::default(),
/// );
///
/// assert_eq!(page.page_title, "Garden");
/// assert_eq!(page.divisions[0].output_lines[0].display_text, "Soil: 37%");
/// assert!(page.json_fallback.is_none());
/// ```
pub fn build_page(
    settings: &Settings,
    config: &PluginConfig,
    data: &Value,
    dimensions: Dimensions,
) -> PageContext {
    let divisions = parse_divisions(settings);

    let (divisions, json_fallback) = if divisions.is_empty() {
        tracing::warn!("No divisions configured, displaying raw JSON");
        let raw = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
        (Vec::new(), Some(raw))
    } else {
        tracing::debug!("Rendering {} divisions", divisions.len());
        (render_divisions(&divisions, data), None)
    };

    PageContext {
        page_title: config.page_title.clone(),
        divisions,
        json_fallback,
        endpoint_url: config.full_url(),
        width: dimensions.width,
        height: dimensions.height,
        plugin_settings: settings.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dimensions() {
        let dims = Dimensions::default();
        assert_eq!(dims, Dimensions::new(800, 480));
        assert_eq!(dims.oriented(true), Dimensions::new(480, 800));
        assert_eq!(dims.oriented(false), dims);
    }

    #[test]
    fn test_fallback_when_no_divisions() {
        let settings = Settings::new().with("pageTitle", "Raw");
        let config = PluginConfig::from_settings(&settings).unwrap();
        let data = json!({"city": "Zürich", "temp": 4});

        let page = build_page(&settings, &config, &data, Dimensions::default());

        assert!(page.divisions.is_empty());
        let raw = page.json_fallback.unwrap();
        assert!(raw.contains("\"city\": \"Zürich\""));
        assert!(raw.contains("\n  \"temp\": 4"));
        assert_eq!(page.endpoint_url, "http://localhost:1880/inkypi/data");
    }

    #[test]
    fn test_fallback_keeps_payload_key_order() {
        let settings = Settings::new();
        let config = PluginConfig::from_settings(&settings).unwrap();
        let data: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": {"y": 2, "b": 3}}"#).unwrap();

        let page = build_page(&settings, &config, &data, Dimensions::default());

        assert_eq!(
            page.json_fallback.unwrap(),
            "{\n  \"zeta\": 1,\n  \"alpha\": {\n    \"y\": 2,\n    \"b\": 3\n  }\n}"
        );
    }

    #[test]
    fn test_divisions_rendered() {
        let settings = Settings::new()
            .with("division_0_type[]", vec!["title", "divider", "dataoutput"])
            .with("division_0_value[]", vec!["Office", "", "co2"])
            .with("division_0_format[]", vec!["", "", "{value} ppm"])
            .with("division_3_type[]", vec!["dataoutput"])
            .with("division_3_value[]", vec!["missing.path"]);
        let config = PluginConfig::from_settings(&settings).unwrap();
        let data = json!({"co2": 612});

        let page = build_page(&settings, &config, &data, Dimensions::new(600, 448));

        assert_eq!(page.divisions.len(), 2);
        let texts: Vec<&str> = page.divisions[0]
            .output_lines
            .iter()
            .map(|l| l.display_text.as_str())
            .collect();
        assert_eq!(texts, vec!["Office", "", "612 ppm"]);
        assert_eq!(page.divisions[1].output_lines[0].display_text, "??");
        assert_eq!((page.width, page.height), (600, 448));
    }

    #[test]
    fn test_page_serialization() {
        let settings = Settings::new()
            .with("division_0_type[]", vec!["title"])
            .with("division_0_value[]", vec!["Hello"]);
        let config = PluginConfig::from_settings(&settings).unwrap();

        let page = build_page(&settings, &config, &json!({}), Dimensions::default());
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["divisions"][0]["outputLines"][0]["display_text"], "Hello");
        assert_eq!(json["width"], 800);
        assert!(json.get("json_fallback").is_none());
        assert_eq!(json["plugin_settings"]["division_0_value[]"][0], "Hello");
    }
}
