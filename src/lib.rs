//! # nodered-display
//!
//! Layout, data extraction and page assembly for e-ink dashboards fed by a
//! [Node-RED](https://nodered.org) HTTP endpoint.
//!
//! A render cycle looks like this:
//! 1. The host hands over the plugin's settings form as a flat mapping
//! 2. Node-RED is queried for JSON (or ready-made HTML)
//! 3. The form's division rows are parsed into a layout
//! 4. Each line's dot-path is looked up in the JSON and formatted
//! 5. The resulting [`PageContext`] goes to the host's template/renderer
//!
//! Steps 3 and 4 never fail: missing fields fall back to defaults and missing
//! data shows as `??`, so one bad line never blanks the whole screen.
//!
//! ## Quick Start
//!
//! ```
//! use nodered_display::{build_page, Dimensions, PluginConfig, Settings};
//! use serde_json::json;
//!
//! let settings = Settings::from_form(concat!(
//!     "pageTitle=Weather",
//!     "&division_0_type%5B%5D=title&division_0_value%5B%5D=Outside",
//!     "&division_0_type%5B%5D=dataoutput&division_0_value%5B%5D=outdoor.temp",
//!     "&division_0_format%5B%5D=&division_0_format%5B%5D=%7Bvalue%7D%C2%B0C",
//! ));
//! let config = PluginConfig::from_settings(&settings).unwrap();
//!
//! let data = json!({"outdoor": {"temp": 12.5}});
//! let page = build_page(&settings, &config, &data, Dimensions::default());
//!
//! let lines = &page.divisions[0].output_lines;
//! assert_eq!(lines[0].display_text, "Outside");
//! assert_eq!(lines[1].display_text, "12.5°C");
//! ```
//!
//! ## Settings Form
//!
//! | Key | Default | Purpose |
//! |-----|---------|---------|
//! | `nodeRedUrl` | `http://localhost:1880` | Node-RED base URL |
//! | `endpointPath` | `/inkypi/data` | HTTP-in node path |
//! | `timeout` | `10` | Request timeout (seconds) |
//! | `htmlMode` | `false` | Pass Node-RED HTML through untouched |
//! | `pageTitle` | empty | Title above the divisions |
//! | `division_<N>_<field>[]` | see [`Field`] | One entry per output line |
//!
//! ## Feature Flags
//!
//! - `fetch` - HTTP client for the Node-RED endpoint
//! - `axum` - Axum extractor for settings query strings
//! - `yaml` - Load settings from YAML files
//! - `full` - All features

pub mod config;
mod error;
pub mod extract;
pub mod layout;
pub mod line;
pub mod page;
pub mod settings;

pub use config::PluginConfig;
pub use error::Error;
pub use extract::{extract_value, value_text};
pub use layout::{parse_divisions, Division, Field, LineType, OutputLineSpec};
pub use line::{render_divisions, render_line, DisplayDivision, DisplayLine, MISSING_VALUE};
pub use page::{build_page, Dimensions, PageContext};
pub use settings::{SettingValue, Settings};

/// Default display width in pixels
pub const DISPLAY_WIDTH: u32 = 800;

/// Default display height in pixels
pub const DISPLAY_HEIGHT: u32 = 480;

/// Node-RED URL used when `nodeRedUrl` is not set
pub const DEFAULT_NODE_RED_URL: &str = "http://localhost:1880";

/// Endpoint path used when `endpointPath` is not set
pub const DEFAULT_ENDPOINT_PATH: &str = "/inkypi/data";

/// Request timeout used when `timeout` is not set
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// Optional modules
#[cfg(feature = "fetch")]
pub mod client;
#[cfg(feature = "fetch")]
pub use client::{Client, Output};

// Re-export axum integration
#[cfg(feature = "axum")]
pub mod axum_ext;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DISPLAY_WIDTH, 800);
        assert_eq!(DISPLAY_HEIGHT, 480);
        assert_eq!(DEFAULT_TIMEOUT_SECS, 10);
        assert!(!DEFAULT_NODE_RED_URL.ends_with('/'));
        assert!(DEFAULT_ENDPOINT_PATH.starts_with('/'));
    }
}
