//! Resolving output lines against fetched data.

use serde::Serialize;
use serde_json::Value;

use crate::extract::{extract_value, value_text};
use crate::layout::{Division, LineType, OutputLineSpec, VALUE_PLACEHOLDER};

/// Text substituted for `{value}` when a data path is not found.
pub const MISSING_VALUE: &str = "??";

/// An output line after data substitution, ready for the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLine {
    /// Line type, carried through for the template
    #[serde(rename = "type")]
    pub line_type: LineType,

    /// Font family
    pub font: String,

    /// Size keyword
    pub size: String,

    /// CSS color
    pub color: String,

    /// Text alignment
    pub alignment: String,

    /// Final text to draw
    pub display_text: String,
}

/// A division of resolved lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DisplayDivision {
    /// Lines in display order
    #[serde(rename = "outputLines")]
    pub output_lines: Vec<DisplayLine>,
}

/// Resolve a single line against the fetched JSON.
///
/// - `title` lines show their (trimmed) value verbatim.
/// - `divider` lines have no text.
/// - `dataoutput` lines look their value up with [`extract_value`] and
///   substitute it for every `{value}` in the format, or `??` if not found.
/// - Any other type renders without text.
///
/// # Example
///
/// ```
/// use nodered_display::{render_line, OutputLineSpec};
/// use serde_json::json;
///
/// let spec = OutputLineSpec {
///     value: "weather.temp".to_string(),
///     format: "{value}°C".to_string(),
///     ..Default::default()
/// };
///
/// let line = render_line(&spec, &json!({"weather": {"temp": 21}}));
/// assert_eq!(line.display_text, "21°C");
///
/// let line = render_line(&spec, &json!({}));
/// assert_eq!(line.display_text, "??°C");
/// ```
pub fn render_line(spec: &OutputLineSpec, data: &Value) -> DisplayLine {
    let value = spec.value.trim();
    let format = spec.format.trim();

    let display_text = match &spec.line_type {
        LineType::Title => value.to_string(),
        LineType::Divider | LineType::Other(_) => String::new(),
        LineType::DataOutput => match extract_value(data, value) {
            Some(found) => format.replace(VALUE_PLACEHOLDER, &value_text(found)),
            None => {
                tracing::warn!("JSON key '{}' not found in response", value);
                format.replace(VALUE_PLACEHOLDER, MISSING_VALUE)
            }
        },
    };

    DisplayLine {
        line_type: spec.line_type.clone(),
        font: spec.font.clone(),
        size: spec.size.clone(),
        color: spec.color.clone(),
        alignment: spec.alignment.clone(),
        display_text,
    }
}

/// Resolve every line of every division, preserving order.
pub fn render_divisions(divisions: &[Division], data: &Value) -> Vec<DisplayDivision> {
    divisions
        .iter()
        .map(|division| DisplayDivision {
            output_lines: division
                .output_lines
                .iter()
                .map(|spec| render_line(spec, data))
                .collect(),
        })
        .collect()
}
