//! Settings-to-layout parsing.
//!
//! The settings form lets users build a page out of *divisions*, each holding
//! a list of *output lines*. The form submits one array-suffixed key per
//! division and field:
//!
//! ```text
//! division_0_type[]   = ["title", "dataoutput"]
//! division_0_value[]  = ["Greenhouse", "sensors.temperature"]
//! division_0_format[] = ["", "{value}°C"]
//! division_1_type[0]  = "divider"
//! ```
//!
//! [`parse_divisions`] turns that flat mapping back into ordered
//! [`Division`]s. It never fails: missing or short fields are filled from a
//! per-field default table, and keys that don't follow the pattern are ignored.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::settings::{SettingValue, Settings};

/// Key prefix shared by every division field.
const DIVISION_PREFIX: &str = "division_";

/// Number of per-line form fields.
const FIELD_COUNT: usize = 7;

/// Placeholder replaced by the extracted value in a line's format string.
pub const VALUE_PLACEHOLDER: &str = "{value}";

/// A per-line form field, in form column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Type,
    Value,
    Format,
    Font,
    Size,
    Color,
    Alignment,
}

impl Field {
    /// Every field, in column order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Type,
        Field::Value,
        Field::Format,
        Field::Font,
        Field::Size,
        Field::Color,
        Field::Alignment,
    ];

    /// Name used in form keys (`division_<N>_<name>[]`).
    pub fn name(self) -> &'static str {
        match self {
            Field::Type => "type",
            Field::Value => "value",
            Field::Format => "format",
            Field::Font => "font",
            Field::Size => "size",
            Field::Color => "color",
            Field::Alignment => "alignment",
        }
    }

    /// Value used when a line has no entry for this field.
    pub fn default_value(self) -> &'static str {
        match self {
            Field::Type => "dataoutput",
            Field::Value => "",
            Field::Format => VALUE_PLACEHOLDER,
            Field::Font => "Jost",
            Field::Size => "normal",
            Field::Color => "#000000",
            Field::Alignment => "left",
        }
    }

    fn column(self) -> usize {
        self as usize
    }
}

/// What an output line displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LineType {
    /// Static text taken verbatim from the line's `value`
    Title,
    /// Visual separator with no text
    Divider,
    /// Value looked up in the fetched JSON and substituted into `format`
    #[default]
    DataOutput,
    /// Anything else the form submitted; rendered without text
    Other(String),
}

impl LineType {
    /// Form string for this type.
    pub fn as_str(&self) -> &str {
        match self {
            LineType::Title => "title",
            LineType::Divider => "divider",
            LineType::DataOutput => "dataoutput",
            LineType::Other(raw) => raw,
        }
    }
}

impl From<&str> for LineType {
    fn from(raw: &str) -> Self {
        match raw {
            "title" => LineType::Title,
            "divider" => LineType::Divider,
            "dataoutput" => LineType::DataOutput,
            other => LineType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LineType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Declarative description of one display line, before data substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputLineSpec {
    /// Line type
    #[serde(rename = "type")]
    pub line_type: LineType,

    /// Title text, or dot-path into the JSON for data lines
    pub value: String,

    /// Template containing `{value}`
    pub format: String,

    /// Font family
    pub font: String,

    /// Size keyword
    pub size: String,

    /// CSS color
    pub color: String,

    /// Text alignment
    pub alignment: String,
}

impl Default for OutputLineSpec {
    fn default() -> Self {
        Self {
            line_type: LineType::default(),
            value: Field::Value.default_value().to_string(),
            format: Field::Format.default_value().to_string(),
            font: Field::Font.default_value().to_string(),
            size: Field::Size.default_value().to_string(),
            color: Field::Color.default_value().to_string(),
            alignment: Field::Alignment.default_value().to_string(),
        }
    }
}

/// A vertical group of output lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Division {
    /// Lines in submission order
    #[serde(rename = "outputLines")]
    pub output_lines: Vec<OutputLineSpec>,
}

/// Keys seen for one division, grouped by field column.
#[derive(Default)]
struct DivisionKeys<'a> {
    columns: [Vec<(&'a str, &'a SettingValue)>; FIELD_COUNT],
}

impl<'a> DivisionKeys<'a> {
    fn has_type(&self) -> bool {
        !self.columns[Field::Type.column()].is_empty()
    }

    /// Concatenate the values of each field's keys, ordered by key name.
    fn values(mut self) -> [Vec<&'a str>; FIELD_COUNT] {
        let mut values: [Vec<&'a str>; FIELD_COUNT] = Default::default();
        for (column, keys) in self.columns.iter_mut().enumerate() {
            keys.sort_by(|a, b| a.0.cmp(b.0));
            values[column] = keys
                .iter()
                .flat_map(|&(_, value)| value.values())
                .map(String::as_str)
                .collect();
        }
        values
    }
}

/// Split a form key into its division index and field.
///
/// Accepts `division_<N>_<field>[...]` where `<N>` is a signed integer in
/// canonical form (`division_01_*` and `division_+1_*` are not division 1);
/// anything else is `None`.
fn parse_key(key: &str) -> Option<(i64, Field)> {
    let rest = key.strip_prefix(DIVISION_PREFIX)?;
    let (raw_index, rest) = rest.split_once('_')?;
    let index: i64 = raw_index.parse().ok()?;
    if index.to_string() != raw_index {
        return None;
    }
    Field::ALL
        .into_iter()
        .find(|field| {
            rest.strip_prefix(field.name())
                .is_some_and(|suffix| suffix.starts_with('['))
        })
        .map(|field| (index, field))
}

/// Parse the flat settings mapping into ordered divisions.
///
/// Only divisions with at least one `type` key are produced, in ascending
/// index order. Within a division, each field's values are concatenated in
/// key-name order and zipped positionally; short fields are padded with
/// [`Field::default_value`]. Divisions that end up with no lines are dropped.
///
/// # Example
///
/// ```
/// use nodered_display::{parse_divisions, LineType, Settings};
///
/// let settings = Settings::new()
///     .with("division_0_type[]", vec!["title", "dataoutput"])
///     .with("division_0_value[]", vec!["Hi", "a.b"]);
///
/// let divisions = parse_divisions(&settings);
/// assert_eq!(divisions.len(), 1);
/// assert_eq!(divisions[0].output_lines[0].line_type, LineType::Title);
/// assert_eq!(divisions[0].output_lines[1].value, "a.b");
/// assert_eq!(divisions[0].output_lines[1].font, "Jost");
/// ```
pub fn parse_divisions(settings: &Settings) -> Vec<Division> {
    let mut by_index: BTreeMap<i64, DivisionKeys<'_>> = BTreeMap::new();

    for (key, value) in settings {
        if let Some((index, field)) = parse_key(key) {
            by_index.entry(index).or_default().columns[field.column()].push((key.as_str(), value));
        }
    }

    by_index
        .into_iter()
        .filter(|(_, keys)| keys.has_type())
        .filter_map(|(index, keys)| {
            let division = build_division(keys.values());
            if division.output_lines.is_empty() {
                tracing::debug!("Division {} has no output lines, skipping", index);
                None
            } else {
                Some(division)
            }
        })
        .collect()
}

fn build_division(columns: [Vec<&str>; FIELD_COUNT]) -> Division {
    let max_lines = columns.iter().map(Vec::len).max().unwrap_or(0);

    let cell = |field: Field, line: usize| -> String {
        columns[field.column()]
            .get(line)
            .copied()
            .unwrap_or(field.default_value())
            .to_string()
    };

    let output_lines = (0..max_lines)
        .map(|line| OutputLineSpec {
            line_type: LineType::from(cell(Field::Type, line).as_str()),
            value: cell(Field::Value, line),
            format: cell(Field::Format, line),
            font: cell(Field::Font, line),
            size: cell(Field::Size, line),
            color: cell(Field::Color, line),
            alignment: cell(Field::Alignment, line),
        })
        .collect();

    Division { output_lines }
}
