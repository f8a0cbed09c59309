//! In-memory form of a component schema.
//!
//! The serialized layout is the CMS component format: the field map sits
//! under the `schema` key and field positions under `pos`.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of field types the CMS accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Boolean,
    Option,
    Multilink,
    Asset,
    Bloks,
    Richtext,
    Markdown,
    Date,
    Datetime,
    File,
    Image,
    Video,
    Custom,
}

impl FieldType {
    /// Every accepted type, in the order used by error messages.
    pub const ALL: [FieldType; 16] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Option,
        FieldType::Multilink,
        FieldType::Asset,
        FieldType::Bloks,
        FieldType::Richtext,
        FieldType::Markdown,
        FieldType::Date,
        FieldType::Datetime,
        FieldType::File,
        FieldType::Image,
        FieldType::Video,
        FieldType::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Option => "option",
            FieldType::Multilink => "multilink",
            FieldType::Asset => "asset",
            FieldType::Bloks => "bloks",
            FieldType::Richtext => "richtext",
            FieldType::Markdown => "markdown",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::File => "file",
            FieldType::Image => "image",
            FieldType::Video => "video",
            FieldType::Custom => "custom",
        }
    }

    /// Comma separated list of valid type names.
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown field type `{s}`"))
    }
}

/// One selectable entry of an `option` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub value: String,
    pub name: String,
}

impl OptionEntry {
    pub fn new(value: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: name.into(),
        }
    }
}

fn default_required() -> bool {
    true
}

/// A single field of a component schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, alias = "position", skip_serializing_if = "Option::is_none")]
    pub pos: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_components: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_whitelist: Option<Vec<String>>,
    /// CMS attributes without a dedicated slot (`filetypes`, `link_type`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Field {
    /// A required field of the given type with nothing else set.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            pos: None,
            description: None,
            default_value: None,
            options: None,
            restrict_components: None,
            component_whitelist: None,
            extra: IndexMap::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = Some(
            options
                .iter()
                .map(|(value, name)| OptionEntry::new(*value, *name))
                .collect(),
        );
        self
    }

    /// Restricts a `bloks` field to the named components.
    pub fn whitelist(mut self, components: &[&str]) -> Self {
        self.restrict_components = Some(true);
        self.component_whitelist = Some(components.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whitelisted component names, empty unless this field nests blocks.
    pub fn nested_components(&self) -> &[String] {
        match (&self.field_type, &self.component_whitelist) {
            (FieldType::Bloks, Some(list)) => list,
            _ => &[],
        }
    }
}

/// A CMS component definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub display_name: String,
    pub is_nestable: bool,
    pub is_root: bool,
    #[serde(rename = "schema")]
    pub fields: IndexMap<String, Field>,
}

impl Schema {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field positions in ascending order.
    pub fn sorted_positions(&self) -> Vec<u32> {
        let mut positions: Vec<u32> = self.fields.values().filter_map(|f| f.pos).collect();
        positions.sort_unstable();
        positions
    }

    /// All whitelisted nested component names, in field order.
    pub fn nested_components(&self) -> Vec<&str> {
        self.fields
            .values()
            .flat_map(|f| f.nested_components())
            .map(String::as_str)
            .collect()
    }
}

/// Storage category of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Page-level content section.
    Bloks,
    /// Reusable item only used inside another component.
    Nested,
}

impl Category {
    /// Probe order used by lookups.
    pub const SEARCH_ORDER: [Category; 2] = [Category::Bloks, Category::Nested];

    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Bloks => "bloks",
            Category::Nested => "nested",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
