//! Structural schema validation.
//!
//! Validation runs on the raw JSON document so that type mistakes (a string
//! `pos`, a numeric `is_root`) are reported as findings instead of decode
//! failures. Every problem is collected; nothing short-circuits except a
//! missing field map.

use std::fmt;

use serde_json::{Map, Value};

use crate::schema::{
    model::FieldType,
    store::{SchemaStore, StoreError},
};

/// One validation finding, optionally tied to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    fn schema(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    fn field(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{field}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Outcome of validating a stored schema.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn non_empty_str(v: Option<&Value>) -> Option<&str> {
    v.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Checks the document shape of one schema against `expected_name`.
pub fn validate(schema: &Value, expected_name: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let name = schema.get("name");

    if non_empty_str(name).is_none() {
        errors.push(ValidationError::schema(r#"Schema missing "name" field"#));
    }
    if non_empty_str(schema.get("display_name")).is_none() {
        errors.push(ValidationError::schema(
            r#"Schema missing "display_name" field"#,
        ));
    }
    if name.and_then(Value::as_str) != Some(expected_name) {
        let found = match name {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "undefined".to_string(),
        };
        errors.push(ValidationError::schema(format!(
            r#"Schema name "{found}" does not match component name "{expected_name}""#
        )));
    }
    for flag in ["is_nestable", "is_root"] {
        if !schema.get(flag).is_some_and(Value::is_boolean) {
            errors.push(ValidationError::schema(format!(
                r#"Schema "{flag}" must be a boolean"#
            )));
        }
    }

    let Some(fields) = schema.get("schema").and_then(Value::as_object) else {
        errors.push(ValidationError::schema(
            r#"Schema missing or invalid "schema" field"#,
        ));
        return errors;
    };

    let mut positions = Vec::new();
    for (field_name, field) in fields {
        validate_field(field_name, field, &mut positions, &mut errors);
    }

    positions.sort_unstable();
    if let Some((expected, found)) = positions
        .iter()
        .enumerate()
        .find(|(i, p)| **p != *i as u64)
    {
        errors.push(ValidationError::schema(format!(
            "Field positions are not sequential. Expected {expected}, found {found}"
        )));
    }

    errors
}

fn validate_field(
    name: &str,
    field: &Value,
    positions: &mut Vec<u64>,
    errors: &mut Vec<ValidationError>,
) {
    let empty = Map::new();
    let attrs = field.as_object().unwrap_or(&empty);

    let Some(type_name) = non_empty_str(attrs.get("type")) else {
        errors.push(ValidationError::field(name, r#"Field missing "type""#));
        return;
    };
    let field_type = type_name.parse::<FieldType>().ok();
    if field_type.is_none() {
        errors.push(ValidationError::field(
            name,
            format!(
                r#"Invalid field type "{type_name}". Valid types: {}"#,
                FieldType::valid_list()
            ),
        ));
    }

    if let Some(pos) = attrs.get("pos").or_else(|| attrs.get("position")) {
        match pos.as_u64() {
            None if pos.is_number() => errors.push(ValidationError::field(
                name,
                r#"Field "pos" must be a non-negative integer"#,
            )),
            None => errors.push(ValidationError::field(name, r#"Field "pos" must be a number"#)),
            Some(p) if positions.contains(&p) => {
                errors.push(ValidationError::field(name, format!("Duplicate position {p}")))
            }
            Some(p) => positions.push(p),
        }
    }

    if attrs.get("required").is_some_and(|r| !r.is_boolean()) {
        errors.push(ValidationError::field(
            name,
            r#"Field "required" must be a boolean"#,
        ));
    }

    match field_type {
        Some(FieldType::Option) => match attrs.get("options").and_then(Value::as_array) {
            None => errors.push(ValidationError::field(
                name,
                r#"Option field must have "options" array"#,
            )),
            Some(options) => {
                for option in options {
                    let value = non_empty_str(option.get("value"));
                    let label = non_empty_str(option.get("name"));
                    if value.is_none() || label.is_none() {
                        errors.push(ValidationError::field(
                            name,
                            r#"Option must have "value" and "name""#,
                        ));
                    }
                }
            }
        },
        Some(FieldType::Bloks) => {
            let restricted = attrs
                .get("restrict_components")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let has_whitelist = attrs
                .get("component_whitelist")
                .and_then(Value::as_array)
                .is_some_and(|l| !l.is_empty());
            if restricted && !has_whitelist {
                errors.push(ValidationError::field(
                    name,
                    "Bloks field with restrict_components must have component_whitelist",
                ));
            }
        }
        _ => {}
    }
}

/// Reports whitelist entries that do not resolve in either store category.
pub fn check_nested_components(schema: &Value, store: &SchemaStore) -> Vec<ValidationError> {
    let Some(fields) = schema.get("schema").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut errors = Vec::new();
    for (field_name, field) in fields {
        if field.get("type").and_then(Value::as_str) != Some(FieldType::Bloks.as_str()) {
            continue;
        }
        let Some(whitelist) = field.get("component_whitelist").and_then(Value::as_array) else {
            continue;
        };
        for nested in whitelist.iter().filter_map(Value::as_str) {
            if !store.exists(nested) {
                errors.push(ValidationError::field(
                    field_name,
                    format!(r#"Referenced nested component "{nested}" schema not found"#),
                ));
            }
        }
    }
    errors
}

/// Loads `name` from the store and runs structural and nested checks.
///
/// Load failures are reported as a single finding.
pub fn validate_schema_file(name: &str, store: &SchemaStore) -> ValidationReport {
    let raw = match store.load_raw(name) {
        Ok(raw) => raw.value,
        Err(e @ (StoreError::NotFound { .. } | StoreError::Parse { .. })) => {
            return ValidationReport {
                errors: vec![ValidationError::schema(e.to_string())],
            };
        }
        Err(e) => {
            return ValidationReport {
                errors: vec![ValidationError::schema(format!(
                    "Could not read schema {name}.json: {e}"
                ))],
            };
        }
    };

    let mut errors = validate(&raw, name);
    errors.extend(check_nested_components(&raw, store));
    ValidationReport { errors }
}
