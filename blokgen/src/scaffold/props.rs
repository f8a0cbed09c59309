//! TypeScript property types for schema fields.

use crate::schema::model::{Field, FieldType, Schema};

/// TypeScript type of `field`, without the optional marker.
pub fn ts_type(field: &Field) -> String {
    match field.field_type {
        FieldType::Text | FieldType::Textarea | FieldType::Asset => "string".into(),
        FieldType::Number => "number".into(),
        FieldType::Boolean => "boolean".into(),
        FieldType::Option => match field.options.as_deref() {
            Some(options) if !options.is_empty() => options
                .iter()
                .map(|o| format!("'{}'", o.value))
                .collect::<Vec<_>>()
                .join(" | "),
            _ => "string".into(),
        },
        FieldType::Multilink => concat!(
            "{\n",
            "    url?: string\n",
            "    cached_url?: string\n",
            "    id?: string\n",
            "    email?: string\n",
            "    linktype?: string\n",
            "  }"
        )
        .into(),
        FieldType::Bloks => concat!(
            "Array<{\n",
            "    _uid: string\n",
            "    component: string\n",
            "    [key: string]: any\n",
            "  }>"
        )
        .into(),
        _ => "any".into(),
    }
}

/// `name: T` or `name?: T` for an interface body.
pub fn prop_decl(name: &str, field: &Field) -> String {
    let marker = if field.required { "" } else { "?" };
    format!("{name}{marker}: {}", ts_type(field))
}

/// Interface lines for every field, indented by two spaces.
pub(crate) fn prop_lines(schema: &Schema, with_descriptions: bool) -> Vec<String> {
    schema
        .fields
        .iter()
        .map(|(name, field)| {
            let decl = prop_decl(name, field);
            match (&field.description, with_descriptions) {
                (Some(desc), true) => format!("  {decl}  // {desc}"),
                _ => format!("  {decl}"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::model::FieldType;

    #[test]
    fn test_scalar_types() {
        assert_eq!(ts_type(&Field::new(FieldType::Textarea)), "string");
        assert_eq!(ts_type(&Field::new(FieldType::Asset)), "string");
        assert_eq!(ts_type(&Field::new(FieldType::Number)), "number");
        assert_eq!(ts_type(&Field::new(FieldType::Richtext)), "any");
    }

    #[test]
    fn test_option_union() {
        let field = Field::new(FieldType::Option).options(&[("h2", "H2"), ("h3", "H3")]);
        assert_eq!(ts_type(&field), "'h2' | 'h3'");
        assert_eq!(ts_type(&Field::new(FieldType::Option)), "string");
    }

    #[test]
    fn test_optional_marker() {
        let field = Field::new(FieldType::Boolean).required(false);
        assert_eq!(prop_decl("show_subtext", &field), "show_subtext?: boolean");
        assert_eq!(
            prop_decl("title", &Field::new(FieldType::Text)),
            "title: string"
        );
    }

    #[test]
    fn test_bloks_shape() {
        let ty = ts_type(&Field::new(FieldType::Bloks));
        assert!(ty.starts_with("Array<{"));
        assert!(ty.contains("_uid: string"));
        assert!(ty.contains("[key: string]: any"));
    }
}
