//! Source text for scaffolded components.
//!
//! All output is built with plain string assembly. Each function is a pure
//! function of the schema (plus the design-reference flag), so regenerating
//! from the same schema yields byte-identical text.

use std::fmt::Write as _;

use crate::{
    scaffold::props::prop_lines,
    schema::model::Schema,
    utils::{to_camel_case, to_pascal_case},
};

/// Builds the shared `<SectionHeader .../>` element, if the schema has a headline.
fn section_header(schema: &Schema) -> String {
    if !schema.has_field("headline") {
        return String::new();
    }
    let heading_level = if schema.has_field("heading_level") {
        "headingLevel={heading_level || 'h2'}"
    } else {
        "headingLevel=\"h2\""
    };
    let show_subtext = if schema.has_field("show_subtext") {
        "showSubtext={show_subtext !== false}"
    } else {
        "showSubtext={true}"
    };
    let alignment = if schema.has_field("alignment") {
        "alignment={alignment || 'Center'}"
    } else {
        "alignment=\"Center\""
    };
    let dark_mode = if schema.has_field("background") {
        "darkMode={background === 'Dark'}"
    } else {
        "darkMode={false}"
    };

    let mut out = String::from("        <SectionHeader\n          headline={headline}\n");
    let _ = writeln!(out, "          {heading_level}");
    if schema.has_field("subtext") {
        out.push_str("          subtext={subtext}\n");
    }
    let _ = writeln!(out, "          {show_subtext}");
    let _ = writeln!(out, "          {alignment}");
    let _ = writeln!(out, "          {dark_mode}");
    out.push_str("        />\n");
    out
}

fn destructured_params(schema: &Schema) -> String {
    let mut out = String::new();
    for name in schema.fields.keys() {
        let _ = writeln!(out, "  {name},");
    }
    out.push_str("  className = '',\n");
    out
}

/// Presentational React component at `src/components/presentational/<Pascal>.tsx`.
pub fn presentational(schema: &Schema, design_reference: bool) -> String {
    let pascal = to_pascal_case(&schema.name);
    let props_name = format!("{pascal}Props");
    let has_benefits = design_reference && schema.has_field("benefits");

    let mut imports = vec![format!("import styles from './{pascal}.module.css'")];
    if schema.has_field("headline") {
        imports.push("import { SectionHeader } from './SectionHeader'".to_string());
    }
    if has_benefits {
        imports.push("import { BenefitItem } from './BenefitItem'".to_string());
    }

    let mut props = prop_lines(schema, !design_reference);
    props.push("  className?: string".to_string());

    let doc = if design_reference {
        String::new()
    } else {
        let mut doc = format!("/**\n * {} Component\n", schema.display_name);
        for (name, field) in &schema.fields {
            if let Some(desc) = &field.description {
                let _ = writeln!(doc, " * @param {name} - {desc}");
            }
        }
        doc.push_str(" */\n");
        doc
    };

    let body = if design_reference {
        design_body(schema, has_benefits)
    } else {
        placeholder_body(schema)
    };

    format!(
        "{imports}\n\nexport interface {props_name} {{\n{props}\n}}\n\n{doc}export function {pascal}({{\n{params}}}: {props_name}) {{\n  return (\n{body}  )\n}}\n",
        imports = imports.join("\n"),
        props = props.join("\n"),
        params = destructured_params(schema),
    )
}

fn placeholder_body(schema: &Schema) -> String {
    let mut out = String::from("    <div className={`${styles.section} ${className}`}>\n");
    out.push_str("      <div className={styles.container}>\n");
    out.push_str(&section_header(schema));
    out.push_str("        {/* Component content */}\n");
    out.push_str("      </div>\n");
    out.push_str("    </div>\n");
    out
}

fn design_body(schema: &Schema, has_benefits: bool) -> String {
    let background = if schema.has_field("background") {
        "${background === 'White' ? styles.sectionWhite : background === 'Grey' ? styles.sectionGrey : background === 'Dark' ? styles.sectionDark : styles.sectionWhite}"
    } else {
        "${styles.sectionWhite}"
    };

    let mut padding = Vec::new();
    if schema.has_field("padding_top") {
        padding.push("        paddingTop: `${padding_top || 96}px`,");
    }
    if schema.has_field("padding_bottom") {
        padding.push("        paddingBottom: `${padding_bottom || 96}px`,");
    }

    let mut out = format!("    <div className={{`${{styles.section}} {background} ${{className}}`}}");
    if padding.is_empty() {
        out.push_str(">\n");
    } else {
        out.push_str("\n      style={{\n");
        for line in padding {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("      }}\n    >\n");
    }
    out.push_str("      <div className={styles.container}>\n");
    out.push_str(&section_header(schema));
    if has_benefits {
        out.push_str("        <div className={styles.benefitsGrid}>\n");
        out.push_str("          {benefits?.map((benefit) => (\n");
        out.push_str("            <BenefitItem key={benefit._uid} {...benefit} />\n");
        out.push_str("          ))}\n");
        out.push_str("        </div>\n");
    }
    out.push_str("      </div>\n");
    out.push_str("    </div>\n");
    out
}

fn css_rule(out: &mut String, selector: &str, decls: &[&str]) {
    let _ = writeln!(out, ".{selector} {{");
    for decl in decls {
        let _ = writeln!(out, "  {decl};");
    }
    out.push_str("}\n\n");
}

/// CSS module next to the presentational component.
pub fn stylesheet(schema: &Schema, design_reference: bool) -> String {
    if !design_reference {
        return format!(
            ".{} {{\n  /* Add your styles here */\n}}\n",
            to_camel_case(&schema.name)
        );
    }

    let mut css = format!("/* {} */\n\n", schema.display_name);
    css_rule(
        &mut css,
        "section",
        &[
            "display: flex",
            "flex-direction: column",
            "align-items: center",
            "padding-left: 0",
            "padding-right: 0",
            "width: 100%",
        ],
    );
    css_rule(&mut css, "sectionWhite", &["background-color: #FFFFFF"]);
    css_rule(&mut css, "sectionGrey", &["background-color: #F7F7F7"]);
    css_rule(&mut css, "sectionDark", &["background-color: #042A47"]);
    css_rule(
        &mut css,
        "container",
        &[
            "display: flex",
            "flex-direction: column",
            "gap: 48px",
            "align-items: center",
            "width: 100%",
            "max-width: 1216px",
        ],
    );
    if schema.has_field("benefits") {
        css_rule(
            &mut css,
            "benefitsGrid",
            &[
                "display: flex",
                "flex-wrap: wrap",
                "gap: 32px",
                "align-items: flex-start",
                "width: 100%",
            ],
        );
    }
    css
}

/// CMS binding wrapper at `src/storyblok/components/<name>.tsx`.
pub fn wrapper(schema: &Schema) -> String {
    let pascal = to_pascal_case(&schema.name);
    let blok = format!("{pascal}Blok");

    let mut fields = vec![
        "  _uid: string".to_string(),
        format!("  component: '{}'", schema.name),
    ];
    fields.extend(prop_lines(schema, false));

    let mut forwarded = String::new();
    for name in schema.fields.keys() {
        let _ = writeln!(forwarded, "      {name}={{blok.{name}}}");
    }

    format!(
        "'use client'\n\nimport {{ {pascal} }} from '@/src/components/presentational/{pascal}'\n\ninterface {blok} {{\n{fields}\n}}\n\nexport default function {blok}({{ blok }}: {{ blok: {blok} }}) {{\n  return (\n    <{pascal}\n{forwarded}    />\n  )\n}}\n",
        fields = fields.join("\n"),
    )
}
