//! Hand-authored schema catalog.
//!
//! Each known component has a fixed factory. Positions follow insertion order
//! and restart at zero for every factory call.

use indexmap::IndexMap;
use serde_json::json;

use crate::{
    schema::model::{Category, Field, FieldType, Schema},
    utils::{to_display_name, to_snake_case},
};

const HEADING_LEVELS: &[(&str, &str)] = &[
    ("h1", "H1"),
    ("h2", "H2"),
    ("h3", "H3"),
    ("h4", "H4"),
    ("h5", "H5"),
    ("h6", "H6"),
];

const ALIGNMENTS: &[(&str, &str)] = &[("Left", "Left"), ("Center", "Center")];

const BACKGROUNDS: &[(&str, &str)] = &[("White", "White"), ("Grey", "Grey"), ("Dark", "Dark")];

const BUTTON_VARIANTS: &[(&str, &str)] = &[("On Dark", "On Dark"), ("On Light", "On Light")];

/// Ordered field list with an auto-incrementing position counter.
struct FieldList {
    next_pos: u32,
    fields: IndexMap<String, Field>,
}

impl FieldList {
    fn new() -> Self {
        Self {
            next_pos: 0,
            fields: IndexMap::new(),
        }
    }

    fn push(&mut self, name: &str, mut field: Field) -> &mut Self {
        field.pos = Some(self.next_pos);
        self.next_pos += 1;
        self.fields.insert(name.to_string(), field);
        self
    }

    fn finish(self, name: &str, display_name: &str) -> Schema {
        Schema {
            name: name.to_string(),
            display_name: display_name.to_string(),
            is_nestable: true,
            is_root: false,
            fields: self.fields,
        }
    }

    fn headline(&mut self, description: &str) -> &mut Self {
        self.push(
            "headline",
            Field::new(FieldType::Text).description(description),
        )
    }

    fn heading_level(&mut self) -> &mut Self {
        self.push(
            "heading_level",
            Field::new(FieldType::Option)
                .required(false)
                .default_value("h2")
                .options(HEADING_LEVELS)
                .description("Heading tag level"),
        )
    }

    fn subtext(&mut self, description: &str) -> &mut Self {
        self.push(
            "subtext",
            Field::new(FieldType::Textarea)
                .required(false)
                .description(description),
        )
    }

    fn toggle(&mut self, name: &str, description: &str) -> &mut Self {
        self.push(
            name,
            Field::new(FieldType::Boolean)
                .required(false)
                .default_value(true)
                .description(description),
        )
    }

    fn alignment(&mut self, default: &str) -> &mut Self {
        self.push(
            "alignment",
            Field::new(FieldType::Option)
                .required(false)
                .default_value(default)
                .options(ALIGNMENTS)
                .description("Text alignment for header"),
        )
    }

    fn background(&mut self, name: &str, options: &[(&str, &str)]) -> &mut Self {
        self.push(
            name,
            Field::new(FieldType::Option)
                .required(false)
                .default_value("White")
                .options(options)
                .description("Section background color"),
        )
    }

    fn padding(&mut self) -> &mut Self {
        for (name, label) in [("padding_top", "top"), ("padding_bottom", "bottom")] {
            self.push(
                name,
                Field::new(FieldType::Number)
                    .required(false)
                    .default_value(96)
                    .description(format!("Padding {label} in pixels")),
            );
        }
        self
    }

    fn image(&mut self, name: &str, description: &str) -> &mut Self {
        self.push(
            name,
            Field::new(FieldType::Asset)
                .required(false)
                .description(description)
                .extra("filetypes", json!(["images"])),
        )
    }

    fn optional_link(&mut self, description: &str) -> &mut Self {
        self.push(
            "link",
            Field::new(FieldType::Multilink)
                .required(false)
                .description(description),
        )
        .push(
            "link_label",
            Field::new(FieldType::Text)
                .required(false)
                .description("Link label text (shown if link is provided)"),
        )
    }

    fn blocks(&mut self, name: &str, required: bool, description: &str, nested: &str) -> &mut Self {
        self.push(
            name,
            Field::new(FieldType::Bloks)
                .required(required)
                .description(description)
                .whitelist(&[nested]),
        )
    }
}

/// Factory set for every known component.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaBuilder;

impl SchemaBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Generic benefits-style section for an arbitrary block name.
    pub fn section(&self, block_name: &str, display_name: Option<&str>) -> Schema {
        let mut f = FieldList::new();
        f.headline("Main section headline")
            .heading_level()
            .subtext("Section description/subtext")
            .alignment("Left")
            .background("background", BACKGROUNDS)
            .padding()
            .blocks("benefits", false, "List of benefit items", "benefit_item");

        let name = to_snake_case(block_name);
        let display = display_name
            .map(str::to_string)
            .unwrap_or_else(|| to_display_name(block_name));
        f.finish(&name, &display)
    }

    pub fn benefit_item(&self) -> Schema {
        let mut f = FieldList::new();
        f.image("icon", "Icon image for the benefit")
            .headline("Benefit headline")
            .push(
                "description",
                Field::new(FieldType::Textarea)
                    .required(false)
                    .description("Benefit description"),
            )
            .optional_link("Optional link for the benefit")
            .push(
                "light_dark",
                Field::new(FieldType::Option)
                    .required(false)
                    .default_value("false")
                    .options(&[("false", "Light"), ("true", "Dark")])
                    .description("Use dark/light variant (for dark backgrounds)"),
            );
        f.finish("benefit_item", "Benefit Item")
    }

    pub fn business_types_section(&self) -> Schema {
        let mut f = FieldList::new();
        f.headline("Main section headline")
            .heading_level()
            .subtext("Section description/subtext")
            .toggle("show_subtext", "Show/hide subtext")
            .alignment("Center")
            .background("background", &BACKGROUNDS[..2])
            .padding()
            .blocks(
                "business_cards",
                false,
                "List of business type cards",
                "business_type_card",
            );
        f.finish("business_types_section", "Business Types Section")
    }

    pub fn business_type_card(&self) -> Schema {
        let mut f = FieldList::new();
        f.headline("Business type headline (e.g., \"HR people\")")
            .push(
                "description",
                Field::new(FieldType::Textarea)
                    .required(false)
                    .description("Business type description"),
            )
            .push(
                "tags",
                Field::new(FieldType::Textarea)
                    .required(false)
                    .description("Tags/chips (one per line or comma-separated)"),
            )
            .image("image", "Business type image");
        f.finish("business_type_card", "Business Type Card")
    }

    pub fn primary_button(&self) -> Schema {
        self.button("primary_button", "Primary Button")
    }

    pub fn secondary_button(&self) -> Schema {
        self.button("secondary_button", "Secondary Button")
    }

    fn button(&self, name: &str, display_name: &str) -> Schema {
        let mut f = FieldList::new();
        f.push(
            "label",
            Field::new(FieldType::Text)
                .default_value("Button")
                .description("Button label"),
        )
        .push(
            "link",
            Field::new(FieldType::Multilink)
                .description("Button link (URL or page)")
                .extra("allow_target_blank", true)
                .extra("link_type", json!(["url", "story", "email"])),
        )
        .push(
            "variant",
            Field::new(FieldType::Option)
                .required(false)
                .default_value("On Dark")
                .options(BUTTON_VARIANTS)
                .description("Button variant for different backgrounds"),
        );
        f.finish(name, display_name)
    }

    pub fn stats_section(&self) -> Schema {
        let mut f = FieldList::new();
        f.headline("Main section headline")
            .heading_level()
            .subtext("Section description/subtext")
            .toggle("show_subtext", "Show/hide subtext")
            .alignment("Center")
            .background("background_color", BACKGROUNDS)
            .blocks("stats", true, "List of stat items", "stat_item");
        f.finish("stats_section", "Stats Section")
    }

    pub fn stat_item(&self) -> Schema {
        let mut f = FieldList::new();
        f.push(
            "number",
            Field::new(FieldType::Text)
                .default_value("NN")
                .description("Stat number or value"),
        )
        .push(
            "description",
            Field::new(FieldType::Text)
                .default_value("Description")
                .description("Stat description text"),
        );
        f.finish("stat_item", "Stat Item")
    }

    pub fn security_card(&self) -> Schema {
        let mut f = FieldList::new();
        f.image("image", "Security certification image")
            .headline("Card headline")
            .subtext("Card description/subtext")
            .toggle("show_subtext", "Show/hide subtext")
            .optional_link("Optional link for the card")
            .toggle("show_link", "Show/hide link")
            .push(
                "card_type",
                Field::new(FieldType::Option)
                    .required(false)
                    .default_value("Shadow")
                    .options(&[("Shadow", "Shadow"), ("Border", "Border"), ("Dark", "Dark")])
                    .description("Card visual style type"),
            );
        f.finish("security_card", "Security Card")
    }

    pub fn data_security_section(&self) -> Schema {
        let mut f = FieldList::new();
        f.headline("Main section headline")
            .heading_level()
            .subtext("Section description/subtext")
            .toggle("show_subtext", "Show/hide subtext")
            .alignment("Center")
            .background("background", BACKGROUNDS)
            .padding()
            .blocks(
                "security_cards",
                true,
                "List of security certification cards",
                "security_card",
            );
        f.finish("data_security_section", "Data Security Section")
    }
}

/// Known component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    BenefitItem,
    BusinessTypesSection,
    BusinessTypeCard,
    PrimaryButton,
    SecondaryButton,
    StatsSection,
    StatItem,
    SecurityCard,
    DataSecuritySection,
    /// Anything else: the generic section template.
    Section,
}

impl Kind {
    fn from_alias(name: &str) -> Kind {
        match name {
            "benefit_item" | "benefit-item" => Kind::BenefitItem,
            "business_types_section" | "business-types-section" => Kind::BusinessTypesSection,
            "business_type_card" | "business-type-card" => Kind::BusinessTypeCard,
            "primary_button" | "primary-button" => Kind::PrimaryButton,
            "secondary_button" | "secondary-button" => Kind::SecondaryButton,
            "stats_section" | "stats-section" | "content_block_stats" => Kind::StatsSection,
            "stat_item" | "stat-item" => Kind::StatItem,
            "security_card" | "security-card" => Kind::SecurityCard,
            "data_security_section" | "data-security-section" => Kind::DataSecuritySection,
            _ => Kind::Section,
        }
    }

    pub fn category(self) -> Category {
        match self {
            Kind::BenefitItem
            | Kind::BusinessTypeCard
            | Kind::PrimaryButton
            | Kind::SecondaryButton
            | Kind::StatItem
            | Kind::SecurityCard => Category::Nested,
            _ => Category::Bloks,
        }
    }

    /// Nested kinds that must be written before this one validates.
    pub fn dependencies(self) -> &'static [Kind] {
        match self {
            Kind::BusinessTypesSection => &[Kind::BusinessTypeCard],
            Kind::StatsSection => &[Kind::StatItem],
            Kind::DataSecuritySection => &[Kind::SecurityCard],
            Kind::Section => &[Kind::BenefitItem],
            _ => &[],
        }
    }
}

/// A resolved request for one catalog component.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub kind: Kind,
    block_name: String,
    display_name: Option<String>,
}

impl CatalogEntry {
    /// Resolves a user-supplied block name, accepting kebab-case aliases.
    pub fn resolve(block_name: &str, display_name: Option<&str>) -> Self {
        Self {
            kind: Kind::from_alias(block_name),
            block_name: block_name.to_string(),
            display_name: display_name.map(str::to_string),
        }
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Builds this entry's schema.
    pub fn build(&self, builder: &SchemaBuilder) -> Schema {
        match self.kind {
            Kind::Section => builder.section(&self.block_name, self.display_name.as_deref()),
            kind => build_kind(builder, kind),
        }
    }

    /// Dependency schemas with their categories, in write order.
    pub fn dependencies(&self, builder: &SchemaBuilder) -> Vec<(Schema, Category)> {
        self.kind
            .dependencies()
            .iter()
            .map(|k| (build_kind(builder, *k), k.category()))
            .collect()
    }
}

fn build_kind(builder: &SchemaBuilder, kind: Kind) -> Schema {
    match kind {
        Kind::BenefitItem => builder.benefit_item(),
        Kind::BusinessTypesSection => builder.business_types_section(),
        Kind::BusinessTypeCard => builder.business_type_card(),
        Kind::PrimaryButton => builder.primary_button(),
        Kind::SecondaryButton => builder.secondary_button(),
        Kind::StatsSection => builder.stats_section(),
        Kind::StatItem => builder.stat_item(),
        Kind::SecurityCard => builder.security_card(),
        Kind::DataSecuritySection => builder.data_security_section(),
        Kind::Section => builder.section("section", None),
    }
}

/// Every fixed catalog schema with its category.
pub fn all(builder: &SchemaBuilder) -> Vec<(Schema, Category)> {
    [
        Kind::BenefitItem,
        Kind::BusinessTypeCard,
        Kind::PrimaryButton,
        Kind::SecondaryButton,
        Kind::StatItem,
        Kind::SecurityCard,
        Kind::BusinessTypesSection,
        Kind::StatsSection,
        Kind::DataSecuritySection,
    ]
    .into_iter()
    .map(|k| (build_kind(builder, k), k.category()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_are_contiguous() {
        let builder = SchemaBuilder::new();
        let mut schemas: Vec<Schema> = all(&builder).into_iter().map(|(s, _)| s).collect();
        schemas.push(builder.section("hero_banner", None));
        for schema in schemas {
            let expected: Vec<u32> = (0..schema.fields.len() as u32).collect();
            assert_eq!(schema.sorted_positions(), expected, "{}", schema.name);
        }
    }

    #[test]
    fn test_restricted_bloks_have_whitelist() {
        for (schema, _) in all(&SchemaBuilder::new()) {
            for (name, field) in &schema.fields {
                if field.restrict_components == Some(true) {
                    assert!(
                        field
                            .component_whitelist
                            .as_ref()
                            .is_some_and(|l| !l.is_empty()),
                        "{}.{name}",
                        schema.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_generic_section_naming() {
        let builder = SchemaBuilder::new();
        let schema = builder.section("HeroBanner", None);
        assert_eq!(schema.name, "hero_banner");
        assert_eq!(schema.display_name, "Hero Banner");
        assert_eq!(schema.nested_components(), ["benefit_item"]);

        let named = builder.section("cta", Some("Call To Action"));
        assert_eq!(named.display_name, "Call To Action");
    }

    #[test]
    fn test_resolve_aliases_and_dependencies() {
        let builder = SchemaBuilder::new();

        let entry = CatalogEntry::resolve("content_block_stats", None);
        assert_eq!(entry.kind, Kind::StatsSection);
        assert_eq!(entry.category(), Category::Bloks);
        let deps = entry.dependencies(&builder);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].0.name, "stat_item");
        assert_eq!(deps[0].1, Category::Nested);

        let entry = CatalogEntry::resolve("primary-button", None);
        assert_eq!(entry.build(&builder).name, "primary_button");
        assert!(entry.dependencies(&builder).is_empty());

        let entry = CatalogEntry::resolve("hero", Some("Hero"));
        assert_eq!(entry.kind, Kind::Section);
        assert_eq!(entry.build(&builder).name, "hero");
    }

    #[test]
    fn test_button_carries_link_extras() {
        let schema = SchemaBuilder::new().primary_button();
        let link = &schema.fields["link"];
        assert!(link.required);
        assert_eq!(link.extra["allow_target_blank"], json!(true));
        assert_eq!(schema.fields["label"].default_value, Some(json!("Button")));
    }
}
