use serde_json::Value;
use tabled::{Table, Tabled};

use crate::schema::ResourceSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Tabled)]
struct AttributeRow {
    attribute: String,
    value: String,
}

#[derive(Tabled)]
struct SchemaRow {
    attribute: &'static str,
    #[tabled(rename = "type")]
    kind: &'static str,
    presence: &'static str,
    sensitive: bool,
    description: &'static str,
}

/// Renders a state object. Sensitive attributes are masked in table output.
pub fn render_state(
    state: &Value,
    schema: &ResourceSchema,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(state),
        OutputFormat::Table => {
            let rows: Vec<AttributeRow> = state
                .as_object()
                .into_iter()
                .flatten()
                .map(|(name, value)| {
                    let sensitive = schema.attribute(name).is_some_and(|a| a.sensitive);
                    AttributeRow {
                        attribute: name.clone(),
                        value: if sensitive && !value.is_null() {
                            "(sensitive)".to_string()
                        } else {
                            display_value(value)
                        },
                    }
                })
                .collect();
            Ok(Table::new(rows).to_string())
        }
    }
}

pub fn render_schema(schema: &ResourceSchema) -> String {
    let rows: Vec<SchemaRow> = schema
        .attributes
        .iter()
        .map(|a| SchemaRow {
            attribute: a.name,
            kind: a.kind.as_str(),
            presence: a.presence.as_str(),
            sensitive: a.sensitive,
            description: a.description,
        })
        .collect();

    format!(
        "{}\n{}\n\n{}",
        schema.type_name,
        schema.description,
        Table::new(rows)
    )
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
