use crate::cli::args::OutputFormat;
use crate::domain::config::WfDocsConfig;
use crate::domain::item::{Collection, Item, ItemList};
use serde_json::Value;
use std::io;
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_items(&self, list: &ItemList) -> Result<(), OutputError>;
    fn write_item(&self, item: &Item) -> Result<(), OutputError>;
    fn write_value(&self, value: &Value) -> Result<(), OutputError>;
    fn write_collections(&self, collections: &[Collection]) -> Result<(), OutputError>;
    fn write_config(&self, config: &WfDocsConfig) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::WfDocsError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render_items(&self, list: &ItemList) -> Result<String, OutputError> {
        let items = &list.items;
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(list)?,
            OutputFormat::Csv => {
                let mut csv = String::from("id,name,last_updated,slug");
                for item in items {
                    csv.push('\n');
                    csv.push_str(&csv_row(&[
                        &item.id,
                        item.name(),
                        item.last_updated.as_deref().unwrap_or(""),
                        item.slug().unwrap_or(""),
                    ]));
                }
                csv
            }
            _ if items.is_empty() => "No items found.".to_string(),
            OutputFormat::Table => {
                let rows: Vec<ItemTableRow> = items.iter().map(ItemTableRow::from).collect();
                Table::new(rows).to_string()
            }
            OutputFormat::Text => {
                let mut text = String::from("Documentation Items:");
                for item in items {
                    text.push_str(&format!(
                        "\n  {}  {}  (updated {})",
                        item.id,
                        item.name(),
                        item.last_updated.as_deref().unwrap_or("unknown")
                    ));
                }
                let total = list.pagination.total as usize;
                if total > items.len() {
                    text.push_str(&format!(
                        "\nShowing {} of {} items (offset {})",
                        items.len(),
                        total,
                        list.pagination.offset
                    ));
                }
                text
            }
        };
        Ok(rendered)
    }

    pub fn render_item(&self, item: &Item) -> Result<String, OutputError> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(item)?,
            OutputFormat::Table => Table::new(vec![ItemDetailRow::from(item)]).to_string(),
            OutputFormat::Csv => format!(
                "id,name,last_updated,created_on,is_archived,is_draft\n{}",
                csv_row(&[
                    &item.id,
                    item.name(),
                    item.last_updated.as_deref().unwrap_or(""),
                    item.created_on.as_deref().unwrap_or(""),
                    &item.is_archived.to_string(),
                    &item.is_draft.to_string(),
                ])
            ),
            OutputFormat::Text => {
                let mut text = String::from("Item Details:\n");
                text.push_str(&format!("  ID: {}\n", item.id));
                text.push_str(&format!("  Name: {}\n", item.name()));
                text.push_str(&format!(
                    "  Last Updated: {}\n",
                    item.last_updated.as_deref().unwrap_or("unknown")
                ));
                text.push_str(&format!(
                    "  Created On: {}\n",
                    item.created_on.as_deref().unwrap_or("unknown")
                ));
                text.push_str(&format!("  Archived: {}\n", item.is_archived));
                text.push_str(&format!("  Draft: {}\n", item.is_draft));
                text.push_str("Field Data:\n");
                text.push_str(&serde_json::to_string_pretty(&item.field_data)?);
                text
            }
        };
        Ok(rendered)
    }

    pub fn render_value(&self, value: &Value) -> Result<String, OutputError> {
        let rendered = match (self.format, value) {
            (OutputFormat::Text, Value::String(s)) => s.clone(),
            (OutputFormat::Table, Value::Object(map)) => {
                let rows: Vec<FieldRow> = map
                    .iter()
                    .map(|(field, value)| FieldRow {
                        field: field.clone(),
                        value: compact(value),
                    })
                    .collect();
                Table::new(rows).to_string()
            }
            (OutputFormat::Csv, Value::Object(map)) => {
                let mut csv = String::from("field,value");
                for (field, value) in map {
                    csv.push('\n');
                    csv.push_str(&csv_row(&[field, &compact(value)]));
                }
                csv
            }
            _ => serde_json::to_string_pretty(value)?,
        };
        Ok(rendered)
    }

    pub fn render_collections(&self, collections: &[Collection]) -> Result<String, OutputError> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(collections)?,
            OutputFormat::Csv => {
                let mut csv = String::from("id,display_name,slug");
                for collection in collections {
                    csv.push('\n');
                    csv.push_str(&csv_row(&[
                        &collection.id,
                        &collection.display_name,
                        &collection.slug,
                    ]));
                }
                csv
            }
            _ if collections.is_empty() => "No collections found.".to_string(),
            OutputFormat::Table => {
                let rows: Vec<CollectionTableRow> =
                    collections.iter().map(CollectionTableRow::from).collect();
                Table::new(rows).to_string()
            }
            OutputFormat::Text => {
                let mut text = String::from("Collections:");
                for collection in collections {
                    text.push_str(&format!(
                        "\n  {}  {} (/{})",
                        collection.id, collection.display_name, collection.slug
                    ));
                }
                text
            }
        };
        Ok(rendered)
    }

    pub fn render_config(&self, config: &WfDocsConfig) -> Result<String, OutputError> {
        let mut shown = config.clone();
        if shown.api.token.is_some() {
            shown.api.token = Some(MASK.to_string());
        }

        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&shown)?,
            _ => {
                let mut text = String::from("wfdocs Configuration:\n");
                text.push_str(&format!("  Log level: {}\n", shown.log_level));
                text.push_str(&format!("  API base URL: {}\n", shown.api.base_url));
                text.push_str(&format!("  Timeout: {}s\n", shown.api.timeout_secs));
                text.push_str(&format!(
                    "  Token: {}\n",
                    shown.api.token.as_deref().unwrap_or("(from environment)")
                ));
                text.push_str(&format!(
                    "  Site ID: {}\n",
                    shown.api.site_id.as_deref().unwrap_or("(from environment)")
                ));
                text.push_str(&format!(
                    "  Collection ID: {}\n",
                    shown.api.collection_id.as_deref().unwrap_or("(from environment)")
                ));
                text.push_str(&format!("  Output directory: {}\n", shown.output.output_dir));
                text.push_str(&format!("  List filename: {}", shown.output.list_filename));
                text
            }
        };
        Ok(rendered)
    }
}

const MASK: &str = "********";

impl OutputWriter for ConsoleWriter {
    fn write_items(&self, list: &ItemList) -> Result<(), OutputError> {
        println!("{}", self.render_items(list)?);
        Ok(())
    }

    fn write_item(&self, item: &Item) -> Result<(), OutputError> {
        println!("{}", self.render_item(item)?);
        Ok(())
    }

    fn write_value(&self, value: &Value) -> Result<(), OutputError> {
        println!("{}", self.render_value(value)?);
        Ok(())
    }

    fn write_collections(&self, collections: &[Collection]) -> Result<(), OutputError> {
        println!("{}", self.render_collections(collections)?);
        Ok(())
    }

    fn write_config(&self, config: &WfDocsConfig) -> Result<(), OutputError> {
        println!("{}", self.render_config(config)?);
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        match self.format {
            // Keep stdout parseable: status lines go to stderr in JSON mode
            OutputFormat::Json => eprintln!("{}", message),
            _ => println!("{}", message),
        }
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "error": error,
                    "level": "error"
                });
                eprintln!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                eprintln!("Error: {}", error);
            }
        }
        Ok(())
    }
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_row(fields: &[&str]) -> String {
    fields.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(",")
}

/// Table row for item listings
#[derive(Tabled)]
struct ItemTableRow {
    id: String,
    name: String,
    last_updated: String,
}

impl From<&Item> for ItemTableRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name().to_string(),
            last_updated: item.last_updated.clone().unwrap_or_default(),
        }
    }
}

/// Table row for item details
#[derive(Tabled)]
struct ItemDetailRow {
    id: String,
    name: String,
    last_updated: String,
    created_on: String,
    archived: bool,
    draft: bool,
}

impl From<&Item> for ItemDetailRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name().to_string(),
            last_updated: item.last_updated.clone().unwrap_or_default(),
            created_on: item.created_on.clone().unwrap_or_default(),
            archived: item.is_archived,
            draft: item.is_draft,
        }
    }
}

/// Table row for collections
#[derive(Tabled)]
struct CollectionTableRow {
    id: String,
    name: String,
    slug: String,
}

impl From<&Collection> for CollectionTableRow {
    fn from(collection: &Collection) -> Self {
        Self {
            id: collection.id.clone(),
            name: collection.display_name.clone(),
            slug: collection.slug.clone(),
        }
    }
}

/// Table row for a field/value pair
#[derive(Tabled)]
struct FieldRow {
    field: String,
    value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list() -> ItemList {
        serde_json::from_value(json!({
            "items": [
                { "id": "a", "lastUpdated": "2024-01-01", "fieldData": { "name": "Alpha, intro", "slug": "alpha" } },
                { "id": "b", "fieldData": { "name": "Beta" } }
            ],
            "pagination": { "limit": 2, "offset": 0, "total": 5 }
        }))
        .unwrap()
    }

    #[test]
    fn test_items_text_mentions_remaining_pages() {
        let text = ConsoleWriter::new(OutputFormat::Text).render_items(&list()).unwrap();
        assert!(text.contains("Alpha, intro"));
        assert!(text.contains("Showing 2 of 5 items"));
    }

    #[test]
    fn test_items_csv_escapes_fields() {
        let csv = ConsoleWriter::new(OutputFormat::Csv).render_items(&list()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,name,last_updated,slug");
        assert_eq!(lines[1], "a,\"Alpha, intro\",2024-01-01,alpha");
        assert_eq!(lines[2], "b,Beta,,");
    }

    #[test]
    fn test_items_table_and_empty() {
        let table = ConsoleWriter::new(OutputFormat::Table).render_items(&list()).unwrap();
        assert!(table.contains("last_updated"));
        assert!(table.contains("Beta"));

        let empty = ConsoleWriter::new(OutputFormat::Table)
            .render_items(&ItemList::default())
            .unwrap();
        assert_eq!(empty, "No items found.");
    }

    #[test]
    fn test_item_json_is_parseable() {
        let item = list().items.remove(0);
        let json_out = ConsoleWriter::new(OutputFormat::Json).render_item(&item).unwrap();
        let back: Item = serde_json::from_str(&json_out).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_item_text_includes_field_data() {
        let item = list().items.remove(0);
        let text = ConsoleWriter::new(OutputFormat::Text).render_item(&item).unwrap();
        assert!(text.contains("ID: a"));
        assert!(text.contains("Field Data:"));
        assert!(text.contains("\"slug\": \"alpha\""));
    }

    #[test]
    fn test_value_rendering() {
        let text = ConsoleWriter::new(OutputFormat::Text);
        assert_eq!(text.render_value(&json!("plain")).unwrap(), "plain");
        assert_eq!(text.render_value(&json!(3)).unwrap(), "3");

        let json_writer = ConsoleWriter::new(OutputFormat::Json);
        assert_eq!(json_writer.render_value(&json!("plain")).unwrap(), "\"plain\"");

        let csv = ConsoleWriter::new(OutputFormat::Csv)
            .render_value(&json!({ "name": "A", "tags": [1, 2] }))
            .unwrap();
        assert_eq!(csv, "field,value\nname,A\ntags,\"[1,2]\"");
    }

    #[test]
    fn test_config_masks_token() {
        let mut config = WfDocsConfig::default();
        config.api.token = Some("secret".to_string());

        for format in [OutputFormat::Text, OutputFormat::Json] {
            let out = ConsoleWriter::new(format).render_config(&config).unwrap();
            assert!(!out.contains("secret"));
            assert!(out.contains(MASK));
        }
    }
}
