//! Writes items, extracted values and item listings to disk as pretty JSON.

use crate::domain::error::WfDocsResult;
use crate::domain::item::{Item, ItemSummary, UNTITLED};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

fn sanitize(raw: &str, fallback: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                Some(c.to_ascii_lowercase())
            } else {
                None
            }
        })
        .collect();

    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Filename for an item: `<sanitized name>_<sanitized id>.json`
pub fn item_filename(name: &str, id: &str) -> String {
    format!("{}_{}.json", sanitize(name, UNTITLED), sanitize(id, "unknown"))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> WfDocsResult<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

/// Save `content` for `item` under `dir`, creating the directory if needed
pub fn save_content<T: Serialize + ?Sized>(
    item: &Item,
    content: &T,
    dir: &Path,
) -> WfDocsResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(item_filename(item.name(), &item.id));
    write_json(&path, content)?;
    tracing::info!(path = %path.display(), "saved item content");
    Ok(path)
}

/// Save the searchable projection of `items` to `dir/filename`
pub fn save_items_list(items: &[Item], dir: &Path, filename: &str) -> WfDocsResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let summaries: Vec<ItemSummary> = items.iter().map(Item::summary).collect();
    let path = dir.join(filename);
    write_json(&path, &summaries)?;
    tracing::info!(path = %path.display(), count = summaries.len(), "saved item list");
    Ok(path)
}
