use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fallback display name for items without `fieldData.name`
pub const UNTITLED: &str = "untitled";

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// A single CMS collection item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cms_locale_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_draft: bool,
    /// User-defined content; shape is whatever the collection schema says
    #[serde(default = "empty_object")]
    pub field_data: Value,
    /// Keys the API returns that this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn name(&self) -> &str {
        self.field_data
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(UNTITLED)
    }

    pub fn slug(&self) -> Option<&str> {
        self.field_data.get("slug").and_then(Value::as_str)
    }

    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id.clone(),
            name: self.name().to_string(),
            last_updated: self.last_updated.clone().unwrap_or_default(),
            created_on: self.created_on.clone().unwrap_or_default(),
            slug: self.slug().unwrap_or_default().to_string(),
        }
    }
}

/// Pagination block of a list response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: u32,
}

/// One page of collection items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemList {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Searchable projection of an item, used by `list --save`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: String,
    pub name: String,
    pub last_updated: String,
    pub created_on: String,
    pub slug: String,
}

/// Site collection metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub singular_name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionList {
    #[serde(default)]
    pub collections: Vec<Collection>,
}

/// PATCH body for an item update. The whole `fieldData` document is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub field_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cms_locale_id: Option<String>,
}

impl UpdateItemRequest {
    pub fn new(field_data: Value) -> Self {
        Self {
            field_data,
            is_archived: None,
            is_draft: None,
            cms_locale_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": "64f1a",
            "cmsLocaleId": "loc1",
            "lastPublished": null,
            "lastUpdated": "2024-03-01T10:00:00Z",
            "createdOn": "2024-01-01T10:00:00Z",
            "isArchived": false,
            "isDraft": true,
            "fieldData": { "name": "Getting Started", "slug": "getting-started" },
            "collectionId": "c1"
        })
    }

    #[test]
    fn test_item_deserialization() {
        let item: Item = serde_json::from_value(sample()).unwrap();
        assert_eq!(item.id, "64f1a");
        assert_eq!(item.name(), "Getting Started");
        assert_eq!(item.slug(), Some("getting-started"));
        assert!(item.is_draft);
        assert_eq!(item.extra.get("collectionId"), Some(&json!("c1")));
    }

    #[test]
    fn test_item_defaults() {
        let item: Item = serde_json::from_value(json!({ "id": "x" })).unwrap();
        assert_eq!(item.name(), UNTITLED);
        assert_eq!(item.field_data, json!({}));
        assert!(item.slug().is_none());
    }

    #[test]
    fn test_item_keeps_unknown_keys_when_saved() {
        let item: Item = serde_json::from_value(sample()).unwrap();
        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["collectionId"], "c1");
        assert_eq!(back["fieldData"]["slug"], "getting-started");
    }

    #[test]
    fn test_summary_projection() {
        let item: Item = serde_json::from_value(sample()).unwrap();
        let summary = serde_json::to_value(item.summary()).unwrap();
        assert_eq!(
            summary,
            json!({
                "id": "64f1a",
                "name": "Getting Started",
                "lastUpdated": "2024-03-01T10:00:00Z",
                "createdOn": "2024-01-01T10:00:00Z",
                "slug": "getting-started"
            })
        );
    }

    #[test]
    fn test_update_request_omits_unset_flags() {
        let mut request = UpdateItemRequest::new(json!({ "name": "A" }));
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({ "fieldData": { "name": "A" } }));

        request.is_draft = Some(false);
        request.cms_locale_id = Some("loc".to_string());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "fieldData": { "name": "A" }, "isDraft": false, "cmsLocaleId": "loc" })
        );
    }
}
