use serde::{Deserialize, Serialize};

use super::{SemanticSearch, VectorSearch};

/// Index definition as the service stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndex {
    pub name: String,
    pub fields: Vec<SearchField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticSearch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_search: Option<VectorSearch>,
}

impl SearchIndex {
    pub fn new(name: impl Into<String>, fields: Vec<SearchField>) -> Self {
        Self {
            name: name.into(),
            fields,
            semantic: None,
            vector_search: None,
        }
    }

    pub fn with_semantic(mut self, semantic: Option<SemanticSearch>) -> Self {
        self.semantic = semantic;
        self
    }

    pub fn with_vector_search(mut self, vector_search: Option<VectorSearch>) -> Self {
        self.vector_search = vector_search;
        self
    }
}

/// EDM type of an index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "Edm.String")]
    String,
    #[serde(rename = "Collection(Edm.String)")]
    StringCollection,
    #[serde(rename = "Edm.Int32")]
    Int32,
    #[serde(rename = "Edm.Int64")]
    Int64,
    #[serde(rename = "Edm.Double")]
    Double,
    #[serde(rename = "Edm.Boolean")]
    Boolean,
    #[serde(rename = "Edm.DateTimeOffset")]
    DateTimeOffset,
    /// Vector field content (`Collection(Edm.Single)`).
    #[serde(rename = "Collection(Edm.Single)")]
    SingleCollection,
}

/// One field of an index schema.
///
/// Attributes default to off; enable the ones a field needs through the
/// chainable setters:
///
/// ```
/// use az_search::{FieldType, SearchField};
///
/// let field = SearchField::new("title", FieldType::String)
///     .searchable()
///     .sortable();
/// assert!(field.searchable && field.sortable && !field.key);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub key: bool,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub facetable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_search_dimensions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_search_profile: Option<String>,
}

impl SearchField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            key: false,
            searchable: false,
            filterable: false,
            sortable: false,
            facetable: false,
            analyzer: None,
            vector_search_dimensions: None,
            vector_search_profile: None,
        }
    }

    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn facetable(mut self) -> Self {
        self.facetable = true;
        self
    }

    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Marks the field as vector content with the given dimensions and profile.
    pub fn vector(mut self, dimensions: u32, profile: impl Into<String>) -> Self {
        self.vector_search_dimensions = Some(dimensions);
        self.vector_search_profile = Some(profile.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_serializes_to_edm_names() {
        let json = serde_json::to_string(&FieldType::String).unwrap();
        assert_eq!(json, r#""Edm.String""#);

        let json = serde_json::to_string(&FieldType::StringCollection).unwrap();
        assert_eq!(json, r#""Collection(Edm.String)""#);

        let json = serde_json::to_string(&FieldType::SingleCollection).unwrap();
        assert_eq!(json, r#""Collection(Edm.Single)""#);
    }

    #[test]
    fn field_serializes_with_wire_names() {
        let field = SearchField::new("objectId", FieldType::String).key().filterable();
        let json = serde_json::to_value(&field).unwrap();

        assert_eq!(json["name"], "objectId");
        assert_eq!(json["type"], "Edm.String");
        assert_eq!(json["key"], true);
        assert_eq!(json["filterable"], true);
        assert_eq!(json["searchable"], false);
        assert!(json.get("analyzer").is_none());
    }

    #[test]
    fn index_skips_absent_augmentations() {
        let index = SearchIndex::new("pages", vec![SearchField::new("id", FieldType::String).key()]);
        let json = serde_json::to_value(&index).unwrap();

        assert!(json.get("semantic").is_none());
        assert!(json.get("vectorSearch").is_none());
    }
}
