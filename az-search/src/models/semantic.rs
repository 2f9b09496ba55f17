use serde::{Deserialize, Serialize};

/// Semantic ranking section of an index definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_configuration: Option<String>,
    pub configurations: Vec<SemanticConfiguration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticConfiguration {
    pub name: String,
    pub prioritized_fields: SemanticPrioritizedFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticPrioritizedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_field: Option<SemanticField>,
    #[serde(default)]
    pub prioritized_content_fields: Vec<SemanticField>,
    #[serde(default)]
    pub prioritized_keywords_fields: Vec<SemanticField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticField {
    pub field_name: String,
}

impl SemanticField {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_section_matches_wire_format() {
        let semantic = SemanticSearch {
            default_configuration: Some("sem".to_string()),
            configurations: vec![SemanticConfiguration {
                name: "sem".to_string(),
                prioritized_fields: SemanticPrioritizedFields {
                    title_field: Some(SemanticField::new("title")),
                    prioritized_content_fields: vec![SemanticField::new("content")],
                    prioritized_keywords_fields: vec![],
                },
            }],
        };

        let json = serde_json::to_value(&semantic).unwrap();
        assert_eq!(json["defaultConfiguration"], "sem");
        assert_eq!(
            json["configurations"][0]["prioritizedFields"]["titleField"]["fieldName"],
            "title"
        );
    }
}
