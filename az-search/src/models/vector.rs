use serde::{Deserialize, Serialize};

/// Vector search section of an index definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSearch {
    #[serde(default)]
    pub profiles: Vec<VectorSearchProfile>,
    #[serde(default)]
    pub algorithms: Vec<VectorSearchAlgorithm>,
}

impl VectorSearch {
    /// A single-profile HNSW setup, which is what most indexes want.
    pub fn hnsw(profile_name: impl Into<String>, algorithm_name: impl Into<String>) -> Self {
        let algorithm_name = algorithm_name.into();
        Self {
            profiles: vec![VectorSearchProfile {
                name: profile_name.into(),
                algorithm: algorithm_name.clone(),
            }],
            algorithms: vec![VectorSearchAlgorithm {
                name: algorithm_name,
                kind: "hnsw".to_string(),
                hnsw_parameters: Some(HnswParameters::default()),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSearchProfile {
    pub name: String,
    pub algorithm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSearchAlgorithm {
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hnsw_parameters: Option<HnswParameters>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HnswParameters {
    pub m: u32,
    pub ef_construction: u32,
    pub ef_search: u32,
    pub metric: String,
}

impl Default for HnswParameters {
    fn default() -> Self {
        Self {
            m: 4,
            ef_construction: 400,
            ef_search: 500,
            metric: "cosine".to_string(),
        }
    }
}
