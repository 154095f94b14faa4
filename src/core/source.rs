use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata of one imported file, including where each sample sits in its genotype columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSource {
    #[serde(rename = "fid")]
    pub file_id: String,

    #[serde(rename = "sid")]
    pub study_id: String,

    #[serde(rename = "fname", default)]
    pub file_name: String,

    #[serde(rename = "sname", default)]
    pub study_name: String,

    /// Sample name -> column position; names are stored with dots escaped
    #[serde(rename = "samp", default)]
    pub samples_position: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_names_default_to_empty() {
        let source: VariantSource = serde_json::from_str(
            r#"{"fid": "F1", "sid": "S1", "samp": {"NA002": 1, "HG003": 2, "NA001": 0}}"#,
        )
        .unwrap();
        assert_eq!(source.samples_position["HG003"], 2);
        assert_eq!(source.samples_position.len(), 3);
        assert!(source.file_name.is_empty());
    }
}
