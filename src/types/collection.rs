use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status of one trained collection, as reported by the `collections` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_samples: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Anything else the service reports (accuracy, error metrics, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CollectionInfo {
    pub fn is_ready(&self) -> bool {
        self.status.as_deref() == Some("ready")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_are_kept() {
        let info: CollectionInfo = serde_json::from_value(serde_json::json!({
            "input_type": "text",
            "model_type": "regression",
            "number_of_samples": 231,
            "status": "training",
            "mean_error": 21.2
        }))
        .unwrap();
        assert!(!info.is_ready());
        assert_eq!(info.number_of_samples, Some(231));
        assert_eq!(info.extra["mean_error"], 21.2);
    }
}
