use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ticket::Ticket;

/// Body of `GET /analyze/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisResponse {
    pub ticket: Ticket,
    #[serde(default)]
    pub ai_analysis: Option<AiAnalysis>,
    #[serde(default)]
    pub asset_details: Option<AssetDetails>,
    pub related_alerts: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub probable_root_cause: Option<String>,
    /// Kept loose: the model output is not guaranteed to be a list.
    #[serde(default)]
    pub recommended_steps: Option<Value>,
}

impl AiAnalysis {
    /// Steps in order, or nothing when the field is missing or not a list.
    pub fn steps(&self) -> Vec<String> {
        match &self.recommended_steps {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssetDetails {
    #[serde(default)]
    pub hostname: Option<Value>,
    #[serde(default)]
    pub os: Option<Value>,
    #[serde(default)]
    pub cpu: Option<Value>,
    #[serde(default)]
    pub memory_gb: Option<Value>,
}

/// Asset attributes ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFields {
    pub hostname: String,
    pub os: String,
    pub cpu: String,
    pub memory: String,
}

impl Default for AssetFields {
    fn default() -> Self {
        Self {
            hostname: NOT_AVAILABLE.to_string(),
            os: NOT_AVAILABLE.to_string(),
            cpu: NOT_AVAILABLE.to_string(),
            memory: NOT_AVAILABLE.to_string(),
        }
    }
}

pub const NOT_AVAILABLE: &str = "N/A";

impl AssetDetails {
    pub fn fields(&self) -> AssetFields {
        AssetFields {
            hostname: display_or_na(self.hostname.as_ref()),
            os: display_or_na(self.os.as_ref()),
            cpu: display_or_na(self.cpu.as_ref()),
            memory: display_or_na(self.memory_gb.as_ref()),
        }
    }
}

/// Falsy values (null, "", 0, false) show as `N/A`.
fn display_or_na(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) if s.is_empty() => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => NOT_AVAILABLE.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_response() {
        let data: AnalysisResponse = serde_json::from_value(json!({
            "ticket": {"id": "T123", "subject": "Disk full", "status": "Open", "asset_id": "A9"},
            "ai_analysis": {
                "summary": "Disk nearly full",
                "probable_root_cause": "Log growth",
                "recommended_steps": ["Clear logs", "Add disk"]
            },
            "asset_details": {"hostname": "srv1", "os": "Linux"},
            "related_alerts": [1, 2]
        }))
        .unwrap();

        assert_eq!(data.ticket.id, "T123");
        assert_eq!(data.related_alerts.len(), 2);
        let analysis = data.ai_analysis.unwrap();
        assert_eq!(analysis.steps(), vec!["Clear logs", "Add disk"]);
        let fields = data.asset_details.unwrap().fields();
        assert_eq!(fields.hostname, "srv1");
        assert_eq!(fields.cpu, "N/A");
    }

    #[test]
    fn test_null_sections_are_absent() {
        let data: AnalysisResponse = serde_json::from_value(json!({
            "ticket": {"id": "T1", "subject": "s", "status": "Open", "asset_id": "A1"},
            "ai_analysis": null,
            "asset_details": null,
            "related_alerts": []
        }))
        .unwrap();
        assert!(data.ai_analysis.is_none());
        assert!(data.asset_details.is_none());
    }

    #[test]
    fn test_missing_related_alerts_is_rejected() {
        let result: Result<AnalysisResponse, _> = serde_json::from_value(json!({
            "ticket": {"id": "T1", "subject": "s", "status": "Open"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_steps_are_empty() {
        let analysis = AiAnalysis {
            summary: None,
            probable_root_cause: None,
            recommended_steps: Some(json!("Reboot the server")),
        };
        assert!(analysis.steps().is_empty());

        let analysis = AiAnalysis {
            recommended_steps: None,
            ..analysis
        };
        assert!(analysis.steps().is_empty());
    }

    #[test]
    fn test_non_string_steps_render_as_json() {
        let analysis = AiAnalysis {
            summary: None,
            probable_root_cause: None,
            recommended_steps: Some(json!(["Check logs", 42])),
        };
        assert_eq!(analysis.steps(), vec!["Check logs", "42"]);
    }

    #[test]
    fn test_null_step_renders_empty() {
        let analysis = AiAnalysis {
            summary: None,
            probable_root_cause: None,
            recommended_steps: Some(json!(["Restart service", null, "Check logs"])),
        };
        assert_eq!(analysis.steps(), vec!["Restart service", "", "Check logs"]);
    }

    #[test]
    fn test_asset_fields_falsy_values() {
        let details: AssetDetails = serde_json::from_value(json!({
            "hostname": "",
            "os": null,
            "cpu": "Xeon E5",
            "memory_gb": 0
        }))
        .unwrap();
        let fields = details.fields();
        assert_eq!(fields.hostname, "N/A");
        assert_eq!(fields.os, "N/A");
        assert_eq!(fields.cpu, "Xeon E5");
        assert_eq!(fields.memory, "N/A");
    }

    #[test]
    fn test_asset_memory_number() {
        let details: AssetDetails = serde_json::from_value(json!({"memory_gb": 16})).unwrap();
        assert_eq!(details.fields().memory, "16");
    }
}
