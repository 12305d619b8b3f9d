use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STATUS_CLOSED: &str = "Closed";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ticket {
    pub id: String,
    pub subject: String,
    pub status: String,
    /// Usually a string, but shown as-is whatever the service sends.
    #[serde(default)]
    pub asset_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl Ticket {
    pub fn is_closed(&self) -> bool {
        self.status == STATUS_CLOSED
    }

    pub fn asset_id_text(&self) -> String {
        match &self.asset_id {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// CSS-style class the page derives from a status, e.g. `status-in progress`.
pub fn status_class(status: &str) -> String {
    format!("status-{}", status.to_lowercase())
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate<'a> {
    pub status: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NewTicket {
    pub asset_id: String,
    pub description: String,
    pub client_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatedTicket {
    pub new_ticket_id: String,
}

/// Error payload the service returns alongside 4xx/5xx statuses.
#[derive(Debug, Deserialize)]
pub struct ServiceError {
    pub error: String,
}
