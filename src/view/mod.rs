//! View bindings for the ticket lookup panel.
//!
//! The lookup controller never touches a concrete surface. It drives a
//! [`TicketView`], which exposes one setter per display element of the panel
//! (status badge, close button, analysis, asset card, alert counter). The
//! [`TicketPanel`] implementation keeps everything in memory and is what the
//! terminal view prints from.

pub mod terminal;

use crate::models::analysis::AssetFields;

pub trait TicketView {
    fn set_loading(&mut self, visible: bool);
    fn set_results_visible(&mut self, visible: bool);

    /// `class` is derived from the status, e.g. `status-open`.
    fn set_status(&mut self, text: &str, class: &str);
    fn set_close_button(&mut self, enabled: bool, label: &str);

    fn set_subject(&mut self, text: &str);
    fn set_ticket_id(&mut self, text: &str);
    fn set_asset_id(&mut self, text: &str);

    fn set_summary(&mut self, text: &str);
    fn set_root_cause(&mut self, text: &str);
    fn clear_steps(&mut self);
    fn push_step(&mut self, text: &str);

    fn set_asset_card_visible(&mut self, visible: bool);
    fn set_asset_fields(&mut self, fields: &AssetFields);

    fn set_alert_count(&mut self, count: usize);

    /// Blocking, user-facing message.
    fn alert(&mut self, message: &str);
}

#[derive(Debug, Clone, Default)]
pub struct TicketPanel {
    pub loading: bool,
    pub results_visible: bool,
    pub status_text: String,
    pub status_class: String,
    pub close_enabled: bool,
    pub close_label: String,
    pub subject: String,
    pub ticket_id: String,
    pub asset_id: String,
    pub summary: String,
    pub root_cause: String,
    pub steps: Vec<String>,
    pub asset_card_visible: bool,
    pub asset: AssetFields,
    pub alert_count: usize,
    /// Every alert raised, oldest first.
    pub alerts: Vec<String>,
}

impl TicketView for TicketPanel {
    fn set_loading(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.results_visible = visible;
    }

    fn set_status(&mut self, text: &str, class: &str) {
        self.status_text = text.to_string();
        self.status_class = class.to_string();
    }

    fn set_close_button(&mut self, enabled: bool, label: &str) {
        self.close_enabled = enabled;
        self.close_label = label.to_string();
    }

    fn set_subject(&mut self, text: &str) {
        self.subject = text.to_string();
    }

    fn set_ticket_id(&mut self, text: &str) {
        self.ticket_id = text.to_string();
    }

    fn set_asset_id(&mut self, text: &str) {
        self.asset_id = text.to_string();
    }

    fn set_summary(&mut self, text: &str) {
        self.summary = text.to_string();
    }

    fn set_root_cause(&mut self, text: &str) {
        self.root_cause = text.to_string();
    }

    fn clear_steps(&mut self) {
        self.steps.clear();
    }

    fn push_step(&mut self, text: &str) {
        self.steps.push(text.to_string());
    }

    fn set_asset_card_visible(&mut self, visible: bool) {
        self.asset_card_visible = visible;
    }

    fn set_asset_fields(&mut self, fields: &AssetFields) {
        self.asset = fields.clone();
    }

    fn set_alert_count(&mut self, count: usize) {
        self.alert_count = count;
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

impl TicketPanel {
    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }
}
