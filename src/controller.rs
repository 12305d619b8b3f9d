//! Ticket lookup controller.
//!
//! Owns the session state (the loaded ticket) and drives a [`TicketView`]
//! through the lookup and close flows. A lookup is split into
//! [`TicketLookup::begin_lookup`] and [`TicketLookup::finish_lookup`] so that
//! callers running several lookups at once can hand results back in any
//! order: only the result for the newest token is applied.

use crate::api::desk::DeskClient;
use crate::models::analysis::{AnalysisResponse, AssetFields};
use crate::models::ticket::{status_class, STATUS_CLOSED};
use crate::view::TicketView;
use tracing::{debug, info, warn};

pub const MSG_EMPTY_ID: &str = "Please enter a Ticket ID.";
pub const MSG_LOOKUP_FAILED: &str = "Ticket not found or server error.";
pub const MSG_STATUS_FAILED: &str = "Failed to update status.";

const LABEL_CLOSE: &str = "Close Ticket";
const LABEL_CLOSED: &str = "Closed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Input was empty, nothing was requested.
    Rejected,
    Loaded,
    Failed,
    /// A newer lookup started before this one finished.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// No open ticket on screen; nothing was requested.
    Unavailable,
    Closed,
    Failed,
}

#[derive(Debug, Clone)]
struct LoadedTicket {
    id: String,
    status: String,
}

pub struct TicketLookup<V: TicketView> {
    client: DeskClient,
    view: V,
    current: Option<LoadedTicket>,
    results_visible: bool,
    latest_token: u64,
}

impl<V: TicketView> TicketLookup<V> {
    pub fn new(client: DeskClient, view: V) -> Self {
        Self {
            client,
            view,
            current: None,
            results_visible: false,
            latest_token: 0,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn current_ticket_id(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.id.as_str())
    }

    /// Mirrors the close button: a ticket is showing and it is not closed.
    pub fn can_close(&self) -> bool {
        self.results_visible
            && self
                .current
                .as_ref()
                .is_some_and(|t| t.status != STATUS_CLOSED)
    }

    pub async fn analyze(&mut self, input: &str) -> LookupOutcome {
        let Some((token, ticket_id)) = self.begin_lookup(input) else {
            return LookupOutcome::Rejected;
        };

        let result = self.client.get_analysis(&ticket_id).await;
        self.finish_lookup(token, result)
    }

    /// Validates the input and prepares the view for a new lookup.
    ///
    /// Returns the token to pass to [`Self::finish_lookup`] together with the
    /// trimmed ticket id, or `None` (after alerting) when the input is blank.
    pub fn begin_lookup(&mut self, input: &str) -> Option<(LookupToken, String)> {
        let ticket_id = input.trim();
        if ticket_id.is_empty() {
            self.view.alert(MSG_EMPTY_ID);
            return None;
        }

        self.latest_token += 1;
        let token = LookupToken(self.latest_token);
        debug!(ticket_id, token = token.0, "starting lookup");

        self.view.set_loading(true);
        self.view.set_results_visible(false);
        self.results_visible = false;

        Some((token, ticket_id.to_string()))
    }

    pub fn finish_lookup(
        &mut self,
        token: LookupToken,
        result: anyhow::Result<AnalysisResponse>,
    ) -> LookupOutcome {
        if token.0 != self.latest_token {
            debug!(token = token.0, latest = self.latest_token, "discarding stale lookup");
            return LookupOutcome::Stale;
        }

        let outcome = match result {
            Ok(data) => {
                info!(ticket_id = %data.ticket.id, status = %data.ticket.status, "ticket loaded");
                self.current = Some(LoadedTicket {
                    id: data.ticket.id.clone(),
                    status: data.ticket.status.clone(),
                });
                self.render(&data);
                LookupOutcome::Loaded
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "ticket lookup failed");
                self.view.alert(MSG_LOOKUP_FAILED);
                LookupOutcome::Failed
            }
        };

        self.view.set_loading(false);
        outcome
    }

    pub fn render(&mut self, data: &AnalysisResponse) {
        let ticket = &data.ticket;

        self.show_status(&ticket.status);

        self.view.set_subject(&format!("Subject: {}", ticket.subject));
        self.view.set_ticket_id(&ticket.id);
        self.view.set_asset_id(&ticket.asset_id_text());

        match &data.ai_analysis {
            Some(analysis) => {
                self.view
                    .set_summary(analysis.summary.as_deref().unwrap_or_default());
                self.view.set_root_cause(
                    analysis.probable_root_cause.as_deref().unwrap_or_default(),
                );
                self.view.clear_steps();
                for step in analysis.steps() {
                    self.view.push_step(&step);
                }
            }
            None => {
                self.view.set_summary("");
                self.view.set_root_cause("");
                self.view.clear_steps();
            }
        }

        match &data.asset_details {
            Some(details) => {
                self.view.set_asset_card_visible(true);
                self.view.set_asset_fields(&details.fields());
            }
            None => {
                self.view.set_asset_card_visible(false);
                self.view.set_asset_fields(&AssetFields::default());
            }
        }

        self.view.set_alert_count(data.related_alerts.len());
        self.view.set_results_visible(true);
        self.results_visible = true;
    }

    pub async fn close_ticket(&mut self) -> CloseOutcome {
        if !self.can_close() {
            return CloseOutcome::Unavailable;
        }
        let Some(ticket_id) = self.current_ticket_id().map(str::to_string) else {
            return CloseOutcome::Unavailable;
        };

        match self.client.update_status(&ticket_id, STATUS_CLOSED).await {
            Ok(()) => {
                info!(%ticket_id, "ticket closed");
                if let Some(current) = self.current.as_mut() {
                    current.status = STATUS_CLOSED.to_string();
                }
                self.show_status(STATUS_CLOSED);
                CloseOutcome::Closed
            }
            Err(e) => {
                warn!(%ticket_id, error = %format!("{:#}", e), "status update failed");
                self.view.alert(MSG_STATUS_FAILED);
                CloseOutcome::Failed
            }
        }
    }

    fn show_status(&mut self, status: &str) {
        self.view.set_status(status, &status_class(status));
        if status == STATUS_CLOSED {
            self.view.set_close_button(false, LABEL_CLOSED);
        } else {
            self.view.set_close_button(true, LABEL_CLOSE);
        }
    }
}
