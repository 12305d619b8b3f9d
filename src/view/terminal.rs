use super::{TicketPanel, TicketView};
use crate::models::analysis::AssetFields;
use colored::*;

/// Prints the panel to stdout. State lives in the wrapped [`TicketPanel`];
/// only the loading indicator and alerts are written as they happen.
#[derive(Debug, Default)]
pub struct TerminalView {
    panel: TicketPanel,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> &TicketPanel {
        &self.panel
    }

    pub fn print(&self) {
        print_panel(&self.panel);
    }
}

/// Renders the results section; prints nothing while results are hidden.
pub fn print_panel(panel: &TicketPanel) {
    if !panel.results_visible {
        return;
    }

    println!();
    println!(
        "  {} [{}]",
        panel.ticket_id.bright_white().bold(),
        status_colored(&panel.status_text)
    );
    println!("  {}", panel.subject);
    println!(
        "  {} {}",
        "Asset:".bold(),
        if panel.asset_id.is_empty() {
            "-".dimmed()
        } else {
            panel.asset_id.bright_white()
        }
    );

    println!();
    println!("{}", "AI Analysis".cyan().bold());
    println!("  {} {}", "Summary:".bold(), panel.summary);
    println!("  {} {}", "Root cause:".bold(), panel.root_cause);
    if panel.steps.is_empty() {
        println!("  {}", "No recommended steps".dimmed());
    } else {
        println!("  {}", "Recommended steps:".bold());
        for (i, step) in panel.steps.iter().enumerate() {
            println!("    {}. {}", (i + 1).to_string().dimmed(), step);
        }
    }

    if panel.asset_card_visible {
        println!();
        println!("{}", "Asset Details".cyan().bold());
        print_asset(&panel.asset);
    }

    println!();
    println!(
        "  {} {}",
        "Related alerts:".bold(),
        panel.alert_count.to_string().bright_white()
    );

    let button = if panel.close_enabled {
        panel.close_label.green()
    } else {
        panel.close_label.bright_black()
    };
    println!("  {} {}", "Action:".bold(), button);
}

fn print_asset(asset: &AssetFields) {
    println!("  {} {}", "Hostname:".dimmed(), asset.hostname);
    println!("  {} {}", "OS:".dimmed(), asset.os);
    println!("  {} {}", "CPU:".dimmed(), asset.cpu);
    println!("  {} {}", "Memory (GB):".dimmed(), asset.memory);
}

pub fn status_colored(status: &str) -> ColoredString {
    match status {
        "Open" | "New" => status.yellow(),
        "In Progress" => status.green(),
        "Closed" => status.bright_black(),
        _ => status.normal(),
    }
}

impl TicketView for TerminalView {
    fn set_loading(&mut self, visible: bool) {
        if visible && !self.panel.loading {
            println!("{}", "  Analyzing ticket...".dimmed());
        }
        self.panel.set_loading(visible);
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.panel.set_results_visible(visible);
    }

    fn set_status(&mut self, text: &str, class: &str) {
        self.panel.set_status(text, class);
    }

    fn set_close_button(&mut self, enabled: bool, label: &str) {
        self.panel.set_close_button(enabled, label);
    }

    fn set_subject(&mut self, text: &str) {
        self.panel.set_subject(text);
    }

    fn set_ticket_id(&mut self, text: &str) {
        self.panel.set_ticket_id(text);
    }

    fn set_asset_id(&mut self, text: &str) {
        self.panel.set_asset_id(text);
    }

    fn set_summary(&mut self, text: &str) {
        self.panel.set_summary(text);
    }

    fn set_root_cause(&mut self, text: &str) {
        self.panel.set_root_cause(text);
    }

    fn clear_steps(&mut self) {
        self.panel.clear_steps();
    }

    fn push_step(&mut self, text: &str) {
        self.panel.push_step(text);
    }

    fn set_asset_card_visible(&mut self, visible: bool) {
        self.panel.set_asset_card_visible(visible);
    }

    fn set_asset_fields(&mut self, fields: &AssetFields) {
        self.panel.set_asset_fields(fields);
    }

    fn set_alert_count(&mut self, count: usize) {
        self.panel.set_alert_count(count);
    }

    fn alert(&mut self, message: &str) {
        println!("{}", format!("  {}", message).red().bold());
        self.panel.alert(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_view_delegates_to_panel() {
        let mut view = TerminalView::new();
        view.set_status("Open", "status-open");
        view.push_step("Clear logs");
        view.alert("Failed to update status.");

        let panel = view.panel();
        assert_eq!(panel.status_text, "Open");
        assert_eq!(panel.steps, vec!["Clear logs"]);
        assert_eq!(panel.last_alert(), Some("Failed to update status."));
    }

    #[test]
    fn test_status_colored_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(status_colored("Closed").to_string(), "Closed");
        assert_eq!(status_colored("Escalated").to_string(), "Escalated");
    }
}
