use colored::*;
use std::fmt;

#[derive(Debug)]
pub enum DeskError {
    // Configuration errors
    ConfigInvalid(String),
    UnknownConfigKey(String),

    // Lookup errors
    EmptyTicketId,
    TicketNotFound(String),

    // Ticket changes
    StatusUpdateFailed(String),
    TicketAlreadyClosed(String),
    TicketCreationFailed(String),
    HistoryUnavailable(String),

    // Network errors
    NetworkError(String),

    // Generic error
    Other(String),
}

impl fmt::Display for DeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Configuration errors
            DeskError::ConfigInvalid(msg) => {
                write!(f, "{}\n", "Invalid configuration".red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Check your config file: ~/.ticketdesk/config.toml\n")?;
                write!(f, "   2. Check TICKETDESK__* environment variables\n")?;
                write!(f, "   3. Or reset a value: {}", "ticketdesk config set service.base_url http://localhost:5000".green())
            }
            DeskError::UnknownConfigKey(key) => {
                write!(f, "{}\n", format!("Unknown configuration key '{}'", key).red().bold())?;
                write!(f, "   {}\n\n", "Keys use the format section.field".dimmed())?;
                write!(f, "   Available keys: service.base_url, preferences.confirm_close, preferences.color")
            }

            // Lookup errors
            DeskError::EmptyTicketId => {
                write!(f, "{}\n", "Please enter a Ticket ID.".red().bold())?;
                write!(f, "   Example: {}", "ticketdesk analyze TKT101".green())
            }
            DeskError::TicketNotFound(ticket_id) => {
                write!(f, "{}\n", format!("Ticket '{}' not found or server error.", ticket_id).red().bold())?;
                write!(f, "   {}\n\n", "The ticket doesn't exist or the analysis service failed".dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Check the ticket ID is correct\n")?;
                write!(f, "   2. Look it up in the client's history: {}", "ticketdesk history <client_id>".green())
            }

            // Ticket changes
            DeskError::StatusUpdateFailed(ticket_id) => {
                write!(f, "{}\n", "Failed to update status.".red().bold())?;
                write!(f, "   {}\n\n", format!("Ticket {} was left unchanged", ticket_id).dimmed())?;
                write!(f, "   Try again: {}", format!("ticketdesk close {}", ticket_id).green())
            }
            DeskError::TicketAlreadyClosed(ticket_id) => {
                write!(f, "{}\n", format!("Ticket '{}' is already closed", ticket_id).yellow().bold())?;
                write!(f, "   To review it: {}", format!("ticketdesk analyze {}", ticket_id).green())
            }
            DeskError::TicketCreationFailed(msg) => {
                write!(f, "{}\n", "Failed to create ticket".red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Provide --asset-id, --client-id and --description\n")?;
                write!(f, "   2. Or use the web form: {}", "ticketdesk open --create".green())
            }
            DeskError::HistoryUnavailable(msg) => {
                write!(f, "{}\n", "Could not load ticket history".red().bold())?;
                write!(f, "   {}", msg.dimmed())
            }

            // Network errors
            DeskError::NetworkError(msg) => {
                write!(f, "{}\n", "Network error".red().bold())?;
                write!(f, "   {}\n\n", msg.dimmed())?;
                write!(f, "   To fix:\n")?;
                write!(f, "   1. Check the analysis service is running\n")?;
                write!(f, "   2. Verify the service URL: {}\n", "ticketdesk config show".green())?;
                write!(f, "   3. Try again in a moment")
            }

            // Generic
            DeskError::Other(msg) => {
                write!(f, "{}\n", "Error".red().bold())?;
                write!(f, "   {}", msg.dimmed())
            }
        }
    }
}

impl std::error::Error for DeskError {}

impl DeskError {
    /// Connect and timeout failures become `NetworkError`; anything else is
    /// handed to `fallback` with the full context chain.
    pub fn from_request(err: anyhow::Error, fallback: impl FnOnce(String) -> DeskError) -> Self {
        if is_network_failure(&err) {
            DeskError::NetworkError(format!("{:#}", err))
        } else {
            fallback(format!("{:#}", err))
        }
    }
}

fn is_network_failure(err: &anyhow::Error) -> bool {
    err.downcast_ref::<reqwest::Error>()
        .is_some_and(|e| e.is_timeout() || e.is_connect())
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for DeskError {
    fn from(err: anyhow::Error) -> Self {
        DeskError::from_request(err, DeskError::Other)
    }
}

// Helper to convert common error types
impl From<std::io::Error> for DeskError {
    fn from(err: std::io::Error) -> Self {
        DeskError::Other(err.to_string())
    }
}

impl From<dialoguer::Error> for DeskError {
    fn from(err: dialoguer::Error) -> Self {
        DeskError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;
