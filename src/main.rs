use clap::{Parser, Subcommand};
use colored::*;

mod api;
mod config;
mod controller;
mod errors;
mod logging;
mod models;
mod view;

use api::desk::DeskClient;
use controller::{CloseOutcome, LookupOutcome, TicketLookup};
use errors::{DeskError, Result};
use view::TicketPanel;

#[derive(Parser)]
#[command(name = "ticketdesk")]
#[command(version = "0.1.0")]
#[command(about = "Look up support tickets, read their AI analysis, close them", long_about = None)]
struct Cli {
    /// for debugging purposes
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Analysis service URL (overrides service.base_url)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a ticket with its AI analysis and asset details
    Analyze {
        /// (e.g., TKT101)
        ticket_id: String,

        /// Print the raw service response
        #[arg(long)]
        json: bool,
    },

    /// Close a ticket
    Close {
        ticket_id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Interactive lookup session
    Session,

    /// Create a new ticket
    Create {
        #[arg(long)]
        asset_id: String,

        #[arg(long)]
        client_id: String,

        #[arg(long, short)]
        description: String,
    },

    /// List a client's tickets
    History {
        client_id: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Open the agent page in the browser
    Open {
        /// Open the ticket creation form instead
        #[arg(long)]
        create: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Display current configuration
    Show,

    /// Set a specific configuration value
    Set {
        /// Configuration key (e.g., service.base_url, preferences.confirm_close)
        key: String,
        /// New value
        value: String,
    },

    /// Get the path to the config file
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_logger(cli.verbose);

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("\n{}", e);
        std::process::exit(1);
    }

    println!();
}

async fn run(cli: Cli) -> Result<()> {
    use crate::config::settings::Settings;

    let settings = Settings::load().map_err(|e| DeskError::ConfigInvalid(format!("{:#}", e)))?;

    if !settings.preferences.color {
        colored::control::set_override(false);
    }

    let base_url = cli
        .url
        .clone()
        .unwrap_or_else(|| settings.service.base_url.clone());
    let client = DeskClient::new(base_url);
    tracing::debug!(base_url = client.base_url(), "using analysis service");

    match cli.command {
        Commands::Analyze { ticket_id, json } => handle_analyze(client, &ticket_id, json).await,

        Commands::Close { ticket_id, yes } => {
            let confirm = settings.preferences.confirm_close && !yes;
            handle_close(client, &ticket_id, confirm).await
        }

        Commands::Session => handle_session(client).await,

        Commands::Create {
            asset_id,
            client_id,
            description,
        } => handle_create(&client, asset_id, client_id, description).await,

        Commands::History { client_id, json } => handle_history(&client, &client_id, json).await,

        Commands::Open { create } => handle_open(&client, create),

        Commands::Config { action } => handle_config(action, settings),
    }
}

async fn handle_analyze(client: DeskClient, ticket_id: &str, json: bool) -> Result<()> {
    let ticket_id = ticket_id.trim();
    if ticket_id.is_empty() {
        return Err(DeskError::EmptyTicketId);
    }

    if json {
        let data = client.get_analysis_raw(ticket_id).await.map_err(|e| {
            tracing::warn!(error = %format!("{:#}", e), "ticket lookup failed");
            DeskError::TicketNotFound(ticket_id.to_string())
        })?;
        println!(
            "{}",
            serde_json::to_string_pretty(&data).map_err(|e| DeskError::Other(e.to_string()))?
        );
        return Ok(());
    }

    println!("{}", format!("Analyzing {}...", ticket_id).cyan().bold());

    let mut lookup = TicketLookup::new(client, TicketPanel::default());
    match lookup.analyze(ticket_id).await {
        LookupOutcome::Loaded => {
            view::terminal::print_panel(lookup.view());
            Ok(())
        }
        LookupOutcome::Rejected => Err(DeskError::EmptyTicketId),
        LookupOutcome::Failed | LookupOutcome::Stale => {
            Err(DeskError::TicketNotFound(ticket_id.to_string()))
        }
    }
}

async fn handle_close(client: DeskClient, ticket_id: &str, confirm: bool) -> Result<()> {
    let ticket_id = ticket_id.trim();
    if ticket_id.is_empty() {
        return Err(DeskError::EmptyTicketId);
    }

    println!("{}", format!("Closing {}...", ticket_id).cyan().bold());
    println!("{}", "  Fetching ticket...".dimmed());

    let mut lookup = TicketLookup::new(client, TicketPanel::default());
    if lookup.analyze(ticket_id).await != LookupOutcome::Loaded {
        return Err(DeskError::TicketNotFound(ticket_id.to_string()));
    }

    let loaded_id = lookup.current_ticket_id().unwrap_or(ticket_id).to_string();
    if !lookup.can_close() {
        return Err(DeskError::TicketAlreadyClosed(loaded_id));
    }

    view::terminal::print_panel(lookup.view());
    println!();

    if confirm {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!("Close ticket {}?", loaded_id))
            .default(false)
            .interact()?;
        if !proceed {
            println!("{}", "  Ticket left open".yellow());
            return Ok(());
        }
    }

    match lookup.close_ticket().await {
        CloseOutcome::Closed => {
            println!("{}", format!("✓ Ticket {} closed", loaded_id).green().bold());
            Ok(())
        }
        CloseOutcome::Failed => Err(DeskError::StatusUpdateFailed(loaded_id)),
        CloseOutcome::Unavailable => Err(DeskError::TicketAlreadyClosed(loaded_id)),
    }
}

async fn handle_session(client: DeskClient) -> Result<()> {
    use dialoguer::Input;
    use crate::view::terminal::TerminalView;

    println!("{}", "Ticket Lookup".cyan().bold());
    println!(
        "{}",
        "  Enter a ticket ID to analyze it, 'close' to close the loaded ticket, 'quit' to leave"
            .dimmed()
    );

    let mut lookup = TicketLookup::new(client, TerminalView::new());

    loop {
        println!();
        let input: String = Input::new()
            .with_prompt("Ticket ID")
            .allow_empty(true)
            .interact_text()?;

        match input.trim() {
            "quit" | "exit" => break,
            "close" => match lookup.close_ticket().await {
                CloseOutcome::Closed => {
                    println!("{}", "  ✓ Ticket closed".green());
                    lookup.view().print();
                }
                CloseOutcome::Failed => {}
                CloseOutcome::Unavailable => {
                    if lookup.view().panel().results_visible {
                        println!("{}", "  Ticket is already closed".yellow());
                    } else {
                        println!("{}", "  No ticket loaded".yellow());
                    }
                }
            },
            _ => {
                if lookup.analyze(&input).await == LookupOutcome::Loaded {
                    lookup.view().print();
                }
            }
        }
    }

    Ok(())
}

async fn handle_create(
    client: &DeskClient,
    asset_id: String,
    client_id: String,
    description: String,
) -> Result<()> {
    use crate::models::ticket::NewTicket;

    let ticket = NewTicket {
        asset_id: asset_id.trim().to_string(),
        client_id: client_id.trim().to_string(),
        description: description.trim().to_string(),
    };

    if ticket.asset_id.is_empty() || ticket.client_id.is_empty() || ticket.description.is_empty() {
        return Err(DeskError::TicketCreationFailed("Missing data".to_string()));
    }

    println!("{}", "Creating ticket...".cyan().bold());

    let new_id = client
        .create_ticket(&ticket)
        .await
        .map_err(|e| DeskError::from_request(e, DeskError::TicketCreationFailed))?;

    tracing::info!(%new_id, "ticket created");

    println!();
    println!("{}", "Ticket created!".green().bold());
    println!("  {} {}", "Ticket:".bold(), new_id.bright_white());
    println!("  {} {}", "Asset:".bold(), ticket.asset_id);
    println!(
        "  {} {}",
        "Next:".bold(),
        format!("ticketdesk analyze {}", new_id).green()
    );

    Ok(())
}

async fn handle_history(client: &DeskClient, client_id: &str, json_output: bool) -> Result<()> {
    let tickets = client
        .client_history(client_id)
        .await
        .map_err(|e| DeskError::from_request(e, DeskError::HistoryUnavailable))?;

    // JSON output
    if json_output {
        let json = serde_json::to_string_pretty(&tickets)
            .map_err(|e| DeskError::Other(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", format!("Tickets for {}", client_id).cyan().bold());
    println!();

    if tickets.is_empty() {
        println!("{}", "  No tickets for this client".dimmed());
        return Ok(());
    }

    println!("  {} tickets found", tickets.len().to_string().bright_white());
    println!();

    for ticket in tickets {
        let subject = if ticket.is_closed() {
            ticket.subject.dimmed()
        } else {
            ticket.subject.normal()
        };
        println!(
            "  {} [{}]  {}",
            ticket.id.bright_white().bold(),
            view::terminal::status_colored(&ticket.status),
            subject
        );
    }

    Ok(())
}

fn handle_open(client: &DeskClient, create: bool) -> Result<()> {
    let url = client.page_url(create);
    let label = if create { "Opening ticket form:" } else { "Opening agent view:" };
    println!("{} {}", label.dimmed(), url.bright_white());
    open::that(&url)?;
    Ok(())
}

fn handle_config(action: ConfigAction, mut settings: crate::config::settings::Settings) -> Result<()> {
    use crate::config::settings::Settings;

    match action {
        ConfigAction::Show => {
            println!("{}", "Current Configuration".cyan().bold());
            println!();

            println!("{}", "[service]".bold());
            println!("  {} {}", "base_url:".dimmed(), settings.service.base_url.bright_white());

            println!();
            println!("{}", "[preferences]".bold());
            println!(
                "  {} {}",
                "confirm_close:".dimmed(),
                settings.preferences.confirm_close.to_string().bright_white()
            );
            println!(
                "  {} {}",
                "color:".dimmed(),
                settings.preferences.color.to_string().bright_white()
            );

            Ok(())
        }

        ConfigAction::Set { key, value } => {
            let known = settings
                .set(&key, &value)
                .map_err(|e| DeskError::ConfigInvalid(e.to_string()))?;
            if !known {
                return Err(DeskError::UnknownConfigKey(key));
            }

            settings.save()?;

            println!("{}", format!("✓ Updated {} to: {}", key, value).green().bold());
            println!();
            println!("{}", "Configuration saved successfully!".green());

            Ok(())
        }

        ConfigAction::Path => {
            let config_path = Settings::config_path()?;
            println!("{}", config_path.display());
            Ok(())
        }
    }
}
