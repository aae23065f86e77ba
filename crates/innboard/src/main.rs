//! innboard - Property Management Admin Console

mod cli;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use innboard_core::models::{ReservationFilters, ReservationQuery};
use innboard_core::{ApiClient, ApiConfig, EventBus, SessionPhase, SessionStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable supplying the password for `innboard login`
const PASSWORD_ENV: &str = "INNBOARD_PASSWORD";

/// Environment variable naming a log file for TUI mode
const LOG_FILE_ENV: &str = "INNBOARD_LOG";

#[derive(Parser)]
#[command(
    name = "innboard",
    version,
    about = "Property management admin console",
    long_about = "A property management admin console for the terminal.\n\
                  \n\
                  Browses and manages rooms, room types, and reservations per property\n\
                  over the management REST API. The session token is persisted, so the\n\
                  TUI and the non-interactive subcommands share one sign-in.\n\
                  \n\
                  Features:\n\
                    • 5 interactive pages (Add property, Rooms, Room types, Reservations, Tasks)\n\
                    • Modal create/edit forms with field-level validation\n\
                    • Server-side reservation filtering and pagination\n\
                    • Clipboard copy for reservation numbers (press 'y')\n\
                  \n\
                  Examples:\n\
                    innboard                              # Run TUI (default)\n\
                    innboard login manager@example.com    # Sign in and store the token\n\
                    innboard properties                   # List properties\n\
                    innboard rooms --property \"Seaside\"   # Rooms for a named property\n\
                    innboard reservations --status confirmed --page 2\n\
                    innboard reservations --json          # Machine-readable output\n\
                  \n\
                  Environment Variables:\n\
                    INNBOARD_API_URL                 # API base URL (default http://localhost:3000/api)\n\
                    INNBOARD_CONFIG_DIR              # Where the session token is stored\n\
                    INNBOARD_PASSWORD                # Password for 'innboard login'\n\
                    INNBOARD_LOG                     # TUI mode: write logs to this file\n\
                    INNBOARD_NO_COLOR                # Disable ANSI colors (log-friendly)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// API base URL (default: http://localhost:3000/api)
    #[arg(long, env = "INNBOARD_API_URL")]
    api_url: Option<String>,

    /// Directory holding the persisted session token
    #[arg(long, env = "INNBOARD_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "INNBOARD_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Run the interactive TUI (default)
    Tui,
    /// Sign in and persist the session token
    Login {
        /// Account email
        email: String,
    },
    /// Sign out and remove the persisted session token
    Logout,
    /// List properties
    Properties {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List rooms for one property
    Rooms {
        /// Property id or name (default: first property)
        #[arg(long)]
        property: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List room types for one property
    RoomTypes {
        /// Property id or name (default: first property)
        #[arg(long)]
        property: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List reservations with server-side filters and pagination
    Reservations {
        #[command(flatten)]
        args: ReservationListArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Query knobs for `innboard reservations`; every filter is applied
/// server-side
#[derive(Args)]
struct ReservationListArgs {
    /// Property id or name (default: first property)
    #[arg(long)]
    property: Option<String>,

    /// Filter by reservation status
    #[arg(long, value_parser = ["confirmed", "checked-in", "checked-out", "cancelled", "no-show"])]
    status: Option<String>,

    /// Filter by guest name or email fragment
    #[arg(long)]
    guest: Option<String>,

    /// Filter by booking source
    #[arg(long, value_parser = ["direct", "booking.com", "expedia", "airbnb", "other"])]
    source: Option<String>,

    /// Only reservations checking in on this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    check_in: Option<String>,

    /// Only reservations checking out on this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    check_out: Option<String>,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    page: u32,

    /// Rows per page
    #[arg(long, default_value = "20")]
    limit: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mode = cli.mode.unwrap_or(Mode::Tui);
    init_tracing(matches!(mode, Mode::Tui));

    // clap already consumed INNBOARD_API_URL, so a missing flag means the
    // built-in default
    let config = match cli.api_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => ApiConfig::with_base_url(url),
        _ => ApiConfig::default(),
    };
    let client = Arc::new(ApiClient::new(config).context("Failed to build the API client")?);

    let bus = EventBus::default();
    let session = Arc::new(match cli.config_dir {
        Some(dir) => SessionStore::with_config_dir(Arc::clone(&client), bus.clone(), dir),
        None => SessionStore::new(Arc::clone(&client), bus.clone())
            .context("Could not determine the config directory")?,
    });

    let no_color = cli.no_color;

    match mode {
        Mode::Tui => {
            innboard_tui::run(client, session, bus).await?;
        }
        Mode::Login { email } => {
            run_login(&session, &email).await?;
        }
        Mode::Logout => {
            run_logout(&session)?;
        }
        Mode::Properties { json } => {
            run_properties(&client, &session, json, no_color).await?;
        }
        Mode::Rooms { property, json } => {
            run_rooms(&client, &session, property, json, no_color).await?;
        }
        Mode::RoomTypes { property, json } => {
            run_room_types(&client, &session, property, json, no_color).await?;
        }
        Mode::Reservations { args, json } => {
            run_reservations(&client, &session, args, json, no_color).await?;
        }
    }

    Ok(())
}

/// Subcommands log to stderr. The TUI owns the terminal, so there logs go to
/// the file named by `INNBOARD_LOG`, or nowhere when it is unset.
fn init_tracing(tui: bool) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    if !tui {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let Ok(path) = std::env::var(LOG_FILE_ENV) else {
        return;
    };
    if path.trim().is_empty() {
        return;
    }
    match std::fs::File::create(&path) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(e) => eprintln!("innboard: could not open log file {path}: {e}"),
    }
}

// ============================================================================
// CLI Command Handlers
// ============================================================================

async fn run_login(session: &SessionStore, email: &str) -> Result<()> {
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => password,
        _ => cli::prompt_password()?,
    };

    let progress = progress_spinner(false, "Signing in...");
    let outcome = session.login(email, &password).await;
    progress.finish_and_clear();
    let user = outcome.context("Login failed")?;

    println!("✓ Signed in as {}", user.display_name());
    println!("  Session stored at: {}", session.token_path().display());
    Ok(())
}

fn run_logout(session: &SessionStore) -> Result<()> {
    let path = session.token_path().to_path_buf();
    if !path.exists() {
        println!("No stored session at {}", path.display());
        println!("Nothing to do.");
        return Ok(());
    }

    session.logout().context("Failed to clear the session")?;

    println!("✓ Signed out");
    println!("  Removed: {}", path.display());
    Ok(())
}

async fn run_properties(
    client: &ApiClient,
    session: &SessionStore,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let progress = progress_spinner(json, "Restoring session...");
    require_session(session, &progress).await?;

    progress.set_message("Loading properties...");
    let properties = client.list_properties().await?;
    progress.finish_and_clear();

    println!("{}", cli::format_property_table(&properties, json, no_color));

    if !json {
        eprintln!("\n{} properties", properties.len());
    }

    Ok(())
}

async fn run_rooms(
    client: &ApiClient,
    session: &SessionStore,
    property: Option<String>,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let progress = progress_spinner(json, "Restoring session...");
    require_session(session, &progress).await?;

    progress.set_message("Loading properties...");
    let properties = client.list_properties().await?;
    let selected = cli::resolve_property(&properties, property.as_deref())?;

    progress.set_message(format!("Loading rooms for {}...", selected.name));
    let rooms = client.list_rooms(Some(&selected.id)).await?;
    // Type names may come back as bare ids; the catalog resolves them
    let room_types = client.list_room_types(Some(&selected.id)).await?;
    progress.finish_and_clear();

    println!(
        "{}",
        cli::format_room_table(&rooms, &room_types, json, no_color)
    );

    if !json {
        eprintln!("\n{} rooms · {}", rooms.len(), selected.name);
    }

    Ok(())
}

async fn run_room_types(
    client: &ApiClient,
    session: &SessionStore,
    property: Option<String>,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let progress = progress_spinner(json, "Restoring session...");
    require_session(session, &progress).await?;

    progress.set_message("Loading properties...");
    let properties = client.list_properties().await?;
    let selected = cli::resolve_property(&properties, property.as_deref())?;

    progress.set_message(format!("Loading room types for {}...", selected.name));
    let room_types = client.list_room_types(Some(&selected.id)).await?;
    progress.finish_and_clear();

    println!(
        "{}",
        cli::format_room_type_table(&room_types, json, no_color)
    );

    if !json {
        eprintln!("\n{} room types · {}", room_types.len(), selected.name);
    }

    Ok(())
}

async fn run_reservations(
    client: &ApiClient,
    session: &SessionStore,
    args: ReservationListArgs,
    json: bool,
    no_color: bool,
) -> Result<()> {
    if let Some(date) = &args.check_in {
        cli::validate_date(date).context("Invalid --check-in")?;
    }
    if let Some(date) = &args.check_out {
        cli::validate_date(date).context("Invalid --check-out")?;
    }

    let progress = progress_spinner(json, "Restoring session...");
    require_session(session, &progress).await?;

    progress.set_message("Loading properties...");
    let properties = client.list_properties().await?;
    let selected = cli::resolve_property(&properties, args.property.as_deref())?;

    progress.set_message(format!("Loading reservations for {}...", selected.name));
    let query = ReservationQuery {
        page: args.page.max(1),
        limit: args.limit.max(1),
        property_id: Some(selected.id.clone()),
        filters: ReservationFilters {
            status: args.status.unwrap_or_default(),
            guest: args.guest.unwrap_or_default(),
            source: args.source.unwrap_or_default(),
            check_in_date: args.check_in.unwrap_or_default(),
            check_out_date: args.check_out.unwrap_or_default(),
            ..ReservationFilters::default()
        },
    };
    let page = client.list_reservations(&query).await?;
    progress.finish_and_clear();

    println!("{}", cli::format_reservation_table(&page, json, no_color));

    if !json {
        let (page_no, pages, total) = cli::page_summary(&page, query.page);
        eprintln!("\nPage {page_no} of {pages} · {total} reservations");
    }

    Ok(())
}

// ============================================================================
// Utilities
// ============================================================================

/// Fail fast when no persisted token exists or the server rejects it
async fn require_session(session: &SessionStore, progress: &ProgressBar) -> Result<()> {
    if session.bootstrap().await == SessionPhase::SignedIn {
        return Ok(());
    }
    progress.finish_and_clear();
    Err(cli::CliError::NotSignedIn.into())
}

/// Steady-tick spinner on stderr; hidden under `--json` so piped output
/// stays clean
fn progress_spinner(json: bool, message: &str) -> ProgressBar {
    if json {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}
