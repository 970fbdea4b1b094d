//! desk-cli - Lightweight desk reservation client
//!
//! A terminal client for a shared-office desk reservation server.

mod actions;
mod api;
mod auth;
mod config;
mod floorplan;
mod models;
mod state;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use models::Slot;

#[derive(Parser)]
#[command(name = "desk-cli")]
#[command(about = "Lightweight CLI client for a desk reservation service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate with the reservation server
    Login {
        /// Email address (OTP deployments)
        #[arg(short, long)]
        email: Option<String>,

        /// Display name (direct-login deployments)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Log out and clear the stored session token
    Logout,

    /// Show current session status
    Status,

    /// Show current user info (verify auth works)
    Whoami,

    /// Show the seat map for a date
    Map {
        /// Date (ISO, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Mark a desk as the current booking target (local only)
        #[arg(short, long)]
        select: Option<String>,
    },

    /// Show the per-desk occupancy table for a date
    Schedule {
        /// Date (ISO, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// List my reservations
    Mine,

    /// Book a desk
    Book {
        /// Desk id
        desk_id: String,

        /// Date (ISO)
        #[arg(short, long)]
        date: NaiveDate,

        /// Slot: AM, PM or FULL (optional in single-slot deployments)
        #[arg(short, long)]
        slot: Option<Slot>,
    },

    /// Cancel a reservation by id (see `mine`)
    Cancel {
        reservation_id: String,
    },

    /// Release or reclaim a named desk you own for a slot
    Absence {
        /// Desk id of the owned desk
        desk_id: String,

        /// Date (ISO)
        #[arg(short, long)]
        date: NaiveDate,

        /// Slot: AM, PM or FULL
        #[arg(short, long)]
        slot: Slot,

        /// Reclaim the slot instead of releasing it
        #[arg(long)]
        reclaim: bool,
    },

    /// Admin: create or update a user
    AdminUser {
        /// User identity (email or name, per deployment)
        identity: String,

        /// Disable the account
        #[arg(long)]
        disabled: bool,

        /// Grant admin rights
        #[arg(long)]
        admin: bool,
    },

    /// Admin: create (no --id) or update (with --id) a desk
    AdminDesk {
        /// Desk label
        label: String,

        /// Desk id to update; omit to create
        #[arg(long)]
        id: Option<String>,

        /// Disable the desk
        #[arg(long)]
        disabled: bool,

        /// Owner user id for a named desk
        #[arg(long)]
        owner: Option<String>,
    },

    /// Admin: show aggregate stats
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Login { email, name } => {
            auth::login(email, name).await?;
        }
        Commands::Logout => {
            auth::logout().await?;
        }
        Commands::Status => {
            auth::status().await?;
        }
        Commands::Whoami => {
            actions::whoami().await?;
        }
        Commands::Map { date, select } => {
            actions::map(date, select).await?;
        }
        Commands::Schedule { date } => {
            actions::schedule(date).await?;
        }
        Commands::Mine => {
            actions::mine().await?;
        }
        Commands::Book {
            desk_id,
            date,
            slot,
        } => {
            actions::book(desk_id, date, slot).await?;
        }
        Commands::Cancel { reservation_id } => {
            actions::cancel(reservation_id).await?;
        }
        Commands::Absence {
            desk_id,
            date,
            slot,
            reclaim,
        } => {
            actions::absence(desk_id, date, slot, !reclaim).await?;
        }
        Commands::AdminUser {
            identity,
            disabled,
            admin,
        } => {
            actions::admin_user(identity, !disabled, admin).await?;
        }
        Commands::AdminDesk {
            label,
            id,
            disabled,
            owner,
        } => {
            actions::admin_desk(id, label, !disabled, owner).await?;
        }
        Commands::Stats => {
            actions::stats().await?;
        }
    }

    Ok(())
}
