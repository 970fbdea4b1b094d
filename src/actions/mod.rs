//! User gestures: one subcommand = one mutation (at most), then a full
//! snapshot refresh before anything is rendered
//!
//! There is no optimistic update anywhere: a failed mutation leaves the
//! last snapshot untouched, so rollback is implicit. Errors are reported
//! for the single gesture that caused them; nothing retries.

use anyhow::{bail, Result};
use chrono::NaiveDate;

use crate::api::DeskClient;
use crate::auth;
use crate::config::Config;
use crate::floorplan::{layout, resolve, Grid, Occupancy, Tile};
use crate::models::{Absence, Slot};
use crate::state::{booking_window, today, AppState, Snapshot};

fn occupancy_str(occ: &Occupancy) -> String {
    match occ {
        Occupancy::Free => "-".to_string(),
        Occupancy::ManuallyBooked(who) => who.clone(),
        Occupancy::AutoBooked(who) => format!("{} (auto)", who),
    }
}

fn tile_line(tile: &Tile) -> String {
    let marker = if tile.selected { "*" } else { " " };
    let slots = tile
        .slots
        .iter()
        .map(|(slot, occ)| format!("{}: {}", slot, occupancy_str(occ)))
        .collect::<Vec<_>>()
        .join("  ");
    format!(
        "{} {} ({}) [{}]  {}",
        marker,
        tile.title,
        tile.subtitle,
        tile.day.as_str(),
        slots
    )
}

fn print_grid(grid: &Grid, date: NaiveDate) {
    println!("\nSeat map for {}:", date);
    println!("{:-<72}", "");
    for cell in &grid.cells {
        match &cell.tile {
            Some(tile) => println!("{:<4}{}", cell.position, tile_line(tile)),
            None => println!("{:<4}  (empty)", cell.position),
        }
    }
    if !grid.overflow.is_empty() {
        println!("Overflow:");
        for tile in &grid.overflow {
            println!("    {}", tile_line(tile));
        }
    }
}

fn build_state(snapshot: Snapshot, date: Option<NaiveDate>) -> AppState {
    AppState::new(snapshot, date.unwrap_or_else(today))
}

fn render_map(config: &Config, state: &AppState) {
    let plan = config.floor_plan();
    let grid = layout(
        &plan,
        &state.snapshot.desks,
        &state.snapshot.users,
        &state.snapshot.reservations,
        state.selected_date,
        config.slot_model.slots(),
        state.selected_desk.as_deref(),
    );
    println!("{}", state.session_banner());
    print_grid(&grid, state.selected_date);
}

/// Show the authenticated user (verify auth works) without fetching a
/// full snapshot.
pub async fn whoami() -> Result<()> {
    let config = Config::load()?;
    if config.token.is_none() {
        bail!("Not logged in. Run 'desk-cli login'.");
    }
    let client = DeskClient::new(&config)?;
    let me = client.me().await?;

    println!();
    println!("Identity: {}", me.identity());
    println!("Role:     {}", me.role());
    println!("ID:       {}", me.user_id);
    Ok(())
}

/// Render the seat map. `--select` marks a desk locally; no server call
/// happens until `book` is invoked explicitly.
pub async fn map(date: Option<NaiveDate>, select: Option<String>) -> Result<()> {
    let (config, _, snapshot) = auth::restore().await?;
    let mut state = build_state(snapshot, date);
    state.select_desk(select);
    render_map(&config, &state);
    Ok(())
}

/// Per-desk occupancy table for one date, every desk on one row.
pub async fn schedule(date: Option<NaiveDate>) -> Result<()> {
    let (config, _, snapshot) = auth::restore().await?;
    let state = build_state(snapshot, date);
    let slots = config.slot_model.slots();

    println!("{}", state.session_banner());
    println!("\nSchedule for {}:", state.selected_date);
    println!("{:-<72}", "");

    let mut desks: Vec<_> = state.snapshot.desks.iter().collect();
    desks.sort_by_key(|d| (d.label.to_lowercase(), d.label.clone()));
    for desk in desks {
        let cols = slots
            .iter()
            .map(|&slot| {
                let occ = resolve(
                    &state.snapshot.reservations,
                    &state.snapshot.users,
                    &desk.desk_id,
                    state.selected_date,
                    slot,
                );
                format!("{}: {}", slot, occupancy_str(&occ))
            })
            .collect::<Vec<_>>()
            .join("  ");
        println!("{:<24}{}", desk.display(), cols);
    }
    Ok(())
}

/// List the current user's explicit reservations with their ids.
pub async fn mine() -> Result<()> {
    let (_config, _, snapshot) = auth::restore().await?;
    let state = build_state(snapshot, None);

    println!("{}", state.session_banner());
    let mine = state.my_reservations();
    if mine.is_empty() {
        println!("No explicit reservations");
        return Ok(());
    }
    for r in mine {
        println!(
            "{} {}  {}  [{}]",
            r.date,
            r.slot,
            state.desk_label(&r.desk_id),
            r.reservation_id
        );
    }
    Ok(())
}

/// Book a desk for a date and slot, then refresh and re-render the map.
pub async fn book(desk_id: String, date: NaiveDate, slot: Option<Slot>) -> Result<()> {
    let (config, client, snapshot) = auth::restore().await?;

    // Local validation before any mutation call.
    let desk_id = desk_id.trim().to_string();
    if desk_id.is_empty() {
        bail!("Desk is required");
    }
    let (start, end) = booking_window(today());
    if date < start || date > end {
        bail!("Date {} is outside the booking window {}..{}", date, start, end);
    }
    let slot = match slot {
        Some(s) => {
            if !config.slot_model.request_slots().contains(&s) {
                bail!("Slot {} is not available in this deployment", s);
            }
            s
        }
        None => match config.slot_model.request_slots() {
            [only] => *only,
            _ => bail!("Slot is required (--slot AM|PM|FULL)"),
        },
    };

    client.create_reservation(&desk_id, date, slot).await?;
    tracing::info!("Reserved {} on {} {}", desk_id, date, slot);

    let mut state = build_state(snapshot, Some(date));
    state.replace(Snapshot::fetch(&client).await?);
    println!("Reservation saved");
    render_map(&config, &state);
    Ok(())
}

/// Cancel a reservation by id, then refresh and list what remains.
pub async fn cancel(reservation_id: String) -> Result<()> {
    let (_config, client, snapshot) = auth::restore().await?;

    let reservation_id = reservation_id.trim().to_string();
    if reservation_id.is_empty() {
        bail!("Reservation id is required");
    }

    client.delete_reservation(&reservation_id).await?;
    tracing::info!("Cancelled reservation {}", reservation_id);

    let mut state = build_state(snapshot, None);
    state.replace(Snapshot::fetch(&client).await?);
    println!("Reservation cancelled");
    for r in state.my_reservations() {
        println!(
            "{} {}  {}  [{}]",
            r.date,
            r.slot,
            state.desk_label(&r.desk_id),
            r.reservation_id
        );
    }
    Ok(())
}

/// Record or withdraw an absence release on a named desk the current
/// user owns.
pub async fn absence(desk_id: String, date: NaiveDate, slot: Slot, released: bool) -> Result<()> {
    let (config, client, snapshot) = auth::restore().await?;
    let mut state = build_state(snapshot, Some(date));

    if !state.owned_desks().iter().any(|d| d.desk_id == desk_id) {
        bail!("Desk {} is not a named desk you own", desk_id);
    }
    if !config.slot_model.request_slots().contains(&slot) {
        bail!("Slot {} is not available in this deployment", slot);
    }

    client
        .upsert_absence(&Absence {
            desk_id: desk_id.clone(),
            date,
            slot,
            released,
        })
        .await?;
    tracing::info!(
        "Absence {} for {} on {} {}",
        if released { "released" } else { "reclaimed" },
        desk_id,
        date,
        slot
    );

    state.replace(Snapshot::fetch(&client).await?);
    println!("Absence state updated");
    render_map(&config, &state);
    Ok(())
}

/// Admin: create or update a user by identity.
pub async fn admin_user(identity: String, enabled: bool, is_admin: bool) -> Result<()> {
    let (_config, client, snapshot) = auth::restore().await?;
    let mut state = build_state(snapshot, None);
    if !state.admin_visible() {
        bail!("Admin commands require an admin account");
    }

    let identity = identity.trim().to_string();
    if identity.is_empty() {
        bail!("User identity is required");
    }

    client.admin_upsert_user(&identity, enabled, is_admin).await?;
    state.replace(Snapshot::fetch(&client).await?);
    println!("User updated ({} users total)", state.snapshot.users.len());
    Ok(())
}

/// Admin: create (no id) or update (with id) a desk.
pub async fn admin_desk(
    desk_id: Option<String>,
    label: String,
    enabled: bool,
    owner: Option<String>,
) -> Result<()> {
    let (_config, client, snapshot) = auth::restore().await?;
    let mut state = build_state(snapshot, None);
    if !state.admin_visible() {
        bail!("Admin commands require an admin account");
    }

    let label = label.trim().to_string();
    if label.is_empty() {
        bail!("Desk label is required");
    }
    let desk_id = desk_id.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let owner = owner.as_deref().map(str::trim).filter(|s| !s.is_empty());

    client
        .admin_upsert_desk(desk_id, &label, enabled, owner)
        .await?;
    state.replace(Snapshot::fetch(&client).await?);
    println!("Desk updated ({} desks total)", state.snapshot.desks.len());
    Ok(())
}

/// Admin: aggregate counters.
pub async fn stats() -> Result<()> {
    let (_config, client, snapshot) = auth::restore().await?;
    let state = build_state(snapshot, None);
    if !state.admin_visible() {
        bail!("Admin commands require an admin account");
    }

    let stats = client.admin_stats().await?;
    println!("Total reservations: {}", stats.total_reservations);
    println!("Active users:       {}", stats.active_users);
    println!("Enabled desks:      {}", stats.enabled_desks);
    Ok(())
}
