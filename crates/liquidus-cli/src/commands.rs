//! Implementations of the `liquidus` subcommands.
//!
//! Each command talks to the store directly and prints a short report to
//! stdout. Days are resolved in the local time zone.

use anyhow::{Context as _, Result, bail};
use chrono::{DateTime, Local, Utc};
use liquidus_api::snapshot::{Reference, Snapshot, resolve_date};
use liquidus_core::{
  calendar::{DayKey, WeekRange},
  drink::{
    DrinkRecord, DrinkType, DrinkTypeKind, NewDrinkRecord, NewDrinkType,
    find_type, find_type_by_name,
  },
  goal::GoalConfig,
  health::{HealthSource, plan_import, sync_window_start},
  store::{DrinkQuery, IntakeStore},
  summary::{IntakeSummary, TimePeriod},
  units::Units,
};
use liquidus_store_sqlite::SqliteStore;
use uuid::Uuid;

// ─── Formatting ───────────────────────────────────────────────────────────────

pub fn fmt_amount(amount: f64, units: Units) -> String {
  match units {
    Units::Milliliters => format!("{amount:.0} {}", units.symbol()),
    Units::Ounces => format!("{amount:.1} {}", units.symbol()),
  }
}

fn fmt_percent(fraction: f64) -> String { format!("{:.0}%", fraction * 100.0) }

fn print_summary(summary: &IntakeSummary) {
  let heading = match summary.period {
    TimePeriod::Daily => format!("{}", summary.start),
    TimePeriod::Weekly => format!("{} to {}", summary.start, summary.end),
  };
  println!(
    "{heading}: {} of {} ({}){}",
    fmt_amount(summary.total_amount, summary.units),
    fmt_amount(summary.goal, summary.units),
    fmt_percent(summary.total_percent),
    if summary.goal_met() { ", goal met" } else { "" },
  );
  for entry in &summary.breakdown {
    println!(
      "  {:<12} {:>10}  {:>4}",
      entry.name,
      fmt_amount(entry.amount, summary.units),
      fmt_percent(entry.percent),
    );
  }
}

fn print_record(record: &DrinkRecord, types: &[DrinkType], units: Units) {
  let name = find_type(types, record.type_id)
    .map(|t| t.name.as_str())
    .unwrap_or("?");
  println!(
    "{}  {}  {:<12} {:>10}",
    record.record_id,
    record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
    name,
    fmt_amount(record.amount, units),
  );
}

// ─── Logging drinks ───────────────────────────────────────────────────────────

pub async fn log(
  store: &SqliteStore,
  amount: f64,
  type_name: Option<&str>,
  at: Option<DateTime<Utc>>,
) -> Result<DrinkRecord> {
  let types = store.list_drink_types().await?;
  let drink_type = match type_name {
    Some(name) => find_type_by_name(&types, name)
      .with_context(|| format!("no drink type named {name:?}"))?,
    None => types
      .iter()
      .find(|t| t.kind == DrinkTypeKind::Water)
      .context("water type missing from registry")?,
  };

  let mut input = NewDrinkRecord::new(drink_type.type_id, amount);
  if let Some(at) = at {
    input = input.at(at);
  }
  let record = store.record_drink(input).await?;
  let settings = store.settings().await?;

  println!(
    "Logged {} of {} ({})",
    fmt_amount(record.amount, settings.units),
    drink_type.name,
    record.record_id,
  );
  Ok(record)
}

pub async fn undo(store: &SqliteStore, record_id: Uuid) -> Result<()> {
  if !store.delete_drink(record_id).await? {
    bail!("no drink with id {record_id}");
  }
  println!("Removed {record_id}");
  Ok(())
}

// ─── Reports ──────────────────────────────────────────────────────────────────

pub async fn day(store: &SqliteStore, date: Option<&str>) -> Result<IntakeSummary> {
  let summary = match resolve_date(date) {
    Reference::Day(day) => {
      let snapshot = Snapshot::load(store, day.utc_bounds(&Local)).await?;
      let settings = &snapshot.settings;
      snapshot
        .aggregator()
        .day_summary(day, &settings.goal, settings.units)
    }
    Reference::Malformed(_) => {
      let settings = store.settings().await?;
      let today = DayKey::today(&Local);
      IntakeSummary::empty(TimePeriod::Daily, today, today, &settings.goal, settings.units)
    }
  };
  print_summary(&summary);
  Ok(summary)
}

pub async fn week(store: &SqliteStore, date: Option<&str>) -> Result<IntakeSummary> {
  let summary = match resolve_date(date) {
    Reference::Day(day) => {
      let range = WeekRange::containing(day);
      let snapshot = Snapshot::load(store, range.utc_bounds(&Local)).await?;
      let settings = &snapshot.settings;
      snapshot
        .aggregator()
        .week_summary(day, &settings.goal, settings.units)
    }
    Reference::Malformed(_) => {
      let settings = store.settings().await?;
      let range = WeekRange::containing(DayKey::today(&Local));
      IntakeSummary::empty(
        TimePeriod::Weekly,
        range.start,
        range.end,
        &settings.goal,
        settings.units,
      )
    }
  };
  print_summary(&summary);
  Ok(summary)
}

/// List the drinks of a day, or of its week with `whole_week`, newest first.
/// Drinks of disabled types are left out.
pub async fn drinks(
  store: &SqliteStore,
  date: Option<&str>,
  whole_week: bool,
) -> Result<Vec<DrinkRecord>> {
  let Reference::Day(day) = resolve_date(date) else {
    return Ok(Vec::new());
  };

  let range = WeekRange::containing(day);
  let bounds = if whole_week {
    range.utc_bounds(&Local)
  } else {
    day.utc_bounds(&Local)
  };
  let snapshot = Snapshot::load(store, bounds).await?;
  let agg = snapshot.aggregator();
  let records: Vec<DrinkRecord> = if whole_week {
    agg.filter_by_week(&range).into_iter().cloned().collect()
  } else {
    agg.filter_by_day(day).into_iter().cloned().collect()
  };

  for record in &records {
    print_record(record, &snapshot.types, snapshot.settings.units);
  }
  if records.is_empty() {
    println!("No drinks logged.");
  }
  Ok(records)
}

// ─── Settings ─────────────────────────────────────────────────────────────────

pub async fn goal(store: &SqliteStore, daily_goal: f64) -> Result<()> {
  let goal = GoalConfig::new(daily_goal)?;
  let settings = store.set_daily_goal(goal).await?;
  println!(
    "Daily goal set to {} ({} per week)",
    fmt_amount(settings.goal.daily_goal(), settings.units),
    fmt_amount(settings.goal.weekly_goal(), settings.units),
  );
  Ok(())
}

pub async fn units(store: &SqliteStore, units: Units) -> Result<()> {
  let settings = store.set_units(units).await?;
  println!(
    "Units set to {}; daily goal is {}",
    settings.units,
    fmt_amount(settings.goal.daily_goal(), settings.units),
  );
  Ok(())
}

// ─── Drink types ──────────────────────────────────────────────────────────────

async fn type_named(store: &SqliteStore, name: &str) -> Result<DrinkType> {
  let types = store.list_drink_types().await?;
  find_type_by_name(&types, name)
    .cloned()
    .with_context(|| format!("no drink type named {name:?}"))
}

pub async fn list_types(store: &SqliteStore) -> Result<()> {
  for t in store.list_drink_types().await? {
    let state = if t.enabled { "enabled" } else { "disabled" };
    let origin = if t.kind.is_default() { "default" } else { "custom" };
    println!("{:<12} {:<8} {:<8} {}", t.name, state, origin, t.type_id);
  }
  Ok(())
}

pub async fn add_type(store: &SqliteStore, name: &str) -> Result<DrinkType> {
  let drink_type = store.add_drink_type(NewDrinkType::new(name)).await?;
  println!("Added {}", drink_type.name);
  Ok(drink_type)
}

pub async fn set_type_enabled(store: &SqliteStore, name: &str, enabled: bool) -> Result<()> {
  let drink_type = type_named(store, name).await?;
  let updated = store.set_type_enabled(drink_type.type_id, enabled).await?;
  println!(
    "{} {}",
    if updated.enabled { "Enabled" } else { "Disabled" },
    updated.name,
  );
  Ok(())
}

pub async fn delete_type(store: &SqliteStore, name: &str) -> Result<()> {
  let drink_type = type_named(store, name).await?;
  let removed = store.delete_drink_type(drink_type.type_id).await?;
  println!("Deleted {} and {removed} of its drinks", drink_type.name);
  Ok(())
}

// ─── Health sync ──────────────────────────────────────────────────────────────

/// Import new samples from `source` as water records and advance the sync
/// marker. The fetch reaches back a few days before the last sync; samples
/// already stored are skipped. Returns the number of records created.
pub async fn sync<H>(store: &SqliteStore, source: &H) -> Result<usize>
where
  H: HealthSource,
{
  if !source
    .request_authorization()
    .await
    .context("health authorization failed")?
  {
    bail!("access to health data was not granted");
  }

  let started = Utc::now();
  let settings = store.settings().await?;
  let window = sync_window_start(settings.last_health_sync);
  let samples = source
    .fetch_external_samples(window)
    .await
    .context("failed to fetch health samples")?;

  let types = store.list_drink_types().await?;
  let water = types
    .iter()
    .find(|t| t.kind == DrinkTypeKind::Water)
    .context("water type missing from registry")?;
  let existing = match window {
    Some(since) => store.list_drinks(DrinkQuery::since(since)).await?,
    None => store.list_drinks(DrinkQuery::all()).await?,
  };

  let planned = plan_import(&existing, &samples, water, settings.units);
  let imported = planned.len();
  for input in planned {
    store.record_drink(input).await?;
  }
  store.set_last_health_sync(started).await?;

  tracing::info!(fetched = samples.len(), imported, "health sync finished");
  println!("Imported {imported} of {} samples", samples.len());
  Ok(imported)
}
