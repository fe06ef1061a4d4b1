//! [`SqliteStore`], the SQLite implementation of [`IntakeStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use liquidus_core::{
  drink::{DrinkRecord, DrinkType, DrinkTypeKind, NewDrinkRecord, NewDrinkType},
  goal::{GoalConfig, Settings},
  store::{DrinkQuery, IntakeStore},
  units::Units,
};

use crate::{
  encode::{
    encode_dt, encode_kind, encode_units, encode_uuid, RawDrinkRecord,
    RawDrinkType, RawSettings,
  },
  schema::SCHEMA,
  Error, Result,
};

const TYPE_COLUMNS: &str = "type_id, name, kind, enabled, hydration_factor";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Liquidus intake store backed by a single SQLite file.
///
/// Clones share the inner connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation and seed
  /// the default types and settings. A new store starts in millilitres.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema(Units::default()).await?;
    tracing::info!(path = %path.display(), "opened intake store");
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open_in_memory_with_units(Units::default()).await
  }

  /// Open an in-memory store whose initial goal is expressed in `units`.
  pub async fn open_in_memory_with_units(units: Units) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema(units).await?;
    Ok(store)
  }

  async fn init_schema(&self, units: Units) -> Result<()> {
    let defaults: Vec<(String, String, &'static str)> = DrinkType::defaults()
      .into_iter()
      .map(|t| (encode_uuid(t.type_id), t.name, encode_kind(t.kind)))
      .collect();
    let units_str = encode_units(units);
    let goal = units.default_daily_goal();

    self
      .conn
      .call(move |conn| {
        conn.execute_batch(SCHEMA)?;

        let tx = conn.transaction()?;
        let type_count: i64 =
          tx.query_row("SELECT COUNT(*) FROM drink_types", [], |r| r.get(0))?;
        if type_count == 0 {
          for (position, (id, name, kind)) in defaults.iter().enumerate() {
            tx.execute(
              "INSERT INTO drink_types (type_id, name, kind, enabled, hydration_factor, position)
               VALUES (?1, ?2, ?3, 1, 1.0, ?4)",
              rusqlite::params![id, name, kind, position as i64],
            )?;
          }
        }
        tx.execute(
          "INSERT OR IGNORE INTO settings (id, daily_goal, units) VALUES (1, ?1, ?2)",
          rusqlite::params![goal, units_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_drink_type(&self, type_id: Uuid) -> Result<Option<DrinkType>> {
    let id_str = encode_uuid(type_id);

    let raw: Option<RawDrinkType> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {TYPE_COLUMNS} FROM drink_types WHERE type_id = ?1"),
            rusqlite::params![id_str],
            RawDrinkType::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDrinkType::into_drink_type).transpose()
  }

  async fn insert_record(&self, record: &DrinkRecord) -> Result<()> {
    let record_id_str = encode_uuid(record.record_id);
    let timestamp_str = encode_dt(record.timestamp);
    let type_id_str   = encode_uuid(record.type_id);
    let amount        = record.amount;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO drinks (record_id, timestamp, amount, type_id)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![record_id_str, timestamp_str, amount, type_id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── IntakeStore impl ────────────────────────────────────────────────────────

impl IntakeStore for SqliteStore {
  type Error = Error;

  // ── Drink types ───────────────────────────────────────────────────────────

  async fn list_drink_types(&self) -> Result<Vec<DrinkType>> {
    let raws: Vec<RawDrinkType> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TYPE_COLUMNS} FROM drink_types ORDER BY position"
        ))?;
        let rows = stmt
          .query_map([], RawDrinkType::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDrinkType::into_drink_type).collect()
  }

  async fn add_drink_type(&self, input: NewDrinkType) -> Result<DrinkType> {
    let existing = self.list_drink_types().await?;
    input.validate(&existing)?;

    let drink_type = DrinkType {
      type_id:          Uuid::new_v4(),
      name:             input.name.trim().to_owned(),
      kind:             DrinkTypeKind::Custom,
      enabled:          true,
      hydration_factor: input.hydration_factor,
    };

    let id_str   = encode_uuid(drink_type.type_id);
    let name     = drink_type.name.clone();
    let kind_str = encode_kind(drink_type.kind);
    let factor   = drink_type.hydration_factor;

    let inserted = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO drink_types (type_id, name, kind, enabled, hydration_factor, position)
           VALUES (?1, ?2, ?3, 1, ?4,
                   (SELECT COALESCE(MAX(position), -1) + 1 FROM drink_types))",
          rusqlite::params![id_str, name, kind_str, factor],
        );
        match result {
          Ok(_) => Ok(true),
          // `drink_types_name_idx`: the name was taken since validation.
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
          {
            Ok(false)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(liquidus_core::Error::DuplicateTypeName(drink_type.name).into());
    }

    tracing::info!(name = %drink_type.name, "added custom drink type");
    Ok(drink_type)
  }

  async fn set_type_enabled(&self, type_id: Uuid, enabled: bool) -> Result<DrinkType> {
    let id_str = encode_uuid(type_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE drink_types SET enabled = ?1 WHERE type_id = ?2",
          rusqlite::params![enabled, id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(liquidus_core::Error::UnknownDrinkType(type_id).into());
    }

    self
      .get_drink_type(type_id)
      .await?
      .ok_or(Error::Core(liquidus_core::Error::UnknownDrinkType(type_id)))
  }

  async fn delete_drink_type(&self, type_id: Uuid) -> Result<usize> {
    let drink_type = self
      .get_drink_type(type_id)
      .await?
      .ok_or(liquidus_core::Error::UnknownDrinkType(type_id))?;

    if drink_type.kind.is_default() {
      return Err(liquidus_core::Error::DefaultTypeImmutable(type_id).into());
    }

    let id_str = encode_uuid(type_id);
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute(
          "DELETE FROM drinks WHERE type_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM drink_types WHERE type_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(removed)
      })
      .await?;

    tracing::info!(name = %drink_type.name, removed, "deleted custom drink type");
    Ok(removed)
  }

  // ── Drink records ─────────────────────────────────────────────────────────

  async fn record_drink(&self, input: NewDrinkRecord) -> Result<DrinkRecord> {
    let types = self.list_drink_types().await?;
    input.validate(&types)?;

    let record = DrinkRecord {
      record_id: Uuid::new_v4(),
      timestamp: input.timestamp.unwrap_or_else(Utc::now),
      amount:    input.amount,
      type_id:   input.type_id,
    };

    self.insert_record(&record).await?;
    tracing::debug!(record_id = %record.record_id, amount = record.amount, "recorded drink");
    Ok(record)
  }

  async fn delete_drink(&self, record_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(record_id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM drinks WHERE record_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }

  async fn list_drinks(&self, query: DrinkQuery) -> Result<Vec<DrinkRecord>> {
    let from_str  = query.from.map(encode_dt);
    let until_str = query.until.map(encode_dt);

    let raws: Vec<RawDrinkRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT record_id, timestamp, amount, type_id
           FROM drinks
           WHERE (?1 IS NULL OR timestamp >= ?1)
             AND (?2 IS NULL OR timestamp <  ?2)
           ORDER BY timestamp",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![from_str, until_str],
            RawDrinkRecord::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDrinkRecord::into_record).collect()
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn settings(&self) -> Result<Settings> {
    let raw: Option<RawSettings> = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT daily_goal, units, last_health_sync FROM settings WHERE id = 1",
            [],
            RawSettings::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.ok_or(Error::MissingSettings)?.into_settings()
  }

  async fn set_daily_goal(&self, goal: GoalConfig) -> Result<Settings> {
    let daily_goal = goal.daily_goal();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE settings SET daily_goal = ?1 WHERE id = 1",
          rusqlite::params![daily_goal],
        )?;
        Ok(())
      })
      .await?;

    tracing::info!(daily_goal, "updated daily goal");
    self.settings().await
  }

  async fn set_units(&self, units: Units) -> Result<Settings> {
    loop {
      let current = self.settings().await?;
      if current.units == units {
        return Ok(current);
      }

      let factor        = current.units.convert(1.0, units);
      let old_goal      = current.goal.daily_goal();
      let new_goal      = current.goal.convert(current.units, units)?.daily_goal();
      let old_units_str = encode_units(current.units);
      let new_units_str = encode_units(units);

      // The settings update only matches the row as it was read above, so a
      // concurrent change makes it a no-op and the drinks stay untouched.
      let applied = self
        .conn
        .call(move |conn| {
          let tx = conn.transaction()?;
          let matched = tx.execute(
            "UPDATE settings SET daily_goal = ?1, units = ?2
             WHERE id = 1 AND units = ?3 AND daily_goal = ?4",
            rusqlite::params![new_goal, new_units_str, old_units_str, old_goal],
          )?;
          if matched == 0 {
            return Ok(false);
          }
          tx.execute(
            "UPDATE drinks SET amount = amount * ?1",
            rusqlite::params![factor],
          )?;
          tx.commit()?;
          Ok(true)
        })
        .await?;

      if applied {
        tracing::info!(from = %current.units, to = %units, "converted stored amounts");
        return self.settings().await;
      }
      tracing::debug!("settings changed during unit switch; retrying");
    }
  }

  async fn set_last_health_sync(&self, at: DateTime<Utc>) -> Result<Settings> {
    let at_str = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE settings SET last_health_sync = ?1 WHERE id = 1",
          rusqlite::params![at_str],
        )?;
        Ok(())
      })
      .await?;

    self.settings().await
  }
}
