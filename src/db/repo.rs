use super::model::{items_from_json, items_to_json, EventRow};
use crate::error::{Error, Result};
use crate::ledger;
use crate::model::{
    ContractType, Delivery, DeliveryReportRow, Item, LaundryReportRow, LaundryStatus, LedgerEntry,
    Stats, UniformReturnRecord, UniformReturnReportRow, Worker,
};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::instrument;

pub type Pool = SqlitePool;

pub async fn init_pool(database_url: &str) -> Result<Pool> {
    let normalized = prepare_sqlite_url(database_url);
    let pool = SqlitePool::connect(&normalized).await?;
    // Enable WAL and stricter durability.
    sqlx::query("PRAGMA journal_mode=WAL;").execute(&pool).await?;
    sqlx::query("PRAGMA synchronous=FULL;").execute(&pool).await?;
    Ok(pool)
}

/// For file-backed SQLite URLs, make sure the parent directory exists.
/// In-memory URLs and non-sqlite schemes pass through untouched.
fn prepare_sqlite_url(url: &str) -> String {
    let Some(rest) = url.strip_prefix("sqlite:") else {
        return url.to_string();
    };
    if rest.starts_with(":memory") {
        return url.to_string();
    }
    let path = rest.trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
    url.to_string()
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| Error::Other(e.into()))?;
    Ok(())
}

fn worker_from_row(row: &SqliteRow) -> Result<Worker> {
    let contract_raw: String = row.get("contract_type");
    let contract_type = ContractType::parse(&contract_raw)
        .ok_or_else(|| anyhow!("unknown contract type in workers table: {contract_raw}"))?;
    Ok(Worker {
        dni: row.get("dni"),
        name: row.get("name"),
        surname: row.get("surname"),
        contract_type,
        created_at: row.get("created_at"),
    })
}

// --- workers ---

#[instrument(skip_all, fields(dni))]
pub async fn create_worker(
    pool: &Pool,
    dni: &str,
    name: &str,
    surname: &str,
    contract_type: ContractType,
) -> Result<Worker> {
    let existing = sqlx::query_scalar::<_, String>("SELECT dni FROM workers WHERE dni = ?")
        .bind(dni)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(Error::conflict(format!("DNI ya registrado: {dni}")));
    }
    let row = sqlx::query(
        "INSERT INTO workers (dni, name, surname, contract_type) VALUES (?, ?, ?, ?) \
         RETURNING dni, name, surname, contract_type, created_at",
    )
    .bind(dni)
    .bind(name)
    .bind(surname)
    .bind(contract_type.as_str())
    .fetch_one(pool)
    .await?;
    worker_from_row(&row)
}

#[instrument(skip_all, fields(dni))]
pub async fn get_worker(pool: &Pool, dni: &str) -> Result<Worker> {
    let row = sqlx::query(
        "SELECT dni, name, surname, contract_type, created_at FROM workers WHERE dni = ?",
    )
    .bind(dni)
    .fetch_optional(pool)
    .await?;
    match row {
        Some(row) => worker_from_row(&row),
        None => Err(Error::not_found(format!("usuario no encontrado: {dni}"))),
    }
}

// --- deliveries ---

#[instrument(skip_all, fields(dni))]
pub async fn insert_delivery(
    pool: &Pool,
    dni: &str,
    items: &[Item],
    delivered_at: DateTime<Utc>,
) -> Result<i64> {
    let id: i64 = sqlx::query(
        "INSERT INTO deliveries (dni, items_json, delivered_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(dni)
    .bind(items_to_json(items)?)
    .bind(delivered_at)
    .fetch_one(pool)
    .await?
    .get("id");
    Ok(id)
}

pub async fn set_delivery_acta(pool: &Pool, id: i64, acta_path: &str) -> Result<()> {
    sqlx::query("UPDATE deliveries SET acta_path = ? WHERE id = ?")
        .bind(acta_path)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[instrument(skip_all, fields(id))]
pub async fn get_delivery(pool: &Pool, id: i64) -> Result<Delivery> {
    let row = sqlx::query(
        "SELECT id, dni, items_json, delivered_at, acta_path FROM deliveries WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    let Some(row) = row else {
        return Err(Error::not_found(format!("entrega no encontrada: {id}")));
    };
    let items_json: String = row.get("items_json");
    Ok(Delivery {
        id: row.get("id"),
        dni: row.get("dni"),
        items: items_from_json(&items_json)?,
        delivered_at: row.get("delivered_at"),
        acta_path: row.try_get("acta_path").ok(),
    })
}

// --- laundry ledger ---

async fn send_events_tx(conn: &mut SqliteConnection, key: &str) -> Result<Vec<Vec<Item>>> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT items_json FROM laundry_sends WHERE shipment_key = ? ORDER BY id")
            .bind(key)
            .fetch_all(conn)
            .await?;
    rows.iter().map(|json| items_from_json(json)).collect()
}

async fn return_events_tx(conn: &mut SqliteConnection, key: &str) -> Result<Vec<Vec<Item>>> {
    let rows: Vec<String> = sqlx::query_scalar(
        "SELECT items_json FROM laundry_returns WHERE shipment_key = ? ORDER BY id",
    )
    .bind(key)
    .fetch_all(conn)
    .await?;
    rows.iter().map(|json| items_from_json(json)).collect()
}

/// Append one send event under `key`. Events are never merged at write time;
/// accumulation happens in the aggregator at query time.
#[instrument(skip_all, fields(key))]
pub async fn register_shipment(pool: &Pool, key: &str, items: Vec<Item>) -> Result<i64> {
    if key.trim().is_empty() {
        return Err(Error::validation("la clave de envío no puede estar vacía"));
    }
    let items = ledger::sanitize_items(items);
    if items.is_empty() {
        return Err(Error::validation("el envío no contiene prendas válidas"));
    }
    let id: i64 = sqlx::query(
        "INSERT INTO laundry_sends (shipment_key, items_json) VALUES (?, ?) RETURNING id",
    )
    .bind(key.trim())
    .bind(items_to_json(&items)?)
    .fetch_one(pool)
    .await?
    .get("id");
    Ok(id)
}

/// Compute the current ledger for `key` from the full event history.
#[instrument(skip_all, fields(key))]
pub async fn laundry_status(pool: &Pool, key: &str) -> Result<Vec<LedgerEntry>> {
    let mut conn = pool.acquire().await?;
    let sends = send_events_tx(&mut conn, key).await?;
    if sends.is_empty() {
        return Err(Error::not_found(format!("guía no encontrada: {key}")));
    }
    let returns = return_events_tx(&mut conn, key).await?;
    Ok(ledger::aggregate(&sends, &returns))
}

/// Record a return for `key`, clamping each requested quantity to the
/// garment's current pending amount.
///
/// The pending computation and the event append run in one transaction. The
/// event row is inserted empty before any read so the transaction holds
/// SQLite's write lock from its first statement: a racing return waits on
/// the lock and then re-clamps against the winner's committed event instead
/// of failing a late lock upgrade. Returns the accepted items.
#[instrument(skip_all, fields(key))]
pub async fn register_return(pool: &Pool, key: &str, requested: Vec<Item>) -> Result<Vec<Item>> {
    let requested = ledger::sanitize_items(requested);
    if requested.is_empty() {
        return Err(Error::validation("la devolución no contiene prendas válidas"));
    }

    let mut tx = pool.begin().await?;
    let event_id: i64 = sqlx::query(
        "INSERT INTO laundry_returns (shipment_key, items_json) VALUES (?, '[]') RETURNING id",
    )
    .bind(key)
    .fetch_one(&mut *tx)
    .await?
    .get("id");

    let sends = send_events_tx(&mut tx, key).await?;
    if sends.is_empty() {
        // Dropping the transaction rolls the placeholder row back.
        return Err(Error::not_found(format!("guía no encontrada: {key}")));
    }
    let returns = return_events_tx(&mut tx, key).await?;
    let entries = ledger::aggregate(&sends, &returns);

    let accepted = ledger::clamp_returns(&entries, requested);
    if accepted.is_empty() {
        return Err(Error::validation(
            "ninguna prenda tiene cantidad pendiente de devolución",
        ));
    }

    sqlx::query("UPDATE laundry_returns SET items_json = ? WHERE id = ?")
        .bind(items_to_json(&accepted)?)
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(accepted)
}

// --- reports ---

#[instrument(skip_all)]
pub async fn laundry_report(
    pool: &Pool,
    key: Option<&str>,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<Vec<LaundryReportRow>> {
    let rows = sqlx::query(
        "SELECT shipment_key, items_json, created_at FROM laundry_sends \
         WHERE (?1 IS NULL OR shipment_key = ?1) \
           AND (?2 IS NULL OR CAST(strftime('%m', created_at) AS INTEGER) = ?2) \
           AND (?3 IS NULL OR CAST(strftime('%Y', created_at) AS INTEGER) = ?3) \
         ORDER BY datetime(created_at) DESC, id DESC",
    )
    .bind(key)
    .bind(month)
    .bind(year)
    .fetch_all(pool)
    .await?;

    let mut report = Vec::with_capacity(rows.len());
    for row in rows {
        let event = EventRow {
            shipment_key: row.get("shipment_key"),
            items_json: row.get("items_json"),
            created_at: row.get("created_at"),
        };
        let status = shipment_status(pool, &event.shipment_key).await?;
        report.push(LaundryReportRow {
            items: event.items()?,
            shipment_key: event.shipment_key,
            sent_at: event.created_at,
            status,
        });
    }
    Ok(report)
}

async fn shipment_status(pool: &Pool, key: &str) -> Result<LaundryStatus> {
    let entries = laundry_status(pool, key).await?;
    Ok(ledger::status(&entries))
}

#[instrument(skip_all)]
pub async fn delivery_report(
    pool: &Pool,
    dni: Option<&str>,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<Vec<DeliveryReportRow>> {
    let rows = sqlx::query(
        "SELECT d.id, d.dni, w.name || ' ' || w.surname AS worker_name, d.items_json, d.delivered_at \
         FROM deliveries d JOIN workers w ON w.dni = d.dni \
         WHERE (?1 IS NULL OR d.dni = ?1) \
           AND (?2 IS NULL OR CAST(strftime('%m', d.delivered_at) AS INTEGER) = ?2) \
           AND (?3 IS NULL OR CAST(strftime('%Y', d.delivered_at) AS INTEGER) = ?3) \
         ORDER BY datetime(d.delivered_at) DESC, d.id DESC",
    )
    .bind(dni)
    .bind(month)
    .bind(year)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let items_json: String = row.get("items_json");
            Ok(DeliveryReportRow {
                id: row.get("id"),
                dni: row.get("dni"),
                worker_name: row.get("worker_name"),
                items: items_from_json(&items_json)?,
                delivered_at: row.get("delivered_at"),
            })
        })
        .collect()
}

#[instrument(skip_all)]
pub async fn uniform_return_report(
    pool: &Pool,
    dni: Option<&str>,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<Vec<UniformReturnReportRow>> {
    let rows = sqlx::query(
        "SELECT u.id, u.dni, w.name || ' ' || w.surname AS worker_name, u.items_json, \
                u.observations, u.created_at \
         FROM uniform_returns u JOIN workers w ON w.dni = u.dni \
         WHERE (?1 IS NULL OR u.dni = ?1) \
           AND (?2 IS NULL OR CAST(strftime('%m', u.created_at) AS INTEGER) = ?2) \
           AND (?3 IS NULL OR CAST(strftime('%Y', u.created_at) AS INTEGER) = ?3) \
         ORDER BY datetime(u.created_at) DESC, u.id DESC",
    )
    .bind(dni)
    .bind(month)
    .bind(year)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let items_json: String = row.get("items_json");
            Ok(UniformReturnReportRow {
                id: row.get("id"),
                dni: row.get("dni"),
                worker_name: row.get("worker_name"),
                items: items_from_json(&items_json)?,
                observations: row.get("observations"),
                created_at: row.get("created_at"),
            })
        })
        .collect()
}

// --- uniform returns ---

/// Record a worker permanently handing back uniform items (termination,
/// replacement). Quantities are intentionally not reconciled against
/// delivery totals.
#[instrument(skip_all, fields(dni))]
pub async fn insert_uniform_return(
    pool: &Pool,
    dni: &str,
    items: Vec<Item>,
    observations: &str,
) -> Result<UniformReturnRecord> {
    // Worker must exist; reuse the lookup's NotFound.
    let _ = get_worker(pool, dni).await?;
    let items = ledger::sanitize_items(items);
    if items.is_empty() {
        return Err(Error::validation("la devolución no contiene prendas válidas"));
    }
    let row = sqlx::query(
        "INSERT INTO uniform_returns (dni, items_json, observations) VALUES (?, ?, ?) \
         RETURNING id, created_at",
    )
    .bind(dni)
    .bind(items_to_json(&items)?)
    .bind(observations)
    .fetch_one(pool)
    .await?;
    Ok(UniformReturnRecord {
        id: row.get("id"),
        dni: dni.to_string(),
        items,
        observations: observations.to_string(),
        created_at: row.get("created_at"),
    })
}

// --- stats ---

#[instrument(skip_all)]
pub async fn stats(pool: &Pool, month: Option<u32>, year: Option<i32>) -> Result<Stats> {
    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workers")
        .fetch_one(pool)
        .await?;
    let deliveries_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM deliveries \
         WHERE (?1 IS NULL OR CAST(strftime('%m', delivered_at) AS INTEGER) = ?1) \
           AND (?2 IS NULL OR CAST(strftime('%Y', delivered_at) AS INTEGER) = ?2)",
    )
    .bind(month)
    .bind(year)
    .fetch_one(pool)
    .await?;

    let keys: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT shipment_key FROM laundry_sends ORDER BY shipment_key")
            .fetch_all(pool)
            .await?;
    let laundry_total_count = keys.len() as i64;
    let mut laundry_active_count = 0;
    for key in &keys {
        if shipment_status(pool, key).await? != LaundryStatus::Complete {
            laundry_active_count += 1;
        }
    }

    Ok(Stats {
        users_count,
        deliveries_count,
        laundry_total_count,
        laundry_active_count,
    })
}

// --- sessions ---

#[instrument(skip_all, fields(username))]
pub async fn insert_session(pool: &Pool, token: &str, username: &str) -> Result<()> {
    sqlx::query("INSERT INTO sessions (token, username) VALUES (?, ?)")
        .bind(token)
        .bind(username)
        .execute(pool)
        .await?;
    Ok(())
}
