use derive_more::Display;
use rusqlite::{
    params,
    types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
    OptionalExtension as _, Row,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::{Client, Error};

#[derive(Clone, Debug)]
pub struct Ticket {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub sla_deadline: OffsetDateTime,
}

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd,
    Serialize,
)]
pub struct Id(i64);

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromSql for Id {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Self)
    }
}

impl ToSql for Id {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

/// Resolution window granted by a priority tier.
///
/// Anything that is not exactly "high" or "medium" gets the 72 hour window,
/// misspelled priorities included.
pub fn sla_window(priority: &str) -> Duration {
    match priority {
        "high" => Duration::hours(4),
        "medium" => Duration::hours(24),
        _ => Duration::hours(72),
    }
}

fn from_row(row: &Row) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: row.get("priority")?,
        status: row.get("status")?,
        created_at: super::from_nanos(row.get("created_at")?),
        sla_deadline: super::from_nanos(row.get("sla_deadline")?),
    })
}

impl Client {
    pub async fn get_tickets(&self) -> Result<Vec<Ticket>, Error> {
        const SQL: &str = "\
            SELECT id, title, description, priority, status, \
                   created_at, sla_deadline \
            FROM tickets \
            ORDER BY created_at DESC, \
                     id DESC";

        let conn = self.0.lock().await;
        let mut stmt = conn.prepare(SQL)?;
        let tickets = stmt.query_map([], from_row)?;
        tickets.collect()
    }

    pub async fn add_ticket(
        &self,
        title: String,
        description: String,
        priority: String,
    ) -> Result<Ticket, Error> {
        const SQL: &str = "\
            INSERT INTO tickets (title, description, priority, \
                                 created_at, sla_deadline) \
            VALUES (?1, ?2, ?3, ?4, ?5)";

        let created_at = OffsetDateTime::now_utc();
        let sla_deadline = created_at + sla_window(&priority);

        let conn = self.0.lock().await;
        conn.execute(
            SQL,
            params![
                title,
                description,
                priority,
                super::to_nanos(created_at),
                super::to_nanos(sla_deadline),
            ],
        )?;

        Ok(Ticket {
            id: Id(conn.last_insert_rowid()),
            title,
            description,
            priority,
            status: "open".to_owned(),
            created_at,
            sla_deadline,
        })
    }

    pub async fn get_ticket_by_id(
        &self,
        id: Id,
    ) -> Result<Option<Ticket>, Error> {
        const SQL: &str = "\
            SELECT id, title, description, priority, status, \
                   created_at, sla_deadline \
            FROM tickets \
            WHERE id = ?1";

        let conn = self.0.lock().await;
        conn.query_row(SQL, params![id], from_row).optional()
    }

    /// Returns `false` when no ticket carries the given id.
    pub async fn update_ticket_status(
        &self,
        id: Id,
        status: &str,
    ) -> Result<bool, Error> {
        const SQL: &str = "UPDATE tickets SET status = ?1 WHERE id = ?2";

        let conn = self.0.lock().await;
        let updated = conn.execute(SQL, params![status, id])?;
        Ok(updated > 0)
    }

    /// Returns `false` when no ticket carries the given id. Comments under
    /// the ticket go with it through the cascade rule.
    pub async fn delete_ticket(&self, id: Id) -> Result<bool, Error> {
        const SQL: &str = "DELETE FROM tickets WHERE id = ?1";

        let conn = self.0.lock().await;
        let deleted = conn.execute(SQL, params![id])?;
        Ok(deleted > 0)
    }
}
