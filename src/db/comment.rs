use derive_more::Display;
use rusqlite::{
    ffi, params,
    types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
    Row,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{ticket, Client, Error};

#[derive(Clone, Debug)]
pub struct Comment {
    pub id: Id,
    pub ticket_id: ticket::Id,
    pub comment: String,
    pub created_at: OffsetDateTime,
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

fn from_row(row: &Row) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        ticket_id: row.get("ticket_id")?,
        comment: row.get("comment")?,
        created_at: super::from_nanos(row.get("created_at")?),
    })
}

impl Client {
    /// Appends a comment under the given ticket.
    ///
    /// Returns `None` when the referenced ticket does not exist, detected
    /// through the store's foreign-key extended result code.
    pub async fn add_comment(
        &self,
        ticket_id: ticket::Id,
        comment: &str,
    ) -> Result<Option<Id>, Error> {
        const SQL: &str = "\
            INSERT INTO comments (ticket_id, comment, created_at) \
            VALUES (?1, ?2, ?3)";

        let created_at = OffsetDateTime::now_utc();

        let conn = self.0.lock().await;
        let inserted = conn.execute(
            SQL,
            params![ticket_id, comment, super::to_nanos(created_at)],
        );
        match inserted {
            Ok(_) => Ok(Some(Id(conn.last_insert_rowid()))),
            Err(Error::SqliteFailure(e, _))
                if e.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get_comments_by_ticket(
        &self,
        ticket_id: ticket::Id,
    ) -> Result<Vec<Comment>, Error> {
        const SQL: &str = "\
            SELECT id, ticket_id, comment, created_at \
            FROM comments \
            WHERE ticket_id = ?1 \
            ORDER BY created_at ASC, \
                     id ASC";

        let conn = self.0.lock().await;
        let mut stmt = conn.prepare(SQL)?;
        let comments = stmt.query_map(params![ticket_id], from_row)?;
        comments.collect()
    }
}
