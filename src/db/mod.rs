pub mod comment;
pub mod ticket;

use std::sync::Arc;

use rusqlite::Connection;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::config;

pub use rusqlite::Error;

pub use self::{comment::Comment, ticket::Ticket};

const SCHEMA: &str = "\
    CREATE TABLE IF NOT EXISTS tickets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        priority TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'open',
        created_at INTEGER NOT NULL,
        sla_deadline INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ticket_id INTEGER NOT NULL REFERENCES tickets(id) ON DELETE CASCADE,
        comment TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );";

pub fn connect(config: &config::Db) -> Result<Client, Error> {
    Client::init(Connection::open(&config.path)?)
}

/// Handle to the single-file store, shared by all request handlers.
///
/// The store serializes writers itself; the mutex keeps the statements of one
/// logical operation from interleaving with another's.
#[derive(Clone)]
pub struct Client(Arc<Mutex<Connection>>);

impl Client {
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, Error> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self(Arc::new(Mutex::new(conn))))
    }
}

// Timestamps are stored as unix nanoseconds so ordering by column value is
// exact. Rendering to RFC 3339 happens at the API boundary.

fn to_nanos(at: OffsetDateTime) -> i64 {
    i64::try_from(at.unix_timestamp_nanos()).unwrap()
}

fn from_nanos(nanos: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos)).unwrap()
}
