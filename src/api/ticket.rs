use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::api;

pub use crate::db::ticket::Id;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Ticket {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub sla_deadline: OffsetDateTime,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WithComments {
    pub ticket: Ticket,
    pub comments: Vec<api::Comment>,
}
