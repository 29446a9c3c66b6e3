use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::ticket;

pub use crate::db::comment::Id;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Comment {
    pub id: Id,
    pub ticket_id: ticket::Id,
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Created {
    pub id: Id,
    pub message: String,
}
