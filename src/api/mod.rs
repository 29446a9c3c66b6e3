pub mod comment;
pub mod ticket;

use serde::{Deserialize, Serialize};

pub use self::{comment::Comment, ticket::Ticket};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Message {
    pub message: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Error {
    pub error: String,
}
