use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{
        header::{InvalidHeaderValue, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use derive_more::From;
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::{api, config, db};

pub fn app(
    db_client: db::Client,
    cors: &config::Cors,
) -> Result<Router, InvalidHeaderValue> {
    let mut cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);
    for origin in &cors.allowed_origins {
        cors_layer = cors_layer.allow_origin(origin.parse::<HeaderValue>()?);
    }

    Ok(Router::new()
        .route("/api/tickets", get(list_tickets).post(add_ticket))
        .route(
            "/api/tickets/:id",
            get(get_ticket).put(update_status).delete(delete_ticket),
        )
        .route("/api/tickets/:id/comments", post(add_comment))
        .layer(cors_layer)
        .with_state(Arc::new(AppState { db_client })))
}

type SharedAppState = Arc<AppState>;

struct AppState {
    db_client: db::Client,
}

fn api_ticket(ticket: db::Ticket) -> api::Ticket {
    api::Ticket {
        id: ticket.id,
        title: ticket.title,
        description: ticket.description,
        priority: ticket.priority,
        status: ticket.status,
        created_at: ticket.created_at,
        sla_deadline: ticket.sla_deadline,
    }
}

fn api_comment(comment: db::Comment) -> api::Comment {
    api::Comment {
        id: comment.id,
        ticket_id: comment.ticket_id,
        comment: comment.comment,
        created_at: comment.created_at,
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(api::Error {
            error: message.into(),
        }),
    )
        .into_response()
}

fn store_error(e: &db::Error) -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

async fn list_tickets(
    State(state): State<SharedAppState>,
) -> Result<Json<Vec<api::Ticket>>, ListTicketsError> {
    let tickets = state.db_client.get_tickets().await?;

    Ok(Json(tickets.into_iter().map(api_ticket).collect()))
}

#[derive(Debug, From)]
pub enum ListTicketsError {
    #[from]
    DbError(db::Error),
}

impl IntoResponse for ListTicketsError {
    fn into_response(self) -> Response {
        match self {
            Self::DbError(e) => store_error(&e),
        }
    }
}

#[derive(Deserialize)]
struct AddTicketInput {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
}

async fn add_ticket(
    State(state): State<SharedAppState>,
    Json(input): Json<AddTicketInput>,
) -> Result<(StatusCode, Json<api::Ticket>), AddTicketError> {
    use AddTicketError as E;

    let (Some(title), Some(description), Some(priority)) =
        (input.title, input.description, input.priority)
    else {
        return Err(E::MissingField);
    };
    if title.is_empty() || description.is_empty() || priority.is_empty() {
        return Err(E::MissingField);
    }

    let ticket = state
        .db_client
        .add_ticket(title, description, priority)
        .await?;

    Ok((StatusCode::CREATED, Json(api_ticket(ticket))))
}

#[derive(Debug, From)]
pub enum AddTicketError {
    #[from]
    DbError(db::Error),
    MissingField,
}

impl IntoResponse for AddTicketError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingField => error_response(
                StatusCode::BAD_REQUEST,
                "All fields are required",
            ),
            Self::DbError(e) => store_error(&e),
        }
    }
}

async fn get_ticket(
    State(state): State<SharedAppState>,
    Path(id): Path<api::ticket::Id>,
) -> Result<Json<api::ticket::WithComments>, GetTicketError> {
    use GetTicketError as E;

    let ticket = state
        .db_client
        .get_ticket_by_id(id)
        .await?
        .ok_or(E::TicketNotFound)?;
    let comments = state.db_client.get_comments_by_ticket(id).await?;

    Ok(Json(api::ticket::WithComments {
        ticket: api_ticket(ticket),
        comments: comments.into_iter().map(api_comment).collect(),
    }))
}

#[derive(Debug, From)]
pub enum GetTicketError {
    #[from]
    DbError(db::Error),
    TicketNotFound,
}

impl IntoResponse for GetTicketError {
    fn into_response(self) -> Response {
        match self {
            Self::TicketNotFound => {
                error_response(StatusCode::NOT_FOUND, "Ticket not found")
            }
            Self::DbError(e) => store_error(&e),
        }
    }
}

#[derive(Deserialize)]
struct UpdateStatusInput {
    status: Option<String>,
}

async fn update_status(
    State(state): State<SharedAppState>,
    Path(id): Path<api::ticket::Id>,
    Json(input): Json<UpdateStatusInput>,
) -> Result<Json<api::Message>, UpdateStatusError> {
    use UpdateStatusError as E;

    let status = input
        .status
        .filter(|status| !status.is_empty())
        .ok_or(E::MissingStatus)?;

    if !state.db_client.update_ticket_status(id, &status).await? {
        return Err(E::TicketNotFound);
    }

    Ok(Json(api::Message {
        message: "Ticket updated successfully".to_owned(),
    }))
}

#[derive(Debug, From)]
pub enum UpdateStatusError {
    #[from]
    DbError(db::Error),
    MissingStatus,
    TicketNotFound,
}

impl IntoResponse for UpdateStatusError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingStatus => {
                error_response(StatusCode::BAD_REQUEST, "Status is required")
            }
            Self::TicketNotFound => {
                error_response(StatusCode::NOT_FOUND, "Ticket not found")
            }
            Self::DbError(e) => store_error(&e),
        }
    }
}

async fn delete_ticket(
    State(state): State<SharedAppState>,
    Path(id): Path<api::ticket::Id>,
) -> Result<Json<api::Message>, DeleteTicketError> {
    use DeleteTicketError as E;

    if !state.db_client.delete_ticket(id).await? {
        return Err(E::TicketNotFound);
    }

    Ok(Json(api::Message {
        message: "Ticket deleted successfully".to_owned(),
    }))
}

#[derive(Debug, From)]
pub enum DeleteTicketError {
    #[from]
    DbError(db::Error),
    TicketNotFound,
}

impl IntoResponse for DeleteTicketError {
    fn into_response(self) -> Response {
        match self {
            Self::TicketNotFound => {
                error_response(StatusCode::NOT_FOUND, "Ticket not found")
            }
            Self::DbError(e) => store_error(&e),
        }
    }
}

#[derive(Deserialize)]
struct AddCommentInput {
    comment: Option<String>,
}

async fn add_comment(
    State(state): State<SharedAppState>,
    Path(id): Path<api::ticket::Id>,
    Json(input): Json<AddCommentInput>,
) -> Result<(StatusCode, Json<api::comment::Created>), AddCommentError> {
    use AddCommentError as E;

    let comment = input
        .comment
        .filter(|comment| !comment.is_empty())
        .ok_or(E::MissingComment)?;

    let comment_id = state
        .db_client
        .add_comment(id, &comment)
        .await?
        .ok_or(E::TicketNotFound)?;

    Ok((
        StatusCode::CREATED,
        Json(api::comment::Created {
            id: comment_id,
            message: "Comment added successfully".to_owned(),
        }),
    ))
}

#[derive(Debug, From)]
pub enum AddCommentError {
    #[from]
    DbError(db::Error),
    MissingComment,
    TicketNotFound,
}

impl IntoResponse for AddCommentError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingComment => error_response(
                StatusCode::BAD_REQUEST,
                "Comment text is required",
            ),
            Self::TicketNotFound => {
                error_response(StatusCode::NOT_FOUND, "Ticket not found")
            }
            Self::DbError(e) => store_error(&e),
        }
    }
}
