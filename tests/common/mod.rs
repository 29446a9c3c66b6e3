use helpdesk_backend::{api, config, db, server};
use reqwest::StatusCode;
use serde_json::json;

pub struct Client {
    inner: reqwest::Client,
    base_url: String,

    /// Handle to the same in-memory store the spawned server uses, for
    /// asserting on rows the API does not expose directly.
    pub db_client: db::Client,
}

impl Client {
    /// Spawns the app on an ephemeral port with a fresh in-memory store.
    pub async fn new() -> Self {
        let db_client =
            db::Client::open_in_memory().expect("failed to open the store");
        let cors = config::Cors {
            allowed_origins: Vec::new(),
        };
        let app = server::app(db_client.clone(), &cors)
            .expect("failed to build the app");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let addr = listener.local_addr().expect("failed to get local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server failed");
        });

        Self {
            inner: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
            db_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_tickets(&self) -> Result<Vec<api::Ticket>, StatusCode> {
        Ok(self
            .inner
            .get(format!("{}/api/tickets", self.base_url))
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?
            .json::<Vec<api::Ticket>>()
            .await
            .expect("failed to get a response"))
    }

    pub async fn add_ticket(
        &self,
        title: &str,
        description: &str,
        priority: &str,
    ) -> Result<api::Ticket, StatusCode> {
        self.add_ticket_raw(json!({
            "title": title,
            "description": description,
            "priority": priority,
        }))
        .await
    }

    pub async fn add_ticket_raw(
        &self,
        body: serde_json::Value,
    ) -> Result<api::Ticket, StatusCode> {
        Ok(self
            .inner
            .post(format!("{}/api/tickets", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?
            .json::<api::Ticket>()
            .await
            .expect("failed to get a response"))
    }

    pub async fn get_ticket(
        &self,
        id: api::ticket::Id,
    ) -> Result<api::ticket::WithComments, StatusCode> {
        Ok(self
            .inner
            .get(format!("{}/api/tickets/{id}", self.base_url))
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?
            .json::<api::ticket::WithComments>()
            .await
            .expect("failed to get a response"))
    }

    pub async fn update_status(
        &self,
        id: api::ticket::Id,
        status: &str,
    ) -> Result<api::Message, StatusCode> {
        self.update_status_raw(id, json!({ "status": status })).await
    }

    pub async fn update_status_raw(
        &self,
        id: api::ticket::Id,
        body: serde_json::Value,
    ) -> Result<api::Message, StatusCode> {
        Ok(self
            .inner
            .put(format!("{}/api/tickets/{id}", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?
            .json::<api::Message>()
            .await
            .expect("failed to get a response"))
    }

    pub async fn delete_ticket(
        &self,
        id: api::ticket::Id,
    ) -> Result<api::Message, StatusCode> {
        Ok(self
            .inner
            .delete(format!("{}/api/tickets/{id}", self.base_url))
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?
            .json::<api::Message>()
            .await
            .expect("failed to get a response"))
    }

    pub async fn add_comment(
        &self,
        id: api::ticket::Id,
        comment: &str,
    ) -> Result<api::comment::Created, StatusCode> {
        self.add_comment_raw(id, json!({ "comment": comment })).await
    }

    pub async fn add_comment_raw(
        &self,
        id: api::ticket::Id,
        body: serde_json::Value,
    ) -> Result<api::comment::Created, StatusCode> {
        Ok(self
            .inner
            .post(format!("{}/api/tickets/{id}/comments", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?
            .json::<api::comment::Created>()
            .await
            .expect("failed to get a response"))
    }
}
