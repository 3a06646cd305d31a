//! REST contract per resource
//!
//! `ApiClient` implements the four calls every resource supports:
//!
//! - `GET {endpoint}` → list (unwrapped through the resource's envelope)
//! - `POST {endpoint}` → create
//! - `PUT {endpoint}/{id}` → update (full replace)
//! - `DELETE {endpoint}/{id}` → delete
//!
//! Success is decided by status code alone. Error bodies may carry a
//! `message`, which ends up in `AdminError::Api`.

use crate::payload::Payload;
use crate::request::{ApiRequest, ApiResponse};
use crate::transport::Transport;
use estate_core::{AdminError, AdminResult, Item, ItemId};
use estate_schema::ResourceDef;

/// Typed access to the backend's resource collections
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    /// Create a client over a transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and fail on non-2xx statuses
    async fn execute(&self, request: ApiRequest) -> AdminResult<ApiResponse> {
        let method = request.method;
        let path = request.path.clone();
        tracing::debug!(%method, %path, "sending request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%method, %path, error = %e, "request failed");
                return Err(e);
            }
        };

        if response.is_success() {
            tracing::debug!(%method, %path, status = response.status, "request succeeded");
            Ok(response)
        } else {
            let message = response.error_message();
            tracing::warn!(
                %method,
                %path,
                status = response.status,
                message = message.as_deref().unwrap_or(""),
                "server rejected request"
            );
            Err(AdminError::Api {
                status: response.status,
                message,
            })
        }
    }

    /// `GET {endpoint}`: every item of the collection
    pub async fn list(&self, def: &ResourceDef, parent: Option<&ItemId>) -> AdminResult<Vec<Item>> {
        let request =
            ApiRequest::get(def.collection_path(parent)?).with_query(def.list_query(parent));
        let response = self.execute(request).await?;
        let body = response.json(&def.name)?;
        def.envelope.normalize(&def.name, body)
    }

    /// `POST {endpoint}`
    pub async fn create(
        &self,
        def: &ResourceDef,
        parent: Option<&ItemId>,
        payload: Payload,
    ) -> AdminResult<()> {
        let request = ApiRequest::post(def.collection_path(parent)?).with_body(payload.into_body());
        self.execute(request).await?;
        Ok(())
    }

    /// `PUT {endpoint}/{id}`
    pub async fn update(
        &self,
        def: &ResourceDef,
        parent: Option<&ItemId>,
        id: &ItemId,
        payload: Payload,
    ) -> AdminResult<()> {
        let request = ApiRequest::put(def.item_path(parent, id)?).with_body(payload.into_body());
        self.execute(request).await?;
        Ok(())
    }

    /// `DELETE {endpoint}/{id}`
    pub async fn delete(
        &self,
        def: &ResourceDef,
        parent: Option<&ItemId>,
        id: &ItemId,
    ) -> AdminResult<()> {
        let request = ApiRequest::delete(def.item_path(parent, id)?);
        self.execute(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Method, RequestBody};
    use estate_schema::Catalog;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records what was sent
    #[derive(Default)]
    struct Scripted {
        responses: Mutex<VecDeque<AdminResult<ApiResponse>>>,
        sent: Mutex<Vec<ApiRequest>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(ApiResponse::new(status, body)));
            self
        }

        fn fail(self) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(AdminError::transport("connection refused")));
            self
        }

        fn sent(&self) -> Vec<ApiRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for Scripted {
        async fn send(&self, request: ApiRequest) -> AdminResult<ApiResponse> {
            self.sent.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ApiResponse::new(200, "[]")))
        }
    }

    #[tokio::test]
    async fn test_list_normalizes_envelopes() {
        let catalog = Catalog::site();
        let client = ApiClient::new(
            Scripted::default()
                .reply(200, r#"{"data": [{"id": 1, "title": "Integrity"}]}"#)
                .reply(200, r#"[{"id": 1, "name": "Acme"}]"#),
        );

        let values = client
            .list(catalog.get("company-values").unwrap(), None)
            .await
            .unwrap();
        let partners = client
            .list(catalog.get("partners").unwrap(), None)
            .await
            .unwrap();

        assert_eq!(values.len(), 1);
        assert_eq!(partners.len(), 1);
        assert_eq!(partners[0].get_str("name"), Some("Acme"));

        let sent = client.transport().sent();
        assert_eq!(sent[0].path, "/home/company-values");
        assert_eq!(sent[1].path, "/partners");
        assert!(sent.iter().all(|r| r.method == Method::Get));
    }

    #[tokio::test]
    async fn test_list_with_query_parent() {
        let catalog = Catalog::site();
        let client = ApiClient::new(Scripted::default());
        client
            .list(
                catalog.get("hpr-project-amenities").unwrap(),
                Some(&ItemId::new("12")),
            )
            .await
            .unwrap();

        let sent = client.transport().sent();
        assert_eq!(
            sent[0].query,
            vec![("projectId".to_string(), "12".to_string())]
        );
    }

    #[tokio::test]
    async fn test_server_message_is_surfaced() {
        let catalog = Catalog::site();
        let client = ApiClient::new(
            Scripted::default().reply(422, r#"{"message": "Name already taken"}"#),
        );
        let payload = Payload::Json(json!({"name": "Acme", "description": "Builder"}));
        let err = client
            .create(catalog.get("partners").unwrap(), None, payload)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert_eq!(err.user_message(), "Name already taken");
    }

    #[tokio::test]
    async fn test_update_and_delete_target_item_path() {
        let catalog = Catalog::site();
        let slides = catalog.get("hero-carousel").unwrap();
        let client = ApiClient::new(Scripted::default().reply(200, "{}").reply(204, ""));
        let id = ItemId::new("3");

        client
            .update(slides, None, &id, Payload::Json(json!({"heading": "x"})))
            .await
            .unwrap();
        client.delete(slides, None, &id).await.unwrap();

        let sent = client.transport().sent();
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].path, "/hero-carousel/3");
        assert_eq!(sent[0].body, RequestBody::Json(json!({"heading": "x"})));
        assert_eq!(sent[1].method, Method::Delete);
        assert_eq!(sent[1].path, "/hero-carousel/3");
        assert_eq!(sent[1].body, RequestBody::Empty);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let catalog = Catalog::site();
        let client = ApiClient::new(Scripted::default().fail());
        let err = client
            .list(catalog.get("news").unwrap(), None)
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
