//! In-memory REST backend and recording collaborators

#![allow(dead_code)]

use estate_client::{
    ApiClient, ApiRequest, ApiResponse, Method, PartContent, RequestBody, Transport,
};
use estate_controller::{Notification, Notifier};
use estate_core::{AdminError, AdminResult};
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct State {
    collections: HashMap<String, Vec<Value>>,
    wrapped: HashSet<String>,
    next_id: u64,
    requests: Vec<ApiRequest>,
    injected: VecDeque<AdminResult<ApiResponse>>,
}

/// Collections keyed by path; ids are assigned on create
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.state().next_id = 100;
        backend
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Put items into a collection
    pub fn seed(self, path: &str, items: Vec<Value>) -> Self {
        self.state()
            .collections
            .entry(path.to_string())
            .or_default()
            .extend(items);
        self
    }

    /// Answer list requests on `path` with `{"data": [...]}`
    pub fn wrap_in_data(self, path: &str) -> Self {
        self.state().wrapped.insert(path.to_string());
        self
    }

    /// Answer the next request with this status and body
    pub fn fail_next(&self, status: u16, body: &str) {
        self.state()
            .injected
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    /// Fail the next request before it reaches the server
    pub fn drop_next(&self) {
        self.state()
            .injected
            .push_back(Err(AdminError::transport("connection reset")));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state().requests.clone()
    }

    /// Requests other than list reads
    pub fn mutations(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::Get)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    pub fn collection(&self, path: &str) -> Vec<Value> {
        self.state()
            .collections
            .get(path)
            .cloned()
            .unwrap_or_default()
    }
}

impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> AdminResult<ApiResponse> {
        let mut state = self.state();
        state.requests.push(request.clone());
        if let Some(injected) = state.injected.pop_front() {
            return injected;
        }

        let response = match request.method {
            Method::Get => {
                let items: Vec<Value> = state
                    .collections
                    .get(&request.path)
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|item| {
                        request
                            .query
                            .iter()
                            .all(|(key, value)| item.get(key).map(as_text) == Some(value.clone()))
                    })
                    .collect();
                let body = if state.wrapped.contains(&request.path) {
                    json!({ "data": items })
                } else {
                    Value::Array(items)
                };
                ApiResponse::new(200, body.to_string())
            }
            Method::Post => {
                state.next_id += 1;
                let id = state.next_id;
                let mut object = body_object(&request.body);
                object.insert("id".to_string(), json!(id));
                let created = Value::Object(object);
                state
                    .collections
                    .entry(request.path.clone())
                    .or_default()
                    .push(created.clone());
                ApiResponse::new(201, created.to_string())
            }
            Method::Put => {
                let (path, id) = split_item_path(&request.path);
                let mut object = body_object(&request.body);
                let items = state.collections.entry(path).or_default();
                match items
                    .iter_mut()
                    .find(|item| item.get("id").map(as_text).as_deref() == Some(id.as_str()))
                {
                    Some(item) => {
                        object.insert("id".to_string(), item["id"].clone());
                        *item = Value::Object(object);
                        ApiResponse::new(200, item.to_string())
                    }
                    None => ApiResponse::new(404, r#"{"message": "Not found"}"#),
                }
            }
            Method::Delete => {
                let (path, id) = split_item_path(&request.path);
                let items = state.collections.entry(path).or_default();
                let before = items.len();
                items.retain(|item| item.get("id").map(as_text).as_deref() != Some(id.as_str()));
                if items.len() < before {
                    ApiResponse::new(204, "")
                } else {
                    ApiResponse::new(404, r#"{"message": "Not found"}"#)
                }
            }
        };
        Ok(response)
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn split_item_path(path: &str) -> (String, String) {
    match path.rsplit_once('/') {
        Some((collection, id)) => (collection.to_string(), id.to_string()),
        None => (path.to_string(), String::new()),
    }
}

fn body_object(body: &RequestBody) -> Map<String, Value> {
    match body {
        RequestBody::Json(Value::Object(object)) => object.clone(),
        RequestBody::Multipart(parts) => parts
            .iter()
            .map(|part| {
                let value = match &part.content {
                    PartContent::Text(text) => Value::String(text.clone()),
                    PartContent::File(file) => Value::String(format!("/uploads/{}", file.file_name)),
                };
                (part.name.clone(), value)
            })
            .collect(),
        _ => Map::new(),
    }
}

/// Keeps every notification it receives
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl Recorder {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl Notifier for Recorder {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

pub fn client(backend: FakeBackend) -> Arc<ApiClient<FakeBackend>> {
    Arc::new(ApiClient::new(backend))
}
