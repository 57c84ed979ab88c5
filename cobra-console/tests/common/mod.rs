// cobra-console/tests/common/mod.rs
// 测试辅助 - scripted in-memory API

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use cobra_console::cobra_client::{AuthGrant, ClientError, ClientResult, HttpClient, ImageUpload};
use cobra_console::shared::client::LoginResponse;
use cobra_console::{MemoryStorage, SessionStorage, SessionStore};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Notify;

pub const LOGIN: &str = "auth/login/";
pub const FACE_LOGIN: &str = "auth/face-login/";
pub const LOGOUT: &str = "auth/logout/";

/// One scripted answer
pub enum Reply {
    Json(Value),
    /// Non-2xx status with a server message
    Fail(u16, String),
    /// Waits for the gate to open, then answers with the inner reply
    Gated(Arc<Notify>, Box<Reply>),
}

impl Reply {
    pub fn gated(gate: &Arc<Notify>, reply: Reply) -> Self {
        Reply::Gated(gate.clone(), Box::new(reply))
    }
}

#[derive(Debug, Clone)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
    pub token: Option<String>,
}

#[derive(Default)]
pub struct MockApi {
    replies: Mutex<HashMap<(&'static str, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
    token: Mutex<Option<String>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues `reply` for the next `method path` request
    pub fn on(&self, method: &'static str, path: &str, reply: Reply) {
        self.replies
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    async fn answer(
        &self,
        method: &'static str,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        self.calls.lock().push(Call {
            method,
            path: path.to_string(),
            body,
            token: self.token.lock().clone(),
        });
        let reply = self
            .replies
            .lock()
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front);

        let mut reply = match reply {
            Some(reply) => reply,
            None => {
                return Err(ClientError::Server {
                    status: 599,
                    message: format!("no scripted reply for {method} {path}"),
                });
            }
        };
        loop {
            match reply {
                Reply::Json(value) => return Ok(value),
                Reply::Fail(status, message) => return Err(status_error(status, message)),
                Reply::Gated(gate, inner) => {
                    gate.notified().await;
                    reply = *inner;
                }
            }
        }
    }

    async fn login_answer(&self, path: &'static str, body: Option<Value>) -> ClientResult<AuthGrant> {
        match self.answer("POST", path, body).await {
            Ok(value) => {
                let resp: LoginResponse = serde_json::from_value(value)?;
                AuthGrant::from_response(resp)
            }
            Err(ClientError::Unauthorized(msg)) | Err(ClientError::Validation(msg)) => {
                Err(ClientError::Auth(msg))
            }
            Err(e) => Err(e),
        }
    }
}

fn status_error(status: u16, message: String) -> ClientError {
    match status {
        400 => ClientError::Validation(message),
        401 => ClientError::Unauthorized(message),
        403 => ClientError::Forbidden(message),
        404 => ClientError::NotFound(message),
        _ => ClientError::Server { status, message },
    }
}

#[async_trait]
impl HttpClient for MockApi {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        let value = self.answer("GET", path, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        let value = self.answer("POST", path, Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn put<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        let value = self.answer("PUT", path, Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        self.answer("DELETE", path, None).await?;
        Ok(())
    }

    async fn post_image<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        image: ImageUpload,
    ) -> ClientResult<T> {
        let body = json!({"image_bytes": image.bytes.len(), "mime": image.mime});
        let value = self.answer("POST", path, Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn login(&self, username: &str, password: &str) -> ClientResult<AuthGrant> {
        self.login_answer(LOGIN, Some(json!({"username": username, "password": password})))
            .await
    }

    async fn face_login(&self, image: ImageUpload) -> ClientResult<AuthGrant> {
        self.login_answer(FACE_LOGIN, Some(json!({"image_bytes": image.bytes.len()})))
            .await
    }

    async fn logout(&self, refresh_token: Option<&str>) -> ClientResult<()> {
        self.answer("POST", LOGOUT, Some(json!({"refresh": refresh_token})))
            .await?;
        Ok(())
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock() = token;
    }

    fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }
}

// ========== Fixtures ==========

pub fn login_ok(token: &str, roles: &[&str]) -> Reply {
    Reply::Json(json!({
        "success": true,
        "access_token": token,
        "refresh_token": format!("{token}-refresh"),
        "user": {
            "id": 1,
            "name": "Admin User",
            "email": "admin@cybercobra.gov",
            "roles": roles,
        }
    }))
}

pub fn store(api: &Arc<MockApi>) -> (Arc<SessionStore<MockApi>>, MemoryStorage) {
    let storage = MemoryStorage::new();
    let session = SessionStore::new(api.clone(), Arc::new(storage.clone()) as Arc<dyn SessionStorage>);
    (Arc::new(session), storage)
}

/// Restored and logged in with `roles`
pub async fn signed_in(api: &Arc<MockApi>, roles: &[&str]) -> Arc<SessionStore<MockApi>> {
    let (session, _) = store(api);
    session.restore();
    api.on("POST", LOGIN, login_ok("tok1", roles));
    session.login("admin", "admin123").await.unwrap();
    session
}

pub fn camera(id: i64, name: &str, status: &str) -> Value {
    json!({
        "id_camera": id,
        "name": name,
        "zone": "Entrance",
        "ip_address": format!("192.168.1.{id}"),
        "resolution": "1080p",
        "status": status,
        "date_ajout": "2024-03-01T08:00:00Z",
    })
}
