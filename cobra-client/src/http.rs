// cobra-client/src/http.rs
// HTTP 客户端 - 网络通信

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::client::{LoginRequest, LoginResponse, LogoutRequest, UserInfo};

use crate::{ClientConfig, ClientError, ClientResult};

const LOGIN_PATH: &str = "auth/login/";
const FACE_LOGIN_PATH: &str = "auth/face-login/";
const LOGOUT_PATH: &str = "auth/logout/";

/// Error body formats the backend is known to emit
#[derive(serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Token pair and identity returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: UserInfo,
}

impl AuthGrant {
    /// Turns a login body into a grant; `success: false` becomes
    /// [`ClientError::Auth`] with the server's message.
    pub fn from_response(resp: LoginResponse) -> ClientResult<Self> {
        if !resp.success {
            return Err(ClientError::Auth(
                resp.message.unwrap_or_else(|| "Invalid credentials".into()),
            ));
        }
        let access_token = resp
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::InvalidResponse("Missing access token".into()))?;
        let user = resp
            .user
            .ok_or_else(|| ClientError::InvalidResponse("Missing user data".into()))?;
        Ok(Self {
            access_token,
            refresh_token: resp.refresh_token,
            user,
        })
    }
}

/// A single captured image sent as multipart field `image`
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}

impl ImageUpload {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: format!("capture_{}.jpg", shared::util::now_millis()),
            mime: "image/jpeg".to_string(),
        }
    }
}

/// HTTP 客户端 trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn put<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    /// DELETE; any 2xx counts as success, the body is ignored.
    async fn delete(&self, path: &str) -> ClientResult<()>;
    async fn post_image<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        image: ImageUpload,
    ) -> ClientResult<T>;
    async fn login(&self, username: &str, password: &str) -> ClientResult<AuthGrant>;
    async fn face_login(&self, image: ImageUpload) -> ClientResult<AuthGrant>;
    /// Revokes `refresh_token` server-side.
    async fn logout(&self, refresh_token: Option<&str>) -> ClientResult<()>;
    /// Token attached as `Authorization: Bearer` to every request; `None`
    /// removes the header.
    fn set_token(&self, token: Option<String>);
    fn token(&self) -> Option<String>;
}

/// 网络 HTTP 客户端
#[derive(Debug)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        if config.base_url.is_empty() {
            return Err(ClientError::Config("base_url is required".into()));
        }
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(config.token.clone()),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.token.read().as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = self.authorize(req).send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request could not be sent");
            ClientError::Http(e)
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let text = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), url = %url, "Request rejected");
        Err(Self::status_error(status, text))
    }

    fn status_error(status: StatusCode, text: String) -> ClientError {
        // 尝试解析为 API 错误响应
        let message = serde_json::from_str::<ApiErrorResponse>(&text)
            .ok()
            .and_then(|e| e.message.or(e.detail).or(e.error))
            .unwrap_or(text);

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    fn image_form(image: ImageUpload) -> ClientResult<reqwest::multipart::Form> {
        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime)?;
        Ok(reqwest::multipart::Form::new().part("image", part))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        let response = self.send(self.client.get(self.url(path))).await?;
        Self::json(response).await
    }

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .send(self.client.post(self.url(path)).json(body))
            .await?;
        Self::json(response).await
    }

    async fn put<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.send(self.client.put(self.url(path)).json(body)).await?;
        Self::json(response).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(self.client.delete(self.url(path))).await?;
        Ok(())
    }

    async fn post_image<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        image: ImageUpload,
    ) -> ClientResult<T> {
        let form = Self::image_form(image)?;
        let response = self
            .send(self.client.post(self.url(path)).multipart(form))
            .await?;
        Self::json(response).await
    }

    async fn login(&self, username: &str, password: &str) -> ClientResult<AuthGrant> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        // The login endpoint answers 401 with a `{success: false}` body;
        // surface it as a credential error rather than a stale token.
        let resp: LoginResponse = match self.post(LOGIN_PATH, &req).await {
            Ok(resp) => resp,
            Err(ClientError::Unauthorized(msg)) | Err(ClientError::Validation(msg)) => {
                return Err(ClientError::Auth(login_message(msg)));
            }
            Err(e) => return Err(e),
        };
        AuthGrant::from_response(resp)
    }

    async fn face_login(&self, image: ImageUpload) -> ClientResult<AuthGrant> {
        let resp: LoginResponse = match self.post_image(FACE_LOGIN_PATH, image).await {
            Ok(resp) => resp,
            Err(ClientError::Unauthorized(msg)) | Err(ClientError::Validation(msg)) => {
                return Err(ClientError::Auth(login_message(msg)));
            }
            Err(e) => return Err(e),
        };
        AuthGrant::from_response(resp)
    }

    async fn logout(&self, refresh_token: Option<&str>) -> ClientResult<()> {
        let body = LogoutRequest {
            refresh: refresh_token.map(str::to_string),
        };
        self.send(self.client.post(self.url(LOGOUT_PATH)).json(&body))
            .await?;
        Ok(())
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    fn token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

/// Login failures carry a `{success: false, message}` body.
fn login_message(raw: String) -> String {
    serde_json::from_str::<LoginResponse>(&raw)
        .ok()
        .and_then(|r| r.message)
        .unwrap_or_else(|| {
            if raw.is_empty() {
                "Invalid credentials".to_string()
            } else {
                raw
            }
        })
}
