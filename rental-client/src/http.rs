//! Authenticated request client
//!
//! Every call reads the session token at send time, so a token issued or
//! cleared by the session store is used on the very next request.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::client::{LoginRequest, LoginResponse};
use shared::response::error_message;
use tokio::sync::watch;

use crate::{ClientConfig, ClientError, ClientResult};

/// Login endpoint, relative to the API base
pub const LOGIN_PATH: &str = "admin/auth/login";

/// HTTP client bound to the session token
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    token: watch::Receiver<Option<String>>,
}

impl AuthClient {
    /// Create a client following the given token channel
    pub fn new(config: &ClientConfig, token: watch::Receiver<Option<String>>) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token that the next request will carry
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request with bearer and JSON content type
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.authorized(method, path)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Request with bearer only; the transport picks the content type
    fn authorized(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "API request");
        let request = self.client.request(method, url);
        match self.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request with query parameters
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with a multipart form body
    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> ClientResult<T> {
        let response = self
            .authorized(Method::POST, path)
            .multipart(form)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request without body
    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::PATCH, path).send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::handle_response(response).await
    }

    /// Download a binary body (report export)
    pub async fn get_bytes<Q>(&self, path: &str, query: &Q) -> ClientResult<Vec<u8>>
    where
        Q: Serialize + ?Sized,
    {
        let response = self.authorized(Method::GET, path).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(status, response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Post credentials to the login endpoint
    ///
    /// Sent without a bearer. Every non-success status becomes
    /// `ClientError::Api` carrying the server's message (empty if none).
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let url = self.url(LOGIN_PATH);
        tracing::debug!(%url, username = %request.username, "Login request");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&text).unwrap_or_default(),
            });
        }
        Self::decode(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(status, response).await);
        }
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            // 204 and friends
            return Ok(serde_json::from_value(Value::Null)?);
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn error_from(status: StatusCode, response: Response) -> ClientError {
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return ClientError::Http(e),
        };
        let message = error_message(&text).unwrap_or(text);
        tracing::debug!(status = status.as_u16(), %message, "API error response");

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
