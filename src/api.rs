//! Client for the external mood API.
//!
//! Every call sends JSON, attaches `Authorization: Bearer <token>` when a
//! token is given, and unwraps the `{ success, message, data }` envelope.

use crate::errors::{ApiError, FALLBACK_MESSAGE};
use crate::models::{
    ApiResponse, AuthPayload, LoginRequest, MoodEntry, NameUpdate, NewMoodEntry, ProfileUpdate,
    RefreshRequest, SignupRequest, TokenPair, User, UserPayload,
};
use reqwest::{
    Client, Method, RequestBuilder,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthPayload, ApiError> {
        let envelope = self
            .send(self.request(Method::POST, "/auth/signup", None).json(request))
            .await?;
        into_data(envelope)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, ApiError> {
        let envelope = self
            .send(self.request(Method::POST, "/auth/login", None).json(request))
            .await?;
        into_data(envelope)
    }

    pub async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        let envelope = self
            .send::<UserPayload>(self.request(Method::GET, "/auth/me", Some(token)))
            .await?;
        into_data(envelope).map(|payload| payload.user)
    }

    pub async fn update_profile(
        &self,
        token: Option<&str>,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError> {
        let envelope = self
            .send::<UserPayload>(self.request(Method::PUT, "/auth/profile", token).json(update))
            .await?;
        into_data(envelope).map(|payload| payload.user)
    }

    pub async fn logout(&self, token: Option<&str>) -> Result<(), ApiError> {
        let envelope = self
            .send::<serde_json::Value>(self.request(Method::POST, "/auth/logout", token))
            .await?;
        into_message(envelope).map(|_| ())
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let envelope = self
            .send(self.request(Method::POST, "/auth/refresh", None).json(&body))
            .await?;
        into_data(envelope)
    }

    /// Returns the server's confirmation message, if any.
    pub async fn create_mood_entry(
        &self,
        token: Option<&str>,
        entry: &NewMoodEntry,
    ) -> Result<Option<String>, ApiError> {
        let envelope = self
            .send::<serde_json::Value>(
                self.request(Method::POST, "/user-mode/create", token).json(entry),
            )
            .await?;
        into_message(envelope)
    }

    pub async fn mood_entries(
        &self,
        token: Option<&str>,
        user_id: &str,
    ) -> Result<Vec<MoodEntry>, ApiError> {
        let path = format!("/user-mode/get/{user_id}");
        let envelope = self
            .send::<Vec<serde_json::Value>>(self.request(Method::GET, &path, token))
            .await?;
        into_data(envelope).map(decode_entries)
    }

    /// Name-only update. The response body varies, so the user is returned
    /// only when one can be read out of it.
    pub async fn update_user_name(
        &self,
        token: Option<&str>,
        update: &NameUpdate,
    ) -> Result<Option<User>, ApiError> {
        let envelope = self
            .send::<serde_json::Value>(self.request(Method::POST, "/user/update", token).json(update))
            .await?;
        if !envelope.success {
            return Err(rejected(envelope.message));
        }
        Ok(envelope.data.and_then(|data| {
            serde_json::from_value::<UserPayload>(data.clone())
                .map(|payload| payload.user)
                .or_else(|_| serde_json::from_value::<User>(data))
                .ok()
        }))
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(CONTENT_TYPE, "application/json");
        match token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = request.send().await.map_err(|err| ApiError::network(&err))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::network(&err))?;
        debug!(status = status.as_u16(), url = %self.base_url, "api response");

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.into());
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn rejected(message: Option<String>) -> ApiError {
    ApiError::Rejected(
        message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.into()),
    )
}

fn into_data<T>(envelope: ApiResponse<T>) -> Result<T, ApiError> {
    if !envelope.success {
        return Err(rejected(envelope.message));
    }
    envelope.data.ok_or(ApiError::MissingData)
}

/// Decodes entries one by one so a single malformed entry is skipped
/// instead of failing the whole list.
fn decode_entries(raw: Vec<serde_json::Value>) -> Vec<MoodEntry> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<MoodEntry>(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping mood entry: {err}");
                None
            }
        })
        .collect()
}

fn into_message<T>(envelope: ApiResponse<T>) -> Result<Option<String>, ApiError> {
    if !envelope.success {
        return Err(rejected(envelope.message));
    }
    Ok(envelope.message)
}
