use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::TrueNasError;
use super::types::{
    CreateGroupParams, CreateUserParams, DeleteGroupParams, DeleteUserParams, Group,
    UpdateGroupParams, UpdateUserParams, User,
};

const USER_AGENT: &str = concat!("truenas-provider/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the TrueNAS v2.0 REST API.
///
/// `base_url` includes the API prefix, e.g. `https://nas.local/api/v2.0`.
#[derive(Clone)]
pub struct TrueNasClient {
    client: reqwest::Client,
    base_url: String,
}

impl TrueNasClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, TrueNasError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", api_key);
        let header_value = HeaderValue::from_str(&auth_value).map_err(|_| TrueNasError::Auth {
            message: "Invalid API key format".to_string(),
        })?;
        headers.insert(AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()
            .map_err(TrueNasError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    pub async fn get_user(&self, id: i64) -> Result<User, TrueNasError> {
        let url = format!("{}/user/id/{}", self.base_url, id);
        tracing::debug!(%url, "GET user");

        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response, "user", Some(id)).await?;
        decode(response).await
    }

    /// Returns the id assigned to the new user.
    pub async fn create_user(&self, params: &CreateUserParams) -> Result<i64, TrueNasError> {
        self.post(&format!("{}/user", self.base_url), "user", params)
            .await
    }

    pub async fn update_user(
        &self,
        id: i64,
        params: &UpdateUserParams,
    ) -> Result<(), TrueNasError> {
        self.put(&format!("{}/user/id/{}", self.base_url, id), "user", id, params)
            .await
    }

    pub async fn delete_user(
        &self,
        id: i64,
        params: &DeleteUserParams,
    ) -> Result<(), TrueNasError> {
        self.delete(&format!("{}/user/id/{}", self.base_url, id), "user", id, params)
            .await
    }

    pub async fn get_group(&self, id: i64) -> Result<Group, TrueNasError> {
        let url = format!("{}/group/id/{}", self.base_url, id);
        tracing::debug!(%url, "GET group");

        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response, "group", Some(id)).await?;
        decode(response).await
    }

    /// Returns the id assigned to the new group.
    pub async fn create_group(&self, params: &CreateGroupParams) -> Result<i64, TrueNasError> {
        self.post(&format!("{}/group", self.base_url), "group", params)
            .await
    }

    pub async fn update_group(
        &self,
        id: i64,
        params: &UpdateGroupParams,
    ) -> Result<(), TrueNasError> {
        self.put(&format!("{}/group/id/{}", self.base_url, id), "group", id, params)
            .await
    }

    pub async fn delete_group(
        &self,
        id: i64,
        params: &DeleteGroupParams,
    ) -> Result<(), TrueNasError> {
        self.delete(&format!("{}/group/id/{}", self.base_url, id), "group", id, params)
            .await
    }

    async fn post<B: Serialize>(
        &self,
        url: &str,
        kind: &'static str,
        body: &B,
    ) -> Result<i64, TrueNasError> {
        tracing::debug!(%url, "POST {}", kind);

        let response = self.client.post(url).json(body).send().await?;
        let response = ensure_success(response, kind, None).await?;
        decode(response).await
    }

    async fn put<B: Serialize>(
        &self,
        url: &str,
        kind: &'static str,
        id: i64,
        body: &B,
    ) -> Result<(), TrueNasError> {
        tracing::debug!(%url, "PUT {}", kind);

        let response = self.client.put(url).json(body).send().await?;
        ensure_success(response, kind, Some(id)).await?;
        Ok(())
    }

    async fn delete<B: Serialize>(
        &self,
        url: &str,
        kind: &'static str,
        id: i64,
        body: &B,
    ) -> Result<(), TrueNasError> {
        tracing::debug!(%url, "DELETE {}", kind);

        let response = self.client.delete(url).json(body).send().await?;
        ensure_success(response, kind, Some(id)).await?;
        Ok(())
    }
}

impl std::fmt::Debug for TrueNasClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueNasClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

async fn ensure_success(
    response: Response,
    kind: &'static str,
    id: Option<i64>,
) -> Result<Response, TrueNasError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);

    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(TrueNasError::NotFound { kind, id }),
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => {
            Err(TrueNasError::Auth { message })
        }
        _ => Err(TrueNasError::Api {
            status: status.as_u16(),
            message,
        }),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TrueNasError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| TrueNasError::Decode {
        message: e.to_string(),
    })
}

// NOTE: TrueNAS answers either {"message": ...} or, for validation failures,
// {"<method>.<field>": [{"message": ...}, ...]}.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        let trimmed = body.trim();
        return if trimmed.is_empty() {
            "Unknown error".to_string()
        } else {
            trimmed.to_string()
        };
    };

    if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
        return message.to_string();
    }

    if let Some(fields) = value.as_object() {
        let details: Vec<String> = fields
            .iter()
            .filter_map(|(field, errors)| {
                let message = errors
                    .as_array()
                    .and_then(|arr| arr.first())
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())?;
                Some(format!("{}: {}", field, message))
            })
            .collect();

        if !details.is_empty() {
            return details.join("; ");
        }
    }

    value.to_string()
}
