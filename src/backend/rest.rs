//! PostgREST backend over HTTP
//!
//! Talks to a Supabase-style project: table access under `rest/v1/` and
//! password sign-in under `auth/v1/`. Every request carries the project's
//! anon key as `apikey`; the bearer token is the signed-in user's access
//! token when there is one, the anon key otherwise.

use chrono::{Duration, Utc};
use reqwest::{RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::session::Session;
use super::{Backend, BackendError, BackendResult, Collection, Filter, Query};
use crate::models::UserId;

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorResponse {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.error_description)
            .or(self.msg)
            .or(self.error)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
}

/// HTTP client for a hosted PostgREST project
#[derive(Debug, Clone)]
pub struct RestBackend {
    base_url: Url,
    anon_key: String,
    access_token: Option<String>,
    http: reqwest::Client,
}

impl RestBackend {
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> BackendResult<Self> {
        // Url::join drops the last path segment unless the base ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| BackendError::new(format!("invalid backend_url: {err}")))?;
        Ok(Self {
            base_url,
            anon_key: anon_key.into(),
            access_token: None,
            http: reqwest::Client::new(),
        })
    }

    /// Send the signed-in user's token instead of the anon key
    pub fn with_session(mut self, session: Option<&Session>) -> Self {
        self.access_token = session.map(|s| s.access_token.clone());
        self
    }

    /// Exchange email and password for a session
    pub async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session> {
        let mut endpoint = self.endpoint("auth/v1/token")?;
        endpoint.query_pairs_mut().append_pair("grant_type", "password");

        let res = self
            .http
            .post(endpoint)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport)?;

        if !res.status().is_success() {
            return Err(error_from(res).await);
        }

        let token = res.json::<TokenResponse>().await.map_err(transport)?;
        info!(user = %token.user.id, "signed in");
        Ok(Session {
            user_id: token.user.id,
            access_token: token.access_token,
            email: token.user.email.or_else(|| Some(email.to_string())),
            expires_at: token
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }

    fn endpoint(&self, path: &str) -> BackendResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| BackendError::new(format!("invalid backend_url: {err}")))
    }

    fn table_url(&self, collection: Collection) -> BackendResult<Url> {
        self.endpoint(&format!("rest/v1/{}", collection.table()))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    async fn rows(&self, request: RequestBuilder) -> BackendResult<Vec<Value>> {
        let res = self.authorize(request).send().await.map_err(transport)?;
        if !res.status().is_success() {
            return Err(error_from(res).await);
        }
        // 204 No Content when the server was not asked for a representation
        let body = res.text().await.map_err(transport)?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&body)
            .map_err(|err| BackendError::new(format!("invalid response body: {err}")))?
        {
            Value::Array(rows) => Ok(rows),
            row @ Value::Object(_) => Ok(vec![row]),
            other => Err(BackendError::new(format!(
                "unexpected response body: {other}"
            ))),
        }
    }
}

fn with_filters(mut url: Url, filters: &[Filter]) -> Url {
    {
        let mut pairs = url.query_pairs_mut();
        for filter in filters {
            let (column, value) = filter.to_query_pair();
            pairs.append_pair(&column, &value);
        }
    }
    url
}

fn transport(err: reqwest::Error) -> BackendError {
    BackendError::new(err.to_string())
}

async fn error_from(res: Response) -> BackendError {
    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(ErrorResponse::into_message);

    let message = match (status.as_u16(), body) {
        (_, Some(message)) => message,
        (401, None) => "Unauthorized".to_string(),
        (403, None) => "Forbidden".to_string(),
        (404, None) => "Not found".to_string(),
        (409, None) => "Conflict".to_string(),
        (_, None) => "unknown error".to_string(),
    };
    BackendError::with_status(status.as_u16(), message)
}

impl Backend for RestBackend {
    async fn select(&self, query: &Query) -> BackendResult<Vec<Value>> {
        let mut url = with_filters(self.table_url(query.collection)?, &query.filters);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            if let Some(order) = &query.order {
                pairs.append_pair("order", &order.to_query_value());
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        debug!(%url, "GET");
        self.rows(self.http.get(url)).await
    }

    async fn insert(&self, collection: Collection, rows: Vec<Value>) -> BackendResult<Vec<Value>> {
        let url = self.table_url(collection)?;
        debug!(%url, rows = rows.len(), "POST");
        self.rows(
            self.http
                .post(url)
                .header("Prefer", "return=representation")
                .json(&rows),
        )
        .await
    }

    async fn update(
        &self,
        collection: Collection,
        filters: &[Filter],
        patch: Value,
    ) -> BackendResult<Vec<Value>> {
        let url = with_filters(self.table_url(collection)?, filters);
        debug!(%url, "PATCH");
        self.rows(
            self.http
                .patch(url)
                .header("Prefer", "return=representation")
                .json(&patch),
        )
        .await
    }

    async fn delete(&self, collection: Collection, filters: &[Filter]) -> BackendResult<Vec<Value>> {
        let url = with_filters(self.table_url(collection)?, filters);
        debug!(%url, "DELETE");
        self.rows(
            self.http
                .delete(url)
                .header("Prefer", "return=representation"),
        )
        .await
    }

    async fn upsert(
        &self,
        collection: Collection,
        row: Value,
        on_conflict: &str,
    ) -> BackendResult<Vec<Value>> {
        let mut url = self.table_url(collection)?;
        url.query_pairs_mut().append_pair("on_conflict", on_conflict);
        debug!(%url, "POST (upsert)");
        self.rows(
            self.http
                .post(url)
                .header("Prefer", "resolution=merge-duplicates,return=representation")
                .json(&row),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let backend = RestBackend::new("https://demo.supabase.co/project", "anon").unwrap();
        assert_eq!(
            backend.table_url(Collection::Accounts).unwrap().as_str(),
            "https://demo.supabase.co/project/rest/v1/accounts"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(RestBackend::new("not a url", "anon").is_err());
    }

    #[test]
    fn test_filters_are_encoded() {
        let backend = RestBackend::new("https://demo.supabase.co", "anon").unwrap();
        let url = with_filters(
            backend.table_url(Collection::Transactions).unwrap(),
            &[
                Filter::eq("type", "expense"),
                Filter::new(
                    "transaction_date",
                    super::super::FilterOp::Gte,
                    "2025-01-01",
                ),
            ],
        );
        assert_eq!(
            url.query(),
            Some("type=eq.expense&transaction_date=gte.2025-01-01")
        );
    }

    #[test]
    fn test_error_message_precedence() {
        let body: ErrorResponse = serde_json::from_str(
            r#"{"code":"23505","message":"duplicate key value","details":null}"#,
        )
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("duplicate key value"));

        let body: ErrorResponse = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(
            body.into_message().as_deref(),
            Some("Invalid login credentials")
        );
    }
}
