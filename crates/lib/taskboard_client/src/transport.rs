//! HTTP transport.
//!
//! Every outbound call goes through [`HttpTransport::request`], which:
//! - attaches `Authorization: Bearer <token>` when the credential store has one,
//! - turns any failure (non-2xx, no response, undecodable body) into
//!   [`RequestOutcome::Failure`],
//! - hands a 401 to the [`RefreshCoordinator`] and replays the call once
//!   with the renewed token,
//! - stores the session carried by a successful login or admin registration.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::credentials::CredentialStore;
use crate::models::AuthPayload;
use crate::outcome::RequestOutcome;
use crate::refresh::RefreshCoordinator;
use crate::routes;

/// Query parameters and JSON body for one request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    params: Vec<(String, String)>,
    body: Option<Value>,
    /// Set when params or body could not be serialized; the request is
    /// answered locally with an internal failure.
    invalid: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a serializable struct into query pairs. `None` fields are
    /// dropped; scalars are sent in their display form.
    pub fn params<P: Serialize + ?Sized>(mut self, params: &P) -> Self {
        match serde_json::to_value(params) {
            Ok(Value::Object(map)) => {
                for (key, value) in map {
                    match value {
                        Value::Null => {}
                        Value::String(s) => self.params.push((key, s)),
                        other => self.params.push((key, other.to_string())),
                    }
                }
            }
            Ok(other) => {
                self.invalid = Some(format!("query params must be an object, got {other}"))
            }
            Err(e) => self.invalid = Some(format!("query params: {e}")),
        }
        self
    }

    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(value),
            Err(e) => self.invalid = Some(format!("request body: {e}")),
        }
        self
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.params
    }
}

struct RawResponse {
    status: u16,
    body: Vec<u8>,
}

/// Authenticated HTTP client for the API.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
    coordinator: RefreshCoordinator,
}

impl HttpTransport {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        credentials: CredentialStore,
        coordinator: RefreshCoordinator,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            coordinator,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> RequestOutcome<T> {
        self.request(Method::GET, path, options).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> RequestOutcome<T> {
        self.request(Method::POST, path, options).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> RequestOutcome<T> {
        self.request(Method::PUT, path, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> RequestOutcome<T> {
        self.request(Method::DELETE, path, options).await
    }

    /// Perform one logical request. Never fails with `Err`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> RequestOutcome<T> {
        if let Some(reason) = &options.invalid {
            warn!(%method, path, reason = %reason, "request not sent");
            return RequestOutcome::internal();
        }

        let token = self.credentials.access_token();
        let mut response = self.send(&method, path, &options, token.as_deref()).await;

        let unauthorized = matches!(&response, Ok(raw) if raw.status == 401);
        if unauthorized && !routes::skips_refresh(path) {
            debug!(%method, path, "401 received, recovering credential");
            match self.coordinator.recover(token.as_deref()).await {
                // One replay per logical request; its outcome is final.
                Ok(fresh) => response = self.send(&method, path, &options, Some(&fresh)).await,
                Err(e) => {
                    debug!(%method, path, error = %e, "credential recovery failed");
                    return RequestOutcome::from_status(401);
                }
            }
        }

        match response {
            Ok(raw) => self.finish(&method, path, raw),
            Err(e) => {
                warn!(%method, path, error = %e, "request failed without a response");
                RequestOutcome::internal()
            }
        }
    }

    async fn send(
        &self,
        method: &Method,
        path: &str,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> Result<RawResponse, reqwest::Error> {
        let mut request = self.client.request(method.clone(), self.url(path));
        if !options.params.is_empty() {
            request = request.query(&options.params);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        debug!(%method, path, status, "response received");
        Ok(RawResponse { status, body })
    }

    fn finish<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        raw: RawResponse,
    ) -> RequestOutcome<T> {
        if !(200..300).contains(&raw.status) {
            return RequestOutcome::from_status(raw.status);
        }

        if *method == Method::POST && routes::issues_session(path) {
            self.capture_session(&raw.body);
        }

        let decoded = if raw.body.is_empty() {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_slice(&raw.body)
        };
        match decoded {
            Ok(data) => RequestOutcome::success(data, raw.status),
            Err(e) => {
                warn!(%method, path, error = %e, "undecodable response body");
                RequestOutcome::internal()
            }
        }
    }

    fn capture_session(&self, body: &[u8]) {
        let payload: AuthPayload = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "session response could not be read");
                return;
            }
        };
        match (payload.access_token, payload.refresh_token) {
            (Some(access_token), Some(refresh_token)) => {
                if let Err(e) = self
                    .credentials
                    .set_session(access_token, refresh_token, payload.user)
                {
                    warn!(error = %e, "could not persist session");
                }
            }
            _ => warn!("session response is missing its token pair"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectFilter, UserFilter, UserRole};

    #[test]
    fn params_drop_unset_fields_and_stringify_scalars() {
        let filter = ProjectFilter {
            team_id: Some("t1".into()),
            with_stats: Some(true),
            limit: 25,
            ..Default::default()
        };
        let options = RequestOptions::new().params(&filter);
        let mut pairs = options.query_pairs().to_vec();
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("cursor".to_string(), String::new()),
                ("limit".to_string(), "25".to_string()),
                ("teamId".to_string(), "t1".to_string()),
                ("withStats".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn enum_params_use_wire_names() {
        let filter = UserFilter {
            team_id: "t1".into(),
            role: Some(UserRole::Manager),
            limit: 5,
            ..Default::default()
        };
        let options = RequestOptions::new().params(&filter);
        assert!(
            options
                .query_pairs()
                .contains(&("role".to_string(), "Manager".to_string()))
        );
    }

    #[test]
    fn non_object_params_mark_request_invalid() {
        let options = RequestOptions::new().params(&[1, 2, 3]);
        assert!(options.invalid.is_some());
    }
}
