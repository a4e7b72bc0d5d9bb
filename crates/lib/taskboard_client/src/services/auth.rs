use std::sync::Arc;

use serde_json::Value;

use crate::models::AuthPayload;
use crate::models::auth::{LoginRequest, RegisterAdminRequest};
use crate::outcome::RequestOutcome;
use crate::routes;
use crate::transport::{HttpTransport, RequestOptions};

/// Session endpoints. Storing the returned tokens is the transport's job;
/// these calls only shape the requests.
pub struct AuthService {
    transport: Arc<HttpTransport>,
}

impl AuthService {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn login(&self, email: &str, password: &str) -> RequestOutcome<AuthPayload> {
        self.transport
            .post(
                routes::POST_AUTH_LOGIN,
                RequestOptions::new().body(&LoginRequest { email, password }),
            )
            .await
    }

    /// Creates an admin account and signs it in.
    pub async fn register_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> RequestOutcome<AuthPayload> {
        let body = RegisterAdminRequest {
            username,
            email,
            password,
        };
        self.transport
            .post(
                routes::POST_AUTH_REGISTER_ADMIN,
                RequestOptions::new().body(&body),
            )
            .await
    }

    pub async fn logout(&self) -> RequestOutcome<Value> {
        self.transport
            .delete(routes::DELETE_AUTH_LOGOUT, RequestOptions::new())
            .await
    }
}
