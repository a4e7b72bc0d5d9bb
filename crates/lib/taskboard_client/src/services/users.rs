use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::ResourceService;
use crate::models::{CreateUser, EmailExists, ListEnvelope, UpdateUser, User, UserFilter};
use crate::outcome::RequestOutcome;
use crate::routes;
use crate::transport::{HttpTransport, RequestOptions};

#[derive(Serialize)]
struct EmailQuery<'a> {
    email: &'a str,
}

pub struct UsersService {
    transport: Arc<HttpTransport>,
}

impl UsersService {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Pre-submit uniqueness check for the create-user form.
    pub async fn email_exists(&self, email: &str) -> RequestOutcome<EmailExists> {
        self.transport
            .get(
                routes::GET_USERS_EXISTS_BY_EMAIL,
                RequestOptions::new().params(&EmailQuery { email }),
            )
            .await
    }
}

#[async_trait]
impl ResourceService for UsersService {
    type Item = User;
    type Filter = UserFilter;
    type Create = CreateUser;
    type Update = UpdateUser;

    async fn list(&self, filters: &UserFilter) -> RequestOutcome<ListEnvelope<User>> {
        self.transport
            .get(routes::USERS, RequestOptions::new().params(filters))
            .await
    }

    async fn create(&self, body: &CreateUser) -> RequestOutcome<Value> {
        self.transport
            .post(routes::USERS, RequestOptions::new().body(body))
            .await
    }

    async fn update(&self, body: &UpdateUser) -> RequestOutcome<Value> {
        self.transport
            .put(&routes::user(&body.id), RequestOptions::new().body(body))
            .await
    }

    async fn delete(&self, id: &str) -> RequestOutcome<Value> {
        self.transport
            .delete(&routes::user(id), RequestOptions::new())
            .await
    }
}
