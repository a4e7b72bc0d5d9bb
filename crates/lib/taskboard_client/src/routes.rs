//! API endpoint paths, relative to the configured base URL.

pub const POST_AUTH_LOGIN: &str = "/auth/login";
pub const DELETE_AUTH_LOGOUT: &str = "/auth/logout";
pub const POST_AUTH_REFRESH_TOKEN: &str = "/auth/refresh-token";
pub const POST_AUTH_REGISTER_ADMIN: &str = "/auth/register-admin";

pub const PROJECTS: &str = "/projects";
pub const TASKS: &str = "/tasks";
pub const USERS: &str = "/users";
pub const GET_USERS_EXISTS_BY_EMAIL: &str = "/users/exists-by-email";
pub const TEAMS: &str = "/teams";
pub const GET_TEAMS_OWNER: &str = "/teams/owner";

pub fn project(id: &str) -> String {
    format!("{PROJECTS}/{id}")
}

pub fn task(id: &str) -> String {
    format!("{TASKS}/{id}")
}

pub fn user(id: &str) -> String {
    format!("{USERS}/{id}")
}

/// Endpoints whose success body carries a new session.
pub fn issues_session(path: &str) -> bool {
    path == POST_AUTH_LOGIN || path == POST_AUTH_REGISTER_ADMIN
}

/// Endpoints whose 401 is a final answer rather than an expired credential.
pub fn skips_refresh(path: &str) -> bool {
    issues_session(path) || path == POST_AUTH_REFRESH_TOKEN
}
