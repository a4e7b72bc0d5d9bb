//! Wire and domain models.
//!
//! Field names follow the API's camelCase JSON; list endpoints share the
//! [`ListEnvelope`] shape.

pub mod auth;
pub mod pagination;
pub mod projects;
pub mod tasks;
pub mod teams;
pub mod users;

pub use auth::{AuthPayload, UserRole, UserSummary};
pub use pagination::{ListEnvelope, Page, PageFilter, Pagination};
pub use projects::{CreateProject, Project, ProjectFilter, ProjectStatus, UpdateProject};
pub use tasks::{CreateTask, Task, TaskFilter, TaskStatus, UpdateTask};
pub use teams::{CreateTeam, Team, TeamLookup};
pub use users::{CreateUser, EmailExists, UpdateUser, User, UserFilter};
